//! 数据传输对象（DTO）模块
//!
//! 定义 API 请求和响应的数据结构

mod request;
mod response;

pub use request::*;
pub use response::*;
