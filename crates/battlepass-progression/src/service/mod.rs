//! 服务层
//!
//! 协调仓储与进度引擎：加载记录 -> 引擎计算 -> 保存一次。
//!
//! ## 模块结构
//!
//! - `dto`: 服务层输入输出定义
//! - `progression_service`: 报名、加经验、领奖与批量操作

pub mod dto;
pub mod progression_service;

pub use dto::*;
pub use progression_service::{MAX_EXPERIENCE_PER_REQUEST, ProgressionService};
