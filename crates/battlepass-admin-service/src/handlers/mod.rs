//! HTTP 请求处理器模块
//!
//! 包含所有 REST API 端点的处理器实现

pub mod battle_pass;
pub mod bulk;
pub mod leaderboard;
pub mod progression;
pub mod quest;
pub mod reward;
pub mod season;
pub mod user_battle_pass;
