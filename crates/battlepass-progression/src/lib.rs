//! 通行证进度核心库
//!
//! 提供用户通行证的经验累加、等级计算、完成判定与奖励领取。
//!
//! ## 模块结构
//!
//! - `models`: 领域模型与枚举
//! - `engine`: 纯内存进度引擎与时间源
//! - `error`: 错误类型定义
//! - `repository`: PostgreSQL 仓储与 trait 接口
//! - `service`: 报名、加经验、领奖及批量操作

pub mod engine;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use engine::{Clock, ExperienceOutcome, FixedClock, ProgressionEngine, SystemClock};
pub use error::{BattlePassError, Result};
pub use models::*;
pub use repository::{BattlePassRepository, USER_BATTLE_PASS_COLUMNS, UserBattlePassRepository};
pub use service::{ProgressionService, dto};

/// 生产环境使用的服务类型
pub type PgProgressionService = ProgressionService<UserBattlePassRepository, BattlePassRepository>;
