//! 数据库仓储层
//!
//! 仓储只负责持久化，进度规则由引擎计算。
//! 定义 trait 接口以支持 mock 测试。

mod battle_pass_repo;
mod traits;
mod user_battle_pass_repo;

pub use battle_pass_repo::BattlePassRepository;
pub use traits::*;
pub use user_battle_pass_repo::{USER_BATTLE_PASS_COLUMNS, UserBattlePassRepository};
