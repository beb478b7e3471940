//! 通行证领域模型
//!
//! 包含目录实体（赛季、通行证、任务、奖励）与用户进度实体

pub mod catalog;
pub mod enums;
pub mod user_battle_pass;

pub use catalog::{BattlePass, Quest, Reward, Season};
pub use enums::{
    BattlePassType, EnrollmentStatus, PassType, ProgressState, QuestType, RewardType,
};
pub use user_battle_pass::{DEFAULT_TOTAL_LEVELS, UserBattlePass, UserBattlePassStatistics};
