//! 通行证领域枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化，
//! 未知取值在反序列化阶段即被拒绝。

use serde::{Deserialize, Serialize};

/// 用户通行证状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum EnrollmentStatus {
    /// 进行中
    #[default]
    Active,
    /// 已停用 - 运营手动暂停
    Inactive,
    /// 已完成
    Completed,
    /// 已过期 - 赛季结束
    Expired,
}

/// 用户通行证类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum PassType {
    #[default]
    Standard,
    Premium,
}

/// 通行证档位（通行证定义侧）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum BattlePassType {
    /// 免费档
    #[default]
    Free,
    /// 付费档
    Premium,
}

/// 任务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum QuestType {
    /// 每日任务
    Daily,
    /// 每周任务
    Weekly,
    /// 赛季任务
    Seasonal,
    /// 特殊任务
    Special,
}

/// 奖励类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum RewardType {
    /// 积分
    Points,
    /// 道具
    Item,
    /// 游戏货币
    Currency,
    /// 外观
    Cosmetic,
    /// 通行证经验
    Experience,
}

/// 用户通行证的进度状态
///
/// 由 (is_completed, is_claimed) 推导，只会沿
/// InProgress -> CompletedUnclaimed -> CompletedClaimed 单向推进
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressState {
    InProgress,
    CompletedUnclaimed,
    CompletedClaimed,
}
