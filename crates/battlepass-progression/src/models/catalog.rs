//! 通行证目录实体定义
//!
//! 赛季 -> 通行证 -> 任务 -> 奖励 的层级结构，由运营后台维护，
//! 进度引擎只读不写

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{BattlePassType, QuestType, RewardType};

/// 赛季
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: i64,
    pub name: String,
    #[sqlx(default)]
    pub description: Option<String>,
    #[sqlx(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 通行证
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BattlePass {
    pub id: i64,
    pub name: String,
    pub season_id: i64,
    pub is_active: bool,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub pass_type: BattlePassType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BattlePass {
    /// 是否允许新用户报名
    pub fn accepts_enrollment(&self) -> bool {
        self.is_active
    }
}

/// 任务
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: i64,
    pub battle_pass_id: i64,
    pub name: String,
    #[sqlx(default)]
    pub description: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub quest_type: QuestType,
    #[sqlx(default)]
    pub required_action: Option<String>,
    pub required_count: i32,
    pub is_active: bool,
    #[sqlx(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 任务奖励
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: i64,
    pub quest_id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub reward_type: RewardType,
    pub name: String,
    #[sqlx(default)]
    pub description: Option<String>,
    pub reward_points: i32,
    #[sqlx(default)]
    pub reward_item: Option<String>,
    pub is_active: bool,
    pub is_claimed: bool,
    #[sqlx(default)]
    pub claimed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
