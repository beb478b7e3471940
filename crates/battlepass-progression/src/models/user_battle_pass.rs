//! 用户通行证实体定义
//!
//! 记录单个用户在某个通行证上的等级、经验、完成与领奖状态

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{EnrollmentStatus, PassType, ProgressState};

/// 新报名记录的默认等级上限
pub const DEFAULT_TOTAL_LEVELS: i32 = 100;

/// 用户通行证
///
/// (jid, battle_pass_id) 唯一；`version` 用于乐观并发控制，每次进度写入递增
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserBattlePass {
    pub id: i64,
    /// 外部用户系统的用户标识
    pub jid: i64,
    pub battle_pass_id: i64,
    /// 当前等级，0 ≤ level ≤ total_levels
    pub level: i32,
    /// 当前周期经验
    pub experience: i64,
    /// 累计经验，只增不减
    pub total_experience: i64,
    /// 等级上限
    pub total_levels: i32,
    pub is_active: bool,
    pub is_completed: bool,
    #[sqlx(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub is_claimed: bool,
    #[sqlx(default)]
    pub claimed_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub ended_at: Option<DateTime<Utc>>,
    pub status: EnrollmentStatus,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub pass_type: PassType,
    #[sqlx(default)]
    pub name: Option<String>,
    #[sqlx(default)]
    pub description: Option<String>,
    pub is_visible: bool,
    pub is_premium: bool,
    pub is_active_for_user: bool,
    #[serde(skip_serializing, default)]
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserBattlePass {
    /// 构造一条待插入的报名记录（id 由数据库生成）
    pub fn enroll(
        jid: i64,
        battle_pass_id: i64,
        pass_type: PassType,
        is_premium: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            jid,
            battle_pass_id,
            level: 0,
            experience: 0,
            total_experience: 0,
            total_levels: DEFAULT_TOTAL_LEVELS,
            is_active: true,
            is_completed: false,
            completed_at: None,
            is_claimed: false,
            claimed_at: None,
            started_at: Some(now),
            ended_at: None,
            status: EnrollmentStatus::Active,
            pass_type,
            name: None,
            description: None,
            is_visible: true,
            is_premium,
            is_active_for_user: true,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// 是否可以领取通行证奖励：已完成且未领取
    pub fn can_claim_reward(&self) -> bool {
        self.is_completed && !self.is_claimed
    }

    /// 完成百分比，上限 100
    pub fn completion_percentage(&self) -> f64 {
        if self.total_levels <= 0 {
            return 0.0;
        }

        (f64::from(self.level) / f64::from(self.total_levels) * 100.0).min(100.0)
    }

    /// 当前所处的进度状态
    pub fn progress_state(&self) -> ProgressState {
        match (self.is_completed, self.is_claimed) {
            (true, true) => ProgressState::CompletedClaimed,
            (true, false) => ProgressState::CompletedUnclaimed,
            // is_claimed 必然蕴含 is_completed，未完成一律视为进行中
            (false, _) => ProgressState::InProgress,
        }
    }
}

/// 用户通行证统计
///
/// 按 jid 聚合，非数据库实体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserBattlePassStatistics {
    pub total_battle_passes: i64,
    pub active_battle_passes: i64,
    pub completed_battle_passes: i64,
    pub premium_battle_passes: i64,
    /// 累计经验之和
    pub total_experience: i64,
    /// 各通行证当前等级之和
    pub total_levels: i64,
    /// 已完成但未领取奖励的数量
    pub unclaimed_rewards: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(level: i32, total_levels: i32) -> UserBattlePass {
        let mut r = UserBattlePass::enroll(1001, 1, PassType::Standard, false, Utc::now());
        r.level = level;
        r.total_levels = total_levels;
        r
    }

    #[test]
    fn test_enroll_defaults() {
        let now = Utc::now();
        let r = UserBattlePass::enroll(1001, 7, PassType::Premium, true, now);

        assert_eq!(r.jid, 1001);
        assert_eq!(r.battle_pass_id, 7);
        assert_eq!(r.level, 0);
        assert_eq!(r.total_levels, DEFAULT_TOTAL_LEVELS);
        assert_eq!(r.status, EnrollmentStatus::Active);
        assert_eq!(r.pass_type, PassType::Premium);
        assert_eq!(r.started_at, Some(now));
        assert!(r.is_premium);
        assert!(r.is_active);
        assert!(!r.is_completed);
        assert!(!r.is_claimed);
    }

    #[test]
    fn test_can_claim_reward() {
        let mut r = record(0, 5);
        assert!(!r.can_claim_reward());

        r.is_completed = true;
        assert!(r.can_claim_reward());

        r.is_claimed = true;
        assert!(!r.can_claim_reward());
    }

    #[test]
    fn test_completion_percentage() {
        assert_eq!(record(0, 5).completion_percentage(), 0.0);
        assert_eq!(record(2, 5).completion_percentage(), 40.0);
        assert_eq!(record(5, 5).completion_percentage(), 100.0);
        // 等级超出上限时仍截断到 100
        assert_eq!(record(9, 5).completion_percentage(), 100.0);
        // 上限非法时为 0
        assert_eq!(record(3, 0).completion_percentage(), 0.0);
        assert_eq!(record(3, -1).completion_percentage(), 0.0);
    }

    #[test]
    fn test_progress_state() {
        let mut r = record(0, 5);
        assert_eq!(r.progress_state(), ProgressState::InProgress);

        r.is_completed = true;
        assert_eq!(r.progress_state(), ProgressState::CompletedUnclaimed);

        r.is_claimed = true;
        assert_eq!(r.progress_state(), ProgressState::CompletedClaimed);
    }

    #[test]
    fn test_serializes_type_field_and_hides_version() {
        let r = record(1, 5);
        let json = serde_json::to_value(&r).unwrap();

        assert_eq!(json["type"], "standard");
        assert_eq!(json["battlePassId"], 1);
        assert_eq!(json["totalExperience"], 0);
        assert!(json.get("version").is_none());
    }
}
