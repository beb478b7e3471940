//! 进度引擎实现
//!
//! ## 规则
//!
//! - 每 `EXP_PER_LEVEL` 点累计经验提升一级，等级不超过 `total_levels`
//! - 等级只升不降；达到上限时记录完成时间，完成状态不可回退
//! - 已完成且未领取时可领取一次奖励
//!
//! 失败的操作不会修改记录中的任何字段。

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use crate::error::{BattlePassError, Result};
use crate::models::UserBattlePass;

/// 每级所需经验
pub const EXP_PER_LEVEL: i64 = 1000;

/// 根据累计经验计算等级（整数除法，截断到等级上限）
pub fn level_for_experience(total_experience: i64, total_levels: i32) -> i32 {
    let candidate = (total_experience / EXP_PER_LEVEL).min(i64::from(total_levels));
    i32::try_from(candidate).unwrap_or(total_levels)
}

/// 一次加经验操作的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceOutcome {
    pub previous_level: i32,
    pub new_level: i32,
    pub leveled_up: bool,
    /// 本次操作是否触发了完成
    pub completed: bool,
}

/// 通行证进度引擎
#[derive(Debug, Clone, Default)]
pub struct ProgressionEngine<C: Clock = SystemClock> {
    clock: C,
}

impl ProgressionEngine<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> ProgressionEngine<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// 为用户通行证增加经验
    ///
    /// `amount` 必须为正数，否则返回 `InvalidAmount` 且记录保持不变
    pub fn add_experience(
        &self,
        record: &mut UserBattlePass,
        amount: i64,
    ) -> Result<ExperienceOutcome> {
        if amount <= 0 {
            return Err(BattlePassError::InvalidAmount(amount));
        }

        let previous_level = record.level;

        record.experience = record.experience.saturating_add(amount);
        record.total_experience = record.total_experience.saturating_add(amount);

        let candidate = level_for_experience(record.total_experience, record.total_levels);
        if candidate > record.level {
            record.level = candidate;
        }

        let mut completed = false;
        if record.level >= record.total_levels && !record.is_completed {
            record.is_completed = true;
            record.completed_at = Some(self.clock.now());
            completed = true;
        }

        debug!(
            jid = record.jid,
            battle_pass_id = record.battle_pass_id,
            amount,
            previous_level,
            new_level = record.level,
            completed,
            "Experience applied"
        );

        Ok(ExperienceOutcome {
            previous_level,
            new_level: record.level,
            leveled_up: record.level > previous_level,
            completed,
        })
    }

    pub fn can_claim_reward(&self, record: &UserBattlePass) -> bool {
        record.can_claim_reward()
    }

    /// 领取通行证奖励，成功时返回领取时间
    ///
    /// 只能从"已完成未领取"状态转移一次
    pub fn claim_reward(&self, record: &mut UserBattlePass) -> Result<DateTime<Utc>> {
        if !record.can_claim_reward() {
            return Err(BattlePassError::NotClaimable {
                jid: record.jid,
                battle_pass_id: record.battle_pass_id,
                state: record.progress_state(),
            });
        }

        let now = self.clock.now();
        record.is_claimed = true;
        record.claimed_at = Some(now);

        Ok(now)
    }

    pub fn completion_percentage(&self, record: &UserBattlePass) -> f64 {
        record.completion_percentage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FixedClock;
    use crate::models::{PassType, ProgressState};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 7, 10, 30, 0).unwrap()
    }

    fn engine() -> ProgressionEngine<FixedClock> {
        ProgressionEngine::with_clock(FixedClock(fixed_now()))
    }

    fn fresh_record(total_levels: i32) -> UserBattlePass {
        let mut r = UserBattlePass::enroll(1001, 1, PassType::Standard, false, fixed_now());
        r.id = 1;
        r.total_levels = total_levels;
        r
    }

    #[test]
    fn test_level_for_experience() {
        assert_eq!(level_for_experience(0, 5), 0);
        assert_eq!(level_for_experience(999, 5), 0);
        assert_eq!(level_for_experience(1000, 5), 1);
        assert_eq!(level_for_experience(4500, 5), 4);
        assert_eq!(level_for_experience(5100, 5), 5);
        assert_eq!(level_for_experience(i64::MAX, 100), 100);
    }

    #[test]
    fn test_scenario_chain() {
        let engine = engine();
        let mut r = fresh_record(5);

        // 4500 经验 -> 4 级，未完成
        let outcome = engine.add_experience(&mut r, 4500).unwrap();
        assert_eq!(r.total_experience, 4500);
        assert_eq!(r.experience, 4500);
        assert_eq!(r.level, 4);
        assert!(!r.is_completed);
        assert!(r.completed_at.is_none());
        assert_eq!(
            outcome,
            ExperienceOutcome {
                previous_level: 0,
                new_level: 4,
                leveled_up: true,
                completed: false,
            }
        );

        // 再加 600 -> 5100，等级截断到 5 并完成
        let outcome = engine.add_experience(&mut r, 600).unwrap();
        assert_eq!(r.total_experience, 5100);
        assert_eq!(r.level, 5);
        assert!(r.is_completed);
        assert_eq!(r.completed_at, Some(fixed_now()));
        assert!(outcome.leveled_up);
        assert!(outcome.completed);

        // 领取奖励
        assert!(engine.can_claim_reward(&r));
        let claimed_at = engine.claim_reward(&mut r).unwrap();
        assert_eq!(claimed_at, fixed_now());
        assert!(r.is_claimed);
        assert_eq!(r.claimed_at, Some(fixed_now()));
        assert_eq!(r.progress_state(), ProgressState::CompletedClaimed);

        // 再次领取失败，状态不变
        let before = r.clone();
        let err = engine.claim_reward(&mut r).unwrap_err();
        assert!(matches!(
            err,
            BattlePassError::NotClaimable {
                state: ProgressState::CompletedClaimed,
                ..
            }
        ));
        assert_eq!(r, before);
    }

    #[test]
    fn test_invalid_amount_leaves_record_untouched() {
        let engine = engine();

        for amount in [0, -5] {
            let mut r = fresh_record(5);
            let before = r.clone();
            let err = engine.add_experience(&mut r, amount).unwrap_err();
            assert!(matches!(err, BattlePassError::InvalidAmount(a) if a == amount));
            assert_eq!(r, before);
        }
    }

    #[test]
    fn test_claim_before_completion_fails() {
        let engine = engine();
        let mut r = fresh_record(5);
        engine.add_experience(&mut r, 1200).unwrap();

        let before = r.clone();
        let err = engine.claim_reward(&mut r).unwrap_err();
        assert!(matches!(
            err,
            BattlePassError::NotClaimable {
                state: ProgressState::InProgress,
                ..
            }
        ));
        assert_eq!(r, before);
    }

    #[test]
    fn test_experience_accounting_and_monotone_level() {
        let engine = engine();
        let mut r = fresh_record(10);
        let amounts = [1, 999, 250, 10_000, 3, 750, 1];

        let mut expected_total = 0;
        let mut last_level = r.level;
        for amount in amounts {
            let before_exp = r.experience;
            engine.add_experience(&mut r, amount).unwrap();
            expected_total += amount;

            assert_eq!(r.experience, before_exp + amount);
            assert_eq!(r.total_experience, expected_total);
            assert!(r.level >= last_level);
            assert!(r.level <= r.total_levels);
            last_level = r.level;
        }
    }

    #[test]
    fn test_level_never_decreases_when_set_above_derived_value() {
        // 运营手动调高的等级不会被经验推导值拉低
        let engine = engine();
        let mut r = fresh_record(10);
        r.level = 7;

        let outcome = engine.add_experience(&mut r, 1500).unwrap();
        assert_eq!(r.level, 7);
        assert!(!outcome.leveled_up);
    }

    #[test]
    fn test_completion_is_one_way() {
        let engine = ProgressionEngine::with_clock(FixedClock(fixed_now()));
        let mut r = fresh_record(2);
        engine.add_experience(&mut r, 2000).unwrap();
        assert!(r.is_completed);
        let completed_at = r.completed_at;

        let later = ProgressionEngine::with_clock(FixedClock(
            fixed_now() + chrono::Duration::hours(1),
        ));
        for _ in 0..3 {
            let outcome = later.add_experience(&mut r, 500).unwrap();
            assert!(r.is_completed);
            assert!(!outcome.completed);
        }
        // completed_at 只设置一次
        assert_eq!(r.completed_at, completed_at);
        assert_eq!(r.level, 2);
    }

    #[test]
    fn test_completion_percentage() {
        let engine = engine();
        let mut r = fresh_record(5);
        assert_eq!(engine.completion_percentage(&r), 0.0);

        engine.add_experience(&mut r, 2000).unwrap();
        assert_eq!(engine.completion_percentage(&r), 40.0);

        r.total_levels = 0;
        assert_eq!(engine.completion_percentage(&r), 0.0);
    }

    #[test]
    fn test_default_engine_uses_system_clock() {
        let engine = ProgressionEngine::new();
        let mut r = fresh_record(1);
        let before = Utc::now();
        engine.add_experience(&mut r, 1000).unwrap();
        assert!(r.completed_at.unwrap() >= before);
    }
}
