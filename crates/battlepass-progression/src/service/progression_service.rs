//! 通行证进度服务
//!
//! 负责报名、加经验、领取奖励及其批量版本。
//!
//! ## 写入流程
//!
//! 1. 加载记录 -> 2. 引擎计算 -> 3. 带版本号保存
//!
//! 版本冲突直接返回 `ConcurrencyConflict`，服务内部不重试。
//! 批量操作逐条执行，单条失败不影响其他用户，失败原因汇总返回。

use std::sync::Arc;

use tracing::{info, instrument, warn};

use battlepass_shared::observability::metrics;

use crate::engine::{Clock, ExperienceOutcome, ProgressionEngine, SystemClock};
use crate::error::{BattlePassError, Result};
use crate::models::{UserBattlePass, UserBattlePassStatistics};
use crate::repository::{BattlePassRepositoryTrait, UserBattlePassRepositoryTrait};
use crate::service::dto::{
    BulkAssignResult, BulkExperienceResult, BulkItemError, ClaimResult, EnrollRequest,
    ExperienceResult, LEADERBOARD_SIZE, LeaderboardEntry, build_leaderboard,
};

/// 单次请求允许增加的最大经验
pub const MAX_EXPERIENCE_PER_REQUEST: i64 = 10_000;

/// 通行证进度服务
pub struct ProgressionService<UR, BR>
where
    UR: UserBattlePassRepositoryTrait,
    BR: BattlePassRepositoryTrait,
{
    user_battle_pass_repo: Arc<UR>,
    battle_pass_repo: Arc<BR>,
    engine: ProgressionEngine<Arc<dyn Clock>>,
}

impl<UR, BR> ProgressionService<UR, BR>
where
    UR: UserBattlePassRepositoryTrait,
    BR: BattlePassRepositoryTrait,
{
    pub fn new(user_battle_pass_repo: Arc<UR>, battle_pass_repo: Arc<BR>) -> Self {
        Self::with_clock(user_battle_pass_repo, battle_pass_repo, Arc::new(SystemClock))
    }

    pub fn with_clock(
        user_battle_pass_repo: Arc<UR>,
        battle_pass_repo: Arc<BR>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_battle_pass_repo,
            battle_pass_repo,
            engine: ProgressionEngine::with_clock(clock),
        }
    }

    // ==================== 报名 ====================

    /// 为用户报名通行证
    ///
    /// 通行证必须存在且启用，同一用户不可重复报名
    #[instrument(skip(self), fields(jid = req.jid, battle_pass_id = req.battle_pass_id))]
    pub async fn enroll(&self, req: EnrollRequest) -> Result<UserBattlePass> {
        self.ensure_battle_pass_available(req.battle_pass_id).await?;
        self.enroll_unchecked(&req).await
    }

    /// 批量报名
    ///
    /// 通行证可用性只检查一次；每个用户独立报名，失败的汇总到 errors
    #[instrument(skip(self, jids), fields(count = jids.len()))]
    pub async fn bulk_assign(&self, jids: &[i64], battle_pass_id: i64) -> Result<BulkAssignResult> {
        self.ensure_battle_pass_available(battle_pass_id).await?;

        let mut result = BulkAssignResult::default();
        for &jid in jids {
            match self
                .enroll_unchecked(&EnrollRequest::new(jid, battle_pass_id))
                .await
            {
                Ok(_) => result.success_count += 1,
                Err(e) => result.errors.push(BulkItemError {
                    jid,
                    message: e.to_string(),
                }),
            }
        }

        info!(
            battle_pass_id,
            success_count = result.success_count,
            failed = result.errors.len(),
            "Bulk assign finished"
        );

        Ok(result)
    }

    async fn ensure_battle_pass_available(&self, battle_pass_id: i64) -> Result<()> {
        let available = self
            .battle_pass_repo
            .get_battle_pass(battle_pass_id)
            .await?
            .is_some_and(|bp| bp.accepts_enrollment());

        if !available {
            warn!(battle_pass_id, "Battle pass not found or inactive");
            metrics::record_enrollment(battle_pass_id, "unavailable");
            return Err(BattlePassError::BattlePassUnavailable(battle_pass_id));
        }

        Ok(())
    }

    async fn enroll_unchecked(&self, req: &EnrollRequest) -> Result<UserBattlePass> {
        let duplicate = || BattlePassError::DuplicateEnrollment {
            jid: req.jid,
            battle_pass_id: req.battle_pass_id,
        };

        if self
            .user_battle_pass_repo
            .exists_for_user_and_pass(req.jid, req.battle_pass_id)
            .await?
        {
            metrics::record_enrollment(req.battle_pass_id, "duplicate");
            return Err(duplicate());
        }

        let mut record = UserBattlePass::enroll(
            req.jid,
            req.battle_pass_id,
            req.pass_type,
            req.is_premium,
            self.engine.now(),
        );
        if let Some(total_levels) = req.total_levels {
            if total_levels < 1 {
                return Err(BattlePassError::Validation(format!(
                    "等级上限必须大于 0: {total_levels}"
                )));
            }
            record.total_levels = total_levels;
        }
        record.name = req.name.clone();
        record.description = req.description.clone();

        let created = match self.user_battle_pass_repo.create(&record).await {
            Ok(created) => created,
            Err(e @ BattlePassError::DuplicateEnrollment { .. }) => {
                metrics::record_enrollment(req.battle_pass_id, "duplicate");
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        metrics::record_enrollment(req.battle_pass_id, "success");
        info!(
            id = created.id,
            jid = created.jid,
            battle_pass_id = created.battle_pass_id,
            "User enrolled in battle pass"
        );

        Ok(created)
    }

    // ==================== 经验 ====================

    /// 为用户的有效报名增加经验
    #[instrument(skip(self))]
    pub async fn add_experience(
        &self,
        jid: i64,
        battle_pass_id: i64,
        amount: i64,
    ) -> Result<ExperienceResult> {
        validate_amount(amount)?;

        let record = self
            .user_battle_pass_repo
            .find_active_by_user_and_pass(jid, battle_pass_id)
            .await?
            .ok_or(BattlePassError::RecordNotFound {
                jid,
                battle_pass_id,
            })?;

        let (saved, outcome) = self.apply_experience(record, amount).await?;

        Ok(ExperienceResult {
            user_battle_pass: saved,
            level_up: outcome.leveled_up,
        })
    }

    /// 批量加经验
    ///
    /// 没有有效报名的用户直接跳过；单条保存失败记入 errors
    #[instrument(skip(self, jids), fields(count = jids.len()))]
    pub async fn bulk_add_experience(
        &self,
        jids: &[i64],
        battle_pass_id: i64,
        amount: i64,
    ) -> Result<BulkExperienceResult> {
        validate_amount(amount)?;

        if self
            .battle_pass_repo
            .get_battle_pass(battle_pass_id)
            .await?
            .is_none()
        {
            return Err(BattlePassError::BattlePassUnavailable(battle_pass_id));
        }

        let records = self
            .user_battle_pass_repo
            .list_active_for_users(jids, battle_pass_id)
            .await?;

        let mut result = BulkExperienceResult::default();
        for record in records {
            let jid = record.jid;
            match self.apply_experience(record, amount).await {
                Ok((_, outcome)) => {
                    result.updated_count += 1;
                    if outcome.leveled_up {
                        result.level_ups += 1;
                    }
                }
                Err(e) => result.errors.push(BulkItemError {
                    jid,
                    message: e.to_string(),
                }),
            }
        }

        info!(
            battle_pass_id,
            amount,
            updated_count = result.updated_count,
            level_ups = result.level_ups,
            failed = result.errors.len(),
            "Bulk experience finished"
        );

        Ok(result)
    }

    async fn apply_experience(
        &self,
        mut record: UserBattlePass,
        amount: i64,
    ) -> Result<(UserBattlePass, ExperienceOutcome)> {
        let outcome = self.engine.add_experience(&mut record, amount)?;

        let saved = match self.user_battle_pass_repo.save_progress(&record).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!(id = record.id, error = %e, "Failed to save experience");
                return Err(e);
            }
        };

        metrics::record_experience_added(saved.battle_pass_id, amount, outcome.leveled_up);
        if outcome.completed {
            info!(
                id = saved.id,
                jid = saved.jid,
                battle_pass_id = saved.battle_pass_id,
                level = saved.level,
                "Battle pass completed"
            );
        }

        Ok((saved, outcome))
    }

    // ==================== 领奖 ====================

    /// 领取通行证奖励
    #[instrument(skip(self))]
    pub async fn claim_reward(&self, jid: i64, battle_pass_id: i64) -> Result<ClaimResult> {
        let mut record = self
            .user_battle_pass_repo
            .find_by_user_and_pass(jid, battle_pass_id)
            .await?
            .ok_or(BattlePassError::RecordNotFound {
                jid,
                battle_pass_id,
            })?;

        if let Err(e) = self.engine.claim_reward(&mut record) {
            warn!(jid, battle_pass_id, error = %e, "Reward claim rejected");
            metrics::record_reward_claim(battle_pass_id, "not_claimable");
            return Err(e);
        }

        let saved = self.user_battle_pass_repo.save_progress(&record).await?;

        metrics::record_reward_claim(battle_pass_id, "success");
        info!(id = saved.id, jid, battle_pass_id, "Battle pass reward claimed");

        Ok(ClaimResult {
            user_battle_pass: saved,
        })
    }

    // ==================== 查询 ====================

    pub async fn user_battle_pass(&self, id: i64) -> Result<UserBattlePass> {
        self.user_battle_pass_repo
            .find_by_id(id)
            .await?
            .ok_or(BattlePassError::UserBattlePassNotFound(id))
    }

    pub async fn user_battle_passes(&self, jid: i64) -> Result<Vec<UserBattlePass>> {
        self.user_battle_pass_repo.list_by_user(jid, false).await
    }

    pub async fn active_user_battle_passes(&self, jid: i64) -> Result<Vec<UserBattlePass>> {
        self.user_battle_pass_repo.list_by_user(jid, true).await
    }

    pub async fn statistics(&self, jid: i64) -> Result<UserBattlePassStatistics> {
        self.user_battle_pass_repo.user_statistics(jid).await
    }

    /// 通行证下所有报名，按等级、经验倒序
    pub async fn battle_pass_users(&self, battle_pass_id: i64) -> Result<Vec<UserBattlePass>> {
        self.user_battle_pass_repo
            .list_by_battle_pass(battle_pass_id, false, None)
            .await
    }

    /// 排行榜：仅统计有效报名，取前 100 名
    pub async fn leaderboard(&self, battle_pass_id: i64) -> Result<Vec<LeaderboardEntry>> {
        let records = self
            .user_battle_pass_repo
            .list_by_battle_pass(battle_pass_id, true, Some(LEADERBOARD_SIZE as i64))
            .await?;

        Ok(build_leaderboard(&records))
    }
}

fn validate_amount(amount: i64) -> Result<()> {
    if !(1..=MAX_EXPERIENCE_PER_REQUEST).contains(&amount) {
        return Err(BattlePassError::InvalidAmount(amount));
    }
    Ok(())
}
