//! 用户通行证仓储
//!
//! 进度写入使用乐观锁：`UPDATE ... WHERE id = $1 AND version = $2`，
//! 影响行数为 0 说明记录已被其他请求修改。

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::UserBattlePassRepositoryTrait;
use crate::error::{BattlePassError, Result};
use crate::models::{UserBattlePass, UserBattlePassStatistics};

/// user_battle_passes 全部列，供管理后台的过滤查询复用
pub const USER_BATTLE_PASS_COLUMNS: &str = r#"
    id, jid, battle_pass_id, level, experience, total_experience, total_levels,
    is_active, is_completed, completed_at, is_claimed, claimed_at, started_at, ended_at,
    status, type, name, description, is_visible, is_premium, is_active_for_user,
    version, created_at, updated_at
"#;

/// 用户通行证仓储
pub struct UserBattlePassRepository {
    pool: PgPool,
}

impl UserBattlePassRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 查询操作 ====================

    pub async fn find_by_id(&self, id: i64) -> Result<Option<UserBattlePass>> {
        let sql = format!("SELECT {USER_BATTLE_PASS_COLUMNS} FROM user_battle_passes WHERE id = $1");
        let record = sqlx::query_as::<_, UserBattlePass>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    pub async fn find_by_user_and_pass(
        &self,
        jid: i64,
        battle_pass_id: i64,
    ) -> Result<Option<UserBattlePass>> {
        let sql = format!(
            "SELECT {USER_BATTLE_PASS_COLUMNS} FROM user_battle_passes WHERE jid = $1 AND battle_pass_id = $2"
        );
        let record = sqlx::query_as::<_, UserBattlePass>(&sql)
            .bind(jid)
            .bind(battle_pass_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    pub async fn find_active_by_user_and_pass(
        &self,
        jid: i64,
        battle_pass_id: i64,
    ) -> Result<Option<UserBattlePass>> {
        let sql = format!(
            "SELECT {USER_BATTLE_PASS_COLUMNS} FROM user_battle_passes \
             WHERE jid = $1 AND battle_pass_id = $2 AND is_active = TRUE"
        );
        let record = sqlx::query_as::<_, UserBattlePass>(&sql)
            .bind(jid)
            .bind(battle_pass_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    pub async fn exists_for_user_and_pass(&self, jid: i64, battle_pass_id: i64) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM user_battle_passes WHERE jid = $1 AND battle_pass_id = $2
            )
            "#,
        )
        .bind(jid)
        .bind(battle_pass_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    /// 列出用户的报名记录，最新的在前
    pub async fn list_by_user(&self, jid: i64, active_only: bool) -> Result<Vec<UserBattlePass>> {
        let sql = format!(
            "SELECT {USER_BATTLE_PASS_COLUMNS} FROM user_battle_passes \
             WHERE jid = $1 AND ($2 = FALSE OR is_active = TRUE) \
             ORDER BY created_at DESC, id DESC"
        );
        let records = sqlx::query_as::<_, UserBattlePass>(&sql)
            .bind(jid)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// 列出通行证的报名记录，按等级、经验倒序
    ///
    /// `limit` 为 None 时不限制条数
    pub async fn list_by_battle_pass(
        &self,
        battle_pass_id: i64,
        active_only: bool,
        limit: Option<i64>,
    ) -> Result<Vec<UserBattlePass>> {
        let sql = format!(
            "SELECT {USER_BATTLE_PASS_COLUMNS} FROM user_battle_passes \
             WHERE battle_pass_id = $1 AND ($2 = FALSE OR is_active = TRUE) \
             ORDER BY level DESC, experience DESC, id ASC \
             LIMIT $3"
        );
        let records = sqlx::query_as::<_, UserBattlePass>(&sql)
            .bind(battle_pass_id)
            .bind(active_only)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    pub async fn list_active_for_users(
        &self,
        jids: &[i64],
        battle_pass_id: i64,
    ) -> Result<Vec<UserBattlePass>> {
        let sql = format!(
            "SELECT {USER_BATTLE_PASS_COLUMNS} FROM user_battle_passes \
             WHERE jid = ANY($1) AND battle_pass_id = $2 AND is_active = TRUE \
             ORDER BY id ASC"
        );
        let records = sqlx::query_as::<_, UserBattlePass>(&sql)
            .bind(jids)
            .bind(battle_pass_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// 按用户聚合统计
    pub async fn user_statistics(&self, jid: i64) -> Result<UserBattlePassStatistics> {
        let stats = sqlx::query_as::<_, UserBattlePassStatistics>(
            r#"
            SELECT
                COUNT(*) AS total_battle_passes,
                COUNT(*) FILTER (WHERE is_active) AS active_battle_passes,
                COUNT(*) FILTER (WHERE is_completed) AS completed_battle_passes,
                COUNT(*) FILTER (WHERE is_premium) AS premium_battle_passes,
                COALESCE(SUM(total_experience), 0)::BIGINT AS total_experience,
                COALESCE(SUM(level), 0)::BIGINT AS total_levels,
                COUNT(*) FILTER (WHERE is_completed AND NOT is_claimed) AS unclaimed_rewards
            FROM user_battle_passes
            WHERE jid = $1
            "#,
        )
        .bind(jid)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    // ==================== 写入操作 ====================

    /// 插入报名记录，返回数据库生成的完整记录
    pub async fn create(&self, record: &UserBattlePass) -> Result<UserBattlePass> {
        let sql = format!(
            r#"
            INSERT INTO user_battle_passes (
                jid, battle_pass_id, level, experience, total_experience, total_levels,
                is_active, is_completed, is_claimed, started_at, status, type,
                name, description, is_visible, is_premium, is_active_for_user,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING {USER_BATTLE_PASS_COLUMNS}
            "#
        );
        let result = sqlx::query_as::<_, UserBattlePass>(&sql)
            .bind(record.jid)
            .bind(record.battle_pass_id)
            .bind(record.level)
            .bind(record.experience)
            .bind(record.total_experience)
            .bind(record.total_levels)
            .bind(record.is_active)
            .bind(record.is_completed)
            .bind(record.is_claimed)
            .bind(record.started_at)
            .bind(record.status)
            .bind(record.pass_type)
            .bind(&record.name)
            .bind(&record.description)
            .bind(record.is_visible)
            .bind(record.is_premium)
            .bind(record.is_active_for_user)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(created) => Ok(created),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(BattlePassError::DuplicateEnrollment {
                    jid: record.jid,
                    battle_pass_id: record.battle_pass_id,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 保存引擎修改过的进度字段，版本号递增
    pub async fn save_progress(&self, record: &UserBattlePass) -> Result<UserBattlePass> {
        let sql = format!(
            r#"
            UPDATE user_battle_passes
            SET level = $3,
                experience = $4,
                total_experience = $5,
                is_completed = $6,
                completed_at = $7,
                is_claimed = $8,
                claimed_at = $9,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $2
            RETURNING {USER_BATTLE_PASS_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, UserBattlePass>(&sql)
            .bind(record.id)
            .bind(record.version)
            .bind(record.level)
            .bind(record.experience)
            .bind(record.total_experience)
            .bind(record.is_completed)
            .bind(record.completed_at)
            .bind(record.is_claimed)
            .bind(record.claimed_at)
            .fetch_optional(&self.pool)
            .await?;

        updated.ok_or(BattlePassError::ConcurrencyConflict)
    }
}

#[async_trait]
impl UserBattlePassRepositoryTrait for UserBattlePassRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserBattlePass>> {
        self.find_by_id(id).await
    }

    async fn find_by_user_and_pass(
        &self,
        jid: i64,
        battle_pass_id: i64,
    ) -> Result<Option<UserBattlePass>> {
        self.find_by_user_and_pass(jid, battle_pass_id).await
    }

    async fn find_active_by_user_and_pass(
        &self,
        jid: i64,
        battle_pass_id: i64,
    ) -> Result<Option<UserBattlePass>> {
        self.find_active_by_user_and_pass(jid, battle_pass_id).await
    }

    async fn exists_for_user_and_pass(&self, jid: i64, battle_pass_id: i64) -> Result<bool> {
        self.exists_for_user_and_pass(jid, battle_pass_id).await
    }

    async fn create(&self, record: &UserBattlePass) -> Result<UserBattlePass> {
        self.create(record).await
    }

    async fn save_progress(&self, record: &UserBattlePass) -> Result<UserBattlePass> {
        self.save_progress(record).await
    }

    async fn list_by_user(&self, jid: i64, active_only: bool) -> Result<Vec<UserBattlePass>> {
        self.list_by_user(jid, active_only).await
    }

    async fn list_by_battle_pass(
        &self,
        battle_pass_id: i64,
        active_only: bool,
        limit: Option<i64>,
    ) -> Result<Vec<UserBattlePass>> {
        self.list_by_battle_pass(battle_pass_id, active_only, limit)
            .await
    }

    async fn list_active_for_users(
        &self,
        jids: &[i64],
        battle_pass_id: i64,
    ) -> Result<Vec<UserBattlePass>> {
        self.list_active_for_users(jids, battle_pass_id).await
    }

    async fn user_statistics(&self, jid: i64) -> Result<UserBattlePassStatistics> {
        self.user_statistics(jid).await
    }
}
