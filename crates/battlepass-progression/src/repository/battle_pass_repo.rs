//! 通行证仓储

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::BattlePassRepositoryTrait;
use crate::error::Result;
use crate::models::BattlePass;

pub struct BattlePassRepository {
    pool: PgPool,
}

impl BattlePassRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 根据 ID 获取通行证
    pub async fn get_battle_pass(&self, id: i64) -> Result<Option<BattlePass>> {
        let battle_pass = sqlx::query_as::<_, BattlePass>(
            r#"
            SELECT id, name, season_id, is_active, type, created_at, updated_at
            FROM battle_passes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(battle_pass)
    }
}

#[async_trait]
impl BattlePassRepositoryTrait for BattlePassRepository {
    async fn get_battle_pass(&self, id: i64) -> Result<Option<BattlePass>> {
        self.get_battle_pass(id).await
    }
}
