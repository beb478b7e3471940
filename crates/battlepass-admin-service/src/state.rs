//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use battlepass_progression::{BattlePassRepository, PgProgressionService, UserBattlePassRepository};
use sqlx::PgPool;

/// Axum 应用共享状态
///
/// 目录类 CRUD 直接使用连接池，进度相关操作统一经由进度服务
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL 连接池
    pub pool: PgPool,
    /// 用户通行证进度服务
    pub progression: Arc<PgProgressionService>,
}

impl AppState {
    /// 基于连接池装配仓储与进度服务
    pub fn new(pool: PgPool) -> Self {
        let progression = PgProgressionService::new(
            Arc::new(UserBattlePassRepository::new(pool.clone())),
            Arc::new(BattlePassRepository::new(pool.clone())),
        );

        Self {
            pool,
            progression: Arc::new(progression),
        }
    }
}
