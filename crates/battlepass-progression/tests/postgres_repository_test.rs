//! PostgreSQL 仓储集成测试
//!
//! 需要可用的数据库：`DATABASE_URL=postgres://... cargo test -- --ignored`

use std::sync::Arc;

use sqlx::PgPool;

use battlepass_progression::dto::EnrollRequest;
use battlepass_progression::repository::UserBattlePassRepositoryTrait;
use battlepass_progression::{
    BattlePassError, BattlePassRepository, ProgressionService, UserBattlePassRepository,
};
use battlepass_shared::config::DatabaseConfig;
use battlepass_shared::database::Database;

async fn connect() -> PgPool {
    let mut config = DatabaseConfig::default();
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.url = url;
    }
    let db = Database::connect(&config).await.expect("数据库连接失败");
    db.run_migrations().await.expect("迁移失败");
    db.pool().clone()
}

/// 创建赛季和通行证，返回通行证 ID
async fn seed_battle_pass(pool: &PgPool, is_active: bool) -> i64 {
    let (season_id,): (i64,) =
        sqlx::query_as("INSERT INTO seasons (name) VALUES ('Integration Season') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap();

    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO battle_passes (name, season_id, is_active) VALUES ('Integration Pass', $1, $2) RETURNING id",
    )
    .bind(season_id)
    .bind(is_active)
    .fetch_one(pool)
    .await
    .unwrap();

    id
}

fn unique_jid() -> i64 {
    chrono::Utc::now().timestamp_micros()
}

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_progression_against_postgres() {
    let pool = connect().await;
    let battle_pass_id = seed_battle_pass(&pool, true).await;
    let repo = Arc::new(UserBattlePassRepository::new(pool.clone()));
    let service =
        ProgressionService::new(repo.clone(), Arc::new(BattlePassRepository::new(pool.clone())));
    let jid = unique_jid();

    let enrolled = service
        .enroll(EnrollRequest::new(jid, battle_pass_id))
        .await
        .unwrap();
    assert_eq!(enrolled.version, 0);

    let err = service
        .enroll(EnrollRequest::new(jid, battle_pass_id))
        .await
        .unwrap_err();
    assert!(matches!(err, BattlePassError::DuplicateEnrollment { .. }));

    let result = service
        .add_experience(jid, battle_pass_id, 2500)
        .await
        .unwrap();
    assert_eq!(result.user_battle_pass.level, 2);
    assert_eq!(result.user_battle_pass.version, 1);

    // 旧版本写入被拒绝
    let err = repo.save_progress(&enrolled).await.unwrap_err();
    assert!(matches!(err, BattlePassError::ConcurrencyConflict));

    let stats = service.statistics(jid).await.unwrap();
    assert_eq!(stats.total_battle_passes, 1);
    assert_eq!(stats.total_experience, 2500);

    let board = service.leaderboard(battle_pass_id).await.unwrap();
    assert_eq!(board.first().map(|e| e.jid), Some(jid));
}

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_enroll_inactive_battle_pass_against_postgres() {
    let pool = connect().await;
    let battle_pass_id = seed_battle_pass(&pool, false).await;
    let service = ProgressionService::new(
        Arc::new(UserBattlePassRepository::new(pool.clone())),
        Arc::new(BattlePassRepository::new(pool)),
    );

    let err = service
        .enroll(EnrollRequest::new(unique_jid(), battle_pass_id))
        .await
        .unwrap_err();
    assert!(matches!(err, BattlePassError::BattlePassUnavailable(_)));
}
