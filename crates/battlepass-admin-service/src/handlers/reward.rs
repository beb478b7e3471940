//! 奖励管理 API 处理器
//!
//! 实现任务奖励的 CRUD 操作

use axum::{
    Json,
    extract::{Path, Query, State},
};
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use battlepass_progression::Reward;

use crate::{
    dto::{
        ApiResponse, CreateRewardRequest, PageResponse, PaginationParams, RewardFilter,
        UpdateRewardRequest,
    },
    error::AdminError,
    state::AppState,
};

const REWARD_COLUMNS: &str = r#"
    id, quest_id, type, name, description, reward_points, reward_item,
    is_active, is_claimed, claimed_at, created_at, updated_at
"#;

async fn ensure_quest_exists(pool: &PgPool, quest_id: i64) -> Result<(), AdminError> {
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM quests WHERE id = $1)")
        .bind(quest_id)
        .fetch_one(pool)
        .await?;

    if !exists.0 {
        return Err(AdminError::QuestNotFound(quest_id));
    }
    Ok(())
}

/// 创建奖励
///
/// POST /api/admin/rewards
pub async fn create_reward(
    State(state): State<AppState>,
    Json(req): Json<CreateRewardRequest>,
) -> Result<Json<ApiResponse<Reward>>, AdminError> {
    req.validate()?;
    ensure_quest_exists(&state.pool, req.quest_id).await?;

    let sql = format!(
        r#"
        INSERT INTO rewards (quest_id, type, name, description, reward_points, reward_item, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {REWARD_COLUMNS}
        "#
    );
    let reward = sqlx::query_as::<_, Reward>(&sql)
        .bind(req.quest_id)
        .bind(req.reward_type)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.reward_points)
        .bind(&req.reward_item)
        .bind(req.is_active.unwrap_or(true))
        .fetch_one(&state.pool)
        .await?;

    info!(reward_id = reward.id, quest_id = reward.quest_id, "Reward created");

    Ok(Json(ApiResponse::success(reward)))
}

/// 获取奖励列表
///
/// GET /api/admin/rewards?questId=
pub async fn list_rewards(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<RewardFilter>,
) -> Result<Json<ApiResponse<PageResponse<Reward>>>, AdminError> {
    let total: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM rewards WHERE ($1::BIGINT IS NULL OR quest_id = $1)")
            .bind(filter.quest_id)
            .fetch_one(&state.pool)
            .await?;

    if total.0 == 0 {
        return Ok(Json(ApiResponse::success(PageResponse::empty(
            params.page,
            params.page_size,
        ))));
    }

    let sql = format!(
        "SELECT {REWARD_COLUMNS} FROM rewards \
         WHERE ($1::BIGINT IS NULL OR quest_id = $1) \
         ORDER BY id ASC LIMIT $2 OFFSET $3"
    );
    let rewards = sqlx::query_as::<_, Reward>(&sql)
        .bind(filter.quest_id)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&state.pool)
        .await?;

    let response = PageResponse::new(rewards, total.0, params.page, params.page_size);
    Ok(Json(ApiResponse::success(response)))
}

/// 获取奖励详情
///
/// GET /api/admin/rewards/{id}
pub async fn get_reward(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Reward>>, AdminError> {
    let sql = format!("SELECT {REWARD_COLUMNS} FROM rewards WHERE id = $1");
    let reward = sqlx::query_as::<_, Reward>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AdminError::RewardNotFound(id))?;

    Ok(Json(ApiResponse::success(reward)))
}

/// 更新奖励
///
/// PUT /api/admin/rewards/{id}
///
/// 标记为已领取时同时记录领取时间
pub async fn update_reward(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateRewardRequest>,
) -> Result<Json<ApiResponse<Reward>>, AdminError> {
    req.validate()?;

    if let Some(quest_id) = req.quest_id {
        ensure_quest_exists(&state.pool, quest_id).await?;
    }

    let sql = format!(
        r#"
        UPDATE rewards
        SET
            quest_id = COALESCE($2, quest_id),
            type = COALESCE($3, type),
            name = COALESCE($4, name),
            description = COALESCE($5, description),
            reward_points = COALESCE($6, reward_points),
            reward_item = COALESCE($7, reward_item),
            is_active = COALESCE($8, is_active),
            claimed_at = CASE
                WHEN $9 = TRUE AND NOT is_claimed THEN NOW()
                WHEN $9 = FALSE THEN NULL
                ELSE claimed_at
            END,
            is_claimed = COALESCE($9, is_claimed),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {REWARD_COLUMNS}
        "#
    );
    let reward = sqlx::query_as::<_, Reward>(&sql)
        .bind(id)
        .bind(req.quest_id)
        .bind(req.reward_type)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.reward_points)
        .bind(&req.reward_item)
        .bind(req.is_active)
        .bind(req.is_claimed)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AdminError::RewardNotFound(id))?;

    info!(reward_id = id, "Reward updated");

    Ok(Json(ApiResponse::success(reward)))
}

/// 删除奖励
///
/// DELETE /api/admin/rewards/{id}
pub async fn delete_reward(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AdminError> {
    let result = sqlx::query("DELETE FROM rewards WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AdminError::RewardNotFound(id));
    }

    info!(reward_id = id, "Reward deleted");

    Ok(Json(ApiResponse::<()>::success_empty()))
}
