//! 任务管理 API 处理器
//!
//! 实现通行证任务的 CRUD 操作

use axum::{
    Json,
    extract::{Path, Query, State},
};
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use battlepass_progression::Quest;

use crate::{
    dto::{
        ApiResponse, CreateQuestRequest, PageResponse, PaginationParams, QuestFilter,
        UpdateQuestRequest,
    },
    error::AdminError,
    state::AppState,
};

const QUEST_COLUMNS: &str = r#"
    id, battle_pass_id, name, description, type, required_action, required_count,
    is_active, completed_at, created_at, updated_at
"#;

async fn ensure_battle_pass_exists(pool: &PgPool, battle_pass_id: i64) -> Result<(), AdminError> {
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM battle_passes WHERE id = $1)")
            .bind(battle_pass_id)
            .fetch_one(pool)
            .await?;

    if !exists.0 {
        return Err(AdminError::BattlePassNotFound(battle_pass_id));
    }
    Ok(())
}

/// 创建任务
///
/// POST /api/admin/quests
pub async fn create_quest(
    State(state): State<AppState>,
    Json(req): Json<CreateQuestRequest>,
) -> Result<Json<ApiResponse<Quest>>, AdminError> {
    req.validate()?;
    ensure_battle_pass_exists(&state.pool, req.battle_pass_id).await?;

    let sql = format!(
        r#"
        INSERT INTO quests (
            battle_pass_id, name, description, type, required_action, required_count,
            is_active, completed_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {QUEST_COLUMNS}
        "#
    );
    let quest = sqlx::query_as::<_, Quest>(&sql)
        .bind(req.battle_pass_id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.quest_type)
        .bind(&req.required_action)
        .bind(req.required_count.unwrap_or(1))
        .bind(req.is_active.unwrap_or(true))
        .bind(req.completed_at)
        .fetch_one(&state.pool)
        .await?;

    info!(
        quest_id = quest.id,
        battle_pass_id = quest.battle_pass_id,
        "Quest created"
    );

    Ok(Json(ApiResponse::success(quest)))
}

/// 获取任务列表
///
/// GET /api/admin/quests?battlePassId=
pub async fn list_quests(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<QuestFilter>,
) -> Result<Json<ApiResponse<PageResponse<Quest>>>, AdminError> {
    let total: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM quests WHERE ($1::BIGINT IS NULL OR battle_pass_id = $1)",
    )
    .bind(filter.battle_pass_id)
    .fetch_one(&state.pool)
    .await?;

    if total.0 == 0 {
        return Ok(Json(ApiResponse::success(PageResponse::empty(
            params.page,
            params.page_size,
        ))));
    }

    let sql = format!(
        "SELECT {QUEST_COLUMNS} FROM quests \
         WHERE ($1::BIGINT IS NULL OR battle_pass_id = $1) \
         ORDER BY id ASC LIMIT $2 OFFSET $3"
    );
    let quests = sqlx::query_as::<_, Quest>(&sql)
        .bind(filter.battle_pass_id)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&state.pool)
        .await?;

    let response = PageResponse::new(quests, total.0, params.page, params.page_size);
    Ok(Json(ApiResponse::success(response)))
}

/// 获取任务详情
///
/// GET /api/admin/quests/{id}
pub async fn get_quest(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Quest>>, AdminError> {
    let sql = format!("SELECT {QUEST_COLUMNS} FROM quests WHERE id = $1");
    let quest = sqlx::query_as::<_, Quest>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AdminError::QuestNotFound(id))?;

    Ok(Json(ApiResponse::success(quest)))
}

/// 更新任务
///
/// PUT /api/admin/quests/{id}
pub async fn update_quest(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateQuestRequest>,
) -> Result<Json<ApiResponse<Quest>>, AdminError> {
    req.validate()?;

    if let Some(battle_pass_id) = req.battle_pass_id {
        ensure_battle_pass_exists(&state.pool, battle_pass_id).await?;
    }

    let sql = format!(
        r#"
        UPDATE quests
        SET
            battle_pass_id = COALESCE($2, battle_pass_id),
            name = COALESCE($3, name),
            description = COALESCE($4, description),
            type = COALESCE($5, type),
            required_action = COALESCE($6, required_action),
            required_count = COALESCE($7, required_count),
            is_active = COALESCE($8, is_active),
            completed_at = COALESCE($9, completed_at),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {QUEST_COLUMNS}
        "#
    );
    let quest = sqlx::query_as::<_, Quest>(&sql)
        .bind(id)
        .bind(req.battle_pass_id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.quest_type)
        .bind(&req.required_action)
        .bind(req.required_count)
        .bind(req.is_active)
        .bind(req.completed_at)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AdminError::QuestNotFound(id))?;

    info!(quest_id = id, "Quest updated");

    Ok(Json(ApiResponse::success(quest)))
}

/// 删除任务
///
/// DELETE /api/admin/quests/{id}
pub async fn delete_quest(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AdminError> {
    let result = sqlx::query("DELETE FROM quests WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AdminError::QuestNotFound(id));
    }

    info!(quest_id = id, "Quest deleted");

    Ok(Json(ApiResponse::<()>::success_empty()))
}
