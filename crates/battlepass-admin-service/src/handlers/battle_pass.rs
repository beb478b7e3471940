//! 通行证管理 API 处理器
//!
//! 实现通行证的 CRUD 操作，详情附带赛季名称与任务数量

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use battlepass_progression::BattlePassType;

use crate::{
    dto::{
        ApiResponse, BattlePassDto, CreateBattlePassRequest, PageResponse, PaginationParams,
        UpdateBattlePassRequest,
    },
    error::AdminError,
    state::AppState,
};

/// 通行证及关联信息查询结果
#[derive(sqlx::FromRow)]
struct BattlePassWithInfo {
    id: i64,
    name: String,
    season_id: i64,
    season_name: String,
    is_active: bool,
    #[sqlx(rename = "type")]
    pass_type: BattlePassType,
    quest_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BattlePassWithInfo> for BattlePassDto {
    fn from(row: BattlePassWithInfo) -> Self {
        Self {
            id: row.id,
            name: row.name,
            season_id: row.season_id,
            season_name: row.season_name,
            is_active: row.is_active,
            pass_type: row.pass_type,
            quest_count: row.quest_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const BATTLE_PASS_WITH_INFO_SQL: &str = r#"
    SELECT
        bp.id,
        bp.name,
        bp.season_id,
        s.name AS season_name,
        bp.is_active,
        bp.type,
        (SELECT COUNT(*) FROM quests q WHERE q.battle_pass_id = bp.id) AS quest_count,
        bp.created_at,
        bp.updated_at
    FROM battle_passes bp
    JOIN seasons s ON s.id = bp.season_id
"#;

async fn ensure_season_exists(pool: &PgPool, season_id: i64) -> Result<(), AdminError> {
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM seasons WHERE id = $1)")
        .bind(season_id)
        .fetch_one(pool)
        .await?;

    if !exists.0 {
        return Err(AdminError::SeasonNotFound(season_id));
    }
    Ok(())
}

async fn fetch_battle_pass(pool: &PgPool, id: i64) -> Result<BattlePassDto, AdminError> {
    let sql = format!("{BATTLE_PASS_WITH_INFO_SQL} WHERE bp.id = $1");
    let row = sqlx::query_as::<_, BattlePassWithInfo>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AdminError::BattlePassNotFound(id))?;

    Ok(row.into())
}

/// 创建通行证
///
/// POST /api/admin/battle-passes
pub async fn create_battle_pass(
    State(state): State<AppState>,
    Json(req): Json<CreateBattlePassRequest>,
) -> Result<Json<ApiResponse<BattlePassDto>>, AdminError> {
    req.validate()?;
    ensure_season_exists(&state.pool, req.season_id).await?;

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO battle_passes (name, season_id, is_active, type)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(&req.name)
    .bind(req.season_id)
    .bind(req.is_active.unwrap_or(true))
    .bind(req.pass_type.unwrap_or_default())
    .fetch_one(&state.pool)
    .await?;

    info!(battle_pass_id = id, season_id = req.season_id, "Battle pass created");

    let dto = fetch_battle_pass(&state.pool, id).await?;
    Ok(Json(ApiResponse::success(dto)))
}

/// 获取通行证列表
///
/// GET /api/admin/battle-passes
pub async fn list_battle_passes(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<BattlePassDto>>>, AdminError> {
    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM battle_passes")
        .fetch_one(&state.pool)
        .await?;

    if total.0 == 0 {
        return Ok(Json(ApiResponse::success(PageResponse::empty(
            params.page,
            params.page_size,
        ))));
    }

    let sql = format!("{BATTLE_PASS_WITH_INFO_SQL} ORDER BY bp.id DESC LIMIT $1 OFFSET $2");
    let rows = sqlx::query_as::<_, BattlePassWithInfo>(&sql)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&state.pool)
        .await?;

    let items: Vec<BattlePassDto> = rows.into_iter().map(Into::into).collect();
    let response = PageResponse::new(items, total.0, params.page, params.page_size);
    Ok(Json(ApiResponse::success(response)))
}

/// 获取通行证详情
///
/// GET /api/admin/battle-passes/{id}
pub async fn get_battle_pass(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<BattlePassDto>>, AdminError> {
    let dto = fetch_battle_pass(&state.pool, id).await?;
    Ok(Json(ApiResponse::success(dto)))
}

/// 更新通行证
///
/// PUT /api/admin/battle-passes/{id}
pub async fn update_battle_pass(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateBattlePassRequest>,
) -> Result<Json<ApiResponse<BattlePassDto>>, AdminError> {
    req.validate()?;

    if let Some(season_id) = req.season_id {
        ensure_season_exists(&state.pool, season_id).await?;
    }

    let result = sqlx::query(
        r#"
        UPDATE battle_passes
        SET
            season_id = COALESCE($2, season_id),
            name = COALESCE($3, name),
            is_active = COALESCE($4, is_active),
            type = COALESCE($5, type),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(req.season_id)
    .bind(&req.name)
    .bind(req.is_active)
    .bind(req.pass_type)
    .execute(&state.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AdminError::BattlePassNotFound(id));
    }

    info!(battle_pass_id = id, "Battle pass updated");

    let dto = fetch_battle_pass(&state.pool, id).await?;
    Ok(Json(ApiResponse::success(dto)))
}

/// 删除通行证
///
/// DELETE /api/admin/battle-passes/{id}
pub async fn delete_battle_pass(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AdminError> {
    let result = sqlx::query("DELETE FROM battle_passes WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AdminError::BattlePassNotFound(id));
    }

    info!(battle_pass_id = id, "Battle pass deleted");

    Ok(Json(ApiResponse::<()>::success_empty()))
}
