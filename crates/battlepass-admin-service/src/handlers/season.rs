//! 赛季管理 API 处理器
//!
//! 实现赛季的 CRUD 操作

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::info;
use validator::Validate;

use battlepass_progression::Season;

use crate::{
    dto::{
        ApiResponse, CreateSeasonRequest, PageResponse, PaginationParams, UpdateSeasonRequest,
        check_date_range,
    },
    error::AdminError,
    state::AppState,
};

const SEASON_COLUMNS: &str =
    "id, name, description, start_date, end_date, is_active, created_at, updated_at";

/// 创建赛季
///
/// POST /api/admin/seasons
pub async fn create_season(
    State(state): State<AppState>,
    Json(req): Json<CreateSeasonRequest>,
) -> Result<Json<ApiResponse<Season>>, AdminError> {
    req.validate()?;

    let sql = format!(
        "INSERT INTO seasons (name, description, start_date, end_date, is_active) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {SEASON_COLUMNS}"
    );
    let season = sqlx::query_as::<_, Season>(&sql)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.is_active.unwrap_or(true))
        .fetch_one(&state.pool)
        .await?;

    info!(season_id = season.id, name = %season.name, "Season created");

    Ok(Json(ApiResponse::success(season)))
}

/// 获取赛季列表
///
/// GET /api/admin/seasons
pub async fn list_seasons(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Season>>>, AdminError> {
    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seasons")
        .fetch_one(&state.pool)
        .await?;

    if total.0 == 0 {
        return Ok(Json(ApiResponse::success(PageResponse::empty(
            params.page,
            params.page_size,
        ))));
    }

    let sql = format!(
        "SELECT {SEASON_COLUMNS} FROM seasons ORDER BY start_date DESC NULLS LAST, id DESC \
         LIMIT $1 OFFSET $2"
    );
    let seasons = sqlx::query_as::<_, Season>(&sql)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&state.pool)
        .await?;

    let response = PageResponse::new(seasons, total.0, params.page, params.page_size);
    Ok(Json(ApiResponse::success(response)))
}

/// 获取赛季详情
///
/// GET /api/admin/seasons/{id}
pub async fn get_season(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Season>>, AdminError> {
    let sql = format!("SELECT {SEASON_COLUMNS} FROM seasons WHERE id = $1");
    let season = sqlx::query_as::<_, Season>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AdminError::SeasonNotFound(id))?;

    Ok(Json(ApiResponse::success(season)))
}

/// 更新赛季
///
/// PUT /api/admin/seasons/{id}
///
/// 只提供一端时间的更新需要与库中另一端一起校验
pub async fn update_season(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSeasonRequest>,
) -> Result<Json<ApiResponse<Season>>, AdminError> {
    req.validate()?;

    let sql = format!("SELECT {SEASON_COLUMNS} FROM seasons WHERE id = $1");
    let current = sqlx::query_as::<_, Season>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AdminError::SeasonNotFound(id))?;

    check_date_range(
        req.start_date.or(current.start_date),
        req.end_date.or(current.end_date),
    )
    .map_err(|_| AdminError::Validation("结束时间不能早于开始时间".to_string()))?;

    let sql = format!(
        r#"
        UPDATE seasons
        SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            start_date = COALESCE($4, start_date),
            end_date = COALESCE($5, end_date),
            is_active = COALESCE($6, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {SEASON_COLUMNS}
        "#
    );
    let season = sqlx::query_as::<_, Season>(&sql)
        .bind(id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.is_active)
        .fetch_one(&state.pool)
        .await?;

    info!(season_id = id, "Season updated");

    Ok(Json(ApiResponse::success(season)))
}

/// 删除赛季
///
/// DELETE /api/admin/seasons/{id}
///
/// 级联删除赛季下的通行证、任务、奖励及报名记录
pub async fn delete_season(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AdminError> {
    let result = sqlx::query("DELETE FROM seasons WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AdminError::SeasonNotFound(id));
    }

    info!(season_id = id, "Season deleted");

    Ok(Json(ApiResponse::<()>::success_empty()))
}
