//! 用户通行证管理 API 处理器
//!
//! 创建即报名，走进度服务的报名规则；更新只允许修改描述与管理字段，
//! 经验、等级和领奖状态只能通过进度接口变更。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::info;
use validator::Validate;

use battlepass_progression::{USER_BATTLE_PASS_COLUMNS, UserBattlePass};

use crate::{
    dto::{
        ApiResponse, CreateUserBattlePassRequest, PageResponse, PaginationParams,
        UpdateUserBattlePassRequest, UserBattlePassFilter,
    },
    error::AdminError,
    state::AppState,
};

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::BIGINT IS NULL OR jid = $1)
      AND ($2::VARCHAR IS NULL OR status = $2)
      AND ($3::BOOLEAN IS NULL OR is_active = $3)
      AND ($4::BOOLEAN IS NULL OR is_completed = $4)
"#;

/// 创建用户通行证（报名）
///
/// POST /api/admin/user-battle-passes
pub async fn create_user_battle_pass(
    State(state): State<AppState>,
    Json(req): Json<CreateUserBattlePassRequest>,
) -> Result<Json<ApiResponse<UserBattlePass>>, AdminError> {
    req.validate()?;

    let record = state.progression.enroll(req.into()).await?;

    Ok(Json(ApiResponse::success(record)))
}

/// 获取用户通行证列表
///
/// GET /api/admin/user-battle-passes?jid=&status=&isActive=&isCompleted=
pub async fn list_user_battle_passes(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<UserBattlePassFilter>,
) -> Result<Json<ApiResponse<PageResponse<UserBattlePass>>>, AdminError> {
    let count_sql = format!("SELECT COUNT(*) FROM user_battle_passes {FILTER_CLAUSE}");
    let total: (i64,) = sqlx::query_as(&count_sql)
        .bind(filter.jid)
        .bind(filter.status)
        .bind(filter.is_active)
        .bind(filter.is_completed)
        .fetch_one(&state.pool)
        .await?;

    if total.0 == 0 {
        return Ok(Json(ApiResponse::success(PageResponse::empty(
            params.page,
            params.page_size,
        ))));
    }

    let sql = format!(
        "SELECT {USER_BATTLE_PASS_COLUMNS} FROM user_battle_passes {FILTER_CLAUSE} \
         ORDER BY created_at DESC, id DESC LIMIT $5 OFFSET $6"
    );
    let records = sqlx::query_as::<_, UserBattlePass>(&sql)
        .bind(filter.jid)
        .bind(filter.status)
        .bind(filter.is_active)
        .bind(filter.is_completed)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&state.pool)
        .await?;

    let response = PageResponse::new(records, total.0, params.page, params.page_size);
    Ok(Json(ApiResponse::success(response)))
}

/// 获取用户通行证详情
///
/// GET /api/admin/user-battle-passes/{id}
pub async fn get_user_battle_pass(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserBattlePass>>, AdminError> {
    let record = state.progression.user_battle_pass(id).await?;
    Ok(Json(ApiResponse::success(record)))
}

/// 更新用户通行证
///
/// PUT /api/admin/user-battle-passes/{id}
///
/// 写入带版本校验，与进度写入互斥
pub async fn update_user_battle_pass(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserBattlePassRequest>,
) -> Result<Json<ApiResponse<UserBattlePass>>, AdminError> {
    req.validate()?;

    let current = state.progression.user_battle_pass(id).await?;
    check_total_levels(&current, req.total_levels)?;

    let sql = format!(
        r#"
        UPDATE user_battle_passes
        SET
            name = COALESCE($3, name),
            description = COALESCE($4, description),
            status = COALESCE($5, status),
            is_active = COALESCE($6, is_active),
            is_visible = COALESCE($7, is_visible),
            is_active_for_user = COALESCE($8, is_active_for_user),
            ended_at = COALESCE($9, ended_at),
            total_levels = COALESCE($10, total_levels),
            version = version + 1,
            updated_at = NOW()
        WHERE id = $1 AND version = $2
        RETURNING {USER_BATTLE_PASS_COLUMNS}
        "#
    );
    let record = sqlx::query_as::<_, UserBattlePass>(&sql)
        .bind(id)
        .bind(current.version)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.status)
        .bind(req.is_active)
        .bind(req.is_visible)
        .bind(req.is_active_for_user)
        .bind(req.ended_at)
        .bind(req.total_levels)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AdminError::ConcurrencyConflict)?;

    info!(
        user_battle_pass_id = id,
        jid = record.jid,
        battle_pass_id = record.battle_pass_id,
        "User battle pass updated"
    );

    Ok(Json(ApiResponse::success(record)))
}

/// 等级上限不得低于当前等级
///
/// 未完成的记录要求上限严格高于当前等级，否则记录停在上限却无法领取奖励。
fn check_total_levels(current: &UserBattlePass, total_levels: Option<i32>) -> Result<(), AdminError> {
    match total_levels {
        Some(total) if total < current.level => Err(AdminError::Validation(format!(
            "等级上限 {} 不能低于当前等级 {}",
            total, current.level
        ))),
        Some(total) if total == current.level && !current.is_completed => {
            Err(AdminError::Validation(format!(
                "未完成的通行证等级上限 {} 必须高于当前等级 {}",
                total, current.level
            )))
        }
        _ => Ok(()),
    }
}

/// 删除用户通行证
///
/// DELETE /api/admin/user-battle-passes/{id}
pub async fn delete_user_battle_pass(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AdminError> {
    let result = sqlx::query("DELETE FROM user_battle_passes WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AdminError::UserBattlePassNotFound(id));
    }

    info!(user_battle_pass_id = id, "User battle pass deleted");

    Ok(Json(ApiResponse::<()>::success_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use battlepass_progression::PassType;
    use chrono::Utc;

    fn record(level: i32) -> UserBattlePass {
        let mut r = UserBattlePass::enroll(1001, 7, PassType::Standard, false, Utc::now());
        r.level = level;
        r
    }

    #[test]
    fn test_total_levels_below_current_level_rejected() {
        let err = check_total_levels(&record(5), Some(4)).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_total_levels_equal_to_level_rejected_when_not_completed() {
        let current = record(5);
        assert!(!current.is_completed);

        let err = check_total_levels(&current, Some(5)).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_total_levels_equal_to_level_accepted_when_completed() {
        let mut current = record(5);
        current.is_completed = true;
        current.total_levels = 5;

        assert!(check_total_levels(&current, Some(5)).is_ok());
    }

    #[test]
    fn test_total_levels_accepted() {
        assert!(check_total_levels(&record(5), Some(6)).is_ok());
        assert!(check_total_levels(&record(5), Some(50)).is_ok());
        assert!(check_total_levels(&record(5), None).is_ok());
    }
}
