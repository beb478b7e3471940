//! 批量操作 API 处理器
//!
//! 逐条执行单记录流程，单条失败不影响其他用户，失败项汇总返回

use axum::{Json, extract::State};
use validator::Validate;

use battlepass_progression::dto::{BulkAssignResult, BulkExperienceResult};

use crate::{
    dto::{ApiResponse, BulkAssignRequest, BulkExperienceRequest},
    error::AdminError,
    state::AppState,
};

/// 批量报名
///
/// POST /api/admin/bulk/battle-passes/assign
pub async fn bulk_assign(
    State(state): State<AppState>,
    Json(req): Json<BulkAssignRequest>,
) -> Result<Json<ApiResponse<BulkAssignResult>>, AdminError> {
    req.validate()?;

    let result = state
        .progression
        .bulk_assign(&req.jids, req.battle_pass_id)
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// 批量增加经验
///
/// POST /api/admin/bulk/battle-passes/experience
pub async fn bulk_add_experience(
    State(state): State<AppState>,
    Json(req): Json<BulkExperienceRequest>,
) -> Result<Json<ApiResponse<BulkExperienceResult>>, AdminError> {
    req.validate()?;

    let result = state
        .progression
        .bulk_add_experience(&req.jids, req.battle_pass_id, req.experience)
        .await?;

    Ok(Json(ApiResponse::success(result)))
}
