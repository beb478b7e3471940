//! 用户进度 API 处理器
//!
//! 用户维度的查询、加经验与领取通行证奖励

use axum::{
    Json,
    extract::{Path, State},
};

use battlepass_progression::dto::{ClaimResult, ExperienceResult};
use battlepass_progression::{UserBattlePass, UserBattlePassStatistics};

use crate::{
    dto::{AddExperienceRequest, ApiResponse},
    error::AdminError,
    state::AppState,
};

/// 获取用户全部通行证（新报名在前）
///
/// GET /api/admin/users/{jid}/battle-passes
pub async fn list_user_battle_passes(
    State(state): State<AppState>,
    Path(jid): Path<i64>,
) -> Result<Json<ApiResponse<Vec<UserBattlePass>>>, AdminError> {
    let records = state.progression.user_battle_passes(jid).await?;
    Ok(Json(ApiResponse::success(records)))
}

/// 获取用户有效通行证
///
/// GET /api/admin/users/{jid}/battle-passes/active
pub async fn list_active_user_battle_passes(
    State(state): State<AppState>,
    Path(jid): Path<i64>,
) -> Result<Json<ApiResponse<Vec<UserBattlePass>>>, AdminError> {
    let records = state.progression.active_user_battle_passes(jid).await?;
    Ok(Json(ApiResponse::success(records)))
}

/// 获取用户通行证统计
///
/// GET /api/admin/users/{jid}/battle-passes/statistics
pub async fn get_user_statistics(
    State(state): State<AppState>,
    Path(jid): Path<i64>,
) -> Result<Json<ApiResponse<UserBattlePassStatistics>>, AdminError> {
    let stats = state.progression.statistics(jid).await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// 为用户增加通行证经验
///
/// POST /api/admin/users/{jid}/battle-passes/{battle_pass_id}/experience
pub async fn add_experience(
    State(state): State<AppState>,
    Path((jid, battle_pass_id)): Path<(i64, i64)>,
    Json(req): Json<AddExperienceRequest>,
) -> Result<Json<ApiResponse<ExperienceResult>>, AdminError> {
    let result = state
        .progression
        .add_experience(jid, battle_pass_id, req.experience)
        .await?;

    let message = if result.level_up {
        "经验已增加，等级提升"
    } else {
        "经验已增加"
    };
    Ok(Json(ApiResponse::success_with_message(result, message)))
}

/// 领取通行证奖励
///
/// POST /api/admin/users/{jid}/battle-passes/{battle_pass_id}/claim-reward
pub async fn claim_reward(
    State(state): State<AppState>,
    Path((jid, battle_pass_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<ClaimResult>>, AdminError> {
    let result = state.progression.claim_reward(jid, battle_pass_id).await?;
    Ok(Json(ApiResponse::success_with_message(result, "奖励领取成功")))
}
