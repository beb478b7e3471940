//! 通行证维度视图
//!
//! 报名用户列表与排行榜

use axum::{
    Json,
    extract::{Path, State},
};

use battlepass_progression::UserBattlePass;
use battlepass_progression::dto::LeaderboardEntry;

use crate::{dto::ApiResponse, error::AdminError, state::AppState};

/// 获取通行证下所有报名用户（等级、经验倒序）
///
/// GET /api/admin/battle-passes/{id}/users
pub async fn list_battle_pass_users(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<UserBattlePass>>>, AdminError> {
    let records = state.progression.battle_pass_users(id).await?;
    Ok(Json(ApiResponse::success(records)))
}

/// 获取通行证排行榜（前 100 名）
///
/// GET /api/admin/battle-passes/{id}/leaderboard
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<LeaderboardEntry>>>, AdminError> {
    let board = state.progression.leaderboard(id).await?;
    Ok(Json(ApiResponse::success(board)))
}
