//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::{handlers, state::AppState};

/// 构建通行证目录路由
///
/// 包含赛季、通行证、任务、奖励的 CRUD 操作路由
fn catalog_routes() -> Router<AppState> {
    Router::new()
        // 赛季管理
        .route("/seasons", get(handlers::season::list_seasons))
        .route("/seasons", post(handlers::season::create_season))
        .route("/seasons/{id}", get(handlers::season::get_season))
        .route("/seasons/{id}", put(handlers::season::update_season))
        .route("/seasons/{id}", delete(handlers::season::delete_season))
        // 通行证管理
        .route(
            "/battle-passes",
            get(handlers::battle_pass::list_battle_passes),
        )
        .route(
            "/battle-passes",
            post(handlers::battle_pass::create_battle_pass),
        )
        .route(
            "/battle-passes/{id}",
            get(handlers::battle_pass::get_battle_pass),
        )
        .route(
            "/battle-passes/{id}",
            put(handlers::battle_pass::update_battle_pass),
        )
        .route(
            "/battle-passes/{id}",
            delete(handlers::battle_pass::delete_battle_pass),
        )
        // 任务管理
        .route("/quests", get(handlers::quest::list_quests))
        .route("/quests", post(handlers::quest::create_quest))
        .route("/quests/{id}", get(handlers::quest::get_quest))
        .route("/quests/{id}", put(handlers::quest::update_quest))
        .route("/quests/{id}", delete(handlers::quest::delete_quest))
        // 奖励管理
        .route("/rewards", get(handlers::reward::list_rewards))
        .route("/rewards", post(handlers::reward::create_reward))
        .route("/rewards/{id}", get(handlers::reward::get_reward))
        .route("/rewards/{id}", put(handlers::reward::update_reward))
        .route("/rewards/{id}", delete(handlers::reward::delete_reward))
}

/// 构建用户通行证管理路由
fn user_battle_pass_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/user-battle-passes",
            get(handlers::user_battle_pass::list_user_battle_passes),
        )
        .route(
            "/user-battle-passes",
            post(handlers::user_battle_pass::create_user_battle_pass),
        )
        .route(
            "/user-battle-passes/{id}",
            get(handlers::user_battle_pass::get_user_battle_pass),
        )
        .route(
            "/user-battle-passes/{id}",
            put(handlers::user_battle_pass::update_user_battle_pass),
        )
        .route(
            "/user-battle-passes/{id}",
            delete(handlers::user_battle_pass::delete_user_battle_pass),
        )
}

/// 构建用户进度路由
///
/// 包含用户维度查询、加经验和领奖
fn progression_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{jid}/battle-passes",
            get(handlers::progression::list_user_battle_passes),
        )
        .route(
            "/users/{jid}/battle-passes/active",
            get(handlers::progression::list_active_user_battle_passes),
        )
        .route(
            "/users/{jid}/battle-passes/statistics",
            get(handlers::progression::get_user_statistics),
        )
        .route(
            "/users/{jid}/battle-passes/{battle_pass_id}/experience",
            post(handlers::progression::add_experience),
        )
        .route(
            "/users/{jid}/battle-passes/{battle_pass_id}/claim-reward",
            post(handlers::progression::claim_reward),
        )
        // 通行证维度视图
        .route(
            "/battle-passes/{id}/users",
            get(handlers::leaderboard::list_battle_pass_users),
        )
        .route(
            "/battle-passes/{id}/leaderboard",
            get(handlers::leaderboard::get_leaderboard),
        )
}

/// 构建批量操作路由
fn bulk_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/bulk/battle-passes/assign",
            post(handlers::bulk::bulk_assign),
        )
        .route(
            "/bulk/battle-passes/experience",
            post(handlers::bulk::bulk_add_experience),
        )
}

/// 构建完整的 API 路由
///
/// 所有路由挂载在 /api/admin 前缀下
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .merge(user_battle_pass_routes())
        .merge(progression_routes())
        .merge(bulk_routes())
}
