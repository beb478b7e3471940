//! 管理后台请求 DTO 定义
//!
//! 所有 REST API 的请求参数和请求体结构

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use battlepass_progression::dto::EnrollRequest;
use battlepass_progression::{BattlePassType, EnrollmentStatus, PassType, QuestType, RewardType};

/// 创建赛季请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_season_dates"))]
pub struct CreateSeasonRequest {
    #[validate(length(min = 1, max = 255, message = "赛季名称长度必须在1-255个字符之间"))]
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

fn validate_season_dates(req: &CreateSeasonRequest) -> Result<(), ValidationError> {
    check_date_range(req.start_date, req.end_date)
}

/// 更新赛季请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_season_update_dates"))]
pub struct UpdateSeasonRequest {
    #[validate(length(min = 1, max = 255, message = "赛季名称长度必须在1-255个字符之间"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

fn validate_season_update_dates(req: &UpdateSeasonRequest) -> Result<(), ValidationError> {
    check_date_range(req.start_date, req.end_date)
}

/// 结束时间不得早于开始时间（两者都提供时才校验）
pub fn check_date_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            let mut err = ValidationError::new("date_range");
            err.message = Some("结束时间不能早于开始时间".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

/// 创建通行证请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBattlePassRequest {
    pub season_id: i64,
    #[validate(length(min = 1, max = 255, message = "通行证名称长度必须在1-255个字符之间"))]
    pub name: String,
    pub is_active: Option<bool>,
    #[serde(rename = "type")]
    pub pass_type: Option<BattlePassType>,
}

/// 更新通行证请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBattlePassRequest {
    pub season_id: Option<i64>,
    #[validate(length(min = 1, max = 255, message = "通行证名称长度必须在1-255个字符之间"))]
    pub name: Option<String>,
    pub is_active: Option<bool>,
    #[serde(rename = "type")]
    pub pass_type: Option<BattlePassType>,
}

/// 创建任务请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestRequest {
    pub battle_pass_id: i64,
    #[validate(length(min = 1, max = 255, message = "任务名称长度必须在1-255个字符之间"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub quest_type: QuestType,
    #[validate(length(max = 255, message = "任务动作不能超过255个字符"))]
    pub required_action: Option<String>,
    #[validate(range(min = 1, message = "所需次数至少为1"))]
    pub required_count: Option<i32>,
    pub is_active: Option<bool>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// 更新任务请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestRequest {
    pub battle_pass_id: Option<i64>,
    #[validate(length(min = 1, max = 255, message = "任务名称长度必须在1-255个字符之间"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub quest_type: Option<QuestType>,
    #[validate(length(max = 255, message = "任务动作不能超过255个字符"))]
    pub required_action: Option<String>,
    #[validate(range(min = 1, message = "所需次数至少为1"))]
    pub required_count: Option<i32>,
    pub is_active: Option<bool>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// 创建奖励请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRewardRequest {
    pub quest_id: i64,
    #[serde(rename = "type")]
    pub reward_type: RewardType,
    #[validate(length(min = 1, max = 255, message = "奖励名称长度必须在1-255个字符之间"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "奖励积分不能为负数"))]
    pub reward_points: i32,
    #[validate(length(max = 255, message = "奖励道具不能超过255个字符"))]
    pub reward_item: Option<String>,
    pub is_active: Option<bool>,
}

/// 更新奖励请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRewardRequest {
    pub quest_id: Option<i64>,
    #[serde(rename = "type")]
    pub reward_type: Option<RewardType>,
    #[validate(length(min = 1, max = 255, message = "奖励名称长度必须在1-255个字符之间"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "奖励积分不能为负数"))]
    pub reward_points: Option<i32>,
    #[validate(length(max = 255, message = "奖励道具不能超过255个字符"))]
    pub reward_item: Option<String>,
    pub is_active: Option<bool>,
    pub is_claimed: Option<bool>,
}

/// 创建用户通行证（报名）请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBattlePassRequest {
    pub jid: i64,
    pub battle_pass_id: i64,
    #[serde(default, rename = "type")]
    pub pass_type: PassType,
    #[serde(default)]
    pub is_premium: bool,
    #[validate(range(min = 1, max = 1000, message = "等级上限必须在1-1000之间"))]
    pub total_levels: Option<i32>,
    #[validate(length(max = 255, message = "名称不能超过255个字符"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<CreateUserBattlePassRequest> for EnrollRequest {
    fn from(req: CreateUserBattlePassRequest) -> Self {
        Self {
            jid: req.jid,
            battle_pass_id: req.battle_pass_id,
            pass_type: req.pass_type,
            is_premium: req.is_premium,
            total_levels: req.total_levels,
            name: req.name,
            description: req.description,
        }
    }
}

/// 更新用户通行证请求
///
/// 仅允许修改描述性和管理字段，经验、等级、领奖状态只能经由进度接口变更
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserBattlePassRequest {
    #[validate(length(max = 255, message = "名称不能超过255个字符"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<EnrollmentStatus>,
    pub is_active: Option<bool>,
    pub is_visible: Option<bool>,
    pub is_active_for_user: Option<bool>,
    pub ended_at: Option<DateTime<Utc>>,
    #[validate(range(min = 1, max = 1000, message = "等级上限必须在1-1000之间"))]
    pub total_levels: Option<i32>,
}

/// 加经验请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddExperienceRequest {
    pub experience: i64,
}

/// 批量报名请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkAssignRequest {
    #[validate(length(min = 1, max = 1000, message = "用户列表长度必须在1-1000之间"))]
    pub jids: Vec<i64>,
    pub battle_pass_id: i64,
}

/// 批量加经验请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkExperienceRequest {
    #[validate(length(min = 1, max = 1000, message = "用户列表长度必须在1-1000之间"))]
    pub jids: Vec<i64>,
    pub battle_pass_id: i64,
    /// 经验范围由进度服务校验，越界返回 INVALID_AMOUNT
    pub experience: i64,
}

/// 分页查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationParams {
    /// 计算数据库查询的 offset
    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0) * self.limit()
    }

    /// 获取限制条数（最大100）
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, 100)
    }
}

/// 任务列表过滤
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestFilter {
    pub battle_pass_id: Option<i64>,
}

/// 奖励列表过滤
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardFilter {
    pub quest_id: Option<i64>,
}

/// 用户通行证列表过滤
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBattlePassFilter {
    pub jid: Option<i64>,
    pub status: Option<EnrollmentStatus>,
    pub is_active: Option<bool>,
    pub is_completed: Option<bool>,
}
