//! 管理后台响应 DTO 定义
//!
//! 所有 REST API 的响应体结构

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use battlepass_progression::BattlePassType;

/// 分页响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> PageResponse<T> {
    /// 创建分页响应
    pub fn new(items: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total + page_size - 1) / page_size
        } else {
            0
        };

        Self {
            items,
            total,
            page,
            page_size,
            total_pages,
        }
    }

    /// 创建空分页响应
    pub fn empty(page: i64, page_size: i64) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page,
            page_size,
            total_pages: 0,
        }
    }
}

/// API 统一响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }

    /// 创建成功响应（无数据）
    pub fn success_empty() -> ApiResponse<()> {
        ApiResponse {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: None,
        }
    }

    /// 创建成功响应（自定义消息）
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

/// 通行证响应 DTO
///
/// 附带所属赛季名称与任务数量
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattlePassDto {
    pub id: i64,
    pub name: String,
    pub season_id: i64,
    pub season_name: String,
    pub is_active: bool,
    #[serde(rename = "type")]
    pub pass_type: BattlePassType,
    pub quest_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_response_total_pages() {
        let page = PageResponse::new(vec![1, 2, 3], 45, 1, 20);
        assert_eq!(page.total_pages, 3);

        let page: PageResponse<i32> = PageResponse::new(vec![], 0, 1, 0);
        assert_eq!(page.total_pages, 0);

        let page: PageResponse<i32> = PageResponse::empty(2, 10);
        assert_eq!(page.total, 0);
        assert_eq!(page.page, 2);
    }

    #[test]
    fn test_api_response_serialization() {
        let json = serde_json::to_value(ApiResponse::success(vec![1])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["code"], "SUCCESS");
        assert_eq!(json["data"][0], 1);

        let json = serde_json::to_value(ApiResponse::<()>::success_empty()).unwrap();
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_battle_pass_dto_type_field() {
        let dto = BattlePassDto {
            id: 1,
            name: "Season 1 Pass".to_string(),
            season_id: 1,
            season_name: "Season 1".to_string(),
            is_active: true,
            pass_type: BattlePassType::Premium,
            quest_count: 4,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["type"], "premium");
        assert_eq!(json["seasonName"], "Season 1");
        assert_eq!(json["questCount"], 4);
    }
}
