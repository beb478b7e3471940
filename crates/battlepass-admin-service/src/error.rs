//! 通行证管理后台错误类型定义
//!
//! 包含所有 admin service 特有的错误类型

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use battlepass_progression::BattlePassError;

/// 管理后台错误类型
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    // 验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),

    // 资源不存在
    #[error("赛季不存在: {0}")]
    SeasonNotFound(i64),
    #[error("通行证不存在: {0}")]
    BattlePassNotFound(i64),
    #[error("任务不存在: {0}")]
    QuestNotFound(i64),
    #[error("奖励不存在: {0}")]
    RewardNotFound(i64),
    #[error("用户通行证不存在: {0}")]
    UserBattlePassNotFound(i64),
    #[error("用户 {jid} 在通行证 {battle_pass_id} 下没有报名记录")]
    EnrollmentNotFound { jid: i64, battle_pass_id: i64 },

    // 业务错误
    #[error("当前状态不可领取奖励")]
    NotClaimable,
    #[error("经验值必须在 1-10000 之间: {0}")]
    InvalidAmount(i64),
    #[error("用户已报名该通行证: jid={jid}, battle_pass_id={battle_pass_id}")]
    DuplicateEnrollment { jid: i64, battle_pass_id: i64 },
    #[error("通行证不存在或未启用: {0}")]
    BattlePassUnavailable(i64),
    #[error("记录已被其他请求修改，请重试")]
    ConcurrencyConflict,

    // 系统错误
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("内部错误: {0}")]
    Internal(String),
}

impl AdminError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::NotClaimable | Self::InvalidAmount(_) => {
                StatusCode::BAD_REQUEST
            }

            Self::SeasonNotFound(_)
            | Self::BattlePassNotFound(_)
            | Self::QuestNotFound(_)
            | Self::RewardNotFound(_)
            | Self::UserBattlePassNotFound(_)
            | Self::EnrollmentNotFound { .. }
            | Self::BattlePassUnavailable(_) => StatusCode::NOT_FOUND,

            Self::DuplicateEnrollment { .. } | Self::ConcurrencyConflict => StatusCode::CONFLICT,

            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::SeasonNotFound(_) => "SEASON_NOT_FOUND",
            Self::BattlePassNotFound(_) => "BATTLE_PASS_NOT_FOUND",
            Self::QuestNotFound(_) => "QUEST_NOT_FOUND",
            Self::RewardNotFound(_) => "REWARD_NOT_FOUND",
            Self::UserBattlePassNotFound(_) => "USER_BATTLE_PASS_NOT_FOUND",
            Self::EnrollmentNotFound { .. } => "RECORD_NOT_FOUND",
            Self::NotClaimable => "NOT_CLAIMABLE",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::DuplicateEnrollment { .. } => "DUPLICATE_ENROLLMENT",
            Self::BattlePassUnavailable(_) => "BATTLE_PASS_UNAVAILABLE",
            Self::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for AdminError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 从进度服务错误转换
impl From<BattlePassError> for AdminError {
    fn from(err: BattlePassError) -> Self {
        match err {
            BattlePassError::RecordNotFound {
                jid,
                battle_pass_id,
            } => Self::EnrollmentNotFound {
                jid,
                battle_pass_id,
            },
            BattlePassError::UserBattlePassNotFound(id) => Self::UserBattlePassNotFound(id),
            BattlePassError::NotClaimable { .. } => Self::NotClaimable,
            BattlePassError::InvalidAmount(amount) => Self::InvalidAmount(amount),
            BattlePassError::DuplicateEnrollment {
                jid,
                battle_pass_id,
            } => Self::DuplicateEnrollment {
                jid,
                battle_pass_id,
            },
            BattlePassError::BattlePassUnavailable(id) => Self::BattlePassUnavailable(id),
            BattlePassError::ConcurrencyConflict => Self::ConcurrencyConflict,
            BattlePassError::Validation(msg) => Self::Validation(msg),
            BattlePassError::Database(e) => Self::Database(e),
            BattlePassError::Internal(msg) => Self::Internal(msg),
        }
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;
    use battlepass_progression::ProgressState;

    /// 所有可简单构造的变体及期望的 (StatusCode, error_code)
    fn all_error_variants() -> Vec<(AdminError, StatusCode, &'static str)> {
        vec![
            (AdminError::Validation("name is required".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (AdminError::SeasonNotFound(1), StatusCode::NOT_FOUND, "SEASON_NOT_FOUND"),
            (AdminError::BattlePassNotFound(2), StatusCode::NOT_FOUND, "BATTLE_PASS_NOT_FOUND"),
            (AdminError::QuestNotFound(3), StatusCode::NOT_FOUND, "QUEST_NOT_FOUND"),
            (AdminError::RewardNotFound(4), StatusCode::NOT_FOUND, "REWARD_NOT_FOUND"),
            (AdminError::UserBattlePassNotFound(5), StatusCode::NOT_FOUND, "USER_BATTLE_PASS_NOT_FOUND"),
            (
                AdminError::EnrollmentNotFound { jid: 1001, battle_pass_id: 7 },
                StatusCode::NOT_FOUND,
                "RECORD_NOT_FOUND",
            ),
            (AdminError::NotClaimable, StatusCode::BAD_REQUEST, "NOT_CLAIMABLE"),
            (AdminError::InvalidAmount(0), StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            (
                AdminError::DuplicateEnrollment { jid: 1001, battle_pass_id: 7 },
                StatusCode::CONFLICT,
                "DUPLICATE_ENROLLMENT",
            ),
            (AdminError::BattlePassUnavailable(7), StatusCode::NOT_FOUND, "BATTLE_PASS_UNAVAILABLE"),
            (AdminError::ConcurrencyConflict, StatusCode::CONFLICT, "CONCURRENCY_CONFLICT"),
            (AdminError::Internal("unexpected state".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        ]
    }

    #[test]
    fn test_all_variants_status_code_and_error_code() {
        for (error, expected_status, expected_code) in all_error_variants() {
            assert_eq!(error.status_code(), expected_status, "状态码不匹配: {expected_code}");
            assert_eq!(error.error_code(), expected_code);
        }
    }

    #[tokio::test]
    async fn test_into_response_body_structure() {
        for (error, expected_status, expected_code) in all_error_variants() {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);

            let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("读取响应体失败");
            let body: serde_json::Value =
                serde_json::from_slice(&body_bytes).expect("响应体不是合法 JSON");

            assert_eq!(body["success"], json!(false));
            assert_eq!(body["code"], json!(expected_code));
            assert!(!body["message"].as_str().unwrap_or("").is_empty());
            assert!(body["data"].is_null());
        }
    }

    #[tokio::test]
    async fn test_system_errors_hide_internal_details() {
        let response = AdminError::Internal("stack overflow at module X".into()).into_response();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        let message = body["message"].as_str().unwrap();

        assert!(!message.contains("stack overflow"));
        assert!(message.contains("服务内部错误"));
    }

    #[test]
    fn test_from_validation_errors() {
        use validator::{ValidationError, ValidationErrors};

        let mut errors = ValidationErrors::new();
        errors.add("name", ValidationError::new("length"));

        let admin_error: AdminError = errors.into();
        match &admin_error {
            AdminError::Validation(msg) => assert!(msg.contains("name")),
            other => panic!("期望 Validation 变体，实际: {:?}", other),
        }
        assert_eq!(admin_error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_from_battle_pass_error() {
        let err: AdminError = BattlePassError::RecordNotFound {
            jid: 1001,
            battle_pass_id: 7,
        }
        .into();
        assert_eq!(err.error_code(), "RECORD_NOT_FOUND");
        assert!(err.to_string().contains("1001"));

        let err: AdminError = BattlePassError::NotClaimable {
            jid: 1001,
            battle_pass_id: 7,
            state: ProgressState::CompletedClaimed,
        }
        .into();
        assert!(matches!(err, AdminError::NotClaimable));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err: AdminError = BattlePassError::InvalidAmount(-5).into();
        assert_eq!(err.error_code(), "INVALID_AMOUNT");

        let err: AdminError = BattlePassError::DuplicateEnrollment {
            jid: 1,
            battle_pass_id: 2,
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err: AdminError = BattlePassError::BattlePassUnavailable(9).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: AdminError = BattlePassError::ConcurrencyConflict.into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err: AdminError = BattlePassError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, AdminError::Database(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
