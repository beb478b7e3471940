//! 通行证进度服务错误类型
//!
//! 定义进度引擎与服务层的业务错误和系统错误。
//! 所有业务错误都不会改动记录，调用方可在请求边界直接恢复。

use thiserror::Error;

use crate::models::ProgressState;

/// 通行证进度错误类型
#[derive(Debug, Error)]
pub enum BattlePassError {
    // === 用户通行证相关错误 ===
    #[error("用户通行证不存在: jid={jid}, battle_pass_id={battle_pass_id}")]
    RecordNotFound { jid: i64, battle_pass_id: i64 },

    #[error("用户通行证不存在: {0}")]
    UserBattlePassNotFound(i64),

    #[error("当前状态不可领取奖励: jid={jid}, battle_pass_id={battle_pass_id}, state={state:?}")]
    NotClaimable {
        jid: i64,
        battle_pass_id: i64,
        state: ProgressState,
    },

    #[error("经验值无效: {0}")]
    InvalidAmount(i64),

    // === 报名相关错误 ===
    #[error("用户已报名该通行证: jid={jid}, battle_pass_id={battle_pass_id}")]
    DuplicateEnrollment { jid: i64, battle_pass_id: i64 },

    #[error("通行证不存在或未启用: {0}")]
    BattlePassUnavailable(i64),

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("参数校验失败: {0}")]
    Validation(String),

    #[error("内部错误: {0}")]
    Internal(String),

    #[error("并发冲突，请重试")]
    ConcurrencyConflict,
}

/// 进度服务 Result 类型别名
pub type Result<T> = std::result::Result<T, BattlePassError>;

impl BattlePassError {
    /// 检查是否为可重试的错误
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::ConcurrencyConflict)
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(
            self,
            Self::Database(_) | Self::Internal(_) | Self::ConcurrencyConflict
        )
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            Self::UserBattlePassNotFound(_) => "USER_BATTLE_PASS_NOT_FOUND",
            Self::NotClaimable { .. } => "NOT_CLAIMABLE",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::DuplicateEnrollment { .. } => "DUPLICATE_ENROLLMENT",
            Self::BattlePassUnavailable(_) => "BATTLE_PASS_UNAVAILABLE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_retryable() {
        assert!(BattlePassError::ConcurrencyConflict.is_retryable());
        assert!(BattlePassError::Database(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(!BattlePassError::InvalidAmount(0).is_retryable());
        assert!(
            !BattlePassError::DuplicateEnrollment {
                jid: 1,
                battle_pass_id: 2
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_error_is_business_error() {
        assert!(BattlePassError::BattlePassUnavailable(1).is_business_error());
        assert!(
            BattlePassError::NotClaimable {
                jid: 1,
                battle_pass_id: 2,
                state: ProgressState::InProgress
            }
            .is_business_error()
        );
        assert!(!BattlePassError::Internal("boom".to_string()).is_business_error());
        assert!(!BattlePassError::ConcurrencyConflict.is_business_error());
    }

    #[test]
    fn test_error_code() {
        assert_eq!(BattlePassError::InvalidAmount(-5).error_code(), "INVALID_AMOUNT");
        assert_eq!(
            BattlePassError::RecordNotFound {
                jid: 1,
                battle_pass_id: 2
            }
            .error_code(),
            "RECORD_NOT_FOUND"
        );
        assert_eq!(
            BattlePassError::ConcurrencyConflict.error_code(),
            "CONCURRENCY_CONFLICT"
        );
    }

    #[test]
    fn test_error_display() {
        let err = BattlePassError::DuplicateEnrollment {
            jid: 1001,
            battle_pass_id: 7,
        };
        assert!(err.to_string().contains("1001"));
        assert!(err.to_string().contains("7"));

        let err = BattlePassError::InvalidAmount(-5);
        assert!(err.to_string().contains("-5"));
    }
}
