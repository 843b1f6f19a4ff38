//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::RepositoryError;
use crate::domain::{BookError, StatsError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 并发修改冲突
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 内部错误（不变量被破坏、事务中断等）
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建冲突错误
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(what) => Self::NotFound {
                resource_type: "Entity",
                id: what,
            },
            RepositoryError::Duplicate(what) => Self::Conflict(format!("already exists: {what}")),
            RepositoryError::TransactionAborted(msg) => Self::InternalError(msg),
            RepositoryError::SerializationError(msg) => Self::InternalError(msg),
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<BookError> for ApplicationError {
    fn from(err: BookError) -> Self {
        match err {
            // 存储中出现未知状态值属于不变量破坏
            BookError::InvalidStatus(_) => Self::InternalError(err.to_string()),
            _ => Self::ValidationError(err.to_string()),
        }
    }
}

impl From<StatsError> for ApplicationError {
    fn from(err: StatsError) -> Self {
        Self::ValidationError(err.to_string())
    }
}
