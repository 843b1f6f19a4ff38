//! Identity Port - 身份校验
//!
//! 给定 bearer 凭证，返回稳定的账户标识或拒绝。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::AccountId;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("missing credential")]
    MissingCredential,

    #[error("invalid credential")]
    InvalidCredential,
}

/// 身份校验端口，核心逻辑对返回的账户标识不做二次校验
#[async_trait]
pub trait IdentityVerifierPort: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<AccountId, IdentityError>;
}
