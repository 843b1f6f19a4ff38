//! Identity - 身份校验实现
//!
//! - StaticTokenVerifier: 配置中的 token → 账户映射
//! - FixedAccountVerifier: 开发模式，所有请求视为同一账户

use async_trait::async_trait;
use std::collections::HashMap;

use crate::application::ports::{IdentityError, IdentityVerifierPort};
use crate::domain::AccountId;

/// 静态 token 校验
pub struct StaticTokenVerifier {
    tokens: HashMap<String, AccountId>,
}

impl StaticTokenVerifier {
    pub fn new(tokens: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            tokens: tokens
                .into_iter()
                .map(|(token, account)| (token, AccountId::new(account)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityVerifierPort for StaticTokenVerifier {
    async fn verify(&self, credential: &str) -> Result<AccountId, IdentityError> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(IdentityError::MissingCredential);
        }

        self.tokens
            .get(credential)
            .cloned()
            .ok_or(IdentityError::InvalidCredential)
    }
}

/// 固定账户（开发模式），忽略凭证内容
pub struct FixedAccountVerifier {
    account_id: AccountId,
}

impl FixedAccountVerifier {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: AccountId::new(account_id),
        }
    }
}

#[async_trait]
impl IdentityVerifierPort for FixedAccountVerifier {
    async fn verify(&self, _credential: &str) -> Result<AccountId, IdentityError> {
        Ok(self.account_id.clone())
    }
}
