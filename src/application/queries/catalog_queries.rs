//! Author / Publisher Queries

use crate::domain::AccountId;

#[derive(Debug, Clone)]
pub struct ListCountedAuthors {
    pub account_id: AccountId,
}

#[derive(Debug, Clone)]
pub struct ListCountedPublishers {
    pub account_id: AccountId,
}
