//! Book Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    #[error("invalid status: {0}")]
    InvalidStatus(i64),

    #[error("invalid read status: {0}")]
    InvalidStatusName(String),

    #[error("bad read state: {0}")]
    BadReadState(String),

    #[error("invalid title: {0}")]
    InvalidTitle(String),

    #[error("invalid name: {0}")]
    InvalidName(String),
}
