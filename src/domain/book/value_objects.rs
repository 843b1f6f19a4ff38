//! Book Context - Value Objects

use serde::{Deserialize, Serialize};

use super::BookError;

/// 账户标识（由身份提供方签发，原样信任）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 书名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub fn new(title: impl Into<String>) -> Result<Self, BookError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(BookError::InvalidTitle("title cannot be empty".to_string()));
        }
        if title.chars().count() > 500 {
            return Err(BookError::InvalidTitle(
                "title cannot exceed 500 characters".to_string(),
            ));
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// 阅读状态
///
/// 存储值沿用 1/2/3 编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadState {
    NotRead,
    Reading,
    Read,
}

impl ReadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadState::NotRead => "not_read",
            ReadState::Reading => "reading",
            ReadState::Read => "read",
        }
    }

    /// 解析外部输入（查询参数）
    pub fn parse(s: &str) -> Result<Self, BookError> {
        match s {
            "not_read" => Ok(ReadState::NotRead),
            "reading" => Ok(ReadState::Reading),
            "read" => Ok(ReadState::Read),
            other => Err(BookError::InvalidStatusName(other.to_string())),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            ReadState::NotRead => 1,
            ReadState::Reading => 2,
            ReadState::Read => 3,
        }
    }

    /// 从存储值还原，未知值视为 invalid status
    pub fn from_code(code: i64) -> Result<Self, BookError> {
        match code {
            1 => Ok(ReadState::NotRead),
            2 => Ok(ReadState::Reading),
            3 => Ok(ReadState::Read),
            other => Err(BookError::InvalidStatus(other)),
        }
    }
}

impl std::fmt::Display for ReadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_state_codes() {
        for state in [ReadState::NotRead, ReadState::Reading, ReadState::Read] {
            assert_eq!(ReadState::from_code(state.code()), Ok(state));
            assert_eq!(ReadState::parse(state.as_str()), Ok(state));
        }
    }

    #[test]
    fn test_unknown_code_is_invalid_status() {
        assert_eq!(ReadState::from_code(0), Err(BookError::InvalidStatus(0)));
        assert_eq!(ReadState::from_code(7), Err(BookError::InvalidStatus(7)));
    }

    #[test]
    fn test_unknown_status_name() {
        assert!(matches!(
            ReadState::parse("finished"),
            Err(BookError::InvalidStatusName(_))
        ));
    }

    #[test]
    fn test_title_validation() {
        assert!(Title::new("Dune").is_ok());
        assert!(Title::new("   ").is_err());
        assert!(Title::new("x".repeat(501)).is_err());
    }
}
