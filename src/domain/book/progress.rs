//! Book Context - 阅读进度状态机
//!
//! NotRead → Reading → Read → Reading → …
//! 时间戳与状态由类型绑定：Reading 必有开始时间，Read 必有开始与结束时间。

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{BookError, ReadState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReadProgress {
    NotRead,
    Reading {
        start_at: DateTime<Utc>,
    },
    Read {
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    },
}

impl Default for ReadProgress {
    fn default() -> Self {
        ReadProgress::NotRead
    }
}

impl ReadProgress {
    /// 从存储的三元组还原，状态与时间戳不一致时报错
    pub fn from_parts(
        state: ReadState,
        start_at: Option<DateTime<Utc>>,
        end_at: Option<DateTime<Utc>>,
    ) -> Result<Self, BookError> {
        match (state, start_at, end_at) {
            (ReadState::NotRead, None, None) => Ok(ReadProgress::NotRead),
            (ReadState::Reading, Some(start_at), None) => Ok(ReadProgress::Reading { start_at }),
            (ReadState::Read, Some(start_at), Some(end_at)) => {
                Ok(ReadProgress::Read { start_at, end_at })
            }
            (state, start_at, end_at) => Err(BookError::BadReadState(format!(
                "{} with start_at={:?} end_at={:?}",
                state, start_at, end_at
            ))),
        }
    }

    /// 由用户提交的时间戳推导状态（更新书籍时使用）
    ///
    /// - 都为空 ⇒ NotRead
    /// - 仅有开始 ⇒ Reading
    /// - 都有 ⇒ Read（结束不得早于开始）
    /// - 仅有结束 ⇒ 错误
    pub fn from_timestamps(
        start_at: Option<DateTime<Utc>>,
        end_at: Option<DateTime<Utc>>,
    ) -> Result<Self, BookError> {
        match (start_at, end_at) {
            (None, None) => Ok(ReadProgress::NotRead),
            (Some(start_at), None) => Ok(ReadProgress::Reading { start_at }),
            (Some(start_at), Some(end_at)) if end_at >= start_at => {
                Ok(ReadProgress::Read { start_at, end_at })
            }
            (Some(_), Some(_)) => Err(BookError::BadReadState(
                "end_at is earlier than start_at".to_string(),
            )),
            (None, Some(_)) => Err(BookError::BadReadState(
                "end_at is set without start_at".to_string(),
            )),
        }
    }

    pub fn state(&self) -> ReadState {
        match self {
            ReadProgress::NotRead => ReadState::NotRead,
            ReadProgress::Reading { .. } => ReadState::Reading,
            ReadProgress::Read { .. } => ReadState::Read,
        }
    }

    pub fn start_at(&self) -> Option<DateTime<Utc>> {
        match self {
            ReadProgress::NotRead => None,
            ReadProgress::Reading { start_at } | ReadProgress::Read { start_at, .. } => {
                Some(*start_at)
            }
        }
    }

    pub fn end_at(&self) -> Option<DateTime<Utc>> {
        match self {
            ReadProgress::Read { end_at, .. } => Some(*end_at),
            _ => None,
        }
    }

    /// 单一切换操作
    ///
    /// - NotRead → Reading: 开始时间为 now
    /// - Reading → Read: 结束时间为 now
    /// - Read → Reading: 重新开始，清除结束时间；开始时间一定晚于上次开始
    pub fn toggle(&self, now: DateTime<Utc>) -> Self {
        match *self {
            ReadProgress::NotRead => ReadProgress::Reading { start_at: now },
            ReadProgress::Reading { start_at } => ReadProgress::Read {
                start_at,
                end_at: now.max(start_at),
            },
            // 重新开始的时间不早于上次结束，且严格晚于上次开始（存储精度为微秒）
            ReadProgress::Read { start_at, end_at } => ReadProgress::Reading {
                start_at: now.max(end_at).max(start_at + Duration::microseconds(1)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_toggle_cycle() {
        let progress = ReadProgress::NotRead;

        let reading = progress.toggle(at(1));
        assert_eq!(reading, ReadProgress::Reading { start_at: at(1) });
        assert_eq!(reading.end_at(), None);

        let read = reading.toggle(at(2));
        assert_eq!(
            read,
            ReadProgress::Read {
                start_at: at(1),
                end_at: at(2)
            }
        );

        let reopened = read.toggle(at(3));
        assert_eq!(reopened, ReadProgress::Reading { start_at: at(3) });
        assert_eq!(reopened.state(), ReadState::Reading);
    }

    #[test]
    fn test_reopen_produces_later_start() {
        let read = ReadProgress::Read {
            start_at: at(1),
            end_at: at(2),
        };
        let reopened = read.toggle(at(2) + Duration::seconds(1));
        assert!(reopened.start_at().unwrap() > read.start_at().unwrap());
        assert!(reopened.end_at().is_none());
    }

    #[test]
    fn test_reopen_with_lagging_clock_still_moves_forward() {
        let read = ReadProgress::Read {
            start_at: at(5),
            end_at: at(6),
        };
        let reopened = read.toggle(at(1));
        assert_eq!(reopened.start_at(), Some(at(6)));

        let instant = ReadProgress::Read {
            start_at: at(5),
            end_at: at(5),
        };
        let reopened = instant.toggle(at(5));
        assert_eq!(reopened.start_at(), Some(at(5) + Duration::microseconds(1)));
    }

    #[test]
    fn test_states_follow_cycle() {
        let mut progress = ReadProgress::NotRead;
        let expected = [
            ReadState::Reading,
            ReadState::Read,
            ReadState::Reading,
            ReadState::Read,
        ];
        for (i, state) in expected.iter().enumerate() {
            progress = progress.toggle(at(i as u32 + 1));
            assert_eq!(progress.state(), *state);
        }
    }

    #[test]
    fn test_from_parts_rejects_inconsistent_rows() {
        assert!(ReadProgress::from_parts(ReadState::NotRead, Some(at(1)), None).is_err());
        assert!(ReadProgress::from_parts(ReadState::Reading, None, None).is_err());
        assert!(ReadProgress::from_parts(ReadState::Reading, Some(at(1)), Some(at(2))).is_err());
        assert!(ReadProgress::from_parts(ReadState::Read, Some(at(1)), None).is_err());
        assert_eq!(
            ReadProgress::from_parts(ReadState::Read, Some(at(1)), Some(at(2))).unwrap(),
            ReadProgress::Read {
                start_at: at(1),
                end_at: at(2)
            }
        );
    }

    #[test]
    fn test_from_timestamps() {
        assert_eq!(
            ReadProgress::from_timestamps(None, None).unwrap(),
            ReadProgress::NotRead
        );
        assert_eq!(
            ReadProgress::from_timestamps(Some(at(1)), None).unwrap().state(),
            ReadState::Reading
        );
        assert_eq!(
            ReadProgress::from_timestamps(Some(at(1)), Some(at(4))).unwrap().state(),
            ReadState::Read
        );
        assert!(ReadProgress::from_timestamps(None, Some(at(4))).is_err());
        assert!(ReadProgress::from_timestamps(Some(at(4)), Some(at(1))).is_err());
    }
}
