use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::macros::time;
use time::{Date, Duration, OffsetDateTime, Time};
use utoipa::ToSchema;
use uuid::Uuid;

/// Separator older clients used to pack the memo into the description (`content|||memo`)
pub const LEGACY_MEMO_SEPARATOR: &str = "|||";

pub const DEFAULT_START_TIME: Time = time!(09:00);
pub const DEFAULT_END_TIME: Time = time!(18:00);
pub const DEFAULT_MOOD: &str = "normal";
pub const DEFAULT_WEATHER: &str = "sunny";

/// Identifier of a work log, assigned by the server on create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkLogId(Uuid);

impl WorkLogId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for WorkLogId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<WorkLogId> for Uuid {
    fn from(id: WorkLogId) -> Self {
        id.0
    }
}

impl fmt::Display for WorkLogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for WorkLogId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Work status (`workType` on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum WorkStatus {
    Scheduled,
    InProgress,
    Closed,
}

impl WorkStatus {
    pub const ALL: [WorkStatus; 3] = [Self::Scheduled, Self::InProgress, Self::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in-progress",
            Self::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::InProgress => "In progress",
            Self::Closed => "Closed",
        }
    }

    /// Parse a stored `work_type` column.
    ///
    /// Rows written by the first release carry Korean labels; anything else
    /// unrecognised is read as scheduled so one bad row cannot hide the rest.
    pub fn from_stored(value: &str) -> Self {
        match value.parse() {
            Ok(status) => status,
            Err(_) => match value.trim() {
                "예정" => Self::Scheduled,
                "진행중" => Self::InProgress,
                "종료" => Self::Closed,
                other => {
                    tracing::warn!(work_type = %other, "Unknown stored work type, reading as scheduled");
                    Self::Scheduled
                }
            },
        }
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown work status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for WorkStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "in-progress" | "in_progress" | "inprogress" => Ok(Self::InProgress),
            "closed" => Ok(Self::Closed),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkLog {
    pub id: WorkLogId,
    pub date: Date,
    pub end_date: Option<Date>,
    pub start_time: Time,
    pub end_time: Time,
    pub work_type: WorkStatus,
    pub description: String,
    /// `None` only on legacy rows that predate the memo column
    pub memo: Option<String>,
    pub mood: Option<String>,
    pub weather: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Every mutable field of a work log; create and update both take the full set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkLogInput {
    pub date: Date,
    pub end_date: Option<Date>,
    pub start_time: Time,
    pub end_time: Time,
    pub work_type: WorkStatus,
    pub description: String,
    pub memo: String,
    pub mood: String,
    pub weather: String,
}

impl WorkLogInput {
    pub fn new(date: Date, work_type: WorkStatus, description: impl Into<String>) -> Self {
        Self {
            date,
            end_date: None,
            start_time: DEFAULT_START_TIME,
            end_time: DEFAULT_END_TIME,
            work_type,
            description: description.into(),
            memo: String::new(),
            mood: DEFAULT_MOOD.to_string(),
            weather: DEFAULT_WEATHER.to_string(),
        }
    }
}

/// Current UTC time truncated to microseconds, the finest precision every backend keeps
pub fn now_timestamp() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(now.microsecond() * 1_000)
        .unwrap_or(now)
}

/// Timestamp for a write to a record last touched at `previous`; always strictly later
pub fn next_timestamp(previous: OffsetDateTime) -> OffsetDateTime {
    let now = now_timestamp();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Split a legacy `content|||memo` description at the first separator.
///
/// Returns `None` when the text holds no separator. A user description that
/// legitimately contains the separator is indistinguishable from a packed one,
/// which is why only rows without a memo column value are ever split.
pub fn split_packed_description(description: &str) -> Option<(String, String)> {
    description
        .split_once(LEGACY_MEMO_SEPARATOR)
        .map(|(content, memo)| (content.to_string(), memo.to_string()))
}
