use time::{Date, OffsetDateTime, Time};

use crate::models::{WorkLogId, WorkStatus};

/// A work log as the task manager sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: WorkLogId,
    pub project_content: String,
    pub status: WorkStatus,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub start_time: Time,
    pub end_time: Time,
    pub memo: String,
    pub mood: String,
    pub weather: String,
    pub created_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
}

impl Task {
    /// Inclusive day range the task covers; a missing end date means a single day
    pub fn span(&self) -> (Date, Date) {
        let end = self.end_date.unwrap_or(self.start_date);
        if end < self.start_date {
            (end, self.start_date)
        } else {
            (self.start_date, end)
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status == WorkStatus::Closed
    }
}
