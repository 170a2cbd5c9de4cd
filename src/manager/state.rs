use std::fmt;

use time::Date;

use crate::manager::period::{navigate, Direction, Period, PeriodView};
use crate::models::{WorkLogId, WorkStatus};

/// Status predicate applied on top of the period window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(WorkStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: WorkStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => f.write_str(status.as_str()),
        }
    }
}

/// Everything the task list display depends on besides the tasks themselves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub view: PeriodView,
    pub anchor: Date,
    pub filter: Option<StatusFilter>,
    pub editing: Option<WorkLogId>,
}

impl ViewState {
    pub fn new(anchor: Date) -> Self {
        Self {
            view: PeriodView::Day,
            anchor,
            filter: None,
            editing: None,
        }
    }

    pub fn period(&self) -> Period {
        Period::of(self.view, self.anchor)
    }

    pub fn navigate(&mut self, direction: Direction) {
        self.anchor = navigate(self.view, self.anchor, direction);
    }

    /// Select `filter`, or clear it when it is already active. Returns the new filter.
    pub fn toggle_filter(&mut self, filter: StatusFilter) -> Option<StatusFilter> {
        self.filter = if self.filter == Some(filter) {
            None
        } else {
            Some(filter)
        };
        self.filter
    }

    /// Filter that actually narrows the list, if any
    pub fn active_status(&self) -> Option<WorkStatus> {
        match self.filter {
            Some(StatusFilter::Only(status)) => Some(status),
            _ => None,
        }
    }

    pub fn begin_edit(&mut self, id: WorkLogId) {
        self.editing = Some(id);
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }
}
