use std::fmt;
use std::str::FromStr;

use time::{Date, Duration, Month};

/// Granularity of the visible period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodView {
    #[default]
    Day,
    Week,
    Month,
}

impl PeriodView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for PeriodView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodView {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Inclusive date window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: Date,
    pub end: Date,
}

impl Period {
    /// Window of `view` containing `anchor`
    pub fn of(view: PeriodView, anchor: Date) -> Self {
        match view {
            PeriodView::Day => Self {
                start: anchor,
                end: anchor,
            },
            PeriodView::Week => Self {
                start: week_start(anchor),
                end: week_end(anchor),
            },
            PeriodView::Month => Self {
                start: month_start(anchor),
                end: month_end(anchor),
            },
        }
    }

    /// Inclusive intersection test against `[start, end]`
    pub fn overlaps(&self, start: Date, end: Date) -> bool {
        start <= self.end && end >= self.start
    }

    pub fn label(&self, view: PeriodView) -> String {
        match view {
            PeriodView::Day => self.start.to_string(),
            PeriodView::Week => format!("{} ~ {}", self.start, self.end),
            PeriodView::Month => {
                format!("{:04}-{:02}", self.start.year(), u8::from(self.start.month()))
            }
        }
    }
}

/// Monday of the week containing `date`
pub fn week_start(date: Date) -> Date {
    date - Duration::days(date.weekday().number_days_from_monday() as i64)
}

/// Sunday of the week containing `date`
pub fn week_end(date: Date) -> Date {
    week_start(date) + Duration::days(6)
}

pub fn month_start(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

pub fn month_end(date: Date) -> Date {
    let days = date.month().length(date.year());
    date.replace_day(days).unwrap_or(date)
}

/// Same day `months` months away, clamped to the target month's last day
pub fn shift_months(date: Date, months: i32) -> Date {
    let index = date.year() * 12 + (u8::from(date.month()) as i32 - 1) + months;
    let year = index.div_euclid(12);
    let month = Month::try_from((index.rem_euclid(12) + 1) as u8).unwrap_or(Month::January);
    let day = date.day().min(month.length(year));

    Date::from_calendar_date(year, month, day).unwrap_or(date)
}

/// Anchor one view unit away from `anchor`
pub fn navigate(view: PeriodView, anchor: Date, direction: Direction) -> Date {
    let step: i32 = match direction {
        Direction::Previous => -1,
        Direction::Next => 1,
    };

    let moved = match view {
        PeriodView::Day => anchor.checked_add(Duration::days(step as i64)),
        PeriodView::Week => anchor.checked_add(Duration::days(7 * step as i64)),
        PeriodView::Month => Some(shift_months(anchor, step)),
    };
    moved.unwrap_or(anchor)
}
