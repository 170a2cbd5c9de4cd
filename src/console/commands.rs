use time::macros::format_description;
use time::{Date, Time};

use worklog::manager::{PeriodView, StatusFilter};
use worklog::models::WorkStatus;

pub const HELP: &str = "\
Commands:
  day | week | month          switch the period view
  prev | next                 move one period back or forward
  goto YYYY-MM-DD             jump to a date
  range START END             pick a date range (anchor moves to START)
  filter all|scheduled|in-progress|closed
                              toggle a status filter (same filter again clears it)
  add                         add a task
  edit N                      edit task N of the list
  cancel                      leave edit mode
  complete N                  close task N with today as end date
  delete N                    delete task N
  reload                      fetch tasks from the server again
  help                        show this text
  quit                        exit

In forms, a blank answer keeps the shown value, '-' clears an optional field
and '!' abandons the form.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    View(PeriodView),
    Previous,
    Next,
    Goto(Date),
    Range(Date, Date),
    Filter(StatusFilter),
    Add,
    Edit(usize),
    Cancel,
    Complete(usize),
    Delete(usize),
    Reload,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}', type 'help' for the list")]
    Unknown(String),

    #[error("missing {0}")]
    MissingArgument(&'static str),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid task number '{0}'")]
    InvalidNumber(String),

    #[error("invalid filter '{0}', expected all, scheduled, in-progress or closed")]
    InvalidFilter(String),
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Err(CommandError::Empty);
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "day" => Command::View(PeriodView::Day),
        "week" => Command::View(PeriodView::Week),
        "month" => Command::View(PeriodView::Month),
        "prev" | "previous" => Command::Previous,
        "next" => Command::Next,
        "goto" => Command::Goto(parse_date(words.next().ok_or(CommandError::MissingArgument("date"))?)?),
        "range" => {
            let start = parse_date(words.next().ok_or(CommandError::MissingArgument("start date"))?)?;
            let end = parse_date(words.next().ok_or(CommandError::MissingArgument("end date"))?)?;
            Command::Range(start, end)
        }
        "filter" => Command::Filter(parse_filter(
            words.next().ok_or(CommandError::MissingArgument("filter"))?,
        )?),
        "add" => Command::Add,
        "edit" => Command::Edit(parse_position(words.next())?),
        "cancel" => Command::Cancel,
        "complete" | "done" => Command::Complete(parse_position(words.next())?),
        "delete" | "rm" => Command::Delete(parse_position(words.next())?),
        "reload" => Command::Reload,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(command)
}

pub fn parse_date(text: &str) -> Result<Date, CommandError> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| CommandError::InvalidDate(text.to_string()))
}

/// `HH:MM` or `HH:MM:SS`
pub fn parse_time(text: &str) -> Option<Time> {
    let text = text.trim();
    Time::parse(text, format_description!("[hour]:[minute]:[second]"))
        .or_else(|_| Time::parse(text, format_description!("[hour]:[minute]")))
        .ok()
}

pub fn parse_status(text: &str) -> Option<WorkStatus> {
    text.parse().ok()
}

fn parse_filter(text: &str) -> Result<StatusFilter, CommandError> {
    if text.eq_ignore_ascii_case("all") {
        return Ok(StatusFilter::All);
    }
    parse_status(text)
        .map(StatusFilter::Only)
        .ok_or_else(|| CommandError::InvalidFilter(text.to_string()))
}

fn parse_position(word: Option<&str>) -> Result<usize, CommandError> {
    let word = word.ok_or(CommandError::MissingArgument("task number"))?;
    match word.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidNumber(word.to_string())),
    }
}
