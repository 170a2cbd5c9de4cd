mod commands;
mod terminal;

use std::sync::Arc;

use anyhow::Context;
use time::{Date, Time};
use tracing_subscriber::EnvFilter;

use worklog::config::ClientConfig;
use worklog::manager::{Direction, TaskForm, TaskManager, UiEvent};
use worklog::models::{
    WorkLogId, WorkStatus, DEFAULT_END_TIME, DEFAULT_MOOD, DEFAULT_START_TIME, DEFAULT_WEATHER,
};
use worklog::services::HttpWorkLogApi;

use crate::commands::{
    parse_command, parse_date, parse_status, parse_time, Command, CommandError, HELP,
};
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they do not interleave with the task list
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env().context("Failed to load configuration")?;
    let api = HttpWorkLogApi::new(&config).context("Failed to create HTTP client")?;
    tracing::info!(url = %config.api_url(), "Using work log API");

    let terminal = Arc::new(Terminal::new());
    let mut manager = TaskManager::new(Arc::new(api), terminal.clone());

    println!("{}", manager.init().await);
    println!("Type 'help' for commands.");

    while let Some(line) = terminal.prompt("> ").await {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        let event = match command {
            Command::Quit => break,
            Command::Help => {
                println!("{}", HELP);
                continue;
            }
            Command::View(view) => UiEvent::ChangeView(view),
            Command::Previous => UiEvent::Navigate(Direction::Previous),
            Command::Next => UiEvent::Navigate(Direction::Next),
            Command::Goto(date) => UiEvent::JumpTo(date),
            Command::Range(start, end) => UiEvent::SelectRange { start, end },
            Command::Filter(filter) => UiEvent::ToggleFilter(filter),
            Command::Cancel => UiEvent::CancelEdit,
            Command::Reload => UiEvent::Reload,
            Command::Add => {
                manager.cancel_edit();
                let base = TaskForm {
                    status: Some(WorkStatus::Scheduled),
                    start_date: Some(manager.today()),
                    ..TaskForm::default()
                };
                match read_form(&terminal, base).await {
                    FormInput::Done(form) => UiEvent::Submit(form),
                    FormInput::Abandoned => continue,
                    FormInput::Closed => break,
                }
            }
            Command::Edit(position) => {
                let Some(id) = card_id(&manager, position) else {
                    continue;
                };
                println!("{}", manager.handle(UiEvent::BeginEdit(id)).await);

                let Some(task) = manager.task(id) else {
                    continue;
                };
                match read_form(&terminal, TaskForm::from_task(task)).await {
                    FormInput::Done(form) => UiEvent::Submit(form),
                    FormInput::Abandoned => UiEvent::CancelEdit,
                    FormInput::Closed => break,
                }
            }
            Command::Complete(position) => match card_id(&manager, position) {
                Some(id) => UiEvent::Complete(id),
                None => continue,
            },
            Command::Delete(position) => match card_id(&manager, position) {
                Some(id) => UiEvent::Delete(id),
                None => continue,
            },
        };

        println!("{}", manager.handle(event).await);
    }

    println!("Bye.");
    Ok(())
}

/// Id of the task shown at 1-based `position`
fn card_id(manager: &TaskManager, position: usize) -> Option<WorkLogId> {
    let id = manager.view().card(position).map(|card| card.id);
    if id.is_none() {
        println!("No task #{} in the current list", position);
    }
    id
}

enum FormInput {
    Done(TaskForm),
    Abandoned,
    Closed,
}

enum Answer<T> {
    Value(T),
    Keep,
    Abandon,
    Closed,
}

/// Ask one field until the answer parses
async fn ask<T>(
    terminal: &Terminal,
    label: &str,
    current: &str,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Answer<T> {
    loop {
        let Some(line) = terminal.prompt(&format!("{} [{}]: ", label, current)).await else {
            return Answer::Closed;
        };
        let line = line.trim();

        if line.is_empty() {
            return Answer::Keep;
        }
        if line == "!" {
            return Answer::Abandon;
        }
        match parse(line) {
            Ok(value) => return Answer::Value(value),
            Err(message) => println!("{}", message),
        }
    }
}

/// Unwrap an answer into `$slot`, leaving the form on abandon or EOF
macro_rules! field {
    ($slot:expr, $answer:expr) => {
        match $answer {
            Answer::Value(value) => $slot = value,
            Answer::Keep => {}
            Answer::Abandon => return FormInput::Abandoned,
            Answer::Closed => return FormInput::Closed,
        }
    };
}

async fn read_form(terminal: &Terminal, mut form: TaskForm) -> FormInput {
    let status = form.status.map(|s| s.as_str()).unwrap_or("");
    let start_date = form.start_date.map(|d| d.to_string()).unwrap_or_default();
    let end_date = form.end_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
    let start_time = clock(form.start_time.unwrap_or(DEFAULT_START_TIME));
    let end_time = clock(form.end_time.unwrap_or(DEFAULT_END_TIME));
    let mood = form.mood.clone().unwrap_or_else(|| DEFAULT_MOOD.to_string());
    let weather = form.weather.clone().unwrap_or_else(|| DEFAULT_WEATHER.to_string());
    let content = form.project_content.clone();
    let memo = form.memo.clone();

    field!(
        form.project_content,
        ask(terminal, "Content", &content, |s| Ok(s.to_string())).await
    );
    field!(
        form.status,
        ask(terminal, "Status (scheduled/in-progress/closed)", status, |s| {
            parse_status(s)
                .map(Some)
                .ok_or_else(|| format!("unknown status '{}'", s))
        })
        .await
    );
    field!(
        form.start_date,
        ask(terminal, "Start date", &start_date, |s| date_answer(s).map(Some)).await
    );
    field!(
        form.end_date,
        ask(terminal, "End date", &end_date, |s| {
            if s == "-" {
                Ok(None)
            } else {
                date_answer(s).map(Some)
            }
        })
        .await
    );
    field!(
        form.start_time,
        ask(terminal, "Start time", &start_time, |s| time_answer(s).map(Some)).await
    );
    field!(
        form.end_time,
        ask(terminal, "End time", &end_time, |s| time_answer(s).map(Some)).await
    );
    field!(
        form.memo,
        ask(terminal, "Memo", &memo, |s| {
            Ok(if s == "-" { String::new() } else { s.to_string() })
        })
        .await
    );
    field!(
        form.mood,
        ask(terminal, "Mood", &mood, |s| Ok(Some(s.to_string()))).await
    );
    field!(
        form.weather,
        ask(terminal, "Weather", &weather, |s| Ok(Some(s.to_string()))).await
    );

    FormInput::Done(form)
}

fn date_answer(text: &str) -> Result<Date, String> {
    parse_date(text).map_err(|e| e.to_string())
}

fn clock(t: Time) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}

fn time_answer(text: &str) -> Result<Time, String> {
    parse_time(text).ok_or_else(|| format!("invalid time '{}', expected HH:MM", text))
}
