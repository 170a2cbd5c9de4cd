use std::fmt;

use time::Time;

use crate::manager::filter::{period_stats, visible_tasks, PeriodStats};
use crate::manager::period::PeriodView;
use crate::manager::state::{StatusFilter, ViewState};
use crate::models::{Task, WorkLogId, WorkStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Edit,
    Complete,
    Delete,
}

impl TaskAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Complete => "complete",
            Self::Delete => "delete",
        }
    }
}

/// One rendered task row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard {
    pub id: WorkLogId,
    pub content: String,
    pub status: WorkStatus,
    pub dates: String,
    pub times: String,
    pub memo: String,
    pub mood: String,
    pub weather: String,
    pub actions: Vec<TaskAction>,
    pub editing: bool,
}

impl TaskCard {
    fn from_task(task: &Task, editing: bool) -> Self {
        let dates = match task.end_date {
            Some(end) if end != task.start_date => format!("{} ~ {}", task.start_date, end),
            _ => task.start_date.to_string(),
        };

        let mut actions = vec![TaskAction::Edit];
        if !task.is_closed() {
            actions.push(TaskAction::Complete);
        }
        actions.push(TaskAction::Delete);

        Self {
            id: task.id,
            content: task.project_content.clone(),
            status: task.status,
            dates,
            times: format!("{}-{}", clock(task.start_time), clock(task.end_time)),
            memo: task.memo.clone(),
            mood: task.mood.clone(),
            weather: task.weather.clone(),
            actions,
            editing,
        }
    }

    pub fn offers(&self, action: TaskAction) -> bool {
        self.actions.contains(&action)
    }
}

/// Everything the front-end draws for one state of the task manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub view: PeriodView,
    pub period_label: String,
    pub stats: PeriodStats,
    pub filter: Option<StatusFilter>,
    pub cards: Vec<TaskCard>,
}

impl RenderedView {
    /// Card at 1-based `position` in display order
    pub fn card(&self, position: usize) -> Option<&TaskCard> {
        position.checked_sub(1).and_then(|i| self.cards.get(i))
    }
}

pub fn render(state: &ViewState, tasks: &[Task]) -> RenderedView {
    let period = state.period();

    RenderedView {
        view: state.view,
        period_label: period.label(state.view),
        stats: period_stats(state, tasks),
        filter: state.filter,
        cards: visible_tasks(state, tasks)
            .into_iter()
            .map(|task| TaskCard::from_task(task, state.editing == Some(task.id)))
            .collect(),
    }
}

fn clock(t: Time) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}

impl fmt::Display for RenderedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} view: {} ==", self.view, self.period_label)?;
        writeln!(
            f,
            "total {} | scheduled {} | in progress {} | closed {}",
            self.stats.total, self.stats.scheduled, self.stats.in_progress, self.stats.closed
        )?;
        if let Some(filter) = self.filter {
            writeln!(f, "filter: {}", filter)?;
        }

        if self.cards.is_empty() {
            return writeln!(f, "(no tasks in this period)");
        }

        for (i, card) in self.cards.iter().enumerate() {
            let marker = if card.editing { " [editing]" } else { "" };
            writeln!(
                f,
                "{:>2}. [{}] {}{}",
                i + 1,
                card.status.label(),
                card.content,
                marker
            )?;
            writeln!(
                f,
                "    {} {} | {} / {}",
                card.dates, card.times, card.mood, card.weather
            )?;
            if !card.memo.is_empty() {
                writeln!(f, "    memo: {}", card.memo)?;
            }
            let actions: Vec<&str> = card.actions.iter().map(|a| a.as_str()).collect();
            writeln!(f, "    actions: {}", actions.join(", "))?;
        }

        Ok(())
    }
}
