use crate::manager::period::Period;
use crate::manager::state::ViewState;
use crate::models::{Task, WorkStatus};

/// Counts over the current period, regardless of the status filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodStats {
    pub total: usize,
    pub scheduled: usize,
    pub in_progress: usize,
    pub closed: usize,
}

/// Tasks whose date span intersects `period`, in cache order
pub fn period_tasks<'a>(period: &Period, tasks: &'a [Task]) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| {
            let (start, end) = task.span();
            period.overlaps(start, end)
        })
        .collect()
}

/// Tasks to display: in the period, matching the status filter, sorted by start date
pub fn visible_tasks<'a>(state: &ViewState, tasks: &'a [Task]) -> Vec<&'a Task> {
    let mut visible: Vec<&Task> = period_tasks(&state.period(), tasks)
        .into_iter()
        .filter(|task| state.filter.map_or(true, |f| f.matches(task.status)))
        .collect();

    visible.sort_by_key(|task| task.start_date);
    visible
}

pub fn period_stats(state: &ViewState, tasks: &[Task]) -> PeriodStats {
    period_tasks(&state.period(), tasks)
        .into_iter()
        .fold(PeriodStats::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                WorkStatus::Scheduled => stats.scheduled += 1,
                WorkStatus::InProgress => stats.in_progress += 1,
                WorkStatus::Closed => stats.closed += 1,
            }
            stats
        })
}
