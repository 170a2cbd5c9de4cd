use std::sync::Arc;

use async_trait::async_trait;
use time::{Date, OffsetDateTime, Time};

use crate::error::TaskError;
use crate::manager::period::{Direction, PeriodView};
use crate::manager::render::{render, RenderedView};
use crate::manager::state::{StatusFilter, ViewState};
use crate::models::{
    now_timestamp, Task, WorkLogId, WorkStatus, DEFAULT_END_TIME, DEFAULT_MOOD,
    DEFAULT_START_TIME, DEFAULT_WEATHER,
};
use crate::services::{format_for_api, format_from_api, WorkLogApi};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Transient message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// What the task manager needs from whatever is drawing it
#[async_trait]
pub trait Frontend: Send + Sync {
    fn notify(&self, notification: Notification);

    /// Ask a yes/no question; `false` means declined
    async fn confirm(&self, question: &str) -> bool;
}

/// Values entered in the task form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub project_content: String,
    pub status: Option<WorkStatus>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub start_time: Option<Time>,
    pub end_time: Option<Time>,
    pub memo: String,
    pub mood: Option<String>,
    pub weather: Option<String>,
}

impl TaskForm {
    /// Form pre-filled for editing `task`
    pub fn from_task(task: &Task) -> Self {
        Self {
            project_content: task.project_content.clone(),
            status: Some(task.status),
            start_date: Some(task.start_date),
            end_date: task.end_date,
            start_time: Some(task.start_time),
            end_time: Some(task.end_time),
            memo: task.memo.clone(),
            mood: Some(task.mood.clone()),
            weather: Some(task.weather.clone()),
        }
    }

    /// Required fields: content, status and start date
    fn validate(&self) -> Result<(WorkStatus, Date), TaskError> {
        if self.project_content.trim().is_empty() {
            return Err(TaskError::Invalid("content is required".to_string()));
        }
        let status = self
            .status
            .ok_or_else(|| TaskError::Invalid("status is required".to_string()))?;
        let start_date = self
            .start_date
            .ok_or_else(|| TaskError::Invalid("start date is required".to_string()))?;

        Ok((status, start_date))
    }

    fn into_task(self, id: WorkLogId, status: WorkStatus, start_date: Date) -> Task {
        Task {
            id,
            project_content: self.project_content.trim().to_string(),
            status,
            start_date,
            end_date: self.end_date,
            start_time: self.start_time.unwrap_or(DEFAULT_START_TIME),
            end_time: self.end_time.unwrap_or(DEFAULT_END_TIME),
            memo: self.memo,
            mood: self.mood.unwrap_or_else(|| DEFAULT_MOOD.to_string()),
            weather: self.weather.unwrap_or_else(|| DEFAULT_WEATHER.to_string()),
            created_at: None,
            updated_at: None,
        }
    }
}

/// Everything a user can do to the task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ChangeView(PeriodView),
    Navigate(Direction),
    JumpTo(Date),
    SelectRange { start: Date, end: Date },
    ToggleFilter(StatusFilter),
    /// Create, or update the task being edited
    Submit(TaskForm),
    BeginEdit(WorkLogId),
    CancelEdit,
    Complete(WorkLogId),
    Delete(WorkLogId),
    Reload,
}

pub type Clock = Arc<dyn Fn() -> Date + Send + Sync>;

fn local_today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Client-side controller: task cache, view state and the calls that keep them in sync.
///
/// Every failing operation has already notified the frontend by the time it
/// returns `Err`; callers only need the result to decide what to do next.
pub struct TaskManager {
    api: Arc<dyn WorkLogApi>,
    frontend: Arc<dyn Frontend>,
    state: ViewState,
    tasks: Vec<Task>,
    today: Clock,
}

impl TaskManager {
    pub fn new(api: Arc<dyn WorkLogApi>, frontend: Arc<dyn Frontend>) -> Self {
        Self::with_clock(api, frontend, Arc::new(local_today))
    }

    pub fn with_clock(api: Arc<dyn WorkLogApi>, frontend: Arc<dyn Frontend>, today: Clock) -> Self {
        let state = ViewState::new(today());
        Self {
            api,
            frontend,
            state,
            tasks: Vec::new(),
            today,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: WorkLogId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn today(&self) -> Date {
        (self.today)()
    }

    pub fn view(&self) -> RenderedView {
        render(&self.state, &self.tasks)
    }

    /// First load; the view is rendered even when the fetch fails
    pub async fn init(&mut self) -> RenderedView {
        let _ = self.load().await;
        self.view()
    }

    /// Apply one event and return the view to draw next
    pub async fn handle(&mut self, event: UiEvent) -> RenderedView {
        let result = match event {
            UiEvent::ChangeView(view) => {
                self.change_view(view);
                Ok(())
            }
            UiEvent::Navigate(direction) => {
                self.navigate(direction);
                Ok(())
            }
            UiEvent::JumpTo(date) => {
                self.jump_to(date);
                Ok(())
            }
            UiEvent::SelectRange { start, end } => self.select_range(start, end),
            UiEvent::ToggleFilter(filter) => {
                self.toggle_filter(filter);
                Ok(())
            }
            UiEvent::Submit(form) => self.submit(form).await,
            UiEvent::BeginEdit(id) => self.begin_edit(id),
            UiEvent::CancelEdit => {
                self.cancel_edit();
                Ok(())
            }
            UiEvent::Complete(id) => self.complete(id).await,
            UiEvent::Delete(id) => self.delete(id).await,
            UiEvent::Reload => self.load().await,
        };

        if let Err(e) = result {
            tracing::debug!(error = %e, "UI event failed");
        }
        self.view()
    }

    pub fn change_view(&mut self, view: PeriodView) {
        self.state.view = view;
    }

    pub fn navigate(&mut self, direction: Direction) {
        self.state.navigate(direction);
    }

    pub fn jump_to(&mut self, date: Date) {
        self.state.anchor = date;
    }

    /// Pick a start/end range; the anchor moves to the start
    pub fn select_range(&mut self, start: Date, end: Date) -> Result<(), TaskError> {
        if start > end {
            let error = TaskError::Invalid("start date must not be after end date".to_string());
            self.frontend.notify(Notification::error(error.to_string()));
            return Err(error);
        }

        self.state.anchor = start;
        Ok(())
    }

    pub fn toggle_filter(&mut self, filter: StatusFilter) {
        let message = match self.state.toggle_filter(filter) {
            Some(active) => format!("Showing {} tasks", active),
            None => "Filter cleared".to_string(),
        };
        self.frontend.notify(Notification::info(message));
    }

    /// Replace the cache with the server's list; the old cache survives a failure
    pub async fn load(&mut self) -> Result<(), TaskError> {
        match self.api.list().await {
            Ok(records) => {
                self.tasks = records.into_iter().map(format_from_api).collect();
                if let Some(id) = self.state.editing {
                    if self.task(id).is_none() {
                        self.state.cancel_edit();
                    }
                }
                tracing::debug!(count = self.tasks.len(), "Tasks loaded");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load tasks");
                self.frontend
                    .notify(Notification::error("Could not load tasks from the server"));
                Err(e.into())
            }
        }
    }

    /// Create a task, or save the one being edited
    pub async fn submit(&mut self, form: TaskForm) -> Result<(), TaskError> {
        match self.state.editing {
            Some(id) => self.save_edit(id, form).await,
            None => self.add_task(form).await,
        }
    }

    pub async fn add_task(&mut self, form: TaskForm) -> Result<(), TaskError> {
        let (status, start_date) = self.validated(&form)?;
        let mut task = form.into_task(WorkLogId::generate(), status, start_date);

        match self.api.create(&format_for_api(&task)).await {
            Ok(id) => {
                task.id = id;
                let now = now_timestamp();
                task.created_at = Some(now);
                task.updated_at = Some(now);

                tracing::info!(id = %id, "Task created");
                self.tasks.push(task);
                self.frontend
                    .notify(Notification::success("Task added"));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create task");
                self.frontend
                    .notify(Notification::error("Could not add the task"));
                Err(e.into())
            }
        }
    }

    /// Full replace of the task `id` with the form contents
    pub async fn save_edit(&mut self, id: WorkLogId, form: TaskForm) -> Result<(), TaskError> {
        let (status, start_date) = self.validated(&form)?;
        let existing = self.known_task(id)?.clone();

        let mut task = form.into_task(id, status, start_date);
        task.created_at = existing.created_at;
        if task.is_closed() && task.end_date.is_none() {
            task.end_date = Some(self.today());
        }

        self.push_update(task, "Task updated", "Could not update the task")
            .await
    }

    /// Close the task with today as its end date
    pub async fn complete(&mut self, id: WorkLogId) -> Result<(), TaskError> {
        let mut task = self.known_task(id)?.clone();
        task.status = WorkStatus::Closed;
        task.end_date = Some(self.today());

        self.push_update(task, "Task completed", "Could not complete the task")
            .await
    }

    pub fn begin_edit(&mut self, id: WorkLogId) -> Result<(), TaskError> {
        self.known_task(id)?;
        self.state.begin_edit(id);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.state.cancel_edit();
    }

    /// Delete after confirmation; a failed delete reloads from the server
    pub async fn delete(&mut self, id: WorkLogId) -> Result<(), TaskError> {
        let content = self.known_task(id)?.project_content.clone();

        let question = format!("Delete \"{}\"?", content);
        if !self.frontend.confirm(&question).await {
            return Ok(());
        }

        match self.api.delete(id).await {
            Ok(()) => {
                self.tasks.retain(|task| task.id != id);
                if self.state.editing == Some(id) {
                    self.state.cancel_edit();
                }

                tracing::info!(id = %id, "Task deleted");
                self.frontend.notify(Notification::info("Task deleted"));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Failed to delete task, reloading");
                self.frontend
                    .notify(Notification::error("Could not delete the task"));
                let _ = self.load().await;
                Err(e.into())
            }
        }
    }

    async fn push_update(
        &mut self,
        mut task: Task,
        success: &str,
        failure: &str,
    ) -> Result<(), TaskError> {
        let id = task.id;

        match self.api.update(id, &format_for_api(&task)).await {
            Ok(()) => {
                task.updated_at = Some(now_timestamp());
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
                    *slot = task;
                }
                self.state.cancel_edit();

                tracing::info!(id = %id, "Task updated");
                self.frontend.notify(Notification::success(success));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Failed to update task");
                self.frontend.notify(Notification::error(failure));
                Err(e.into())
            }
        }
    }

    fn validated(&self, form: &TaskForm) -> Result<(WorkStatus, Date), TaskError> {
        form.validate().inspect_err(|e| {
            self.frontend.notify(Notification::error(e.to_string()));
        })
    }

    fn known_task(&self, id: WorkLogId) -> Result<&Task, TaskError> {
        self.task(id).ok_or_else(|| {
            let error = TaskError::UnknownTask(id);
            self.frontend.notify(Notification::error(error.to_string()));
            error
        })
    }
}
