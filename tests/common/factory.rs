use time::Date;

use worklog::models::{WorkLog, WorkLogInput, WorkStatus};
use worklog::repositories::WorkLogRepository;
use worklog::state::AppState;

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Store a work log with default times, mood and weather
    pub async fn create_work_log(
        &self,
        date: Date,
        status: WorkStatus,
        description: &str,
    ) -> WorkLog {
        self.create_with(WorkLogInput::new(date, status, description))
            .await
    }

    pub async fn create_with(&self, input: WorkLogInput) -> WorkLog {
        self.state.repository.create(&input).await.unwrap()
    }

    pub async fn count(&self) -> u64 {
        self.state.repository.count().await.unwrap()
    }
}
