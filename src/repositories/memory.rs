use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{next_timestamp, now_timestamp, WorkLog, WorkLogId, WorkLogInput};
use crate::repositories::WorkLogRepository;

/// In-memory work log store, used when no database is configured and in tests
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    rows: Arc<RwLock<Vec<WorkLog>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn from_rows(rows: Vec<WorkLog>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }
}

#[async_trait]
impl WorkLogRepository for InMemoryRepository {
    async fn list(&self) -> AppResult<Vec<WorkLog>> {
        let rows = self.rows.read().await;
        let mut logs = rows.clone();
        // Stable sort keeps insertion order between equal timestamps; reverse puts newest first
        logs.reverse();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(logs)
    }

    async fn create(&self, input: &WorkLogInput) -> AppResult<WorkLog> {
        let now = now_timestamp();
        let log = WorkLog {
            id: WorkLogId::generate(),
            date: input.date,
            end_date: input.end_date,
            start_time: input.start_time,
            end_time: input.end_time,
            work_type: input.work_type,
            description: input.description.clone(),
            memo: Some(input.memo.clone()),
            mood: Some(input.mood.clone()),
            weather: Some(input.weather.clone()),
            created_at: now,
            updated_at: now,
        };

        self.rows.write().await.push(log.clone());
        Ok(log)
    }

    async fn update(&self, id: WorkLogId, input: &WorkLogInput) -> AppResult<WorkLog> {
        let mut rows = self.rows.write().await;
        let log = rows
            .iter_mut()
            .find(|log| log.id == id)
            .ok_or_else(|| AppError::NotFound("Work log".to_string()))?;

        log.date = input.date;
        log.end_date = input.end_date;
        log.start_time = input.start_time;
        log.end_time = input.end_time;
        log.work_type = input.work_type;
        log.description = input.description.clone();
        log.memo = Some(input.memo.clone());
        log.mood = Some(input.mood.clone());
        log.weather = Some(input.weather.clone());
        log.updated_at = next_timestamp(log.updated_at);

        Ok(log.clone())
    }

    async fn delete(&self, id: WorkLogId) -> AppResult<()> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|log| log.id != id);

        if rows.len() == before {
            return Err(AppError::NotFound("Work log".to_string()));
        }

        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.read().await.len() as u64)
    }

    async fn rewrite_legacy_memo(
        &self,
        id: WorkLogId,
        description: &str,
        memo: &str,
    ) -> AppResult<()> {
        let mut rows = self.rows.write().await;
        let log = rows
            .iter_mut()
            .find(|log| log.id == id)
            .ok_or_else(|| AppError::NotFound("Work log".to_string()))?;

        log.description = description.to_string();
        log.memo = Some(memo.to_string());
        Ok(())
    }
}
