pub mod bootstrap;
pub mod database;
pub mod memory;

pub use bootstrap::{prepare, BootstrapReport};
pub use database::DatabaseRepository;
pub use memory::InMemoryRepository;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{WorkLog, WorkLogId, WorkLogInput};

/// Storage for work logs; the backend is picked by configuration
#[async_trait]
pub trait WorkLogRepository: Send + Sync {
    /// All work logs, newest first
    async fn list(&self) -> AppResult<Vec<WorkLog>>;

    /// Store a new work log with a fresh id and timestamps
    async fn create(&self, input: &WorkLogInput) -> AppResult<WorkLog>;

    /// Replace every mutable field and refresh `updated_at`
    async fn update(&self, id: WorkLogId, input: &WorkLogInput) -> AppResult<WorkLog>;

    /// Remove a work log
    async fn delete(&self, id: WorkLogId) -> AppResult<()>;

    /// Count stored work logs
    async fn count(&self) -> AppResult<u64>;

    /// Write description and memo of a legacy row without touching its timestamps
    async fn rewrite_legacy_memo(
        &self,
        id: WorkLogId,
        description: &str,
        memo: &str,
    ) -> AppResult<()>;
}
