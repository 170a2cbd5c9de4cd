use time::macros::{date, time};

use crate::error::AppResult;
use crate::models::{split_packed_description, WorkLogInput, WorkStatus};
use crate::repositories::WorkLogRepository;

/// What [`prepare`] changed in the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub migrated: usize,
    pub seeded: usize,
}

/// Run startup maintenance: unpack legacy memos, then seed an empty store
pub async fn prepare(repository: &dyn WorkLogRepository, seed: bool) -> AppResult<BootstrapReport> {
    let migrated = migrate_packed_memos(repository).await?;
    let seeded = if seed {
        seed_if_empty(repository).await?
    } else {
        0
    };

    Ok(BootstrapReport { migrated, seeded })
}

/// Give every row without a memo one, splitting `content|||memo` descriptions
async fn migrate_packed_memos(repository: &dyn WorkLogRepository) -> AppResult<usize> {
    let mut migrated = 0;

    for log in repository.list().await? {
        if log.memo.is_some() {
            continue;
        }

        let (description, memo) = split_packed_description(&log.description)
            .unwrap_or_else(|| (log.description.clone(), String::new()));

        repository
            .rewrite_legacy_memo(log.id, &description, &memo)
            .await?;
        tracing::debug!(id = %log.id, "Migrated legacy memo");
        migrated += 1;
    }

    Ok(migrated)
}

async fn seed_if_empty(repository: &dyn WorkLogRepository) -> AppResult<usize> {
    if repository.count().await? > 0 {
        return Ok(0);
    }

    let samples = sample_work_logs();
    for input in &samples {
        repository.create(input).await?;
    }

    tracing::info!(count = samples.len(), "Seeded sample work logs");
    Ok(samples.len())
}

fn sample_work_logs() -> Vec<WorkLogInput> {
    let mut frontend = WorkLogInput::new(
        date!(2024 - 01 - 15),
        WorkStatus::Closed,
        "Frontend work log system development",
    );
    frontend.start_time = time!(09:00);
    frontend.end_time = time!(12:00);

    let mut planning = WorkLogInput::new(
        date!(2024 - 01 - 15),
        WorkStatus::Scheduled,
        "Project planning meeting",
    );
    planning.start_time = time!(13:00);
    planning.end_time = time!(17:00);

    let mut review = WorkLogInput::new(
        date!(2024 - 01 - 16),
        WorkStatus::InProgress,
        "UI/UX design review",
    );
    review.start_time = time!(09:30);
    review.end_time = time!(11:30);

    vec![frontend, planning, review]
}
