use async_trait::async_trait;
use sea_orm::prelude::{TimeDate, TimeDateTime, TimeDateTimeWithTimeZone, TimeTime};
use sea_orm::sea_query::{Alias, Expr, Order, Query, Table};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseBackend,
    DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QueryResult,
    Schema, Set, Statement, TransactionTrait,
};

use crate::entity::work_log::{self, ActiveModel, Column, Entity as WorkLogEntity};
use crate::error::{AppError, AppResult};
use crate::models::{
    next_timestamp, now_timestamp, WorkLog, WorkLogId, WorkLogInput, WorkStatus,
};
use crate::repositories::WorkLogRepository;

/// Work log repository over SeaORM; MySQL, PostgreSQL or SQLite depending on the URL
#[derive(Clone)]
pub struct DatabaseRepository {
    db: DatabaseConnection,
}

const TABLE: &str = "work_logs";

/// Where a pre-UUID `work_logs` table is kept after its rows are imported
pub const LEGACY_TABLE: &str = "work_logs_legacy";

impl DatabaseRepository {
    /// Connect and make sure the `work_logs` table exists
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new(database_url);
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .sqlx_logging(true);

        let db = Database::connect(opt).await?;
        Self::from_connection(db).await
    }

    /// Wrap an open connection, preparing the schema first
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self, DbErr> {
        let repository = Self { db };
        repository.ensure_schema().await?;

        Ok(repository)
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Create the table and its indexes when they do not exist yet.
    ///
    /// A `work_logs` table without a `memo` column is the integer-keyed layout of the
    /// first release. It is renamed to [`LEGACY_TABLE`] and its rows are copied into a
    /// fresh table with new ids and a NULL memo, which the bootstrap migration splits.
    async fn ensure_schema(&self) -> Result<(), DbErr> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);

        let columns = self.table_columns(TABLE).await?;
        let legacy = !columns.is_empty() && !columns.iter().any(|c| c == "memo");
        if legacy {
            self.set_aside_legacy_table().await?;
        }

        let mut table = schema.create_table_from_entity(WorkLogEntity);
        table.if_not_exists();
        self.db.execute(backend.build(&table)).await?;

        // MySQL has no CREATE INDEX IF NOT EXISTS
        if backend != DatabaseBackend::MySql {
            for mut index in schema.create_index_from_entity(WorkLogEntity) {
                index.if_not_exists();
                self.db.execute(backend.build(&index)).await?;
            }
        }

        if legacy {
            let imported = self.import_legacy_rows().await?;
            tracing::info!(
                count = imported,
                table = LEGACY_TABLE,
                "Imported work logs from the legacy table"
            );
        }

        tracing::debug!(backend = ?backend, "work_logs schema ensured");
        Ok(())
    }

    /// Column names of `table`; empty when the table does not exist
    async fn table_columns(&self, table: &str) -> Result<Vec<String>, DbErr> {
        let backend = self.db.get_database_backend();
        let sql = match backend {
            DatabaseBackend::Sqlite => "SELECT name AS column_name FROM pragma_table_info(?)",
            DatabaseBackend::Postgres => {
                "SELECT column_name::text AS column_name FROM information_schema.columns \
                 WHERE table_schema = current_schema() AND table_name = $1"
            }
            DatabaseBackend::MySql => {
                "SELECT COLUMN_NAME AS column_name FROM information_schema.columns \
                 WHERE table_schema = DATABASE() AND table_name = ?"
            }
        };

        let rows = self
            .db
            .query_all(Statement::from_sql_and_values(backend, sql, [table.into()]))
            .await?;

        rows.iter()
            .map(|row| row.try_get::<String>("", "column_name"))
            .collect()
    }

    async fn set_aside_legacy_table(&self) -> Result<(), DbErr> {
        if !self.table_columns(LEGACY_TABLE).await?.is_empty() {
            return Err(DbErr::Custom(format!(
                "{} has the legacy layout but {} already exists; \
                 move one of them away before starting",
                TABLE, LEGACY_TABLE
            )));
        }

        let backend = self.db.get_database_backend();
        let rename = Table::rename()
            .table(Alias::new(TABLE), Alias::new(LEGACY_TABLE))
            .to_owned();
        self.db.execute(backend.build(&rename)).await?;

        tracing::warn!(
            from = TABLE,
            to = LEGACY_TABLE,
            "Found legacy work_logs table, renamed it"
        );
        Ok(())
    }

    /// Copy every legacy row into `work_logs`, oldest first
    async fn import_legacy_rows(&self) -> Result<usize, DbErr> {
        let backend = self.db.get_database_backend();
        let select = Query::select()
            .columns([
                Alias::new("date"),
                Alias::new("start_time"),
                Alias::new("end_time"),
                Alias::new("work_type"),
                Alias::new("description"),
                Alias::new("mood"),
                Alias::new("weather"),
                Alias::new("created_at"),
                Alias::new("updated_at"),
            ])
            .from(Alias::new(LEGACY_TABLE))
            .order_by(Alias::new("id"), Order::Asc)
            .to_owned();
        let rows = self.db.query_all(backend.build(&select)).await?;

        let txn = self.db.begin().await?;
        for row in &rows {
            let now = now_timestamp();
            let work_type: String = row.try_get("", "work_type")?;
            let description: Option<String> = row.try_get("", "description")?;

            let model = ActiveModel {
                id: Set(WorkLogId::generate().into()),
                date: Set(row.try_get::<TimeDate>("", "date")?),
                end_date: Set(None),
                start_time: Set(row.try_get::<TimeTime>("", "start_time")?),
                end_time: Set(row.try_get::<TimeTime>("", "end_time")?),
                work_type: Set(WorkStatus::from_stored(&work_type).as_str().to_string()),
                description: Set(description.unwrap_or_default()),
                memo: Set(None),
                mood: Set(row.try_get("", "mood")?),
                weather: Set(row.try_get("", "weather")?),
                created_at: Set(legacy_timestamp(row, "created_at").unwrap_or(now)),
                updated_at: Set(legacy_timestamp(row, "updated_at").unwrap_or(now)),
            };
            model.insert(&txn).await?;
        }
        txn.commit().await?;

        Ok(rows.len())
    }
}

/// Legacy `TIMESTAMP` columns come back with or without an offset depending on the backend
fn legacy_timestamp(row: &QueryResult, column: &str) -> Option<TimeDateTimeWithTimeZone> {
    if let Ok(Some(value)) = row.try_get::<Option<TimeDateTimeWithTimeZone>>("", column) {
        return Some(value);
    }
    row.try_get::<Option<TimeDateTime>>("", column)
        .ok()
        .flatten()
        .map(|value| value.assume_utc())
}

#[async_trait]
impl WorkLogRepository for DatabaseRepository {
    async fn list(&self) -> AppResult<Vec<WorkLog>> {
        let models = WorkLogEntity::find()
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, input: &WorkLogInput) -> AppResult<WorkLog> {
        let now = now_timestamp();
        let model = ActiveModel {
            id: Set(WorkLogId::generate().into()),
            date: Set(input.date),
            end_date: Set(input.end_date),
            start_time: Set(input.start_time),
            end_time: Set(input.end_time),
            work_type: Set(input.work_type.as_str().to_string()),
            description: Set(input.description.clone()),
            memo: Set(Some(input.memo.clone())),
            mood: Set(Some(input.mood.clone())),
            weather: Set(Some(input.weather.clone())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await?;
        Ok(result.into())
    }

    async fn update(&self, id: WorkLogId, input: &WorkLogInput) -> AppResult<WorkLog> {
        let model = WorkLogEntity::find_by_id(id.as_uuid())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Work log".to_string()))?;

        let updated_at = next_timestamp(model.updated_at);
        let mut active: ActiveModel = model.into();

        active.date = Set(input.date);
        active.end_date = Set(input.end_date);
        active.start_time = Set(input.start_time);
        active.end_time = Set(input.end_time);
        active.work_type = Set(input.work_type.as_str().to_string());
        active.description = Set(input.description.clone());
        active.memo = Set(Some(input.memo.clone()));
        active.mood = Set(Some(input.mood.clone()));
        active.weather = Set(Some(input.weather.clone()));
        active.updated_at = Set(updated_at);

        let result = active.update(&self.db).await?;
        Ok(result.into())
    }

    async fn delete(&self, id: WorkLogId) -> AppResult<()> {
        let result = WorkLogEntity::delete_by_id(id.as_uuid())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Work log".to_string()));
        }

        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        let count = WorkLogEntity::find().count(&self.db).await?;
        Ok(count)
    }

    async fn rewrite_legacy_memo(
        &self,
        id: WorkLogId,
        description: &str,
        memo: &str,
    ) -> AppResult<()> {
        let result = WorkLogEntity::update_many()
            .col_expr(Column::Description, Expr::value(description.to_string()))
            .col_expr(Column::Memo, Expr::value(Some(memo.to_string())))
            .filter(Column::Id.eq(id.as_uuid()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Work log".to_string()));
        }

        Ok(())
    }
}

// Conversion from SeaORM model to our domain model
impl From<work_log::Model> for WorkLog {
    fn from(m: work_log::Model) -> Self {
        Self {
            id: m.id.into(),
            date: m.date,
            end_date: m.end_date,
            start_time: m.start_time,
            end_time: m.end_time,
            work_type: WorkStatus::from_stored(&m.work_type),
            description: m.description,
            memo: m.memo,
            mood: m.mood,
            weather: m.weather,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::prepare;
    use time::macros::{date, datetime, time};

    // Layout written by the first release
    const LEGACY_DDL: &str = "CREATE TABLE work_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date DATE NOT NULL,
        start_time TIME NOT NULL,
        end_time TIME NOT NULL,
        work_type VARCHAR(50) NOT NULL,
        description TEXT,
        mood VARCHAR(20),
        weather VARCHAR(20),
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )";

    async fn legacy_connection(rows: &[&str]) -> DatabaseConnection {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1);
        let db = Database::connect(opt).await.unwrap();

        db.execute_unprepared(LEGACY_DDL).await.unwrap();
        for values in rows {
            db.execute_unprepared(&format!(
                "INSERT INTO work_logs (date, start_time, end_time, work_type, description, \
                 mood, weather, created_at, updated_at) VALUES ({})",
                values
            ))
            .await
            .unwrap();
        }
        db
    }

    async fn repository() -> DatabaseRepository {
        DatabaseRepository::connect("sqlite::memory:", 1, 1)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_connect_is_repeatable() {
        let repo = repository().await;
        // Schema creation must tolerate an existing table
        repo.ensure_schema().await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_and_list_newest_first() {
        let repo = repository().await;
        let first = repo
            .create(&WorkLogInput::new(date!(2024 - 01 - 15), WorkStatus::Scheduled, "first"))
            .await
            .unwrap();
        let second = repo
            .create(&WorkLogInput::new(date!(2024 - 01 - 10), WorkStatus::Closed, "second"))
            .await
            .unwrap();

        let logs = repo.list().await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].id, second.id);
        assert_eq!(logs[1].id, first.id);
        assert_eq!(logs[1], first);
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let repo = repository().await;
        let created = repo
            .create(&WorkLogInput::new(date!(2024 - 01 - 15), WorkStatus::Scheduled, "draft"))
            .await
            .unwrap();

        let mut input = WorkLogInput::new(date!(2024 - 01 - 16), WorkStatus::Closed, "final");
        input.end_date = Some(date!(2024 - 01 - 17));
        input.memo = "done".to_string();

        let updated = repo.update(created.id, &input).await.unwrap();
        assert_eq!(updated.date, date!(2024 - 01 - 16));
        assert_eq!(updated.end_date, Some(date!(2024 - 01 - 17)));
        assert_eq!(updated.work_type, WorkStatus::Closed);
        assert_eq!(updated.memo.as_deref(), Some("done"));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_row() {
        let repo = repository().await;
        let input = WorkLogInput::new(date!(2024 - 01 - 15), WorkStatus::Scheduled, "x");

        let result = repo.update(WorkLogId::generate(), &input).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let result = repo.delete(WorkLogId::generate()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rewrite_legacy_memo_keeps_timestamps() {
        let repo = repository().await;
        let created = repo
            .create(&WorkLogInput::new(date!(2024 - 01 - 15), WorkStatus::Scheduled, "a|||b"))
            .await
            .unwrap();

        repo.rewrite_legacy_memo(created.id, "a", "b").await.unwrap();

        let logs = repo.list().await.unwrap();
        assert_eq!(logs[0].description, "a");
        assert_eq!(logs[0].memo.as_deref(), Some("b"));
        assert_eq!(logs[0].updated_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_null_memo_reads_as_none() {
        let repo = repository().await;
        let created = repo
            .create(&WorkLogInput::new(date!(2024 - 01 - 15), WorkStatus::Scheduled, "old"))
            .await
            .unwrap();

        let backend = repo.connection().get_database_backend();
        repo.connection()
            .execute(Statement::from_string(
                backend,
                "UPDATE work_logs SET memo = NULL".to_string(),
            ))
            .await
            .unwrap();

        let logs = repo.list().await.unwrap();
        assert_eq!(logs[0].id, created.id);
        assert_eq!(logs[0].memo, None);
    }

    #[tokio::test]
    async fn test_legacy_table_is_imported_and_split() {
        let db = legacy_connection(&[
            "'2024-01-15', '09:00:00', '12:00:00', '진행중', 'Write report|||ask Kim', \
             '좋음', '맑음', '2024-01-15 09:00:00', '2024-01-15 09:00:00'",
            "'2024-01-16', '13:00:00', '17:00:00', '회의', 'Planning meeting', \
             NULL, NULL, '2024-01-16 13:00:00', '2024-01-16 13:00:00'",
        ])
        .await;

        let repo = DatabaseRepository::from_connection(db).await.unwrap();
        let report = prepare(&repo, true).await.unwrap();
        assert_eq!(report.migrated, 2);
        assert_eq!(report.seeded, 0);

        let logs = repo.list().await.unwrap();
        assert_eq!(logs.len(), 2);

        assert_eq!(logs[0].description, "Planning meeting");
        assert_eq!(logs[0].memo.as_deref(), Some(""));
        assert_eq!(logs[0].work_type, WorkStatus::Scheduled);
        assert_eq!(logs[0].mood, None);

        let report_log = &logs[1];
        assert_eq!(report_log.description, "Write report");
        assert_eq!(report_log.memo.as_deref(), Some("ask Kim"));
        assert_eq!(report_log.work_type, WorkStatus::InProgress);
        assert_eq!(report_log.date, date!(2024 - 01 - 15));
        assert_eq!(report_log.end_date, None);
        assert_eq!(report_log.start_time, time!(09:00));
        assert_eq!(report_log.mood.as_deref(), Some("좋음"));
        assert_eq!(report_log.created_at, datetime!(2024-01-15 09:00 UTC));

        // Old rows stay readable under the legacy name
        let legacy = repo.table_columns(LEGACY_TABLE).await.unwrap();
        assert!(legacy.iter().any(|c| c == "id"));
        assert!(!legacy.iter().any(|c| c == "memo"));

        // Restarting leaves the imported table alone
        repo.ensure_schema().await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
        assert_eq!(prepare(&repo, true).await.unwrap().migrated, 0);
    }

    #[tokio::test]
    async fn test_legacy_import_refuses_to_overwrite_backup() {
        let db = legacy_connection(&[]).await;
        db.execute_unprepared("CREATE TABLE work_logs_legacy (id INTEGER)")
            .await
            .unwrap();

        let result = DatabaseRepository::from_connection(db).await;
        assert!(matches!(result, Err(DbErr::Custom(ref msg)) if msg.contains(LEGACY_TABLE)));
    }
}
