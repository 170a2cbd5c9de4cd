use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, Time};
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::handlers::common::{validate_optional, validate_required, IdParams};
use crate::models::wire_format::{clock_time, iso_date};
use crate::models::{
    WorkLog, WorkLogId, WorkLogInput, WorkStatus, DEFAULT_END_TIME, DEFAULT_MOOD,
    DEFAULT_START_TIME, DEFAULT_WEATHER,
};
use crate::state::AppState;

const MAX_TAG_CHARS: usize = 20;

// ============ Request/Response DTOs ============

/// Body of POST and PUT; PUT replaces every field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogRequest {
    #[serde(with = "iso_date")]
    #[schema(value_type = String, example = "2024-01-15")]
    pub date: Date,
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "2024-01-17")]
    pub end_date: Option<Date>,
    #[serde(default, with = "clock_time::option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub start_time: Option<Time>,
    #[serde(default, with = "clock_time::option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "18:00:00")]
    pub end_time: Option<Time>,
    pub work_type: WorkStatus,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
}

impl WorkLogRequest {
    /// Validate and fill in server defaults
    pub fn into_input(self) -> AppResult<WorkLogInput> {
        validate_required("description", &self.description)?;
        validate_optional("mood", self.mood.as_deref(), MAX_TAG_CHARS)?;
        validate_optional("weather", self.weather.as_deref(), MAX_TAG_CHARS)?;

        Ok(WorkLogInput {
            date: self.date,
            end_date: self.end_date,
            start_time: self.start_time.unwrap_or(DEFAULT_START_TIME),
            end_time: self.end_time.unwrap_or(DEFAULT_END_TIME),
            work_type: self.work_type,
            description: self.description,
            memo: self.memo.unwrap_or_default(),
            mood: self.mood.unwrap_or_else(|| DEFAULT_MOOD.to_string()),
            weather: self.weather.unwrap_or_else(|| DEFAULT_WEATHER.to_string()),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogResponse {
    #[schema(value_type = uuid::Uuid)]
    pub id: WorkLogId,
    #[serde(with = "iso_date")]
    #[schema(value_type = String, example = "2024-01-15")]
    pub date: Date,
    #[serde(default, with = "iso_date::option")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<Date>,
    #[serde(with = "clock_time")]
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: Time,
    #[serde(with = "clock_time")]
    #[schema(value_type = String, example = "18:00:00")]
    pub end_time: Time,
    pub work_type: WorkStatus,
    pub description: String,
    /// Null only on rows written before memos had their own column
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub updated_at: OffsetDateTime,
}

impl From<WorkLog> for WorkLogResponse {
    fn from(w: WorkLog) -> Self {
        Self {
            id: w.id,
            date: w.date,
            end_date: w.end_date,
            start_time: w.start_time,
            end_time: w.end_time,
            work_type: w.work_type,
            description: w.description,
            memo: w.memo,
            mood: w.mood,
            weather: w.weather,
            created_at: w.created_at,
            updated_at: w.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    #[schema(value_type = uuid::Uuid)]
    pub id: WorkLogId,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ============ Handlers ============

/// List every work log, newest first
#[utoipa::path(
    get,
    path = "/api",
    responses(
        (status = 200, description = "All work logs", body = Vec<WorkLogResponse>),
        (status = 500, description = "Database error")
    ),
    tag = "Work logs"
)]
pub async fn list_work_logs(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<WorkLogResponse>>> {
    let logs = state.repository.list().await?;
    Ok(Json(logs.into_iter().map(|l| l.into()).collect()))
}

/// Create a work log
#[utoipa::path(
    post,
    path = "/api",
    request_body = WorkLogRequest,
    responses(
        (status = 201, description = "Work log created", body = CreatedResponse),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Database error")
    ),
    tag = "Work logs"
)]
pub async fn create_work_log(
    State(state): State<AppState>,
    Json(payload): Json<WorkLogRequest>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let input = payload.into_input()?;
    let log = state.repository.create(&input).await?;

    tracing::info!(id = %log.id, work_type = %log.work_type, "Work log created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: log.id,
            message: "Work log created".to_string(),
        }),
    ))
}

/// Replace every field of a work log
#[utoipa::path(
    put,
    path = "/api",
    params(IdParams),
    request_body = WorkLogRequest,
    responses(
        (status = 200, description = "Work log updated", body = MessageResponse),
        (status = 400, description = "Missing or invalid id, or validation error"),
        (status = 404, description = "Work log not found"),
        (status = 500, description = "Database error")
    ),
    tag = "Work logs"
)]
pub async fn update_work_log(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
    Json(payload): Json<WorkLogRequest>,
) -> AppResult<Json<MessageResponse>> {
    let id = params.parse()?;
    let input = payload.into_input()?;
    state.repository.update(id, &input).await?;

    tracing::info!(id = %id, "Work log updated");

    Ok(Json(MessageResponse {
        message: "Work log updated".to_string(),
    }))
}

/// Delete a work log
#[utoipa::path(
    delete,
    path = "/api",
    params(IdParams),
    responses(
        (status = 200, description = "Work log deleted", body = MessageResponse),
        (status = 400, description = "Missing or invalid id"),
        (status = 404, description = "Work log not found"),
        (status = 500, description = "Database error")
    ),
    tag = "Work logs"
)]
pub async fn delete_work_log(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> AppResult<Json<MessageResponse>> {
    let id = params.parse()?;
    state.repository.delete(id).await?;

    tracing::info!(id = %id, "Work log deleted");

    Ok(Json(MessageResponse {
        message: "Work log deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use time::macros::{date, time};

    #[test]
    fn test_request_fills_defaults() {
        let request: WorkLogRequest = serde_json::from_str(
            r#"{"date":"2024-01-15","workType":"scheduled","description":"Review"}"#,
        )
        .unwrap();

        let input = request.into_input().unwrap();
        assert_eq!(input.date, date!(2024 - 01 - 15));
        assert_eq!(input.end_date, None);
        assert_eq!(input.start_time, DEFAULT_START_TIME);
        assert_eq!(input.end_time, DEFAULT_END_TIME);
        assert_eq!(input.memo, "");
        assert_eq!(input.mood, DEFAULT_MOOD);
        assert_eq!(input.weather, DEFAULT_WEATHER);
    }

    #[test]
    fn test_request_reads_camel_case_fields() {
        let request: WorkLogRequest = serde_json::from_str(
            r#"{"date":"2024-01-15","endDate":"2024-01-17","startTime":"10:30","endTime":"12:00:00",
                "workType":"in-progress","description":"Deploy","memo":"check logs"}"#,
        )
        .unwrap();

        assert_eq!(request.end_date, Some(date!(2024 - 01 - 17)));
        assert_eq!(request.start_time, Some(time!(10:30)));
        assert_eq!(request.end_time, Some(time!(12:00)));
        assert_eq!(request.work_type, WorkStatus::InProgress);
        assert_eq!(request.memo.as_deref(), Some("check logs"));
    }

    #[test]
    fn test_blank_description_is_rejected() {
        let request = WorkLogRequest {
            date: date!(2024 - 01 - 15),
            end_date: None,
            start_time: None,
            end_time: None,
            work_type: WorkStatus::Scheduled,
            description: "   ".to_string(),
            memo: None,
            mood: None,
            weather: None,
        };

        assert!(matches!(request.into_input(), Err(AppError::Validation(_))));
    }
}
