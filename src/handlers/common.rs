use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{AppError, AppResult};
use crate::models::WorkLogId;

/// `?id=` selector used by update and delete
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdParams {
    /// Work log ID
    pub id: Option<String>,
}

impl IdParams {
    pub fn parse(&self) -> AppResult<WorkLogId> {
        let raw = self
            .id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::Validation("id query parameter is required".to_string()))?;

        raw.parse()
            .map_err(|_| AppError::Validation(format!("invalid id: {}", raw)))
    }
}

/// Reject blank required text fields
pub fn validate_required(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Reject optional text fields longer than `max_chars`
pub fn validate_optional(field: &str, value: Option<&str>, max_chars: usize) -> AppResult<()> {
    if let Some(value) = value {
        if value.chars().count() > max_chars {
            return Err(AppError::Validation(format!(
                "{} must be at most {} characters",
                field, max_chars
            )));
        }
    }
    Ok(())
}
