use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ClientError, ErrorResponse};
use crate::handlers::{CreatedResponse, MessageResponse, WorkLogRequest, WorkLogResponse};
use crate::models::{split_packed_description, Task, WorkLogId, DEFAULT_MOOD, DEFAULT_WEATHER};

/// Remote work log store as seen by the task manager
#[async_trait]
pub trait WorkLogApi: Send + Sync {
    async fn list(&self) -> Result<Vec<WorkLogResponse>, ClientError>;

    /// Returns the id assigned by the server
    async fn create(&self, request: &WorkLogRequest) -> Result<WorkLogId, ClientError>;

    async fn update(&self, id: WorkLogId, request: &WorkLogRequest) -> Result<(), ClientError>;

    async fn delete(&self, id: WorkLogId) -> Result<(), ClientError>;
}

/// `WorkLogApi` over HTTP
pub struct HttpWorkLogApi {
    client: Client,
    api_url: String,
}

impl HttpWorkLogApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            api_url: config.api_url(),
        })
    }

    fn item_url(&self, id: WorkLogId) -> String {
        format!("{}?id={}", self.api_url, id)
    }

    /// Execute a request and decode a successful JSON body
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(error_message(response).await));
        }

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        response.json::<T>().await.map_err(ClientError::Decode)
    }
}

/// Best message available from an error response
async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<ErrorResponse>().await {
        Ok(body) => match body.details {
            Some(details) => format!("{}: {}", body.error, details),
            None => body.error,
        },
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unexpected response")
            .to_string(),
    }
}

#[async_trait]
impl WorkLogApi for HttpWorkLogApi {
    async fn list(&self) -> Result<Vec<WorkLogResponse>, ClientError> {
        self.send(self.client.get(&self.api_url)).await
    }

    async fn create(&self, request: &WorkLogRequest) -> Result<WorkLogId, ClientError> {
        let created: CreatedResponse = self
            .send(self.client.post(&self.api_url).json(request))
            .await?;

        tracing::debug!(id = %created.id, "Work log created remotely");
        Ok(created.id)
    }

    async fn update(&self, id: WorkLogId, request: &WorkLogRequest) -> Result<(), ClientError> {
        let _: MessageResponse = self
            .send(self.client.put(self.item_url(id)).json(request))
            .await?;
        Ok(())
    }

    async fn delete(&self, id: WorkLogId) -> Result<(), ClientError> {
        let _: MessageResponse = self.send(self.client.delete(self.item_url(id))).await?;
        Ok(())
    }
}

/// Task to request body. The memo always travels in its own field.
pub fn format_for_api(task: &Task) -> WorkLogRequest {
    WorkLogRequest {
        date: task.start_date,
        end_date: task.end_date,
        start_time: Some(task.start_time),
        end_time: Some(task.end_time),
        work_type: task.status,
        description: task.project_content.clone(),
        memo: Some(task.memo.clone()),
        mood: Some(non_blank_or(&task.mood, DEFAULT_MOOD)),
        weather: Some(non_blank_or(&task.weather, DEFAULT_WEATHER)),
    }
}

/// Wire record to task.
///
/// A null memo means the server has not unpacked legacy `content|||memo`
/// descriptions yet, so the split happens here instead.
pub fn format_from_api(record: WorkLogResponse) -> Task {
    let (project_content, memo) = match record.memo {
        Some(memo) => (record.description, memo),
        None => split_packed_description(&record.description)
            .unwrap_or_else(|| (record.description.clone(), String::new())),
    };

    Task {
        id: record.id,
        project_content,
        status: record.work_type,
        start_date: record.date,
        end_date: record.end_date,
        start_time: record.start_time,
        end_time: record.end_time,
        memo,
        mood: record.mood.unwrap_or_else(|| DEFAULT_MOOD.to_string()),
        weather: record.weather.unwrap_or_else(|| DEFAULT_WEATHER.to_string()),
        created_at: Some(record.created_at),
        updated_at: Some(record.updated_at),
    }
}

fn non_blank_or(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
