// reqwest-backed client for the /api/ routes
use log::{debug, warn};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::{Backend, ClientError};
use crate::config::ClientConfig;
use crate::models::*;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:9090/api`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(|e| {
            warn!("Failed to build HTTP client: {}", e);
            ClientError::Transport(e.to_string())
        })?;

        Ok(HttpBackend {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        HttpBackend::new(config.base_url.clone())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}/", self.base_url, endpoint)
    }

    async fn call<B, T>(&self, method: Method, endpoint: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            ClientError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            warn!("Unreadable response from {} ({}): {}", url, status, e);
            ClientError::Transport(e.to_string())
        })?;

        decode_envelope(status, body)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T, ClientError> {
        self.call(Method::POST, endpoint, Some(body)).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T, ClientError> {
        self.call(Method::PUT, endpoint, Some(body)).await
    }

    async fn delete<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T, ClientError> {
        self.call(Method::DELETE, endpoint, Some(body)).await
    }
}

/// Checks the `success` flag and turns the body into `T` or a `ClientError`.
/// A 401 is always an authorization error.
pub fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: Value) -> Result<T, ClientError> {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);

    if success && status.is_success() {
        return serde_json::from_value(body)
            .map_err(|e| ClientError::Transport(format!("unexpected response shape: {}", e)));
    }

    let message = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    if status == StatusCode::UNAUTHORIZED {
        Err(ClientError::Unauthorized(message))
    } else {
        Err(ClientError::Rejected(message))
    }
}

impl Backend for HttpBackend {
    async fn admin_login(&self, request: &AdminLoginRequest) -> Result<MessageResponse, ClientError> {
        self.post("admin-login", request).await
    }

    async fn create_team(&self, request: &CreateTeamRequest) -> Result<CreatedTeam, ClientError> {
        self.post("create-team", request).await
    }

    async fn team_info(&self, team_id: TeamId) -> Result<TeamSnapshot, ClientError> {
        self.call::<(), _>(Method::GET, &format!("team-info/{}", team_id), None)
            .await
    }

    async fn add_member(&self, request: &AddMemberRequest) -> Result<AddMemberResponse, ClientError> {
        self.post("add-member", request).await
    }

    async fn update_member(&self, request: &UpdateMemberRequest) -> Result<MessageResponse, ClientError> {
        self.put("update-member", request).await
    }

    async fn delete_member(&self, request: &DeleteMemberRequest) -> Result<MessageResponse, ClientError> {
        self.delete("delete-member", request).await
    }

    async fn import_members(&self, request: &ImportMembersRequest) -> Result<ImportSummary, ClientError> {
        self.post("import-members", request).await
    }

    async fn add_task(&self, request: &AddTaskRequest) -> Result<AddTaskResponse, ClientError> {
        self.post("add-task", request).await
    }

    async fn update_task(&self, request: &UpdateTaskRequest) -> Result<MessageResponse, ClientError> {
        self.put("update-task", request).await
    }

    async fn delete_task(&self, request: &TaskActionRequest) -> Result<MessageResponse, ClientError> {
        self.delete("delete-task", request).await
    }

    async fn restore_task(&self, request: &TaskActionRequest) -> Result<MessageResponse, ClientError> {
        self.post("restore-task", request).await
    }

    async fn import_tasks(&self, request: &ImportTasksRequest) -> Result<ImportSummary, ClientError> {
        self.post("import-tasks", request).await
    }

    async fn generate_schedule(&self, request: &GenerateScheduleRequest) -> Result<MessageResponse, ClientError> {
        self.post("generate-schedule", request).await
    }

    async fn schedule_for_date(&self, request: &ScheduleForDateRequest) -> Result<DaySchedule, ClientError> {
        self.post("get-schedule-for-date", request).await
    }

    async fn task_details(&self, request: &TaskDetailsRequest) -> Result<TaskDetailsResponse, ClientError> {
        self.post("get-task-details", request).await
    }
}
