//! The scheduling backend as the screens see it.
//!
//! `Backend` has one method per API endpoint. `HttpBackend` talks to a running
//! server; `LocalBackend` calls a `TeamStore` in-process.

pub mod http;
pub mod local;

pub use http::HttpBackend;
pub use local::LocalBackend;

use derive_more::Display;

use crate::models::*;
use crate::session::InvalidTransition;

/// Shown for every transport failure, whatever the operation.
pub const CONNECTION_ERROR: &str = "Could not connect to the server";

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Bad local input, caught before any request.
    #[display(fmt = "{}", _0)]
    Validation(String),
    /// Wrong password at any scope.
    #[display(fmt = "{}", _0)]
    Unauthorized(String),
    /// The backend refused the request. Empty when it gave no reason.
    #[display(fmt = "{}", _0)]
    Rejected(String),
    #[display(fmt = "{}: {}", CONNECTION_ERROR, _0)]
    Transport(String),
    /// The same kind of operation is still in flight.
    #[display(fmt = "{} is already in progress", _0)]
    Busy(&'static str),
}

impl std::error::Error for ClientError {}

impl ClientError {
    /// The line a screen shows for this error.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Validation(message) => message.clone(),
            ClientError::Unauthorized(message) | ClientError::Rejected(message) => {
                if message.is_empty() {
                    fallback.to_string()
                } else {
                    message.clone()
                }
            }
            ClientError::Transport(_) => CONNECTION_ERROR.to_string(),
            ClientError::Busy(_) => self.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }
}

impl From<ServiceError> for ClientError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized(message) => ClientError::Unauthorized(message),
            ServiceError::BadRequest(message)
            | ServiceError::NotFound(message)
            | ServiceError::Internal(message) => ClientError::Rejected(message),
        }
    }
}

impl From<InvalidTransition> for ClientError {
    fn from(err: InvalidTransition) -> Self {
        ClientError::Validation(err.to_string())
    }
}

impl From<RangeError> for ClientError {
    fn from(err: RangeError) -> Self {
        ClientError::Validation(err.to_string())
    }
}

/// One async call per endpoint. Every call either returns the decoded payload
/// or a `ClientError`; callers never look at raw JSON.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn admin_login(&self, request: &AdminLoginRequest) -> Result<MessageResponse, ClientError>;

    async fn create_team(&self, request: &CreateTeamRequest) -> Result<CreatedTeam, ClientError>;

    async fn team_info(&self, team_id: TeamId) -> Result<TeamSnapshot, ClientError>;

    async fn add_member(&self, request: &AddMemberRequest) -> Result<AddMemberResponse, ClientError>;

    async fn update_member(&self, request: &UpdateMemberRequest) -> Result<MessageResponse, ClientError>;

    async fn delete_member(&self, request: &DeleteMemberRequest) -> Result<MessageResponse, ClientError>;

    async fn import_members(&self, request: &ImportMembersRequest) -> Result<ImportSummary, ClientError>;

    async fn add_task(&self, request: &AddTaskRequest) -> Result<AddTaskResponse, ClientError>;

    async fn update_task(&self, request: &UpdateTaskRequest) -> Result<MessageResponse, ClientError>;

    async fn delete_task(&self, request: &TaskActionRequest) -> Result<MessageResponse, ClientError>;

    async fn restore_task(&self, request: &TaskActionRequest) -> Result<MessageResponse, ClientError>;

    async fn import_tasks(&self, request: &ImportTasksRequest) -> Result<ImportSummary, ClientError>;

    async fn generate_schedule(&self, request: &GenerateScheduleRequest) -> Result<MessageResponse, ClientError>;

    async fn schedule_for_date(&self, request: &ScheduleForDateRequest) -> Result<DaySchedule, ClientError>;

    async fn task_details(&self, request: &TaskDetailsRequest) -> Result<TaskDetailsResponse, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_backend_text() {
        let err = ClientError::Rejected("A member with this name already exists".into());
        assert_eq!(err.user_message("Failed to add member"), "A member with this name already exists");

        let err = ClientError::Rejected(String::new());
        assert_eq!(err.user_message("Failed to add member"), "Failed to add member");
    }

    #[test]
    fn transport_errors_use_the_connection_message() {
        let err = ClientError::Transport("connection refused".into());
        assert_eq!(err.user_message("Failed to add member"), CONNECTION_ERROR);
    }

    #[test]
    fn service_errors_keep_their_category() {
        assert!(ClientError::from(ServiceError::wrong_admin_password()).is_unauthorized());
        assert_eq!(
            ClientError::from(ServiceError::not_found("Task not found")),
            ClientError::Rejected("Task not found".into())
        );
    }
}
