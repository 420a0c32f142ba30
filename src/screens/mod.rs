//! Screen state objects.
//!
//! Each screen owns its backend handle, one `AuthGate` and a `ScreenStatus`.
//! Nothing is shared between screens; a fresh screen starts signed out.

pub mod admin;
pub mod viewer;
pub mod workspace;

pub use admin::AdminScreen;
pub use viewer::ViewerScreen;
pub use workspace::{PendingConfirmation, TaskDraft, TeamWorkspace};

use std::collections::HashSet;

use crate::client::ClientError;
use crate::models::TeamId;

/// Where the user is. Unknown paths land on the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Viewer,
    SiteAdmin,
    TeamEdit(TeamId),
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["admin"] => Route::SiteAdmin,
            ["team-edit", id] => id.parse().map(Route::TeamEdit).unwrap_or(Route::Viewer),
            _ => Route::Viewer,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Viewer => "/".to_string(),
            Route::SiteAdmin => "/admin".to_string(),
            Route::TeamEdit(team_id) => format!("/team-edit/{}", team_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SignIn,
    CreateTeam,
    LoadSchedule,
    LoadTaskDetails,
    Refresh,
    AddMember,
    ImportMembers,
    UpdateMember,
    DeleteMember,
    AddTask,
    ImportTasks,
    UpdateTask,
    DeleteTask,
    RestoreTask,
    GenerateSchedule,
}

impl Operation {
    /// Shown when the backend fails without saying why.
    pub fn fallback(self) -> &'static str {
        match self {
            Operation::SignIn => "Sign in failed",
            Operation::CreateTeam => "Failed to create the team",
            Operation::LoadSchedule => "Failed to load the schedule",
            Operation::LoadTaskDetails => "Failed to load task details",
            Operation::Refresh => "Failed to load the team",
            Operation::AddMember => "Failed to add the member",
            Operation::ImportMembers => "Failed to import members",
            Operation::UpdateMember => "Failed to rename the member",
            Operation::DeleteMember => "Failed to delete the member",
            Operation::AddTask => "Failed to add the task",
            Operation::ImportTasks => "Failed to import tasks",
            Operation::UpdateTask => "Failed to update the task",
            Operation::DeleteTask => "Failed to delete the task",
            Operation::RestoreTask => "Failed to restore the task",
            Operation::GenerateSchedule => "Failed to generate the schedule",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Operation::SignIn => "Sign in",
            Operation::CreateTeam => "Team creation",
            Operation::LoadSchedule => "Loading the schedule",
            Operation::LoadTaskDetails => "Loading task details",
            Operation::Refresh => "Loading the team",
            Operation::AddMember => "Adding a member",
            Operation::ImportMembers => "Member import",
            Operation::UpdateMember => "Renaming a member",
            Operation::DeleteMember => "Deleting a member",
            Operation::AddTask => "Adding a task",
            Operation::ImportTasks => "Task import",
            Operation::UpdateTask => "Updating a task",
            Operation::DeleteTask => "Deleting a task",
            Operation::RestoreTask => "Restoring a task",
            Operation::GenerateSchedule => "Schedule generation",
        }
    }
}

/// In-flight flags plus the one error line and one notice line a screen shows.
#[derive(Debug, Default)]
pub struct ScreenStatus {
    in_flight: HashSet<Operation>,
    error: Option<String>,
    notice: Option<String>,
}

impl ScreenStatus {
    /// Marks `op` as running. A second `begin` before `settle` is refused.
    pub fn begin(&mut self, op: Operation) -> Result<(), ClientError> {
        if !self.in_flight.insert(op) {
            return Err(ClientError::Busy(op.label()));
        }
        self.error = None;
        self.notice = None;
        Ok(())
    }

    /// Clears the flag for `op` and records the error line on failure.
    /// Other form state is left alone.
    pub fn settle<T>(&mut self, op: Operation, result: Result<T, ClientError>) -> Result<T, ClientError> {
        self.in_flight.remove(&op);
        if let Err(err) = &result {
            self.error = Some(err.user_message(op.fallback()));
        }
        result
    }

    /// Records a failure that happened before any request was sent.
    pub fn reject<T>(&mut self, op: Operation, err: ClientError) -> Result<T, ClientError> {
        self.error = Some(err.user_message(op.fallback()));
        Err(err)
    }

    pub fn is_busy(&self, op: Operation) -> bool {
        self.in_flight.contains(&op)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }
}
