//! Team edit screen.
//!
//! Every mutation goes to the backend with the team admin password and is
//! followed by a full `team-info` reload; local state is never patched.
//! Destructive actions are two-step: `request_*` parks a `PendingConfirmation`
//! and only `confirm` sends it.

use chrono::NaiveDate;
use log::{debug, info};

use super::{Operation, Route, ScreenStatus};
use crate::client::{Backend, ClientError};
use crate::import::{self, ParsedImport, TaskLine};
use crate::models::*;
use crate::session::{AuthEvent, AuthGate, AuthScope};

/// Raw task form input. Numbers stay unvalidated until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub description: String,
    pub people_needed: i64,
    pub time_slot: i64,
}

impl Default for TaskDraft {
    fn default() -> Self {
        TaskDraft {
            name: String::new(),
            description: String::new(),
            people_needed: 1,
            time_slot: 1,
        }
    }
}

struct ValidTask {
    name: String,
    description: String,
    people_needed: PeopleNeeded,
    time_slot: TimeSlot,
}

impl TaskDraft {
    pub fn from_task(task: &Task) -> Self {
        TaskDraft {
            name: task.name.clone(),
            description: task.description.clone().unwrap_or_default(),
            people_needed: task.people_needed.get() as i64,
            time_slot: task.time_slot.get() as i64,
        }
    }

    fn validate(&self) -> Result<ValidTask, ClientError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ClientError::Validation("Task name is required".into()));
        }

        Ok(ValidTask {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            people_needed: PeopleNeeded::new(self.people_needed)?,
            time_slot: TimeSlot::new(self.time_slot)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEdit {
    pub member_id: MemberId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEdit {
    pub task_id: TaskId,
    pub draft: TaskDraft,
}

/// A destructive action waiting for the user to say yes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingConfirmation {
    DeleteMember { member_id: MemberId, name: String },
    DeleteTask { task_id: TaskId, name: String },
    RestoreTask { task_id: TaskId, name: String },
}

impl PendingConfirmation {
    pub fn prompt(&self) -> String {
        match self {
            PendingConfirmation::DeleteMember { name, .. } => {
                format!("Delete member {}? This cannot be undone.", name)
            }
            PendingConfirmation::DeleteTask { name, .. } => {
                format!("Delete task {}? It can be restored later.", name)
            }
            PendingConfirmation::RestoreTask { name, .. } => format!("Restore task {}?", name),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            PendingConfirmation::DeleteMember { .. } => Operation::DeleteMember,
            PendingConfirmation::DeleteTask { .. } => Operation::DeleteTask,
            PendingConfirmation::RestoreTask { .. } => Operation::RestoreTask,
        }
    }
}

pub struct TeamWorkspace<B> {
    backend: B,
    team_id: TeamId,
    gate: AuthGate,
    status: ScreenStatus,
    snapshot: Option<TeamSnapshot>,
    pub member_name: String,
    pub members_text: String,
    pub tasks_text: String,
    pub task_draft: TaskDraft,
    pub schedule_date: Option<NaiveDate>,
    member_edit: Option<MemberEdit>,
    task_edit: Option<TaskEdit>,
    pending: Option<PendingConfirmation>,
    last_import: Option<ImportSummary>,
}

impl<B: Backend> TeamWorkspace<B> {
    pub fn new(backend: B, team_id: TeamId) -> Self {
        TeamWorkspace {
            backend,
            team_id,
            gate: AuthGate::new(AuthScope::TeamAdmin),
            status: ScreenStatus::default(),
            snapshot: None,
            member_name: String::new(),
            members_text: String::new(),
            tasks_text: String::new(),
            task_draft: TaskDraft::default(),
            schedule_date: None,
            member_edit: None,
            task_edit: None,
            pending: None,
            last_import: None,
        }
    }

    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    pub fn status(&self) -> &ScreenStatus {
        &self.status
    }

    pub fn snapshot(&self) -> Option<&TeamSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    pub fn last_import(&self) -> Option<&ImportSummary> {
        self.last_import.as_ref()
    }

    pub fn member_edit(&self) -> Option<&MemberEdit> {
        self.member_edit.as_ref()
    }

    pub fn member_edit_mut(&mut self) -> Option<&mut MemberEdit> {
        self.member_edit.as_mut()
    }

    pub fn task_edit(&self) -> Option<&TaskEdit> {
        self.task_edit.as_ref()
    }

    pub fn task_edit_mut(&mut self) -> Option<&mut TaskEdit> {
        self.task_edit.as_mut()
    }

    /// Whether the generate button should be enabled.
    pub fn can_generate(&self) -> bool {
        self.schedule_date.is_some()
            && self.snapshot.as_ref().map_or(false, TeamSnapshot::can_generate)
    }

    /// There is no endpoint to check a team admin password, so any non-empty
    /// value is accepted here. The backend checks it on every mutation.
    pub async fn sign_in(&mut self, admin_password: &str) -> Result<(), ClientError> {
        if admin_password.is_empty() {
            return self
                .status
                .reject(Operation::SignIn, ClientError::Validation("Admin password is required".into()));
        }

        self.gate.apply(AuthEvent::Submit(admin_password.to_string()))?;
        self.gate.apply(AuthEvent::Accepted)?;
        info!("Team admin session opened for team {}", self.team_id);

        self.refresh().await
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.status.begin(Operation::Refresh)?;
        let result = self.backend.team_info(self.team_id).await;
        let snapshot = self.status.settle(Operation::Refresh, result)?;
        self.snapshot = Some(snapshot);
        Ok(())
    }

    // Post-mutation reload. A failure here is shown but does not undo the mutation's success.
    async fn reload(&mut self) {
        match self.backend.team_info(self.team_id).await {
            Ok(snapshot) => self.snapshot = Some(snapshot),
            Err(err) => self
                .status
                .set_error(err.user_message(Operation::Refresh.fallback())),
        }
    }

    fn admin_password(&mut self, op: Operation) -> Result<String, ClientError> {
        match self.gate.credential() {
            Some(password) => Ok(password.to_string()),
            None => self.status.reject(
                op,
                ClientError::Unauthorized("Enter the team admin password first".into()),
            ),
        }
    }

    pub async fn add_member(&mut self) -> Result<MemberId, ClientError> {
        let admin_password = self.admin_password(Operation::AddMember)?;
        let name = self.member_name.trim().to_string();
        if name.is_empty() {
            return self
                .status
                .reject(Operation::AddMember, ClientError::Validation("Member name is required".into()));
        }

        self.status.begin(Operation::AddMember)?;
        let request = AddMemberRequest {
            team_id: self.team_id,
            admin_password,
            name,
        };
        let result = self.backend.add_member(&request).await;
        let added = self.status.settle(Operation::AddMember, result)?;

        self.member_name.clear();
        self.reload().await;
        Ok(added.member_id)
    }

    /// What `import_members` would add given the members loaded right now.
    pub fn preview_member_import(&self) -> ParsedImport<String> {
        match &self.snapshot {
            Some(snapshot) => import::parse_members(&self.members_text, snapshot.member_names()),
            None => import::parse_members(&self.members_text, std::iter::empty()),
        }
    }

    pub async fn import_members(&mut self) -> Result<ImportSummary, ClientError> {
        let admin_password = self.admin_password(Operation::ImportMembers)?;
        if import::is_blank(&self.members_text) {
            return self.status.reject(
                Operation::ImportMembers,
                ClientError::Validation("Enter at least one name".into()),
            );
        }

        self.status.begin(Operation::ImportMembers)?;
        let request = ImportMembersRequest {
            team_id: self.team_id,
            admin_password,
            members_text: self.members_text.clone(),
        };
        let result = self.backend.import_members(&request).await;
        let summary = self.status.settle(Operation::ImportMembers, result)?;

        debug!("Member import: {} added, {} skipped", summary.total_added, summary.skipped);
        self.members_text.clear();
        self.status.set_notice(summary.message.clone());
        self.last_import = Some(summary.clone());
        self.reload().await;
        Ok(summary)
    }

    pub fn begin_member_edit(&mut self, member_id: MemberId) -> Result<(), ClientError> {
        let member = self
            .snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.member(member_id))
            .cloned();

        match member {
            Some(member) => {
                self.member_edit = Some(MemberEdit {
                    member_id: member.id,
                    name: member.name,
                });
                Ok(())
            }
            None => self
                .status
                .reject(Operation::UpdateMember, ClientError::Validation("Member not found".into())),
        }
    }

    pub fn cancel_member_edit(&mut self) {
        self.member_edit = None;
    }

    pub async fn save_member_edit(&mut self) -> Result<(), ClientError> {
        let edit = match self.member_edit.clone() {
            Some(edit) => edit,
            None => {
                return self.status.reject(
                    Operation::UpdateMember,
                    ClientError::Validation("No member is being edited".into()),
                )
            }
        };
        let admin_password = self.admin_password(Operation::UpdateMember)?;
        let new_name = edit.name.trim().to_string();
        if new_name.is_empty() {
            return self.status.reject(
                Operation::UpdateMember,
                ClientError::Validation("Member name is required".into()),
            );
        }

        self.status.begin(Operation::UpdateMember)?;
        let request = UpdateMemberRequest {
            member_id: edit.member_id,
            new_name,
            admin_password,
        };
        let result = self.backend.update_member(&request).await;
        let response = self.status.settle(Operation::UpdateMember, result)?;

        self.member_edit = None;
        if let Some(message) = response.message {
            self.status.set_notice(message);
        }
        self.reload().await;
        Ok(())
    }

    pub fn request_member_delete(&mut self, member_id: MemberId) -> Result<&PendingConfirmation, ClientError> {
        let name = self
            .snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.member(member_id))
            .map(|member| member.name.clone());

        match name {
            Some(name) => Ok(self.park(PendingConfirmation::DeleteMember { member_id, name })),
            None => self
                .status
                .reject(Operation::DeleteMember, ClientError::Validation("Member not found".into())),
        }
    }

    /// Submits the task form. On success the name, description and slot are
    /// reset; the people count is kept for the next task.
    pub async fn add_task(&mut self) -> Result<TaskId, ClientError> {
        let admin_password = self.admin_password(Operation::AddTask)?;
        let task = match self.task_draft.validate() {
            Ok(task) => task,
            Err(err) => return self.status.reject(Operation::AddTask, err),
        };

        self.status.begin(Operation::AddTask)?;
        let request = AddTaskRequest {
            team_id: self.team_id,
            admin_password,
            name: task.name,
            description: task.description,
            people_needed: task.people_needed,
            time_slot: task.time_slot,
        };
        let result = self.backend.add_task(&request).await;
        let added = self.status.settle(Operation::AddTask, result)?;

        self.task_draft = TaskDraft {
            people_needed: self.task_draft.people_needed,
            ..TaskDraft::default()
        };
        if let Some(message) = added.message {
            self.status.set_notice(message);
        }
        self.reload().await;
        Ok(added.task_id)
    }

    pub fn preview_task_import(&self) -> ParsedImport<TaskLine> {
        import::parse_tasks(&self.tasks_text)
    }

    pub async fn import_tasks(&mut self) -> Result<ImportSummary, ClientError> {
        let admin_password = self.admin_password(Operation::ImportTasks)?;
        if import::is_blank(&self.tasks_text) {
            return self.status.reject(
                Operation::ImportTasks,
                ClientError::Validation("Enter at least one task".into()),
            );
        }

        self.status.begin(Operation::ImportTasks)?;
        let request = ImportTasksRequest {
            team_id: self.team_id,
            admin_password,
            tasks_text: self.tasks_text.clone(),
        };
        let result = self.backend.import_tasks(&request).await;
        let summary = self.status.settle(Operation::ImportTasks, result)?;

        debug!("Task import: {} added, {} skipped", summary.total_added, summary.skipped);
        self.tasks_text.clear();
        self.status.set_notice(summary.message.clone());
        self.last_import = Some(summary.clone());
        self.reload().await;
        Ok(summary)
    }

    pub fn begin_task_edit(&mut self, task_id: TaskId) -> Result<(), ClientError> {
        let draft = self
            .snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.task(task_id))
            .map(TaskDraft::from_task);

        match draft {
            Some(draft) => {
                self.task_edit = Some(TaskEdit { task_id, draft });
                Ok(())
            }
            None => self
                .status
                .reject(Operation::UpdateTask, ClientError::Validation("Task not found".into())),
        }
    }

    pub fn cancel_task_edit(&mut self) {
        self.task_edit = None;
    }

    pub async fn save_task_edit(&mut self) -> Result<(), ClientError> {
        let edit = match self.task_edit.clone() {
            Some(edit) => edit,
            None => {
                return self.status.reject(
                    Operation::UpdateTask,
                    ClientError::Validation("No task is being edited".into()),
                )
            }
        };
        let admin_password = self.admin_password(Operation::UpdateTask)?;
        let task = match edit.draft.validate() {
            Ok(task) => task,
            Err(err) => return self.status.reject(Operation::UpdateTask, err),
        };

        self.status.begin(Operation::UpdateTask)?;
        let request = UpdateTaskRequest {
            task_id: edit.task_id,
            new_name: task.name,
            new_description: task.description,
            new_people_needed: task.people_needed,
            new_time_slot: task.time_slot,
            admin_password,
        };
        let result = self.backend.update_task(&request).await;
        let response = self.status.settle(Operation::UpdateTask, result)?;

        self.task_edit = None;
        if let Some(message) = response.message {
            self.status.set_notice(message);
        }
        self.reload().await;
        Ok(())
    }

    pub fn request_task_delete(&mut self, task_id: TaskId) -> Result<&PendingConfirmation, ClientError> {
        match self.find_task(task_id) {
            Some((name, false)) => Ok(self.park(PendingConfirmation::DeleteTask { task_id, name })),
            Some((_, true)) => self.status.reject(
                Operation::DeleteTask,
                ClientError::Validation("Task is already deleted".into()),
            ),
            None => self
                .status
                .reject(Operation::DeleteTask, ClientError::Validation("Task not found".into())),
        }
    }

    pub fn request_task_restore(&mut self, task_id: TaskId) -> Result<&PendingConfirmation, ClientError> {
        match self.find_task(task_id) {
            Some((name, true)) => Ok(self.park(PendingConfirmation::RestoreTask { task_id, name })),
            Some((_, false)) => self.status.reject(
                Operation::RestoreTask,
                ClientError::Validation("Task is not deleted".into()),
            ),
            None => self
                .status
                .reject(Operation::RestoreTask, ClientError::Validation("Task not found".into())),
        }
    }

    fn find_task(&self, task_id: TaskId) -> Option<(String, bool)> {
        self.snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.task(task_id))
            .map(|task| (task.name.clone(), task.is_deleted))
    }

    fn park(&mut self, pending: PendingConfirmation) -> &PendingConfirmation {
        self.pending.insert(pending)
    }

    pub fn cancel_confirmation(&mut self) {
        self.pending = None;
    }

    /// Sends the parked destructive action.
    pub async fn confirm(&mut self) -> Result<MessageResponse, ClientError> {
        let pending = match &self.pending {
            Some(pending) => pending.clone(),
            None => {
                let err = ClientError::Validation("Nothing to confirm".into());
                self.status.set_error(err.user_message("Nothing to confirm"));
                return Err(err);
            }
        };
        let op = pending.operation();
        let admin_password = self.admin_password(op)?;

        // Stays parked until the request is actually sent
        self.status.begin(op)?;
        self.pending = None;
        let result = match pending {
            PendingConfirmation::DeleteMember { member_id, .. } => {
                self.backend
                    .delete_member(&DeleteMemberRequest { member_id, admin_password })
                    .await
            }
            PendingConfirmation::DeleteTask { task_id, .. } => {
                self.backend
                    .delete_task(&TaskActionRequest { task_id, admin_password })
                    .await
            }
            PendingConfirmation::RestoreTask { task_id, .. } => {
                self.backend
                    .restore_task(&TaskActionRequest { task_id, admin_password })
                    .await
            }
        };
        let response = self.status.settle(op, result)?;

        if let Some(message) = &response.message {
            self.status.set_notice(message.clone());
        }
        self.reload().await;
        Ok(response)
    }

    /// Asks the backend to build the schedule for `schedule_date`. On success
    /// the user is sent to the viewer.
    pub async fn generate_schedule(&mut self) -> Result<Route, ClientError> {
        let admin_password = self.admin_password(Operation::GenerateSchedule)?;
        let date = match self.schedule_date {
            Some(date) => date,
            None => {
                return self.status.reject(
                    Operation::GenerateSchedule,
                    ClientError::Validation("Choose a date".into()),
                )
            }
        };
        if !self.can_generate() {
            return self.status.reject(
                Operation::GenerateSchedule,
                ClientError::Validation("The team needs at least one member and one active task".into()),
            );
        }

        self.status.begin(Operation::GenerateSchedule)?;
        let request = GenerateScheduleRequest {
            team_id: self.team_id,
            admin_password,
            date,
        };
        let result = self.backend.generate_schedule(&request).await;
        let response = self.status.settle(Operation::GenerateSchedule, result)?;

        info!("Schedule generated for team {} on {}", self.team_id, date);
        if let Some(message) = response.message {
            self.status.set_notice(message);
        }
        Ok(Route::Viewer)
    }
}
