// In-process backend over a TeamStore; same semantics as the HTTP API without the wire
use super::{Backend, ClientError};
use crate::models::*;
use crate::utils::team_storage::TeamStore;

#[derive(Clone)]
pub struct LocalBackend {
    store: TeamStore,
}

impl LocalBackend {
    pub fn new(store: TeamStore) -> Self {
        LocalBackend { store }
    }

    pub fn store(&self) -> &TeamStore {
        &self.store
    }
}

impl Backend for LocalBackend {
    async fn admin_login(&self, request: &AdminLoginRequest) -> Result<MessageResponse, ClientError> {
        Ok(self.store.admin_login(request)?)
    }

    async fn create_team(&self, request: &CreateTeamRequest) -> Result<CreatedTeam, ClientError> {
        Ok(self.store.create_team(request)?)
    }

    async fn team_info(&self, team_id: TeamId) -> Result<TeamSnapshot, ClientError> {
        Ok(self.store.team_info(team_id)?)
    }

    async fn add_member(&self, request: &AddMemberRequest) -> Result<AddMemberResponse, ClientError> {
        Ok(self.store.add_member(request)?)
    }

    async fn update_member(&self, request: &UpdateMemberRequest) -> Result<MessageResponse, ClientError> {
        Ok(self.store.update_member(request)?)
    }

    async fn delete_member(&self, request: &DeleteMemberRequest) -> Result<MessageResponse, ClientError> {
        Ok(self.store.delete_member(request)?)
    }

    async fn import_members(&self, request: &ImportMembersRequest) -> Result<ImportSummary, ClientError> {
        Ok(self.store.import_members(request)?)
    }

    async fn add_task(&self, request: &AddTaskRequest) -> Result<AddTaskResponse, ClientError> {
        Ok(self.store.add_task(request)?)
    }

    async fn update_task(&self, request: &UpdateTaskRequest) -> Result<MessageResponse, ClientError> {
        Ok(self.store.update_task(request)?)
    }

    async fn delete_task(&self, request: &TaskActionRequest) -> Result<MessageResponse, ClientError> {
        Ok(self.store.delete_task(request)?)
    }

    async fn restore_task(&self, request: &TaskActionRequest) -> Result<MessageResponse, ClientError> {
        Ok(self.store.restore_task(request)?)
    }

    async fn import_tasks(&self, request: &ImportTasksRequest) -> Result<ImportSummary, ClientError> {
        Ok(self.store.import_tasks(request)?)
    }

    async fn generate_schedule(&self, request: &GenerateScheduleRequest) -> Result<MessageResponse, ClientError> {
        Ok(self.store.generate_schedule(request)?)
    }

    async fn schedule_for_date(&self, request: &ScheduleForDateRequest) -> Result<DaySchedule, ClientError> {
        Ok(self.store.schedule_for_date(request)?)
    }

    async fn task_details(&self, request: &TaskDetailsRequest) -> Result<TaskDetailsResponse, ClientError> {
        Ok(self.store.task_details(request)?)
    }
}
