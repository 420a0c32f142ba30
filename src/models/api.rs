// Request and response bodies of the scheduling API.
// The same types are produced by the routes and consumed by the client backends.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::team::{
    MemberId, PeopleNeeded, ScheduleEntry, TaskId, TeamId, TimeSlot,
};

// Successful responses carry `success: true` next to their payload
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Success<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Success<T> {
    pub fn new(data: T) -> Self {
        Success { success: true, data }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdminLoginRequest {
    pub admin_password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateTeamRequest {
    pub name: String,
}

// Viewer and admin passwords are returned once, on creation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreatedTeam {
    pub team_id: TeamId,
    pub team_password: String,
    pub admin_password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScheduleForDateRequest {
    pub team_password: String,
    pub date: NaiveDate,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DaySchedule {
    pub team_id: TeamId,
    pub team_name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub schedules: Vec<ScheduleEntry>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TaskDetailsRequest {
    pub task_id: TaskId,
    pub team_password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskDetails {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub people_needed: PeopleNeeded,
    #[serde(default)]
    pub time_slot: Option<TimeSlot>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskDetailsResponse {
    pub task: TaskDetails,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AddMemberRequest {
    pub team_id: TeamId,
    pub admin_password: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AddMemberResponse {
    pub member_id: MemberId,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateMemberRequest {
    pub member_id: MemberId,
    pub new_name: String,
    pub admin_password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DeleteMemberRequest {
    pub member_id: MemberId,
    pub admin_password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImportMembersRequest {
    pub team_id: TeamId,
    pub admin_password: String,
    pub members_text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AddTaskRequest {
    pub team_id: TeamId,
    pub admin_password: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub people_needed: PeopleNeeded,
    #[serde(default)]
    pub time_slot: TimeSlot,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AddTaskResponse {
    pub task_id: TaskId,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateTaskRequest {
    pub task_id: TaskId,
    pub new_name: String,
    #[serde(default)]
    pub new_description: String,
    pub new_people_needed: PeopleNeeded,
    #[serde(default)]
    pub new_time_slot: TimeSlot,
    pub admin_password: String,
}

// Body of both delete-task and restore-task
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TaskActionRequest {
    pub task_id: TaskId,
    pub admin_password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImportTasksRequest {
    pub team_id: TeamId,
    pub admin_password: String,
    pub tasks_text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GenerateScheduleRequest {
    pub team_id: TeamId,
    pub admin_password: String,
    pub date: NaiveDate,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: Some(message.into()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub message: String,
    pub total_added: usize,
    pub skipped: usize,
}
