// team-scheduler/src/utils/team_storage.rs
// In-memory store behind the scheduling API. Every operation re-checks the
// password it was given; nothing is trusted from earlier calls.
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::import::{parse_members, parse_tasks};
use crate::models::*;
use crate::utils::password::{self, ADMIN_PASSWORD_LEN, VIEWER_PASSWORD_LEN};
use crate::utils::scheduler;

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub site_admin_password: Option<String>,
    pub bcrypt_cost: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            site_admin_password: None,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

struct TeamRecord {
    id: TeamId,
    name: String,
    viewer_password: String,
    admin_password_hash: String,
    created_at: DateTime<Utc>,
}

struct MemberRecord {
    team_id: TeamId,
    member: Member,
}

struct TaskRecord {
    team_id: TeamId,
    task: Task,
}

struct StoredEntry {
    id: EntryId,
    team_id: TeamId,
    date: NaiveDate,
    task_id: TaskId,
    member_ids: Vec<MemberId>,
}

#[derive(Default)]
struct StoreState {
    next_id: u64,
    teams: BTreeMap<TeamId, TeamRecord>,
    members: BTreeMap<MemberId, MemberRecord>,
    tasks: BTreeMap<TaskId, TaskRecord>,
    entries: Vec<StoredEntry>,
}

impl StoreState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn team(&self, team_id: TeamId) -> Result<&TeamRecord, ServiceError> {
        self.teams
            .get(&team_id)
            .ok_or_else(|| ServiceError::not_found("Team not found"))
    }

    fn team_by_viewer_password(&self, team_password: &str) -> Result<&TeamRecord, ServiceError> {
        self.teams
            .values()
            .find(|team| team.viewer_password == team_password)
            .ok_or_else(|| ServiceError::Unauthorized("Invalid team password".to_string()))
    }

    fn team_members(&self, team_id: TeamId) -> impl Iterator<Item = &Member> {
        self.members
            .values()
            .filter(move |record| record.team_id == team_id)
            .map(|record| &record.member)
    }

    fn team_tasks(&self, team_id: TeamId) -> impl Iterator<Item = &Task> {
        self.tasks
            .values()
            .filter(move |record| record.team_id == team_id)
            .map(|record| &record.task)
    }

    fn find_task_by_name(&self, team_id: TeamId, name: &str) -> Option<TaskId> {
        self.team_tasks(team_id).find(|t| t.name == name).map(|t| t.id)
    }

    fn insert_task(&mut self, team_id: TeamId, name: &str, description: &str, people_needed: PeopleNeeded, time_slot: TimeSlot) -> TaskId {
        let id = self.allocate_id();
        self.tasks.insert(
            id,
            TaskRecord {
                team_id,
                task: Task {
                    id,
                    name: name.to_string(),
                    description: non_empty(description),
                    people_needed,
                    time_slot,
                    is_deleted: false,
                },
            },
        );
        id
    }

    fn snapshot(&self, team_id: TeamId) -> Result<TeamSnapshot, ServiceError> {
        let team = self.team(team_id)?;
        Ok(TeamSnapshot {
            team: Team {
                id: Some(team.id),
                name: team.name.clone(),
                created_at: Some(team.created_at),
            },
            members: self.team_members(team_id).cloned().collect(),
            tasks: self.team_tasks(team_id).cloned().collect(),
        })
    }
}

/// Shared handle to the store. Clones see the same data.
#[derive(Clone)]
pub struct TeamStore {
    state: Arc<Mutex<StoreState>>,
    settings: Arc<StoreSettings>,
}

impl TeamStore {
    pub fn new(settings: StoreSettings) -> Self {
        TeamStore {
            state: Arc::new(Mutex::new(StoreState::default())),
            settings: Arc::new(settings),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, ServiceError> {
        self.state
            .lock()
            .map_err(|_| ServiceError::Internal("Store lock poisoned".to_string()))
    }

    /// Verifies the team admin password. The lock is only held to copy the
    /// hash; callers re-lock and re-check their entities afterwards.
    fn authorize_admin(&self, team_id: TeamId, admin_password: &str) -> Result<(), ServiceError> {
        let admin_password_hash = self.lock()?.team(team_id)?.admin_password_hash.clone();
        if !password::verify_password(admin_password, &admin_password_hash)? {
            warn!("Rejected admin password for team: {}", team_id);
            return Err(ServiceError::wrong_admin_password());
        }
        Ok(())
    }

    fn member_team(&self, member_id: MemberId) -> Result<TeamId, ServiceError> {
        self.lock()?
            .members
            .get(&member_id)
            .map(|record| record.team_id)
            .ok_or_else(|| ServiceError::not_found("Member not found"))
    }

    fn task_team(&self, task_id: TaskId) -> Result<TeamId, ServiceError> {
        self.lock()?
            .tasks
            .get(&task_id)
            .map(|record| record.team_id)
            .ok_or_else(|| ServiceError::not_found("Task not found"))
    }

    pub fn admin_login(&self, request: &AdminLoginRequest) -> Result<MessageResponse, ServiceError> {
        let expected = self.settings.site_admin_password.as_deref().ok_or_else(|| {
            ServiceError::Internal("Site admin password is not configured on the server".to_string())
        })?;

        if request.admin_password.is_empty() {
            return Err(ServiceError::bad_request("Admin password is required"));
        }
        if request.admin_password != expected {
            return Err(ServiceError::wrong_admin_password());
        }

        Ok(MessageResponse::new("Signed in"))
    }

    pub fn create_team(&self, request: &CreateTeamRequest) -> Result<CreatedTeam, ServiceError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ServiceError::bad_request("Team name is required"));
        }

        let admin_password = password::generate(ADMIN_PASSWORD_LEN);
        let admin_password_hash = password::hash_password(&admin_password, self.settings.bcrypt_cost)?;

        let mut state = self.lock()?;
        let mut viewer_password = password::generate(VIEWER_PASSWORD_LEN);
        while state.teams.values().any(|t| t.viewer_password == viewer_password) {
            viewer_password = password::generate(VIEWER_PASSWORD_LEN);
        }

        let id = state.allocate_id();
        state.teams.insert(
            id,
            TeamRecord {
                id,
                name: name.to_string(),
                viewer_password: viewer_password.clone(),
                admin_password_hash,
                created_at: Utc::now(),
            },
        );

        info!("Created team {} ({})", id, name);
        Ok(CreatedTeam {
            team_id: id,
            team_password: viewer_password,
            admin_password,
        })
    }

    pub fn team_info(&self, team_id: TeamId) -> Result<TeamSnapshot, ServiceError> {
        self.lock()?.snapshot(team_id)
    }

    pub fn add_member(&self, request: &AddMemberRequest) -> Result<AddMemberResponse, ServiceError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ServiceError::bad_request("Member name is required"));
        }

        self.authorize_admin(request.team_id, &request.admin_password)?;
        let mut state = self.lock()?;

        if state.team_members(request.team_id).any(|m| m.name == name) {
            return Err(ServiceError::bad_request("A member with this name already exists"));
        }

        let id = state.allocate_id();
        state.members.insert(
            id,
            MemberRecord {
                team_id: request.team_id,
                member: Member { id, name: name.to_string() },
            },
        );

        Ok(AddMemberResponse { member_id: id })
    }

    pub fn import_members(&self, request: &ImportMembersRequest) -> Result<ImportSummary, ServiceError> {
        if crate::import::is_blank(&request.members_text) {
            return Err(ServiceError::bad_request("The text contains no names"));
        }

        self.authorize_admin(request.team_id, &request.admin_password)?;
        let mut state = self.lock()?;

        let parsed = parse_members(
            &request.members_text,
            state.team_members(request.team_id).map(|m| m.name.as_str()),
        );
        if parsed.accepted.is_empty() {
            return Err(ServiceError::bad_request("All members already exist"));
        }

        for name in &parsed.accepted {
            let id = state.allocate_id();
            state.members.insert(
                id,
                MemberRecord {
                    team_id: request.team_id,
                    member: Member { id, name: name.clone() },
                },
            );
        }

        debug!("Imported {} members into team {}", parsed.total_added(), request.team_id);
        Ok(ImportSummary {
            message: format!("Added {} new members", parsed.total_added()),
            total_added: parsed.total_added(),
            skipped: parsed.skipped,
        })
    }

    pub fn update_member(&self, request: &UpdateMemberRequest) -> Result<MessageResponse, ServiceError> {
        let new_name = request.new_name.trim();
        if new_name.is_empty() {
            return Err(ServiceError::bad_request("Member name is required"));
        }

        let team_id = self.member_team(request.member_id)?;
        self.authorize_admin(team_id, &request.admin_password)?;
        let mut state = self.lock()?;

        if state
            .team_members(team_id)
            .any(|m| m.name == new_name && m.id != request.member_id)
        {
            return Err(ServiceError::bad_request("A member with this name already exists"));
        }

        let record = state
            .members
            .get_mut(&request.member_id)
            .ok_or_else(|| ServiceError::not_found("Member not found"))?;
        let old_name = std::mem::replace(&mut record.member.name, new_name.to_string());

        Ok(MessageResponse::new(format!("Member {} was renamed to {}", old_name, new_name)))
    }

    pub fn delete_member(&self, request: &DeleteMemberRequest) -> Result<MessageResponse, ServiceError> {
        let team_id = self.member_team(request.member_id)?;
        self.authorize_admin(team_id, &request.admin_password)?;
        let mut state = self.lock()?;

        if state
            .entries
            .iter()
            .any(|entry| entry.member_ids.contains(&request.member_id))
        {
            return Err(ServiceError::bad_request(
                "Member cannot be deleted while assigned in a schedule",
            ));
        }

        let record = state
            .members
            .remove(&request.member_id)
            .ok_or_else(|| ServiceError::not_found("Member not found"))?;

        Ok(MessageResponse::new(format!("Member {} was deleted", record.member.name)))
    }

    pub fn add_task(&self, request: &AddTaskRequest) -> Result<AddTaskResponse, ServiceError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ServiceError::bad_request("Task name is required"));
        }

        self.authorize_admin(request.team_id, &request.admin_password)?;
        let mut state = self.lock()?;

        match state.find_task_by_name(request.team_id, name) {
            Some(task_id) => {
                let record = state
                    .tasks
                    .get_mut(&task_id)
                    .ok_or_else(|| ServiceError::not_found("Task not found"))?;
                if !record.task.is_deleted {
                    return Err(ServiceError::bad_request("A task with this name already exists"));
                }

                // Re-adding a deleted task brings it back with the new fields
                record.task.description = non_empty(request.description.trim());
                record.task.people_needed = request.people_needed;
                record.task.time_slot = request.time_slot;
                record.task.is_deleted = false;

                Ok(AddTaskResponse {
                    task_id,
                    message: Some("The deleted task was restored".to_string()),
                })
            }
            None => {
                let task_id = state.insert_task(
                    request.team_id,
                    name,
                    request.description.trim(),
                    request.people_needed,
                    request.time_slot,
                );
                Ok(AddTaskResponse { task_id, message: None })
            }
        }
    }

    pub fn import_tasks(&self, request: &ImportTasksRequest) -> Result<ImportSummary, ServiceError> {
        if crate::import::is_blank(&request.tasks_text) {
            return Err(ServiceError::bad_request("The text contains no tasks"));
        }

        self.authorize_admin(request.team_id, &request.admin_password)?;
        let mut state = self.lock()?;

        let parsed = parse_tasks(&request.tasks_text);
        let mut created = 0;
        let mut restored = 0;
        let mut skipped = parsed.skipped;
        let mut seen: Vec<&str> = Vec::new();

        for line in &parsed.accepted {
            if seen.contains(&line.name.as_str()) {
                skipped += 1;
                continue;
            }
            seen.push(&line.name);

            match state.find_task_by_name(request.team_id, &line.name) {
                Some(task_id) => match state.tasks.get_mut(&task_id) {
                    Some(record) if record.task.is_deleted => {
                        record.task.description = non_empty(&line.description);
                        record.task.people_needed = line.people_needed;
                        record.task.time_slot = line.time_slot;
                        record.task.is_deleted = false;
                        restored += 1;
                    }
                    _ => skipped += 1,
                },
                None => {
                    state.insert_task(
                        request.team_id,
                        &line.name,
                        &line.description,
                        line.people_needed,
                        line.time_slot,
                    );
                    created += 1;
                }
            }
        }

        if created + restored == 0 {
            return Err(ServiceError::bad_request("No new tasks could be added"));
        }

        Ok(ImportSummary {
            message: format!("Added {} new tasks and restored {} deleted tasks", created, restored),
            total_added: created + restored,
            skipped,
        })
    }

    pub fn update_task(&self, request: &UpdateTaskRequest) -> Result<MessageResponse, ServiceError> {
        let new_name = request.new_name.trim();
        if new_name.is_empty() {
            return Err(ServiceError::bad_request("Task name is required"));
        }

        let team_id = self.task_team(request.task_id)?;
        self.authorize_admin(team_id, &request.admin_password)?;
        let mut state = self.lock()?;

        if state
            .team_tasks(team_id)
            .any(|t| t.name == new_name && !t.is_deleted && t.id != request.task_id)
        {
            return Err(ServiceError::bad_request("A task with this name already exists"));
        }

        let record = state
            .tasks
            .get_mut(&request.task_id)
            .ok_or_else(|| ServiceError::not_found("Task not found"))?;
        let old_name = std::mem::replace(&mut record.task.name, new_name.to_string());
        record.task.description = non_empty(request.new_description.trim());
        record.task.people_needed = request.new_people_needed;
        record.task.time_slot = request.new_time_slot;

        Ok(MessageResponse::new(format!("Task {} was updated", old_name)))
    }

    pub fn delete_task(&self, request: &TaskActionRequest) -> Result<MessageResponse, ServiceError> {
        self.set_task_deleted(request, true)
    }

    pub fn restore_task(&self, request: &TaskActionRequest) -> Result<MessageResponse, ServiceError> {
        self.set_task_deleted(request, false)
    }

    fn set_task_deleted(&self, request: &TaskActionRequest, deleted: bool) -> Result<MessageResponse, ServiceError> {
        let team_id = self.task_team(request.task_id)?;
        self.authorize_admin(team_id, &request.admin_password)?;
        let mut state = self.lock()?;

        let record = state
            .tasks
            .get_mut(&request.task_id)
            .ok_or_else(|| ServiceError::not_found("Task not found"))?;
        if !deleted && !record.task.is_deleted {
            return Err(ServiceError::bad_request("Task is not deleted"));
        }
        record.task.is_deleted = deleted;

        let message = if deleted {
            format!("Task {} was deleted (existing schedules are kept)", record.task.name)
        } else {
            format!("Task {} was restored", record.task.name)
        };
        Ok(MessageResponse::new(message))
    }

    /// Replaces whatever was stored for `(team, date)`.
    pub fn generate_schedule(&self, request: &GenerateScheduleRequest) -> Result<MessageResponse, ServiceError> {
        self.authorize_admin(request.team_id, &request.admin_password)?;
        let mut state = self.lock()?;

        let members: Vec<Member> = state.team_members(request.team_id).cloned().collect();
        let tasks: Vec<Task> = state.team_tasks(request.team_id).cloned().collect();

        let mut history: HashMap<MemberId, usize> = HashMap::new();
        for entry in state
            .entries
            .iter()
            .filter(|e| e.team_id == request.team_id && e.date < request.date)
        {
            for id in &entry.member_ids {
                *history.entry(*id).or_insert(0) += 1;
            }
        }

        let assignments = scheduler::assign(&members, &tasks, &history, request.date)?;

        state
            .entries
            .retain(|e| !(e.team_id == request.team_id && e.date == request.date));
        for assignment in assignments {
            let id = state.allocate_id();
            state.entries.push(StoredEntry {
                id,
                team_id: request.team_id,
                date: request.date,
                task_id: assignment.task_id,
                member_ids: assignment.member_ids,
            });
        }

        info!("Generated schedule for team {} on {}", request.team_id, request.date);
        Ok(MessageResponse::new(format!(
            "Schedule generated for {}",
            request.date.format("%d.%m.%Y")
        )))
    }

    pub fn schedule_for_date(&self, request: &ScheduleForDateRequest) -> Result<DaySchedule, ServiceError> {
        let state = self.lock()?;
        let team = state.team_by_viewer_password(&request.team_password)?;

        let mut schedules: Vec<ScheduleEntry> = state
            .entries
            .iter()
            .filter(|e| e.team_id == team.id && e.date == request.date)
            .filter_map(|e| {
                let task = &state.tasks.get(&e.task_id)?.task;
                Some(ScheduleEntry {
                    id: e.id,
                    task: task.name.clone(),
                    task_id: task.id,
                    task_description: task.description.clone(),
                    time_slot: Some(task.time_slot),
                    members: e
                        .member_ids
                        .iter()
                        .filter_map(|id| state.members.get(id))
                        .map(|record| record.member.name.clone())
                        .collect(),
                })
            })
            .collect();
        schedules.sort_by_key(|entry| entry.slot());

        let message = if schedules.is_empty() {
            Some(format!(
                "No schedule has been generated for {}",
                request.date.format("%d.%m.%Y")
            ))
        } else {
            None
        };

        Ok(DaySchedule {
            team_id: team.id,
            team_name: team.name.clone(),
            date: request.date,
            schedules,
            message,
        })
    }

    pub fn task_details(&self, request: &TaskDetailsRequest) -> Result<TaskDetailsResponse, ServiceError> {
        let state = self.lock()?;
        let team = state.team_by_viewer_password(&request.team_password)?;

        let task = state
            .tasks
            .get(&request.task_id)
            .filter(|record| record.team_id == team.id)
            .map(|record| &record.task)
            .ok_or_else(|| ServiceError::not_found("Task not found"))?;

        Ok(TaskDetailsResponse {
            task: TaskDetails {
                name: task.name.clone(),
                description: task.description.clone(),
                people_needed: task.people_needed,
                time_slot: Some(task.time_slot),
            },
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::{Duration, Instant};

    fn store() -> TeamStore {
        TeamStore::new(StoreSettings {
            site_admin_password: Some("root".to_string()),
            bcrypt_cost: 4,
        })
    }

    fn team(store: &TeamStore) -> CreatedTeam {
        store
            .create_team(&CreateTeamRequest { name: "Kitchen".to_string() })
            .unwrap()
    }

    fn add_task(store: &TeamStore, created: &CreatedTeam, name: &str, people: i64) -> TaskId {
        store
            .add_task(&AddTaskRequest {
                team_id: created.team_id,
                admin_password: created.admin_password.clone(),
                name: name.to_string(),
                description: String::new(),
                people_needed: PeopleNeeded::new(people).unwrap(),
                time_slot: TimeSlot::default(),
            })
            .unwrap()
            .task_id
    }

    fn import_members(store: &TeamStore, created: &CreatedTeam, text: &str) -> Result<ImportSummary, ServiceError> {
        store.import_members(&ImportMembersRequest {
            team_id: created.team_id,
            admin_password: created.admin_password.clone(),
            members_text: text.to_string(),
        })
    }

    #[test]
    fn site_admin_login() {
        let store = store();
        assert!(store.admin_login(&AdminLoginRequest { admin_password: "root".into() }).is_ok());
        assert_eq!(
            store.admin_login(&AdminLoginRequest { admin_password: "nope".into() }),
            Err(ServiceError::wrong_admin_password())
        );

        let unconfigured = TeamStore::new(StoreSettings { site_admin_password: None, bcrypt_cost: 4 });
        assert!(matches!(
            unconfigured.admin_login(&AdminLoginRequest { admin_password: "root".into() }),
            Err(ServiceError::Internal(_))
        ));
    }

    #[test]
    fn created_team_passwords_have_expected_shape() {
        let store = store();
        let created = team(&store);

        assert_eq!(created.team_password.len(), 8);
        assert_eq!(created.admin_password.len(), 10);
        assert!(store.create_team(&CreateTeamRequest { name: "  ".into() }).is_err());
    }

    #[test]
    fn mutations_require_the_team_admin_password() {
        let store = store();
        let created = team(&store);

        let err = store
            .add_member(&AddMemberRequest {
                team_id: created.team_id,
                admin_password: created.team_password.clone(),
                name: "Ana".into(),
            })
            .unwrap_err();
        assert_eq!(err, ServiceError::wrong_admin_password());
    }

    #[test]
    fn member_import_skips_existing_names() {
        let store = store();
        let created = team(&store);

        let first = import_members(&store, &created, "Ana\nBoris").unwrap();
        assert_eq!((first.total_added, first.skipped), (2, 0));

        let second = import_members(&store, &created, "Boris\nCyril\nCyril").unwrap();
        assert_eq!((second.total_added, second.skipped), (1, 2));

        let names: Vec<String> = store
            .team_info(created.team_id)
            .unwrap()
            .members
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Ana", "Boris", "Cyril"]);

        assert!(import_members(&store, &created, "Ana").is_err());
    }

    #[test]
    fn task_import_restores_deleted_tasks_and_skips_active_ones() {
        let store = store();
        let created = team(&store);
        let dishes = add_task(&store, &created, "Dishes", 1);
        add_task(&store, &created, "Laundry", 1);
        store
            .delete_task(&TaskActionRequest { task_id: dishes, admin_password: created.admin_password.clone() })
            .unwrap();

        let summary = store
            .import_tasks(&ImportTasksRequest {
                team_id: created.team_id,
                admin_password: created.admin_password.clone(),
                tasks_text: "Dishes (2) - Pots too - 2\nLaundry (1)\nShopping (1)\nbroken line".into(),
            })
            .unwrap();
        assert_eq!((summary.total_added, summary.skipped), (2, 2));

        let snapshot = store.team_info(created.team_id).unwrap();
        let restored = snapshot.task(dishes).unwrap();
        assert!(!restored.is_deleted);
        assert_eq!(restored.people_needed.get(), 2);
        assert_eq!(restored.description.as_deref(), Some("Pots too"));
        assert_eq!(snapshot.tasks.len(), 3);
    }

    #[test]
    fn restore_requires_a_deleted_task() {
        let store = store();
        let created = team(&store);
        let task_id = add_task(&store, &created, "Dishes", 1);
        let request = TaskActionRequest { task_id, admin_password: created.admin_password.clone() };

        assert!(matches!(store.restore_task(&request), Err(ServiceError::BadRequest(_))));
        store.delete_task(&request).unwrap();
        assert!(store.team_info(created.team_id).unwrap().task(task_id).unwrap().is_deleted);
        store.restore_task(&request).unwrap();
        assert!(!store.team_info(created.team_id).unwrap().task(task_id).unwrap().is_deleted);
    }

    #[test]
    fn regenerating_replaces_the_day() {
        let store = store();
        let created = team(&store);
        import_members(&store, &created, "Ana\nBoris").unwrap();
        add_task(&store, &created, "Dishes", 1);
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let generate = GenerateScheduleRequest {
            team_id: created.team_id,
            admin_password: created.admin_password.clone(),
            date,
        };

        store.generate_schedule(&generate).unwrap();
        store.generate_schedule(&generate).unwrap();

        let day = store
            .schedule_for_date(&ScheduleForDateRequest { team_password: created.team_password.clone(), date })
            .unwrap();
        assert_eq!(day.schedules.len(), 1);
        assert_eq!(day.schedules[0].members.len(), 1);
        assert_eq!(day.schedules[0].task_description, None);
        assert_eq!(day.message, None);
    }

    #[test]
    fn assigned_members_cannot_be_deleted() {
        let store = store();
        let created = team(&store);
        let member_id = store
            .add_member(&AddMemberRequest {
                team_id: created.team_id,
                admin_password: created.admin_password.clone(),
                name: "Ana".into(),
            })
            .unwrap()
            .member_id;
        add_task(&store, &created, "Dishes", 1);
        store
            .generate_schedule(&GenerateScheduleRequest {
                team_id: created.team_id,
                admin_password: created.admin_password.clone(),
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            })
            .unwrap();

        let err = store
            .delete_member(&DeleteMemberRequest { member_id, admin_password: created.admin_password.clone() })
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }

    fn generate(created: &CreatedTeam, admin_password: &str) -> GenerateScheduleRequest {
        GenerateScheduleRequest {
            team_id: created.team_id,
            admin_password: admin_password.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    fn rename_task(created: &CreatedTeam, task_id: TaskId, new_name: &str) -> UpdateTaskRequest {
        UpdateTaskRequest {
            task_id,
            new_name: new_name.to_string(),
            new_description: String::new(),
            new_people_needed: PeopleNeeded::default(),
            new_time_slot: TimeSlot::default(),
            admin_password: created.admin_password.clone(),
        }
    }

    #[test]
    fn reads_do_not_wait_for_password_checks() {
        let store = TeamStore::new(StoreSettings { site_admin_password: None, bcrypt_cost: 10 });
        let created = team(&store);

        let hashed = password::hash_password("ABCDEFGHIJ", 10).unwrap();
        let started = Instant::now();
        password::verify_password("KLMNOPQRST", &hashed).unwrap();
        let one_check = started.elapsed();

        let writer = {
            let store = store.clone();
            let team_id = created.team_id;
            thread::spawn(move || {
                for _ in 0..3 {
                    let result = store.add_member(&AddMemberRequest {
                        team_id,
                        admin_password: "not-the-password".into(),
                        name: "Ana".into(),
                    });
                    assert_eq!(result, Err(ServiceError::wrong_admin_password()));
                }
            })
        };

        let mut slowest = Duration::ZERO;
        while !writer.is_finished() {
            let started = Instant::now();
            store.team_info(created.team_id).unwrap();
            slowest = slowest.max(started.elapsed());
        }
        writer.join().unwrap();

        assert!(
            slowest < one_check / 3,
            "team-info took {:?} while a bcrypt check takes {:?}",
            slowest,
            one_check
        );
    }

    #[test]
    fn task_details_are_scoped_to_the_viewer_team() {
        let store = store();
        let kitchen = team(&store);
        let garden = store
            .create_team(&CreateTeamRequest { name: "Garden".to_string() })
            .unwrap();
        let dishes = add_task(&store, &kitchen, "Dishes", 2);

        let details = store
            .task_details(&TaskDetailsRequest { task_id: dishes, team_password: kitchen.team_password.clone() })
            .unwrap();
        assert_eq!(details.task.name, "Dishes");
        assert_eq!(details.task.people_needed.get(), 2);

        let err = store
            .task_details(&TaskDetailsRequest { task_id: dishes, team_password: garden.team_password.clone() })
            .unwrap_err();
        assert_eq!(err, ServiceError::not_found("Task not found"));
    }

    #[test]
    fn member_rename_rejects_a_name_in_use() {
        let store = store();
        let created = team(&store);
        import_members(&store, &created, "Ana\nBoris").unwrap();
        let members = store.team_info(created.team_id).unwrap().members;
        let rename = |member_id: MemberId, new_name: &str| {
            store.update_member(&UpdateMemberRequest {
                member_id,
                new_name: new_name.to_string(),
                admin_password: created.admin_password.clone(),
            })
        };

        assert!(matches!(rename(members[1].id, "Ana"), Err(ServiceError::BadRequest(_))));
        assert!(rename(members[0].id, "Ana").is_ok());
        assert!(rename(members[1].id, "Cyril").is_ok());

        let names: Vec<String> = store
            .team_info(created.team_id)
            .unwrap()
            .members
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Ana", "Cyril"]);
    }

    #[test]
    fn task_rename_only_collides_with_active_tasks() {
        let store = store();
        let created = team(&store);
        let dishes = add_task(&store, &created, "Dishes", 1);
        let laundry = add_task(&store, &created, "Laundry", 1);

        let err = store.update_task(&rename_task(&created, laundry, "Dishes")).unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
        assert!(store.update_task(&rename_task(&created, dishes, "Dishes")).is_ok());

        store
            .delete_task(&TaskActionRequest { task_id: dishes, admin_password: created.admin_password.clone() })
            .unwrap();
        store.update_task(&rename_task(&created, laundry, "Dishes")).unwrap();

        let snapshot = store.team_info(created.team_id).unwrap();
        assert_eq!(snapshot.task(laundry).unwrap().name, "Dishes");
        assert!(snapshot.task(dishes).unwrap().is_deleted);
    }

    #[test]
    fn adding_a_deleted_task_name_restores_it() {
        let store = store();
        let created = team(&store);
        let dishes = add_task(&store, &created, "Dishes", 1);
        store
            .delete_task(&TaskActionRequest { task_id: dishes, admin_password: created.admin_password.clone() })
            .unwrap();

        let request = AddTaskRequest {
            team_id: created.team_id,
            admin_password: created.admin_password.clone(),
            name: "Dishes".to_string(),
            description: "Pots too".to_string(),
            people_needed: PeopleNeeded::new(3).unwrap(),
            time_slot: TimeSlot::new(2).unwrap(),
        };
        let response = store.add_task(&request).unwrap();
        assert_eq!(response.task_id, dishes);
        assert!(response.message.is_some());

        let snapshot = store.team_info(created.team_id).unwrap();
        assert_eq!(snapshot.tasks.len(), 1);
        let restored = snapshot.task(dishes).unwrap();
        assert!(!restored.is_deleted);
        assert_eq!(restored.people_needed.get(), 3);
        assert_eq!(restored.time_slot.get(), 2);
        assert_eq!(restored.description.as_deref(), Some("Pots too"));

        assert!(matches!(store.add_task(&request), Err(ServiceError::BadRequest(_))));
    }

    #[test]
    fn task_actions_and_generation_check_the_admin_password() {
        let store = store();
        let created = team(&store);
        import_members(&store, &created, "Ana").unwrap();
        let dishes = add_task(&store, &created, "Dishes", 1);
        let wrong = TaskActionRequest { task_id: dishes, admin_password: created.team_password.clone() };

        assert_eq!(store.delete_task(&wrong), Err(ServiceError::wrong_admin_password()));
        assert!(!store.team_info(created.team_id).unwrap().task(dishes).unwrap().is_deleted);

        store
            .delete_task(&TaskActionRequest { task_id: dishes, admin_password: created.admin_password.clone() })
            .unwrap();
        assert_eq!(store.restore_task(&wrong), Err(ServiceError::wrong_admin_password()));
        assert!(store.team_info(created.team_id).unwrap().task(dishes).unwrap().is_deleted);

        assert_eq!(
            store.generate_schedule(&generate(&created, &created.team_password)),
            Err(ServiceError::wrong_admin_password())
        );
        let day = store
            .schedule_for_date(&ScheduleForDateRequest {
                team_password: created.team_password.clone(),
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            })
            .unwrap();
        assert!(day.schedules.is_empty());
    }

    #[test]
    fn unknown_viewer_password_is_unauthorized() {
        let store = store();
        team(&store);

        let err = store
            .schedule_for_date(&ScheduleForDateRequest {
                team_password: "WRONG123".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }
}
