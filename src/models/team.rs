use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

pub type TeamId = u64;
pub type MemberId = u64;
pub type TaskId = u64;
pub type EntryId = u64;

// Raised when a bounded integer is constructed out of range
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display(fmt = "{} must be between {} and {} (got {})", field, min, max, value)]
pub struct RangeError {
    pub field: &'static str,
    pub min: u32,
    pub max: u32,
    pub value: i64,
}

impl std::error::Error for RangeError {}

/// Number of people a task needs in its slot, always within 1..=10.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct PeopleNeeded(u8);

impl PeopleNeeded {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 10;

    pub fn new(value: i64) -> Result<Self, RangeError> {
        if value < Self::MIN as i64 || value > Self::MAX as i64 {
            return Err(RangeError {
                field: "people needed",
                min: Self::MIN,
                max: Self::MAX,
                value,
            });
        }
        Ok(PeopleNeeded(value as u8))
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for PeopleNeeded {
    fn default() -> Self {
        PeopleNeeded(1)
    }
}

impl TryFrom<i64> for PeopleNeeded {
    type Error = RangeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        PeopleNeeded::new(value)
    }
}

impl From<PeopleNeeded> for u32 {
    fn from(value: PeopleNeeded) -> Self {
        value.0 as u32
    }
}

/// One of the five buckets a day is split into. Absent slots mean slot 1.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct TimeSlot(u8);

impl TimeSlot {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 5;

    pub fn new(value: i64) -> Result<Self, RangeError> {
        if value < Self::MIN as i64 || value > Self::MAX as i64 {
            return Err(RangeError {
                field: "time slot",
                min: Self::MIN,
                max: Self::MAX,
                value,
            });
        }
        Ok(TimeSlot(value as u8))
    }

    pub fn get(self) -> u32 {
        self.0 as u32
    }
}

impl Default for TimeSlot {
    fn default() -> Self {
        TimeSlot(1)
    }
}

impl TryFrom<i64> for TimeSlot {
    type Error = RangeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        TimeSlot::new(value)
    }
}

impl From<TimeSlot> for u32 {
    fn from(value: TimeSlot) -> Self {
        value.0 as u32
    }
}

// Team metadata as exposed to clients. Secrets never leave the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Team {
    #[serde(default)]
    pub id: Option<TeamId>,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub people_needed: PeopleNeeded,
    #[serde(default)]
    pub time_slot: TimeSlot,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Task {
    // Soft-deleted tasks stay listed but never enter a new schedule
    pub fn is_schedulable(&self) -> bool {
        !self.is_deleted
    }
}

/// One task placed on one date within one time slot, with the members assigned to it.
///
/// Entries only ever come from the schedule generator; clients read them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub id: EntryId,
    pub task: String,
    pub task_id: TaskId,
    #[serde(default)]
    pub task_description: Option<String>,
    #[serde(default)]
    pub time_slot: Option<TimeSlot>,
    pub members: Vec<String>,
}

impl ScheduleEntry {
    pub fn slot(&self) -> TimeSlot {
        self.time_slot.unwrap_or_default()
    }

    /// Only entries with a description open a task-detail lookup.
    pub fn is_selectable(&self) -> bool {
        self.task_description.is_some()
    }
}

/// Full state of one team as returned by `team-info`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TeamSnapshot {
    pub team: Team,
    pub members: Vec<Member>,
    pub tasks: Vec<Task>,
}

impl TeamSnapshot {
    pub fn member(&self, member_id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == member_id)
    }

    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }

    // Tasks a generation request may place on the schedule
    pub fn schedulable_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_schedulable())
    }

    pub fn can_generate(&self) -> bool {
        !self.members.is_empty() && self.schedulable_tasks().next().is_some()
    }
}
