// Member-to-task assignment for one day.
// Fair, not optimal: fewest past assignments first, rotating with the date.
use chrono::{Datelike, NaiveDate};
use std::collections::{HashMap, HashSet};

use crate::models::{Member, MemberId, ServiceError, Task, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub task_id: TaskId,
    pub member_ids: Vec<MemberId>,
}

/// Assign members to every schedulable task in `tasks`.
///
/// Tasks are handled slot by slot, in the order given within a slot. A member
/// is only reused inside a slot once everybody else is taken. Fails before
/// assigning anything if a task needs more people than the team has.
pub fn assign(
    members: &[Member],
    tasks: &[Task],
    history: &HashMap<MemberId, usize>,
    date: NaiveDate,
) -> Result<Vec<Assignment>, ServiceError> {
    let mut tasks: Vec<&Task> = tasks.iter().filter(|t| t.is_schedulable()).collect();
    if members.is_empty() || tasks.is_empty() {
        return Err(ServiceError::bad_request(
            "The team needs at least one member and one active task",
        ));
    }

    if let Some(task) = tasks.iter().find(|t| t.people_needed.get() > members.len()) {
        return Err(ServiceError::BadRequest(format!(
            "Task {} needs {} people but the team only has {} members",
            task.name,
            task.people_needed,
            members.len()
        )));
    }

    tasks.sort_by_key(|t| t.time_slot);

    let offset = date.num_days_from_ce().unsigned_abs() as usize % members.len();
    let rotation: Vec<MemberId> = members
        .iter()
        .cycle()
        .skip(offset)
        .take(members.len())
        .map(|m| m.id)
        .collect();

    let mut counts = history.clone();
    let mut used_in_slot: HashSet<MemberId> = HashSet::new();
    let mut current_slot = None;
    let mut assignments = Vec::with_capacity(tasks.len());

    for task in tasks {
        if current_slot != Some(task.time_slot) {
            current_slot = Some(task.time_slot);
            used_in_slot.clear();
        }

        let mut ranked: Vec<(usize, MemberId)> = rotation.iter().copied().enumerate().collect();
        ranked.sort_by_key(|(position, id)| {
            (
                used_in_slot.contains(id),
                counts.get(id).copied().unwrap_or(0),
                *position,
            )
        });

        let member_ids: Vec<MemberId> = ranked
            .into_iter()
            .take(task.people_needed.get())
            .map(|(_, id)| id)
            .collect();

        for id in &member_ids {
            *counts.entry(*id).or_insert(0) += 1;
            used_in_slot.insert(*id);
        }

        assignments.push(Assignment {
            task_id: task.id,
            member_ids,
        });
    }

    Ok(assignments)
}
