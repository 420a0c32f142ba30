use lazy_static::lazy_static;
use regex::Regex;

use super::{candidate_lines, ParsedImport};
use crate::models::{PeopleNeeded, TimeSlot};

lazy_static! {
    // `<Name> (<PeopleNeeded>)<tail>`, name ends at the first " ("
    static ref TASK_LINE: Regex = Regex::new(r"^(?P<name>.+?) \((?P<people>[^)]*)\)(?P<tail>.*)$")
        .expect("task line pattern");
}

/// One accepted line of a task import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLine {
    pub name: String,
    pub people_needed: PeopleNeeded,
    pub description: String,
    pub time_slot: TimeSlot,
}

/// Parse `<Name> (<PeopleNeeded>) - <Description> - <TimeSlot>`.
///
/// The description and time slot are optional; a missing slot means slot 1.
/// Returns `None` for anything that does not fit.
pub fn parse_task_line(line: &str) -> Option<TaskLine> {
    let captures = TASK_LINE.captures(line.trim())?;

    let name = captures["name"].trim();
    if name.is_empty() {
        return None;
    }

    let people: i64 = captures["people"].trim().parse().ok()?;
    let people_needed = PeopleNeeded::new(people).ok()?;

    let tail = captures["tail"].trim();
    let (description, time_slot) = if tail.is_empty() {
        ("", None)
    } else {
        split_time_slot(tail.strip_prefix('-')?.trim())
    };

    let time_slot = match time_slot {
        Some(slot) => TimeSlot::new(slot.parse().ok()?).ok()?,
        None => TimeSlot::default(),
    };

    Some(TaskLine {
        name: name.to_string(),
        people_needed,
        description: description.to_string(),
        time_slot,
    })
}

/// Parse a block of task lines. Lines that do not parse are counted, never fatal.
pub fn parse_tasks(text: &str) -> ParsedImport<TaskLine> {
    let mut parsed = ParsedImport::default();

    for line in candidate_lines(text) {
        match parse_task_line(line) {
            Some(task) => parsed.accepted.push(task),
            None => parsed.skipped += 1,
        }
    }

    parsed
}

// "<desc> - <digits>" or "- <digits>" carry a slot; anything else is all description
fn split_time_slot(rest: &str) -> (&str, Option<&str>) {
    if let Some(slot) = rest.strip_prefix('-').map(str::trim) {
        if is_digits(slot) {
            return ("", Some(slot));
        }
    }

    if let Some((description, slot)) = rest.rsplit_once(" - ") {
        let slot = slot.trim();
        if is_digits(slot) {
            return (description.trim(), Some(slot));
        }
    }

    (rest, None)
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}
