//! Turns a day's schedule entries into what the viewer screen shows.
//!
//! Entries are grouped by ascending time slot. Inside a slot the backend's
//! order is kept as-is.

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::models::{DaySchedule, EntryId, ScheduleEntry, TimeSlot};

pub const NO_SCHEDULE_MESSAGE: &str = "No schedule has been generated for this day.";
pub const CONTACT_LEAD_HINT: &str = "Contact your team lead to create a schedule.";

// Dates are UTC calendar days, so one step is always exactly one day
const ONE_DAY_MS: i64 = 86_400_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGroup {
    pub slot: TimeSlot,
    pub entries: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayView {
    /// Nothing to show for the date. `message` comes from the backend when it sent one.
    NoSchedule { message: String },
    Slots(Vec<SlotGroup>),
}

impl DayView {
    pub fn build(schedule: &DaySchedule) -> Self {
        let groups = group_by_slot(&schedule.schedules);

        if groups.is_empty() {
            return DayView::NoSchedule {
                message: schedule
                    .message
                    .clone()
                    .unwrap_or_else(|| NO_SCHEDULE_MESSAGE.to_string()),
            };
        }

        DayView::Slots(
            groups
                .into_iter()
                .map(|(slot, entries)| SlotGroup {
                    slot,
                    entries: entries.into_iter().cloned().collect(),
                })
                .collect(),
        )
    }

    pub fn slots(&self) -> &[SlotGroup] {
        match self {
            DayView::Slots(groups) => groups,
            DayView::NoSchedule { .. } => &[],
        }
    }

    pub fn entry(&self, entry_id: EntryId) -> Option<&ScheduleEntry> {
        self.slots()
            .iter()
            .flat_map(|group| group.entries.iter())
            .find(|entry| entry.id == entry_id)
    }

    pub fn entry_count(&self) -> usize {
        self.slots().iter().map(|group| group.entries.len()).sum()
    }

    /// Plain-text rendering, one heading per slot. Selectable entries are marked with `*`.
    pub fn render(&self) -> String {
        let mut out = String::new();

        match self {
            DayView::NoSchedule { message } => {
                let _ = writeln!(out, "{}", message);
                let _ = writeln!(out, "{}", CONTACT_LEAD_HINT);
            }
            DayView::Slots(groups) => {
                for group in groups {
                    let _ = writeln!(out, "Time slot {}", group.slot);
                    for entry in &group.entries {
                        let marker = if entry.is_selectable() { " *" } else { "" };
                        let _ = writeln!(
                            out,
                            "  {}{}: {}",
                            entry.task,
                            marker,
                            entry.members.join(" + ")
                        );
                    }
                }
            }
        }

        out
    }
}

/// Stable grouping by slot. Missing slots count as slot 1.
pub fn group_by_slot(entries: &[ScheduleEntry]) -> BTreeMap<TimeSlot, Vec<&ScheduleEntry>> {
    let mut groups: BTreeMap<TimeSlot, Vec<&ScheduleEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.slot()).or_default().push(entry);
    }
    groups
}

pub fn parse_iso_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
}

pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(Duration::milliseconds(ONE_DAY_MS))
        .unwrap_or(date)
}

pub fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_signed(Duration::milliseconds(ONE_DAY_MS))
        .unwrap_or(date)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLabels {
    pub previous: &'static str,
    pub next: &'static str,
}

// Captions only; navigation is the same either way
pub fn nav_labels(current: NaiveDate, today: NaiveDate) -> NavLabels {
    if current == today {
        NavLabels {
            previous: "Yesterday",
            next: "Tomorrow",
        }
    } else {
        NavLabels {
            previous: "Previous day",
            next: "Next day",
        }
    }
}

pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: EntryId, slot: Option<i64>, description: Option<&str>) -> ScheduleEntry {
        ScheduleEntry {
            id,
            task: format!("Task {}", id),
            task_id: id,
            task_description: description.map(str::to_string),
            time_slot: slot.map(|s| TimeSlot::new(s).unwrap()),
            members: vec!["Ana".to_string()],
        }
    }

    fn day(entries: Vec<ScheduleEntry>, message: Option<&str>) -> DaySchedule {
        DaySchedule {
            team_id: 1,
            team_name: "Kitchen".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            schedules: entries,
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn groups_are_ordered_and_stable() {
        let entries = vec![
            entry(1, Some(2), None),
            entry(2, Some(1), None),
            entry(3, Some(1), None),
            entry(4, Some(3), None),
        ];

        let groups = group_by_slot(&entries);
        let keys: Vec<u32> = groups.keys().map(|slot| slot.get()).collect();
        assert_eq!(keys, vec![1, 2, 3]);

        let slot_one: Vec<EntryId> = groups[&TimeSlot::default()].iter().map(|e| e.id).collect();
        assert_eq!(slot_one, vec![2, 3]);
    }

    #[test]
    fn missing_slot_lands_in_slot_one() {
        let view = DayView::build(&day(vec![entry(1, Some(2), None), entry(2, None, None)], None));

        assert_eq!(view.slots()[0].slot.get(), 1);
        assert_eq!(view.slots()[0].entries[0].id, 2);
    }

    #[test]
    fn empty_day_is_reported_as_no_schedule() {
        let view = DayView::build(&day(vec![], Some("No schedule for 15.01.2024")));
        assert_eq!(
            view,
            DayView::NoSchedule {
                message: "No schedule for 15.01.2024".to_string()
            }
        );
        assert!(view.render().contains(CONTACT_LEAD_HINT));

        let view = DayView::build(&day(vec![], None));
        assert_eq!(
            view,
            DayView::NoSchedule {
                message: NO_SCHEDULE_MESSAGE.to_string()
            }
        );
        assert_eq!(view.entry_count(), 0);
    }

    #[test]
    fn render_marks_selectable_entries() {
        let view = DayView::build(&day(
            vec![entry(1, Some(1), Some("Wash up")), entry(2, Some(1), None)],
            None,
        ));

        assert_eq!(view.render(), "Time slot 1\n  Task 1 *: Ana\n  Task 2: Ana\n");
    }

    #[test]
    fn day_navigation_crosses_month_and_year() {
        let new_year = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(previous_day(new_year), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(next_day(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap()), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(parse_iso_date("2024-03-31").unwrap(), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert!(parse_iso_date("31.03.2024").is_err());
    }

    #[test]
    fn labels_depend_only_on_today() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        assert_eq!(nav_labels(today, today).previous, "Yesterday");
        assert_eq!(nav_labels(today, today).next, "Tomorrow");
        assert_eq!(nav_labels(previous_day(today), today).previous, "Previous day");
        assert_eq!(nav_labels(next_day(today), today).next, "Next day");
    }
}
