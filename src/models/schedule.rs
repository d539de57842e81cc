//! Schedule (solution) model.
//!
//! A schedule is the ordered list of task placements produced by the
//! scheduler. Entries keep the order in which tasks were submitted.

use serde::{Deserialize, Serialize};

/// A complete schedule.
///
/// Serializes as a bare JSON array of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

/// The placement of one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Task name.
    pub task: String,
    /// First occupied time unit.
    pub start: i64,
    /// Last occupied time unit (inclusive).
    pub end: i64,
}

impl ScheduleEntry {
    /// Creates a new entry.
    pub fn new(task: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            task: task.into(),
            start,
            end,
        }
    }

    /// Occupied units (`end - start + 1`), saturating at the `i64` range.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end.saturating_sub(self.start).saturating_add(1)
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    /// Entries in submission order.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Iterates over entries in submission order.
    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleEntry> {
        self.entries.iter()
    }

    /// Consumes the schedule, returning its entries.
    pub fn into_entries(self) -> Vec<ScheduleEntry> {
        self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schedule has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Latest end time, or `None` for an empty schedule.
    pub fn makespan(&self) -> Option<i64> {
        self.entries.iter().map(|e| e.end).max()
    }

    /// Units left idle between consecutive entries.
    pub fn idle_units(&self) -> i64 {
        self.entries
            .windows(2)
            .map(|w| {
                w[1].start
                    .saturating_sub(w[0].end)
                    .saturating_sub(1)
                    .max(0)
            })
            .sum()
    }

    /// First entry with the given task name.
    ///
    /// Task names are not required to be unique. With duplicates this
    /// returns the earliest submitted one; use `entries_for_task` or
    /// positional access to see all of them.
    pub fn entry_for_task(&self, name: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.task == name)
    }

    /// All entries with the given task name.
    pub fn entries_for_task(&self, name: &str) -> Vec<&ScheduleEntry> {
        self.entries.iter().filter(|e| e.task == name).collect()
    }
}

impl From<Vec<ScheduleEntry>> for Schedule {
    fn from(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a ScheduleEntry;
    type IntoIter = std::slice::Iter<'a, ScheduleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> Schedule {
        Schedule::from(vec![
            ScheduleEntry::new("A", 1, 3),
            ScheduleEntry::new("B", 5, 6),
            ScheduleEntry::new("A", 8, 8),
        ])
    }

    #[test]
    fn test_entry_duration() {
        assert_eq!(ScheduleEntry::new("A", 1, 3).duration(), 3);
        assert_eq!(ScheduleEntry::new("A", 8, 8).duration(), 1);
    }

    #[test]
    fn test_entry_duration_extreme_bounds_saturate() {
        let widest = ScheduleEntry::new("A", i64::MIN, i64::MAX);
        assert_eq!(widest.duration(), i64::MAX);

        let inverted = ScheduleEntry::new("A", i64::MAX, i64::MIN);
        assert_eq!(inverted.duration(), i64::MIN + 1);
    }

    #[test]
    fn test_makespan_and_idle() {
        let s = sample_schedule();
        assert_eq!(s.makespan(), Some(8));
        // gaps: 4 (between 3 and 5), 7 (between 6 and 8)
        assert_eq!(s.idle_units(), 2);
    }

    #[test]
    fn test_lookup_with_duplicate_names() {
        let s = sample_schedule();
        assert_eq!(s.entry_for_task("A").unwrap().start, 1);
        assert_eq!(s.entries_for_task("A").len(), 2);
        assert!(s.entry_for_task("Z").is_none());
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::new();
        assert!(s.is_empty());
        assert_eq!(s.makespan(), None);
        assert_eq!(s.idle_units(), 0);
    }

    #[test]
    fn test_serializes_as_array() {
        let s = Schedule::from(vec![ScheduleEntry::new("A", 1, 5)]);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "task": "A", "start": 1, "end": 5 }])
        );

        let back: Schedule = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }
}
