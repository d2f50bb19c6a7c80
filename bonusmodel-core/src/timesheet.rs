//! Grouping of time entries into year → month → day buckets.

use chrono::Datelike;
use std::collections::BTreeMap;

use crate::entry::TimeEntry;
use crate::error::Result;

/// Entries of one month keyed by day of month, in reported order per day.
pub type MonthSheet = BTreeMap<u32, Vec<TimeEntry>>;

/// Months of one year keyed by month number (1-12).
pub type YearSheet = BTreeMap<u32, MonthSheet>;

/// Validated entries grouped by calendar position.
///
/// Entries never move between buckets once grouped; within a day the
/// original order is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timesheet {
    years: BTreeMap<i32, YearSheet>,
    len: usize,
}

impl Timesheet {
    /// Validate and group entries. Fails on the first malformed entry.
    pub fn from_entries(entries: impl IntoIterator<Item = TimeEntry>) -> Result<Self> {
        let mut sheet = Self::default();
        for (index, entry) in entries.into_iter().enumerate() {
            entry.validate(index)?;
            sheet
                .years
                .entry(entry.date.year())
                .or_default()
                .entry(entry.date.month())
                .or_default()
                .entry(entry.date.day())
                .or_default()
                .push(entry);
            sheet.len += 1;
        }
        Ok(sheet)
    }

    pub fn years(&self) -> impl Iterator<Item = (i32, &YearSheet)> {
        self.years.iter().map(|(y, s)| (*y, s))
    }

    pub fn year(&self, year: i32) -> Option<&YearSheet> {
        self.years.get(&year)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use chrono::NaiveDate;

    fn entry(y: i32, m: u32, d: u32, task: &str) -> TimeEntry {
        TimeEntry::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), 1.0, "J", "A", task)
    }

    #[test]
    fn test_groups_by_year_month_day() {
        let sheet = Timesheet::from_entries(vec![
            entry(2024, 2, 1, "a"),
            entry(2023, 12, 31, "b"),
            entry(2024, 2, 1, "c"),
            entry(2024, 1, 15, "d"),
        ])
        .unwrap();

        assert_eq!(sheet.len(), 4);
        let years: Vec<i32> = sheet.years().map(|(y, _)| y).collect();
        assert_eq!(years, vec![2023, 2024]);

        let feb = &sheet.year(2024).unwrap()[&2];
        let tasks: Vec<&str> = feb[&1].iter().map(|e| e.task.as_str()).collect();
        assert_eq!(tasks, vec!["a", "c"]);
    }

    #[test]
    fn test_malformed_entry_reports_index() {
        let mut bad = entry(2024, 1, 2, "x");
        bad.hours = f64::NAN;
        let err = Timesheet::from_entries(vec![entry(2024, 1, 1, "ok"), bad]).unwrap_err();
        assert!(matches!(err, CoreError::MalformedEntry { index: 1, .. }));
    }
}
