//! Ledger of timesheet lines the classifier could not place.
//!
//! Append-only while a report is being computed; `finalize` groups the lines
//! by (job, activity) for manual triage once the pass is done.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::entry::{Category, TimeEntry};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnclassifiedLedger {
    lines: Vec<TimeEntry>,
}

/// Unclassified hours for one (job, activity) key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnclassifiedGroup {
    pub job: String,
    pub job_name: String,
    pub activity: String,
    /// Description of the first line seen for this key.
    pub description: String,
    pub tasks: Vec<String>,
    pub hours: f64,
    /// Category a human would most likely pick.
    pub suggested: Option<Category>,
}

impl UnclassifiedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: &TimeEntry) {
        self.lines.push(entry.clone());
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Group recorded lines by (job, activity), sorted by key.
    pub fn finalize(self) -> Vec<UnclassifiedGroup> {
        let mut groups: BTreeMap<(String, String), (UnclassifiedGroup, BTreeSet<String>)> =
            BTreeMap::new();

        for line in self.lines {
            let key = (line.job.clone(), line.activity.clone());
            let (group, tasks) = groups.entry(key).or_insert_with(|| {
                (
                    UnclassifiedGroup {
                        job: line.job.clone(),
                        job_name: line.job_name.clone(),
                        activity: line.activity.clone(),
                        description: line.description.clone(),
                        tasks: Vec::new(),
                        hours: 0.0,
                        suggested: None,
                    },
                    BTreeSet::new(),
                )
            });
            group.hours += line.hours;
            if line.invoiceable {
                group.suggested = Some(Category::Billable);
            }
            if !line.task.is_empty() {
                tasks.insert(line.task);
            }
        }

        groups
            .into_values()
            .map(|(mut group, tasks)| {
                group.tasks = tasks.into_iter().collect();
                group
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn line(job: &str, activity: &str, task: &str, hours: f64) -> TimeEntry {
        TimeEntry::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), hours, job, activity, task)
            .with_description(format!("{job}/{activity}/{task}"))
    }

    #[test]
    fn test_groups_by_job_and_activity() {
        let mut ledger = UnclassifiedLedger::new();
        ledger.record(&line("J2", "A1", "t1", 2.0));
        ledger.record(&line("J1", "A1", "t2", 1.5));
        ledger.record(&line("J1", "A1", "t1", 3.0));
        ledger.record(&line("J1", "A2", "", 4.0));
        assert_eq!(ledger.len(), 4);

        let groups = ledger.finalize();
        assert_eq!(groups.len(), 3);
        assert_eq!((groups[0].job.as_str(), groups[0].activity.as_str()), ("J1", "A1"));
        assert_eq!(groups[0].hours, 4.5);
        assert_eq!(groups[0].tasks, vec!["t1".to_string(), "t2".to_string()]);
        assert_eq!(groups[0].description, "J1/A1/t2");
        assert!(groups[1].tasks.is_empty());
        assert_eq!(groups[2].job, "J2");
    }

    #[test]
    fn test_invoiceable_line_suggests_billable() {
        let mut ledger = UnclassifiedLedger::new();
        ledger.record(&line("J1", "A1", "t1", 1.0).invoiceable(true));
        ledger.record(&line("J2", "A1", "t1", 1.0));

        let groups = ledger.finalize();
        assert_eq!(groups[0].suggested, Some(Category::Billable));
        assert_eq!(groups[1].suggested, None);
    }
}
