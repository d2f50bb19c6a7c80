//! Layered classifier: manual overrides first, then the built-in code rules.

use bonusmodel_core::{Category, Classify, TimeEntry};

use crate::codes::CodeTable;
use crate::error::Result;
use crate::mapping::MappingTable;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classifier {
    codes: CodeTable,
    overrides: MappingTable,
}

impl Classifier {
    pub fn new(codes: CodeTable) -> Self {
        Self {
            codes,
            overrides: MappingTable::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: MappingTable) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    pub fn overrides(&self) -> &MappingTable {
        &self.overrides
    }

    /// Register a manual override. Applies to every later `classify` call.
    pub fn add_mapping(
        &mut self,
        category: Category,
        job: &str,
        activity: Option<&str>,
        task: Option<&str>,
    ) -> Result<()> {
        self.overrides.add_mapping(category, job, activity, task)
    }
}

impl Classify for Classifier {
    fn classify(&self, entry: &TimeEntry) -> Category {
        self.overrides
            .lookup(entry)
            .unwrap_or_else(|| self.codes.builtin_category(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn line(job: &str, activity: &str, task: &str) -> TimeEntry {
        TimeEntry::new(NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(), 8.0, job, activity, task)
    }

    #[test]
    fn test_override_beats_builtin_rules() {
        let mut classifier = Classifier::default();
        let entry = line("Internt", "1", "Möte");
        assert_eq!(classifier.classify(&entry), Category::InternalPlain);

        classifier
            .add_mapping(Category::InternalBonus, "Internt", Some("1"), Some("Möte"))
            .unwrap();
        assert_eq!(classifier.classify(&entry), Category::InternalBonus);
        assert_eq!(classifier.classify(&line("Internt", "2", "Möte")), Category::InternalPlain);
    }

    #[test]
    fn test_unknown_job_falls_through() {
        let classifier = Classifier::new(CodeTable::default());
        assert_eq!(classifier.classify(&line("X", "1", "t")), Category::Unclassified);
    }
}
