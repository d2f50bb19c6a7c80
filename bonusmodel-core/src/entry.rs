//! Time entry types: raw timesheet lines, bonus categories and per-day records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// One reported timesheet line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeEntry {
    pub date: NaiveDate,
    /// Reported hours, never negative.
    pub hours: f64,
    pub job: String,
    /// Display name of the job, if the export carries one.
    #[serde(default)]
    pub job_name: String,
    pub activity: String,
    #[serde(default)]
    pub task: String,
    /// Free-text line description.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub invoiceable: bool,
    #[serde(default)]
    pub internal_job: bool,
}

impl TimeEntry {
    pub fn new(
        date: NaiveDate,
        hours: f64,
        job: impl Into<String>,
        activity: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            date,
            hours,
            job: job.into(),
            job_name: String::new(),
            activity: activity.into(),
            task: task.into(),
            description: String::new(),
            invoiceable: false,
            internal_job: false,
        }
    }

    pub fn with_job_name(mut self, name: impl Into<String>) -> Self {
        self.job_name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn invoiceable(mut self, invoiceable: bool) -> Self {
        self.invoiceable = invoiceable;
        self
    }

    pub fn internal_job(mut self, internal: bool) -> Self {
        self.internal_job = internal;
        self
    }

    /// Reject entries the engine cannot weigh. `index` is the caller's
    /// position of the entry, echoed back in the error.
    pub fn validate(&self, index: usize) -> Result<()> {
        if !self.hours.is_finite() || self.hours < 0.0 {
            return Err(CoreError::MalformedEntry {
                index,
                reason: format!("hours must be a non-negative number, got {}", self.hours),
            });
        }
        if self.job.trim().is_empty() {
            return Err(CoreError::MalformedEntry {
                index,
                reason: "job code is empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Bonus category of a time entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "billable")]
    Billable,
    #[serde(rename = "internal_bonus", alias = "bonus")]
    InternalBonus,
    #[serde(rename = "internal", alias = "internal_plain")]
    InternalPlain,
    #[serde(rename = "vacation")]
    Vacation,
    #[serde(rename = "fiduciary_duty", alias = "förtroendeuppdrag")]
    FiduciaryDuty,
    #[serde(rename = "parental_leave", alias = "Föräldraledighet")]
    ParentalLeave,
    #[serde(rename = "childcare_leave", alias = "VAB")]
    ChildcareLeave,
    #[serde(rename = "unclassified", alias = "unknown")]
    Unclassified,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Billable,
        Category::InternalBonus,
        Category::InternalPlain,
        Category::Vacation,
        Category::FiduciaryDuty,
        Category::ParentalLeave,
        Category::ChildcareLeave,
        Category::Unclassified,
    ];

    /// Stable machine name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Billable => "billable",
            Category::InternalBonus => "internal_bonus",
            Category::InternalPlain => "internal",
            Category::Vacation => "vacation",
            Category::FiduciaryDuty => "fiduciary_duty",
            Category::ParentalLeave => "parental_leave",
            Category::ChildcareLeave => "childcare_leave",
            Category::Unclassified => "unclassified",
        }
    }

    /// Parental and childcare leave lower the Rtotal requirement instead
    /// of adding bonus hours.
    pub fn is_leave_equivalent(&self) -> bool {
        matches!(self, Category::ParentalLeave | Category::ChildcareLeave)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        let category = match normalized.as_str() {
            "billable" => Category::Billable,
            "internal_bonus" | "bonus" => Category::InternalBonus,
            "internal" | "internal_plain" => Category::InternalPlain,
            "vacation" => Category::Vacation,
            "fiduciary_duty" | "förtroendeuppdrag" => Category::FiduciaryDuty,
            "parental_leave" | "föräldraledighet" => Category::ParentalLeave,
            "childcare_leave" | "vab" => Category::ChildcareLeave,
            "unclassified" | "unknown" => Category::Unclassified,
            _ => return Err(format!("unknown category '{s}'")),
        };
        Ok(category)
    }
}

/// A time entry tagged with its category.
///
/// `bonus_eligible` is set by the accrual pass when adjacency lets a
/// vacation or fiduciary line count toward bonus hours.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifiedEntry {
    pub entry: TimeEntry,
    pub category: Category,
    pub bonus_eligible: bool,
}

impl ClassifiedEntry {
    pub fn new(entry: TimeEntry, category: Category) -> Self {
        Self {
            entry,
            category,
            bonus_eligible: false,
        }
    }

    pub fn hours(&self) -> f64 {
        self.entry.hours
    }

    /// Category label with the adjacency annotation applied.
    pub fn effective_label(&self) -> String {
        if self.bonus_eligible {
            format!("{}, bonus-eligible", self.category)
        } else {
            self.category.to_string()
        }
    }
}

/// How a finished day affects the "previous day billable" flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayBillability {
    /// At least one billable line.
    Billable,
    /// Vacation or fiduciary duty without billable lines; inherits the
    /// flag from the last worked day.
    Leave,
    NotBillable,
}

/// All classified entries of one calendar date, in reported order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub entries: Vec<ClassifiedEntry>,
}

impl DayRecord {
    pub fn new(date: NaiveDate, entries: Vec<ClassifiedEntry>) -> Self {
        Self { date, entries }
    }

    pub fn billability(&self) -> DayBillability {
        let has = |c: Category| self.entries.iter().any(|e| e.category == c);
        if has(Category::Billable) {
            DayBillability::Billable
        } else if has(Category::Vacation) || has(Category::FiduciaryDuty) {
            DayBillability::Leave
        } else {
            DayBillability::NotBillable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn classified(category: Category) -> ClassifiedEntry {
        ClassifiedEntry::new(TimeEntry::new(day(4), 8.0, "J1", "A1", "T1"), category)
    }

    #[test]
    fn test_category_legacy_names() {
        assert_eq!("VAB".parse::<Category>().unwrap(), Category::ChildcareLeave);
        assert_eq!("förtroendeuppdrag".parse::<Category>().unwrap(), Category::FiduciaryDuty);
        assert_eq!("Föräldraledighet".parse::<Category>().unwrap(), Category::ParentalLeave);
        assert_eq!("bonus".parse::<Category>().unwrap(), Category::InternalBonus);
        assert_eq!("unknown".parse::<Category>().unwrap(), Category::Unclassified);
        assert!("overtime".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_round_names() {
        let json = serde_json::to_string(&Category::FiduciaryDuty).unwrap();
        assert_eq!(json, "\"fiduciary_duty\"");
        let legacy: Category = serde_json::from_str("\"VAB\"").unwrap();
        assert_eq!(legacy, Category::ChildcareLeave);
    }

    #[test]
    fn test_validate_rejects_negative_hours() {
        let entry = TimeEntry::new(day(4), -1.0, "J1", "A1", "T1");
        let err = entry.validate(7).unwrap_err();
        assert!(matches!(err, CoreError::MalformedEntry { index: 7, .. }));
    }

    #[test]
    fn test_validate_rejects_empty_job() {
        let entry = TimeEntry::new(day(4), 1.0, "  ", "A1", "T1");
        assert!(entry.validate(0).is_err());
        assert!(TimeEntry::new(day(4), 0.0, "J", "", "").validate(0).is_ok());
    }

    #[test]
    fn test_billable_dominates_day() {
        let rec = DayRecord::new(
            day(4),
            vec![classified(Category::Vacation), classified(Category::Billable)],
        );
        assert_eq!(rec.billability(), DayBillability::Billable);
    }

    #[test]
    fn test_fiduciary_day_is_leave() {
        let rec = DayRecord::new(day(4), vec![classified(Category::FiduciaryDuty)]);
        assert_eq!(rec.billability(), DayBillability::Leave);
        let rec = DayRecord::new(day(4), vec![classified(Category::InternalPlain)]);
        assert_eq!(rec.billability(), DayBillability::NotBillable);
    }

    #[test]
    fn test_effective_label() {
        let mut e = classified(Category::Vacation);
        assert_eq!(e.effective_label(), "vacation");
        e.bonus_eligible = true;
        assert_eq!(e.effective_label(), "vacation, bonus-eligible");
    }
}
