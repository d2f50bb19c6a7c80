//! Built-in classification rules.
//!
//! Codes for internal time and absence differ between employers, so they
//! live in a table rather than in the rule chain.

use bonusmodel_core::{Category, TimeEntry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeTable {
    /// Job code for internal time.
    #[serde(default = "default_internal_job")]
    pub internal_job: String,
    /// Internal task that counts toward Rtotal.
    #[serde(default = "default_bonus_task")]
    pub bonus_task: String,
    #[serde(default = "default_fiduciary_task")]
    pub fiduciary_task: String,
    /// Job code for absence.
    #[serde(default = "default_absence_job")]
    pub absence_job: String,
    #[serde(default = "default_vacation_task")]
    pub vacation_task: String,
    #[serde(default = "default_parental_task")]
    pub parental_task: String,
    #[serde(default = "default_childcare_task")]
    pub childcare_task: String,
}

fn default_internal_job() -> String {
    "Internt".to_string()
}

fn default_bonus_task() -> String {
    "Bonusgrundande".to_string()
}

fn default_fiduciary_task() -> String {
    "Förtroendeuppdrag".to_string()
}

fn default_absence_job() -> String {
    "Frånvaro".to_string()
}

fn default_vacation_task() -> String {
    "Semester".to_string()
}

fn default_parental_task() -> String {
    "Föräldraledighet".to_string()
}

fn default_childcare_task() -> String {
    "VAB".to_string()
}

impl Default for CodeTable {
    fn default() -> Self {
        Self {
            internal_job: default_internal_job(),
            bonus_task: default_bonus_task(),
            fiduciary_task: default_fiduciary_task(),
            absence_job: default_absence_job(),
            vacation_task: default_vacation_task(),
            parental_task: default_parental_task(),
            childcare_task: default_childcare_task(),
        }
    }
}

impl CodeTable {
    /// Apply the fixed rule chain. First match wins:
    /// invoiceable > internal job > absence job > internal flag.
    pub fn builtin_category(&self, entry: &TimeEntry) -> Category {
        if entry.invoiceable {
            return Category::Billable;
        }

        if entry.job == self.internal_job {
            return if entry.task == self.bonus_task {
                Category::InternalBonus
            } else if entry.task == self.fiduciary_task {
                Category::FiduciaryDuty
            } else {
                Category::InternalPlain
            };
        }

        if entry.job == self.absence_job {
            return if entry.task == self.vacation_task {
                Category::Vacation
            } else if entry.task == self.parental_task {
                Category::ParentalLeave
            } else if entry.task == self.childcare_task {
                Category::ChildcareLeave
            } else {
                Category::InternalPlain
            };
        }

        if entry.internal_job {
            return Category::InternalPlain;
        }

        Category::Unclassified
    }
}
