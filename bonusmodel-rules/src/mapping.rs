//! Manual classification overrides keyed by job, activity and task.
//!
//! Stored as nested JSON:
//! `{job: {"bonus_type"?, "activities": {activity: {"bonus_type"?, "tasks": {task: {"bonus_type"}}}}}}`.
//! The activity key `any` matches every activity of its job.

use bonusmodel_core::{Category, TimeEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::{Result, RulesError};

/// Wildcard activity key.
pub const ANY_ACTIVITY: &str = "any";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingTable {
    jobs: BTreeMap<String, JobRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct JobRule {
    #[serde(rename = "bonus_type", default, skip_serializing_if = "Option::is_none")]
    category: Option<Category>,
    #[serde(default)]
    activities: BTreeMap<String, ActivityRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct ActivityRule {
    #[serde(rename = "bonus_type", default, skip_serializing_if = "Option::is_none")]
    category: Option<Category>,
    #[serde(default)]
    tasks: BTreeMap<String, TaskRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TaskRule {
    #[serde(rename = "bonus_type")]
    category: Category,
}

impl ActivityRule {
    fn lookup(&self, task: &str) -> Option<Category> {
        self.tasks.get(task).map(|t| t.category).or(self.category)
    }
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a mapping file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&s)?)
    }

    /// Read a mapping file, starting empty if it does not exist yet.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Most specific override for the entry, if any:
    /// (job, activity, task) > (job, activity) > (job, any, task) > (job, any) > job.
    pub fn lookup(&self, entry: &TimeEntry) -> Option<Category> {
        let job = self.jobs.get(&entry.job)?;
        job.activities
            .get(&entry.activity)
            .and_then(|a| a.lookup(&entry.task))
            .or_else(|| {
                job.activities
                    .get(ANY_ACTIVITY)
                    .and_then(|a| a.lookup(&entry.task))
            })
            .or(job.category)
    }

    /// Existing rule stored at exactly this key.
    pub fn rule_at(&self, job: &str, activity: Option<&str>, task: Option<&str>) -> Option<Category> {
        let job_rule = self.jobs.get(job)?;
        match (activity, task) {
            (None, None) => job_rule.category,
            (activity, task) => {
                let act = job_rule.activities.get(activity.unwrap_or(ANY_ACTIVITY))?;
                match task {
                    None => act.category,
                    Some(task) => act.tasks.get(task).map(|t| t.category),
                }
            }
        }
    }

    /// Add an override. A task without an activity applies to every
    /// activity of the job.
    ///
    /// Re-adding the same category is a no-op. A different category at an
    /// occupied key is rejected and the table is left untouched.
    pub fn add_mapping(
        &mut self,
        category: Category,
        job: &str,
        activity: Option<&str>,
        task: Option<&str>,
    ) -> Result<()> {
        if let Some(existing) = self.rule_at(job, activity, task) {
            if existing == category {
                return Ok(());
            }
            let key = rule_key(job, activity, task);
            warn!(%key, %existing, requested = %category, "rejected conflicting override");
            return Err(RulesError::ConflictingRule {
                key,
                existing,
                requested: category,
            });
        }

        let job_rule = self.jobs.entry(job.to_string()).or_default();
        if activity.is_none() && task.is_none() {
            job_rule.category = Some(category);
            return Ok(());
        }

        let act = job_rule
            .activities
            .entry(activity.unwrap_or(ANY_ACTIVITY).to_string())
            .or_default();
        match task {
            None => act.category = Some(category),
            Some(task) => {
                act.tasks.insert(task.to_string(), TaskRule { category });
            }
        }
        Ok(())
    }
}

fn rule_key(job: &str, activity: Option<&str>, task: Option<&str>) -> String {
    match (activity, task) {
        (None, None) => job.to_string(),
        (activity, None) => format!("{job}/{}", activity.unwrap_or(ANY_ACTIVITY)),
        (activity, Some(task)) => format!("{job}/{}/{task}", activity.unwrap_or(ANY_ACTIVITY)),
    }
}
