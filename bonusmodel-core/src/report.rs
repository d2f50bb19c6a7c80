//! Report structures assembled from the engine output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::accrual::MonthVerdict;
use crate::config::RateConfig;
use crate::rollup::YearVerdict;

/// Rates the report was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppliedRates {
    pub rtotal: f64,
    pub rlinear: f64,
    pub rlon: f64,
}

impl From<&RateConfig> for AppliedRates {
    fn from(rates: &RateConfig) -> Self {
        Self {
            rtotal: rates.rtotal,
            rlinear: rates.rlinear,
            rlon: rates.rlon_rate(),
        }
    }
}

/// Money paid for a year under each scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    /// Rtotal + Rlinear.
    pub current: f64,
    /// Rlön.
    pub proposed: f64,
}

impl Payout {
    pub fn for_year(verdict: &YearVerdict, rates: &AppliedRates) -> Self {
        Self {
            current: verdict.rtotal_count * rates.rtotal + verdict.rlinear_hours * rates.rlinear,
            proposed: verdict.rlon_hours * rates.rlon,
        }
    }

    /// Positive when the proposed scheme pays more.
    pub fn difference(&self) -> f64 {
        self.proposed - self.current
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearReport {
    pub verdict: YearVerdict,
    pub months: Vec<MonthVerdict>,
    pub payout: Payout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub rates: AppliedRates,
    pub years: Vec<YearReport>,
}

impl Report {
    pub fn year(&self, year: i32) -> Option<&YearReport> {
        self.years.iter().find(|y| y.verdict.year == year)
    }

    pub fn total_payout(&self) -> Payout {
        self.years.iter().fold(Payout::default(), |acc, y| Payout {
            current: acc.current + y.payout.current,
            proposed: acc.proposed + y.payout.proposed,
        })
    }
}

/// Month lines combined per (job, activity, task, label).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSummary {
    pub job: String,
    pub activity: String,
    pub task: String,
    pub hours: f64,
    pub label: String,
}

pub fn summarize_lines(month: &MonthVerdict) -> Vec<LineSummary> {
    let mut grouped: BTreeMap<(&str, &str, &str, String), f64> = BTreeMap::new();
    for e in &month.entries {
        let key = (
            e.entry.job.as_str(),
            e.entry.activity.as_str(),
            e.entry.task.as_str(),
            e.effective_label(),
        );
        *grouped.entry(key).or_insert(0.0) += e.hours();
    }

    grouped
        .into_iter()
        .filter(|(_, hours)| *hours != 0.0)
        .map(|((job, activity, task, label), hours)| LineSummary {
            job: job.to_string(),
            activity: activity.to_string(),
            task: task.to_string(),
            hours,
            label,
        })
        .collect()
}
