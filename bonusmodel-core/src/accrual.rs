//! Monthly accrual engine.
//!
//! Walks one month of classified days in date order, sums the hour pools
//! each bonus scheme looks at, and decides Rtotal eligibility against the
//! month's required hours and the carried hour bank.
//!
//! Adjacency: vacation and fiduciary-duty lines inherit the billability of
//! the last worked day before them. The flag flips to `true` after a day
//! with billable time, to `false` after a day with neither billable time nor
//! leave, and is left alone by leave days.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::config::BonusConfig;
use crate::entry::{Category, ClassifiedEntry, DayBillability, DayRecord};
use crate::error::{CoreError, Result};

/// State threaded from month to month within a year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthState {
    /// Banked excess bonus hours, never negative.
    pub rtotal_bank: f64,
    pub previous_day_billable: bool,
}

impl MonthState {
    /// State at the start of a year.
    pub fn opening(bank: f64) -> Self {
        Self {
            rtotal_bank: bank.max(0.0),
            previous_day_billable: false,
        }
    }
}

/// Hour pools summed over a month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthTotals {
    pub billed_hours: f64,
    /// Hours counted toward Rtotal.
    pub bonus_hours: f64,
    pub internal_hours: f64,
    pub unclassified_hours: f64,
    /// Parental and childcare leave; lowers the Rtotal requirement.
    pub leave_equivalent_hours: f64,
    /// Vacation following a billable day.
    pub rlon_vacation_hours: f64,
    /// Vacation in a month that rescales the Rlinear threshold.
    pub rlinear_vacation_hours: f64,
    /// Fiduciary duty following a billable day.
    pub rlon_fiduciary_hours: f64,
}

impl MonthTotals {
    /// Hours the Rlön scheme counts before its threshold.
    pub fn rlon_pool_hours(&self) -> f64 {
        self.billed_hours + self.rlon_vacation_hours + self.rlon_fiduciary_hours
    }

    fn add(&mut self, entry: &mut ClassifiedEntry, previous_day_billable: bool, rlinear_month: bool) {
        let h = entry.hours();
        match entry.category {
            Category::Billable => {
                self.billed_hours += h;
                self.bonus_hours += h;
            }
            Category::InternalBonus => self.bonus_hours += h,
            Category::InternalPlain => self.internal_hours += h,
            Category::Vacation => {
                self.bonus_hours += h;
                if previous_day_billable {
                    self.rlon_vacation_hours += h;
                }
                if rlinear_month {
                    self.rlinear_vacation_hours += h;
                }
                entry.bonus_eligible = true;
            }
            // Fiduciary duty never feeds Rlinear, only Rtotal and Rlön.
            Category::FiduciaryDuty => {
                if previous_day_billable {
                    self.bonus_hours += h;
                    self.rlon_fiduciary_hours += h;
                    entry.bonus_eligible = true;
                }
            }
            Category::ParentalLeave | Category::ChildcareLeave => {
                self.leave_equivalent_hours += h;
            }
            Category::Unclassified => self.unclassified_hours += h,
        }
    }
}

/// Rtotal decision for one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RtotalOutcome {
    /// Bonus hours met the requirement; the excess went into the bank.
    Earned { excess_hours: f64 },
    /// The shortfall was covered from the bank.
    FromBank { bank_hours_used: f64 },
    Missed { shortfall_hours: f64 },
}

impl RtotalOutcome {
    pub fn qualifies(&self) -> bool {
        !matches!(self, RtotalOutcome::Missed { .. })
    }
}

impl fmt::Display for RtotalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RtotalOutcome::Earned { excess_hours } => {
                write!(f, "qualified, with {excess_hours:.1}h extra")
            }
            RtotalOutcome::FromBank { bank_hours_used } => {
                write!(f, "qualified, using {bank_hours_used:.1}h from hour bank")
            }
            RtotalOutcome::Missed { shortfall_hours } => {
                write!(f, "not qualified, {shortfall_hours:.1}h short")
            }
        }
    }
}

/// Per-month result of the accrual pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthVerdict {
    pub year: i32,
    pub month: u32,
    /// Required working hours from the calendar.
    pub required_hours: f64,
    /// Required hours less leave-equivalent hours.
    pub rtotal_required_hours: f64,
    pub totals: MonthTotals,
    pub rtotal: RtotalOutcome,
    pub rlinear_threshold: f64,
    pub rlinear_hours: f64,
    pub rlon_threshold: f64,
    pub rlon_hours: f64,
    /// Bank balance after this month.
    pub bank_balance: f64,
    /// Excess of this month if it qualified outright, else zero. Seeds the
    /// next year's bank when this is the last month of the year.
    pub pending_carry: f64,
    pub entries: Vec<ClassifiedEntry>,
}

/// Run one month through the accrual rules.
///
/// `days` may arrive in any order; they are processed by ascending date.
pub fn process_month(
    year: i32,
    month: u32,
    required_hours: u32,
    days: Vec<DayRecord>,
    carry_in: MonthState,
    config: &BonusConfig,
) -> Result<(MonthVerdict, MonthState)> {
    if !(1..=12).contains(&month) {
        return Err(CoreError::InvalidMonth { year, month });
    }

    let mut days = days;
    days.sort_by_key(|d| d.date);

    let rlinear_month = config.is_rlinear_vacation_month(month);
    let mut state = MonthState {
        rtotal_bank: carry_in.rtotal_bank.max(0.0),
        ..carry_in
    };
    let mut totals = MonthTotals::default();
    let mut entries = Vec::new();

    for day in days {
        let billability = day.billability();
        for mut entry in day.entries {
            totals.add(&mut entry, state.previous_day_billable, rlinear_month);
            entries.push(entry);
        }
        match billability {
            DayBillability::Billable => state.previous_day_billable = true,
            DayBillability::NotBillable => state.previous_day_billable = false,
            DayBillability::Leave => {}
        }
    }

    let required = f64::from(required_hours);
    let mut rtotal_required_hours = required - totals.leave_equivalent_hours;
    if config.thresholds.clamp_leave_requirement {
        rtotal_required_hours = rtotal_required_hours.max(0.0);
    }

    let (rtotal, pending_carry) = if totals.bonus_hours >= rtotal_required_hours {
        let excess_hours = totals.bonus_hours - rtotal_required_hours;
        state.rtotal_bank += excess_hours;
        (RtotalOutcome::Earned { excess_hours }, excess_hours)
    } else {
        let shortfall = rtotal_required_hours - totals.bonus_hours;
        if state.rtotal_bank >= shortfall {
            state.rtotal_bank -= shortfall;
            (RtotalOutcome::FromBank { bank_hours_used: shortfall }, 0.0)
        } else {
            (RtotalOutcome::Missed { shortfall_hours: shortfall }, 0.0)
        }
    };

    let base = config.thresholds.rlinear_hours;
    let rlinear_threshold = if totals.rlinear_vacation_hours > 0.0 && required_hours > 0 {
        (totals.billed_hours / required * base).clamp(0.0, base)
    } else {
        base
    };
    let rlinear_hours = (totals.billed_hours - rlinear_threshold).max(0.0);

    let rlon_threshold = config.thresholds.rlon_hours;
    let rlon_hours = (totals.rlon_pool_hours() - rlon_threshold).max(0.0);

    debug!(
        year,
        month,
        bonus_hours = totals.bonus_hours,
        required = rtotal_required_hours,
        bank = state.rtotal_bank,
        outcome = %rtotal,
        "processed month"
    );

    let verdict = MonthVerdict {
        year,
        month,
        required_hours: required,
        rtotal_required_hours,
        totals,
        rtotal,
        rlinear_threshold,
        rlinear_hours,
        rlon_threshold,
        rlon_hours,
        bank_balance: state.rtotal_bank,
        pending_carry,
        entries,
    };

    Ok((verdict, state))
}
