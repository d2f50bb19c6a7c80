//! Yearly rollup of monthly verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::accrual::MonthVerdict;
use crate::calendar::RequiredHours;
use crate::config::{BonusConfig, YearCarryPolicy};

/// How the year-level rules changed the raw Rtotal month count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RtotalAdjustment {
    /// Bonus hours covered the whole year; excess buys a fraction of one
    /// extra Rtotal.
    ExceededYear { extra_hours: f64 },
    /// Within the retroactive margin; months were granted up to the cap.
    Retroactive { granted: u32, cap: u32 },
    /// Within the retroactive margin but already at or above the cap.
    AtCap { cap: u32 },
    /// Too far from the year's hours for the retroactive rule.
    Shortfall { bonus_hours: f64, needed_hours: f64 },
}

impl fmt::Display for RtotalAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RtotalAdjustment::ExceededYear { extra_hours } => write!(
                f,
                "More bonus hours than hours in year ({extra_hours:.1}h extra). Hard at work!"
            ),
            RtotalAdjustment::Retroactive { granted, cap } => write!(
                f,
                "Within margin of all hours in year, {granted} Rtotal granted retroactively (total {cap})"
            ),
            RtotalAdjustment::AtCap { cap } => write!(
                f,
                "Within margin of all hours in year, but already received {cap} Rtotal bonuses, so no adjustment made"
            ),
            RtotalAdjustment::Shortfall {
                bonus_hours,
                needed_hours,
            } => write!(
                f,
                "You have {bonus_hours:.0} bonus hours, you need {needed_hours:.0} to qualify for retroactive Rtotal ({:.1}h short)",
                needed_hours - bonus_hours
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearVerdict {
    pub year: i32,
    /// Rtotal payments for the year, fractional when the year was exceeded.
    pub rtotal_count: f64,
    /// Months that qualified on their own (outright or via the bank).
    pub qualifying_months: u32,
    pub adjustment: RtotalAdjustment,
    pub rlinear_hours: f64,
    pub rlon_hours: f64,
    pub bonus_hours: f64,
    pub yearly_hours: f64,
    /// Billed plus adjacency vacation and fiduciary hours.
    pub rlon_pool_hours: f64,
    /// Bonus hours the Rlön pool did not capture. Diagnostic only.
    pub hours_lost: f64,
    pub closing_bank: f64,
    /// Opening bank for the next year under the configured carry policy.
    pub carry_into_next_year: f64,
}

impl YearVerdict {
    pub fn narrative(&self) -> String {
        self.adjustment.to_string()
    }
}

/// Aggregate a year's monthly verdicts, ordered by month.
pub fn rollup_year(
    year: i32,
    months: &[MonthVerdict],
    required: &RequiredHours,
    config: &BonusConfig,
) -> YearVerdict {
    let th = &config.thresholds;

    let bonus_hours: f64 = months.iter().map(|m| m.totals.bonus_hours).sum();
    let rlon_pool_hours: f64 = months.iter().map(|m| m.totals.rlon_pool_hours()).sum();
    let rlinear_hours: f64 = months.iter().map(|m| m.rlinear_hours).sum();
    let rlon_hours: f64 = months.iter().map(|m| m.rlon_hours).sum();
    let qualifying_months = months.iter().filter(|m| m.rtotal.qualifies()).count() as u32;
    let yearly_hours: f64 = required.iter().map(|h| f64::from(*h)).sum();

    let (rtotal_count, adjustment) = if bonus_hours >= yearly_hours {
        let extra_hours = bonus_hours - yearly_hours;
        let count = 12.0 + (extra_hours / th.full_month_hours).min(1.0);
        (count, RtotalAdjustment::ExceededYear { extra_hours })
    } else if bonus_hours >= yearly_hours - th.retroactive_margin_hours {
        let cap = th.retroactive_cap;
        let adjustment = if qualifying_months < cap {
            RtotalAdjustment::Retroactive {
                granted: cap - qualifying_months,
                cap,
            }
        } else {
            RtotalAdjustment::AtCap { cap }
        };
        (f64::from(cap), adjustment)
    } else {
        (
            f64::from(qualifying_months),
            RtotalAdjustment::Shortfall {
                bonus_hours,
                needed_hours: yearly_hours - th.retroactive_margin_hours,
            },
        )
    };

    let closing_bank = months.last().map(|m| m.bank_balance).unwrap_or(0.0);
    let pending_carry = months.last().map(|m| m.pending_carry).unwrap_or(0.0);
    let carry_into_next_year = match (adjustment, config.year_carry) {
        // Paid out through the extra-credit fraction.
        (RtotalAdjustment::ExceededYear { .. }, _) => 0.0,
        (_, YearCarryPolicy::Replace) => pending_carry,
        (_, YearCarryPolicy::Additive) => closing_bank + pending_carry,
        (_, YearCarryPolicy::Reset) => 0.0,
    };

    let hours_lost = bonus_hours - rlon_pool_hours;

    info!(
        year,
        rtotal_count,
        qualifying_months,
        rlinear_hours,
        rlon_hours,
        carry = carry_into_next_year,
        "rolled up year"
    );

    YearVerdict {
        year,
        rtotal_count,
        qualifying_months,
        adjustment,
        rlinear_hours,
        rlon_hours,
        bonus_hours,
        yearly_hours,
        rlon_pool_hours,
        hours_lost,
        closing_bank,
        carry_into_next_year,
    }
}
