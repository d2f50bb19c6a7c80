//! Bonus scheme parameters.
//!
//! Built once at startup (usually from the CLI's config.toml) and passed by
//! reference into the accrual engine and the yearly rollup.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusConfig {
    #[serde(default)]
    pub rates: RateConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    /// Calendar months in which vacation rescales the Rlinear threshold.
    #[serde(default = "default_rlinear_vacation_months")]
    pub rlinear_vacation_months: Vec<u32>,
    #[serde(default)]
    pub year_carry: YearCarryPolicy,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            rates: RateConfig::default(),
            thresholds: ThresholdConfig::default(),
            rlinear_vacation_months: default_rlinear_vacation_months(),
            year_carry: YearCarryPolicy::default(),
        }
    }
}

impl BonusConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(m) = self
            .rlinear_vacation_months
            .iter()
            .find(|m| !(1..=12).contains(*m))
        {
            return Err(CoreError::InvalidConfig(format!(
                "rlinear_vacation_months contains {m}, expected 1-12"
            )));
        }
        if self.rates.rlon_divisor <= 0.0 {
            return Err(CoreError::InvalidConfig(
                "rates.rlon_divisor must be positive".to_string(),
            ));
        }
        if self.thresholds.full_month_hours <= 0.0 {
            return Err(CoreError::InvalidConfig(
                "thresholds.full_month_hours must be positive".to_string(),
            ));
        }
        if self.thresholds.retroactive_cap > 12 {
            return Err(CoreError::InvalidConfig(
                "thresholds.retroactive_cap cannot exceed 12".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_rlinear_vacation_month(&self, month: u32) -> bool {
        self.rlinear_vacation_months.contains(&month)
    }
}

/// Monetary rates in SEK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateConfig {
    /// Paid per qualifying Rtotal month.
    #[serde(default = "default_rtotal_rate")]
    pub rtotal: f64,
    /// Paid per Rlinear hour.
    #[serde(default = "default_rlinear_rate")]
    pub rlinear: f64,
    /// Divisor spreading Rtotal over hours in the derived Rlön rate.
    #[serde(default = "default_rlon_divisor")]
    pub rlon_divisor: f64,
    /// Explicit Rlön rate; derived from the legacy rates when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rlon: Option<f64>,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            rtotal: default_rtotal_rate(),
            rlinear: default_rlinear_rate(),
            rlon_divisor: default_rlon_divisor(),
            rlon: None,
        }
    }
}

impl RateConfig {
    /// `ceil(rlinear + rtotal / rlon_divisor)` unless overridden.
    pub fn rlon_rate(&self) -> f64 {
        self.rlon
            .unwrap_or_else(|| (self.rlinear + self.rtotal / self.rlon_divisor).ceil())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_hour_threshold")]
    pub rlinear_hours: f64,
    #[serde(default = "default_hour_threshold")]
    pub rlon_hours: f64,
    /// A year this close to its required hours earns retroactive Rtotal.
    #[serde(default = "default_retroactive_margin")]
    pub retroactive_margin_hours: f64,
    /// Rtotal count granted by the retroactive rule.
    #[serde(default = "default_retroactive_cap")]
    pub retroactive_cap: u32,
    /// Hours above a full year that buy one extra Rtotal.
    #[serde(default = "default_full_month_hours")]
    pub full_month_hours: f64,
    /// Floor the Rtotal requirement at zero. When unset, leave beyond the
    /// month's required hours makes the requirement negative and the
    /// surplus is banked as excess.
    #[serde(default)]
    pub clamp_leave_requirement: bool,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            rlinear_hours: default_hour_threshold(),
            rlon_hours: default_hour_threshold(),
            retroactive_margin_hours: default_retroactive_margin(),
            retroactive_cap: default_retroactive_cap(),
            full_month_hours: default_full_month_hours(),
            clamp_leave_requirement: false,
        }
    }
}

/// What the next year's opening Rtotal bank is seeded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearCarryPolicy {
    /// Only the excess of the last outright-qualifying month, if that was
    /// the final processed month. The closing bank is discarded.
    #[default]
    Replace,
    /// Closing bank plus the pending carry. The closing bank already holds
    /// the last month's excess, so those hours are counted twice.
    Additive,
    /// Every year opens with an empty bank.
    Reset,
}

fn default_rtotal_rate() -> f64 {
    2000.0
}

fn default_rlinear_rate() -> f64 {
    40.0
}

fn default_rlon_divisor() -> f64 {
    38.0
}

fn default_hour_threshold() -> f64 {
    130.0
}

fn default_retroactive_margin() -> f64 {
    40.0
}

fn default_retroactive_cap() -> u32 {
    11
}

fn default_full_month_hours() -> f64 {
    168.0
}

fn default_rlinear_vacation_months() -> Vec<u32> {
    vec![1, 7, 8, 12]
}
