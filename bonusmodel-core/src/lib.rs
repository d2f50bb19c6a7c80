//! bonusmodel-core: Bonus eligibility engine for consultant timesheets

pub mod accrual;
pub mod calendar;
pub mod config;
pub mod engine;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod report;
pub mod rollup;
pub mod timesheet;

pub use accrual::{MonthState, MonthTotals, MonthVerdict, RtotalOutcome, process_month};
pub use calendar::{CalendarOracle, CalendarSettings, FixedCalendar, HolidayCalendar, RequiredHours};
pub use config::{BonusConfig, RateConfig, ThresholdConfig, YearCarryPolicy};
pub use engine::{BonusEngine, Classify};
pub use entry::{Category, ClassifiedEntry, DayBillability, DayRecord, TimeEntry};
pub use error::{CoreError, Result};
pub use ledger::{UnclassifiedGroup, UnclassifiedLedger};
pub use report::{AppliedRates, LineSummary, Payout, Report, YearReport, summarize_lines};
pub use rollup::{RtotalAdjustment, YearVerdict, rollup_year};
pub use timesheet::{MonthSheet, Timesheet, YearSheet};
