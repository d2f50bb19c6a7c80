//! Bonus engine: ties a classifier and a calendar oracle to the accrual and
//! rollup passes.
//!
//! Years run in ascending order; the carry value of one year seeds the next.
//! Callers that want partial results can drive `process_year` themselves.

use chrono::NaiveDate;
use tracing::warn;

use crate::accrual::{MonthState, process_month};
use crate::calendar::CalendarOracle;
use crate::config::BonusConfig;
use crate::entry::{Category, ClassifiedEntry, DayRecord, TimeEntry};
use crate::error::{CoreError, Result};
use crate::ledger::UnclassifiedLedger;
use crate::report::{AppliedRates, Payout, Report, YearReport};
use crate::rollup::rollup_year;
use crate::timesheet::{MonthSheet, Timesheet, YearSheet};

/// Maps a time entry to its bonus category. Must be total and pure: the same
/// entry always yields the same category, falling back to `Unclassified`.
pub trait Classify {
    fn classify(&self, entry: &TimeEntry) -> Category;
}

impl<T: Classify + ?Sized> Classify for &T {
    fn classify(&self, entry: &TimeEntry) -> Category {
        (**self).classify(entry)
    }
}

#[derive(Debug, Clone)]
pub struct BonusEngine<'a, C: Classify, O: CalendarOracle> {
    classifier: C,
    oracle: O,
    config: &'a BonusConfig,
}

impl<'a, C: Classify, O: CalendarOracle> BonusEngine<'a, C, O> {
    pub fn new(classifier: C, oracle: O, config: &'a BonusConfig) -> Self {
        Self {
            classifier,
            oracle,
            config,
        }
    }

    pub fn config(&self) -> &BonusConfig {
        self.config
    }

    /// Classify one day's entries, recording unclassifiable ones.
    pub fn classify_day(
        &self,
        date: NaiveDate,
        entries: &[TimeEntry],
        ledger: &mut UnclassifiedLedger,
    ) -> DayRecord {
        let classified = entries
            .iter()
            .map(|entry| {
                let category = self.classifier.classify(entry);
                if category == Category::Unclassified {
                    warn!(
                        date = %entry.date,
                        job = %entry.job,
                        activity = %entry.activity,
                        task = %entry.task,
                        hours = entry.hours,
                        "unclassified timesheet line"
                    );
                    ledger.record(entry);
                }
                ClassifiedEntry::new(entry.clone(), category)
            })
            .collect();
        DayRecord::new(date, classified)
    }

    fn classify_month(
        &self,
        year: i32,
        month: u32,
        sheet: &MonthSheet,
        ledger: &mut UnclassifiedLedger,
    ) -> Result<Vec<DayRecord>> {
        sheet
            .iter()
            .map(|(day, entries)| {
                let date = NaiveDate::from_ymd_opt(year, month, *day)
                    .ok_or(CoreError::InvalidMonth { year, month })?;
                Ok(self.classify_day(date, entries, ledger))
            })
            .collect()
    }

    /// Run every month of one year and roll it up.
    ///
    /// Fails without a partial result when the calendar has no data for
    /// `year`.
    pub fn process_year(
        &self,
        year: i32,
        sheet: &YearSheet,
        opening_bank: f64,
        ledger: &mut UnclassifiedLedger,
    ) -> Result<YearReport> {
        let required = self.oracle.required_hours(year)?;

        let mut state = MonthState::opening(opening_bank);
        let mut months = Vec::with_capacity(sheet.len());
        for (month, month_sheet) in sheet {
            let month = *month;
            let hours = month
                .checked_sub(1)
                .and_then(|i| required.get(i as usize))
                .copied()
                .ok_or(CoreError::InvalidMonth { year, month })?;
            let days = self.classify_month(year, month, month_sheet, ledger)?;
            let (verdict, next) = process_month(year, month, hours, days, state, self.config)?;
            state = next;
            months.push(verdict);
        }

        let verdict = rollup_year(year, &months, &required, self.config);
        let rates = AppliedRates::from(&self.config.rates);
        let payout = Payout::for_year(&verdict, &rates);

        Ok(YearReport {
            verdict,
            months,
            payout,
        })
    }

    /// Process every year of the timesheet in ascending order.
    pub fn run(&self, timesheet: &Timesheet, ledger: &mut UnclassifiedLedger) -> Result<Report> {
        let mut carry = 0.0;
        let mut years = Vec::new();
        for (year, sheet) in timesheet.years() {
            let report = self.process_year(year, sheet, carry, ledger)?;
            carry = report.verdict.carry_into_next_year;
            years.push(report);
        }

        Ok(Report {
            rates: AppliedRates::from(&self.config.rates),
            years,
        })
    }
}
