//! Required working hours per month.
//!
//! The engine never guesses a month's hours: a year without calendar data is
//! a hard failure for that year.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CoreError, Result};

/// Required hours for January..December.
pub type RequiredHours = [u32; 12];

pub trait CalendarOracle {
    fn required_hours(&self, year: i32) -> Result<RequiredHours>;
}

impl<T: CalendarOracle + ?Sized> CalendarOracle for &T {
    fn required_hours(&self, year: i32) -> Result<RequiredHours> {
        (**self).required_hours(year)
    }
}

/// Calendar backed by explicit per-year figures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedCalendar {
    years: BTreeMap<i32, RequiredHours>,
}

impl FixedCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: i32, hours: RequiredHours) -> Self {
        self.years.insert(year, hours);
        self
    }
}

impl CalendarOracle for FixedCalendar {
    fn required_hours(&self, year: i32) -> Result<RequiredHours> {
        self.years
            .get(&year)
            .copied()
            .ok_or(CoreError::MissingCalendarData { year })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarSettings {
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: u32,
    /// Public holidays on the same date every year, as `[month, day]`.
    #[serde(default = "default_fixed_holidays")]
    pub fixed_holidays: Vec<[u32; 2]>,
    /// Month carrying the eve deduction (midsummer eve).
    #[serde(default = "default_eve_month")]
    pub eve_month: u32,
    #[serde(default = "default_eve_deduction_hours")]
    pub eve_deduction_hours: u32,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            hours_per_day: default_hours_per_day(),
            fixed_holidays: default_fixed_holidays(),
            eve_month: default_eve_month(),
            eve_deduction_hours: default_eve_deduction_hours(),
        }
    }
}

impl CalendarSettings {
    pub fn validate(&self) -> Result<()> {
        if !(1..=24).contains(&self.hours_per_day) {
            return Err(CoreError::InvalidConfig(format!(
                "calendar.hours_per_day is {}, expected 1-24",
                self.hours_per_day
            )));
        }
        if !(1..=12).contains(&self.eve_month) {
            return Err(CoreError::InvalidConfig(format!(
                "calendar.eve_month is {}, expected 1-12",
                self.eve_month
            )));
        }
        Ok(())
    }
}

fn default_hours_per_day() -> u32 {
    8
}

fn default_fixed_holidays() -> Vec<[u32; 2]> {
    vec![
        [1, 1],
        [1, 6],
        [5, 1],
        [6, 6],
        [12, 24],
        [12, 25],
        [12, 26],
        [12, 31],
    ]
}

fn default_eve_month() -> u32 {
    6
}

fn default_eve_deduction_hours() -> u32 {
    4
}

/// Working-hours calendar built from weekdays minus public holidays.
///
/// Movable holidays (Easter, Ascension Day) are supplied per year by the
/// caller; only years with supplied data can be answered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HolidayCalendar {
    settings: CalendarSettings,
    movable: BTreeMap<i32, BTreeSet<NaiveDate>>,
}

impl HolidayCalendar {
    pub fn new(settings: CalendarSettings) -> Self {
        Self {
            settings,
            movable: BTreeMap::new(),
        }
    }

    /// Register a year's movable holidays. Dates outside `year` are ignored.
    pub fn insert_year(&mut self, year: i32, dates: impl IntoIterator<Item = NaiveDate>) {
        let set = self.movable.entry(year).or_default();
        set.extend(dates.into_iter().filter(|d| d.year() == year));
    }

    pub fn with_year(mut self, year: i32, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.insert_year(year, dates);
        self
    }

    pub fn known_years(&self) -> impl Iterator<Item = i32> + '_ {
        self.movable.keys().copied()
    }

    fn is_working_day(&self, date: NaiveDate, movable: &BTreeSet<NaiveDate>) -> bool {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        let md = [date.month(), date.day()];
        !self.settings.fixed_holidays.contains(&md) && !movable.contains(&date)
    }
}

impl CalendarOracle for HolidayCalendar {
    fn required_hours(&self, year: i32) -> Result<RequiredHours> {
        let movable = self
            .movable
            .get(&year)
            .ok_or(CoreError::MissingCalendarData { year })?;

        let mut out = [0u32; 12];
        for (i, slot) in out.iter_mut().enumerate() {
            let month = i as u32 + 1;
            let days = (1..=31)
                .filter_map(|d| NaiveDate::from_ymd_opt(year, month, d))
                .filter(|d| self.is_working_day(*d, movable))
                .count() as u32;
            let mut hours = days.checked_mul(self.settings.hours_per_day).ok_or_else(|| {
                CoreError::InvalidConfig(format!(
                    "calendar.hours_per_day {} overflows {year}-{month:02}",
                    self.settings.hours_per_day
                ))
            })?;
            if month == self.settings.eve_month {
                hours = hours.saturating_sub(self.settings.eve_deduction_hours);
            }
            *slot = hours;
        }
        Ok(out)
    }
}
