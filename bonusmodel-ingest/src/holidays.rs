//! Holiday files: one `holidays_<year>.json` per year, each a list of
//! `{"name": ..., "date": "YYYY-MM-DD"}` objects.

use bonusmodel_core::{CalendarSettings, HolidayCalendar};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Holiday {
    pub name: String,
    pub date: NaiveDate,
}

/// Eves are covered by the calendar's own deduction.
fn is_eve(holiday: &Holiday) -> bool {
    holiday.name.trim_end().ends_with(" Eve")
}

pub fn parse_holidays(text: &str) -> Result<Vec<Holiday>> {
    Ok(serde_json::from_str(text)?)
}

/// Year encoded in a `holidays_<year>.json` file name.
fn year_of(path: &Path) -> Option<i32> {
    let name = path.file_name()?.to_str()?;
    name.strip_prefix("holidays_")?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

/// Build a holiday calendar from every `holidays_<year>.json` in `dir`.
/// Years without a file stay unknown to the calendar.
pub fn load_holiday_dir(dir: impl AsRef<Path>, settings: CalendarSettings) -> Result<HolidayCalendar> {
    let mut calendar = HolidayCalendar::new(settings);
    for item in fs::read_dir(dir.as_ref())? {
        let path = item?.path();
        let Some(year) = year_of(&path) else {
            continue;
        };
        let holidays = parse_holidays(&fs::read_to_string(&path)?)?;
        debug!(year, count = holidays.len(), path = %path.display(), "loaded holidays");
        calendar.insert_year(
            year,
            holidays.into_iter().filter(|h| !is_eve(h)).map(|h| h.date),
        );
    }
    Ok(calendar)
}
