//! Flat CSV timesheet export.
//!
//! Header: date,hours,job,activity,task,invoiceable,internal_job,description
//! Dates are `YYYY-MM-DD`; the flags are `true`/`false`, and an empty cell
//! or missing column reads as `false`.

use bonusmodel_core::TimeEntry;
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;

use crate::error::Result;

#[derive(Debug, Deserialize)]
struct Row {
    date: NaiveDate,
    hours: f64,
    job: String,
    activity: String,
    #[serde(default)]
    task: String,
    #[serde(default)]
    invoiceable: Option<bool>,
    #[serde(default)]
    internal_job: Option<bool>,
    #[serde(default)]
    description: String,
}

impl From<Row> for TimeEntry {
    fn from(row: Row) -> Self {
        TimeEntry::new(row.date, row.hours, row.job.trim(), row.activity.trim(), row.task.trim())
            .with_description(row.description)
            .invoiceable(row.invoiceable.unwrap_or(false))
            .internal_job(row.internal_job.unwrap_or(false))
    }
}

pub fn parse_csv_export<R: Read>(reader: R) -> Result<Vec<TimeEntry>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for result in rdr.deserialize::<Row>() {
        out.push(result?.into());
    }
    Ok(out)
}
