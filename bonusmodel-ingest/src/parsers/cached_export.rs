//! Cached JSON export of daily timesheet lines.
//!
//! Shape: `{"panes": {"filter": {"records": [{"data": {...}}, ...]}}}`.
//! Each `data` object carries:
//!   thedate, numbertransferred, jobnumber, description, activitynumber,
//!   taskname, entrytext, invoiceable, internaljob

use bonusmodel_core::TimeEntry;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{IngestError, Result};

#[derive(Debug, Deserialize)]
struct Export {
    panes: Panes,
}

#[derive(Debug, Deserialize)]
struct Panes {
    filter: Filter,
}

#[derive(Debug, Deserialize)]
struct Filter {
    #[serde(default)]
    records: Vec<Record>,
}

#[derive(Debug, Deserialize)]
struct Record {
    data: Map<String, Value>,
}

fn malformed(index: usize, field: &str) -> IngestError {
    IngestError::Malformed {
        index,
        field: field.to_string(),
    }
}

/// Codes are strings in the export, but some activity numbers come through
/// as plain numbers.
fn code(data: &Map<String, Value>, index: usize, field: &str) -> Result<String> {
    match data.get(field) {
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(malformed(index, field)),
    }
}

fn optional_text(data: &Map<String, Value>, field: &str) -> String {
    match data.get(field) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn flag(data: &Map<String, Value>, index: usize, field: &str) -> Result<bool> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(malformed(index, field)),
    }
}

fn parse_line(index: usize, data: &Map<String, Value>) -> Result<TimeEntry> {
    let date = data
        .get("thedate")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .ok_or_else(|| malformed(index, "thedate"))?;
    let hours = data
        .get("numbertransferred")
        .and_then(Value::as_f64)
        .ok_or_else(|| malformed(index, "numbertransferred"))?;
    let job = code(data, index, "jobnumber")?;
    let activity = code(data, index, "activitynumber")?;

    Ok(TimeEntry::new(date, hours, job, activity, optional_text(data, "taskname"))
        .with_job_name(optional_text(data, "description"))
        .with_description(optional_text(data, "entrytext"))
        .invoiceable(flag(data, index, "invoiceable")?)
        .internal_job(flag(data, index, "internaljob")?))
}

/// Parse the cached export text into time entries, in file order.
pub fn parse_cached_export(text: &str) -> Result<Vec<TimeEntry>> {
    let export: Export = serde_json::from_str(text)?;
    let records = export.panes.filter.records;
    debug!(records = records.len(), "parsing cached timesheet export");

    records
        .iter()
        .enumerate()
        .map(|(index, record)| parse_line(index, &record.data))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export(lines: &str) -> String {
        format!(r#"{{"panes": {{"filter": {{"records": [{lines}]}}}}}}"#)
    }

    #[test]
    fn test_parse_cached_export_basic() {
        let text = export(
            r#"
            {"data": {"thedate": "2024-03-04", "numbertransferred": 7.5, "jobnumber": "P-100",
                      "description": "Kund AB", "activitynumber": "10", "taskname": "Utveckling",
                      "entrytext": "API", "invoiceable": true, "internaljob": false}},
            {"data": {"thedate": "2024-03-05", "numbertransferred": 8, "jobnumber": "Frånvaro",
                      "activitynumber": 1, "taskname": "Semester", "internaljob": true}}
            "#,
        );

        let entries = parse_cached_export(&text).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].hours, 7.5);
        assert_eq!(entries[0].job_name, "Kund AB");
        assert_eq!(entries[0].description, "API");
        assert!(entries[0].invoiceable);
        assert_eq!(entries[1].activity, "1");
        assert!(!entries[1].invoiceable);
        assert!(entries[1].internal_job);
        assert_eq!(entries[1].date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_missing_hours_is_malformed() {
        let text = export(
            r#"
            {"data": {"thedate": "2024-03-04", "numbertransferred": 1, "jobnumber": "J", "activitynumber": "A"}},
            {"data": {"thedate": "2024-03-05", "jobnumber": "J", "activitynumber": "A"}}
            "#,
        );
        match parse_cached_export(&text).unwrap_err() {
            IngestError::Malformed { index, field } => {
                assert_eq!(index, 1);
                assert_eq!(field, "numbertransferred");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_bad_date_is_malformed() {
        let text = export(
            r#"{"data": {"thedate": "04/03/2024", "numbertransferred": 1, "jobnumber": "J", "activitynumber": "A"}}"#,
        );
        assert!(matches!(
            parse_cached_export(&text),
            Err(IngestError::Malformed { index: 0, .. })
        ));
    }

    #[test]
    fn test_not_an_export() {
        assert!(matches!(parse_cached_export("[1, 2]"), Err(IngestError::Json(_))));
    }
}
