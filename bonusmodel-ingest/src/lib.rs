//! bonusmodel-ingest: timesheet exports (cached JSON, CSV) and holiday files.

pub mod error;
pub mod holidays;
pub mod parsers;
pub mod types;

use bonusmodel_core::TimeEntry;
use std::fs;
use std::path::Path;
use tracing::info;

pub use error::{IngestError, Result};
pub use holidays::{Holiday, load_holiday_dir, parse_holidays};
pub use parsers::{parse_cached_export, parse_csv_export};
pub use types::TimesheetFormat;

/// Read a timesheet file, choosing the parser by extension.
pub fn load_timesheet(path: impl AsRef<Path>) -> Result<Vec<TimeEntry>> {
    let path = path.as_ref();
    let entries = match TimesheetFormat::from_path(path)? {
        TimesheetFormat::Json => parse_cached_export(&fs::read_to_string(path)?)?,
        TimesheetFormat::Csv => parse_csv_export(fs::File::open(path)?)?,
    };
    info!(path = %path.display(), entries = entries.len(), "loaded timesheet");
    Ok(entries)
}
