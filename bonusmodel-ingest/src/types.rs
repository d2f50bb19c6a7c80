use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{IngestError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimesheetFormat {
    /// Cached export of the time-reporting system's daily sheet lines.
    Json,
    /// Flat CSV export, one line per row.
    Csv,
}

impl TimesheetFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(TimesheetFormat::Json),
            Some("csv") => Ok(TimesheetFormat::Csv),
            _ => Err(IngestError::UnknownFormat(path.display().to_string())),
        }
    }
}
