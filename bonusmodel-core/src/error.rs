use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("missing calendar data for {year}")]
    MissingCalendarData { year: i32 },
    #[error("malformed entry #{index}: {reason}")]
    MalformedEntry { index: usize, reason: String },
    #[error("invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
