use bonusmodel_core::Category;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("conflicting rule at {key}: already {existing}, refusing {requested}")]
    ConflictingRule {
        key: String,
        existing: Category,
        requested: Category,
    },

    #[error("mapping file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("mapping file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RulesError>;
