//! bonusmodel-rules: built-in code rules, manual override mapping, and the layered classifier

pub mod classifier;
pub mod codes;
pub mod error;
pub mod mapping;

pub use classifier::Classifier;
pub use codes::CodeTable;
pub use error::{Result, RulesError};
pub use mapping::{ANY_ACTIVITY, MappingTable};
