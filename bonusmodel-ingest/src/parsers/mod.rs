pub mod cached_export;
pub mod csv_export;

pub use cached_export::parse_cached_export;
pub use csv_export::parse_csv_export;
