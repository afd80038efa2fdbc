//! Data module - listings loading and cleaning

mod cleaner;
pub mod listing;
mod loader;

pub use cleaner::{CleanerError, CleaningReport, DataCleaner, Thresholds, IRRELEVANT_COLUMNS};
pub use listing::Listing;
pub use loader::{DataLoader, LoaderError};
