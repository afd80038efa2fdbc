//! Data Cleaner Module
//! Drops irrelevant columns and outlier rows from the raw listings table.

use crate::data::listing::{MINIMUM_NIGHTS, PRICE, REVIEWS_PER_MONTH};
use crate::data::DataLoader;
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Identifier and free text columns with no analytical value.
pub const IRRELEVANT_COLUMNS: [&str; 7] = [
    "name",
    "host_name",
    "id",
    "host_id",
    "neighbourhood_group",
    "last_review",
    "license",
];

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' not found")]
    SchemaMismatch(String),
}

/// Outlier thresholds. Rows strictly above either limit are removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub max_minimum_nights: i64,
    pub max_price: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_minimum_nights: 30,
            max_price: 3000.0,
        }
    }
}

/// What the cleaning pass removed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningReport {
    pub rows_loaded: usize,
    pub rows_after_nights_filter: usize,
    pub rows_after_price_filter: usize,
    /// Rows dropped for a missing value in a retained column.
    pub rows_incomplete: usize,
    pub rows_retained: usize,
    pub dropped_columns: Vec<String>,
    /// Null count per column, taken before `reviews_per_month` is dropped.
    pub missing_values: Vec<(String, usize)>,
}

impl CleaningReport {
    pub fn rows_removed(&self) -> usize {
        self.rows_loaded - self.rows_retained
    }
}

/// Handles listings cleaning operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Run every cleaning step in order.
    pub fn clean(
        df: &DataFrame,
        thresholds: Thresholds,
    ) -> Result<(DataFrame, CleaningReport), CleanerError> {
        let mut report = CleaningReport {
            rows_loaded: df.height(),
            ..CleaningReport::default()
        };

        let (df, mut dropped) = Self::drop_columns(df, &IRRELEVANT_COLUMNS)?;
        let df = Self::normalize_price(&df)?;

        let df = Self::filter_max(&df, MINIMUM_NIGHTS, lit(thresholds.max_minimum_nights))?;
        report.rows_after_nights_filter = df.height();
        info!(
            removed = report.rows_loaded - df.height(),
            "Removed listings with minimum_nights > {}", thresholds.max_minimum_nights
        );

        let df = Self::filter_max(&df, PRICE, lit(thresholds.max_price))?;
        report.rows_after_price_filter = df.height();
        info!(
            removed = report.rows_after_nights_filter - df.height(),
            "Removed listings with price > {}", thresholds.max_price
        );

        report.missing_values = Self::missing_values(&df);
        for (column, count) in report.missing_values.iter().filter(|(_, n)| *n > 0) {
            debug!(column = column.as_str(), count, "Column has missing values");
        }

        let (df, dropped_later) = Self::drop_columns(&df, &[REVIEWS_PER_MONTH])?;
        dropped.extend(dropped_later);
        report.dropped_columns = dropped;

        let complete = df.drop_nulls::<String>(None)?;
        report.rows_incomplete = df.height() - complete.height();
        report.rows_retained = complete.height();
        if report.rows_incomplete > 0 {
            let columns: Vec<&str> = report
                .missing_values
                .iter()
                .filter(|(column, count)| *count > 0 && column != REVIEWS_PER_MONTH)
                .map(|(column, _)| column.as_str())
                .collect();
            warn!(
                removed = report.rows_incomplete,
                columns = ?columns,
                "Removed listings with missing values"
            );
        }

        Ok((complete, report))
    }

    /// Drop the named columns that are present. Absent columns are skipped.
    pub fn drop_columns(
        df: &DataFrame,
        columns: &[&str],
    ) -> Result<(DataFrame, Vec<String>), CleanerError> {
        let present = DataLoader::column_names(df);
        let mut result = df.clone();
        let mut dropped = Vec::new();

        for column in columns {
            if present.iter().any(|name| name == column) {
                result = result.drop(column)?;
                dropped.push(column.to_string());
            }
        }

        debug!(columns = ?dropped, "Dropped columns");
        Ok((result, dropped))
    }

    /// Keep rows whose `column` is at most `limit`. Null values are kept.
    pub fn filter_max(
        df: &DataFrame,
        column: &str,
        limit: Expr,
    ) -> Result<DataFrame, CleanerError> {
        Self::require_column(df, column)?;

        let filtered = df
            .clone()
            .lazy()
            .filter(col(column).lt_eq(limit).or(col(column).is_null()))
            .collect()?;
        Ok(filtered)
    }

    /// Parse text prices such as `"$1,250.00"` into Float64.
    pub fn normalize_price(df: &DataFrame) -> Result<DataFrame, CleanerError> {
        Self::require_column(df, PRICE)?;

        let price = df.column(PRICE)?;
        if price.dtype() != &DataType::String {
            return Ok(df.clone());
        }

        let parsed: Vec<Option<f64>> = price
            .str()?
            .into_iter()
            .map(|value| value.and_then(Self::parse_price))
            .collect();

        let unparsed = parsed.iter().filter(|v| v.is_none()).count() - price.null_count();
        if unparsed > 0 {
            warn!(unparsed, "Some prices could not be parsed and were set to null");
        }

        let mut result = df.clone();
        result.with_column(Column::new(PRICE.into(), parsed))?;
        Ok(result)
    }

    fn parse_price(text: &str) -> Option<f64> {
        let digits: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();
        digits.parse::<f64>().ok()
    }

    /// Null count per column.
    pub fn missing_values(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .map(|c| (c.name().to_string(), c.null_count()))
            .collect()
    }

    fn require_column(df: &DataFrame, column: &str) -> Result<(), CleanerError> {
        if df.column(column).is_err() {
            return Err(CleanerError::SchemaMismatch(column.to_string()));
        }
        Ok(())
    }
}
