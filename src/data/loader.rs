//! Listings Loader Module
//! Reads the listings spreadsheet (or CSV export) into a Polars DataFrame.

use crate::data::listing::REQUIRED_COLUMNS;
use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Cannot access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("Missing expected columns: {}", .0.join(", "))]
    SchemaMismatch(Vec<String>),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// Column type inferred from the cells of a spreadsheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Int,
    Float,
    Text,
}

/// Handles listings file loading.
pub struct DataLoader {
    df: Option<DataFrame>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
        }
    }

    /// Load a listings file. Spreadsheets go through calamine, `.csv` through Polars.
    pub fn load(&mut self, path: &Path) -> Result<&DataFrame, LoaderError> {
        std::fs::metadata(path).map_err(|source| LoaderError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let df = match extension.as_str() {
            "csv" => Self::read_csv(path)?,
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Self::read_spreadsheet(path)?,
            other => {
                return Err(LoaderError::Parse {
                    path: path.to_path_buf(),
                    message: format!("unsupported file extension '{other}'"),
                })
            }
        };

        info!(
            rows = df.height(),
            columns = df.width(),
            "Loaded listings from {}",
            path.display()
        );

        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;
        Ok(df)
    }

    /// Read the first worksheet; its first row holds the column names.
    fn read_spreadsheet(path: &Path) -> Result<DataFrame, LoaderError> {
        let parse_error = |message: String| LoaderError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| parse_error(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| parse_error("workbook has no worksheets".to_string()))?
            .map_err(|e| parse_error(e.to_string()))?;

        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| parse_error("worksheet is empty".to_string()))?;
        let names = Self::header_names(header);

        let mut cells: Vec<Vec<&Data>> = vec![Vec::new(); names.len()];
        for row in rows {
            for (idx, cell) in row.iter().enumerate().take(names.len()) {
                cells[idx].push(cell);
            }
        }

        let columns: Vec<Column> = names
            .iter()
            .zip(cells.iter())
            .map(|(name, values)| Self::build_column(name, values))
            .collect();

        DataFrame::new(columns).map_err(|e| parse_error(e.to_string()))
    }

    /// Trimmed header cells. Blank cells are named `Unnamed: {idx}`.
    fn header_names(header: &[Data]) -> Vec<String> {
        header
            .iter()
            .enumerate()
            .map(|(idx, cell)| match cell.to_string().trim() {
                "" => format!("Unnamed: {idx}"),
                name => name.to_string(),
            })
            .collect()
    }

    fn infer_kind(cells: &[&Data]) -> CellKind {
        let mut kind = CellKind::Int;
        let mut seen_value = false;

        for cell in cells {
            match cell {
                Data::Empty | Data::Error(_) => continue,
                Data::Int(_) => {}
                Data::Float(f) => {
                    if f.fract() != 0.0 || f.abs() > i64::MAX as f64 {
                        kind = CellKind::Float;
                    }
                }
                _ => return CellKind::Text,
            }
            seen_value = true;
        }

        // An all-empty column carries no integers; keep it numeric so nulls stay nulls.
        if seen_value {
            kind
        } else {
            CellKind::Float
        }
    }

    fn build_column(name: &str, cells: &[&Data]) -> Column {
        let kind = Self::infer_kind(cells);
        debug!(column = name, ?kind, "Inferred spreadsheet column type");

        match kind {
            CellKind::Int => {
                let values: Vec<Option<i64>> = cells
                    .iter()
                    .map(|cell| match cell {
                        Data::Int(i) => Some(*i),
                        Data::Float(f) => Some(*f as i64),
                        _ => None,
                    })
                    .collect();
                Column::new(name.into(), values)
            }
            CellKind::Float => {
                let values: Vec<Option<f64>> = cells
                    .iter()
                    .map(|cell| match cell {
                        Data::Int(i) => Some(*i as f64),
                        Data::Float(f) => Some(*f),
                        _ => None,
                    })
                    .collect();
                Column::new(name.into(), values)
            }
            CellKind::Text => {
                let values: Vec<Option<String>> = cells
                    .iter()
                    .map(|cell| match cell {
                        Data::Empty | Data::Error(_) => None,
                        Data::String(s) => Some(s.clone()),
                        other => Some(other.to_string()),
                    })
                    .collect();
                Column::new(name.into(), values)
            }
        }
    }

    /// Check that every column the analysis relies on is present.
    pub fn validate_schema(df: &DataFrame) -> Result<(), LoaderError> {
        let present = Self::column_names(df);
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|required| !present.iter().any(|name| name == *required))
            .map(|s| s.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LoaderError::SchemaMismatch(missing))
        }
    }

    /// Get list of column names of a DataFrame.
    pub fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Get list of numeric column names.
    pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| {
                matches!(
                    col.dtype(),
                    DataType::Float32
                        | DataType::Float64
                        | DataType::Int8
                        | DataType::Int16
                        | DataType::Int32
                        | DataType::Int64
                        | DataType::UInt8
                        | DataType::UInt16
                        | DataType::UInt32
                        | DataType::UInt64
                )
            })
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Get the number of rows in the loaded DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Hand over the loaded DataFrame.
    pub fn into_dataframe(self) -> Result<DataFrame, LoaderError> {
        self.df.ok_or(LoaderError::NoData)
    }
}
