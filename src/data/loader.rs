//! CSV Data Loader Module
//! Reads the referendum, region and department tables using Polars.

use crate::config::InputConfig;
use crate::data::columns::{CODE, DEPARTMENT_CODE, NAME, REGION_CODE, VOTE_COLUMNS};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Referendum results are semicolon separated, reference tables use commas.
pub const REFERENDUM_SEPARATOR: u8 = b';';
pub const REFERENCE_SEPARATOR: u8 = b',';

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV {path:?}: {source}")]
    CsvError { path: PathBuf, source: PolarsError },
    #[error("Column '{column}' not found in {path:?}")]
    MissingColumn { path: PathBuf, column: String },
}

/// The three raw input tables, every column kept as a string.
#[derive(Debug, Clone)]
pub struct ReferendumTables {
    pub referendum: DataFrame,
    pub regions: DataFrame,
    pub departments: DataFrame,
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load all three input tables named by the configuration.
    pub fn load_data(input: &InputConfig) -> Result<ReferendumTables, LoaderError> {
        let mut referendum_columns = vec![DEPARTMENT_CODE];
        referendum_columns.extend(VOTE_COLUMNS);

        let referendum =
            Self::load_table(&input.referendum, REFERENDUM_SEPARATOR, &referendum_columns)?;
        let regions = Self::load_table(&input.regions, REFERENCE_SEPARATOR, &[CODE, NAME])?;
        let departments = Self::load_table(
            &input.departments,
            REFERENCE_SEPARATOR,
            &[CODE, NAME, REGION_CODE],
        )?;

        info!(
            referendum = referendum.height(),
            regions = regions.height(),
            departments = departments.height(),
            "loaded input tables"
        );

        Ok(ReferendumTables {
            referendum,
            regions,
            departments,
        })
    }

    /// Load a CSV file and check that `required` columns are present.
    pub fn load_table(
        path: &Path,
        separator: u8,
        required: &[&str],
    ) -> Result<DataFrame, LoaderError> {
        let df = Self::load_csv(path, separator)?;

        let columns = Self::get_columns(&df);
        let missing = required
            .iter()
            .find(|c| !columns.iter().any(|h| h.as_str() == **c));
        if let Some(missing) = missing {
            return Err(LoaderError::MissingColumn {
                path: path.to_path_buf(),
                column: missing.to_string(),
            });
        }

        Ok(df)
    }

    /// Load a CSV file using Polars.
    ///
    /// Schema inference is disabled so every column stays a string:
    /// department codes such as "01" or "2A" must not be parsed as numbers.
    pub fn load_csv(path: &Path, separator: u8) -> Result<DataFrame, LoaderError> {
        LazyCsvReader::new(path)
            .with_separator(separator)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(|source| LoaderError::CsvError {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Get list of column names from a DataFrame.
    pub fn get_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}
