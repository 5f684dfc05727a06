//! Source Table Loader Module
//! Reads the four accident-dataset CSV files with Polars and validates
//! each file's required columns before anything downstream touches it.

use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

use crate::data::schema::{files, raw};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {file}: {source}")]
    Read {
        file: String,
        #[source]
        source: PolarsError,
    },
    #[error("Schema mismatch in {file}: missing column(s) {columns:?}")]
    SchemaMismatch { file: String, columns: Vec<String> },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// The four fixed source tables of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTable {
    Accident,
    Drugs,
    Distraction,
    Weather,
}

impl SourceTable {
    pub const ALL: [SourceTable; 4] = [
        SourceTable::Accident,
        SourceTable::Drugs,
        SourceTable::Distraction,
        SourceTable::Weather,
    ];

    /// File name expected inside the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            SourceTable::Accident => files::ACCIDENT,
            SourceTable::Drugs => files::DRUGS,
            SourceTable::Distraction => files::DISTRACT,
            SourceTable::Weather => files::WEATHER,
        }
    }

    /// Columns the file must provide. Extra columns are allowed and ignored.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            SourceTable::Accident => &[
                raw::ST_CASE,
                raw::STATENAME,
                raw::MONTHNAME,
                raw::DAY_WEEKNAME,
                raw::VE_TOTAL,
                raw::ROUTENAME,
            ],
            SourceTable::Drugs => &[raw::ST_CASE, raw::DRUGRESNAME],
            SourceTable::Distraction => &[raw::ST_CASE, raw::DRDISTRACTNAME],
            SourceTable::Weather => &[raw::ST_CASE, raw::WEATHERNAME],
        }
    }
}

/// Load one source table from the data directory and validate its schema.
pub fn load_source(data_dir: &Path, source: SourceTable) -> Result<DataFrame, LoadError> {
    let path = data_dir.join(source.file_name());
    let path_str = path.to_string_lossy().to_string();

    let df = LazyCsvReader::new(&path_str)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()
        .and_then(|lazy| lazy.collect())
        .map_err(|e| LoadError::Read {
            file: source.file_name().to_string(),
            source: e,
        })?;

    check_columns(&df, source)?;
    Ok(df)
}

/// Fail fast with every missing column named, not just the first.
fn check_columns(df: &DataFrame, source: SourceTable) -> Result<(), LoadError> {
    let missing: Vec<String> = source
        .required_columns()
        .iter()
        .filter(|c| df.column(c).is_err())
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::SchemaMismatch {
            file: source.file_name().to_string(),
            columns: missing,
        })
    }
}
