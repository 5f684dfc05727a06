//! Field Normalizer Module
//! Per-source column selection and renaming to the canonical schema,
//! plus derivation of the Region column on the accident table.

use polars::prelude::*;

use crate::data::region::Region;
use crate::data::schema::{cols, raw};

/// Normalize the accident table: select/rename the fixed column subset,
/// then derive `Region` from the state name.
///
/// `Number_of_Vehicles` stays numeric here; it is retyped to categorical
/// only after the merge so that join-time semantics are unaffected.
pub fn normalize_accidents(df: &DataFrame) -> PolarsResult<DataFrame> {
    let selected = df
        .clone()
        .lazy()
        .select([
            col(raw::ST_CASE).cast(DataType::Int64).alias(cols::CASE_ID),
            col(raw::STATENAME).alias(cols::STATE),
            col(raw::MONTHNAME).alias(cols::MONTH),
            col(raw::DAY_WEEKNAME).alias(cols::DAY),
            col(raw::VE_TOTAL).cast(DataType::Int64).alias(cols::VEHICLES),
            col(raw::ROUTENAME).alias(cols::ROUTE),
        ])
        .collect()?;

    with_region(selected)
}

/// Normalize the drug table to [case_id, Drug].
pub fn normalize_drugs(df: &DataFrame) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .select([
            col(raw::ST_CASE).cast(DataType::Int64).alias(cols::CASE_ID),
            col(raw::DRUGRESNAME).alias(cols::DRUG),
        ])
        .collect()
}

/// Normalize the distraction table to [case_id, Distraction].
pub fn normalize_distractions(df: &DataFrame) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .select([
            col(raw::ST_CASE).cast(DataType::Int64).alias(cols::CASE_ID),
            col(raw::DRDISTRACTNAME).alias(cols::DISTRACTION),
        ])
        .collect()
}

/// Normalize the weather table to [case_id, Weather].
pub fn normalize_weather(df: &DataFrame) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .select([
            col(raw::ST_CASE).cast(DataType::Int64).alias(cols::CASE_ID),
            col(raw::WEATHERNAME).alias(cols::WEATHER),
        ])
        .collect()
}

/// Append the derived Region column. Null state names classify as Unknown.
fn with_region(mut df: DataFrame) -> PolarsResult<DataFrame> {
    let states = df.column(cols::STATE)?.str()?.clone();
    let regions: Vec<&str> = states
        .iter()
        .map(|s| Region::from_state(s.unwrap_or("")).label())
        .collect();

    df.with_column(Column::new(cols::REGION.into(), regions))?;
    Ok(df)
}
