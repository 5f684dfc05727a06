//! Merge Engine Module
//! Left-joins the normalized accident table with the filtered auxiliary
//! tables on the case key, producing the one immutable merged table the
//! query layer runs against.

use polars::prelude::*;
use std::path::Path;

use crate::data::loader::{load_source, LoadError, SourceTable};
use crate::data::schema::cols;
use crate::data::{noise, normalize};

/// Compose left(left(left(accident, drug), distraction), weather) on the
/// case key. A case with several drug and distraction mentions fans out
/// into one row per combination; that multiplication is intentional and
/// nothing is deduplicated. Cases without auxiliary matches survive with
/// nulls.
///
/// After the joins, `Number_of_Vehicles` is retyped to categorical
/// (string); queries that need numbers coerce it back.
pub fn merge_tables(
    accidents: &DataFrame,
    drugs: &DataFrame,
    distractions: &DataFrame,
    weather: &DataFrame,
) -> PolarsResult<DataFrame> {
    let merged = accidents
        .clone()
        .lazy()
        .join(
            drugs.clone().lazy(),
            [col(cols::CASE_ID)],
            [col(cols::CASE_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            distractions.clone().lazy(),
            [col(cols::CASE_ID)],
            [col(cols::CASE_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            weather.clone().lazy(),
            [col(cols::CASE_ID)],
            [col(cols::CASE_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .with_column(col(cols::VEHICLES).cast(DataType::String))
        .collect()?;

    Ok(merged)
}

/// Stage names reported while the dataset is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Loading(SourceTable),
    Normalizing,
    Filtering,
    Merging,
}

impl BuildStage {
    pub fn describe(&self) -> String {
        match self {
            BuildStage::Loading(source) => format!("Reading {}...", source.file_name()),
            BuildStage::Normalizing => "Normalizing columns...".to_string(),
            BuildStage::Filtering => "Filtering noise values...".to_string(),
            BuildStage::Merging => "Merging tables...".to_string(),
        }
    }
}

/// Run the whole startup pipeline: load, normalize, filter, merge.
/// `progress` is invoked once per stage so a host UI can surface status.
pub fn build_dataset(
    data_dir: &Path,
    mut progress: impl FnMut(BuildStage),
) -> Result<DataFrame, LoadError> {
    progress(BuildStage::Loading(SourceTable::Accident));
    let accidents_raw = load_source(data_dir, SourceTable::Accident)?;
    progress(BuildStage::Loading(SourceTable::Drugs));
    let drugs_raw = load_source(data_dir, SourceTable::Drugs)?;
    progress(BuildStage::Loading(SourceTable::Distraction));
    let distractions_raw = load_source(data_dir, SourceTable::Distraction)?;
    progress(BuildStage::Loading(SourceTable::Weather));
    let weather_raw = load_source(data_dir, SourceTable::Weather)?;

    progress(BuildStage::Normalizing);
    let accidents = normalize::normalize_accidents(&accidents_raw)?;
    let drugs = normalize::normalize_drugs(&drugs_raw)?;
    let distractions = normalize::normalize_distractions(&distractions_raw)?;
    let weather = normalize::normalize_weather(&weather_raw)?;

    progress(BuildStage::Filtering);
    let drugs = noise::filter_drugs(&drugs)?;
    let distractions = noise::filter_distractions(&distractions)?;

    progress(BuildStage::Merging);
    let merged = merge_tables(&accidents, &drugs, &distractions, &weather)?;
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn accidents() -> DataFrame {
        df!(
            cols::CASE_ID => [1i64, 2, 3],
            cols::STATE => ["Texas", "Ohio", "Maine"],
            cols::MONTH => ["January", "January", "February"],
            cols::DAY => ["Sunday", "Monday", "Friday"],
            cols::VEHICLES => [2i64, 1, 3],
            cols::ROUTE => ["Interstate", "Local Street", "US Highway"],
            cols::REGION => ["South", "Midwest", "Northeast"],
        )
        .unwrap()
    }

    fn merged_fixture() -> DataFrame {
        // Case 1: two drugs x two distractions, case 2: nothing, case 3: weather only.
        let drugs = df!(
            cols::CASE_ID => [1i64, 1],
            cols::DRUG => ["Cocaine", "Cannabis"],
        )
        .unwrap();
        let distractions = df!(
            cols::CASE_ID => [1i64, 1],
            cols::DISTRACTION => ["By Mobile Phone", "By Other Occupant(s)"],
        )
        .unwrap();
        let weather = df!(
            cols::CASE_ID => [1i64, 3],
            cols::WEATHER => ["Rain", "Clear"],
        )
        .unwrap();

        merge_tables(&accidents(), &drugs, &distractions, &weather).unwrap()
    }

    #[test]
    fn every_case_survives_the_left_joins() {
        let merged = merged_fixture();

        let ids: HashSet<i64> = merged
            .column(cols::CASE_ID)
            .unwrap()
            .i64()
            .unwrap()
            .iter()
            .flatten()
            .collect();
        assert_eq!(ids, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn fan_out_multiplies_rows_per_combination() {
        let merged = merged_fixture();
        // Case 1: 2 drugs x 2 distractions x 1 weather = 4 rows; cases 2 and 3: 1 each.
        assert_eq!(merged.height(), 6);
    }

    #[test]
    fn unmatched_cases_carry_nulls() {
        let merged = merged_fixture();
        let case_ids = merged.column(cols::CASE_ID).unwrap().i64().unwrap().clone();
        let drug_col = merged.column(cols::DRUG).unwrap().str().unwrap().clone();
        let weather_col = merged.column(cols::WEATHER).unwrap().str().unwrap().clone();

        for i in 0..merged.height() {
            if case_ids.get(i) == Some(2) {
                assert_eq!(drug_col.get(i), None);
                assert_eq!(weather_col.get(i), None);
            }
        }
    }

    #[test]
    fn vehicles_become_categorical_after_merge() {
        let merged = merged_fixture();
        assert_eq!(
            merged.column(cols::VEHICLES).unwrap().dtype(),
            &DataType::String
        );

        let vehicles = merged.column(cols::VEHICLES).unwrap().str().unwrap().clone();
        assert!(vehicles.iter().flatten().all(|v| v.parse::<f64>().is_ok()));
    }
}
