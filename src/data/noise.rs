//! Noise Filter Module
//! Removes uninformative categorical values from the auxiliary tables:
//! fixed sentinel labels, plus rare drug categories below a hard
//! frequency threshold. The weather table is never filtered.

use polars::prelude::*;
use std::collections::HashMap;

use crate::data::schema::cols;

/// Drug result labels that carry no information about involvement.
pub const DRUG_SENTINELS: [&str; 4] = [
    "Test Not Given",
    "Not Reported",
    "Reported as Unknown if Tested for Drugs",
    "Tested, No Drugs Found/Negative",
];

/// Distraction labels that carry no information.
pub const DISTRACTION_SENTINELS: [&str; 3] = [
    "Not Distracted",
    "Not Reported",
    "Unknown if Distracted",
];

/// A drug category must reach this many rows, dataset-wide, in the
/// filtered pre-join drug table to survive. Hard constant; the counts are
/// always recomputed from scratch.
pub const DRUG_FREQUENCY_THRESHOLD: usize = 500;

/// Filter the normalized drug table: drop sentinel rows, then drop every
/// drug category whose total row count falls below the threshold.
pub fn filter_drugs(df: &DataFrame) -> PolarsResult<DataFrame> {
    let without_sentinels = drop_sentinel_rows(df, cols::DRUG, &DRUG_SENTINELS)?;

    let drugs = without_sentinels.column(cols::DRUG)?.str()?.clone();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in drugs.iter().flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mask: BooleanChunked = drugs
        .iter()
        .map(|v| match v {
            Some(name) => counts.get(name).copied().unwrap_or(0) >= DRUG_FREQUENCY_THRESHOLD,
            None => true,
        })
        .collect();

    without_sentinels.filter(&mask)
}

/// Filter the normalized distraction table: drop sentinel rows only.
pub fn filter_distractions(df: &DataFrame) -> PolarsResult<DataFrame> {
    drop_sentinel_rows(df, cols::DISTRACTION, &DISTRACTION_SENTINELS)
}

/// Keep rows whose value in `column` is not one of the sentinels.
/// Null values survive; the left join reintroduces nulls anyway.
fn drop_sentinel_rows(
    df: &DataFrame,
    column: &str,
    sentinels: &[&str],
) -> PolarsResult<DataFrame> {
    let values = df.column(column)?.str()?;
    let mask: BooleanChunked = values
        .iter()
        .map(|v| match v {
            Some(name) => !sentinels.contains(&name),
            None => true,
        })
        .collect();
    df.filter(&mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drug_table(rows: &[(i64, &str)]) -> DataFrame {
        let ids: Vec<i64> = rows.iter().map(|(id, _)| *id).collect();
        let drugs: Vec<&str> = rows.iter().map(|(_, d)| *d).collect();
        df!(cols::CASE_ID => ids, cols::DRUG => drugs).unwrap()
    }

    fn repeated(name: &str, n: usize) -> Vec<(i64, &str)> {
        (0..n as i64).map(|i| (i, name)).collect()
    }

    #[test]
    fn sentinel_rows_are_dropped() {
        let mut rows = repeated("Cocaine", 600);
        rows.push((9000, "Test Not Given"));
        rows.push((9001, "Not Reported"));
        rows.push((9002, "Reported as Unknown if Tested for Drugs"));
        rows.push((9003, "Tested, No Drugs Found/Negative"));

        let out = filter_drugs(&drug_table(&rows)).unwrap();
        assert_eq!(out.height(), 600);
    }

    #[test]
    fn threshold_boundary_499_removed_500_retained() {
        let mut rows = repeated("Cocaine", 500);
        rows.extend(repeated("Barbiturate", 499));

        let out = filter_drugs(&drug_table(&rows)).unwrap();
        assert_eq!(out.height(), 500);

        let survivors = out.column(cols::DRUG).unwrap().str().unwrap().clone();
        assert!(survivors.iter().all(|v| v == Some("Cocaine")));
    }

    #[test]
    fn drug_filter_is_idempotent() {
        let mut rows = repeated("Cocaine", 501);
        rows.extend(repeated("Ketamine", 3));
        rows.push((7777, "Not Reported"));

        let once = filter_drugs(&drug_table(&rows)).unwrap();
        let twice = filter_drugs(&once).unwrap();
        assert_eq!(once.height(), twice.height());
        assert!(once.equals(&twice));
    }

    #[test]
    fn distraction_sentinels_dropped_and_idempotent() {
        let df = df!(
            cols::CASE_ID => [1i64, 2, 3, 4, 5],
            cols::DISTRACTION => [
                "By Mobile Phone",
                "Not Distracted",
                "Not Reported",
                "Unknown if Distracted",
                "By Other Occupant(s)",
            ],
        )
        .unwrap();

        let once = filter_distractions(&df).unwrap();
        assert_eq!(once.height(), 2);
        let twice = filter_distractions(&once).unwrap();
        assert!(once.equals(&twice));
    }
}
