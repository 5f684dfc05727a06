//! Aggregation Engine Module
//! Read-only queries over the immutable merged table: distribution
//! counts/histograms, cross-tabulations and group-by summaries.

use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

use crate::data::schema::cols;
use crate::query::variables::{VarKind, Variable};

/// Label presented for null values left behind by unmatched left joins.
pub const NULL_LABEL: &str = "(none)";

/// Bin count for numeric histograms.
const HISTOGRAM_BINS: usize = 20;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// One categorical value and its row count.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// One equal-width histogram bin, `lower` inclusive, `upper` exclusive
/// except for the last bin.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Result of a distribution query; the shape follows the variable's
/// declared kind, never a value heuristic.
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    Categorical(Vec<ValueCount>),
    Histogram(Vec<HistogramBin>),
}

/// Observed (primary, secondary) pair with its co-occurrence count.
#[derive(Debug, Clone, PartialEq)]
pub struct PairCount {
    pub primary: String,
    pub secondary: String,
    pub count: usize,
}

/// One unaggregated row of a numeric cross-tab, sized by vehicle count.
#[derive(Debug, Clone, PartialEq)]
pub struct BubblePoint {
    pub primary: String,
    pub secondary: String,
    pub size: f64,
}

/// Result of a cross-tabulation query.
#[derive(Debug, Clone, PartialEq)]
pub enum CrossTab {
    /// Both variables categorical: sparse pair counts, first-seen order.
    Counts(Vec<PairCount>),
    /// Either variable numeric: one point per filtered row.
    Sized(Vec<BubblePoint>),
}

/// One group of a summary query.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub group: String,
    pub count: usize,
    /// Mean vehicle count over the group, nulls excluded; None when the
    /// group has no coercible vehicle values.
    pub mean_vehicles: Option<f64>,
    /// Group count / filtered total.
    pub proportion: f64,
}

/// Answers UI queries against the merged table. The table is injected at
/// construction and never mutated; the engine is freely shareable across
/// threads.
pub struct AggregationEngine {
    df: DataFrame,
}

impl AggregationEngine {
    pub fn new(merged: DataFrame) -> Self {
        Self { df: merged }
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    /// Values offered for filtering a variable: the fixed level list where
    /// one exists, otherwise the distinct observed values. Columns holding
    /// nulls from unmatched joins also offer the null bucket, so every
    /// value a chart can show is selectable.
    pub fn filter_options(&self, var: Variable) -> Vec<String> {
        if let Some(levels) = var.level_order() {
            return levels.iter().map(|l| l.to_string()).collect();
        }

        let Ok(column) = self.df.column(var.column()) else {
            return Vec::new();
        };

        let mut options: Vec<String> = column
            .str()
            .ok()
            .map(|ca| {
                ca.iter()
                    .flatten()
                    .map(|v| v.to_string())
                    .collect::<std::collections::BTreeSet<String>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default();

        if column.null_count() > 0 {
            options.push(NULL_LABEL.to_string());
        }
        options
    }

    /// Distribution of `var` over the filtered rows: a frequency count for
    /// categorical variables, an equal-width histogram for numeric ones.
    pub fn distribution(
        &self,
        var: Variable,
        filters: &[String],
    ) -> Result<Distribution, QueryError> {
        let df = self.filtered(var, filters)?;

        match var.kind() {
            VarKind::Categorical => {
                let values = string_values(&df, var.column())?;
                Ok(Distribution::Categorical(ordered_counts(var, &values)))
            }
            VarKind::Numeric => {
                let values: Vec<f64> = numeric_values(&df, var.column())?;
                Ok(Distribution::Histogram(histogram(&values)))
            }
        }
    }

    /// Cross-tabulation of two variables over rows filtered on `primary`.
    pub fn cross_tab(
        &self,
        primary: Variable,
        secondary: Variable,
        filters: &[String],
    ) -> Result<CrossTab, QueryError> {
        let df = self.filtered(primary, filters)?;

        if primary.kind() == VarKind::Categorical && secondary.kind() == VarKind::Categorical {
            let left = string_values(&df, primary.column())?;
            let right = string_values(&df, secondary.column())?;

            let mut order: Vec<(String, String)> = Vec::new();
            let mut counts: HashMap<(String, String), usize> = HashMap::new();
            for (p, s) in left.into_iter().zip(right.into_iter()) {
                let key = (p, s);
                if !counts.contains_key(&key) {
                    order.push(key.clone());
                }
                *counts.entry(key).or_insert(0) += 1;
            }

            let pairs = order
                .into_iter()
                .map(|key| {
                    let count = counts[&key];
                    PairCount {
                        primary: key.0,
                        secondary: key.1,
                        count,
                    }
                })
                .collect();
            Ok(CrossTab::Counts(pairs))
        } else {
            let left = string_values(&df, primary.column())?;
            let right = string_values(&df, secondary.column())?;
            let sizes = numeric_column(&df, cols::VEHICLES)?;

            let points = left
                .into_iter()
                .zip(right.into_iter())
                .enumerate()
                .map(|(i, (p, s))| BubblePoint {
                    primary: p,
                    secondary: s,
                    size: sizes.get(i).unwrap_or(1.0),
                })
                .collect();
            Ok(CrossTab::Sized(points))
        }
    }

    /// Group-by summary: filter rows on `filter_var` (the dashboard's
    /// primary variable), then group by `group_var` and compute per-group
    /// count, mean vehicle count and proportion of the filtered total.
    /// Rows come back count-descending; ties keep first-seen order.
    pub fn summary(
        &self,
        group_var: Variable,
        filter_var: Variable,
        filters: &[String],
    ) -> Result<Vec<SummaryRow>, QueryError> {
        let df = self.filtered(filter_var, filters)?;
        let total = df.height();
        if total == 0 {
            return Ok(Vec::new());
        }

        let groups = string_values(&df, group_var.column())?;
        let vehicles = numeric_column(&df, cols::VEHICLES)?;

        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut sums: HashMap<String, (f64, usize)> = HashMap::new();

        for (i, group) in groups.into_iter().enumerate() {
            if !counts.contains_key(&group) {
                order.push(group.clone());
            }
            *counts.entry(group.clone()).or_insert(0) += 1;
            if let Some(v) = vehicles.get(i) {
                let entry = sums.entry(group).or_insert((0.0, 0));
                entry.0 += v;
                entry.1 += 1;
            }
        }

        let mut rows: Vec<SummaryRow> = order
            .into_iter()
            .map(|group| {
                let count = counts[&group];
                let mean_vehicles = sums
                    .get(&group)
                    .filter(|(_, n)| *n > 0)
                    .map(|(sum, n)| sum / *n as f64);
                SummaryRow {
                    group,
                    count,
                    mean_vehicles,
                    proportion: count as f64 / total as f64,
                }
            })
            .collect();

        rows.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(rows)
    }

    /// Keep rows whose value of `var` is in `values`; an empty filter set
    /// is a no-op. Selecting the null bucket keeps null rows.
    fn filtered(&self, var: Variable, values: &[String]) -> PolarsResult<DataFrame> {
        if values.is_empty() {
            return Ok(self.df.clone());
        }

        let wants_null = values.iter().any(|f| f == NULL_LABEL);
        let column = self.df.column(var.column())?.str()?;
        let mask: BooleanChunked = column
            .iter()
            .map(|v| match v {
                Some(s) => values.iter().any(|f| f == s),
                None => wants_null,
            })
            .collect();
        self.df.filter(&mask)
    }
}

/// Column values as strings, nulls presented as [`NULL_LABEL`].
fn string_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<String>> {
    let ca = df.column(column)?.str()?;
    Ok(ca
        .iter()
        .map(|v| v.map_or_else(|| NULL_LABEL.to_string(), |s| s.to_string()))
        .collect())
}

/// Column coerced to f64 with nulls preserved.
fn numeric_column(df: &DataFrame, column: &str) -> PolarsResult<Float64Chunked> {
    let casted = df.column(column)?.cast(&DataType::Float64)?;
    Ok(casted.f64()?.clone())
}

/// Column coerced to f64 with nulls dropped.
fn numeric_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<f64>> {
    Ok(numeric_column(df, column)?.iter().flatten().collect())
}

/// Count categorical values in first-seen order, then apply the
/// variable's fixed level order when it has one, otherwise sort by label.
fn ordered_counts(var: Variable, values: &[String]) -> Vec<ValueCount> {
    let mut order: Vec<&String> = Vec::new();
    let mut counts: HashMap<&String, usize> = HashMap::new();
    for value in values {
        if !counts.contains_key(value) {
            order.push(value);
        }
        *counts.entry(value).or_insert(0) += 1;
    }

    if let Some(levels) = var.level_order() {
        let mut out: Vec<ValueCount> = Vec::new();
        for level in levels {
            if let Some(&count) = counts.get(&level.to_string()) {
                out.push(ValueCount {
                    value: level.to_string(),
                    count,
                });
            }
        }
        // Values outside the level list (e.g. the null bucket) trail behind.
        for value in order {
            if !levels.contains(&value.as_str()) {
                out.push(ValueCount {
                    value: value.clone(),
                    count: counts[value],
                });
            }
        }
        out
    } else {
        order.sort();
        order
            .into_iter()
            .map(|value| ValueCount {
                value: value.clone(),
                count: counts[value],
            })
            .collect()
    }
}

/// Equal-width histogram over [min, max]; the last bin is right-inclusive.
fn histogram(values: &[f64]) -> Vec<HistogramBin> {
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / HISTOGRAM_BINS as f64;
    let mut bins: Vec<HistogramBin> = (0..HISTOGRAM_BINS)
        .map(|i| HistogramBin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - min) / width) as usize).min(HISTOGRAM_BINS - 1);
        bins[idx].count += 1;
    }
    bins
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> AggregationEngine {
        let merged = df!(
            cols::CASE_ID => [1i64, 1, 2, 3],
            cols::STATE => ["Texas", "Texas", "Ohio", "Maine"],
            cols::MONTH => ["January", "January", "January", "February"],
            cols::DAY => ["Sunday", "Sunday", "Monday", "Friday"],
            cols::VEHICLES => ["2", "2", "1", "3"],
            cols::ROUTE => ["Interstate", "Interstate", "Local Street", "US Highway"],
            cols::REGION => ["South", "South", "Midwest", "Northeast"],
            cols::DRUG => [Some("Cocaine"), Some("Cannabis"), None, None],
            cols::DISTRACTION => [Some("By Mobile Phone"), Some("By Mobile Phone"), None, None],
            cols::WEATHER => [Some("Rain"), Some("Rain"), Some("Clear"), None],
        )
        .unwrap();
        AggregationEngine::new(merged)
    }

    #[test]
    fn categorical_distribution_respects_month_order() {
        // Lexical order would put February first.
        let dist = engine().distribution(Variable::Month, &[]).unwrap();
        match dist {
            Distribution::Categorical(counts) => {
                assert_eq!(
                    counts,
                    vec![
                        ValueCount { value: "January".into(), count: 3 },
                        ValueCount { value: "February".into(), count: 1 },
                    ]
                );
            }
            other => panic!("expected categorical counts, got {other:?}"),
        }
    }

    #[test]
    fn empty_filter_set_is_a_no_op() {
        let eng = engine();
        let unfiltered = eng.distribution(Variable::State, &[]).unwrap();
        let all_selected: Vec<String> = eng.filter_options(Variable::State);
        let filtered = eng.distribution(Variable::State, &all_selected).unwrap();
        assert_eq!(unfiltered, filtered);
    }

    #[test]
    fn numeric_distribution_is_a_histogram() {
        let dist = engine()
            .distribution(Variable::NumberOfVehicles, &[])
            .unwrap();
        match dist {
            Distribution::Histogram(bins) => {
                let total: usize = bins.iter().map(|b| b.count).sum();
                assert_eq!(total, 4);
            }
            other => panic!("expected histogram, got {other:?}"),
        }
    }

    #[test]
    fn cross_tab_counts_observed_pairs_only() {
        let merged = df!(
            cols::CASE_ID => [1i64, 1, 2],
            cols::STATE => ["Texas", "Texas", "Texas"],
            cols::MONTH => ["January", "January", "January"],
            cols::DAY => ["Sunday", "Sunday", "Sunday"],
            cols::VEHICLES => ["2", "2", "1"],
            cols::ROUTE => ["Interstate", "Interstate", "Interstate"],
            cols::REGION => ["South", "South", "South"],
            cols::DRUG => [None::<&str>, None, None],
            cols::DISTRACTION => [None::<&str>, None, None],
            cols::WEATHER => [Some("Rain"), Some("Rain"), Some("Clear")],
        )
        .unwrap();
        let eng = AggregationEngine::new(merged);

        let tab = eng
            .cross_tab(Variable::Month, Variable::Weather, &[])
            .unwrap();
        match tab {
            CrossTab::Counts(pairs) => {
                assert_eq!(
                    pairs,
                    vec![
                        PairCount {
                            primary: "January".into(),
                            secondary: "Rain".into(),
                            count: 2
                        },
                        PairCount {
                            primary: "January".into(),
                            secondary: "Clear".into(),
                            count: 1
                        },
                    ]
                );
            }
            other => panic!("expected pair counts, got {other:?}"),
        }
    }

    #[test]
    fn numeric_cross_tab_is_unaggregated_and_sized() {
        let tab = engine()
            .cross_tab(Variable::Month, Variable::NumberOfVehicles, &[])
            .unwrap();
        match tab {
            CrossTab::Sized(points) => {
                assert_eq!(points.len(), 4);
                assert_eq!(points[0].size, 2.0);
                assert_eq!(points[2].size, 1.0);
            }
            other => panic!("expected sized points, got {other:?}"),
        }
    }

    #[test]
    fn summary_counts_means_and_proportions() {
        // The three-row scenario: Month = January, January, February.
        let merged = df!(
            cols::CASE_ID => [1i64, 2, 3],
            cols::STATE => ["Texas", "Ohio", "Maine"],
            cols::MONTH => ["January", "January", "February"],
            cols::DAY => ["Sunday", "Monday", "Friday"],
            cols::VEHICLES => ["2", "4", "1"],
            cols::ROUTE => ["Interstate", "Local Street", "US Highway"],
            cols::REGION => ["South", "Midwest", "Northeast"],
            cols::DRUG => [None::<&str>, None, None],
            cols::DISTRACTION => [None::<&str>, None, None],
            cols::WEATHER => [None::<&str>, None, None],
        )
        .unwrap();
        let eng = AggregationEngine::new(merged);

        let rows = eng.summary(Variable::Month, Variable::Month, &[]).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].group, "January");
        assert_eq!(rows[0].count, 2);
        assert!((rows[0].proportion - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(rows[0].mean_vehicles, Some(3.0));

        assert_eq!(rows[1].group, "February");
        assert_eq!(rows[1].count, 1);
        assert!((rows[1].proportion - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(rows[1].mean_vehicles, Some(1.0));
    }

    #[test]
    fn summary_proportions_sum_to_one() {
        let rows = engine()
            .summary(Variable::State, Variable::State, &[])
            .unwrap();
        let total: f64 = rows.iter().map(|r| r.proportion).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_match_filter_yields_empty_summary() {
        let rows = engine()
            .summary(Variable::State, Variable::State, &["Atlantis".to_string()])
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn filters_restrict_rows() {
        let rows = engine()
            .summary(Variable::Month, Variable::Month, &["January".to_string()])
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].count, 3);
        assert!((rows[0].proportion - 1.0).abs() < 1e-12);
    }

    #[test]
    fn summary_groups_one_variable_while_filtering_another() {
        // Filter on Month, group by State: Maine's February row drops out
        // and proportions are taken over the three January rows.
        let rows = engine()
            .summary(Variable::State, Variable::Month, &["January".to_string()])
            .unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].group, "Texas");
        assert_eq!(rows[0].count, 2);
        assert!((rows[0].proportion - 2.0 / 3.0).abs() < 1e-12);

        assert_eq!(rows[1].group, "Ohio");
        assert_eq!(rows[1].count, 1);
        assert!((rows[1].proportion - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn filter_options_offer_the_null_bucket() {
        let options = engine().filter_options(Variable::Weather);
        assert_eq!(options, vec!["Clear", "Rain", NULL_LABEL]);
    }

    #[test]
    fn selecting_the_null_bucket_keeps_null_rows() {
        let dist = engine()
            .distribution(Variable::Weather, &[NULL_LABEL.to_string()])
            .unwrap();
        match dist {
            Distribution::Categorical(counts) => {
                assert_eq!(
                    counts,
                    vec![ValueCount { value: NULL_LABEL.into(), count: 1 }]
                );
            }
            other => panic!("expected categorical counts, got {other:?}"),
        }
    }

    #[test]
    fn null_drug_rows_land_in_the_null_bucket() {
        let dist = engine().distribution(Variable::Drug, &[]).unwrap();
        match dist {
            Distribution::Categorical(counts) => {
                assert_eq!(
                    counts,
                    vec![
                        ValueCount { value: NULL_LABEL.into(), count: 2 },
                        ValueCount { value: "Cannabis".into(), count: 1 },
                        ValueCount { value: "Cocaine".into(), count: 1 },
                    ]
                );
            }
            other => panic!("expected categorical counts, got {other:?}"),
        }
    }

    #[test]
    fn cross_tab_buckets_null_secondary_values() {
        let tab = engine()
            .cross_tab(Variable::Month, Variable::Drug, &[])
            .unwrap();
        match tab {
            CrossTab::Counts(pairs) => {
                assert!(pairs.contains(&PairCount {
                    primary: "February".into(),
                    secondary: NULL_LABEL.into(),
                    count: 1,
                }));
            }
            other => panic!("expected pair counts, got {other:?}"),
        }
    }

    #[test]
    fn summary_with_null_groups_still_sums_to_one() {
        let rows = engine()
            .summary(Variable::Weather, Variable::Weather, &[])
            .unwrap();
        assert!(rows.iter().any(|r| r.group == NULL_LABEL));
        let total: f64 = rows.iter().map(|r| r.proportion).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn filter_options_use_fixed_levels_for_month_and_day() {
        let eng = engine();
        assert_eq!(eng.filter_options(Variable::Month).len(), 12);
        assert_eq!(eng.filter_options(Variable::Day)[0], "Sunday");

        let states = eng.filter_options(Variable::State);
        assert_eq!(states, vec!["Maine", "Ohio", "Texas"]);
    }
}
