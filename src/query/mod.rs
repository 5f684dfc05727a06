//! Query module - typed variables and the aggregation engine

pub mod engine;
pub mod variables;

pub use engine::{
    AggregationEngine, CrossTab, Distribution, PairCount, QueryError, SummaryRow, ValueCount,
};
pub use variables::{Role, VarKind, Variable};
