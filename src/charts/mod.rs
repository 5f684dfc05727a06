//! Charts module - query result rendering

mod plotter;

pub use plotter::ChartPlotter;
