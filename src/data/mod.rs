//! Data module - source loading, normalization, filtering and merging

pub mod loader;
pub mod merge;
pub mod noise;
pub mod normalize;
pub mod region;
pub mod schema;

pub use loader::{LoadError, SourceTable};
pub use merge::{build_dataset, BuildStage};
pub use region::Region;
