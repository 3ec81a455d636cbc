//! FILENAME: core/bracket-engine/src/lib.rs
//! Bracket decomposition subsystem.
//!
//! This crate turns overlapping, cumulative survey categories (e.g.
//! "$25K+", "$50K+") into disjoint, summable brackets (e.g. "$25K-$50K")
//! via signed linear combination, and reshapes the result for display.
//! It depends on `table` only for the shared tabular types.
//!
//! Layers:
//! - `definition`: Serializable configuration (what a decomposition IS)
//! - `engine`: Builder and melter (HOW we calculate and reshape)
//! - `domains`: Fixed income/age instantiations (WHAT we ship)
//! - `batch`: Many filter/metric combinations, one inspectable report

pub mod batch;
pub mod definition;
pub mod domains;
pub mod engine;
pub mod error;

pub use batch::{run_batch, BatchItem, BatchJob, BatchOutcome, BatchReport, BatchTask};
pub use definition::{
    validate_key_correspondence, BracketExpression, BracketExpressions, BracketLabels,
    Sign, SignedLabel,
};
pub use domains::{BracketDomain, Decomposition};
pub use engine::{
    build_wide_brackets, melt_brackets, wide_column_name, MeltPolicy, WideBrackets,
};
pub use error::{BracketError, ConfigurationError, DataQualityWarning};
