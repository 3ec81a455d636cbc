//! FILENAME: core/table/src/lib.rs
//! PURPOSE: Main library entry point for the tabular data model.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod frame;
pub mod value;

// Re-export commonly used types at the crate root
pub use aggregate::sum_by;
pub use error::SchemaError;
pub use filter::{
    apply_category_order, apply_filters, group_column, FilterConfig, Selection,
    DIMENSION_COLUMNS,
};
pub use frame::Frame;
pub use value::{Month, Value};
