//! FILENAME: core/bracket-engine/src/error.rs

use table::SchemaError;
use thiserror::Error;

/// Problems with the declarative bracket artifacts or a request that
/// contradicts them. Fatal to the call that raised them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error(
        "expression/label key mismatch: keys without labels [{}], labels without expressions [{}]",
        .missing_labels.join(", "),
        .missing_expressions.join(", ")
    )]
    KeyMismatch {
        /// Expression keys with no display label.
        missing_labels: Vec<String>,
        /// Label keys with no expression.
        missing_expressions: Vec<String>,
    },

    #[error("bracket expression '{bracket}' has no terms")]
    EmptyExpression { bracket: String },

    #[error("wide column '{column}' not found during melt")]
    MissingBracketColumn { column: String },

    #[error("metric '{metric}' is not additive; allowed: {}", .allowed.join(", "))]
    NonAdditiveMetric {
        metric: String,
        allowed: Vec<String>,
    },
}

/// Any fatal error the builder, melter, or façades can raise.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BracketError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Advisory findings about the data itself. These never halt the
/// pipeline; the computation proceeds with the value as computed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataQualityWarning {
    #[error("configured source label '{label}' never appears in the dataset")]
    UnmatchedLabel { label: String },

    #[error("bracket '{bracket}' is negative for metric '{metric}' in {groups} group(s)")]
    NegativeBracket {
        bracket: String,
        metric: String,
        groups: usize,
    },
}
