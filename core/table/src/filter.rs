//! FILENAME: core/table/src/filter.rs
//! PURPOSE: Declarative row filtering (the category filter).
//! CONTEXT: A `FilterConfig` maps dimension-column names to an allow-set
//! (one value or a list). Only the measurement dimensions participate in
//! filtering; list-valued entries for other keys (e.g. `income_bracket`)
//! carry display-ordering hints for downstream grouping and are ignored
//! here. Configs are plain serde data so they can live in JSON files.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::frame::Frame;
use crate::value::Value;

/// The dimension columns a config may filter on.
pub const DIMENSION_COLUMNS: [&str; 3] = ["daypart", "demographic", "characteristic"];

/// Candidate grouping keys, checked in this order by `group_column`.
const GROUPABLE_KEYS: [&str; 5] = [
    "daypart",
    "demographic",
    "characteristic",
    "income_bracket",
    "age_bracket",
];

// ============================================================================
// CONFIG TYPES
// ============================================================================

/// One allowed value, or a list of allowed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    One(String),
    Many(Vec<String>),
}

impl Selection {
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Selection::One(v) => v == value,
            Selection::Many(vs) => vs.iter().any(|v| v == value),
        }
    }

    /// The list form, if this selection is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Selection::One(_) => None,
            Selection::Many(vs) => Some(vs),
        }
    }
}

/// A declarative filter configuration (one JSON file per named filter).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Human-readable name used by callers for chart titles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Column name -> allowed value(s).
    #[serde(flatten)]
    pub selections: FxHashMap<String, Selection>,
}

impl FilterConfig {
    pub fn new() -> Self {
        FilterConfig::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_selection(mut self, column: impl Into<String>, selection: Selection) -> Self {
        self.selections.insert(column.into(), selection);
        self
    }

    pub fn selection(&self, column: &str) -> Option<&Selection> {
        self.selections.get(column)
    }
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// Keeps the rows whose value in each configured dimension column is a
/// member of that column's allow-set. Columns not mentioned in the config
/// are left unfiltered. A configured dimension column that is absent from
/// the frame is a schema error.
pub fn apply_filters(frame: &Frame, config: &FilterConfig) -> Result<Frame, SchemaError> {
    let mut active: Vec<(usize, &Selection)> = Vec::new();
    let mut missing: Vec<String> = Vec::new();

    for column in DIMENSION_COLUMNS {
        if let Some(selection) = config.selection(column) {
            match frame.column_index(column) {
                Some(pos) => active.push((pos, selection)),
                None => missing.push(column.to_string()),
            }
        }
    }
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns { columns: missing });
    }

    Ok(frame.filter_rows(|row| {
        active.iter().all(|(pos, selection)| match &row[*pos] {
            Value::Text(s) => selection.contains(s),
            _ => false,
        })
    }))
}

/// Name of the first groupable key configured with more than one value,
/// or None if the config selects a single slice everywhere.
pub fn group_column(config: &FilterConfig) -> Option<&'static str> {
    GROUPABLE_KEYS.iter().copied().find(|key| {
        matches!(
            config.selection(key).and_then(Selection::as_list),
            Some(list) if list.len() > 1
        )
    })
}

/// Stable-reorders rows by an explicit category order for `column`:
/// listed values first in list order, anything unlisted after them in
/// their original relative order. This is the caller-side hook for
/// forcing legend/axis order to match a config or a label map.
pub fn apply_category_order(
    frame: &Frame,
    column: &str,
    order: &[String],
) -> Result<Frame, SchemaError> {
    let pos = frame.require_columns(&[column])?[0];
    let rank = |value: &Value| -> usize {
        match value {
            Value::Text(s) => order
                .iter()
                .position(|o| o == s)
                .unwrap_or(order.len()),
            _ => order.len(),
        }
    };

    let mut indexed: Vec<(usize, usize)> = frame
        .rows()
        .enumerate()
        .map(|(i, row)| (rank(&row[pos]), i))
        .collect();
    indexed.sort_by_key(|&(r, i)| (r, i));

    let mut out = Frame::new(frame.columns().to_vec())?;
    for (_, i) in indexed {
        out.push_row(frame.row(i).to_vec())?;
    }
    Ok(out)
}
