//! FILENAME: core/bracket-engine/src/engine.rs
//! Bracket Engine - The calculation core.
//!
//! This module takes a filtered dataset plus the declarative bracket
//! artifacts and produces tabular output in two steps:
//! 1. Build: evaluate every bracket's signed combination per source row,
//!    then sum the derived columns by grouping key ("wide" form, one
//!    column per metric x bracket).
//! 2. Melt: reshape the wide table into one row per (group, bracket)
//!    with the internal bracket key replaced by its display label
//!    ("long" form).
//!
//! The engine is stateless; each call is independent and the inputs are
//! never mutated.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use table::{Frame, Value};

use crate::definition::{BracketExpressions, BracketLabels};
use crate::error::{BracketError, ConfigurationError, DataQualityWarning};

/// Grouping-key tuple; measurement data groups by at most a handful of
/// dimension columns.
type GroupKey = SmallVec<[Value; 4]>;

// ============================================================================
// WIDE BRACKET BUILDER
// ============================================================================

/// The wide-form result plus any advisory findings made while computing it.
#[derive(Debug, Clone)]
pub struct WideBrackets {
    pub frame: Frame,
    pub warnings: Vec<DataQualityWarning>,
}

/// Derived wide column name for a (metric, bracket key) pair. Unique
/// across one build because metric names and bracket keys are each
/// unique within the call.
pub fn wide_column_name(metric: &str, bracket_key: &str) -> String {
    format!("{metric}_{bracket_key}")
}

/// Evaluates every bracket expression against the dataset and sums the
/// derived values by grouping key.
///
/// Output columns are the grouping keys followed by one column per
/// (metric x bracket), metric-major, in expression-table order; one row
/// per unique grouping-key combination, sorted ascending. Input row
/// order never affects the output.
///
/// A configured source label that never occurs in `source_column`
/// contributes zero everywhere and is reported as a warning, not an
/// error, so brackets can be defined once per domain even when a
/// filtered slice lacks some categories. An empty `metrics` list yields
/// the grouping keys alone.
pub fn build_wide_brackets(
    frame: &Frame,
    group_keys: &[&str],
    source_column: &str,
    expressions: &BracketExpressions,
    metrics: &[&str],
) -> Result<WideBrackets, BracketError> {
    let key_positions = frame.require_columns(group_keys)?;
    let source_position = frame.require_columns(&[source_column])?[0];
    let metric_positions = frame.require_columns(metrics)?;

    // Source label -> signed contributions, one entry per expression term
    // that references it. A label may feed several brackets with
    // different signs.
    let mut contributions: FxHashMap<&str, Vec<(usize, f64)>> = FxHashMap::default();
    for (slot, (_, expression)) in expressions.iter().enumerate() {
        for term in expression.terms() {
            contributions
                .entry(term.label.as_str())
                .or_default()
                .push((slot, term.sign.coefficient()));
        }
    }

    let bracket_count = expressions.len();
    let width = metrics.len() * bracket_count;
    let mut groups: FxHashMap<GroupKey, Vec<f64>> = FxHashMap::default();
    let mut seen_labels: FxHashSet<&str> = FxHashSet::default();

    for row in frame.rows() {
        let key: GroupKey = key_positions.iter().map(|&p| row[p].clone()).collect();
        let acc = groups.entry(key).or_insert_with(|| vec![0.0; width]);

        let label = match &row[source_position] {
            Value::Text(s) => s.as_str(),
            _ => continue,
        };
        let Some(terms) = contributions.get(label) else {
            continue;
        };
        seen_labels.insert(label);

        for (metric_slot, &p) in metric_positions.iter().enumerate() {
            let value = row[p].as_number().unwrap_or(0.0);
            for &(bracket_slot, coefficient) in terms {
                acc[metric_slot * bracket_count + bracket_slot] += coefficient * value;
            }
        }
    }

    let mut warnings = Vec::new();
    for (_, expression) in expressions.iter() {
        for label in expression.labels() {
            if !seen_labels.contains(label) && contributions.contains_key(label) {
                // report each configured-but-absent label once
                contributions.remove(label);
                let warning = DataQualityWarning::UnmatchedLabel {
                    label: label.to_string(),
                };
                tracing::warn!(%warning, "bracket build data quality");
                warnings.push(warning);
            }
        }
    }

    // Deterministic output: sort groups ascending by key.
    let mut ordered: Vec<(GroupKey, Vec<f64>)> = groups.into_iter().collect();
    ordered.sort_by(|a, b| a.0.cmp(&b.0));

    let mut negative_groups: Vec<usize> = vec![0; width];
    for (_, acc) in &ordered {
        for (slot, &v) in acc.iter().enumerate() {
            if v < 0.0 {
                negative_groups[slot] += 1;
            }
        }
    }
    for (metric_slot, metric) in metrics.iter().enumerate() {
        for (bracket_slot, (key, _)) in expressions.iter().enumerate() {
            let count = negative_groups[metric_slot * bracket_count + bracket_slot];
            if count > 0 {
                let warning = DataQualityWarning::NegativeBracket {
                    bracket: key.to_string(),
                    metric: (*metric).to_string(),
                    groups: count,
                };
                tracing::warn!(%warning, "bracket build data quality");
                warnings.push(warning);
            }
        }
    }

    let mut columns: Vec<String> = group_keys.iter().map(|s| s.to_string()).collect();
    for metric in metrics {
        for (key, _) in expressions.iter() {
            columns.push(wide_column_name(metric, key));
        }
    }
    let mut wide = Frame::new(columns)?;
    for (key, acc) in ordered {
        let mut row: Vec<Value> = key.into_iter().collect();
        row.extend(acc.into_iter().map(Value::Number));
        wide.push_row(row)?;
    }

    Ok(WideBrackets {
        frame: wide,
        warnings,
    })
}

// ============================================================================
// BRACKET MELTER
// ============================================================================

/// What to do when a label-map key has no corresponding wide column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeltPolicy {
    /// Fail fast: every (metric x key) wide column must exist.
    Strict,
    /// Silently drop a key with no wide column for any metric; a
    /// partially covered key keeps its rows, with the uncovered metric
    /// left empty (not zero-filled) so the misconfiguration stays
    /// visible.
    DropMissing,
}

/// Reshapes a wide bracket table into long form: one row per
/// (group, bracket), the bracket column holding the display label.
///
/// Emission order is the label map's declared order, one block of rows
/// per key (the wide table's row count each), and that order is what
/// downstream category-ordering relies on. The bracket column holds a
/// plain text label; attaching an explicit category order is the
/// caller's concern.
pub fn melt_brackets(
    wide: &Frame,
    group_keys: &[&str],
    labels: &BracketLabels,
    bracket_column: &str,
    metrics: &[&str],
    policy: MeltPolicy,
) -> Result<Frame, BracketError> {
    let key_positions = wide.require_columns(group_keys)?;

    let mut columns: Vec<String> = group_keys.iter().map(|s| s.to_string()).collect();
    columns.push(bracket_column.to_string());
    columns.extend(metrics.iter().map(|s| s.to_string()));
    let mut long = Frame::new(columns)?;

    for (key, label) in labels.iter() {
        let mut metric_positions: Vec<Option<usize>> = Vec::with_capacity(metrics.len());
        for metric in metrics {
            let column = wide_column_name(metric, key);
            let position = wide.column_index(&column);
            if position.is_none() && policy == MeltPolicy::Strict {
                return Err(ConfigurationError::MissingBracketColumn { column }.into());
            }
            metric_positions.push(position);
        }
        if !metrics.is_empty() && metric_positions.iter().all(Option::is_none) {
            // DropMissing: nothing at all to pull for this key
            continue;
        }

        for row in wide.rows() {
            let mut out: Vec<Value> =
                key_positions.iter().map(|&p| row[p].clone()).collect();
            out.push(Value::text(label));
            for position in &metric_positions {
                out.push(match position {
                    Some(p) => row[*p].clone(),
                    None => Value::Empty,
                });
            }
            long.push_row(out)?;
        }
    }

    Ok(long)
}
