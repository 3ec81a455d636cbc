//! FILENAME: core/table/src/aggregate.rs
//! PURPOSE: Group-and-sum aggregation over a frame.
//! CONTEXT: Sum is the only aggregation the pipeline needs; the metrics
//! are additive counts/impressions, not rates. Callers use this for
//! trend/bar rollups after filtering or bracket decomposition.

use rustc_hash::FxHashMap;

use crate::error::SchemaError;
use crate::frame::Frame;
use crate::value::Value;

/// Sums each metric over the unique grouping-key combinations.
/// Output columns are `group_keys` followed by `metrics`, one row per
/// group, sorted ascending by group key. Non-numeric metric cells
/// contribute nothing.
pub fn sum_by(
    frame: &Frame,
    group_keys: &[&str],
    metrics: &[&str],
) -> Result<Frame, SchemaError> {
    let key_positions = frame.require_columns(group_keys)?;
    let metric_positions = frame.require_columns(metrics)?;

    let mut groups: FxHashMap<Vec<Value>, Vec<f64>> = FxHashMap::default();
    for row in frame.rows() {
        let key: Vec<Value> = key_positions.iter().map(|&p| row[p].clone()).collect();
        let acc = groups
            .entry(key)
            .or_insert_with(|| vec![0.0; metric_positions.len()]);
        for (slot, &p) in metric_positions.iter().enumerate() {
            acc[slot] += row[p].as_number().unwrap_or(0.0);
        }
    }

    let mut ordered: Vec<(Vec<Value>, Vec<f64>)> = groups.into_iter().collect();
    ordered.sort_by(|a, b| a.0.cmp(&b.0));

    let columns: Vec<String> = group_keys
        .iter()
        .chain(metrics.iter())
        .map(|s| s.to_string())
        .collect();
    let mut out = Frame::new(columns)?;
    for (key, sums) in ordered {
        let mut row = key;
        row.extend(sums.into_iter().map(Value::Number));
        out.push_row(row)?;
    }
    Ok(out)
}
