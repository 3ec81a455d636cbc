//! FILENAME: core/bracket-engine/src/batch.rs
//! Batch Runner - Many filter/metric combinations, one report.
//!
//! Callers that sweep every filter and metric combination need "skip on
//! failure, continue the batch" semantics. Rather than catching
//! unstructured errors, each item produces an explicit outcome (completed,
//! skipped, or failed with a typed error) collected into a report, so
//! batch behavior is inspectable and testable. A known-invalid
//! combination (non-additive metric against a bracket domain) is skipped
//! up front without being counted as a failure.

use table::{apply_filters, sum_by, FilterConfig, Frame};

use crate::domains::BracketDomain;
use crate::error::{BracketError, DataQualityWarning};

// ============================================================================
// JOBS
// ============================================================================

/// The work one batch item performs after filtering.
#[derive(Debug, Clone)]
pub enum BatchTask {
    /// Bracket-decompose one metric of the filtered slice.
    Decompose {
        domain: BracketDomain,
        metric: String,
        melt: bool,
    },
    /// Plain group-and-sum of one metric (trend/bar rollup).
    Aggregate {
        group_keys: Vec<String>,
        metric: String,
    },
}

/// One filter/metric combination.
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Identifier for the report (e.g. "income-brackets/reach_imp").
    pub label: String,
    pub config: FilterConfig,
    pub task: BatchTask,
}

// ============================================================================
// OUTCOMES
// ============================================================================

#[derive(Debug, Clone)]
pub enum BatchOutcome {
    Completed {
        rows: usize,
        warnings: Vec<DataQualityWarning>,
    },
    Skipped {
        reason: String,
    },
    Failed {
        error: BracketError,
    },
}

#[derive(Debug, Clone)]
pub struct BatchItem {
    pub label: String,
    pub outcome: BatchOutcome,
}

/// Per-item outcomes for a whole batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn items(&self) -> &[BatchItem] {
        &self.items
    }

    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Completed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&BatchOutcome) -> bool) -> usize {
        self.items.iter().filter(|i| pred(&i.outcome)).count()
    }
}

// ============================================================================
// RUNNER
// ============================================================================

/// Runs every job against the dataset. An error in one item never stops
/// the others.
pub fn run_batch(frame: &Frame, jobs: &[BatchJob]) -> BatchReport {
    let mut report = BatchReport::default();

    for job in jobs {
        // Known-invalid combinations are skipped before doing any work.
        if let BatchTask::Decompose { domain, metric, .. } = &job.task {
            if !domain.allows_metric(metric) {
                let reason = format!(
                    "metric '{metric}' is not valid for the '{}' bracket domain",
                    domain.name
                );
                tracing::warn!(label = %job.label, %reason, "batch item skipped");
                report.items.push(BatchItem {
                    label: job.label.clone(),
                    outcome: BatchOutcome::Skipped { reason },
                });
                continue;
            }
        }

        let outcome = match run_job(frame, job) {
            Ok((rows, warnings)) => {
                tracing::debug!(label = %job.label, rows, "batch item completed");
                BatchOutcome::Completed { rows, warnings }
            }
            Err(error) => {
                tracing::warn!(label = %job.label, %error, "batch item failed");
                BatchOutcome::Failed { error }
            }
        };
        report.items.push(BatchItem {
            label: job.label.clone(),
            outcome,
        });
    }

    report
}

fn run_job(
    frame: &Frame,
    job: &BatchJob,
) -> Result<(usize, Vec<DataQualityWarning>), BracketError> {
    let filtered = apply_filters(frame, &job.config)?;
    match &job.task {
        BatchTask::Decompose {
            domain,
            metric,
            melt,
        } => {
            let result = domain.decompose_with_metrics(&filtered, &[metric.as_str()], *melt)?;
            Ok((result.frame.len(), result.warnings))
        }
        BatchTask::Aggregate { group_keys, metric } => {
            let keys: Vec<&str> = group_keys.iter().map(|k| k.as_str()).collect();
            let rolled = sum_by(&filtered, &keys, &[metric.as_str()])?;
            Ok((rolled.len(), Vec::new()))
        }
    }
}
