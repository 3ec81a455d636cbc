//! FILENAME: core/bracket-engine/src/domains.rs
//! Domain Façades - Fixed bracket decompositions for income and age.
//!
//! A `BracketDomain` binds the builder and melter to one concrete
//! dimension: its expression table, label map, grouping keys, and source
//! column are configuration constants, not derived from data. The two
//! shipped domains decompose household income (over `characteristic`)
//! and person age (over `demographic`).
//!
//! Only additive count-style metrics may be decomposed; a ratio or
//! average cannot be validly split by inclusion-exclusion. The façade
//! enforces that allow-list before any computation.

use serde::{Deserialize, Serialize};
use table::Frame;

use crate::definition::{
    validate_key_correspondence, BracketExpression, BracketExpressions, BracketLabels,
};
use crate::engine::{build_wide_brackets, melt_brackets, MeltPolicy};
use crate::error::{BracketError, ConfigurationError, DataQualityWarning};

/// Result of a decomposition: the wide or long frame plus any advisory
/// findings made during the build.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub frame: Frame,
    pub warnings: Vec<DataQualityWarning>,
}

/// A fixed instantiation of the bracket engine for one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketDomain {
    /// Short domain name, used in reports and batch labels.
    pub name: String,

    /// The dimension column whose cumulative categories are decomposed.
    pub source_column: String,

    /// Granularity of the output: every demographic/time dimension
    /// except the one being decomposed.
    pub group_keys: Vec<String>,

    /// Name of the bracket label column in the long output.
    pub bracket_column: String,

    pub expressions: BracketExpressions,
    pub labels: BracketLabels,

    /// Metrics that may be decomposed (additive counts only).
    pub additive_metrics: Vec<String>,
}

impl BracketDomain {
    /// Household income brackets over the `characteristic` column.
    pub fn income() -> Self {
        BracketDomain {
            name: "income".to_string(),
            source_column: "characteristic".to_string(),
            group_keys: vec![
                "daypart".to_string(),
                "demographic".to_string(),
                "month".to_string(),
            ],
            bracket_column: "income_bracket".to_string(),
            expressions: BracketExpressions::new()
                .with("0_25k", BracketExpression::single("Less than $25K"))
                .with("25_50k", BracketExpression::cumulative("$25K+", &["$50K+"]))
                .with("50_75k", BracketExpression::cumulative("$50K+", &["$75K+"]))
                .with("75_100k", BracketExpression::cumulative("$75K+", &["$100K+"]))
                .with("100_200k", BracketExpression::cumulative("$100K+", &["$200K+"]))
                .with("200k_plus", BracketExpression::single("$200K+")),
            labels: BracketLabels::new()
                .with("0_25k", "Less than $25K")
                .with("25_50k", "$25K-$50K")
                .with("50_75k", "$50K-$75K")
                .with("75_100k", "$75K-$100K")
                .with("100_200k", "$100K-$200K")
                .with("200k_plus", "$200K+"),
            additive_metrics: vec!["reach_imp".to_string(), "grp_imp".to_string()],
        }
    }

    /// Person age brackets over the `demographic` column.
    ///
    /// The P12_17 expression assumes P2+ strictly contains
    /// P2-11 and P18+ with no remaining gap; if the survey's category
    /// definitions ever change, this table changes with them.
    pub fn age() -> Self {
        BracketDomain {
            name: "age".to_string(),
            source_column: "demographic".to_string(),
            group_keys: vec![
                "daypart".to_string(),
                "characteristic".to_string(),
                "month".to_string(),
            ],
            bracket_column: "age_bracket".to_string(),
            expressions: BracketExpressions::new()
                .with("P2_11", BracketExpression::single("P2-11"))
                .with("P12_17", BracketExpression::cumulative("P2+", &["P2-11", "P18+"]))
                .with("P18_34", BracketExpression::cumulative("P18+", &["P35-64", "P65+"]))
                .with("P35_64", BracketExpression::single("P35-64"))
                .with("P65_plus", BracketExpression::single("P65+")),
            labels: BracketLabels::new()
                .with("P2_11", "Ages 2-11")
                .with("P12_17", "Ages 12-17")
                .with("P18_34", "Ages 18-34")
                .with("P35_64", "Ages 35-64")
                .with("P65_plus", "Ages 65+"),
            additive_metrics: vec!["reach_imp".to_string(), "grp_imp".to_string()],
        }
    }

    /// Structural validation of the domain's declarative tables.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate_key_correspondence(&self.expressions, &self.labels)
    }

    pub fn allows_metric(&self, metric: &str) -> bool {
        self.additive_metrics.iter().any(|m| m == metric)
    }

    /// Decomposes the dataset with the domain's full additive metric
    /// set. `melt = false` returns the wide table for diagnosing the
    /// bracket math; `true` returns the long display table.
    pub fn decompose(&self, frame: &Frame, melt: bool) -> Result<Decomposition, BracketError> {
        let metrics: Vec<&str> = self.additive_metrics.iter().map(|m| m.as_str()).collect();
        self.decompose_with_metrics(frame, &metrics, melt)
    }

    /// Decomposes the dataset for an explicit metric list. Every metric
    /// must be on the domain's additive allow-list.
    pub fn decompose_with_metrics(
        &self,
        frame: &Frame,
        metrics: &[&str],
        melt: bool,
    ) -> Result<Decomposition, BracketError> {
        self.validate()?;
        for metric in metrics {
            if !self.allows_metric(metric) {
                return Err(ConfigurationError::NonAdditiveMetric {
                    metric: (*metric).to_string(),
                    allowed: self.additive_metrics.clone(),
                }
                .into());
            }
        }

        let group_keys: Vec<&str> = self.group_keys.iter().map(|k| k.as_str()).collect();
        let built = build_wide_brackets(
            frame,
            &group_keys,
            &self.source_column,
            &self.expressions,
            metrics,
        )?;
        if !melt {
            return Ok(Decomposition {
                frame: built.frame,
                warnings: built.warnings,
            });
        }

        let long = melt_brackets(
            &built.frame,
            &group_keys,
            &self.labels,
            &self.bracket_column,
            metrics,
            MeltPolicy::Strict,
        )?;
        Ok(Decomposition {
            frame: long,
            warnings: built.warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use table::Value;

    #[test]
    fn test_shipped_domains_have_matching_key_sets() {
        for domain in [BracketDomain::income(), BracketDomain::age()] {
            assert!(domain.validate().is_ok(), "domain {}", domain.name);
            assert_eq!(domain.expressions.len(), domain.labels.len());
            // the decomposed dimension never appears among the group keys
            assert!(!domain.group_keys.contains(&domain.source_column));
        }
    }

    #[test]
    fn test_non_additive_metric_rejected() {
        let domain = BracketDomain::income();
        let frame = Frame::new(vec![
            "daypart".into(),
            "demographic".into(),
            "month".into(),
            "characteristic".into(),
            "avg_freq".into(),
        ])
        .unwrap();

        let err = domain
            .decompose_with_metrics(&frame, &["avg_freq"], true)
            .unwrap_err();
        assert_eq!(
            err,
            BracketError::Configuration(ConfigurationError::NonAdditiveMetric {
                metric: "avg_freq".to_string(),
                allowed: vec!["reach_imp".to_string(), "grp_imp".to_string()],
            })
        );
    }

    #[test]
    fn test_decompose_wide_and_long() {
        let mut frame = Frame::new(vec![
            "daypart".into(),
            "demographic".into(),
            "month".into(),
            "characteristic".into(),
            "reach_imp".into(),
            "grp_imp".into(),
        ])
        .unwrap();
        for (characteristic, reach, grp) in [
            ("Less than $25K", 100.0, 300.0),
            ("$25K+", 400.0, 1200.0),
            ("$50K+", 250.0, 750.0),
            ("$75K+", 150.0, 450.0),
            ("$100K+", 90.0, 270.0),
            ("$200K+", 20.0, 60.0),
        ] {
            frame
                .push_row(vec![
                    Value::text("Total Day"),
                    Value::text("Persons 18+"),
                    Value::text("2025-03"),
                    Value::text(characteristic),
                    Value::Number(reach),
                    Value::Number(grp),
                ])
                .unwrap();
        }

        let domain = BracketDomain::income();

        let wide = domain.decompose(&frame, false).unwrap();
        assert_eq!(wide.frame.len(), 1);
        // both metrics, six brackets each, after the three group keys
        assert_eq!(wide.frame.columns().len(), 3 + 2 * 6);

        let long = domain.decompose(&frame, true).unwrap();
        assert_eq!(long.frame.len(), 6);
        let bracket = long.frame.column_index("income_bracket").unwrap();
        let grp = long.frame.column_index("grp_imp").unwrap();
        assert_eq!(long.frame.value(1, bracket), &Value::text("$25K-$50K"));
        assert_eq!(long.frame.value(1, grp), &Value::Number(450.0));
    }
}
