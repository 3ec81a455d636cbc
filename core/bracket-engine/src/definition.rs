//! FILENAME: core/bracket-engine/src/definition.rs
//! Bracket Definition - The serializable configuration.
//!
//! This module contains the declarative artifacts that DESCRIBE a bracket
//! decomposition: which cumulative source categories combine into which
//! exclusive bracket, and what each bracket is called on screen. These
//! structures are designed to be:
//! - Serializable (versionable configuration, not derived from data)
//! - Insertion-ordered (their declared order is the canonical wide-column
//!   and melt-emission order)
//! - Immutable at call time: the engine is a pure function of its inputs

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

// ============================================================================
// SIGNED TERMS
// ============================================================================

/// Sign of one term in a bracket expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Add,
    Subtract,
}

impl Sign {
    pub fn coefficient(self) -> f64 {
        match self {
            Sign::Add => 1.0,
            Sign::Subtract => -1.0,
        }
    }
}

/// One signed source-category term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedLabel {
    pub sign: Sign,
    pub label: String,
}

/// An exclusive bracket as a signed combination of cumulative source
/// categories. The conventional form seeds with one added category and
/// subtracts every category that double-counts members of the seed, but
/// the stored representation is a general signed list so a future
/// bracket may carry more than one positive term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketExpression {
    terms: Vec<SignedLabel>,
}

impl BracketExpression {
    /// A bracket that equals a single source category verbatim.
    pub fn single(label: impl Into<String>) -> Self {
        BracketExpression {
            terms: vec![SignedLabel {
                sign: Sign::Add,
                label: label.into(),
            }],
        }
    }

    /// The inclusion-exclusion form: the seed category is added, every
    /// following category is subtracted.
    pub fn cumulative(seed: impl Into<String>, subtract: &[&str]) -> Self {
        let mut terms = vec![SignedLabel {
            sign: Sign::Add,
            label: seed.into(),
        }];
        for label in subtract {
            terms.push(SignedLabel {
                sign: Sign::Subtract,
                label: (*label).to_string(),
            });
        }
        BracketExpression { terms }
    }

    pub fn terms(&self) -> &[SignedLabel] {
        &self.terms
    }

    /// Every distinct source label the expression references.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.label.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

// ============================================================================
// ORDERED KEY TABLES
// ============================================================================

/// Ordered map from bracket key to expression. Insertion order is the
/// canonical bracket order for the whole pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketExpressions {
    entries: Vec<(String, BracketExpression)>,
}

impl BracketExpressions {
    pub fn new() -> Self {
        BracketExpressions::default()
    }

    /// Inserts or replaces the expression for `key`, keeping the position
    /// of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, expression: BracketExpression) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = expression,
            None => self.entries.push((key, expression)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, expression: BracketExpression) -> Self {
        self.insert(key, expression);
        self
    }

    pub fn get(&self, key: &str) -> Option<&BracketExpression> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BracketExpression)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered map from bracket key to display label. Must be 1:1 and onto
/// its paired expression table's key set; iteration order here is the
/// melt emission order and therefore the downstream display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketLabels {
    entries: Vec<(String, String)>,
}

impl BracketLabels {
    pub fn new() -> Self {
        BracketLabels::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, label: impl Into<String>) {
        let key = key.into();
        let label = label.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = label,
            None => self.entries.push((key, label)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.insert(key, label);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, l)| l.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, l)| (k.as_str(), l.as_str()))
    }

    /// Display labels in declared order.
    pub fn display_order(&self) -> Vec<String> {
        self.entries.iter().map(|(_, l)| l.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Checks that the expression table and label map share exactly the same
/// key set, and that no expression is empty. Purely structural; does not
/// touch data.
pub fn validate_key_correspondence(
    expressions: &BracketExpressions,
    labels: &BracketLabels,
) -> Result<(), ConfigurationError> {
    for (key, expression) in expressions.iter() {
        if expression.is_empty() {
            return Err(ConfigurationError::EmptyExpression {
                bracket: key.to_string(),
            });
        }
    }

    let missing_labels: Vec<String> = expressions
        .keys()
        .filter(|k| labels.get(k).is_none())
        .map(|k| k.to_string())
        .collect();
    let missing_expressions: Vec<String> = labels
        .keys()
        .filter(|k| expressions.get(k).is_none())
        .map(|k| k.to_string())
        .collect();

    if missing_labels.is_empty() && missing_expressions.is_empty() {
        Ok(())
    } else {
        Err(ConfigurationError::KeyMismatch {
            missing_labels,
            missing_expressions,
        })
    }
}
