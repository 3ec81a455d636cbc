//! FILENAME: core/table/src/value.rs
//! PURPOSE: Defines the fundamental data values held by a table cell.
//! CONTEXT: This file contains the `Value` enum and the `Month` newtype.
//! Values must be usable as grouping keys, so equality and hashing are
//! total: all NaN numbers are identified with each other, and a total
//! ordering (Empty < Number < Month < Text) keeps grouped output stable.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;

// ============================================================================
// MONTH
// ============================================================================

/// A calendar month (the time granularity of the measurement data).
/// Internally a `NaiveDate` pinned to the first of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month(NaiveDate);

impl Month {
    /// Creates a month from a year and a 1-based month number.
    pub fn new(year: i32, month: u32) -> Option<Month> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Month)
    }

    /// Parses either the dataset form ("Mar 2025") or the selection
    /// form ("2025-03"). Returns None for anything else.
    pub fn parse(s: &str) -> Option<Month> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(&format!("01 {s}"), "%d %b %Y") {
            return Some(Month(date));
        }
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
            return Some(Month(date));
        }
        None
    }

    pub fn year(&self) -> i32 {
        chrono::Datelike::year(&self.0)
    }

    pub fn month(&self) -> u32 {
        chrono::Datelike::month(&self.0)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Same presentation the source data uses
        write!(f, "{}", self.0.format("%b %Y"))
    }
}

// ============================================================================
// VALUE
// ============================================================================

/// A single cell value in a table.
#[derive(Debug, Clone)]
pub enum Value {
    Empty,
    Number(f64),
    Text(String),
    Month(Month),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Numeric view of the value. Non-numeric values yield None;
    /// metric arithmetic treats those as contributing nothing.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Returns the display form of the value as a String.
    pub fn display_value(&self) -> String {
        match self {
            Value::Empty => String::new(),
            Value::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            Value::Text(s) => s.clone(),
            Value::Month(m) => m.to_string(),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<Month> for Value {
    fn from(value: Month) -> Self {
        Value::Month(value)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Empty, Value::Empty) => true,
            (Value::Number(a), Value::Number(b)) => {
                // All NaN values are treated as equal to each other
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Month(a), Value::Month(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Empty => 0u8.hash(state),
            Value::Number(n) => {
                1u8.hash(state);
                if n.is_nan() {
                    // All NaN values hash to the same thing
                    u64::MAX.hash(state);
                } else {
                    n.to_bits().hash(state);
                }
            }
            Value::Text(s) => {
                2u8.hash(state);
                s.hash(state);
            }
            Value::Month(m) => {
                3u8.hash(state);
                m.hash(state);
            }
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Empty, Value::Empty) => Ordering::Equal,
            (Value::Empty, _) => Ordering::Less,
            (_, Value::Empty) => Ordering::Greater,
            (Value::Number(a), Value::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (Value::Number(_), _) => Ordering::Less,
            (_, Value::Number(_)) => Ordering::Greater,
            (Value::Month(a), Value::Month(b)) => a.cmp(b),
            (Value::Month(_), _) => Ordering::Less,
            (_, Value::Month(_)) => Ordering::Greater,
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_parses_both_forms() {
        let a = Month::parse("Mar 2025").unwrap();
        let b = Month::parse("2025-03").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.year(), 2025);
        assert_eq!(a.month(), 3);
        assert_eq!(a.to_string(), "Mar 2025");
    }

    #[test]
    fn test_month_rejects_garbage() {
        assert!(Month::parse("P2-11").is_none());
        assert!(Month::parse("").is_none());
        assert!(Month::parse("2025-13").is_none());
    }

    #[test]
    fn test_months_order_chronologically() {
        let jan = Month::parse("Jan 2025").unwrap();
        let dec = Month::parse("Dec 2024").unwrap();
        assert!(dec < jan);
    }

    #[test]
    fn test_nan_values_are_identified() {
        let a = Value::Number(f64::NAN);
        let b = Value::Number(f64::NAN);
        assert_eq!(a, b);

        use std::collections::hash_map::DefaultHasher;
        let hash = |v: &Value| {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&a), hash(&b));
    }

    #[test]
    fn test_value_total_order() {
        let mut values = vec![
            Value::text("b"),
            Value::Number(2.0),
            Value::Empty,
            Value::Month(Month::parse("Jan 2025").unwrap()),
            Value::text("a"),
            Value::Number(1.0),
        ];
        values.sort();
        assert_eq!(values[0], Value::Empty);
        assert_eq!(values[1], Value::Number(1.0));
        assert_eq!(values[2], Value::Number(2.0));
        assert_eq!(values[3], Value::Month(Month::parse("Jan 2025").unwrap()));
        assert_eq!(values[4], Value::text("a"));
        assert_eq!(values[5], Value::text("b"));
    }

    #[test]
    fn test_display_value() {
        assert_eq!(Value::Number(500.0).display_value(), "500");
        assert_eq!(Value::Number(0.25).display_value(), "0.25");
        assert_eq!(Value::text("Total Day").display_value(), "Total Day");
        assert_eq!(Value::Empty.display_value(), "");
    }
}
