//! Value types shared by the form state and the normalizer.
//!
//! This module contains:
//! - `YesNo` - the tri-state selector value (unset is `None`)
//! - `FieldValue` - the raw value held by one input
//! - `ColumnValue` - a normalized, insert-ready column value
//! - `FormError` - rejected input when setting a field
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Yes/No selector value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum YesNo {
    True,
    False,
}

impl YesNo {
    /// Get the string stored in the database for this option
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::True => "True",
            YesNo::False => "False",
        }
    }

    /// Parse user input. Empty input is `Some(None)` ("unset"); input that
    /// names neither option is `None`.
    pub fn parse(input: &str) -> Option<Option<Self>> {
        match input.trim().to_lowercase().as_str() {
            "" => Some(None),
            "true" | "yes" | "y" | "1" => Some(Some(YesNo::True)),
            "false" | "no" | "n" | "0" => Some(Some(YesNo::False)),
            _ => None,
        }
    }
}

/// The raw value of one input, before normalization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Single-line or multi-line text, stored untrimmed as typed
    Text(String),
    Choice(Option<YesNo>),
    /// Number spinner; the field minimum means "no value entered"
    Number(f64),
    Date(Option<NaiveDate>),
    Time(NaiveTime),
}

/// A normalized value ready to be bound to an INSERT placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FormError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("expected KEY=VALUE, got '{0}'")]
    MalformedAssignment(String),

    #[error("{field}: at most {max} characters allowed")]
    TooLong { field: &'static str, max: usize },

    #[error("{field}: '{input}' is not a number")]
    NotANumber { field: &'static str, input: String },

    #[error("{field}: {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field}: expected true/false (or empty), got '{input}'")]
    NotAChoice { field: &'static str, input: String },

    #[error("{field}: expected YYYY-MM-DD, got '{input}'")]
    BadDate { field: &'static str, input: String },

    #[error("{field}: expected HH:MM, got '{input}'")]
    BadTime { field: &'static str, input: String },

    #[error("{0} always has a value and cannot be unset")]
    NotOptional(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_parses_common_spellings() {
        assert_eq!(YesNo::parse("True"), Some(Some(YesNo::True)));
        assert_eq!(YesNo::parse(" no "), Some(Some(YesNo::False)));
        assert_eq!(YesNo::parse("1"), Some(Some(YesNo::True)));
        assert_eq!(YesNo::parse("   "), Some(None));
        assert_eq!(YesNo::parse("maybe"), None);
    }

    #[test]
    fn yes_no_database_strings() {
        assert_eq!(YesNo::True.as_str(), "True");
        assert_eq!(YesNo::False.as_str(), "False");
    }
}
