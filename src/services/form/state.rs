use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::fields::{self, FIELDS, FieldKind, FieldSpec};
use super::types::{FieldValue, FormError, YesNo};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Current contents of the session form, keyed by field key.
///
/// Every catalog field always holds a value; "absent" is expressed the way
/// the inputs express it (empty text, unset selector, number at its minimum,
/// no date).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormState {
    values: BTreeMap<String, FieldValue>,
}

impl FormState {
    /// A freshly cleared form stamped with the given moment
    pub fn cleared(now: NaiveDateTime) -> Self {
        let mut state = Self {
            values: BTreeMap::new(),
        };
        state.clear(now);
        state
    }

    /// Reset every optional field to absent and date/time fields to `now`.
    pub fn clear(&mut self, now: NaiveDateTime) {
        self.values = FIELDS
            .iter()
            .map(|spec| (spec.key.to_string(), Self::cleared_value(spec, now)))
            .collect();
    }

    fn cleared_value(spec: &FieldSpec, now: NaiveDateTime) -> FieldValue {
        match spec.kind {
            FieldKind::Text { .. } | FieldKind::Notes => FieldValue::Text(String::new()),
            FieldKind::YesNo => FieldValue::Choice(None),
            FieldKind::Number(range) => FieldValue::Number(range.min),
            FieldKind::Date => FieldValue::Date(Some(now.date())),
            FieldKind::Time => FieldValue::Time(truncate_to_minute(now.time())),
        }
    }

    /// Fill in fields missing from an older draft so every catalog key is present
    pub fn fill_missing(&mut self, now: NaiveDateTime) {
        for spec in FIELDS {
            self.values
                .entry(spec.key.to_string())
                .or_insert_with(|| Self::cleared_value(spec, now));
        }
        self.values.retain(|key, _| fields::find(key).is_some());
    }

    /// Get the value of a field; `None` only for keys outside the catalog
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    /// Set a field from user input, applying the input rules of its kind
    pub fn set(&mut self, key: &str, input: &str) -> Result<(), FormError> {
        let spec = fields::find(key).ok_or_else(|| FormError::UnknownField(key.to_string()))?;
        let value = parse_input(spec, input)?;
        self.values.insert(spec.key.to_string(), value);
        Ok(())
    }

    /// Parse and apply a `KEY=VALUE` assignment
    pub fn assign(&mut self, assignment: &str) -> Result<(), FormError> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| FormError::MalformedAssignment(assignment.to_string()))?;
        self.set(key.trim(), value)
    }

    /// Make a field absent
    pub fn unset(&mut self, key: &str) -> Result<(), FormError> {
        let spec = fields::find(key).ok_or_else(|| FormError::UnknownField(key.to_string()))?;
        let value = match spec.kind {
            FieldKind::Text { .. } | FieldKind::Notes => FieldValue::Text(String::new()),
            FieldKind::YesNo => FieldValue::Choice(None),
            FieldKind::Number(range) => FieldValue::Number(range.min),
            FieldKind::Date => FieldValue::Date(None),
            FieldKind::Time => return Err(FormError::NotOptional(spec.key)),
        };
        self.values.insert(spec.key.to_string(), value);
        Ok(())
    }

    /// Render a field the way the form shows it; numbers at their minimum are blank
    pub fn display(&self, spec: &FieldSpec) -> String {
        match (self.get(spec.key), spec.kind) {
            (Some(FieldValue::Text(text)), _) => text.clone(),
            (Some(FieldValue::Choice(choice)), _) => {
                choice.map(|c| c.as_str().to_string()).unwrap_or_default()
            }
            (Some(FieldValue::Number(value)), FieldKind::Number(range)) => {
                if *value == range.min {
                    String::new()
                } else {
                    format!("{:.*}", range.decimals as usize, value)
                }
            }
            (Some(FieldValue::Date(date)), _) => date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            (Some(FieldValue::Time(time)), _) => time.format(TIME_FORMAT).to_string(),
            _ => String::new(),
        }
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

fn parse_input(spec: &'static FieldSpec, input: &str) -> Result<FieldValue, FormError> {
    match spec.kind {
        FieldKind::Text { max_len } => {
            if let Some(max) = max_len {
                if input.chars().count() > max {
                    return Err(FormError::TooLong {
                        field: spec.key,
                        max,
                    });
                }
            }
            Ok(FieldValue::Text(input.to_string()))
        }
        FieldKind::Notes => Ok(FieldValue::Text(input.to_string())),
        FieldKind::YesNo => YesNo::parse(input)
            .map(FieldValue::Choice)
            .ok_or_else(|| FormError::NotAChoice {
                field: spec.key,
                input: input.to_string(),
            }),
        FieldKind::Number(range) => {
            let trimmed = input.trim();
            if trimmed.is_empty() {
                return Ok(FieldValue::Number(range.min));
            }
            let value: f64 = trimmed.parse().map_err(|_| FormError::NotANumber {
                field: spec.key,
                input: input.to_string(),
            })?;
            let value = range.round(value);
            if !value.is_finite() || !range.contains(value) {
                return Err(FormError::OutOfRange {
                    field: spec.key,
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
            Ok(FieldValue::Number(value))
        }
        FieldKind::Date => {
            let trimmed = input.trim();
            if trimmed.is_empty() {
                return Ok(FieldValue::Date(None));
            }
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(|d| FieldValue::Date(Some(d)))
                .map_err(|_| FormError::BadDate {
                    field: spec.key,
                    input: input.to_string(),
                })
        }
        FieldKind::Time => {
            let trimmed = input.trim();
            NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
                .map(|t| FieldValue::Time(truncate_to_minute(t)))
                .map_err(|_| FormError::BadTime {
                    field: spec.key,
                    input: input.to_string(),
                })
        }
    }
}
