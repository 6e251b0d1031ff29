use chrono::{Datelike, NaiveDate};

use super::fields::{FIELDS, FieldKind, FieldSpec, REQUIRED_DATE};
use super::state::FormState;
use super::types::{ColumnValue, FieldValue};

/// One insert-ready row of the monkeyLog table, in catalog column order
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub columns: Vec<(&'static str, ColumnValue)>,
}

impl SessionRecord {
    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.columns
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(name, _)| *name)
    }

    pub fn present_count(&self) -> usize {
        self.columns.iter().filter(|(_, v)| !v.is_null()).count()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Experiment Date is required.")]
    MissingExperimentDate,
}

/// Encode a date as its YYYYMMDD integer (2026-02-24 becomes 20260224)
pub fn date_to_yyyymmdd(date: NaiveDate) -> i64 {
    date.year() as i64 * 10000 + date.month() as i64 * 100 + date.day() as i64
}

/// Convert the form into column values, rejecting it when the date is absent.
pub fn normalize(form: &FormState) -> Result<SessionRecord, ValidationError> {
    let columns: Vec<_> = FIELDS
        .iter()
        .map(|spec| (spec.column, normalize_field(spec, form.get(spec.key))))
        .collect();

    let record = SessionRecord { columns };
    let date_column = FIELDS
        .iter()
        .find(|spec| spec.key == REQUIRED_DATE)
        .map(|spec| spec.column)
        .unwrap_or("ExperimentDate");

    match record.get(date_column) {
        Some(ColumnValue::Int(_)) => Ok(record),
        _ => Err(ValidationError::MissingExperimentDate),
    }
}

fn normalize_field(spec: &FieldSpec, value: Option<&FieldValue>) -> ColumnValue {
    match (spec.kind, value) {
        (FieldKind::Text { .. } | FieldKind::Notes, Some(FieldValue::Text(text))) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                ColumnValue::Null
            } else {
                ColumnValue::Text(trimmed.to_string())
            }
        }
        (FieldKind::YesNo, Some(FieldValue::Choice(choice))) => choice
            .map(|c| ColumnValue::Text(c.as_str().to_string()))
            .unwrap_or(ColumnValue::Null),
        (FieldKind::Number(range), Some(FieldValue::Number(value))) => {
            if *value == range.min {
                ColumnValue::Null
            } else if range.is_integral() {
                ColumnValue::Int(*value as i64)
            } else {
                ColumnValue::Float(*value)
            }
        }
        (FieldKind::Date, Some(FieldValue::Date(Some(date)))) => {
            ColumnValue::Int(date_to_yyyymmdd(*date))
        }
        (FieldKind::Time, Some(FieldValue::Time(time))) => {
            ColumnValue::Text(time.format("%H:%M").to_string())
        }
        (kind, other) => {
            if other.is_some() {
                tracing::warn!(field = spec.key, ?kind, "field value does not match its kind");
            }
            ColumnValue::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn moment() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 24)
            .unwrap()
            .and_hms_opt(14, 3, 0)
            .unwrap()
    }

    #[test]
    fn date_encodes_as_yyyymmdd() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 24).unwrap();
        assert_eq!(date_to_yyyymmdd(date), 20260224);
        let date = NaiveDate::from_ymd_opt(1999, 12, 1).unwrap();
        assert_eq!(date_to_yyyymmdd(date), 19991201);
    }

    #[test]
    fn cleared_form_normalizes_to_date_and_times_only() {
        let record = normalize(&FormState::cleared(moment())).unwrap();

        assert_eq!(record.columns.len(), FIELDS.len());
        assert_eq!(record.get("ExperimentDate"), Some(&ColumnValue::Int(20260224)));
        assert_eq!(
            record.get("StartTime"),
            Some(&ColumnValue::Text("14:03".to_string()))
        );
        assert_eq!(
            record.get("EndTime"),
            Some(&ColumnValue::Text("14:03".to_string()))
        );
        assert_eq!(record.present_count(), 3);
    }

    #[test]
    fn missing_date_is_rejected() {
        let mut form = FormState::cleared(moment());
        form.set("subject", "Hercules").unwrap();
        form.unset("experiment_date").unwrap();

        assert_eq!(normalize(&form), Err(ValidationError::MissingExperimentDate));
    }

    #[test]
    fn numbers_at_minimum_are_absent_and_others_pass_through() {
        for spec in FIELDS {
            let FieldKind::Number(range) = spec.kind else {
                continue;
            };
            let mut form = FormState::cleared(moment());
            form.set(spec.key, &range.min.to_string()).unwrap();
            let record = normalize(&form).unwrap();
            assert_eq!(record.get(spec.column), Some(&ColumnValue::Null), "{}", spec.key);

            form.set(spec.key, &range.max.to_string()).unwrap();
            let record = normalize(&form).unwrap();
            let expected = if range.is_integral() {
                ColumnValue::Int(range.max as i64)
            } else {
                ColumnValue::Float(range.max)
            };
            assert_eq!(record.get(spec.column), Some(&expected), "{}", spec.key);
        }
    }

    #[test]
    fn strings_are_trimmed_and_blank_is_absent() {
        for spec in FIELDS {
            if !matches!(spec.kind, FieldKind::Text { .. } | FieldKind::Notes) {
                continue;
            }
            let mut form = FormState::cleared(moment());
            form.set(spec.key, "  \t ").unwrap();
            let record = normalize(&form).unwrap();
            assert_eq!(record.get(spec.column), Some(&ColumnValue::Null), "{}", spec.key);

            form.set(spec.key, "  ab c ").unwrap();
            let record = normalize(&form).unwrap();
            assert_eq!(
                record.get(spec.column),
                Some(&ColumnValue::Text("ab c".to_string())),
                "{}",
                spec.key
            );
        }
    }

    #[test]
    fn selectors_pass_through_their_option() {
        let mut form = FormState::cleared(moment());
        form.set("trained", "yes").unwrap();
        form.set("eyes_tracked", "false").unwrap();
        let record = normalize(&form).unwrap();

        assert_eq!(record.get("Trained"), Some(&ColumnValue::Text("True".to_string())));
        assert_eq!(
            record.get("EyesTracked"),
            Some(&ColumnValue::Text("False".to_string()))
        );
        assert_eq!(record.get("PublishQuality"), Some(&ColumnValue::Null));
    }

    #[test]
    fn column_order_follows_catalog() {
        let record = normalize(&FormState::cleared(moment())).unwrap();
        let names: Vec<_> = record.column_names().collect();
        assert_eq!(names.first(), Some(&"Subject"));
        assert_eq!(names.get(1), Some(&"ExperimentDate"));
        assert_eq!(names.last(), Some(&"ExtraWater"));
    }
}
