use sqlx::mysql::{MySql, MySqlArguments};
use sqlx::query::Query;

use crate::services::form::{ColumnValue, SessionRecord};

pub const TABLE_NAME: &str = "monkeyLog";

/// Build the parameterized INSERT for a record, one placeholder per column
pub fn build_insert_sql(record: &SessionRecord) -> String {
    let columns = record
        .column_names()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; record.columns.len()].join(", ");

    format!("INSERT INTO `{TABLE_NAME}` ({columns}) VALUES ({placeholders})")
}

/// Bind every column value of `record` to `query`, in column order
pub(crate) fn bind_record<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    record: &SessionRecord,
) -> Query<'q, MySql, MySqlArguments> {
    for (_, value) in &record.columns {
        query = match value {
            ColumnValue::Null => query.bind(Option::<String>::None),
            ColumnValue::Text(text) => query.bind(text.clone()),
            ColumnValue::Int(number) => query.bind(*number),
            ColumnValue::Float(number) => query.bind(*number),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::form::{FIELDS, FormState, normalize};
    use chrono::NaiveDate;

    #[test]
    fn insert_lists_every_column_with_a_placeholder() {
        let now = NaiveDate::from_ymd_opt(2026, 2, 24)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let record = normalize(&FormState::cleared(now)).unwrap();
        let sql = build_insert_sql(&record);

        assert!(sql.starts_with("INSERT INTO `monkeyLog` (`Subject`, `ExperimentDate`, "));
        assert!(sql.ends_with("?)"));
        assert_eq!(sql.matches('?').count(), FIELDS.len());
        for spec in FIELDS {
            assert!(sql.contains(&format!("`{}`", spec.column)), "{}", spec.column);
        }
    }
}
