//! Column schemas for the Chatwoot queries.
//!
//! Each query shape declares the columns it selects, in order, together with the
//! kind of value it expects. Rows are zipped against that list, so the JSON object
//! for a row always has the same keys in the same order as the SELECT list.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use service_core::error::AppError;
use sqlx::postgres::PgRow;
use sqlx::{Row, TypeInfo, ValueRef};

/// One mapped row. Insertion-ordered (serde_json `preserve_order`).
pub type JsonRow = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text,
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self { name, kind }
    }
}

pub const CONVERSATION_COLUMNS: &[Column] = &[
    Column::new("id", ColumnKind::Integer),
    Column::new("account_id", ColumnKind::Integer),
    Column::new("inbox_id", ColumnKind::Integer),
    Column::new("status", ColumnKind::Integer),
    Column::new("created_at", ColumnKind::Timestamp),
    Column::new("updated_at", ColumnKind::Timestamp),
];

pub const LIST_CONVERSATIONS_SQL: &str = "\
     SELECT id, account_id, inbox_id, status, created_at, updated_at \
     FROM conversations \
     ORDER BY created_at DESC \
     LIMIT $1 OFFSET $2";

pub const MESSAGE_COLUMNS: &[Column] = &[
    Column::new("id", ColumnKind::Integer),
    Column::new("conversation_id", ColumnKind::Integer),
    Column::new("sender_type", ColumnKind::Text),
    Column::new("content", ColumnKind::Text),
    Column::new("created_at", ColumnKind::Timestamp),
    Column::new("message_type", ColumnKind::Integer),
];

pub const LIST_MESSAGES_SQL: &str = "\
     SELECT id, conversation_id, sender_type, content, created_at, message_type \
     FROM messages \
     WHERE conversation_id = $1 \
     ORDER BY created_at DESC \
     LIMIT $2";

/// Timestamps are rendered as HTTP dates, the format existing callers parse.
pub fn http_date(ts: NaiveDateTime) -> String {
    ts.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

pub fn map_row(row: &PgRow, columns: &[Column]) -> Result<JsonRow, AppError> {
    let mut mapped = JsonRow::with_capacity(columns.len());
    for column in columns {
        mapped.insert(column.name.to_string(), decode_column(row, column)?);
    }
    Ok(mapped)
}

fn decode_column(row: &PgRow, column: &Column) -> Result<Value, AppError> {
    let raw = row.try_get_raw(column.name)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();

    let value = match (column.kind, type_name.as_str()) {
        (ColumnKind::Integer, "INT2") => Value::from(row.try_get::<i16, _>(column.name)?),
        (ColumnKind::Integer, "INT4") => Value::from(row.try_get::<i32, _>(column.name)?),
        (ColumnKind::Integer, "INT8") => Value::from(row.try_get::<i64, _>(column.name)?),
        (ColumnKind::Text, "TEXT" | "VARCHAR" | "BPCHAR" | "NAME") => {
            Value::from(row.try_get::<String, _>(column.name)?)
        }
        (ColumnKind::Timestamp, "TIMESTAMP") => {
            Value::from(http_date(row.try_get::<NaiveDateTime, _>(column.name)?))
        }
        (ColumnKind::Timestamp, "TIMESTAMPTZ") => Value::from(http_date(
            row.try_get::<DateTime<Utc>, _>(column.name)?.naive_utc(),
        )),
        (kind, other) => {
            return Err(AppError::DatabaseError(format!(
                "column \"{}\" has type {} which cannot be read as {:?}",
                column.name, other, kind
            )))
        }
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn select_list(columns: &[Column]) -> String {
        columns
            .iter()
            .map(|column| column.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[test]
    fn select_lists_match_declared_schemas() {
        let conversations = format!("SELECT {} FROM", select_list(CONVERSATION_COLUMNS));
        assert!(LIST_CONVERSATIONS_SQL.starts_with(&conversations));

        let messages = format!("SELECT {} FROM", select_list(MESSAGE_COLUMNS));
        assert!(LIST_MESSAGES_SQL.starts_with(&messages));
    }

    #[test]
    fn queries_order_newest_first() {
        assert!(LIST_CONVERSATIONS_SQL.contains("ORDER BY created_at DESC"));
        assert!(LIST_MESSAGES_SQL.contains("ORDER BY created_at DESC"));
    }

    #[test]
    fn http_date_uses_gmt_rfc1123_layout() {
        let ts = NaiveDate::from_ymd_opt(1994, 11, 15)
            .unwrap()
            .and_hms_opt(8, 12, 31)
            .unwrap();
        assert_eq!(http_date(ts), "Tue, 15 Nov 1994 08:12:31 GMT");
    }
}
