//! Parameter binding and row decoding.

use crate::error::StoreError;
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Map, Value, json};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Row, Sqlite, TypeInfo, ValueRef};

/// A decoded row, keyed by column name.
pub type JsonRow = Map<String, Value>;

/// Timestamp format written to DATETIME columns.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A bind parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Integer(i64),
    Real(f64),
    Text(String),
    Null,
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Integer(v)
    }
}

impl From<f64> for SqlParam {
    fn from(v: f64) -> Self {
        SqlParam::Real(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl From<NaiveDateTime> for SqlParam {
    fn from(v: NaiveDateTime) -> Self {
        SqlParam::Text(v.format(TIMESTAMP_FORMAT).to_string())
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlParam::Null)
    }
}

/// Result set of a read statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryRows {
    /// Column names in select order. Empty when no row came back.
    pub columns: Vec<String>,
    pub rows: Vec<JsonRow>,
}

impl QueryRows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub(crate) fn bind_params<'q>(
    sql: &'q str,
    params: &'q [SqlParam],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    params
        .iter()
        .fold(sqlx::query(sql), |query, param| match param {
            SqlParam::Integer(v) => query.bind(*v),
            SqlParam::Real(v) => query.bind(*v),
            SqlParam::Text(v) => query.bind(v.as_str()),
            SqlParam::Null => query.bind(None::<i64>),
        })
}

pub(crate) fn column_names(row: &SqliteRow) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}

/// Convert a row to a JSON object.
///
/// SQLite is dynamically typed, so the JSON type follows the storage class of each
/// value rather than the declared column type.
pub fn row_to_json(row: &SqliteRow) -> Result<JsonRow, StoreError> {
    let mut obj = Map::new();

    for (index, column) in row.columns().iter().enumerate() {
        let name = column.name();
        let decode_err = |source| StoreError::Decode {
            column: name.to_string(),
            source,
        };

        let raw = row.try_get_raw(index).map_err(decode_err)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" => json!(row.try_get::<i64, _>(index).map_err(decode_err)?),
                "REAL" => json!(row.try_get::<f64, _>(index).map_err(decode_err)?),
                "BLOB" => {
                    let bytes: Vec<u8> = row.try_get(index).map_err(decode_err)?;
                    json!(format!("<blob {} bytes>", bytes.len()))
                }
                _ => json!(row.try_get::<String, _>(index).map_err(decode_err)?),
            }
        };

        obj.insert(name.to_string(), value);
    }

    Ok(obj)
}
