//! Record descriptors used by the generic repository

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::sqlite::SqliteRow;

/// A value bound into a generated statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Bool(bool),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_owned())
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// A creation or update payload, flattened to `(column, value)` pairs.
///
/// Only the columns present in the returned list are written.
pub trait Changeset: Send {
    fn into_values(self) -> Vec<(&'static str, SqlValue)>;
}

/// Describes how a record type is stored.
///
/// Every record table carries an integer primary key, a `created_at`
/// timestamp written on insert and a nullable deletion timestamp. A row with
/// no deletion timestamp is active.
pub trait Record: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static {
    const TABLE: &'static str;

    /// Columns that may be filtered on or written through a [`Changeset`].
    const COLUMNS: &'static [&'static str];

    const PRIMARY_KEY: &'static str = "id";
    const DELETED_AT: &'static str = "deleted_at";

    type New: Changeset;
    type Patch: Changeset;

    fn id(&self) -> i64;
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn is_active(&self) -> bool {
        self.deleted_at().is_none()
    }
}

/// A join record linking a parent to a member (class ↔ student, scenario ↔ category, ...).
pub trait Membership: Record {
    const PARENT: &'static str;
    const MEMBER: &'static str;

    fn link(parent_id: i64, member_id: i64) -> Self::New;
    fn parent_id(&self) -> i64;
    fn member_id(&self) -> i64;
}
