//! Generic soft-delete repository
//!
//! One [`Repository`] is instantiated per record type. Every statement runs
//! in autocommit mode on the shared pool, so each mutating call is committed
//! before it returns. Rows are never physically removed here; deletion sets
//! the record's deletion timestamp and `restore` clears it again.

use crate::infrastructure::error::StoreError;
use crate::infrastructure::traits::{Changeset, Record, SqlValue};
use chrono::Utc;
use log::debug;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::marker::PhantomData;

/// Exact-match conjunction of column filters.
///
/// A [`SqlValue::Null`] value matches rows where the column `IS NULL`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(&'static str, SqlValue)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.clauses.push((column, value.into()));
        self
    }
}

/// Which rows a query may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Active,
    Deleted,
    Any,
}

pub struct Repository<E> {
    pool: SqlitePool,
    _record: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _record: PhantomData,
        }
    }
}

impl<E: Record> Repository<E> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    /// A repository for another record type bound to the same pool.
    pub fn sibling<T: Record>(&self) -> Repository<T> {
        Repository::new(self.pool.clone())
    }

    /// Returns the active record with this id.
    pub async fn get(&self, id: i64) -> Result<Option<E>, StoreError> {
        let filter = Filter::new().eq(E::PRIMARY_KEY, id);
        let mut query = self.select(Visibility::Active, filter)?;
        Ok(query.build_query_as::<E>().fetch_optional(&self.pool).await?)
    }

    /// Returns every active record matching the filter, by primary key.
    pub async fn list(&self, filter: Filter) -> Result<Vec<E>, StoreError> {
        let mut query = self.select(Visibility::Active, filter)?;
        Ok(query.build_query_as::<E>().fetch_all(&self.pool).await?)
    }

    /// Like [`Repository::list`], but soft-deleted rows are included.
    ///
    /// Reserved for admin tooling and cascade cleanup.
    pub async fn all(&self, filter: Filter) -> Result<Vec<E>, StoreError> {
        let mut query = self.select(Visibility::Any, filter)?;
        Ok(query.build_query_as::<E>().fetch_all(&self.pool).await?)
    }

    /// Returns only soft-deleted rows matching the filter.
    pub async fn deleted(&self, filter: Filter) -> Result<Vec<E>, StoreError> {
        let mut query = self.select(Visibility::Deleted, filter)?;
        Ok(query.build_query_as::<E>().fetch_all(&self.pool).await?)
    }

    pub async fn create(&self, new: E::New) -> Result<E, StoreError> {
        let values = new.into_values();
        self.check_columns(values.iter().map(|(column, _)| *column))?;

        let mut query = QueryBuilder::<Sqlite>::new(format!("INSERT INTO {} (created_at", E::TABLE));
        for (column, _) in &values {
            query.push(format!(", \"{column}\""));
        }
        query.push(") VALUES (");
        query.push_bind(Utc::now());
        for (_, value) in values {
            query.push(", ");
            push_value(&mut query, value);
        }
        query.push(") RETURNING *");

        let record = query.build_query_as::<E>().fetch_one(&self.pool).await?;
        debug!("created {} {}", E::TABLE, record.id());
        Ok(record)
    }

    /// Overwrites the supplied fields of an active record.
    ///
    /// Returns `None` when there is no active record with this id.
    pub async fn update(&self, id: i64, patch: E::Patch) -> Result<Option<E>, StoreError> {
        let values = patch.into_values();
        if values.is_empty() {
            return self.get(id).await;
        }
        self.check_columns(values.iter().map(|(column, _)| *column))?;

        let mut query = QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", E::TABLE));
        for (index, (column, value)) in values.into_iter().enumerate() {
            if index > 0 {
                query.push(", ");
            }
            query.push(format!("\"{column}\" = "));
            push_value(&mut query, value);
        }
        self.push_row_guard(&mut query, id, Visibility::Active);

        let record = query.build_query_as::<E>().fetch_optional(&self.pool).await?;
        if record.is_some() {
            debug!("updated {} {id}", E::TABLE);
        }
        Ok(record)
    }

    /// Soft-deletes an active record and returns it with its deletion timestamp set.
    ///
    /// Returns `None` when the record is absent or already deleted.
    pub async fn delete(&self, id: i64) -> Result<Option<E>, StoreError> {
        let mut query =
            QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET {} = ", E::TABLE, E::DELETED_AT));
        query.push_bind(Utc::now());
        self.push_row_guard(&mut query, id, Visibility::Active);

        let record = query.build_query_as::<E>().fetch_optional(&self.pool).await?;
        if record.is_some() {
            debug!("soft-deleted {} {id}", E::TABLE);
        }
        Ok(record)
    }

    /// Clears the deletion timestamp of a soft-deleted record.
    ///
    /// Returns `None` when the record is absent or still active.
    pub async fn restore(&self, id: i64) -> Result<Option<E>, StoreError> {
        let mut query =
            QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET {} = NULL", E::TABLE, E::DELETED_AT));
        self.push_row_guard(&mut query, id, Visibility::Deleted);

        let record = query.build_query_as::<E>().fetch_optional(&self.pool).await?;
        if record.is_some() {
            debug!("restored {} {id}", E::TABLE);
        }
        Ok(record)
    }

    /// Raw row count of the table, active and soft-deleted alike.
    pub async fn count_all(&self) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", E::TABLE))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    fn select(
        &self,
        visibility: Visibility,
        filter: Filter,
    ) -> Result<QueryBuilder<'static, Sqlite>, StoreError> {
        self.check_columns(filter.clauses.iter().map(|(column, _)| *column))?;

        let mut query = QueryBuilder::new(format!("SELECT * FROM {} WHERE 1 = 1", E::TABLE));
        push_visibility::<E>(&mut query, visibility);
        for (column, value) in filter.clauses {
            match value {
                SqlValue::Null => {
                    query.push(format!(" AND \"{column}\" IS NULL"));
                }
                value => {
                    query.push(format!(" AND \"{column}\" = "));
                    push_value(&mut query, value);
                }
            }
        }
        query.push(format!(" ORDER BY {}", E::PRIMARY_KEY));
        Ok(query)
    }

    fn push_row_guard(&self, query: &mut QueryBuilder<'_, Sqlite>, id: i64, visibility: Visibility) {
        query.push(format!(" WHERE {} = ", E::PRIMARY_KEY));
        query.push_bind(id);
        push_visibility::<E>(query, visibility);
        query.push(" RETURNING *");
    }

    fn check_columns(&self, columns: impl Iterator<Item = &'static str>) -> Result<(), StoreError> {
        for column in columns {
            if !E::COLUMNS.contains(&column) {
                return Err(StoreError::UnknownColumn {
                    table: E::TABLE,
                    column,
                });
            }
        }
        Ok(())
    }
}

fn push_visibility<E: Record>(query: &mut QueryBuilder<'_, Sqlite>, visibility: Visibility) {
    match visibility {
        Visibility::Active => {
            query.push(format!(" AND {} IS NULL", E::DELETED_AT));
        }
        Visibility::Deleted => {
            query.push(format!(" AND {} IS NOT NULL", E::DELETED_AT));
        }
        Visibility::Any => {}
    }
}

fn push_value(query: &mut QueryBuilder<'_, Sqlite>, value: SqlValue) {
    match value {
        SqlValue::Null => query.push("NULL"),
        SqlValue::Integer(value) => query.push_bind(value),
        SqlValue::Bool(value) => query.push_bind(value),
        SqlValue::Text(value) => query.push_bind(value),
        SqlValue::Timestamp(value) => query.push_bind(value),
    };
}
