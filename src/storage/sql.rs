//! Statement builders shared by the PostgreSQL and MySQL backends.
//!
//! Each entity maps to its own table named by `Entity::resource_name()`:
//! an auto-increment integer `id` plus one column per field. Unique fields
//! become `VARCHAR(255) NOT NULL UNIQUE`, the rest `TEXT NOT NULL`.
//!
//! Column names only ever come from `Entity::fields()`, so the statements
//! never interpolate request data.

use crate::core::entity::Entity;
use crate::core::error::{EntityError, StackError, StorageError};

/// SQL flavour of a relational backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    Postgres,
    MySql,
}

impl Dialect {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Dialect::Postgres => "PostgreSQL",
            Dialect::MySql => "MySQL",
        }
    }

    /// Bind placeholder for the `n`-th parameter (1-based)
    fn placeholder(self, n: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", n),
            Dialect::MySql => "?".to_string(),
        }
    }

    fn id_column(self) -> &'static str {
        match self {
            Dialect::Postgres => "id BIGSERIAL PRIMARY KEY",
            Dialect::MySql => "id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY",
        }
    }
}

fn column_list<E: Entity>() -> String {
    std::iter::once("id")
        .chain(E::fields().iter().copied())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn create_table<E: Entity>(dialect: Dialect) -> String {
    let mut columns = vec![dialect.id_column().to_string()];
    for field in E::fields() {
        if E::is_unique(field) {
            columns.push(format!("{} VARCHAR(255) NOT NULL UNIQUE", field));
        } else {
            columns.push(format!("{} TEXT NOT NULL", field));
        }
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        E::resource_name(),
        columns.join(", ")
    )
}

pub(crate) fn select_all<E: Entity>() -> String {
    format!(
        "SELECT {} FROM {} ORDER BY id",
        column_list::<E>(),
        E::resource_name()
    )
}

pub(crate) fn select_by_id<E: Entity>(dialect: Dialect) -> String {
    format!(
        "SELECT {} FROM {} WHERE id = {}",
        column_list::<E>(),
        E::resource_name(),
        dialect.placeholder(1)
    )
}

/// `field` must already be checked with `Entity::has_field`
pub(crate) fn select_by_field<E: Entity>(dialect: Dialect, field: &str) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = {}",
        column_list::<E>(),
        E::resource_name(),
        field,
        dialect.placeholder(1)
    )
}

pub(crate) fn insert<E: Entity>(dialect: Dialect, columns: &[&str]) -> String {
    let placeholders: Vec<String> = (1..=columns.len())
        .map(|n| dialect.placeholder(n))
        .collect();
    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        E::resource_name(),
        columns.join(", "),
        placeholders.join(", ")
    );
    if dialect == Dialect::Postgres {
        sql.push_str(" RETURNING id");
    }
    sql
}

/// The id is bound after the column values
pub(crate) fn update<E: Entity>(dialect: Dialect, columns: &[&str]) -> String {
    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = {}", column, dialect.placeholder(i + 1)))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE id = {}",
        E::resource_name(),
        assignments.join(", "),
        dialect.placeholder(columns.len() + 1)
    )
}

pub(crate) fn delete<E: Entity>(dialect: Dialect) -> String {
    format!(
        "DELETE FROM {} WHERE id = {}",
        E::resource_name(),
        dialect.placeholder(1)
    )
}

/// Map a sqlx error, turning unique violations into conflicts
pub(crate) fn map_error<E: Entity>(dialect: Dialect, err: sqlx::Error, action: &str) -> StackError {
    if matches!(&err, sqlx::Error::Database(db_err) if db_err.is_unique_violation()) {
        tracing::warn!(table = E::resource_name(), "unique constraint rejected write");
        return EntityError::already_exists(E::label(), E::unique_fields()).into();
    }
    tracing::warn!(table = E::resource_name(), error = %err, "{} failed", action);
    StorageError::query(dialect.name(), format!("failed to {}: {}", action, err)).into()
}

pub(crate) fn malformed<E: Entity>(dialect: Dialect, err: sqlx::Error) -> StackError {
    StorageError::MalformedRecord {
        backend: dialect.name().to_string(),
        entity_type: E::label().to_string(),
        message: err.to_string(),
    }
    .into()
}
