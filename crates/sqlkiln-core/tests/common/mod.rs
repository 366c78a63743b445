#![allow(dead_code)]

use sqlkiln_core::dialect::{Capability, Dialect, DialectBuilder};
use sqlkiln_core::schema::{ColumnSpec, SchemaDescription};
use sqlkiln_core::{Error, Query, SqlValue};

pub fn generic() -> Dialect {
    Dialect::generic().unwrap_or_else(|e| panic!("generic dialect failed to build: {e}"))
}

/// A generic dialect that, like most engines, cannot limit or order
/// `UPDATE`/`DELETE` and does not report result-column origins.
pub fn restricted() -> Dialect {
    DialectBuilder::generic()
        .name("restricted")
        .without_capabilities([
            Capability::DeleteLimit,
            Capability::DeleteOrder,
            Capability::UpdateLimit,
            Capability::UpdateOrder,
            Capability::DeleteJoins,
            Capability::UpdateJoins,
            Capability::ResultColumnOrigin,
        ])
        .build()
        .unwrap_or_else(|e| panic!("restricted dialect failed to build: {e}"))
}

pub fn render_with(dialect: &Dialect, query: &Query) -> (String, Vec<SqlValue>) {
    let (sql, binds) = dialect
        .render(query)
        .unwrap_or_else(|e| panic!("Failed to render: {query:?}\nError: {e}"));
    (sql, binds.into_iter().map(|b| b.value).collect())
}

pub fn render(query: &Query) -> (String, Vec<SqlValue>) {
    render_with(&generic(), query)
}

pub fn render_err(dialect: &Dialect, query: &Query) -> Error {
    match dialect.render(query) {
        Ok((sql, _)) => panic!("Expected render error, got: {sql}"),
        Err(e) => e,
    }
}

/// Counts `?` placeholders outside quoted text.
pub fn placeholder_count(sql: &str) -> usize {
    let mut quote = None;
    let mut count = 0;
    for c in sql.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == '?' => count += 1,
            None => {}
        }
    }
    count
}

pub fn users_schema() -> SchemaDescription {
    SchemaDescription::new("users")
        .with_column(ColumnSpec::new("id", "int").primary().auto_increment())
        .with_column(ColumnSpec::new("name", "varchar").nullable(true))
}
