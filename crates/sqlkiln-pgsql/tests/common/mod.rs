#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use sqlkiln_core::introspect::{CatalogExecutor, CatalogRow};
use sqlkiln_core::{Dialect, Error, Query, SqlValue};

pub fn pgsql() -> Dialect {
    sqlkiln_pgsql::dialect().unwrap_or_else(|e| panic!("pgsql dialect failed to build: {e}"))
}

pub fn render(query: &Query) -> (String, Vec<SqlValue>) {
    let (sql, binds) = pgsql()
        .render(query)
        .unwrap_or_else(|e| panic!("Failed to render: {query:?}\nError: {e}"));
    (sql, binds.into_iter().map(|b| b.value).collect())
}

pub fn sql(query: &Query) -> String {
    render(query).0
}

pub fn render_err(query: &Query) -> Error {
    match pgsql().render(query) {
        Ok((sql, _)) => panic!("Expected render error, got: {sql}"),
        Err(e) => e,
    }
}

/// One `information_schema.columns` row as PostgreSQL reports it.
pub struct ColumnRow<'a> {
    pub name: &'a str,
    pub data_type: &'a str,
    pub max_length: Option<&'a str>,
    pub nullable: bool,
    pub default: Option<&'a str>,
}

impl<'a> ColumnRow<'a> {
    pub const fn new(name: &'a str, data_type: &'a str) -> Self {
        Self {
            name,
            data_type,
            max_length: None,
            nullable: true,
            default: None,
        }
    }

    pub const fn max_length(mut self, length: &'a str) -> Self {
        self.max_length = Some(length);
        self
    }

    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub const fn default(mut self, default: &'a str) -> Self {
        self.default = Some(default);
        self
    }

    pub fn build(&self) -> CatalogRow {
        CatalogRow::new()
            .with("column_name", Some(self.name))
            .with("data_type", Some(self.data_type))
            .with("character_maximum_length", self.max_length)
            .with("numeric_precision", None::<String>)
            .with("numeric_scale", None::<String>)
            .with("is_nullable", Some(if self.nullable { "YES" } else { "NO" }))
            .with("column_default", self.default)
            .with("character_set_name", None::<String>)
            .with("collation_name", None::<String>)
    }
}

/// The catalog rows of `users (id serial primary key, name varchar(255))`.
pub fn users_rows() -> Vec<CatalogRow> {
    vec![
        ColumnRow::new("id", "integer")
            .not_null()
            .default("nextval('users_id_seq'::regclass)")
            .build(),
        ColumnRow::new("name", "character varying")
            .max_length("255")
            .build(),
    ]
}

/// An in-memory catalog that records every query it answers.
#[derive(Default)]
pub struct FakeCatalog {
    columns: Mutex<HashMap<String, Vec<CatalogRow>>>,
    tables: Mutex<Vec<String>>,
    calls: Mutex<Vec<(String, Vec<SqlValue>)>>,
    offline: AtomicBool,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(self, table: &str, rows: Vec<CatalogRow>) -> Self {
        self.set_table(table, rows);
        self
    }

    pub fn set_table(&self, table: &str, rows: Vec<CatalogRow>) {
        self.columns
            .lock()
            .unwrap_or_else(|e| panic!("poisoned: {e}"))
            .insert(table.to_string(), rows);
        let mut tables = self.tables.lock().unwrap_or_else(|e| panic!("poisoned: {e}"));
        if !tables.iter().any(|t| t == table) {
            tables.push(table.to_string());
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<(String, Vec<SqlValue>)> {
        self.calls
            .lock()
            .unwrap_or_else(|e| panic!("poisoned: {e}"))
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

impl CatalogExecutor for FakeCatalog {
    type Error = std::io::Error;

    async fn execute_query(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<CatalogRow>, Self::Error> {
        self.calls
            .lock()
            .unwrap_or_else(|e| panic!("poisoned: {e}"))
            .push((sql.to_string(), params.to_vec()));

        // Suspend once so concurrent callers interleave like a real round trip.
        tokio::task::yield_now().await;

        if self.offline.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("catalog offline"));
        }

        if sql.contains("information_schema.columns") {
            let table = params.get(2).and_then(SqlValue::as_text).unwrap_or_default();
            let columns = self.columns.lock().unwrap_or_else(|e| panic!("poisoned: {e}"));
            return Ok(columns.get(table).cloned().unwrap_or_default());
        }

        let tables = self.tables.lock().unwrap_or_else(|e| panic!("poisoned: {e}"));
        Ok(tables
            .iter()
            .map(|name| CatalogRow::new().with("table_name", Some(name.as_str())))
            .collect())
    }
}
