//! Catalog queries over a `sqlx` PostgreSQL pool.

use sqlx::postgres::{PgArguments, PgPool, PgRow};
use sqlx::query::Query;
use sqlx::{Column, Postgres, Row};

use sqlkiln_core::introspect::{CatalogExecutor, CatalogRow};
use sqlkiln_core::{Binding, BindingKind, SqlValue};

/// Runs catalog queries on a connection pool.
///
/// Every selected column must be readable as text; the introspection
/// queries cast theirs with `::text`.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    /// Wraps a pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Name of the database the pool is connected to.
    pub async fn current_database(&self) -> Result<String, sqlx::Error> {
        sqlx::query_scalar("SELECT current_database()::text")
            .fetch_one(&self.pool)
            .await
    }

    /// Executes a rendered statement with its bindings, returning the
    /// number of affected rows.
    pub async fn execute(&self, sql: &str, binds: &[Binding]) -> Result<u64, sqlx::Error> {
        let sql = rewrite_placeholders(sql);
        tracing::debug!(sql = %sql, binds = binds.len(), "executing statement");
        let mut query = sqlx::query(&sql);
        for binding in binds {
            query = bind_as(query, &binding.value, binding.kind);
        }
        Ok(query.execute(&self.pool).await?.rows_affected())
    }
}

impl CatalogExecutor for PgCatalog {
    type Error = sqlx::Error;

    async fn execute_query(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<CatalogRow>, Self::Error> {
        let sql = rewrite_placeholders(sql);
        let mut query = sqlx::query(&sql);
        for param in params {
            query = bind_as(query, param, param.binding_kind());
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(catalog_row).collect()
    }
}

fn catalog_row(row: &PgRow) -> Result<CatalogRow, sqlx::Error> {
    let mut out = CatalogRow::new();
    for column in row.columns() {
        let value: Option<String> = row.try_get(column.ordinal())?;
        out.insert(column.name(), value);
    }
    Ok(out)
}

fn bind_as<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &SqlValue,
    kind: BindingKind,
) -> Query<'q, Postgres, PgArguments> {
    match coerce(value, kind) {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
    }
}

/// Converts a value to the representation its binding kind asks for.
/// Values that cannot be converted are bound as they are.
fn coerce(value: &SqlValue, kind: BindingKind) -> SqlValue {
    match (kind, value) {
        (BindingKind::Null, _) => SqlValue::Null,
        (BindingKind::Int, SqlValue::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map_or_else(|_| value.clone(), SqlValue::Int),
        (BindingKind::Int, SqlValue::Bool(b)) => SqlValue::Int(i64::from(*b)),
        (BindingKind::Float, SqlValue::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_or_else(|_| value.clone(), SqlValue::Float),
        #[allow(clippy::cast_precision_loss)]
        (BindingKind::Float, SqlValue::Int(i)) => SqlValue::Float(*i as f64),
        (BindingKind::String, SqlValue::Int(i)) => SqlValue::Text(i.to_string()),
        (BindingKind::String, SqlValue::Float(f)) => SqlValue::Text(f.to_string()),
        (BindingKind::Bool, SqlValue::Int(i)) => SqlValue::Bool(*i != 0),
        _ => value.clone(),
    }
}

/// Rewrites `?` placeholders to PostgreSQL's `$1, $2, ...`.
///
/// Question marks inside single-quoted literals or double-quoted
/// identifiers are left alone.
#[must_use]
pub fn rewrite_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut quote: Option<char> = None;
    let mut index = 0;
    for c in sql.chars() {
        match (quote, c) {
            (None, '\'' | '"') => {
                quote = Some(c);
                out.push(c);
            }
            (Some(open), _) if c == open => {
                quote = None;
                out.push(c);
            }
            (None, '?') => {
                index += 1;
                out.push('$');
                out.push_str(&index.to_string());
            }
            _ => out.push(c),
        }
    }
    out
}
