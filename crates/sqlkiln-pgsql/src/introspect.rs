//! Schema introspection through `information_schema`.

use std::time::Duration;

use sqlkiln_core::introspect::{
    parse_type_string, CatalogExecutor, CatalogRow, Introspect, TtlCache, DESCRIBE_TABLE,
    LIST_TABLES,
};
use sqlkiln_core::schema::{ColumnOptions, ColumnSpec, DefaultValue, Length, SchemaDescription};
use sqlkiln_core::{Dialect, Error, Result, SqlValue};

/// Default schema searched for tables.
pub const DEFAULT_SCHEMA: &str = "public";

/// Default lifetime of cached introspection results.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

const DESCRIBE_TABLE_SQL: &str = "SELECT column_name::text, data_type::text, \
     character_maximum_length::text, numeric_precision::text, numeric_scale::text, \
     is_nullable::text, column_default::text, character_set_name::text, collation_name::text \
     FROM information_schema.columns \
     WHERE table_catalog = ? AND table_schema = ? AND table_name = ? \
     ORDER BY ordinal_position;";

const LIST_TABLES_SQL: &str = "SELECT table_name::text FROM information_schema.tables \
     WHERE table_schema = ? AND table_catalog = ? ORDER BY table_name;";

/// Where and how long to look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrospectConfig {
    /// Database (catalog) name.
    pub database: String,
    /// Schema searched for tables.
    pub schema: String,
    /// Lifetime of cached results. Zero disables the cache.
    pub cache_ttl: Duration,
}

impl IntrospectConfig {
    /// Creates a configuration for `database` with the defaults.
    #[must_use]
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            schema: DEFAULT_SCHEMA.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Sets the schema.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Sets the cache lifetime.
    #[must_use]
    pub const fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

/// Reads table descriptions from a PostgreSQL catalog.
pub struct PgsqlIntrospector<E: CatalogExecutor> {
    executor: E,
    dialect: Dialect,
    config: IntrospectConfig,
    described: TtlCache<SchemaDescription>,
    listed: TtlCache<Vec<String>>,
}

impl<E: CatalogExecutor> PgsqlIntrospector<E> {
    /// Creates an introspector. `dialect` resolves the reported types.
    pub fn new(executor: E, dialect: Dialect, config: IntrospectConfig) -> Self {
        Self {
            described: TtlCache::new(config.cache_ttl),
            listed: TtlCache::new(config.cache_ttl),
            executor,
            dialect,
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &IntrospectConfig {
        &self.config
    }

    /// Returns the dialect used to resolve types.
    #[must_use]
    pub const fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Number of cached descriptions and table lists.
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.described.len() + self.listed.len()
    }

    /// Forgets every cached result.
    pub fn clear_cache(&self) {
        self.described.clear();
        self.listed.clear();
    }

    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<CatalogRow>> {
        tracing::trace!(sql, params = params.len(), "catalog query");
        self.executor
            .execute_query(sql, params)
            .await
            .map_err(Error::catalog)
    }

    async fn fetch_description(&self, table: &str) -> Result<SchemaDescription> {
        let params = [
            SqlValue::Text(self.config.database.clone()),
            SqlValue::Text(self.config.schema.clone()),
            SqlValue::Text(table.to_string()),
        ];
        let rows = self.query(DESCRIBE_TABLE_SQL, &params).await?;

        let mut schema = SchemaDescription::new(table);
        for row in &rows {
            schema.add_column(self.column_from_row(row)?);
        }
        tracing::debug!(table, columns = schema.columns.len(), "described table");
        Ok(schema)
    }

    async fn fetch_tables(&self, database: &str) -> Result<Vec<String>> {
        let params = [
            SqlValue::Text(self.config.schema.clone()),
            SqlValue::Text(database.to_string()),
        ];
        let rows = self.query(LIST_TABLES_SQL, &params).await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get("table_name"))
            .map(ToString::to_string)
            .collect())
    }

    /// Rebuilds one column from its `information_schema.columns` row.
    fn column_from_row(&self, row: &CatalogRow) -> Result<ColumnSpec> {
        let name = row
            .get("column_name")
            .ok_or_else(|| Error::catalog(MissingColumn("column_name")))?;
        let reported = row
            .get("data_type")
            .ok_or_else(|| Error::catalog(MissingColumn("data_type")))?;

        let (data_type, embedded_length) = parse_type_string(reported);
        let defaults = self.dialect.resolve_type(&data_type)?.default_options();

        let length = if matches!(data_type.as_str(), "numeric" | "decimal") {
            precision(row).or(embedded_length)
        } else {
            row.get("character_maximum_length")
                .and_then(|len| len.parse().ok())
                .map(Length::Size)
                .or(embedded_length)
        };

        let raw_default = row.get("column_default");
        let sequence_backed = raw_default.is_some_and(|d| d.contains("_seq"));

        let introspected = ColumnOptions {
            nullable: Some(row.get("is_nullable") == Some("YES")),
            default: raw_default.map(parse_default),
            primary: sequence_backed.then_some(true),
            auto_increment: sequence_backed.then_some(true),
            length,
            ..ColumnOptions::default()
        };

        let mut column = ColumnSpec::new(name, data_type);
        column.options = introspected.merged_with(defaults);
        column.charset = row.get("character_set_name").map(ToString::to_string);
        column.collation = row.get("collation_name").map(ToString::to_string);
        Ok(column)
    }
}

impl<E: CatalogExecutor> Introspect for PgsqlIntrospector<E> {
    async fn describe_table(&self, table: &str) -> Result<SchemaDescription> {
        self.described
            .get_or_try_insert_with(DESCRIBE_TABLE, table, || self.fetch_description(table))
            .await
    }

    async fn list_tables(&self, database: Option<&str>) -> Result<Vec<String>> {
        let database = database.unwrap_or(&self.config.database);
        self.listed
            .get_or_try_insert_with(LIST_TABLES, database, || self.fetch_tables(database))
            .await
    }
}

/// A catalog row lacked a column the introspector needs.
#[derive(Debug, thiserror::Error)]
#[error("catalog row has no `{0}` column")]
struct MissingColumn(&'static str);

fn precision(row: &CatalogRow) -> Option<Length> {
    let precision = row.get("numeric_precision")?.parse().ok()?;
    let scale = row.get("numeric_scale")?.parse().ok()?;
    Some(Length::Precision(precision, scale))
}

/// Parses a `column_default` expression as PostgreSQL reports it.
///
/// `NULL::text` is a null default, `'abc'::character varying` a string,
/// bare numbers and booleans are literals. Everything else, sequence calls
/// included, stays a raw expression.
#[must_use]
pub fn parse_default(reported: &str) -> DefaultValue {
    let trimmed = reported.trim();

    if let Some(literal) = quoted_literal(trimmed) {
        return DefaultValue::String(literal);
    }

    let head = trimmed
        .split_once("::")
        .map_or(trimmed, |(head, _)| head)
        .trim();
    let head = head
        .strip_prefix('(')
        .and_then(|h| h.strip_suffix(')'))
        .unwrap_or(head);

    if head.eq_ignore_ascii_case("null") {
        return DefaultValue::Null;
    }
    if head.eq_ignore_ascii_case("true") {
        return DefaultValue::Boolean(true);
    }
    if head.eq_ignore_ascii_case("false") {
        return DefaultValue::Boolean(false);
    }
    if let Ok(integer) = head.parse::<i64>() {
        return DefaultValue::Integer(integer);
    }
    if let Ok(float) = head.parse::<f64>() {
        if float.is_finite() {
            return DefaultValue::Float(float);
        }
    }
    DefaultValue::Expression(trimmed.to_string())
}

/// `'it''s'::text` to `it's`; `None` unless the whole expression is one
/// quoted literal with an optional cast.
fn quoted_literal(expr: &str) -> Option<String> {
    let body = expr.strip_prefix('\'')?;
    let mut literal = String::new();
    let mut chars = body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '\'' {
            literal.push(c);
            continue;
        }
        if chars.peek().is_some_and(|(_, next)| *next == '\'') {
            chars.next();
            literal.push('\'');
            continue;
        }
        let rest = &body[i + 1..];
        return (rest.is_empty() || rest.starts_with("::")).then_some(literal);
    }
    None
}
