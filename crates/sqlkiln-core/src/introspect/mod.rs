//! Catalog introspection contracts.
//!
//! Driver crates implement [`Introspect`] by issuing catalog queries through a
//! [`CatalogExecutor`] and reconstructing a [`SchemaDescription`] from the
//! rows. Results are memoized in a [`TtlCache`].

mod cache;

pub use cache::TtlCache;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::{Length, SchemaDescription};
use crate::value::SqlValue;

/// Cache operation name for [`Introspect::describe_table`].
pub const DESCRIBE_TABLE: &str = "describe_table";

/// Cache operation name for [`Introspect::list_tables`].
pub const LIST_TABLES: &str = "list_tables";

/// One catalog row: column name to text value, `None` for SQL `NULL`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow(BTreeMap<String, Option<String>>);

impl CatalogRow {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column, returning the row for chaining.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.insert(column, value);
        self
    }

    /// Sets a column.
    pub fn insert(&mut self, column: impl Into<String>, value: Option<impl Into<String>>) {
        self.0.insert(column.into(), value.map(Into::into));
    }

    /// Returns a non-null column value.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).and_then(Option::as_deref)
    }

    /// Whether the row has a column, null or not.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for CatalogRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        )
    }
}

/// Runs catalog queries on behalf of an introspector.
///
/// SQL uses `?` placeholders; adapters rewrite them for their engine.
#[allow(async_fn_in_trait)]
pub trait CatalogExecutor {
    /// The collaborator's own failure type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Executes `sql` with positional `params` and returns every row.
    async fn execute_query(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> std::result::Result<Vec<CatalogRow>, Self::Error>;
}

impl<T: CatalogExecutor> CatalogExecutor for &T {
    type Error = T::Error;

    async fn execute_query(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> std::result::Result<Vec<CatalogRow>, Self::Error> {
        (**self).execute_query(sql, params).await
    }
}

/// Reconstructs abstract schema descriptions from a live catalog.
#[allow(async_fn_in_trait)]
pub trait Introspect {
    /// Describes one table. A table the catalog does not know yields an
    /// empty column set.
    async fn describe_table(&self, table: &str) -> Result<SchemaDescription>;

    /// Lists table names in catalog order. `None` uses the configured
    /// database.
    async fn list_tables(&self, database: Option<&str>) -> Result<Vec<String>>;
}

/// Splits a reported type such as `numeric(8,2)` into its base name and
/// length.
///
/// The name is lowercased and whitespace-normalized; text after the
/// parentheses stays part of the name (`timestamp(6) without time zone`).
/// A length that does not parse is dropped.
#[must_use]
pub fn parse_type_string(reported: &str) -> (String, Option<Length>) {
    let reported = reported.trim().to_lowercase();
    let Some((head, rest)) = reported.split_once('(') else {
        return (normalize_spaces(&reported), None);
    };
    let Some((inside, tail)) = rest.split_once(')') else {
        return (normalize_spaces(&reported), None);
    };
    let name = normalize_spaces(&format!("{head} {tail}"));
    let length = inside.replace(' ', "").parse().ok();
    (name, length)
}

fn normalize_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_type_string() {
        assert_eq!(
            parse_type_string("numeric(8,2)"),
            (String::from("numeric"), Some(Length::Precision(8, 2)))
        );
        assert_eq!(
            parse_type_string("character varying(255)"),
            (String::from("character varying"), Some(Length::Size(255)))
        );
        assert_eq!(
            parse_type_string("Timestamp(6)  without time zone"),
            (
                String::from("timestamp without time zone"),
                Some(Length::Size(6))
            )
        );
        assert_eq!(parse_type_string("INTEGER"), (String::from("integer"), None));
        assert_eq!(parse_type_string("bit(x)"), (String::from("bit"), None));
        assert_eq!(parse_type_string("broken(5"), (String::from("broken(5"), None));
    }

    #[test]
    fn test_catalog_row_nulls() {
        let row = CatalogRow::new()
            .with("column_name", Some("id"))
            .with("column_default", None::<String>);
        assert_eq!(row.get("column_name"), Some("id"));
        assert_eq!(row.get("column_default"), None);
        assert!(row.contains("column_default"));
        assert!(!row.contains("collation_name"));
    }

    #[test]
    fn test_catalog_row_from_iter() {
        let row: CatalogRow = [("table_name", Some("users")), ("comment", None)]
            .into_iter()
            .collect();
        assert_eq!(row.get("table_name"), Some("users"));
        assert!(row.contains("comment"));
    }
}
