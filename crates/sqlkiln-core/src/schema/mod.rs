//! Abstract table descriptions.
//!
//! A [`SchemaDescription`] is what `CREATE TABLE` is rendered from and what
//! catalog introspection reconstructs. Column order is insertion order and
//! decides the order of the rendered column definitions.

mod column;
mod key;

pub use column::{ColumnOptions, ColumnSpec, DefaultValue, Length};
pub use key::{ForeignKeyAction, IndexColumn, KeySpec, SortOrder};

use serde::{Deserialize, Serialize};

/// A table: ordered columns, keys and free-form engine options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescription {
    /// Table name.
    pub table: String,
    /// Columns in declaration order.
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    /// Table-level keys.
    #[serde(default)]
    pub keys: Vec<KeySpec>,
    /// Engine options as ordered name/value pairs.
    #[serde(default)]
    pub options: Vec<(String, String)>,
}

impl SchemaDescription {
    /// Creates an empty description for `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Adds a column, returning the description for chaining.
    #[must_use]
    pub fn with_column(mut self, column: ColumnSpec) -> Self {
        self.add_column(column);
        self
    }

    /// Adds a column.
    ///
    /// A column with the same name is replaced in place. Primary, unique and
    /// indexed columns register the matching key once.
    pub fn add_column(&mut self, column: ColumnSpec) -> &mut Self {
        if column.is_primary() {
            self.add_primary(&column.name);
        }
        if column.is_unique() {
            self.add_unique(&column.name, None);
        }
        if column.index {
            self.add_index(&column.name);
        }

        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        self
    }

    /// Adds a column to the primary key, creating the key if needed.
    pub fn add_primary(&mut self, column: &str) -> &mut Self {
        let existing = self.keys.iter_mut().find_map(|key| match key {
            KeySpec::Primary { columns, .. } => Some(columns),
            _ => None,
        });
        match existing {
            Some(columns) => {
                if !columns.iter().any(|c| c == column) {
                    columns.push(column.to_string());
                }
            }
            None => self.keys.push(KeySpec::Primary {
                constraint: None,
                columns: vec![column.to_string()],
            }),
        }
        self
    }

    /// Adds a single-column unique key named after the column.
    pub fn add_unique(&mut self, column: &str, constraint: Option<&str>) -> &mut Self {
        let exists = self
            .keys
            .iter()
            .any(|key| matches!(key, KeySpec::Unique { name, .. } if name == column));
        if !exists {
            self.keys.push(KeySpec::Unique {
                name: column.to_string(),
                constraint: constraint.map(ToString::to_string),
                columns: vec![IndexColumn::new(column)],
            });
        }
        self
    }

    /// Adds a single-column index named after the column.
    pub fn add_index(&mut self, column: &str) -> &mut Self {
        let exists = self
            .keys
            .iter()
            .any(|key| matches!(key, KeySpec::Index { name, .. } if name == column));
        if !exists {
            self.keys.push(KeySpec::Index {
                name: column.to_string(),
                columns: vec![IndexColumn::new(column)],
            });
        }
        self
    }

    /// Adds an arbitrary key.
    pub fn add_key(&mut self, key: KeySpec) -> &mut Self {
        self.keys.push(key);
        self
    }

    /// Appends an engine option.
    pub fn add_option(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.options.push((name.into(), value.into()));
        self
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns of the primary key, in key order.
    #[must_use]
    pub fn primary_columns(&self) -> Vec<&str> {
        self.keys
            .iter()
            .find_map(|key| match key {
                KeySpec::Primary { columns, .. } => {
                    Some(columns.iter().map(String::as_str).collect())
                }
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Compares column set, types, nullability and primary key.
    ///
    /// Exact DDL text, defaults and secondary keys may differ.
    #[must_use]
    pub fn equivalent(&self, other: &Self) -> bool {
        if self.columns.len() != other.columns.len() {
            return false;
        }
        let columns_match = self.columns.iter().all(|ours| {
            other.column(&ours.name).is_some_and(|theirs| {
                ours.data_type.eq_ignore_ascii_case(&theirs.data_type)
                    && ours.is_nullable() == theirs.is_nullable()
                    && ours.is_primary() == theirs.is_primary()
            })
        });
        columns_match && self.primary_columns() == other.primary_columns()
    }
}
