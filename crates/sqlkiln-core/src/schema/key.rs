//! Table keys: primary, unique, foreign and plain indexes.

use serde::{Deserialize, Serialize};

/// Sort direction for ordering and index columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// The keyword symbol naming this direction.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Asc => crate::dialect::symbols::ASC,
            Self::Desc => crate::dialect::symbols::DESC,
        }
    }
}

/// Foreign key referential action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyAction {
    /// No action.
    NoAction,
    /// Restrict deletion/update.
    Restrict,
    /// Cascade the operation.
    Cascade,
    /// Set to NULL.
    SetNull,
    /// Set to default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// The keyword symbol naming this action.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        use crate::dialect::symbols;
        match self {
            Self::NoAction => symbols::NO_ACTION,
            Self::Restrict => symbols::RESTRICT,
            Self::Cascade => symbols::CASCADE,
            Self::SetNull => symbols::SET_NULL,
            Self::SetDefault => symbols::SET_DEFAULT,
        }
    }
}

/// A column reference inside a unique key or index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    /// Column name.
    pub name: String,
    /// Prefix length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// Sort order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

impl IndexColumn {
    /// Creates a plain column reference.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            length: None,
            order: None,
        }
    }

    /// Sets the prefix length.
    #[must_use]
    pub const fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub const fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }
}

impl From<&str> for IndexColumn {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A table-level key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeySpec {
    /// PRIMARY KEY over one or more columns.
    Primary {
        /// Optional constraint name.
        #[serde(default)]
        constraint: Option<String>,
        /// Key columns in order.
        columns: Vec<String>,
    },
    /// UNIQUE key.
    Unique {
        /// Index name.
        name: String,
        /// Optional constraint name.
        #[serde(default)]
        constraint: Option<String>,
        /// Key columns in order.
        columns: Vec<IndexColumn>,
    },
    /// FOREIGN KEY from one column to `table.column`.
    Foreign {
        /// Local column.
        column: String,
        /// Referenced `table.column`.
        references: String,
        /// Optional constraint name.
        #[serde(default)]
        constraint: Option<String>,
        /// ON UPDATE action.
        #[serde(default)]
        on_update: Option<ForeignKeyAction>,
        /// ON DELETE action.
        #[serde(default)]
        on_delete: Option<ForeignKeyAction>,
    },
    /// Plain index.
    Index {
        /// Index name.
        name: String,
        /// Indexed columns in order.
        columns: Vec<IndexColumn>,
    },
}

impl KeySpec {
    /// Creates a foreign key with no actions.
    #[must_use]
    pub fn foreign(column: impl Into<String>, references: impl Into<String>) -> Self {
        Self::Foreign {
            column: column.into(),
            references: references.into(),
            constraint: None,
            on_update: None,
            on_delete: None,
        }
    }

    /// Position in the fixed rendering order.
    pub(crate) const fn rank(&self) -> u8 {
        match self {
            Self::Primary { .. } => 0,
            Self::Unique { .. } => 1,
            Self::Foreign { .. } => 2,
            Self::Index { .. } => 3,
        }
    }
}
