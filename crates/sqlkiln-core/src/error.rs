//! Error types for rendering and introspection.

use thiserror::Error;

use crate::dialect::Capability;
use crate::query::QueryKind;

/// Errors raised while rendering SQL or reconstructing a schema.
///
/// Every variant except [`Error::Catalog`] is a deterministic function of the
/// input and the active dialect, so none of them is worth retrying.
#[derive(Debug, Error)]
pub enum Error {
    /// A logical column type is not registered with the dialect.
    #[error("unknown column type: {0}")]
    UnknownType(String),

    /// A keyword or clause was requested that the dialect does not define.
    #[error("unknown {kind} symbol: {name}")]
    UnknownSymbol {
        /// Either `keyword` or `clause`.
        kind: &'static str,
        /// The symbol name that failed to resolve.
        name: String,
    },

    /// The dialect has no statement template for the operation.
    #[error("no statement template named '{0}'")]
    MissingTemplate(String),

    /// A table-scoped statement was given no target table.
    #[error("{0} statement requires a table")]
    MissingTable(QueryKind),

    /// An insert, update or index statement was given no field values.
    #[error("{0} statement requires at least one field")]
    MissingFields(QueryKind),

    /// The dialect rejects a construct instead of dropping it.
    #[error("{capability} is not supported for {kind} statements by the {dialect} dialect")]
    UnsupportedCapability {
        /// Dialect name.
        dialect: &'static str,
        /// The capability the query relies on.
        capability: Capability,
        /// The operation being rendered.
        kind: QueryKind,
    },

    /// A DDL statement was rendered without a schema description.
    #[error("{0} statement requires a schema description")]
    MissingSchema(QueryKind),

    /// The query is structurally malformed (mismatched records, an operator
    /// paired with the wrong kind of value, a missing index name).
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A dialect was configured with a collation pattern that does not compile.
    #[error("invalid collation pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Failure reported by the catalog collaborator, passed through unchanged.
    #[error("catalog query failed: {0}")]
    Catalog(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Creates an invalid query error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidQuery(reason.into())
    }

    /// Creates an unknown keyword error.
    pub fn unknown_keyword(name: impl Into<String>) -> Self {
        Self::UnknownSymbol {
            kind: "keyword",
            name: name.into(),
        }
    }

    /// Creates an unknown clause error.
    pub fn unknown_clause(name: impl Into<String>) -> Self {
        Self::UnknownSymbol {
            kind: "clause",
            name: name.into(),
        }
    }

    /// Wraps a collaborator error.
    pub fn catalog<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Catalog(Box::new(err))
    }
}

/// Result type alias for sqlkiln operations.
pub type Result<T> = std::result::Result<T, Error>;
