//! # sqlkiln-core
//!
//! Dialect-driven SQL rendering and schema description.
//!
//! This crate provides:
//! - A case-insensitive type registry mapping logical column types to
//!   descriptors with default options, binding kinds and value conversions
//! - Keyword, clause and statement-template tables composed per dialect
//! - Per-operation attributes rendered into template slots
//! - Column and table-key formatting for `CREATE TABLE`
//! - A renderer turning an abstract [`Query`] into `(sql, binds)`
//! - The introspection cache and the catalog collaborator trait that
//!   driver crates build on
//!
//! ## Rendering
//!
//! ```rust
//! use sqlkiln_core::dialect::Dialect;
//! use sqlkiln_core::query::{Predicate, Query, QueryKind};
//!
//! let dialect = Dialect::generic().unwrap();
//! let query = Query::new(QueryKind::Select)
//!     .from("users")
//!     .where_clause(Predicate::and().eq("id", 5));
//!
//! let (sql, binds) = dialect.render(&query).unwrap();
//! assert_eq!(sql, r#"SELECT * FROM "users" WHERE "id" = ?;"#);
//! assert_eq!(binds.len(), 1);
//! ```
//!
//! Values never reach the SQL text: every predicate leaf contributes one `?`
//! and one entry in the bind list, in the same order.

pub mod dialect;
pub mod error;
pub mod introspect;
pub mod query;
pub mod render;
pub mod schema;
pub mod types;
pub mod value;

pub use dialect::{Capability, Dialect, DialectBuilder};
pub use error::{Error, Result};
pub use query::{Field, Predicate, Query, QueryKind};
pub use schema::{ColumnSpec, KeySpec, SchemaDescription};
pub use types::{TypeDescriptor, TypeRegistry};
pub use value::{Binding, BindingKind, SqlValue, ToSqlValue};
