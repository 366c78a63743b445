//! # sqlkiln-pgsql
//!
//! PostgreSQL dialect, types and catalog introspection for `sqlkiln-core`.
//!
//! # How PostgreSQL differs from the generic dialect
//!
//! - **No inline indexes**: `CREATE TABLE` cannot declare plain indexes, so
//!   index keys are left out and need a separate `CREATE INDEX`.
//! - **[UPDATE] and [DELETE]** take no `ORDER BY`, `LIMIT` or `JOIN`.
//!   Ordering and limits are dropped from the rendered statement; joins are
//!   rejected with [`Error::UnsupportedCapability`].
//! - **Sequences**: auto-increment columns are `serial`, `bigserial` or
//!   `smallserial` backed by a sequence rather than an `AUTO_INCREMENT`
//!   keyword. See [serial types].
//! - **Result columns** do not report their origin table, so fields of an
//!   aliased select are aliased as `{alias}__{field}`.
//! - **Row locks** (`FOR SHARE`, `FOR UPDATE`) and `DISTINCT ON` are
//!   available through [`PgsqlQueryExt`].
//! - **Collations** follow the `ll_CC` locale form (`en_US`); others are
//!   left out of column definitions. Character sets are per database, never
//!   per column.
//!
//! [UPDATE]: https://www.postgresql.org/docs/current/sql-update.html
//! [DELETE]: https://www.postgresql.org/docs/current/sql-delete.html
//! [serial types]: https://www.postgresql.org/docs/current/datatype-numeric.html#DATATYPE-SERIAL
//! [`Error::UnsupportedCapability`]: sqlkiln_core::Error::UnsupportedCapability
//!
//! ## Example
//!
//! ```rust
//! use sqlkiln_core::query::{Predicate, Query, QueryKind};
//! use sqlkiln_pgsql::PgsqlQueryExt;
//!
//! let dialect = sqlkiln_pgsql::dialect().unwrap();
//! let query = Query::new(QueryKind::Select)
//!     .from("accounts")
//!     .where_clause(Predicate::and().eq("id", 7))
//!     .lock_for_update();
//!
//! let (sql, binds) = dialect.render(&query).unwrap();
//! assert_eq!(sql, r#"SELECT * FROM "accounts" WHERE "id" = ? FOR UPDATE;"#);
//! assert_eq!(binds.len(), 1);
//! ```

pub mod catalog;
pub mod dialect;
pub mod introspect;
mod query;
pub mod types;

pub use catalog::{rewrite_placeholders, PgCatalog};
pub use dialect::{builder, dialect};
pub use introspect::{parse_default, IntrospectConfig, PgsqlIntrospector};
pub use query::PgsqlQueryExt;
