//! The PostgreSQL dialect: the generic tables plus PostgreSQL overrides.

use sqlkiln_core::dialect::{symbols, AttributeValue, Capability, Dialect, DialectBuilder};
use sqlkiln_core::{QueryKind, Result};

use crate::types::{pgsql_types, serial_options};

/// Name of the dialect.
pub const NAME: &str = "pgsql";

pub const CONCURRENTLY: &str = "concurrently";
pub const CONTINUE_IDENTITY: &str = "continue_identity";
pub const DELETE_ROWS: &str = "delete_rows";
pub const DISTINCT_ON: &str = "distinct_on";
pub const DROP: &str = "drop";
pub const FOR_SHARE: &str = "for_share";
pub const FOR_UPDATE: &str = "for_update";
pub const GLOBAL: &str = "global";
pub const INHERITS: &str = "inherits";
pub const LOCAL: &str = "local";
pub const MATCH: &str = "match";
pub const MATCH_FULL: &str = "match_full";
pub const MATCH_PARTIAL: &str = "match_partial";
pub const MATCH_SIMPLE: &str = "match_simple";
pub const ON_COMMIT: &str = "on_commit";
pub const ONLY: &str = "only";
pub const PRESERVE_ROWS: &str = "preserve_rows";
pub const RESTART_IDENTITY: &str = "restart_identity";
pub const RETURNING: &str = "returning";
pub const TABLESPACE: &str = "tablespace";
pub const UNLOGGED: &str = "unlogged";
pub const WITH: &str = "with";
pub const WITH_OIDS: &str = "with_oids";
pub const WITHOUT_OIDS: &str = "without_oids";

/// Collations are accepted only in `ll_CC` form, e.g. `en_US`.
pub const COLLATION_PATTERN: &str = "^[a-z]{2}_[A-Z]{2}$";

const KEYWORDS: &[(&str, &str)] = &[
    (CONCURRENTLY, "CONCURRENTLY"),
    (CONTINUE_IDENTITY, "CONTINUE IDENTITY"),
    (DELETE_ROWS, "DELETE ROWS"),
    (DROP, "DROP"),
    (FOR_SHARE, "FOR SHARE"),
    (FOR_UPDATE, "FOR UPDATE"),
    (GLOBAL, "GLOBAL"),
    (INHERITS, "INHERITS"),
    (LOCAL, "LOCAL"),
    (MATCH_FULL, "MATCH FULL"),
    (MATCH_PARTIAL, "MATCH PARTIAL"),
    (MATCH_SIMPLE, "MATCH SIMPLE"),
    (ON_COMMIT, "ON COMMIT"),
    (ONLY, "ONLY"),
    (PRESERVE_ROWS, "PRESERVE ROWS"),
    (RESTART_IDENTITY, "RESTART IDENTITY"),
    (symbols::SET_DEFAULT, "SET DEFAULT"),
    (TABLESPACE, "TABLESPACE"),
    (symbols::UNIQUE, "UNIQUE"),
    (UNLOGGED, "UNLOGGED"),
    (WITH_OIDS, "WITH OIDS"),
    (WITHOUT_OIDS, "WITHOUT OIDS"),
];

const CLAUSES: &[(&str, &str)] = &[
    (DISTINCT_ON, "DISTINCT ON (%s)"),
    (symbols::JOIN_STRAIGHT, "INNER JOIN %s ON %s"),
    (MATCH, "%s"),
    (symbols::NOT_REGEXP, "%s !~* ?"),
    (RETURNING, "RETURNING %s"),
    (symbols::REGEXP, "%s ~* ?"),
    (symbols::RLIKE, "%s ~* ?"),
    (symbols::UNIQUE_KEY, "UNIQUE (%2$s)"),
    (WITH, "%s"),
];

const STATEMENTS: &[(QueryKind, &str)] = &[
    (
        QueryKind::Select,
        "SELECT {a.distinct} {fields} FROM {table} {joins} {where} {groupBy} {having} {compounds} {orderBy} {limit} {a.lock}",
    ),
    (QueryKind::Update, "UPDATE {a.only} {table} SET {fields} {where}"),
    (QueryKind::Delete, "DELETE FROM {a.only} {table} {joins} {where}"),
    (
        QueryKind::Truncate,
        "TRUNCATE {a.only} {table} {a.identity} {a.action}",
    ),
    (
        QueryKind::CreateTable,
        "CREATE {a.type} {a.temporary} {a.unlogged} TABLE IF NOT EXISTS {table} (\n{columns}{keys}\n) {options}",
    ),
    (
        QueryKind::CreateIndex,
        "CREATE {a.type} INDEX {a.concurrently} {index} ON {table} ({fields})",
    ),
    (QueryKind::DropTable, "DROP TABLE IF EXISTS {table} {a.action}"),
    (
        QueryKind::DropIndex,
        "DROP INDEX {a.concurrently} IF EXISTS {index} {a.action}",
    ),
];

fn flag(value: bool) -> AttributeValue {
    AttributeValue::Flag(value)
}

fn keyword(name: &str) -> AttributeValue {
    AttributeValue::from(name)
}

/// The PostgreSQL dialect as a builder, for callers that want to layer
/// further overrides on top.
#[must_use]
pub fn builder() -> DialectBuilder {
    let mut builder = DialectBuilder::generic()
        .name(NAME)
        .keywords(KEYWORDS.iter().copied())
        .clauses(CLAUSES.iter().copied())
        .statements(STATEMENTS.iter().map(|(kind, template)| (kind.name(), *template)))
        .attributes(
            QueryKind::Select,
            [("distinct", flag(false)), ("lock", keyword(""))],
        )
        .attributes(QueryKind::Update, [(ONLY, flag(false))])
        .attributes(QueryKind::Delete, [(ONLY, flag(false))])
        .attributes(
            QueryKind::Truncate,
            [(ONLY, flag(false)), ("identity", keyword("")), ("action", keyword(""))],
        )
        .attributes(
            QueryKind::CreateTable,
            [("type", keyword("")), ("temporary", flag(false)), (UNLOGGED, flag(false))],
        )
        .attributes(
            QueryKind::CreateIndex,
            [("type", keyword("")), (CONCURRENTLY, flag(false))],
        )
        .attributes(QueryKind::DropTable, [("action", keyword(""))])
        .attributes(
            QueryKind::DropIndex,
            [(CONCURRENTLY, flag(false)), ("action", keyword(""))],
        )
        .register_types(pgsql_types())
        .remap_type("int", "integer")
        .remap_type("tinyint", "smallint")
        .remap_type("datetime", "timestamp")
        .remap_type("double", "double precision")
        .remap_type("blob", "bytea")
        .collation_pattern(COLLATION_PATTERN)
        .capabilities([Capability::SerialSequences])
        .without_capabilities([
            Capability::InlineIndexes,
            Capability::DeleteLimit,
            Capability::DeleteOrder,
            Capability::UpdateLimit,
            Capability::UpdateOrder,
            Capability::DeleteJoins,
            Capability::UpdateJoins,
            Capability::ResultColumnOrigin,
            Capability::ColumnCharset,
            Capability::ColumnComment,
            Capability::AutoIncrementKeyword,
            Capability::KeyColumnOptions,
        ]);

    for serial in ["serial", "bigserial", "smallserial"] {
        builder = builder.force_type(serial, serial, serial_options());
    }
    builder
}

/// Builds the PostgreSQL dialect.
///
/// # Errors
///
/// Fails only if the tables above are incomplete.
pub fn dialect() -> Result<Dialect> {
    builder().build()
}
