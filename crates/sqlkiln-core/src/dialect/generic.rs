//! Generic SQL base tables.
//!
//! Every engine dialect starts from these and overrides what differs.

use super::symbols::*;
use super::{Capability, DialectBuilder};
use crate::query::QueryKind;
use crate::types::TypeRegistry;

const KEYWORDS: &[(&str, &str)] = &[
    (ALL, "ALL"),
    (AND, "AND"),
    (ANY, "ANY"),
    (ASC, "ASC"),
    (AUTO_INCREMENT, "AUTO_INCREMENT"),
    (CASCADE, "CASCADE"),
    (DESC, "DESC"),
    (DISTINCT, "DISTINCT"),
    (EXISTS, "EXISTS"),
    (NO_ACTION, "NO ACTION"),
    (NOT_EXISTS, "NOT EXISTS"),
    (NOT_NULL, "NOT NULL"),
    (NULL, "NULL"),
    (OR, "OR"),
    (RESTRICT, "RESTRICT"),
    (SET_DEFAULT, "SET DEFAULT"),
    (SET_NULL, "SET NULL"),
    (SOME, "SOME"),
    (TEMPORARY, "TEMPORARY"),
    (UNIQUE, "UNIQUE"),
];

const CLAUSES: &[(&str, &str)] = &[
    (AS_ALIAS, "%s AS %s"),
    (BETWEEN, "%s BETWEEN ? AND ?"),
    (CHARACTER_SET, "CHARACTER SET %s"),
    (COLLATE, "COLLATE %s"),
    (COMMENT, "COMMENT %s"),
    (COMPARISON, "%s %s %s"),
    (CONSTRAINT, "CONSTRAINT %s"),
    (DEFAULT, "DEFAULT %s"),
    (EXCEPT, "EXCEPT %s"),
    (EXPRESSION, "%s %s ?"),
    (FOREIGN_KEY, "FOREIGN KEY (%s) REFERENCES %s(%s)"),
    (FUNCTION, "%s(%s)"),
    (GROUP, "(%s)"),
    (GROUP_BY, "GROUP BY %s"),
    (HAVING, "HAVING %s"),
    (IN, "%s IN (%s)"),
    (INDEX, "KEY %s (%s)"),
    (INTERSECT, "INTERSECT %s"),
    (IS_NOT_NULL, "%s IS NOT NULL"),
    (IS_NULL, "%s IS NULL"),
    (JOIN_INNER, "INNER JOIN %s ON %s"),
    (JOIN_LEFT, "LEFT JOIN %s ON %s"),
    (JOIN_OUTER, "FULL OUTER JOIN %s ON %s"),
    (JOIN_RIGHT, "RIGHT JOIN %s ON %s"),
    (JOIN_STRAIGHT, "STRAIGHT_JOIN %s ON %s"),
    (LIKE, "%s LIKE ?"),
    (LIMIT, "LIMIT %s"),
    (LIMIT_OFFSET, "LIMIT %s OFFSET %s"),
    (NOT_BETWEEN, "%s NOT BETWEEN ? AND ?"),
    (NOT_IN, "%s NOT IN (%s)"),
    (NOT_LIKE, "%s NOT LIKE ?"),
    (NOT_REGEXP, "%s NOT REGEXP ?"),
    (OFFSET, "OFFSET %s"),
    (ON_DELETE, "ON DELETE %s"),
    (ON_UPDATE, "ON UPDATE %s"),
    (ORDER_BY, "ORDER BY %s"),
    (PRIMARY_KEY, "PRIMARY KEY (%s)"),
    (REGEXP, "%s REGEXP ?"),
    (RLIKE, "%s RLIKE ?"),
    (SUB_QUERY, "(%s)"),
    (UNION, "UNION %s"),
    (UNION_ALL, "UNION ALL %s"),
    (UNIQUE_KEY, "UNIQUE KEY %s (%s)"),
    (WHERE, "WHERE %s"),
];

const STATEMENTS: &[(QueryKind, &str)] = &[
    (
        QueryKind::Select,
        "SELECT {a.distinct} {fields} FROM {table} {joins} {where} {groupBy} {having} {compounds} {orderBy} {limit}",
    ),
    (QueryKind::Insert, "INSERT INTO {table} {fields} VALUES {values}"),
    (
        QueryKind::Update,
        "UPDATE {table} {joins} SET {fields} {where} {orderBy} {limit}",
    ),
    (
        QueryKind::Delete,
        "DELETE FROM {table} {joins} {where} {orderBy} {limit}",
    ),
    (QueryKind::Truncate, "TRUNCATE {table}"),
    (
        QueryKind::CreateTable,
        "CREATE {a.temporary} TABLE IF NOT EXISTS {table} (\n{columns}{keys}\n) {options}",
    ),
    (
        QueryKind::CreateIndex,
        "CREATE {a.type} INDEX {index} ON {table} ({fields})",
    ),
    (QueryKind::DropTable, "DROP {a.temporary} TABLE IF EXISTS {table}"),
    (QueryKind::DropIndex, "DROP INDEX {index} ON {table}"),
];

impl DialectBuilder {
    /// The engine-neutral base: `"` quoting, every symbol the renderer
    /// references, one statement per operation, and the base type registry.
    #[must_use]
    pub fn generic() -> Self {
        Self::new("generic")
            .quote_char('"')
            .keywords(KEYWORDS.iter().copied())
            .clauses(CLAUSES.iter().copied())
            .statements(STATEMENTS.iter().map(|(kind, template)| (kind.name(), *template)))
            .attributes(QueryKind::Select, [(DISTINCT, false)])
            .attributes(QueryKind::CreateTable, [(TEMPORARY, false)])
            .attributes(QueryKind::CreateIndex, [("type", "")])
            .attributes(QueryKind::DropTable, [(TEMPORARY, false)])
            .capabilities([
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
            ])
            .types(TypeRegistry::with_base_types())
    }
}
