//! The abstract query handed to the renderer.
//!
//! A [`Query`] is a plain value: an operation kind plus everything any
//! operation might need. The renderer reads only the parts the active
//! statement template has slots for.

mod predicate;

pub use predicate::{Condition, ConditionValue, Conjunction, Operand, Operator, Predicate, PredicateParam};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dialect::{symbols, AttributeValue, Attributes};
use crate::schema::{IndexColumn, SchemaDescription, SortOrder};
use crate::value::{SqlValue, ToSqlValue};

/// The operation a query performs; also the statement template name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// `SELECT`
    Select,
    /// `INSERT`
    Insert,
    /// `UPDATE`
    Update,
    /// `DELETE`
    Delete,
    /// `TRUNCATE`
    Truncate,
    /// `CREATE TABLE`
    CreateTable,
    /// `CREATE INDEX`
    CreateIndex,
    /// `DROP TABLE`
    DropTable,
    /// `DROP INDEX`
    DropIndex,
}

impl QueryKind {
    /// Every operation kind.
    pub const ALL: [Self; 9] = [
        Self::Select,
        Self::Insert,
        Self::Update,
        Self::Delete,
        Self::Truncate,
        Self::CreateTable,
        Self::CreateIndex,
        Self::DropTable,
        Self::DropIndex,
    ];

    /// The statement template name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Truncate => "truncate",
            Self::CreateTable => "create_table",
            Self::CreateIndex => "create_index",
            Self::DropTable => "drop_table",
            Self::DropIndex => "drop_index",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QueryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown query kind: {s}"))
    }
}

/// Argument of a function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuncArg {
    /// A column, quoted.
    Field(String),
    /// Raw SQL passed through.
    Literal(String),
    /// A value rendered inline.
    Value(SqlValue),
    /// A nested call.
    Func(Box<Func>),
}

/// A function call such as `COUNT("id") AS "total"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Func {
    /// Function name, rendered as given.
    pub name: String,
    /// Arguments in order.
    #[serde(default)]
    pub args: Vec<FuncArg>,
    /// Result alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Func {
    /// Creates a call with no arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            alias: None,
        }
    }

    /// Appends a column argument.
    #[must_use]
    pub fn field(mut self, column: impl Into<String>) -> Self {
        self.args.push(FuncArg::Field(column.into()));
        self
    }

    /// Appends a raw argument.
    #[must_use]
    pub fn literal(mut self, sql: impl Into<String>) -> Self {
        self.args.push(FuncArg::Literal(sql.into()));
        self
    }

    /// Appends an inline value argument.
    #[must_use]
    pub fn value(mut self, value: impl ToSqlValue) -> Self {
        self.args.push(FuncArg::Value(value.to_sql_value()));
        self
    }

    /// Appends a nested call.
    #[must_use]
    pub fn func(mut self, func: Self) -> Self {
        self.args.push(FuncArg::Func(Box::new(func)));
        self
    }

    /// Sets the result alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// How a sub-query is introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubQueryFilter {
    /// `ALL (...)`
    All,
    /// `ANY (...)`
    Any,
    /// `SOME (...)`
    Some,
    /// `EXISTS (...)`, replaces the whole condition.
    Exists,
    /// `NOT EXISTS (...)`, replaces the whole condition.
    NotExists,
}

impl SubQueryFilter {
    /// The keyword symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::All => symbols::ALL,
            Self::Any => symbols::ANY,
            Self::Some => symbols::SOME,
            Self::Exists => symbols::EXISTS,
            Self::NotExists => symbols::NOT_EXISTS,
        }
    }
}

/// A nested select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubQuery {
    /// The nested query.
    pub query: Query,
    /// Result alias when used as a field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Introducing keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<SubQueryFilter>,
}

impl SubQuery {
    /// Wraps a query.
    #[must_use]
    pub const fn new(query: Query) -> Self {
        Self {
            query,
            alias: None,
            filter: None,
        }
    }

    /// Sets the alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Sets the introducing keyword.
    #[must_use]
    pub const fn filter(mut self, filter: SubQueryFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// One entry of a select list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// A column name. `"expr AS alias"` is split and aliased.
    Name(String),
    /// A column with an explicit alias.
    Aliased {
        /// Column name.
        name: String,
        /// Result alias.
        alias: String,
    },
    /// A function call.
    Func(Func),
    /// Raw SQL passed through.
    Raw(String),
    /// A nested select.
    SubQuery(Box<SubQuery>),
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Func> for Field {
    fn from(func: Func) -> Self {
        Self::Func(func)
    }
}

impl From<SubQuery> for Field {
    fn from(sub: SubQuery) -> Self {
        Self::SubQuery(Box::new(sub))
    }
}

/// A value written by insert or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// A bound value.
    Value(SqlValue),
    /// Raw SQL passed through.
    Raw(String),
    /// A function call.
    Func(Func),
    /// `"column" <operator> ?`, e.g. `"count" + ?`.
    Expr {
        /// Column on the left.
        column: String,
        /// Operator token.
        operator: String,
        /// Bound right-hand value.
        value: SqlValue,
    },
}

impl<T: ToSqlValue> From<T> for FieldValue {
    fn from(value: T) -> Self {
        Self::Value(value.to_sql_value())
    }
}

/// Column/value pairs of one inserted or updated row.
pub type Record = Vec<(String, FieldValue)>;

/// Join types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    /// `INNER JOIN`
    Inner,
    /// `LEFT JOIN`
    Left,
    /// `RIGHT JOIN`
    Right,
    /// `FULL OUTER JOIN`
    Outer,
    /// `STRAIGHT_JOIN`
    Straight,
}

impl JoinKind {
    /// The clause symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Inner => symbols::JOIN_INNER,
            Self::Left => symbols::JOIN_LEFT,
            Self::Right => symbols::JOIN_RIGHT,
            Self::Outer => symbols::JOIN_OUTER,
            Self::Straight => symbols::JOIN_STRAIGHT,
        }
    }
}

/// A joined table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    /// Join type.
    pub kind: JoinKind,
    /// Joined table.
    pub table: String,
    /// Table alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Columns appended to the select list.
    #[serde(default)]
    pub fields: Vec<String>,
    /// `left = right` column pairs, joined with `AND`.
    #[serde(default)]
    pub on: Vec<(String, String)>,
}

impl Join {
    /// Creates a join with no alias, fields or conditions.
    #[must_use]
    pub fn new(kind: JoinKind, table: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.into(),
            alias: None,
            fields: Vec::new(),
            on: Vec::new(),
        }
    }

    /// Sets the alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Sets the selected fields.
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Adds an `ON left = right` pair.
    #[must_use]
    pub fn on(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.on.push((left.into(), right.into()));
        self
    }
}

/// One `ORDER BY` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    /// What to order by.
    pub operand: Operand,
    /// Direction.
    pub direction: SortOrder,
}

/// Set operations combining selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundKind {
    /// `UNION`
    Union,
    /// `UNION ALL`
    UnionAll,
    /// `INTERSECT`
    Intersect,
    /// `EXCEPT`
    Except,
}

impl CompoundKind {
    /// The clause symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Union => symbols::UNION,
            Self::UnionAll => symbols::UNION_ALL,
            Self::Intersect => symbols::INTERSECT,
            Self::Except => symbols::EXCEPT,
        }
    }
}

/// A select combined with the outer one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compound {
    /// Set operation.
    pub kind: CompoundKind,
    /// The combined select.
    pub query: Query,
}

/// A fully populated operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// Operation kind.
    pub kind: QueryKind,
    /// Target table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Table alias; the index name for create/drop index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Select list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    /// Rows for insert (one or more) and update (the first).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<Record>,
    /// Columns of a created index.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index_columns: Vec<IndexColumn>,
    /// Joined tables.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<Join>,
    /// `WHERE` predicate.
    #[serde(default, rename = "where", skip_serializing_if = "Predicate::is_empty")]
    pub where_clause: Predicate,
    /// `GROUP BY` columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,
    /// `HAVING` predicate.
    #[serde(default, skip_serializing_if = "Predicate::is_empty")]
    pub having: Predicate,
    /// `ORDER BY` entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
    /// Row limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Row offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Combined selects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compounds: Vec<Compound>,
    /// Attribute overrides.
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// Table description for DDL and typed bindings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDescription>,
}

impl PartialEq for Query {
    /// Attributes are compared by name only; dynamic producers have no
    /// equality.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.table == other.table
            && self.alias == other.alias
            && self.fields == other.fields
            && self.data == other.data
            && self.index_columns == other.index_columns
            && self.joins == other.joins
            && self.where_clause == other.where_clause
            && self.group_by == other.group_by
            && self.having == other.having
            && self.order_by == other.order_by
            && self.limit == other.limit
            && self.offset == other.offset
            && self.compounds == other.compounds
            && self.attributes.keys().eq(other.attributes.keys())
            && self.schema == other.schema
    }
}

impl Query {
    /// Creates an empty query of `kind`.
    #[must_use]
    pub fn new(kind: QueryKind) -> Self {
        Self {
            kind,
            table: None,
            alias: None,
            fields: Vec::new(),
            data: Vec::new(),
            index_columns: Vec::new(),
            joins: Vec::new(),
            where_clause: Predicate::default(),
            group_by: Vec::new(),
            having: Predicate::default(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            compounds: Vec::new(),
            attributes: Attributes::new(),
            schema: None,
        }
    }

    /// Sets the target table.
    #[must_use]
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Sets the table alias (the index name for index operations).
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Replaces the select list.
    #[must_use]
    pub fn fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Appends to the select list.
    #[must_use]
    pub fn field(mut self, field: impl Into<Field>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Sets a column in the first record, creating it if needed.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        if self.data.is_empty() {
            self.data.push(Record::new());
        }
        if let Some(record) = self.data.first_mut() {
            let column = column.into();
            let value = value.into();
            match record.iter_mut().find(|(name, _)| *name == column) {
                Some(existing) => existing.1 = value,
                None => record.push((column, value)),
            }
        }
        self
    }

    /// Appends a whole record.
    #[must_use]
    pub fn record<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.data
            .push(values.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Appends an index column.
    #[must_use]
    pub fn index_column(mut self, column: impl Into<IndexColumn>) -> Self {
        self.index_columns.push(column.into());
        self
    }

    /// Appends a join.
    #[must_use]
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Sets the `WHERE` predicate.
    #[must_use]
    pub fn where_clause(mut self, predicate: Predicate) -> Self {
        self.where_clause = predicate;
        self
    }

    /// Sets the `GROUP BY` columns.
    #[must_use]
    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the `HAVING` predicate.
    #[must_use]
    pub fn having(mut self, predicate: Predicate) -> Self {
        self.having = predicate;
        self
    }

    /// Appends an `ORDER BY` entry.
    #[must_use]
    pub fn order_by(mut self, operand: impl Into<Operand>, direction: SortOrder) -> Self {
        self.order_by.push(OrderBy {
            operand: operand.into(),
            direction,
        });
        self
    }

    /// Sets the row limit.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the row offset.
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Appends a combined select.
    #[must_use]
    pub fn compound(mut self, kind: CompoundKind, query: Self) -> Self {
        self.compounds.push(Compound { kind, query });
        self
    }

    /// Appends a `UNION`.
    #[must_use]
    pub fn union(self, query: Self) -> Self {
        self.compound(CompoundKind::Union, query)
    }

    /// Overrides an attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Attaches a schema description.
    #[must_use]
    pub fn schema(mut self, schema: SchemaDescription) -> Self {
        self.schema = Some(schema);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in QueryKind::ALL {
            assert_eq!(kind.name().parse::<QueryKind>().unwrap(), kind);
        }
        assert_eq!(QueryKind::CreateTable.to_string(), "create_table");
        assert!("merge".parse::<QueryKind>().is_err());
    }

    #[test]
    fn test_set_replaces_existing_column() {
        let query = Query::new(QueryKind::Update)
            .set("username", "miles")
            .set("email", "a@b.c")
            .set("username", "batman");
        assert_eq!(query.data.len(), 1);
        assert_eq!(
            query.data[0],
            vec![
                (String::from("username"), FieldValue::from("batman")),
                (String::from("email"), FieldValue::from("a@b.c")),
            ]
        );
    }

    #[test]
    fn test_query_json_shape() {
        let json = r#"{
            "kind": "select",
            "table": "users",
            "alias": "User",
            "fields": [{"name": "id"}, {"raw": "COUNT(*) AS total"}],
            "where": {"params": [{"condition": {"operand": {"column": "id"}, "operator": "eq", "value": {"value": 1}}}]},
            "limit": 5,
            "attributes": {"distinct": true}
        }"#;
        let query: Query = serde_json::from_str(json).unwrap();
        assert_eq!(query.kind, QueryKind::Select);
        assert_eq!(query.fields.len(), 2);
        assert_eq!(query.where_clause.leaf_count(), 1);
        assert!(matches!(query.attributes["distinct"], AttributeValue::Flag(true)));
    }
}
