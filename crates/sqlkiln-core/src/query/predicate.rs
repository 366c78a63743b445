//! Predicate trees for `WHERE` and `HAVING`.
//!
//! A [`Predicate`] is a conjunction of parameters; a parameter is a
//! condition, a nested predicate (rendered in parentheses) or a raw
//! fragment. Leaves are rendered depth-first in declaration order.

use serde::{Deserialize, Serialize};

use super::{Func, SubQuery};
use crate::dialect::symbols;
use crate::value::{SqlValue, ToSqlValue};

/// How the parameters of a predicate are joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conjunction {
    /// `AND`.
    #[default]
    And,
    /// `OR`.
    Or,
}

impl Conjunction {
    /// The keyword symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::And => symbols::AND,
            Self::Or => symbols::OR,
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `IN (...)`
    In,
    /// `NOT IN (...)`
    NotIn,
    /// `BETWEEN ? AND ?`
    Between,
    /// `NOT BETWEEN ? AND ?`
    NotBetween,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// Regular expression match.
    Regexp,
    /// Negated regular expression match.
    NotRegexp,
    /// Regular expression match, alternate spelling.
    Rlike,
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    IsNotNull,
}

impl Operator {
    /// The operator token used by the generic comparison clauses.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT BETWEEN",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::Regexp => "REGEXP",
            Self::NotRegexp => "NOT REGEXP",
            Self::Rlike => "RLIKE",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
        }
    }

    /// The clause rendering this operator against a single bound value, if
    /// it has a dedicated one.
    #[must_use]
    pub const fn clause(self) -> Option<&'static str> {
        match self {
            Self::In => Some(symbols::IN),
            Self::NotIn => Some(symbols::NOT_IN),
            Self::Between => Some(symbols::BETWEEN),
            Self::NotBetween => Some(symbols::NOT_BETWEEN),
            Self::Like => Some(symbols::LIKE),
            Self::NotLike => Some(symbols::NOT_LIKE),
            Self::Regexp => Some(symbols::REGEXP),
            Self::NotRegexp => Some(symbols::NOT_REGEXP),
            Self::Rlike => Some(symbols::RLIKE),
            Self::IsNull => Some(symbols::IS_NULL),
            Self::IsNotNull => Some(symbols::IS_NOT_NULL),
            _ => None,
        }
    }
}

/// Left-hand side of a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    /// A column, quoted when rendered.
    Column(String),
    /// A function call.
    Func(Func),
    /// Raw SQL passed through.
    Raw(String),
}

impl From<&str> for Operand {
    fn from(column: &str) -> Self {
        Self::Column(column.to_string())
    }
}

impl From<String> for Operand {
    fn from(column: String) -> Self {
        Self::Column(column)
    }
}

impl From<Func> for Operand {
    fn from(func: Func) -> Self {
        Self::Func(func)
    }
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionValue {
    /// No value (`IS NULL`, `IS NOT NULL`).
    None,
    /// One bound value.
    Value(SqlValue),
    /// Several bound values (`IN`).
    List(Vec<SqlValue>),
    /// Two bound values (`BETWEEN`).
    Range(SqlValue, SqlValue),
    /// Raw SQL passed through, e.g. another column.
    Raw(String),
    /// A nested select.
    SubQuery(Box<SubQuery>),
}

/// One comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Left-hand side.
    pub operand: Operand,
    /// Operator.
    pub operator: Operator,
    /// Right-hand side.
    pub value: ConditionValue,
}

impl Condition {
    /// Creates a condition.
    #[must_use]
    pub fn new(operand: impl Into<Operand>, operator: Operator, value: ConditionValue) -> Self {
        Self {
            operand: operand.into(),
            operator,
            value,
        }
    }
}

/// One parameter of a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateParam {
    /// A comparison.
    Condition(Condition),
    /// A nested predicate.
    Group(Predicate),
    /// Raw SQL passed through.
    Raw(String),
}

/// A conjunction of conditions and nested groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// How parameters are joined.
    #[serde(default)]
    pub conjunction: Conjunction,
    /// Parameters in declaration order.
    #[serde(default)]
    pub params: Vec<PredicateParam>,
}

impl Predicate {
    /// An empty `AND` predicate.
    #[must_use]
    pub fn and() -> Self {
        Self::default()
    }

    /// An empty `OR` predicate.
    #[must_use]
    pub fn or() -> Self {
        Self {
            conjunction: Conjunction::Or,
            params: Vec::new(),
        }
    }

    /// Whether there is nothing to render.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Appends a condition.
    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.params.push(PredicateParam::Condition(condition));
        self
    }

    /// Appends `operand <operator> ?`.
    #[must_use]
    pub fn compare(
        self,
        operand: impl Into<Operand>,
        operator: Operator,
        value: impl ToSqlValue,
    ) -> Self {
        self.condition(Condition::new(
            operand,
            operator,
            ConditionValue::Value(value.to_sql_value()),
        ))
    }

    /// Appends `operand = ?`; a NULL value renders as `IS NULL`.
    #[must_use]
    pub fn eq(self, operand: impl Into<Operand>, value: impl ToSqlValue) -> Self {
        self.compare(operand, Operator::Eq, value)
    }

    /// Appends `operand != ?`; a NULL value renders as `IS NOT NULL`.
    #[must_use]
    pub fn not_eq(self, operand: impl Into<Operand>, value: impl ToSqlValue) -> Self {
        self.compare(operand, Operator::NotEq, value)
    }

    /// Appends `operand IN (?, ...)`.
    #[must_use]
    pub fn in_list<V, I>(self, operand: impl Into<Operand>, values: I) -> Self
    where
        V: ToSqlValue,
        I: IntoIterator<Item = V>,
    {
        let values = values.into_iter().map(ToSqlValue::to_sql_value).collect();
        self.condition(Condition::new(operand, Operator::In, ConditionValue::List(values)))
    }

    /// Appends `operand NOT IN (?, ...)`.
    #[must_use]
    pub fn not_in_list<V, I>(self, operand: impl Into<Operand>, values: I) -> Self
    where
        V: ToSqlValue,
        I: IntoIterator<Item = V>,
    {
        let values = values.into_iter().map(ToSqlValue::to_sql_value).collect();
        self.condition(Condition::new(operand, Operator::NotIn, ConditionValue::List(values)))
    }

    /// Appends `operand BETWEEN ? AND ?`.
    #[must_use]
    pub fn between(self, operand: impl Into<Operand>, low: impl ToSqlValue, high: impl ToSqlValue) -> Self {
        self.condition(Condition::new(
            operand,
            Operator::Between,
            ConditionValue::Range(low.to_sql_value(), high.to_sql_value()),
        ))
    }

    /// Appends `operand LIKE ?`.
    #[must_use]
    pub fn like(self, operand: impl Into<Operand>, pattern: impl ToSqlValue) -> Self {
        self.compare(operand, Operator::Like, pattern)
    }

    /// Appends `operand IS NULL`.
    #[must_use]
    pub fn is_null(self, operand: impl Into<Operand>) -> Self {
        self.condition(Condition::new(operand, Operator::IsNull, ConditionValue::None))
    }

    /// Appends `operand IS NOT NULL`.
    #[must_use]
    pub fn is_not_null(self, operand: impl Into<Operand>) -> Self {
        self.condition(Condition::new(operand, Operator::IsNotNull, ConditionValue::None))
    }

    /// Appends a nested predicate.
    #[must_use]
    pub fn group(mut self, predicate: Self) -> Self {
        self.params.push(PredicateParam::Group(predicate));
        self
    }

    /// Appends a raw fragment.
    #[must_use]
    pub fn raw(mut self, fragment: impl Into<String>) -> Self {
        self.params.push(PredicateParam::Raw(fragment.into()));
        self
    }

    /// Number of condition leaves, including nested ones.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.params
            .iter()
            .map(|param| match param {
                PredicateParam::Condition(_) => 1,
                PredicateParam::Group(group) => group.leaf_count(),
                PredicateParam::Raw(_) => 0,
            })
            .sum()
    }
}
