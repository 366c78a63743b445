//! `WHERE` and `HAVING` rendering.

use super::Renderer;
use crate::dialect::symbols;
use crate::error::{Error, Result};
use crate::query::{
    Condition, ConditionValue, Operand, Operator, Predicate, PredicateParam, Query, SubQueryFilter,
};
use crate::value::SqlValue;

impl Renderer<'_> {
    /// Renders a predicate behind `clause`, or nothing when it is empty.
    pub(super) fn filter(&mut self, query: &Query, predicate: &Predicate, clause: &str) -> Result<String> {
        let sql = self.predicate(query, predicate)?;
        if sql.is_empty() {
            return Ok(sql);
        }
        self.dialect.clause(clause, &[&sql])
    }

    fn predicate(&mut self, query: &Query, predicate: &Predicate) -> Result<String> {
        let mut parts = Vec::with_capacity(predicate.params.len());
        for param in &predicate.params {
            match param {
                PredicateParam::Condition(condition) => parts.push(self.condition(query, condition)?),
                PredicateParam::Group(group) => {
                    let inner = self.predicate(query, group)?;
                    if !inner.is_empty() {
                        parts.push(self.dialect.clause(symbols::GROUP, &[&inner])?);
                    }
                }
                PredicateParam::Raw(sql) => parts.push(sql.clone()),
            }
        }
        let conjunction = self.dialect.keyword(predicate.conjunction.symbol())?;
        let separator = format!(" {conjunction} ");
        Ok(parts.join(separator.as_str()))
    }

    fn condition(&mut self, query: &Query, condition: &Condition) -> Result<String> {
        let column = match &condition.operand {
            Operand::Column(column) => Some(column.as_str()),
            _ => None,
        };
        let operand = self.operand(&condition.operand)?;
        let operator = condition.operator;

        match (&condition.value, operator) {
            (ConditionValue::SubQuery(sub), _)
                if matches!(sub.filter, Some(SubQueryFilter::Exists | SubQueryFilter::NotExists)) =>
            {
                self.sub_query(sub)
            }
            (ConditionValue::Value(SqlValue::Null), Operator::Eq) | (_, Operator::IsNull) => {
                self.dialect.clause(symbols::IS_NULL, &[&operand])
            }
            (ConditionValue::Value(SqlValue::Null), Operator::NotEq) | (_, Operator::IsNotNull) => {
                self.dialect.clause(symbols::IS_NOT_NULL, &[&operand])
            }
            (value, Operator::In | Operator::NotIn) => {
                let list = self.list(query, column, value)?;
                let clause = if operator == Operator::In { symbols::IN } else { symbols::NOT_IN };
                self.dialect.clause(clause, &[&operand, &list])
            }
            (ConditionValue::Range(low, high), Operator::Between | Operator::NotBetween) => {
                self.bind(query, column, low.clone())?;
                self.bind(query, column, high.clone())?;
                let clause = if operator == Operator::Between {
                    symbols::BETWEEN
                } else {
                    symbols::NOT_BETWEEN
                };
                self.dialect.clause(clause, &[&operand])
            }
            (ConditionValue::Value(value), _)
                if !matches!(operator, Operator::Between | Operator::NotBetween) =>
            {
                self.bind(query, column, value.clone())?;
                match operator.clause() {
                    Some(clause) => self.dialect.clause(clause, &[&operand]),
                    None => self
                        .dialect
                        .clause(symbols::EXPRESSION, &[&operand, operator.token()]),
                }
            }
            (ConditionValue::Raw(sql), _) if operator.clause().is_none() => self
                .dialect
                .clause(symbols::COMPARISON, &[&operand, operator.token(), sql]),
            (ConditionValue::SubQuery(sub), _) if operator.clause().is_none() => {
                let sub = self.sub_query(sub)?;
                self.dialect
                    .clause(symbols::COMPARISON, &[&operand, operator.token(), &sub])
            }
            _ => Err(Error::invalid(format!(
                "operator {} cannot take this kind of value",
                operator.token()
            ))),
        }
    }

    /// The inside of an `IN (...)`.
    fn list(&mut self, query: &Query, column: Option<&str>, value: &ConditionValue) -> Result<String> {
        match value {
            ConditionValue::List(values) if values.is_empty() => {
                self.dialect.keyword(symbols::NULL).map(ToString::to_string)
            }
            ConditionValue::List(values) => {
                for value in values {
                    self.bind(query, column, value.clone())?;
                }
                Ok(vec![SqlValue::placeholder(); values.len()].join(", "))
            }
            ConditionValue::Value(value) => {
                self.bind(query, column, value.clone())?;
                Ok(String::from(SqlValue::placeholder()))
            }
            ConditionValue::Raw(sql) => Ok(sql.clone()),
            ConditionValue::SubQuery(sub) => self.statement(&sub.query),
            ConditionValue::None | ConditionValue::Range(..) => {
                Err(Error::invalid("IN needs a list, a value or a sub-query"))
            }
        }
    }
}
