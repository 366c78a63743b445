//! Statement assembly.
//!
//! [`Dialect::render`] picks the statement template for the query kind and
//! fills its slots left to right. Every bound value is pushed onto the
//! parameter list at the moment its `?` is produced, so the parameter list
//! is always in placeholder order.

mod format;
mod predicate;

use std::sync::OnceLock;

use regex::Regex;

use crate::dialect::{effective, symbols, Attributes, Capability, Dialect};
use crate::error::{Error, Result};
use crate::query::{
    Field, FieldValue, Func, FuncArg, Join, Operand, Query, QueryKind, Record, SubQuery,
};
use crate::schema::{IndexColumn, SchemaDescription};
use crate::value::{Binding, SqlValue};

impl Dialect {
    /// Renders a query into SQL text and its ordered bind parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTable`], [`Error::MissingFields`],
    /// [`Error::MissingSchema`] or [`Error::InvalidQuery`] for malformed
    /// queries, [`Error::UnsupportedCapability`] for joins the dialect
    /// rejects, and [`Error::MissingTemplate`] when the dialect has no
    /// statement for the query kind.
    pub fn render(&self, query: &Query) -> Result<(String, Vec<Binding>)> {
        let mut renderer = Renderer::new(self);
        let sql = renderer.statement(query)?;
        tracing::debug!(
            kind = %query.kind,
            dialect = self.name,
            binds = renderer.binds.len(),
            "rendered statement"
        );
        Ok((format!("{sql};"), renderer.binds))
    }

    /// Renders a DDL statement for a table description.
    ///
    /// # Errors
    ///
    /// See [`render`](Self::render).
    pub fn render_ddl(&self, schema: &SchemaDescription, kind: QueryKind) -> Result<String> {
        let query = Query::new(kind)
            .from(schema.table.clone())
            .schema(schema.clone());
        self.render(&query).map(|(sql, _)| sql)
    }

    /// Fills a named template from literal fragments.
    ///
    /// Slots without a fragment render empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTemplate`] if no template has that name.
    pub fn render_template(&self, name: &str, fragments: &[(&str, &str)]) -> Result<String> {
        let sql = self.statement(name)?.fill(|slot| {
            Ok(fragments
                .iter()
                .find(|(key, _)| *key == slot)
                .map(|(_, fragment)| (*fragment).to_string())
                .unwrap_or_default())
        })?;
        Ok(format!("{sql};"))
    }
}

/// One rendering pass: the dialect plus the parameters bound so far.
struct Renderer<'d> {
    dialect: &'d Dialect,
    binds: Vec<Binding>,
}

impl<'d> Renderer<'d> {
    const fn new(dialect: &'d Dialect) -> Self {
        Self {
            dialect,
            binds: Vec::new(),
        }
    }

    /// Renders a statement without the terminator.
    fn statement(&mut self, query: &Query) -> Result<String> {
        self.check_capabilities(query)?;

        let dialect = self.dialect;
        let statement = dialect.statement(query.kind.name())?;
        let attributes = dialect
            .default_attributes(query.kind)
            .map(|defaults| effective(defaults, &query.attributes))
            .unwrap_or_default();

        statement.fill(|slot| self.slot(query, &attributes, slot))
    }

    fn check_capabilities(&self, query: &Query) -> Result<()> {
        let joins = match query.kind {
            QueryKind::Update => Some(Capability::UpdateJoins),
            QueryKind::Delete => Some(Capability::DeleteJoins),
            _ => None,
        };
        match joins {
            Some(capability) if !query.joins.is_empty() && !self.dialect.supports(capability) => {
                Err(Error::UnsupportedCapability {
                    dialect: self.dialect.name,
                    capability,
                    kind: query.kind,
                })
            }
            _ => Ok(()),
        }
    }

    fn slot(&mut self, query: &Query, attributes: &Attributes, slot: &str) -> Result<String> {
        if let Some(name) = slot.strip_prefix("a.") {
            return attributes
                .get(name)
                .map_or_else(|| Ok(String::new()), |value| value.render(name, self.dialect));
        }

        match slot {
            "table" => self.table(query),
            "fields" => self.fields(query),
            "values" => self.values(query),
            "joins" => self.joins(query),
            "where" => self.filter(query, &query.where_clause, symbols::WHERE),
            "having" => self.filter(query, &query.having, symbols::HAVING),
            "groupBy" => self.group_by(query),
            "orderBy" => self.order_by(query),
            "limit" => self.limit(query),
            "compounds" => self.compounds(query),
            "index" => self.index(query),
            "columns" => self.dialect.format_columns(require_schema(query)?),
            "keys" => self.dialect.format_table_keys(require_schema(query)?),
            "options" => self.dialect.format_table_options(require_schema(query)?),
            other => {
                tracing::trace!(slot = other, "no fragment for statement slot");
                Ok(String::new())
            }
        }
    }

    fn table(&self, query: &Query) -> Result<String> {
        let table = match (&query.table, query.kind) {
            (Some(table), _) => table.as_str(),
            (None, QueryKind::CreateTable) => {
                let schema = require_schema(query)?;
                if schema.table.is_empty() {
                    return Err(Error::MissingTable(query.kind));
                }
                schema.table.as_str()
            }
            (None, kind) => return Err(Error::MissingTable(kind)),
        };

        let quoted = self.dialect.quote(table);
        match (&query.alias, query.kind) {
            (Some(alias), QueryKind::Select | QueryKind::Update | QueryKind::Delete) => self
                .dialect
                .clause(symbols::AS_ALIAS, &[&quoted, &self.dialect.quote(alias)]),
            _ => Ok(quoted),
        }
    }

    fn index(&self, query: &Query) -> Result<String> {
        query
            .alias
            .as_deref()
            .map(|name| self.dialect.quote(name))
            .ok_or_else(|| Error::invalid(format!("{} statement requires an index name", query.kind)))
    }

    fn fields(&mut self, query: &Query) -> Result<String> {
        match query.kind {
            QueryKind::Select => self.select_fields(query),
            QueryKind::Insert => {
                let record = first_record(query)?;
                let columns: Vec<&str> = record.iter().map(|(column, _)| column.as_str()).collect();
                Ok(format!("({})", self.dialect.quote_list(&columns)))
            }
            QueryKind::Update => {
                let record = first_record(query)?;
                let mut assignments = Vec::with_capacity(record.len());
                for (column, value) in record {
                    let value = self.field_value(query, column, value)?;
                    assignments.push(format!("{} = {value}", self.dialect.quote(column)));
                }
                Ok(assignments.join(", "))
            }
            QueryKind::CreateIndex => {
                if query.index_columns.is_empty() {
                    return Err(Error::MissingFields(query.kind));
                }
                Ok(self.dialect.format_index_columns(&query.index_columns))
            }
            _ => Ok(String::new()),
        }
    }

    fn select_fields(&mut self, query: &Query) -> Result<String> {
        let alias = query.alias.as_deref();
        let mut columns = Vec::with_capacity(query.fields.len());

        if query.fields.is_empty() {
            columns.push(alias.map_or_else(
                || String::from("*"),
                |alias| self.dialect.quote(&format!("{alias}.*")),
            ));
        }
        for field in &query.fields {
            columns.push(self.field(field, alias)?);
        }
        for join in &query.joins {
            let alias = join.alias.as_deref().unwrap_or(&join.table);
            for name in &join.fields {
                columns.push(self.column_name(name, Some(alias))?);
            }
        }
        Ok(columns.join(", "))
    }

    fn field(&mut self, field: &Field, alias: Option<&str>) -> Result<String> {
        match field {
            Field::Name(name) => self.column_name(name, alias),
            Field::Aliased { name, alias: result } => self.dialect.clause(
                symbols::AS_ALIAS,
                &[&self.qualified(name, alias), &self.dialect.quote(result)],
            ),
            Field::Func(func) => self.function(func),
            Field::Raw(sql) => Ok(sql.clone()),
            Field::SubQuery(sub) => self.sub_query(sub),
        }
    }

    /// A plain column of the select list.
    ///
    /// Under an alias, a dialect that cannot report where a result column
    /// came from gets every column aliased as the quoted identifier `{alias}__{column}`.
    fn column_name(&self, name: &str, alias: Option<&str>) -> Result<String> {
        if let Some((column, result)) = split_alias(name) {
            return self.dialect.clause(
                symbols::AS_ALIAS,
                &[&self.qualified(column, alias), &self.dialect.quote(result)],
            );
        }
        match alias {
            Some(alias)
                if !name.ends_with('*')
                    && !self.dialect.supports(Capability::ResultColumnOrigin) =>
            {
                let column = name.rsplit('.').next().unwrap_or(name);
                self.dialect.clause(
                    symbols::AS_ALIAS,
                    &[
                        &self.qualified(name, Some(alias)),
                        &self.dialect.quote(&format!("{alias}__{column}")),
                    ],
                )
            }
            _ => Ok(self.qualified(name, alias)),
        }
    }

    fn qualified(&self, name: &str, alias: Option<&str>) -> String {
        match alias {
            Some(alias) if !name.contains('.') => self.dialect.quote(&format!("{alias}.{name}")),
            _ => self.dialect.quote(name),
        }
    }

    fn function(&mut self, func: &Func) -> Result<String> {
        let mut args = Vec::with_capacity(func.args.len());
        for arg in &func.args {
            args.push(match arg {
                FuncArg::Field(column) => self.dialect.quote(column),
                FuncArg::Literal(sql) => sql.clone(),
                FuncArg::Value(value) => value.to_sql_inline(),
                FuncArg::Func(inner) => self.function(inner)?,
            });
        }
        let call = self
            .dialect
            .clause(symbols::FUNCTION, &[&func.name, &args.join(", ")])?;
        match &func.alias {
            Some(alias) => self
                .dialect
                .clause(symbols::AS_ALIAS, &[&call, &self.dialect.quote(alias)]),
            None => Ok(call),
        }
    }

    fn sub_query(&mut self, sub: &SubQuery) -> Result<String> {
        let inner = self.statement(&sub.query)?;
        let mut sql = self.dialect.clause(symbols::SUB_QUERY, &[&inner])?;
        if let Some(filter) = sub.filter {
            sql = format!("{} {sql}", self.dialect.keyword(filter.symbol())?);
        }
        match &sub.alias {
            Some(alias) => self
                .dialect
                .clause(symbols::AS_ALIAS, &[&sql, &self.dialect.quote(alias)]),
            None => Ok(sql),
        }
    }

    fn operand(&mut self, operand: &Operand) -> Result<String> {
        match operand {
            Operand::Column(column) => Ok(self.dialect.quote(column)),
            Operand::Func(func) => self.function(func),
            Operand::Raw(sql) => Ok(sql.clone()),
        }
    }

    fn values(&mut self, query: &Query) -> Result<String> {
        let first = first_record(query)?;
        let mut rows = Vec::with_capacity(query.data.len());
        for record in &query.data {
            let same_columns = record.len() == first.len()
                && record.iter().zip(first).all(|((a, _), (b, _))| a == b);
            if !same_columns {
                return Err(Error::invalid(
                    "every inserted record must have the same columns as the first",
                ));
            }
            let mut values = Vec::with_capacity(record.len());
            for (column, value) in record {
                values.push(self.field_value(query, column, value)?);
            }
            rows.push(format!("({})", values.join(", ")));
        }
        Ok(rows.join(", "))
    }

    fn field_value(&mut self, query: &Query, column: &str, value: &FieldValue) -> Result<String> {
        match value {
            FieldValue::Value(value) => {
                self.bind(query, Some(column), value.clone())?;
                Ok(String::from(SqlValue::placeholder()))
            }
            FieldValue::Raw(sql) => Ok(sql.clone()),
            FieldValue::Func(func) => self.function(func),
            FieldValue::Expr {
                column: left,
                operator,
                value,
            } => {
                self.bind(query, Some(column), value.clone())?;
                self.dialect
                    .clause(symbols::EXPRESSION, &[&self.dialect.quote(left), operator])
            }
        }
    }

    fn joins(&mut self, query: &Query) -> Result<String> {
        query
            .joins
            .iter()
            .map(|join| self.join(join))
            .collect::<Result<Vec<_>>>()
            .map(|joins| joins.join(" "))
    }

    fn join(&self, join: &Join) -> Result<String> {
        let table = self.dialect.quote(&join.table);
        let table = match &join.alias {
            Some(alias) => self
                .dialect
                .clause(symbols::AS_ALIAS, &[&table, &self.dialect.quote(alias)])?,
            None => table,
        };
        let on = join
            .on
            .iter()
            .map(|(left, right)| format!("{} = {}", self.dialect.quote(left), self.dialect.quote(right)))
            .collect::<Vec<_>>()
            .join(" AND ");
        self.dialect.clause(join.kind.symbol(), &[&table, &on])
    }

    fn group_by(&self, query: &Query) -> Result<String> {
        if query.group_by.is_empty() {
            return Ok(String::new());
        }
        self.dialect
            .clause(symbols::GROUP_BY, &[&self.dialect.quote_list(&query.group_by)])
    }

    fn order_by(&mut self, query: &Query) -> Result<String> {
        let supported = match query.kind {
            QueryKind::Update => self.dialect.supports(Capability::UpdateOrder),
            QueryKind::Delete => self.dialect.supports(Capability::DeleteOrder),
            _ => true,
        };
        if query.order_by.is_empty() || !supported {
            return Ok(String::new());
        }

        let mut entries = Vec::with_capacity(query.order_by.len());
        for order in &query.order_by {
            let operand = self.operand(&order.operand)?;
            let direction = self.dialect.keyword(order.direction.symbol())?;
            entries.push(format!("{operand} {direction}"));
        }
        self.dialect.clause(symbols::ORDER_BY, &[&entries.join(", ")])
    }

    fn limit(&self, query: &Query) -> Result<String> {
        let supported = match query.kind {
            QueryKind::Update => self.dialect.supports(Capability::UpdateLimit),
            QueryKind::Delete => self.dialect.supports(Capability::DeleteLimit),
            _ => true,
        };
        if !supported {
            return Ok(String::new());
        }

        match (query.limit, query.offset) {
            (Some(limit), Some(offset)) => self
                .dialect
                .clause(symbols::LIMIT_OFFSET, &[&limit.to_string(), &offset.to_string()]),
            (Some(limit), None) => self.dialect.clause(symbols::LIMIT, &[&limit.to_string()]),
            (None, Some(offset)) => self.dialect.clause(symbols::OFFSET, &[&offset.to_string()]),
            (None, None) => Ok(String::new()),
        }
    }

    fn compounds(&mut self, query: &Query) -> Result<String> {
        let mut parts = Vec::with_capacity(query.compounds.len());
        for compound in &query.compounds {
            let inner = self.statement(&compound.query)?;
            parts.push(self.dialect.clause(compound.kind.symbol(), &[&inner])?);
        }
        Ok(parts.join(" "))
    }

    /// Pushes a parameter, typed by the query's schema when it knows the
    /// column.
    fn bind(&mut self, query: &Query, column: Option<&str>, value: SqlValue) -> Result<()> {
        let spec = query.schema.as_ref().zip(column).and_then(|(schema, column)| {
            let name = column.rsplit('.').next().unwrap_or(column);
            schema.column(name)
        });

        let binding = match spec {
            Some(spec) if value != SqlValue::Null => {
                let descriptor = self.dialect.resolve_type(&spec.data_type)?;
                Binding::new(descriptor.to_storage(value), descriptor.binding_kind())
            }
            _ => Binding::inferred(value),
        };
        self.binds.push(binding);
        Ok(())
    }
}

fn require_schema(query: &Query) -> Result<&SchemaDescription> {
    query
        .schema
        .as_ref()
        .ok_or(Error::MissingSchema(query.kind))
}

fn first_record(query: &Query) -> Result<&Record> {
    query
        .data
        .first()
        .filter(|record| !record.is_empty())
        .ok_or(Error::MissingFields(query.kind))
}

/// Splits `"<expr> AS <alias>"`, case-insensitively, at the first `AS`.
fn split_alias(field: &str) -> Option<(&str, &str)> {
    static ALIAS: OnceLock<Option<Regex>> = OnceLock::new();
    let captures = ALIAS
        .get_or_init(|| Regex::new(r"(?is)^\s*(\S.*?)\s+AS\s+(.*\S)\s*$").ok())
        .as_ref()?
        .captures(field)?;
    Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
}

impl Dialect {
    /// Renders index columns as `"col"(len) DESC, ...`.
    #[must_use]
    pub fn format_index_columns(&self, columns: &[IndexColumn]) -> String {
        columns
            .iter()
            .map(|column| {
                let mut sql = self.quote(&column.name);
                if let Some(length) = column.length {
                    sql.push_str(&format!("({length})"));
                }
                if let Some(order) = column.order {
                    if let Ok(keyword) = self.keyword(order.symbol()) {
                        sql.push(' ');
                        sql.push_str(keyword);
                    }
                }
                sql
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
