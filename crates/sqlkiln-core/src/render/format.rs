//! Column, key and table option definitions for `CREATE TABLE`.

use crate::dialect::{symbols, Capability, Dialect};
use crate::error::{Error, Result};
use crate::schema::{ColumnOptions, ColumnSpec, DefaultValue, KeySpec, SchemaDescription};
use crate::value::SqlValue;

impl Dialect {
    /// Renders every column definition, joined by `",\n"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] for a column whose type the dialect
    /// does not know.
    pub fn format_columns(&self, schema: &SchemaDescription) -> Result<String> {
        schema
            .columns
            .iter()
            .map(|column| self.format_column(column))
            .collect::<Result<Vec<_>>>()
            .map(|columns| columns.join(",\n"))
    }

    /// Renders one column definition.
    ///
    /// Options forced by the dialect's type remap win over the column's own,
    /// which win over the type's defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] for an unregistered type.
    pub fn format_column(&self, column: &ColumnSpec) -> Result<String> {
        let mut native = self.native_type_name(&column.data_type);
        let descriptor = self.types.resolve(&native)?;

        let mut options = column.options.clone();
        if let Some(remap) = self.type_remap(&column.data_type) {
            options = options.forced_by(&remap.forced);
        }
        options = options.merged_with(descriptor.default_options());

        if self.supports(Capability::SerialSequences) && is_sequence_backed(&native, &options) {
            native = String::from(serial_name(&native));
            options.default = None;
            options.length = None;
        }

        let resolved = ColumnSpec {
            options,
            ..column.clone()
        };

        let mut parts = vec![self.quote(&resolved.name)];
        parts.push(match &resolved.options.length {
            Some(length) => format!("{native}({length})"),
            None => native,
        });

        if let Some(charset) = non_empty(resolved.charset.as_deref()) {
            if self.supports(Capability::ColumnCharset) {
                parts.push(self.clause(symbols::CHARACTER_SET, &[charset])?);
            }
        }
        if let Some(collation) = resolved.collation.as_deref() {
            if self.accepts_collation(collation) {
                parts.push(self.clause(symbols::COLLATE, &[collation])?);
            }
        }
        if let Some(constraint) = non_empty(resolved.constraint.as_deref()) {
            parts.push(self.clause(symbols::CONSTRAINT, &[&self.quote(constraint)])?);
        }

        let null = if resolved.is_nullable() {
            symbols::NULL
        } else {
            symbols::NOT_NULL
        };
        parts.push(self.keyword(null)?.to_string());

        if let Some(default) = &resolved.options.default {
            parts.push(self.format_default(default)?);
        }
        if resolved.is_auto_increment() && self.supports(Capability::AutoIncrementKeyword) {
            parts.push(self.keyword(symbols::AUTO_INCREMENT)?.to_string());
        }
        if let Some(comment) = non_empty(resolved.comment.as_deref()) {
            if self.supports(Capability::ColumnComment) {
                let comment = SqlValue::Text(comment.to_string()).to_sql_inline();
                parts.push(self.clause(symbols::COMMENT, &[&comment])?);
            }
        }

        Ok(parts.join(" "))
    }

    /// Renders a `DEFAULT` fragment; an explicit NULL uses the null keyword.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSymbol`] if the dialect lacks the symbols.
    pub fn format_default(&self, default: &DefaultValue) -> Result<String> {
        let value = match default {
            DefaultValue::Null => self.keyword(symbols::NULL)?.to_string(),
            other => other.to_sql(),
        };
        self.clause(symbols::DEFAULT, &[&value])
    }

    /// Renders the table keys, primary first, then unique, foreign and
    /// plain indexes.
    ///
    /// The result starts with `",\n"` so it can follow the column list, and
    /// is empty when there is nothing to render. Plain indexes are left out
    /// when the engine cannot declare them inline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidQuery`] for a foreign key whose reference is
    /// not `table.column`.
    pub fn format_table_keys(&self, schema: &SchemaDescription) -> Result<String> {
        let mut keys: Vec<&KeySpec> = schema.keys.iter().collect();
        keys.sort_by_key(|key| key.rank());

        let mut parts = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(sql) = self.format_table_key(key)? {
                parts.push(sql);
            }
        }

        if parts.is_empty() {
            return Ok(String::new());
        }
        Ok(format!(",\n{}", parts.join(",\n")))
    }

    fn format_table_key(&self, key: &KeySpec) -> Result<Option<String>> {
        let (constraint, sql) = match key {
            KeySpec::Primary {
                constraint,
                columns,
            } => (
                constraint,
                self.clause(symbols::PRIMARY_KEY, &[&self.quote_list(columns)])?,
            ),
            KeySpec::Unique {
                name,
                constraint,
                columns,
            } => {
                let columns = if self.supports(Capability::KeyColumnOptions) {
                    self.format_index_columns(columns)
                } else {
                    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
                    self.quote_list(&names)
                };
                (
                    constraint,
                    self.clause(symbols::UNIQUE_KEY, &[&self.quote(name), &columns])?,
                )
            }
            KeySpec::Foreign {
                column,
                references,
                constraint,
                on_update,
                on_delete,
            } => {
                let (table, target) = references.rsplit_once('.').ok_or_else(|| {
                    Error::invalid(format!("foreign key reference '{references}' is not table.column"))
                })?;
                let mut sql = self.clause(
                    symbols::FOREIGN_KEY,
                    &[&self.quote(column), &self.quote(table), &self.quote(target)],
                )?;
                for (action, clause) in [(on_update, symbols::ON_UPDATE), (on_delete, symbols::ON_DELETE)] {
                    if let Some(action) = action {
                        sql.push(' ');
                        sql.push_str(&self.clause(clause, &[self.keyword(action.symbol())?])?);
                    }
                }
                (constraint, sql)
            }
            KeySpec::Index { name, columns } => {
                if !self.supports(Capability::InlineIndexes) {
                    return Ok(None);
                }
                let sql = self.clause(
                    symbols::INDEX,
                    &[&self.quote(name), &self.format_index_columns(columns)],
                )?;
                return Ok(Some(sql));
            }
        };

        match non_empty(constraint.as_deref()) {
            Some(constraint) => {
                let prefix = self.clause(symbols::CONSTRAINT, &[&self.quote(constraint)])?;
                Ok(Some(format!("{prefix} {sql}")))
            }
            None => Ok(Some(sql)),
        }
    }

    /// Renders the free-form table options, space separated.
    ///
    /// A value naming a keyword is replaced by it. An option renders through
    /// its clause when the dialect has one, otherwise as `<KEYWORD> <value>`;
    /// options the dialect knows neither way are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSymbol`] if a keyword lookup fails.
    pub fn format_table_options(&self, schema: &SchemaDescription) -> Result<String> {
        let mut parts = Vec::with_capacity(schema.options.len());
        for (name, value) in &schema.options {
            let value = if self.has_keyword(value) {
                self.keyword(value)?
            } else {
                value.as_str()
            };

            if self.has_clause(name) {
                parts.push(self.clause(name, &[value])?);
            } else if self.has_keyword(name) {
                parts.push(format!("{} {value}", self.keyword(name)?));
            } else {
                tracing::trace!(option = %name, dialect = self.name, "skipping unknown table option");
            }
        }
        Ok(parts.join(" "))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// An auto-increment integer column whose default, if any, is a sequence.
fn is_sequence_backed(native: &str, options: &ColumnOptions) -> bool {
    let integer = matches!(
        native,
        "int" | "integer" | "int2" | "int4" | "int8" | "smallint" | "bigint"
            | "serial" | "serial2" | "serial4" | "serial8" | "smallserial" | "bigserial"
    );
    let sequence_default = match &options.default {
        None => true,
        Some(DefaultValue::Expression(expr)) => {
            expr.trim_start().to_ascii_lowercase().starts_with("nextval(")
        }
        Some(_) => false,
    };
    integer && options.auto_increment.unwrap_or(false) && sequence_default
}

fn serial_name(native: &str) -> &'static str {
    match native {
        "bigint" | "int8" | "bigserial" | "serial8" => "bigserial",
        "smallint" | "int2" | "smallserial" | "serial2" => "smallserial",
        _ => "serial",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DialectBuilder;
    use crate::schema::{ForeignKeyAction, IndexColumn, Length, SortOrder};

    fn generic() -> Dialect {
        Dialect::generic().unwrap()
    }

    #[test]
    fn test_generic_column() {
        let column = ColumnSpec::new("price", "decimal")
            .length(Length::Precision(8, 2))
            .charset("utf8")
            .collation("utf8_general_ci")
            .default_value(DefaultValue::Float(9.5))
            .comment("it's the price");
        assert_eq!(
            generic().format_column(&column).unwrap(),
            r#""price" decimal(8,2) CHARACTER SET utf8 COLLATE utf8_general_ci NULL DEFAULT 9.5 COMMENT 'it''s the price'"#
        );
    }

    #[test]
    fn test_primary_is_never_nullable() {
        let column = ColumnSpec::new("id", "int").nullable(true).primary();
        let sql = generic().format_column(&column).unwrap();
        assert!(sql.contains("NOT NULL"), "{sql}");
    }

    #[test]
    fn test_unknown_type() {
        let column = ColumnSpec::new("shape", "geometry");
        assert!(matches!(
            generic().format_column(&column),
            Err(Error::UnknownType(name)) if name == "geometry"
        ));
    }

    #[test]
    fn test_explicit_null_default_vs_absent() {
        let d = generic();
        let explicit = ColumnSpec::new("a", "int").default_value(DefaultValue::Null);
        let absent = ColumnSpec::new("a", "int");
        assert_eq!(d.format_column(&explicit).unwrap(), r#""a" int NULL DEFAULT NULL"#);
        assert_eq!(d.format_column(&absent).unwrap(), r#""a" int NULL"#);
        let text = ColumnSpec::new("b", "varchar").default_value(DefaultValue::String(String::from("n/a")));
        assert_eq!(d.format_column(&text).unwrap(), r#""b" varchar(255) NULL DEFAULT 'n/a'"#);
    }

    #[test]
    fn test_collation_pattern() {
        let d = DialectBuilder::generic()
            .collation_pattern("^[a-z]{2}_[A-Z]{2}$")
            .build()
            .unwrap();
        let accepted = ColumnSpec::new("a", "text").collation("en_US");
        let rejected = ColumnSpec::new("a", "text").collation("utf8_bin");
        assert_eq!(d.format_column(&accepted).unwrap(), r#""a" text COLLATE en_US NULL"#);
        assert_eq!(d.format_column(&rejected).unwrap(), r#""a" text NULL"#);
    }

    #[test]
    fn test_serial_sequences() {
        let d = DialectBuilder::generic()
            .capabilities([Capability::SerialSequences])
            .without_capabilities([Capability::AutoIncrementKeyword])
            .build()
            .unwrap();
        let column = ColumnSpec::new("id", "bigint")
            .primary()
            .auto_increment()
            .default_value(DefaultValue::Expression(String::from(
                "nextval('users_id_seq'::regclass)",
            )));
        assert_eq!(d.format_column(&column).unwrap(), r#""id" bigserial NOT NULL"#);
    }

    #[test]
    fn test_serial_sequences_without_default() {
        let d = DialectBuilder::generic()
            .capabilities([Capability::SerialSequences])
            .without_capabilities([Capability::AutoIncrementKeyword])
            .build()
            .unwrap();
        let id = ColumnSpec::new("id", "int").primary().auto_increment();
        assert_eq!(d.format_column(&id).unwrap(), r#""id" serial NOT NULL"#);

        let counter = ColumnSpec::new("n", "smallint")
            .auto_increment()
            .default_value(DefaultValue::Integer(1));
        assert_eq!(d.format_column(&counter).unwrap(), r#""n" smallint NOT NULL DEFAULT 1"#);

        let code = ColumnSpec::new("code", "varchar").auto_increment();
        assert!(!d.format_column(&code).unwrap().contains("serial"));
    }

    #[test]
    fn test_generic_table_keys() {
        let mut schema = SchemaDescription::new("posts");
        schema.add_index("author_id");
        schema.add_key(KeySpec::Foreign {
            column: String::from("author_id"),
            references: String::from("users.id"),
            constraint: Some(String::from("fk_author")),
            on_update: Some(ForeignKeyAction::Cascade),
            on_delete: Some(ForeignKeyAction::SetNull),
        });
        schema.add_key(KeySpec::Unique {
            name: String::from("slug"),
            constraint: None,
            columns: vec![IndexColumn::new("slug").length(32).order(SortOrder::Asc)],
        });
        schema.add_primary("id");

        assert_eq!(
            generic().format_table_keys(&schema).unwrap(),
            concat!(
                ",\nPRIMARY KEY (\"id\")",
                ",\nUNIQUE KEY \"slug\" (\"slug\"(32) ASC)",
                ",\nCONSTRAINT \"fk_author\" FOREIGN KEY (\"author_id\") REFERENCES \"users\"(\"id\") ON UPDATE CASCADE ON DELETE SET NULL",
                ",\nKEY \"author_id\" (\"author_id\")"
            )
        );
    }

    #[test]
    fn test_no_keys_renders_nothing() {
        let schema = SchemaDescription::new("t").with_column(ColumnSpec::new("a", "int"));
        assert_eq!(generic().format_table_keys(&schema).unwrap(), "");
    }

    #[test]
    fn test_bad_foreign_reference() {
        let mut schema = SchemaDescription::new("t");
        schema.add_key(KeySpec::foreign("a", "users"));
        assert!(matches!(
            generic().format_table_keys(&schema),
            Err(Error::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_table_options() {
        let d = DialectBuilder::generic()
            .keywords([("engine", "ENGINE"), ("innodb", "InnoDB")])
            .clauses([("charset", "DEFAULT CHARSET=%s")])
            .build()
            .unwrap();
        let mut schema = SchemaDescription::new("t");
        schema
            .add_option("engine", "innodb")
            .add_option("charset", "utf8mb4")
            .add_option("shards", "4");
        assert_eq!(
            d.format_table_options(&schema).unwrap(),
            "ENGINE InnoDB DEFAULT CHARSET=utf8mb4"
        );
    }
}
