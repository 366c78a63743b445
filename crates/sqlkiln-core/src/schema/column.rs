//! Column specifications and their mergeable options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value::SqlValue;

/// Length or precision suffix of a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Length {
    /// A single size, e.g. `varchar(255)`.
    Size(u32),
    /// Precision and scale, e.g. `numeric(8,2)`.
    Precision(u32, u32),
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size(n) => write!(f, "{n}"),
            Self::Precision(p, s) => write!(f, "{p},{s}"),
        }
    }
}

impl FromStr for Length {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(',') {
            Some((p, scale)) => Ok(Self::Precision(p.trim().parse()?, scale.trim().parse()?)),
            None => Ok(Self::Size(s.trim().parse()?)),
        }
    }
}

/// Default value for a column.
///
/// An absent default is `None` on the owning [`ColumnOptions`]; an explicit
/// `DEFAULT NULL` is `Some(DefaultValue::Null)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    /// NULL default.
    Null,
    /// Boolean default.
    Boolean(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default, quoted when rendered.
    String(String),
    /// Raw SQL expression (e.g., CURRENT_TIMESTAMP).
    Expression(String),
}

impl DefaultValue {
    /// Returns the SQL representation of the default value.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Boolean(b) => SqlValue::Bool(*b).to_sql_inline(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => SqlValue::Text(s.clone()).to_sql_inline(),
            Self::Expression(expr) => expr.clone(),
        }
    }
}

/// Options that can come from the caller, from a type's defaults, or be
/// forced by a dialect remap. `None` means "not stated".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnOptions {
    /// Whether NULL is allowed.
    pub nullable: Option<bool>,
    /// Default value.
    pub default: Option<DefaultValue>,
    /// Whether the column is (part of) the primary key.
    pub primary: Option<bool>,
    /// Whether the column is unique.
    pub unique: Option<bool>,
    /// Whether the column auto-increments.
    pub auto_increment: Option<bool>,
    /// Length or precision.
    pub length: Option<Length>,
}

impl ColumnOptions {
    /// Fills every unstated option from `fallback`; stated options win.
    #[must_use]
    pub fn merged_with(&self, fallback: &Self) -> Self {
        Self {
            nullable: self.nullable.or(fallback.nullable),
            default: self.default.clone().or_else(|| fallback.default.clone()),
            primary: self.primary.or(fallback.primary),
            unique: self.unique.or(fallback.unique),
            auto_increment: self.auto_increment.or(fallback.auto_increment),
            length: self.length.or(fallback.length),
        }
    }

    /// Overwrites every option `forced` states, regardless of what is set.
    #[must_use]
    pub fn forced_by(&self, forced: &Self) -> Self {
        forced.merged_with(self)
    }
}

/// One column of a [`SchemaDescription`](super::SchemaDescription).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Logical type name, looked up in the dialect's type registry.
    #[serde(rename = "type")]
    pub data_type: String,
    /// Explicitly stated options.
    #[serde(flatten)]
    pub options: ColumnOptions,
    /// Collation name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collation: Option<String>,
    /// Character set name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    /// Inline constraint name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
    /// Column comment, for engines that keep one inline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Register a plain index on this column when added to a schema.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub index: bool,
}

impl ColumnSpec {
    /// Creates a column with no stated options.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            options: ColumnOptions::default(),
            collation: None,
            charset: None,
            constraint: None,
            comment: None,
            index: false,
        }
    }

    /// Sets nullability.
    #[must_use]
    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.options.nullable = Some(nullable);
        self
    }

    /// Marks the column as the primary key.
    #[must_use]
    pub const fn primary(mut self) -> Self {
        self.options.primary = Some(true);
        self
    }

    /// Marks the column as unique.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.options.unique = Some(true);
        self
    }

    /// Marks the column as auto-incrementing.
    #[must_use]
    pub const fn auto_increment(mut self) -> Self {
        self.options.auto_increment = Some(true);
        self
    }

    /// Requests a plain index on this column.
    #[must_use]
    pub const fn indexed(mut self) -> Self {
        self.index = true;
        self
    }

    /// Sets a length or precision.
    #[must_use]
    pub const fn length(mut self, length: Length) -> Self {
        self.options.length = Some(length);
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, default: DefaultValue) -> Self {
        self.options.default = Some(default);
        self
    }

    /// Sets the collation.
    #[must_use]
    pub fn collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }

    /// Sets the character set.
    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Sets the inline constraint name.
    #[must_use]
    pub fn constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Whether the column is part of the primary key.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.options.primary.unwrap_or(false)
    }

    /// Whether the column is unique.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.options.unique.unwrap_or(false)
    }

    /// Whether the column auto-increments.
    #[must_use]
    pub fn is_auto_increment(&self) -> bool {
        self.options.auto_increment.unwrap_or(false)
    }

    /// Whether the column accepts NULL.
    ///
    /// Primary, unique and auto-increment columns never do; an unstated
    /// nullability means NOT NULL.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        if self.is_primary() || self.is_unique() || self.is_auto_increment() {
            return false;
        }
        self.options.nullable.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_parse_and_display() {
        assert_eq!("255".parse::<Length>().unwrap(), Length::Size(255));
        assert_eq!("8, 2".parse::<Length>().unwrap(), Length::Precision(8, 2));
        assert_eq!(Length::Precision(8, 2).to_string(), "8,2");
        assert!("".parse::<Length>().is_err());
    }

    #[test]
    fn test_default_value_sql() {
        assert_eq!(DefaultValue::Null.to_sql(), "NULL");
        assert_eq!(DefaultValue::Integer(3).to_sql(), "3");
        assert_eq!(DefaultValue::String(String::from("it's")).to_sql(), "'it''s'");
        assert_eq!(
            DefaultValue::Expression(String::from("CURRENT_TIMESTAMP")).to_sql(),
            "CURRENT_TIMESTAMP"
        );
    }

    #[test]
    fn test_explicit_options_win_over_defaults() {
        let explicit = ColumnOptions {
            nullable: Some(false),
            ..ColumnOptions::default()
        };
        let defaults = ColumnOptions {
            nullable: Some(true),
            length: Some(Length::Size(255)),
            ..ColumnOptions::default()
        };
        let merged = explicit.merged_with(&defaults);
        assert_eq!(merged.nullable, Some(false));
        assert_eq!(merged.length, Some(Length::Size(255)));
    }

    #[test]
    fn test_forced_options_override_explicit() {
        let explicit = ColumnOptions {
            nullable: Some(true),
            primary: Some(false),
            ..ColumnOptions::default()
        };
        let forced = ColumnOptions {
            nullable: Some(false),
            primary: Some(true),
            ..ColumnOptions::default()
        };
        let result = explicit.forced_by(&forced);
        assert_eq!(result.nullable, Some(false));
        assert_eq!(result.primary, Some(true));
    }

    #[test]
    fn test_primary_or_unique_is_never_nullable() {
        assert!(!ColumnSpec::new("id", "int").nullable(true).primary().is_nullable());
        assert!(!ColumnSpec::new("email", "varchar").nullable(true).unique().is_nullable());
        assert!(ColumnSpec::new("bio", "text").nullable(true).is_nullable());
        assert!(!ColumnSpec::new("bio", "text").is_nullable());
    }
}
