//! SQL values, binding kinds and bound parameters.
//!
//! Predicate and record values never reach the SQL text; they travel in the
//! ordered parameter list next to a `?` placeholder. Function arguments and
//! column defaults are the only values rendered inline, and those go through
//! [`SqlValue::to_sql_inline`].

use serde::{Deserialize, Serialize};

/// A SQL value that can be bound or rendered inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns the SQL representation for inline use (escaped).
    ///
    /// **Warning**: Prefer using parameterized queries instead.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => {
                if *b {
                    String::from("TRUE")
                } else {
                    String::from("FALSE")
                }
            }
            Self::Int(n) => format!("{n}"),
            Self::Float(f) => format!("{f}"),
            Self::Text(s) => {
                let escaped = s.replace('\'', "''");
                format!("'{escaped}'")
            }
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }

    /// Infers the binding kind from the value itself.
    #[must_use]
    pub const fn binding_kind(&self) -> BindingKind {
        match self {
            Self::Null => BindingKind::Null,
            Self::Bool(_) => BindingKind::Bool,
            Self::Int(_) => BindingKind::Int,
            Self::Float(_) => BindingKind::Float,
            Self::Text(_) => BindingKind::String,
            Self::Blob(_) => BindingKind::Raw,
        }
    }

    /// Returns the text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the parameter placeholder.
    #[must_use]
    pub const fn placeholder() -> &'static str {
        "?"
    }
}

/// The storage/parameter type used to pair a placeholder with its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    /// Character data.
    String,
    /// Integer data.
    Int,
    /// Floating point data.
    Float,
    /// Boolean data.
    Bool,
    /// SQL NULL.
    Null,
    /// Binary/large-object data passed through untouched.
    Raw,
}

/// A bound parameter: a value and the kind it should be bound as.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    /// The value to bind.
    pub value: SqlValue,
    /// How the value should be bound.
    pub kind: BindingKind,
}

impl Binding {
    /// Creates a binding whose kind is inferred from the value.
    #[must_use]
    pub fn inferred(value: SqlValue) -> Self {
        let kind = value.binding_kind();
        Self { value, kind }
    }

    /// Creates a binding with an explicit kind.
    #[must_use]
    pub const fn new(value: SqlValue, kind: BindingKind) -> Self {
        Self { value, kind }
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for i16 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_value_inline() {
        assert_eq!(SqlValue::Null.to_sql_inline(), "NULL");
        assert_eq!(SqlValue::Bool(true).to_sql_inline(), "TRUE");
        assert_eq!(SqlValue::Int(-100).to_sql_inline(), "-100");
        assert_eq!(SqlValue::Float(2.5).to_sql_inline(), "2.5");
        assert_eq!(
            SqlValue::Blob(vec![0x48, 0x49]).to_sql_inline(),
            "X'4849'"
        );
    }

    #[test]
    fn test_sql_value_inline_text_escaping() {
        assert_eq!(
            SqlValue::Text(String::from("O'Brien")).to_sql_inline(),
            "'O''Brien'"
        );
        assert_eq!(
            SqlValue::Text(String::from("'; DROP TABLE users; --")).to_sql_inline(),
            "'''; DROP TABLE users; --'"
        );
    }

    #[test]
    fn test_binding_kind_inference() {
        assert_eq!(SqlValue::Null.binding_kind(), BindingKind::Null);
        assert_eq!(SqlValue::Bool(false).binding_kind(), BindingKind::Bool);
        assert_eq!(SqlValue::Int(1).binding_kind(), BindingKind::Int);
        assert_eq!(SqlValue::Float(1.5).binding_kind(), BindingKind::Float);
        assert_eq!("x".to_sql_value().binding_kind(), BindingKind::String);
        assert_eq!(vec![1_u8].to_sql_value().binding_kind(), BindingKind::Raw);
    }

    #[test]
    fn test_to_sql_value_conversions() {
        assert_eq!(42_i32.to_sql_value(), SqlValue::Int(42));
        assert_eq!(None::<i32>.to_sql_value(), SqlValue::Null);
        assert_eq!(Some("a").to_sql_value(), SqlValue::Text(String::from("a")));
    }

    #[test]
    fn test_sql_value_json_shape() {
        let values: Vec<SqlValue> = serde_json::from_str(r#"[null, true, 5, 2.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                SqlValue::Null,
                SqlValue::Bool(true),
                SqlValue::Int(5),
                SqlValue::Float(2.5),
                SqlValue::Text(String::from("x")),
            ]
        );
    }
}
