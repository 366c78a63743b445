//! Engine-neutral type descriptors.

use super::{datetime::format_datetime, TypeDescriptor, TypeRegistry};
use crate::schema::{ColumnOptions, DefaultValue, Length};
use crate::value::{BindingKind, SqlValue};

fn nullable() -> ColumnOptions {
    ColumnOptions {
        nullable: Some(true),
        ..ColumnOptions::default()
    }
}

fn nullable_with_length(length: u32) -> ColumnOptions {
    ColumnOptions {
        length: Some(Length::Size(length)),
        ..nullable()
    }
}

fn nullable_default_null() -> ColumnOptions {
    ColumnOptions {
        default: Some(DefaultValue::Null),
        ..nullable()
    }
}

fn to_int(value: SqlValue) -> SqlValue {
    match value {
        SqlValue::Text(s) => match s.trim().parse() {
            Ok(n) => SqlValue::Int(n),
            Err(_) => SqlValue::Text(s),
        },
        SqlValue::Bool(b) => SqlValue::Int(i64::from(b)),
        other => other,
    }
}

fn to_float(value: SqlValue) -> SqlValue {
    match value {
        SqlValue::Text(s) => match s.trim().parse() {
            Ok(f) => SqlValue::Float(f),
            Err(_) => SqlValue::Text(s),
        },
        #[allow(clippy::cast_precision_loss)]
        SqlValue::Int(n) => SqlValue::Float(n as f64),
        other => other,
    }
}

fn to_text(value: SqlValue) -> SqlValue {
    match value {
        SqlValue::Int(n) => SqlValue::Text(n.to_string()),
        SqlValue::Float(f) => SqlValue::Text(f.to_string()),
        other => other,
    }
}

fn to_bool(value: SqlValue) -> SqlValue {
    match value {
        SqlValue::Int(n) => SqlValue::Bool(n != 0),
        SqlValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "t" | "true" | "y" | "yes" | "on" => SqlValue::Bool(true),
            "0" | "f" | "false" | "n" | "no" | "off" => SqlValue::Bool(false),
            _ => SqlValue::Text(s),
        },
        other => other,
    }
}

fn to_date(value: SqlValue) -> SqlValue {
    format_datetime(value, "%Y-%m-%d")
}

fn to_time(value: SqlValue) -> SqlValue {
    format_datetime(value, "%H:%M:%S")
}

fn to_datetime(value: SqlValue) -> SqlValue {
    format_datetime(value, "%Y-%m-%d %H:%M:%S")
}

/// Integer descriptor named `name`.
#[must_use]
pub fn integer(name: &str) -> TypeDescriptor {
    TypeDescriptor::new(name, BindingKind::Int)
        .with_defaults(nullable())
        .with_to_storage(to_int)
        .with_from_storage(to_int)
}

/// Floating point descriptor named `name`.
#[must_use]
pub fn float(name: &str) -> TypeDescriptor {
    TypeDescriptor::new(name, BindingKind::Float)
        .with_defaults(nullable())
        .with_to_storage(to_float)
        .with_from_storage(to_float)
}

/// Fixed-point descriptor; bound as text to keep precision.
#[must_use]
pub fn decimal() -> TypeDescriptor {
    TypeDescriptor::new("decimal", BindingKind::String)
        .with_defaults(nullable())
        .with_to_storage(to_text)
}

/// Boolean descriptor.
#[must_use]
pub fn boolean() -> TypeDescriptor {
    TypeDescriptor::new("boolean", BindingKind::Bool)
        .with_defaults(nullable())
        .with_to_storage(to_bool)
        .with_from_storage(to_bool)
}

/// Character descriptor named `name` with an optional default length.
#[must_use]
pub fn text(name: &str, length: Option<u32>) -> TypeDescriptor {
    let defaults = length.map_or_else(nullable, nullable_with_length);
    TypeDescriptor::new(name, BindingKind::String)
        .with_defaults(defaults)
        .with_to_storage(to_text)
}

/// Binary descriptor named `name`.
#[must_use]
pub fn binary(name: &str) -> TypeDescriptor {
    TypeDescriptor::new(name, BindingKind::Raw).with_defaults(nullable())
}

/// `DATE` descriptor.
#[must_use]
pub fn date() -> TypeDescriptor {
    TypeDescriptor::new("date", BindingKind::String)
        .with_defaults(nullable_default_null())
        .with_to_storage(to_date)
}

/// `TIME` descriptor.
#[must_use]
pub fn time() -> TypeDescriptor {
    TypeDescriptor::new("time", BindingKind::String)
        .with_defaults(nullable_default_null())
        .with_to_storage(to_time)
}

/// `DATETIME` descriptor; also used for `TIMESTAMP`.
#[must_use]
pub fn datetime() -> TypeDescriptor {
    TypeDescriptor::new("datetime", BindingKind::String)
        .with_defaults(nullable_default_null())
        .with_to_storage(to_datetime)
}

/// Auto-incrementing integer descriptor.
#[must_use]
pub fn serial() -> TypeDescriptor {
    TypeDescriptor::new("serial", BindingKind::Int)
        .with_defaults(ColumnOptions {
            nullable: Some(false),
            unique: Some(true),
            auto_increment: Some(true),
            ..ColumnOptions::default()
        })
        .with_to_storage(to_int)
}

/// Registers every base type and its aliases.
pub fn register_base_types(registry: &mut TypeRegistry) {
    for name in ["int", "integer"] {
        registry.register(name, integer("int"));
    }
    for name in ["tinyint", "smallint", "mediumint", "bigint"] {
        registry.register(name, integer(name));
    }
    registry.register("serial", serial());
    for name in ["float", "real"] {
        registry.register(name, float("float"));
    }
    registry.register("double", float("double"));
    for name in ["decimal", "numeric"] {
        registry.register(name, decimal());
    }
    for name in ["boolean", "bool"] {
        registry.register(name, boolean());
    }
    for name in ["string", "varchar"] {
        registry.register(name, text("string", Some(255)));
    }
    registry.register("char", text("char", Some(1)));
    registry.register("text", text("text", None));
    registry.register("blob", binary("blob"));
    registry.register("binary", binary("binary"));
    registry.register("date", date());
    registry.register("time", time());
    for name in ["datetime", "timestamp"] {
        registry.register(name, datetime());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_conversions() {
        let int = integer("int");
        assert_eq!(int.to_storage(SqlValue::Text(String::from(" 42 "))), SqlValue::Int(42));
        assert_eq!(int.to_storage(SqlValue::Bool(true)), SqlValue::Int(1));
        let junk = SqlValue::Text(String::from("abc"));
        assert_eq!(int.to_storage(junk.clone()), junk);
    }

    #[test]
    fn test_boolean_conversions() {
        let b = boolean();
        assert_eq!(b.to_storage(SqlValue::Int(0)), SqlValue::Bool(false));
        assert_eq!(b.from_storage(SqlValue::Text(String::from("t"))), SqlValue::Bool(true));
    }

    #[test]
    fn test_temporal_defaults_and_storage() {
        let dt = datetime();
        assert_eq!(dt.default_options().default, Some(DefaultValue::Null));
        assert_eq!(
            dt.to_storage(SqlValue::Int(86_400)),
            SqlValue::Text(String::from("1970-01-02 00:00:00"))
        );
        assert_eq!(
            date().to_storage(SqlValue::Text(String::from("1988-02-26 00:02:05"))),
            SqlValue::Text(String::from("1988-02-26"))
        );
    }

    #[test]
    fn test_base_serial_defaults() {
        let defaults = serial().default_options().clone();
        assert_eq!(defaults.nullable, Some(false));
        assert_eq!(defaults.auto_increment, Some(true));
        assert_eq!(defaults.unique, Some(true));
    }
}
