//! PostgreSQL type names.
//!
//! Every engine-native spelling PostgreSQL reports through
//! `information_schema.columns.data_type` resolves to a descriptor, so an
//! introspected schema can be formatted again without remapping.

use sqlkiln_core::schema::ColumnOptions;
use sqlkiln_core::types::{self, format_datetime, TypeDescriptor};
use sqlkiln_core::{BindingKind, SqlValue};

/// Storage format of `timestamp with time zone` values.
pub const DATETIME_TZ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%z";

/// Storage format of `time with time zone` values.
pub const TIME_TZ_FORMAT: &str = "%H:%M:%S%z";

fn to_datetime_tz(value: SqlValue) -> SqlValue {
    format_datetime(value, DATETIME_TZ_FORMAT)
}

fn to_time_tz(value: SqlValue) -> SqlValue {
    format_datetime(value, TIME_TZ_FORMAT)
}

/// Sequence-backed integer, bound like the integer it is stored as.
#[must_use]
pub fn serial(name: &str) -> TypeDescriptor {
    types::integer(name).with_defaults(serial_options())
}

/// Options every serial column gets, whatever the caller states.
#[must_use]
pub fn serial_options() -> ColumnOptions {
    ColumnOptions {
        nullable: Some(false),
        primary: Some(true),
        ..ColumnOptions::default()
    }
}

/// `timestamp with time zone`.
#[must_use]
pub fn datetime_tz() -> TypeDescriptor {
    TypeDescriptor::new("datetimetz", BindingKind::String)
        .with_defaults(types::datetime().default_options().clone())
        .with_to_storage(to_datetime_tz)
}

/// `time with time zone`.
#[must_use]
pub fn time_tz() -> TypeDescriptor {
    TypeDescriptor::new("timetz", BindingKind::String)
        .with_defaults(types::time().default_options().clone())
        .with_to_storage(to_time_tz)
}

/// Every PostgreSQL-specific name and alias.
#[must_use]
pub fn pgsql_types() -> Vec<(&'static str, TypeDescriptor)> {
    let mut all = Vec::new();

    for name in ["int2", "int4", "int8", "integer", "smallint", "bigint"] {
        all.push((name, types::integer(name)));
    }
    for name in ["serial", "serial2", "serial4", "serial8", "smallserial", "bigserial"] {
        all.push((name, serial(name)));
    }
    for name in ["real", "float4"] {
        all.push((name, types::float(name)));
    }
    for name in ["double precision", "float8"] {
        all.push((name, types::float(name)));
    }
    for name in ["numeric", "decimal", "money"] {
        all.push((name, types::decimal()));
    }
    for name in ["bit", "bit varying", "varbit", "bytea"] {
        all.push((name, types::binary(name)));
    }
    for name in ["char", "character"] {
        all.push((name, types::text(name, Some(1))));
    }
    for name in ["varchar", "character varying"] {
        all.push((name, types::text(name, Some(255))));
    }
    for name in ["cidr", "inet", "macaddr", "uuid", "json", "jsonb", "xml", "interval"] {
        all.push((name, types::text(name, None)));
    }

    all.push(("time without time zone", types::time()));
    all.push(("timestamp without time zone", types::datetime()));
    all.push(("timetz", time_tz()));
    all.push(("time with time zone", time_tz()));
    all.push(("datetimetz", datetime_tz()));
    all.push(("timestamptz", datetime_tz()));
    all.push(("timestamp with time zone", datetime_tz()));
    all
}
