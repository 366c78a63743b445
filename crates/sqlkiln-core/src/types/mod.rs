//! Column type registry.
//!
//! Logical type names (`int`, `varchar`, `datetime`, ...) resolve to a
//! [`TypeDescriptor`] carrying the options a column of that type gets when
//! the caller leaves them unstated, the kind its values are bound as, and
//! the conversions applied on the way to and from storage.

mod base;
mod datetime;

pub use base::{
    binary, boolean, date, datetime, decimal, float, integer, register_base_types, serial, text,
    time,
};
pub use datetime::{format_datetime, parse_datetime};

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::schema::ColumnOptions;
use crate::value::{BindingKind, SqlValue};

/// A value conversion between application and storage representations.
pub type Converter = fn(SqlValue) -> SqlValue;

fn identity(value: SqlValue) -> SqlValue {
    value
}

/// Describes one logical column type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: String,
    default_options: ColumnOptions,
    binding: BindingKind,
    to_storage: Converter,
    from_storage: Converter,
}

impl TypeDescriptor {
    /// Creates a descriptor with no default options and identity conversions.
    #[must_use]
    pub fn new(name: impl Into<String>, binding: BindingKind) -> Self {
        Self {
            name: name.into(),
            default_options: ColumnOptions::default(),
            binding,
            to_storage: identity,
            from_storage: identity,
        }
    }

    /// Sets the default options.
    #[must_use]
    pub fn with_defaults(mut self, defaults: ColumnOptions) -> Self {
        self.default_options = defaults;
        self
    }

    /// Sets the conversion applied before a value is bound.
    #[must_use]
    pub fn with_to_storage(mut self, convert: Converter) -> Self {
        self.to_storage = convert;
        self
    }

    /// Sets the conversion applied to values read back from storage.
    #[must_use]
    pub fn with_from_storage(mut self, convert: Converter) -> Self {
        self.from_storage = convert;
        self
    }

    /// The descriptor's canonical name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Options applied underneath a column's explicit options.
    #[must_use]
    pub const fn default_options(&self) -> &ColumnOptions {
        &self.default_options
    }

    /// How values of this type are bound.
    #[must_use]
    pub const fn binding_kind(&self) -> BindingKind {
        self.binding
    }

    /// Converts an application value for storage.
    #[must_use]
    pub fn to_storage(&self, value: SqlValue) -> SqlValue {
        (self.to_storage)(value)
    }

    /// Converts a stored value back for the application.
    #[must_use]
    pub fn from_storage(&self, value: SqlValue) -> SqlValue {
        (self.from_storage)(value)
    }
}

/// Case-insensitive map of type names (and aliases) to descriptors.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the engine-neutral base types.
    #[must_use]
    pub fn with_base_types() -> Self {
        let mut registry = Self::new();
        register_base_types(&mut registry);
        registry
    }

    /// Registers `descriptor` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, descriptor: TypeDescriptor) -> &mut Self {
        self.types.insert(name.to_ascii_lowercase(), descriptor);
        self
    }

    /// Resolves a type name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] when nothing is registered under
    /// `name`. There is no fallback descriptor.
    pub fn resolve(&self, name: &str) -> Result<&TypeDescriptor> {
        self.types
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| Error::UnknownType(name.to_string()))
    }

    /// Default options for a type name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] for unregistered names.
    pub fn default_options_for(&self, name: &str) -> Result<&ColumnOptions> {
        self.resolve(name).map(TypeDescriptor::default_options)
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(&name.to_ascii_lowercase())
    }

    /// Number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
