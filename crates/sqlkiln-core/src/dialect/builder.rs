//! Dialect construction by table composition.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use super::{AttributeValue, Attributes, Capability, Clause, Dialect, Statement, TypeRemap};
use crate::error::Result;
use crate::query::QueryKind;
use crate::schema::ColumnOptions;
use crate::types::{TypeDescriptor, TypeRegistry};

/// Builds a [`Dialect`].
///
/// Every `*s` method merges an override map over what is already there, so
/// a dialect is the base tables plus its own overrides and nothing else.
#[derive(Debug, Clone)]
pub struct DialectBuilder {
    name: &'static str,
    quote: char,
    keywords: HashMap<String, String>,
    clauses: HashMap<String, Clause>,
    statements: HashMap<String, Statement>,
    attributes: HashMap<QueryKind, Attributes>,
    types: TypeRegistry,
    remaps: HashMap<String, TypeRemap>,
    collation_pattern: Option<String>,
    capabilities: HashSet<Capability>,
}

impl DialectBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            quote: '"',
            keywords: HashMap::new(),
            clauses: HashMap::new(),
            statements: HashMap::new(),
            attributes: HashMap::new(),
            types: TypeRegistry::new(),
            remaps: HashMap::new(),
            collation_pattern: None,
            capabilities: HashSet::new(),
        }
    }

    /// Renames the dialect being built.
    #[must_use]
    pub const fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Sets the identifier quote character.
    #[must_use]
    pub const fn quote_char(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Merges keywords.
    #[must_use]
    pub fn keywords<I, K, V>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.keywords
            .extend(keywords.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Merges clauses.
    #[must_use]
    pub fn clauses<I, K, V>(mut self, clauses: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Clause>,
    {
        self.clauses
            .extend(clauses.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Merges statement templates.
    #[must_use]
    pub fn statements<I, K, V>(mut self, statements: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Statement>,
    {
        self.statements
            .extend(statements.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Replaces the default attributes of one operation.
    #[must_use]
    pub fn attributes<I, K, V>(mut self, kind: QueryKind, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        let defaults = defaults
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.attributes.insert(kind, defaults);
        self
    }

    /// Removes the default attributes of one operation.
    #[must_use]
    pub fn clear_attributes(mut self, kind: QueryKind) -> Self {
        self.attributes.remove(&kind);
        self
    }

    /// Replaces the whole type registry.
    #[must_use]
    pub fn types(mut self, registry: TypeRegistry) -> Self {
        self.types = registry;
        self
    }

    /// Registers a type under `name`.
    #[must_use]
    pub fn register_type(mut self, name: &str, descriptor: TypeDescriptor) -> Self {
        self.types.register(name, descriptor);
        self
    }

    /// Registers a batch of types.
    #[must_use]
    pub fn register_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, TypeDescriptor)>,
    {
        for (name, descriptor) in types {
            self.types.register(name, descriptor);
        }
        self
    }

    /// Renders the logical type `from` under the engine-native name `to`.
    #[must_use]
    pub fn remap_type(self, from: &str, to: &str) -> Self {
        self.force_type(from, to, ColumnOptions::default())
    }

    /// Like [`remap_type`](Self::remap_type), also forcing options.
    #[must_use]
    pub fn force_type(mut self, from: &str, to: &str, forced: ColumnOptions) -> Self {
        self.remaps.insert(
            from.to_ascii_lowercase(),
            TypeRemap {
                target: to.to_ascii_lowercase(),
                forced,
            },
        );
        self
    }

    /// Only accept collations matching `pattern`.
    #[must_use]
    pub fn collation_pattern(mut self, pattern: &str) -> Self {
        self.collation_pattern = Some(pattern.to_string());
        self
    }

    /// Declares capabilities as supported.
    #[must_use]
    pub fn capabilities<I>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = Capability>,
    {
        self.capabilities.extend(capabilities);
        self
    }

    /// Declares capabilities as unsupported.
    #[must_use]
    pub fn without_capabilities<I>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = Capability>,
    {
        for capability in capabilities {
            self.capabilities.remove(&capability);
        }
        self
    }

    /// Freezes the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPattern`] for a bad collation pattern
    /// and [`crate::Error::UnknownSymbol`] when a symbol the renderer or a
    /// default attribute needs is missing.
    pub fn build(self) -> Result<Dialect> {
        let collation_pattern = self
            .collation_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()?;

        let dialect = Dialect {
            name: self.name,
            quote: self.quote,
            keywords: self.keywords,
            clauses: self.clauses,
            statements: self.statements,
            attributes: self.attributes,
            types: self.types,
            remaps: self.remaps,
            collation_pattern,
            capabilities: self.capabilities,
        };
        dialect.self_check()?;

        tracing::debug!(
            dialect = dialect.name,
            keywords = dialect.keywords.len(),
            clauses = dialect.clauses.len(),
            statements = dialect.statements.len(),
            types = dialect.types.len(),
            "built dialect"
        );
        Ok(dialect)
    }
}
