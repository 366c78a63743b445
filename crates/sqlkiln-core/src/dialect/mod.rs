//! SQL dialects.
//!
//! A [`Dialect`] is a value: keyword, clause and statement tables, default
//! attributes per operation, a quote character, a type registry with
//! engine-native remaps, and the capabilities the engine supports. Dialects
//! are produced by a [`DialectBuilder`], starting from the
//! [`generic`](DialectBuilder::generic) base and applying override maps.
//!
//! A built dialect is read-only during rendering and can be shared across
//! threads. The `add_*` hooks take `&mut self` and so cannot race with it.

mod attributes;
mod builder;
mod clause;
mod generic;
mod statement;
pub mod symbols;

pub use attributes::{effective, AttributeValue, Attributes, FragmentFn};
pub use builder::DialectBuilder;
pub use clause::Clause;
pub use statement::Statement;

use std::collections::{HashMap, HashSet};
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::query::QueryKind;
use crate::schema::ColumnOptions;
use crate::types::{TypeDescriptor, TypeRegistry};

/// Engine features the renderer adapts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Plain indexes may be declared inside `CREATE TABLE`.
    InlineIndexes,
    /// `DELETE ... LIMIT`.
    DeleteLimit,
    /// `DELETE ... ORDER BY`.
    DeleteOrder,
    /// `UPDATE ... LIMIT`.
    UpdateLimit,
    /// `UPDATE ... ORDER BY`.
    UpdateOrder,
    /// Joins in `DELETE`.
    DeleteJoins,
    /// Joins in `UPDATE`.
    UpdateJoins,
    /// The driver reports which table each result column came from.
    ResultColumnOrigin,
    /// `CHARACTER SET` in column definitions.
    ColumnCharset,
    /// `COMMENT` in column definitions.
    ColumnComment,
    /// An `AUTO_INCREMENT` keyword in column definitions.
    AutoIncrementKeyword,
    /// Sequence-backed columns declared through serial pseudo-types.
    SerialSequences,
    /// Prefix lengths and sort orders on unique-key columns.
    KeyColumnOptions,
}

impl Capability {
    /// Every capability.
    pub const ALL: [Self; 13] = [
        Self::InlineIndexes,
        Self::DeleteLimit,
        Self::DeleteOrder,
        Self::UpdateLimit,
        Self::UpdateOrder,
        Self::DeleteJoins,
        Self::UpdateJoins,
        Self::ResultColumnOrigin,
        Self::ColumnCharset,
        Self::ColumnComment,
        Self::AutoIncrementKeyword,
        Self::SerialSequences,
        Self::KeyColumnOptions,
    ];

    /// Snake-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::InlineIndexes => "inline_indexes",
            Self::DeleteLimit => "delete_limit",
            Self::DeleteOrder => "delete_order",
            Self::UpdateLimit => "update_limit",
            Self::UpdateOrder => "update_order",
            Self::DeleteJoins => "delete_joins",
            Self::UpdateJoins => "update_joins",
            Self::ResultColumnOrigin => "result_column_origin",
            Self::ColumnCharset => "column_charset",
            Self::ColumnComment => "column_comment",
            Self::AutoIncrementKeyword => "auto_increment_keyword",
            Self::SerialSequences => "serial_sequences",
            Self::KeyColumnOptions => "key_column_options",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A logical type rendered under an engine-native name.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRemap {
    /// Engine-native type name.
    pub target: String,
    /// Options set regardless of what the column states.
    pub forced: ColumnOptions,
}

/// A complete, frozen dialect configuration.
#[derive(Debug, Clone)]
pub struct Dialect {
    pub(crate) name: &'static str,
    pub(crate) quote: char,
    pub(crate) keywords: HashMap<String, String>,
    pub(crate) clauses: HashMap<String, Clause>,
    pub(crate) statements: HashMap<String, Statement>,
    pub(crate) attributes: HashMap<QueryKind, Attributes>,
    pub(crate) types: TypeRegistry,
    pub(crate) remaps: HashMap<String, TypeRemap>,
    pub(crate) collation_pattern: Option<Regex>,
    pub(crate) capabilities: HashSet<Capability>,
}

impl Dialect {
    /// Creates a builder seeded with nothing but `name`.
    #[must_use]
    pub fn builder(name: &'static str) -> DialectBuilder {
        DialectBuilder::new(name)
    }

    /// Builds the engine-neutral base dialect.
    ///
    /// # Errors
    ///
    /// Fails only if the base tables are incomplete.
    pub fn generic() -> Result<Self> {
        DialectBuilder::generic().build()
    }

    /// Returns the name of the dialect.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the identifier quote character.
    #[must_use]
    pub const fn quote_char(&self) -> char {
        self.quote
    }

    /// Quotes an identifier.
    ///
    /// Dotted identifiers are quoted per segment, existing quote characters
    /// are stripped first, and a `*` segment stays bare. Quoting an already
    /// quoted identifier returns it unchanged.
    #[must_use]
    pub fn quote(&self, identifier: &str) -> String {
        if identifier.is_empty() {
            return String::new();
        }
        let q = self.quote;
        identifier
            .split('.')
            .map(|segment| {
                let bare: String = segment.chars().filter(|&c| c != q).collect();
                if bare == "*" {
                    bare
                } else {
                    format!("{q}{bare}{q}")
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quotes each identifier and joins them with `, `.
    #[must_use]
    pub fn quote_list<S: AsRef<str>>(&self, identifiers: &[S]) -> String {
        identifiers
            .iter()
            .map(|identifier| self.quote(identifier.as_ref()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Looks up a keyword.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSymbol`] if the keyword is not defined.
    pub fn keyword(&self, name: &str) -> Result<&str> {
        self.keywords
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::unknown_keyword(name))
    }

    /// Whether a keyword is defined.
    #[must_use]
    pub fn has_keyword(&self, name: &str) -> bool {
        self.keywords.contains_key(name)
    }

    /// Formats a clause with positional arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSymbol`] if the clause is not defined.
    pub fn clause(&self, name: &str, args: &[&str]) -> Result<String> {
        self.clauses
            .get(name)
            .map(|clause| clause.format(args))
            .ok_or_else(|| Error::unknown_clause(name))
    }

    /// Whether a clause is defined.
    #[must_use]
    pub fn has_clause(&self, name: &str) -> bool {
        self.clauses.contains_key(name)
    }

    /// Looks up a statement template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTemplate`] if no template has that name.
    pub fn statement(&self, name: &str) -> Result<&Statement> {
        self.statements
            .get(name)
            .ok_or_else(|| Error::MissingTemplate(name.to_string()))
    }

    /// Whether a statement template is defined.
    #[must_use]
    pub fn has_statement(&self, name: &str) -> bool {
        self.statements.contains_key(name)
    }

    /// Default attributes of an operation.
    #[must_use]
    pub fn default_attributes(&self, kind: QueryKind) -> Option<&Attributes> {
        self.attributes.get(&kind)
    }

    /// Whether the engine supports `capability`.
    #[must_use]
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// The type registry.
    #[must_use]
    pub const fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// The remap applied to a logical type name, if any.
    #[must_use]
    pub fn type_remap(&self, logical: &str) -> Option<&TypeRemap> {
        self.remaps.get(&logical.to_ascii_lowercase())
    }

    /// Engine-native name of a logical type.
    #[must_use]
    pub fn native_type_name(&self, logical: &str) -> String {
        self.type_remap(logical)
            .map_or_else(|| logical.to_ascii_lowercase(), |remap| remap.target.clone())
    }

    /// Resolves a logical type through the remap table and the registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] if the resolved name is not registered.
    pub fn resolve_type(&self, logical: &str) -> Result<&TypeDescriptor> {
        self.types.resolve(&self.native_type_name(logical))
    }

    /// Whether a collation name is acceptable to the engine.
    #[must_use]
    pub fn accepts_collation(&self, collation: &str) -> bool {
        !collation.is_empty()
            && self
                .collation_pattern
                .as_ref()
                .is_none_or(|pattern| pattern.is_match(collation))
    }

    /// Merges statement templates; later entries replace earlier ones.
    pub fn add_statements<I, K, V>(&mut self, statements: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Statement>,
    {
        self.statements
            .extend(statements.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Merges keywords; later entries replace earlier ones.
    pub fn add_keywords<I, K, V>(&mut self, keywords: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.keywords
            .extend(keywords.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Merges clauses; later entries replace earlier ones.
    pub fn add_clauses<I, K, V>(&mut self, clauses: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Clause>,
    {
        self.clauses
            .extend(clauses.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Checks that every symbol the renderer and the default attributes can
    /// ask for resolves.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::UnknownSymbol`] found.
    pub fn self_check(&self) -> Result<()> {
        for keyword in symbols::RENDERER_KEYWORDS {
            self.keyword(keyword)?;
        }
        for clause in symbols::RENDERER_CLAUSES {
            if !self.has_clause(clause) {
                return Err(Error::unknown_clause(*clause));
            }
        }

        let conditional = [
            (Capability::InlineIndexes, symbols::INDEX, false),
            (Capability::ColumnCharset, symbols::CHARACTER_SET, false),
            (Capability::ColumnComment, symbols::COMMENT, false),
            (Capability::AutoIncrementKeyword, symbols::AUTO_INCREMENT, true),
        ];
        for (capability, symbol, is_keyword) in conditional {
            if !self.supports(capability) {
                continue;
            }
            if is_keyword {
                self.keyword(symbol)?;
            } else if !self.has_clause(symbol) {
                return Err(Error::unknown_clause(symbol));
            }
        }

        for (kind, attributes) in &self.attributes {
            for (name, value) in attributes {
                if let Some(keyword) = value.keyword_name(name) {
                    self.keyword(keyword).map_err(|err| {
                        tracing::debug!(kind = %kind, attribute = %name, "attribute default has no keyword");
                        err
                    })?;
                }
            }
        }
        Ok(())
    }
}
