//! Per-operation attributes rendered into `{a.name}` statement slots.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Dialect;
use crate::error::Result;

/// Produces a fragment from the active dialect.
pub type FragmentFn = dyn Fn(&Dialect) -> Result<String> + Send + Sync;

/// One attribute value.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Renders the keyword named after the attribute when `true`.
    Flag(bool),
    /// Renders the keyword with this name; empty renders nothing.
    Keyword(String),
    /// Renders whatever the function returns. Code-only.
    #[serde(skip)]
    Dynamic(Arc<FragmentFn>),
}

impl AttributeValue {
    /// Wraps a fragment-producing function.
    pub fn dynamic<F>(producer: F) -> Self
    where
        F: Fn(&Dialect) -> Result<String> + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(producer))
    }

    /// Renders the value of attribute `name`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownSymbol`] when the keyword the value
    /// names is not defined, or whatever a dynamic producer returns.
    pub fn render(&self, name: &str, dialect: &Dialect) -> Result<String> {
        match self {
            Self::Flag(true) => dialect.keyword(name).map(ToString::to_string),
            Self::Flag(false) => Ok(String::new()),
            Self::Keyword(keyword) if keyword.is_empty() => Ok(String::new()),
            Self::Keyword(keyword) => dialect.keyword(keyword).map(ToString::to_string),
            Self::Dynamic(producer) => producer(dialect),
        }
    }

    /// The keyword this value looks up when rendered, if any.
    pub(crate) fn keyword_name<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        match self {
            Self::Flag(true) => Some(name),
            Self::Keyword(keyword) if !keyword.is_empty() => Some(keyword.as_str()),
            _ => None,
        }
    }
}

impl fmt::Debug for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => f.debug_tuple("Flag").field(flag).finish(),
            Self::Keyword(keyword) => f.debug_tuple("Keyword").field(keyword).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<&str> for AttributeValue {
    fn from(keyword: &str) -> Self {
        Self::Keyword(keyword.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(keyword: String) -> Self {
        Self::Keyword(keyword)
    }
}

/// Attribute name to value.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// Merges overrides onto defaults.
///
/// Only names with a default survive; an override for a name the operation
/// does not declare is dropped.
#[must_use]
pub fn effective(defaults: &Attributes, overrides: &Attributes) -> Attributes {
    defaults
        .iter()
        .map(|(name, default)| {
            let value = overrides.get(name).unwrap_or(default);
            (name.clone(), value.clone())
        })
        .collect()
}
