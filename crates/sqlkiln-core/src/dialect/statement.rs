//! Slotted statement templates.

use std::fmt;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(String),
}

/// A full statement skeleton such as
/// `DELETE FROM {table} {joins} {where}`.
///
/// Slot names are `[A-Za-z0-9_.]+` inside braces; `{a.name}` slots are fed
/// from attributes. Any other brace is literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    template: String,
    segments: Vec<Segment>,
}

impl Statement {
    /// Parses a template.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let segments = parse(&template);
        Self { template, segments }
    }

    /// The raw template text.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Slot names in template order.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Slot(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Fills every slot, in template order, with the fragment `fill` returns.
    ///
    /// Runs of spaces left by empty fragments are collapsed and the result
    /// is trimmed. Quoted text is left untouched. No terminator is added.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `fill`.
    pub fn fill<F>(&self, mut fill: F) -> Result<String>
    where
        F: FnMut(&str) -> Result<String>,
    {
        let mut raw = String::with_capacity(self.template.len() * 2);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => raw.push_str(text),
                Segment::Slot(name) => raw.push_str(&fill(name)?),
            }
        }
        Ok(collapse_spaces(&raw))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl From<&str> for Statement {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

fn is_slot_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

fn parse(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let slot = after
            .find('}')
            .map(|close| &after[..close])
            .filter(|name| !name.is_empty() && name.chars().all(is_slot_char));

        match slot {
            Some(name) => {
                literal.push_str(&rest[..open]);
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Slot(name.to_string()));
                rest = &after[name.len() + 1..];
            }
            None => {
                literal.push_str(&rest[..=open]);
                rest = after;
            }
        }
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// Collapses runs of spaces outside quotes and trims the ends.
fn collapse_spaces(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut quote: Option<char> = None;
    let mut previous_space = false;

    for c in sql.chars() {
        match quote {
            Some(q) => {
                out.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c == ' ' || c == '\t' => {
                if !previous_space {
                    out.push(' ');
                }
                previous_space = true;
                continue;
            }
            None => {
                if c == '\'' || c == '"' || c == '`' {
                    quote = Some(c);
                }
                out.push(c);
            }
        }
        previous_space = false;
    }
    out.trim().to_string()
}
