//! Parameterized SQL fragments.

use std::fmt;

/// A clause template with printf-style positional arguments.
///
/// `%s` takes the next argument, `%N$s` takes the N-th (1-based) argument
/// and `%%` is a literal percent sign. Missing arguments render empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause(String);

impl Clause {
    /// Wraps a template string.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// The raw template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.0
    }

    /// Substitutes `args` into the template.
    #[must_use]
    pub fn format(&self, args: &[&str]) -> String {
        let mut out = String::with_capacity(self.0.len() + args.iter().map(|a| a.len()).sum::<usize>());
        let mut next = 0;
        let mut chars = self.0.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.peek().copied() {
                Some('%') => {
                    chars.next();
                    out.push('%');
                }
                Some('s') => {
                    chars.next();
                    out.push_str(args.get(next).copied().unwrap_or_default());
                    next += 1;
                }
                Some(d) if d.is_ascii_digit() => {
                    let mut lookahead = chars.clone();
                    let mut position = 0_usize;
                    while let Some(d) = lookahead.peek().copied().filter(char::is_ascii_digit) {
                        position = position * 10 + (d as usize - '0' as usize);
                        lookahead.next();
                    }
                    if lookahead.next() == Some('$') && lookahead.next() == Some('s') {
                        chars = lookahead;
                        let arg = position.checked_sub(1).and_then(|i| args.get(i)).copied();
                        out.push_str(arg.unwrap_or_default());
                    } else {
                        out.push('%');
                    }
                }
                _ => out.push('%'),
            }
        }
        out
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Clause {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}
