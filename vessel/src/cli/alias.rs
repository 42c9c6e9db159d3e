//! Aliases: one command re-exported under a second name.
//!
//! An alias is a separate registry entry whose usage and example text are
//! rewritten from its source. Everything else is taken over from the source,
//! and the handler is shared rather than copied.

use crate::cli::CommandDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Occurrences {
    First,
    All,
}

/// A literal substring substitution.
///
/// Text that does not contain the search string passes through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRewrite {
    from: String,
    to: String,
    occurrences: Occurrences,
}

impl TextRewrite {
    /// Replaces the first occurrence of `from`.
    pub fn first(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            occurrences: Occurrences::First,
        }
    }

    /// Replaces every occurrence of `from`.
    pub fn all(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            occurrences: Occurrences::All,
        }
    }

    /// Whether applying the rewrite to `text` changes anything.
    pub fn matches(&self, text: &str) -> bool {
        !self.from.is_empty() && text.contains(self.from.as_str())
    }

    pub fn apply(&self, text: &str) -> String {
        if !self.matches(text) {
            return text.to_string();
        }
        match self.occurrences {
            Occurrences::First => text.replacen(self.from.as_str(), &self.to, 1),
            Occurrences::All => text.replace(self.from.as_str(), &self.to),
        }
    }
}

/// Derives a top-level alias of `source`.
///
/// The alias gets rewritten usage and example text; help, argument policy,
/// flags, engine modes and the handler come from `source`. It does not take
/// over the source's own aliases.
pub fn derive_alias(
    source: &CommandDescriptor,
    usage: &TextRewrite,
    example: &TextRewrite,
) -> CommandDescriptor {
    if !usage.matches(&source.usage) {
        tracing::warn!(
            command = %source.path(),
            from = %usage.from,
            "alias usage rewrite matched nothing"
        );
    }
    if !source.example.is_empty() && !example.matches(&source.example) {
        tracing::warn!(
            command = %source.path(),
            from = %example.from,
            "alias example rewrite matched nothing"
        );
    }

    CommandDescriptor {
        parent: None,
        usage: usage.apply(&source.usage),
        aliases: Vec::new(),
        short: source.short.clone(),
        long: source.long.clone(),
        example: example.apply(&source.example),
        args: source.args,
        flags: source.flags.clone(),
        handler: source.handler.clone(),
        modes: source.modes.clone(),
    }
}

#[cfg(test)]
#[path = "alias_tests.rs"]
mod tests;
