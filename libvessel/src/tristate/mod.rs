//! Three-valued booleans.
//!
//! A flag that was never given on the command line must not be confused with
//! a flag explicitly set to its default. [`OptionalBool`] keeps the two apart
//! so that "no preference" can be forwarded to a collaborator as such.

use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

/// A boolean that may also be unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionalBool {
    /// No value was given; defer to the consumer's default
    #[default]
    Unset,
    /// Explicitly true
    True,
    /// Explicitly false
    False,
}

impl OptionalBool {
    /// Returns the explicit value, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use libvessel::OptionalBool;
    ///
    /// assert_eq!(OptionalBool::True.value(), Some(true));
    /// assert_eq!(OptionalBool::Unset.value(), None);
    /// ```
    pub fn value(self) -> Option<bool> {
        match self {
            Self::Unset => None,
            Self::True => Some(true),
            Self::False => Some(false),
        }
    }

    /// Returns true when a value was given explicitly.
    pub fn is_set(self) -> bool {
        self != Self::Unset
    }

    /// Resolves to a concrete boolean, using `default` when unset.
    pub fn unwrap_or(self, default: bool) -> bool {
        self.value().unwrap_or(default)
    }
}

impl From<bool> for OptionalBool {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

impl From<Option<bool>> for OptionalBool {
    fn from(value: Option<bool>) -> Self {
        value.map(Self::from).unwrap_or(Self::Unset)
    }
}
