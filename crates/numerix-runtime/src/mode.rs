#![forbid(unsafe_code)]

//! Runtime mode definitions for Strict and Hardened operation.

use serde::{Deserialize, Serialize};

/// Operational mode governing validation trade-offs.
///
/// - **Strict**: validate shapes and indices only; finite checks follow the
///   caller's `check_finite` flag.
/// - **Hardened**: always reject NaN/inf inputs before any arithmetic runs,
///   whatever `check_finite` says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RuntimeMode {
    #[default]
    Strict,
    Hardened,
}

impl RuntimeMode {
    /// Whether an operation must scan its input for non-finite values.
    #[must_use]
    pub const fn requires_finite_check(self, check_finite: bool) -> bool {
        check_finite || matches!(self, Self::Hardened)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Hardened => "Hardened",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RuntimeMode;

    #[test]
    fn hardened_always_checks_finite() {
        assert!(RuntimeMode::Hardened.requires_finite_check(false));
        assert!(!RuntimeMode::Strict.requires_finite_check(false));
        assert!(RuntimeMode::Strict.requires_finite_check(true));
    }

    #[test]
    fn default_mode_is_strict() {
        assert_eq!(RuntimeMode::default(), RuntimeMode::Strict);
    }
}
