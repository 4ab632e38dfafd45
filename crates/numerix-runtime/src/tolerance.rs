#![forbid(unsafe_code)]

//! Explicit floating-point tolerance threaded through every comparison.

use serde::{Deserialize, Serialize};

/// Absolute floor used when no tolerance is supplied.
pub const DEFAULT_ATOL: f64 = 0.0;
/// Relative factor used when no tolerance is supplied.
pub const DEFAULT_RTOL: f64 = 1e-12;

/// Combined absolute/relative tolerance: `|actual - expected| <= atol + rtol * |expected|`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub atol: f64,
    pub rtol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            atol: DEFAULT_ATOL,
            rtol: DEFAULT_RTOL,
        }
    }
}

impl Tolerance {
    #[must_use]
    pub const fn new(atol: f64, rtol: f64) -> Self {
        Self { atol, rtol }
    }

    /// Purely absolute tolerance.
    #[must_use]
    pub const fn absolute(atol: f64) -> Self {
        Self { atol, rtol: 0.0 }
    }

    /// Allowed deviation around a reference magnitude.
    #[must_use]
    pub fn bound(&self, reference: f64) -> f64 {
        self.atol + self.rtol * reference.abs()
    }

    #[must_use]
    pub fn approx_eq(&self, actual: f64, expected: f64) -> bool {
        (actual - expected).abs() <= self.bound(expected)
    }

    /// Whether `value` is numerically zero relative to `scale`.
    #[must_use]
    pub fn is_negligible(&self, value: f64, scale: f64) -> bool {
        value.abs() <= self.bound(scale)
    }

    /// Both components finite and non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.atol.is_finite() && self.rtol.is_finite() && self.atol >= 0.0 && self.rtol >= 0.0
    }
}
