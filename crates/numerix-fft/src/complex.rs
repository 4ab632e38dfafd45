use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Div, Mul, Neg, Sub};

use numerix_runtime::Tolerance;
use serde::{Deserialize, Serialize};

/// Immutable `re + im·i` pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 0.0);
    pub const I: Self = Self::new(0.0, 1.0);

    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    #[must_use]
    pub const fn from_real(re: f64) -> Self {
        Self::new(re, 0.0)
    }

    #[must_use]
    pub fn from_polar(magnitude: f64, phase: f64) -> Self {
        let (sin, cos) = phase.sin_cos();
        Self::new(magnitude * cos, magnitude * sin)
    }

    /// `e^{iθ}`.
    #[must_use]
    pub fn expi(theta: f64) -> Self {
        Self::from_polar(1.0, theta)
    }

    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.re.hypot(self.im)
    }

    #[must_use]
    pub fn magnitude_squared(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Argument in `(-π, π]`.
    #[must_use]
    pub fn phase(self) -> f64 {
        self.im.atan2(self.re)
    }

    #[must_use]
    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    #[must_use]
    pub fn scale(self, k: f64) -> Self {
        Self::new(self.re * k, self.im * k)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    /// Division that refuses a zero-magnitude divisor instead of
    /// producing NaN or infinity.
    #[must_use]
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.magnitude_squared() == 0.0 {
            return None;
        }
        Some(self / rhs)
    }

    /// Componentwise comparison under `tolerance`.
    #[must_use]
    pub fn approx_eq(self, other: Self, tolerance: Tolerance) -> bool {
        tolerance.approx_eq(self.re, other.re) && tolerance.approx_eq(self.im, other.im)
    }
}

impl From<f64> for Complex {
    fn from(re: f64) -> Self {
        Self::from_real(re)
    }
}

impl From<(f64, f64)> for Complex {
    fn from((re, im): (f64, f64)) -> Self {
        Self::new(re, im)
    }
}

impl From<Complex> for (f64, f64) {
    fn from(value: Complex) -> Self {
        (value.re, value.im)
    }
}

impl Add for Complex {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.im * rhs.re + self.re * rhs.im,
        )
    }
}

impl Mul<f64> for Complex {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

/// IEEE semantics: a zero divisor yields non-finite parts.
impl Div for Complex {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        let d = rhs.magnitude_squared();
        Self::new(
            (self.re * rhs.re + self.im * rhs.im) / d,
            (self.im * rhs.re - self.re * rhs.im) / d,
        )
    }
}

impl Neg for Complex {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

impl Display for Complex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.im.is_sign_negative() {
            write!(f, "{}-{}i", self.re, -self.im)
        } else {
            write!(f, "{}+{}i", self.re, self.im)
        }
    }
}
