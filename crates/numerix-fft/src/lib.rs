#![forbid(unsafe_code)]

//! Complex arithmetic and a recursive radix-2 FFT.
//!
//! - `complex`: the [`Complex`] value type
//! - `helpers`: [`StridedView`] segmentation, frequency grids, shifts
//! - `transforms`: [`fft`], [`fft_complex`], [`ifft`], [`rfft`] and their
//!   recording variants
//!
//! Lengths must be exact powers of two; nothing is zero-padded.

pub mod complex;
pub mod helpers;
pub mod transforms;

use serde::{Deserialize, Serialize};

pub use complex::Complex;
pub use helpers::{
    StridedView, fftfreq, fftshift, ifftshift, magnitude_spectrum, phase_spectrum, rfftfreq,
    segment,
};
pub use transforms::{
    FftError, FftOptions, FftResult, fft, fft_complex, fft_recorded, ifft, ifft_recorded, rfft,
};

/// Which direction carries the `1/N` factor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    Forward,
    /// Unscaled forward, `1/N` inverse.
    #[default]
    Backward,
    /// `1/sqrt(N)` both ways.
    Ortho,
}

impl Normalization {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Ortho => "ortho",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Fft,
    Ifft,
    Rfft,
}

impl TransformKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fft => "fft",
            Self::Ifft => "ifft",
            Self::Rfft => "rfft",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Normalization, TransformKind};

    #[test]
    fn normalization_default_is_backward() {
        assert_eq!(Normalization::default(), Normalization::Backward);
    }

    #[test]
    fn names_match_serialized_form() {
        let json = serde_json::to_string(&Normalization::Ortho).expect("serialize");
        assert_eq!(json, format!("\"{}\"", Normalization::Ortho.name()));
        assert_eq!(TransformKind::Ifft.name(), "ifft");
    }
}
