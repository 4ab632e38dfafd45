use std::ops::Index;

use crate::complex::Complex;
use crate::transforms::{FftError, FftResult};

/// Borrowed view of every `stride`-th element of a slice, starting at
/// `offset`. Views compose: segmenting a view multiplies strides, so the
/// recursion never copies its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StridedView<'a, T> {
    data: &'a [T],
    offset: usize,
    stride: usize,
    len: usize,
}

impl<'a, T> StridedView<'a, T> {
    /// The whole slice with unit stride.
    #[must_use]
    pub fn new(data: &'a [T]) -> Self {
        Self {
            data,
            offset: 0,
            stride: 1,
            len: data.len(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a T> {
        if index >= self.len {
            return None;
        }
        self.data.get(self.offset + index * self.stride)
    }

    /// Sub-view of elements `offset, offset + stride, ...` of this view.
    /// `None` when `stride` is zero.
    #[must_use]
    pub fn segment(&self, offset: usize, stride: usize) -> Option<Self> {
        (stride > 0).then(|| self.step(offset, stride))
    }

    /// Even-indexed and odd-indexed halves.
    #[must_use]
    pub fn split_even_odd(&self) -> (Self, Self) {
        (self.step(0, 2), self.step(1, 2))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    fn step(&self, offset: usize, stride: usize) -> Self {
        let len = if offset >= self.len {
            0
        } else {
            (self.len - offset).div_ceil(stride)
        };
        Self {
            data: self.data,
            offset: self.offset + offset * self.stride,
            stride: self.stride * stride,
            len,
        }
    }
}

impl<T: Clone> StridedView<'_, T> {
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> Index<usize> for StridedView<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        assert!(
            index < self.len,
            "index {index} out of range for view of length {}",
            self.len
        );
        &self.data[self.offset + index * self.stride]
    }
}

/// View of every `stride`-th element of `data` starting at `offset`.
#[must_use]
pub fn segment<T>(data: &[T], offset: usize, stride: usize) -> Option<StridedView<'_, T>> {
    StridedView::new(data).segment(offset, stride)
}

/// Sample frequencies for the length-`n` complex FFT.
pub fn fftfreq(n: usize, sample_spacing: f64) -> FftResult<Vec<f64>> {
    validate_frequency_args(n, sample_spacing)?;
    let scale = 1.0 / (n as f64 * sample_spacing);
    let split = n.div_ceil(2);
    Ok((0..n)
        .map(|idx| {
            if idx < split {
                idx as f64 * scale
            } else {
                -((n - idx) as f64) * scale
            }
        })
        .collect())
}

/// Sample frequencies for the length-`n` real FFT.
pub fn rfftfreq(n: usize, sample_spacing: f64) -> FftResult<Vec<f64>> {
    validate_frequency_args(n, sample_spacing)?;
    let scale = 1.0 / (n as f64 * sample_spacing);
    Ok((0..=n / 2).map(|idx| idx as f64 * scale).collect())
}

/// Moves the zero-frequency bin to the center.
#[must_use]
pub fn fftshift<T: Clone>(input: &[T]) -> Vec<T> {
    rotate_left_owned(input, input.len().div_ceil(2))
}

/// Inverse of [`fftshift`].
#[must_use]
pub fn ifftshift<T: Clone>(input: &[T]) -> Vec<T> {
    rotate_left_owned(input, input.len() / 2)
}

#[must_use]
pub fn magnitude_spectrum(spectrum: &[Complex]) -> Vec<f64> {
    spectrum.iter().map(|z| z.magnitude()).collect()
}

#[must_use]
pub fn phase_spectrum(spectrum: &[Complex]) -> Vec<f64> {
    spectrum.iter().map(|z| z.phase()).collect()
}

fn validate_frequency_args(n: usize, sample_spacing: f64) -> FftResult<()> {
    if n == 0 {
        return Err(FftError::InvalidLength { len: 0 });
    }
    if !(sample_spacing.is_finite() && sample_spacing > 0.0) {
        return Err(FftError::InvalidSampleSpacing(sample_spacing));
    }
    Ok(())
}

fn rotate_left_owned<T: Clone>(input: &[T], shift: usize) -> Vec<T> {
    if input.is_empty() {
        return Vec::new();
    }
    let split = shift % input.len();
    input[split..]
        .iter()
        .chain(&input[..split])
        .cloned()
        .collect()
}
