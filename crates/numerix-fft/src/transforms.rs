use std::f64::consts::PI;
use std::time::Instant;

use numerix_runtime::{OperationTrace, RuntimeMode, TraceLedger, TraceOutcome};
use thiserror::Error;

use crate::complex::Complex;
use crate::helpers::StridedView;
use crate::{Normalization, TransformKind};

pub type FftResult<T> = Result<T, FftError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FftError {
    #[error("input length {len} is not a power of two")]
    InvalidLength { len: usize },
    #[error("non-finite input rejected by policy")]
    NonFiniteInput,
    #[error("sample spacing must be finite and greater than zero, got {0}")]
    InvalidSampleSpacing(f64),
}

/// Common options shared by FFT transform entrypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FftOptions {
    pub mode: RuntimeMode,
    pub normalization: Normalization,
    pub check_finite: bool,
}

impl Default for FftOptions {
    fn default() -> Self {
        Self {
            mode: RuntimeMode::Strict,
            normalization: Normalization::Backward,
            check_finite: false,
        }
    }
}

impl FftOptions {
    #[must_use]
    pub fn with_mode(mut self, mode: RuntimeMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    #[must_use]
    pub fn with_check_finite(mut self, check_finite: bool) -> Self {
        self.check_finite = check_finite;
        self
    }
}

/// Forward transform of a real sequence. The full N-bin spectrum is
/// returned; `N` must be a power of two.
pub fn fft(input: &[f64], options: &FftOptions) -> FftResult<Vec<Complex>> {
    ensure_power_of_two(input.len())?;
    validate_finite(input.iter().all(|x| x.is_finite()), options)?;
    Ok(run(TransformKind::Fft, StridedView::new(input), options))
}

/// Forward transform of a complex sequence.
pub fn fft_complex(input: &[Complex], options: &FftOptions) -> FftResult<Vec<Complex>> {
    ensure_power_of_two(input.len())?;
    validate_finite(input.iter().all(|z| z.is_finite()), options)?;
    Ok(run(TransformKind::Fft, StridedView::new(input), options))
}

/// Inverse transform; conjugate twiddles and `1/N` under
/// [`Normalization::Backward`].
pub fn ifft(input: &[Complex], options: &FftOptions) -> FftResult<Vec<Complex>> {
    ensure_power_of_two(input.len())?;
    validate_finite(input.iter().all(|z| z.is_finite()), options)?;
    Ok(run(TransformKind::Ifft, StridedView::new(input), options))
}

/// Non-negative frequency half of [`fft`]: the first `N/2 + 1` bins.
pub fn rfft(input: &[f64], options: &FftOptions) -> FftResult<Vec<Complex>> {
    ensure_power_of_two(input.len())?;
    validate_finite(input.iter().all(|x| x.is_finite()), options)?;
    let mut spectrum = run(TransformKind::Rfft, StridedView::new(input), options);
    spectrum.truncate(input.len() / 2 + 1);
    Ok(spectrum)
}

/// [`fft`] that appends one trace to `ledger`.
pub fn fft_recorded(
    input: &[f64],
    options: &FftOptions,
    ledger: &mut TraceLedger,
) -> FftResult<Vec<Complex>> {
    let started = Instant::now();
    let result = fft(input, options);
    record(ledger, TransformKind::Fft, input.len(), options, started, &result);
    result
}

/// [`ifft`] that appends one trace to `ledger`.
pub fn ifft_recorded(
    input: &[Complex],
    options: &FftOptions,
    ledger: &mut TraceLedger,
) -> FftResult<Vec<Complex>> {
    let started = Instant::now();
    let result = ifft(input, options);
    record(ledger, TransformKind::Ifft, input.len(), options, started, &result);
    result
}

fn record(
    ledger: &mut TraceLedger,
    kind: TransformKind,
    n: usize,
    options: &FftOptions,
    started: Instant,
    result: &FftResult<Vec<Complex>>,
) {
    let trace = OperationTrace::new(kind.name(), vec![n], options.mode)
        .with_timing_ns(started.elapsed().as_nanos());
    ledger.record(match result {
        Ok(_) => trace.with_detail(format!("normalization={}", options.normalization.name())),
        Err(err) => trace
            .with_outcome(TraceOutcome::Rejected)
            .with_detail(err.to_string()),
    });
}

fn run<T>(kind: TransformKind, input: StridedView<'_, T>, options: &FftOptions) -> Vec<Complex>
where
    T: Copy + Into<Complex>,
{
    let inverse = kind == TransformKind::Ifft;
    let n = input.len();
    let mut output = radix2(input, inverse);
    let scale = normalization_scale(options.normalization, n, inverse);
    if scale != 1.0 {
        for value in &mut output {
            *value = value.scale(scale);
        }
    }
    output
}

/// Recursive decimation in time. The length of `input` is a power of two.
fn radix2<T>(input: StridedView<'_, T>, inverse: bool) -> Vec<Complex>
where
    T: Copy + Into<Complex>,
{
    let n = input.len();
    if n == 1 {
        return vec![input[0].into()];
    }
    let (even, odd) = input.split_even_odd();
    let even = radix2(even, inverse);
    let odd = radix2(odd, inverse);

    let half = n / 2;
    let sign = if inverse { 1.0 } else { -1.0 };
    let mut output = vec![Complex::ZERO; n];
    for k in 0..half {
        let twiddle = Complex::expi(sign * 2.0 * PI * k as f64 / n as f64);
        let t = twiddle * odd[k];
        output[k] = even[k] + t;
        output[k + half] = even[k] - t;
    }
    output
}

fn ensure_power_of_two(len: usize) -> FftResult<()> {
    if !len.is_power_of_two() {
        return Err(FftError::InvalidLength { len });
    }
    Ok(())
}

fn validate_finite(all_finite: bool, options: &FftOptions) -> FftResult<()> {
    if options.mode.requires_finite_check(options.check_finite) && !all_finite {
        return Err(FftError::NonFiniteInput);
    }
    Ok(())
}

fn normalization_scale(normalization: Normalization, n: usize, inverse: bool) -> f64 {
    let n = n as f64;
    match (normalization, inverse) {
        (Normalization::Backward, true) | (Normalization::Forward, false) => 1.0 / n,
        (Normalization::Backward, false) | (Normalization::Forward, true) => 1.0,
        (Normalization::Ortho, _) => 1.0 / n.sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use numerix_runtime::{RuntimeMode, Tolerance};

    use super::*;

    const EPS: Tolerance = Tolerance::absolute(1e-9);

    fn naive_dft(input: &[f64]) -> Vec<Complex> {
        let n = input.len();
        (0..n)
            .map(|k| {
                input.iter().enumerate().fold(Complex::ZERO, |acc, (t, &x)| {
                    let angle = -2.0 * PI * (k * t) as f64 / n as f64;
                    acc + Complex::expi(angle).scale(x)
                })
            })
            .collect()
    }

    fn assert_spectrum_close(actual: &[Complex], expected: &[Complex]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!(a.approx_eq(*e, EPS), "bin {i}: {a} != {e}");
        }
    }

    #[test]
    fn options_default_to_strict_backward_mode() {
        let opts = FftOptions::default();
        assert_eq!(opts.mode, RuntimeMode::Strict);
        assert_eq!(opts.normalization, Normalization::Backward);
        assert!(!opts.check_finite);
    }

    #[test]
    fn single_sample_is_its_own_spectrum() {
        let out = fft(&[2.5], &FftOptions::default()).expect("n = 1");
        assert_eq!(out, vec![Complex::new(2.5, 0.0)]);
    }

    #[test]
    fn box_pulse_dc_bin() {
        let out = fft(&[1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0], &FftOptions::default())
            .expect("n = 8");
        assert_eq!(out.len(), 8);
        assert!(out[0].approx_eq(Complex::new(4.0, 0.0), EPS), "{}", out[0]);
        // Even bins other than DC vanish for a half-length pulse.
        assert!(out[2].approx_eq(Complex::ZERO, EPS), "{}", out[2]);
        assert!(out[4].approx_eq(Complex::ZERO, EPS), "{}", out[4]);
    }

    #[test]
    fn matches_naive_dft() {
        let input = [
            0.5, -1.0, 3.0, 2.0, -0.25, 4.0, 1.5, -2.0, 0.0, 1.0, 1.0, -3.0, 2.5, 0.75, -1.5, 6.0,
        ];
        let out = fft(&input, &FftOptions::default()).expect("n = 16");
        assert_spectrum_close(&out, &naive_dft(&input));
    }

    #[test]
    fn non_power_of_two_is_rejected() {
        assert_eq!(
            fft(&[1.0, 2.0, 3.0], &FftOptions::default()),
            Err(FftError::InvalidLength { len: 3 })
        );
        assert_eq!(
            fft(&[], &FftOptions::default()),
            Err(FftError::InvalidLength { len: 0 })
        );
        assert_eq!(
            ifft(&[Complex::ZERO; 6], &FftOptions::default()),
            Err(FftError::InvalidLength { len: 6 })
        );
    }

    #[test]
    fn fft_ifft_roundtrip_identity() {
        let input = [1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        let opts = FftOptions::default();
        let spectrum = fft(&input, &opts).expect("fft should succeed");
        let recovered = ifft(&spectrum, &opts).expect("ifft should succeed");
        let expected: Vec<Complex> = input.iter().map(|&x| Complex::from_real(x)).collect();
        assert_spectrum_close(&recovered, &expected);
    }

    #[test]
    fn complex_roundtrip_under_every_normalization() {
        let input = [
            Complex::new(1.0, 0.0),
            Complex::new(2.0, -1.0),
            Complex::new(0.5, 0.25),
            Complex::new(-3.0, 2.0),
        ];
        for normalization in [
            Normalization::Backward,
            Normalization::Forward,
            Normalization::Ortho,
        ] {
            let opts = FftOptions::default().with_normalization(normalization);
            let spectrum = fft_complex(&input, &opts).expect("fft");
            let recovered = ifft(&spectrum, &opts).expect("ifft");
            assert_spectrum_close(&recovered, &input);
        }
    }

    #[test]
    fn forward_normalization_scales_forward_transform() {
        let opts = FftOptions::default().with_normalization(Normalization::Forward);
        let out = fft(&[2.0, 2.0, 2.0, 2.0], &opts).expect("n = 4");
        assert!(out[0].approx_eq(Complex::new(2.0, 0.0), EPS));
    }

    #[test]
    fn rfft_keeps_non_negative_bins() {
        let input = [0.5, -1.0, 3.0, 2.0, -0.25, 4.0, 1.5, -2.0];
        let half = rfft(&input, &FftOptions::default()).expect("n = 8");
        let full = fft(&input, &FftOptions::default()).expect("n = 8");
        assert_eq!(half.len(), 5);
        assert_eq!(half[..], full[..5]);
    }

    #[test]
    fn non_finite_input_follows_mode() {
        let input = [1.0, f64::NAN];
        assert!(fft(&input, &FftOptions::default()).is_ok());
        let hardened = FftOptions::default().with_mode(RuntimeMode::Hardened);
        assert_eq!(fft(&input, &hardened), Err(FftError::NonFiniteInput));
        let checked = FftOptions::default().with_check_finite(true);
        assert_eq!(rfft(&input, &checked), Err(FftError::NonFiniteInput));
    }

    #[test]
    fn recorded_transforms_land_in_ledger() {
        let mut ledger = TraceLedger::new(8);
        let spectrum =
            fft_recorded(&[1.0, 0.0, 0.0, 0.0], &FftOptions::default(), &mut ledger).expect("fft");
        ifft_recorded(&spectrum, &FftOptions::default(), &mut ledger).expect("ifft");
        let _ = fft_recorded(&[1.0, 2.0, 3.0], &FftOptions::default(), &mut ledger);

        let traces: Vec<_> = ledger.iter().collect();
        assert_eq!(traces.len(), 3);
        assert_eq!(traces[0].operation, "fft");
        assert_eq!(traces[1].operation, "ifft");
        assert_eq!(traces[1].detail.as_deref(), Some("normalization=backward"));
        assert_eq!(traces[2].outcome, TraceOutcome::Rejected);
        assert_eq!(traces[2].shape, vec![3]);
    }
}
