#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use numerix_fft::{FftError, FftOptions, Normalization, fft, ifft, rfft};

#[derive(Debug, Arbitrary)]
struct FftInput {
    ortho: bool,
    values: Vec<f64>,
}

fuzz_target!(|input: FftInput| {
    let normalization = if input.ortho {
        Normalization::Ortho
    } else {
        Normalization::Backward
    };
    let options = FftOptions::default().with_normalization(normalization);
    let values: Vec<f64> = input.values.into_iter().take(1 << 12).collect();

    if !values.len().is_power_of_two() {
        assert_eq!(
            fft(&values, &options),
            Err(FftError::InvalidLength { len: values.len() })
        );
        return;
    }
    let spectrum = fft(&values, &options).expect("power of two");
    assert_eq!(spectrum.len(), values.len());
    let half = rfft(&values, &options).expect("power of two");
    assert_eq!(half.len(), values.len() / 2 + 1);

    if !values.iter().all(|v| v.is_finite()) {
        return;
    }
    let max_abs = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if max_abs > 1e100 {
        return;
    }
    let recovered = ifft(&spectrum, &options).expect("power of two");
    let bound = 1e-9 * max_abs.max(1.0) * values.len() as f64;
    for (got, want) in recovered.iter().zip(&values) {
        assert!(
            (got.re - want).abs() <= bound && got.im.abs() <= bound,
            "{got} != {want}"
        );
    }
});
