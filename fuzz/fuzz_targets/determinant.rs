#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use numerix_linalg::{Matrix, det_cofactor, determinant};
use numerix_runtime::Tolerance;

#[derive(Debug, Arbitrary)]
struct DeterminantInput {
    order: u8,
    values: Vec<f64>,
}

fuzz_target!(|input: DeterminantInput| {
    let n = usize::from(input.order % 6) + 1;
    let mut data = vec![0.0; n * n];
    for (slot, value) in data.iter_mut().zip(&input.values) {
        *slot = if value.is_finite() {
            value.clamp(-1e3, 1e3)
        } else {
            0.0
        };
    }
    let m = Matrix::from_row_major(n, n, data).expect("n > 0");
    let fast = determinant(&m, Tolerance::default()).expect("square");
    let reference = det_cofactor(&m).expect("square");
    let factorial: f64 = (1..=n).map(|k| k as f64).product();
    let scale = m.max_abs().max(1.0).powi(n as i32) * factorial;
    assert!(
        (fast - reference).abs() <= 1e-9 * scale,
        "n={n} dispatch={fast} cofactor={reference}"
    );
    let transposed = determinant(&m.transpose(), Tolerance::default()).expect("square");
    assert!(
        (transposed - fast).abs() <= 1e-9 * scale,
        "n={n} det(A)={fast} det(A^T)={transposed}"
    );
});
