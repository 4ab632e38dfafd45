#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use numerix_linalg::{LinalgOptions, lu, solve};
use numerix_runtime::{RuntimeMode, Tolerance};

#[derive(Debug, Arbitrary)]
struct LuInput {
    order: u8,
    hardened: bool,
    check_finite: bool,
    values: Vec<f64>,
    rhs: Vec<f64>,
}

fn build_matrix(n: usize, values: &[f64]) -> Vec<Vec<f64>> {
    let mut matrix = vec![vec![0.0; n]; n];
    for (idx, value) in values.iter().copied().take(n * n).enumerate() {
        matrix[idx / n][idx % n] = value;
    }
    matrix
}

fuzz_target!(|input: LuInput| {
    let n = usize::from(input.order % 8);
    let mode = if input.hardened {
        RuntimeMode::Hardened
    } else {
        RuntimeMode::Strict
    };
    let options = LinalgOptions::default()
        .with_mode(mode)
        .with_check_finite(input.check_finite);
    let a = build_matrix(n, &input.values);
    let _ = solve(&a, &input.rhs, &options);

    let Ok(decomposition) = lu(&a, &options) else {
        return;
    };
    if !a.iter().flatten().all(|v| v.is_finite()) {
        return;
    }
    let max_abs = a.iter().flatten().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if !(1e-150..1e150).contains(&max_abs) {
        return;
    }
    let original = numerix_linalg::Matrix::from_rows(a).expect("non-empty square input");
    let lhs = decomposition.reconstruct().expect("same order");
    let rhs = decomposition.permuted(&original).expect("same order");
    assert!(
        lhs.approx_eq(&rhs, Tolerance::new(1e-8 * max_abs, 0.0)),
        "L*U={lhs} P*A={rhs}"
    );
});
