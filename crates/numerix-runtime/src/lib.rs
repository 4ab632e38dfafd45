#![forbid(unsafe_code)]

//! numerix runtime: execution modes, explicit tolerances and the
//! structured trace ledger shared by the numeric crates.
//!
//! ## Module layout
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | `mode`      | [`RuntimeMode`] enum (Strict / Hardened)              |
//! | `tolerance` | [`Tolerance`] and its default constants               |
//! | `trace`     | [`TraceLedger`], [`OperationTrace`], [`TraceOutcome`] |

pub mod mode;
pub mod tolerance;
pub mod trace;

pub use mode::RuntimeMode;
pub use tolerance::{DEFAULT_ATOL, DEFAULT_RTOL, Tolerance};
pub use trace::{OperationTrace, TraceLedger, TraceOutcome};

// ═══════════════════════════════════════════════════════════════════
// Test Helpers: shared assertion utilities
// ═══════════════════════════════════════════════════════════════════

/// Assert two f64 values are close within combined absolute and relative tolerance.
///
/// Uses the formula: |actual - expected| <= atol + rtol * |expected|
pub fn assert_close(actual: f64, expected: f64, atol: f64, rtol: f64) {
    let tol = atol + rtol * expected.abs();
    assert!(
        (actual - expected).abs() <= tol,
        "assert_close failed: actual={actual} expected={expected} diff={} tol={tol} (atol={atol}, rtol={rtol})",
        (actual - expected).abs()
    );
}

/// Assert two f64 slices are element-wise close within tolerance.
pub fn assert_close_slice(actual: &[f64], expected: &[f64], atol: f64, rtol: f64) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "assert_close_slice: length mismatch: actual={} expected={}",
        actual.len(),
        expected.len()
    );
    for (idx, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        let tol = atol + rtol * e.abs();
        assert!(
            (a - e).abs() <= tol,
            "assert_close_slice[{idx}]: actual={a} expected={e} diff={} tol={tol} (atol={atol}, rtol={rtol})",
            (a - e).abs()
        );
    }
}

/// Assert two row-major matrices (`Vec<Vec<f64>>`) are element-wise close.
pub fn assert_close_matrix(actual: &[Vec<f64>], expected: &[Vec<f64>], atol: f64, rtol: f64) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "assert_close_matrix: row count mismatch: actual={} expected={}",
        actual.len(),
        expected.len()
    );
    for (row_idx, (a_row, e_row)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a_row.len(),
            e_row.len(),
            "assert_close_matrix: column count mismatch at row {row_idx}"
        );
        for (col_idx, (a, e)) in a_row.iter().zip(e_row.iter()).enumerate() {
            let tol = atol + rtol * e.abs();
            assert!(
                (a - e).abs() <= tol,
                "assert_close_matrix[{row_idx},{col_idx}]: actual={a} expected={e} diff={} tol={tol}",
                (a - e).abs()
            );
        }
    }
}

/// Check if a value is within tolerance of expected.
#[must_use]
pub fn within_tolerance(actual: f64, expected: f64, atol: f64, rtol: f64) -> bool {
    Tolerance::new(atol, rtol).approx_eq(actual, expected)
}
