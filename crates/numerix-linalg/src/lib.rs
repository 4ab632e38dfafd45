#![forbid(unsafe_code)]

//! Dense matrix operations, determinants, LUP factorization and 2D
//! transforms.
//!
//! Every operation is functional: inputs are borrowed, results are new
//! values. The slice-level entry points ([`matmul`], [`det`], [`lu`],
//! [`solve`], [`inv`]) accept plain `&[Vec<f64>]` rows and validate shape
//! before doing any arithmetic.

pub mod determinant;
pub mod error;
pub mod lup;
pub mod matrix;
pub mod transform;

use std::time::Instant;

use numerix_runtime::{OperationTrace, RuntimeMode, Tolerance, TraceLedger, TraceOutcome};

pub use determinant::{
    COFACTOR_EXPANSION_LIMIT, COFACTOR_MAX_ORDER, det_cofactor, det_lu, determinant,
};
pub use error::{LinalgError, LinalgResult};
pub use lup::{LuDecomposition, lu_decompose, lu_decompose_recorded};
pub use matrix::{Matrix, dot_product};
pub use transform::{
    RotationDirection, ShearAxis, TransformHistory, affine, rotate, rotation_matrix, scale,
    scale_matrix, shear, shear_matrix, translation_matrix,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinalgOptions {
    pub mode: RuntimeMode,
    pub check_finite: bool,
    pub tolerance: Tolerance,
}

impl Default for LinalgOptions {
    fn default() -> Self {
        Self {
            mode: RuntimeMode::Strict,
            check_finite: true,
            tolerance: Tolerance::default(),
        }
    }
}

impl LinalgOptions {
    #[must_use]
    pub fn with_mode(mut self, mode: RuntimeMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_check_finite(mut self, check_finite: bool) -> Self {
        self.check_finite = check_finite;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// `A·B` over plain rows.
pub fn matmul(a: &[Vec<f64>], b: &[Vec<f64>]) -> LinalgResult<Vec<Vec<f64>>> {
    let lhs = Matrix::from_row_slices(a)?;
    let rhs = Matrix::from_row_slices(b)?;
    Ok(lhs.multiply(&rhs)?.to_rows())
}

pub fn transpose(a: &[Vec<f64>]) -> LinalgResult<Vec<Vec<f64>>> {
    Ok(Matrix::from_row_slices(a)?.transpose().to_rows())
}

pub fn det(a: &[Vec<f64>], options: &LinalgOptions) -> LinalgResult<f64> {
    let matrix = Matrix::from_row_slices(a)?;
    validate_input(&matrix, options)?;
    determinant(&matrix, options.tolerance)
}

/// [`det`] that appends one trace to `ledger`.
pub fn det_recorded(
    a: &[Vec<f64>],
    options: &LinalgOptions,
    ledger: &mut TraceLedger,
) -> LinalgResult<f64> {
    let started = Instant::now();
    let result = det(a, options);
    let shape = vec![a.len(), a.first().map_or(0, Vec::len)];
    let trace = OperationTrace::new("det", shape, options.mode)
        .with_timing_ns(started.elapsed().as_nanos());
    ledger.record(match &result {
        Ok(value) => trace.with_detail(format!("value={value:e}")),
        Err(err) => trace
            .with_outcome(TraceOutcome::Rejected)
            .with_detail(err.to_string()),
    });
    result
}

pub fn lu(a: &[Vec<f64>], options: &LinalgOptions) -> LinalgResult<LuDecomposition> {
    lu_decompose(&Matrix::from_row_slices(a)?, options)
}

pub fn solve(a: &[Vec<f64>], b: &[f64], options: &LinalgOptions) -> LinalgResult<Vec<f64>> {
    let matrix = Matrix::from_row_slices(a)?;
    if b.len() != matrix.rows() {
        return Err(LinalgError::LengthMismatch {
            left: matrix.rows(),
            right: b.len(),
        });
    }
    if options.mode.requires_finite_check(options.check_finite) && b.iter().any(|v| !v.is_finite())
    {
        return Err(LinalgError::NonFiniteInput);
    }
    lu_decompose(&matrix, options)?.solve(b)
}

pub fn inv(a: &[Vec<f64>], options: &LinalgOptions) -> LinalgResult<Vec<Vec<f64>>> {
    let matrix = Matrix::from_row_slices(a)?;
    if matrix.shape() == (2, 2) {
        validate_input(&matrix, options)?;
        return Ok(matrix.invert_2x2(options.tolerance)?.to_rows());
    }
    Ok(lu_decompose(&matrix, options)?.inverse()?.to_rows())
}

pub(crate) fn validate_input(m: &Matrix, options: &LinalgOptions) -> LinalgResult<()> {
    if !options.tolerance.is_valid() {
        return Err(LinalgError::InvalidTolerance);
    }
    if options.mode.requires_finite_check(options.check_finite) && !m.is_finite() {
        return Err(LinalgError::NonFiniteInput);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use numerix_runtime::{assert_close, assert_close_matrix, assert_close_slice};

    use super::*;

    #[test]
    fn matmul_rejects_row_vector_squared() {
        let err = matmul(&[vec![1.0, 2.0]], &[vec![1.0, 2.0]]).expect_err("1x2 * 1x2");
        assert!(matches!(err, LinalgError::DimensionMismatch { .. }));
    }

    #[test]
    fn matmul_happy_path() {
        let c = matmul(
            &[vec![1.0, 2.0], vec![3.0, 4.0]],
            &[vec![5.0, 6.0], vec![7.0, 8.0]],
        )
        .expect("2x2 * 2x2");
        assert_eq!(c, vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
    }

    #[test]
    fn ragged_rows_are_rejected_before_arithmetic() {
        let err = det(&[vec![1.0, 2.0], vec![3.0]], &LinalgOptions::default())
            .expect_err("ragged");
        assert!(matches!(err, LinalgError::RaggedMatrix { row: 1, .. }));
    }

    #[test]
    fn det_base_case_is_exact() {
        let value = det(
            &[vec![2.0, 3.0], vec![6.0, 7.0]],
            &LinalgOptions::default(),
        )
        .expect("2x2");
        assert_eq!(value, -4.0);
    }

    #[test]
    fn det_rejects_non_square() {
        assert_eq!(
            det(&[vec![1.0, 2.0]], &LinalgOptions::default()),
            Err(LinalgError::NotSquare { rows: 1, cols: 2 })
        );
    }

    #[test]
    fn det_check_finite_follows_options() {
        let a = vec![vec![1.0, f64::INFINITY], vec![0.0, 1.0]];
        assert_eq!(
            det(&a, &LinalgOptions::default()),
            Err(LinalgError::NonFiniteInput)
        );
        let relaxed = LinalgOptions::default().with_check_finite(false);
        assert!(det(&a, &relaxed).is_ok());
    }

    #[test]
    fn invalid_tolerance_is_rejected() {
        let options = LinalgOptions::default().with_tolerance(Tolerance::new(-1.0, 0.0));
        assert_eq!(
            det(&[vec![1.0]], &options),
            Err(LinalgError::InvalidTolerance)
        );
    }

    #[test]
    fn solve_general_happy_path() {
        let x = solve(
            &[vec![3.0, 2.0], vec![1.0, 2.0]],
            &[5.0, 5.0],
            &LinalgOptions::default(),
        )
        .expect("solve must work");
        assert_close_slice(&x, &[0.0, 2.5], 1e-12, 1e-12);
    }

    #[test]
    fn solve_rejects_wrong_rhs_length() {
        assert_eq!(
            solve(&[vec![1.0]], &[1.0, 2.0], &LinalgOptions::default()),
            Err(LinalgError::LengthMismatch { left: 1, right: 2 })
        );
    }

    #[test]
    fn inverse_matches_known_result() {
        let inverse = inv(&[vec![1.0, 2.0], vec![3.0, 4.0]], &LinalgOptions::default())
            .expect("invertible");
        assert_close_matrix(
            &inverse,
            &[vec![-2.0, 1.0], vec![1.5, -0.5]],
            1e-12,
            1e-12,
        );
        let inverse3 = inv(
            &[
                vec![2.0, 0.0, 0.0],
                vec![0.0, 4.0, 0.0],
                vec![0.0, 0.0, 0.5],
            ],
            &LinalgOptions::default(),
        )
        .expect("invertible");
        assert_close(inverse3[0][0], 0.5, 1e-12, 0.0);
        assert_close(inverse3[1][1], 0.25, 1e-12, 0.0);
        assert_close(inverse3[2][2], 2.0, 1e-12, 0.0);
    }

    #[test]
    fn det_recorded_traces_value() {
        let mut ledger = TraceLedger::new(4);
        let value = det_recorded(
            &[vec![2.0, 3.0], vec![6.0, 7.0]],
            &LinalgOptions::default(),
            &mut ledger,
        )
        .expect("2x2");
        assert_eq!(value, -4.0);
        let trace = ledger.latest().expect("one trace");
        assert_eq!(trace.operation, "det");
        assert_eq!(trace.shape, vec![2, 2]);
        assert!(trace.to_json_line().contains("\"outcome\":\"ok\""));
    }
}
