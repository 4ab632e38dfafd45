use std::time::Instant;

use numerix_runtime::{OperationTrace, Tolerance, TraceLedger, TraceOutcome};

use crate::error::{LinalgError, LinalgResult};
use crate::matrix::Matrix;
use crate::{LinalgOptions, validate_input};

/// `P·A = L·U` with `L` unit lower-triangular and `U` upper-triangular.
#[derive(Debug, Clone, PartialEq)]
pub struct LuDecomposition {
    l: Matrix,
    u: Matrix,
    p: Matrix,
    pivots: Vec<usize>,
    sign: f64,
}

impl LuDecomposition {
    #[must_use]
    pub fn l(&self) -> &Matrix {
        &self.l
    }

    #[must_use]
    pub fn u(&self) -> &Matrix {
        &self.u
    }

    #[must_use]
    pub fn p(&self) -> &Matrix {
        &self.p
    }

    /// Row `i` of `P·A` is row `pivots()[i]` of `A`.
    #[must_use]
    pub fn pivots(&self) -> &[usize] {
        &self.pivots
    }

    /// `+1.0` for an even number of row swaps, `-1.0` for odd.
    #[must_use]
    pub fn permutation_sign(&self) -> f64 {
        self.sign
    }

    #[must_use]
    pub fn order(&self) -> usize {
        self.pivots.len()
    }

    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.u.diagonal().iter().fold(self.sign, |acc, d| acc * d)
    }

    #[must_use]
    pub fn into_parts(self) -> (Matrix, Matrix, Matrix) {
        (self.l, self.u, self.p)
    }

    /// `L·U`, which equals `P·A` up to rounding.
    pub fn reconstruct(&self) -> LinalgResult<Matrix> {
        self.l.multiply(&self.u)
    }

    /// Reorders the rows of `a` the way the factorization did.
    pub fn permuted(&self, a: &Matrix) -> LinalgResult<Matrix> {
        self.p.multiply(a)
    }

    /// Solves `A·x = b` by forward substitution on `L` and back substitution on `U`.
    pub fn solve(&self, b: &[f64]) -> LinalgResult<Vec<f64>> {
        let n = self.order();
        if b.len() != n {
            return Err(LinalgError::LengthMismatch {
                left: n,
                right: b.len(),
            });
        }
        let mut x: Vec<f64> = self.pivots.iter().map(|&p| b[p]).collect();
        for i in 0..n {
            let mut sum = 0.0;
            for (j, xj) in x.iter().enumerate().take(i) {
                sum += self.l[(i, j)] * *xj;
            }
            x[i] -= sum;
        }
        for i in (0..n).rev() {
            let mut sum = 0.0;
            for (j, xj) in x.iter().enumerate().skip(i + 1) {
                sum += self.u[(i, j)] * *xj;
            }
            x[i] = (x[i] - sum) / self.u[(i, i)];
        }
        Ok(x)
    }

    /// `A⁻¹`, solved column by column against the identity.
    pub fn inverse(&self) -> LinalgResult<Matrix> {
        let n = self.order();
        let mut data = vec![0.0; n * n];
        let mut e = vec![0.0; n];
        for col in 0..n {
            e.fill(0.0);
            e[col] = 1.0;
            for (row, value) in self.solve(&e)?.into_iter().enumerate() {
                data[row * n + col] = value;
            }
        }
        Matrix::from_row_major(n, n, data)
    }
}

/// Raw in-place factorization shared by [`lu_decompose`] and the LU determinant.
pub(crate) struct Factored {
    pub(crate) lu: Vec<f64>,
    pub(crate) perm: Vec<usize>,
    pub(crate) sign: f64,
    pub(crate) singular_at: Option<usize>,
}

/// Left-looking Crout/Doolittle elimination with partial pivoting.
///
/// Stops at the first pivot whose magnitude is within `tolerance` of zero,
/// relative to the largest entry of `m`. `m` must be square.
pub(crate) fn factor(m: &Matrix, tolerance: Tolerance) -> Factored {
    let n = m.rows();
    let scale = m.max_abs();
    let mut lu = m.as_slice().to_vec();
    let mut perm: Vec<usize> = (0..n).collect();
    let mut sign = 1.0;
    let mut column = vec![0.0; n];

    for j in 0..n {
        for (i, slot) in column.iter_mut().enumerate() {
            *slot = lu[i * n + j];
        }

        // Apply the updates from every already-resolved column.
        for i in 0..n {
            let kmax = i.min(j);
            let mut s = 0.0;
            for k in 0..kmax {
                s += lu[i * n + k] * column[k];
            }
            column[i] -= s;
            lu[i * n + j] = column[i];
        }

        let mut pivot_row = j;
        for i in (j + 1)..n {
            if column[i].abs() > column[pivot_row].abs() {
                pivot_row = i;
            }
        }
        if pivot_row != j {
            for k in 0..n {
                lu.swap(pivot_row * n + k, j * n + k);
            }
            perm.swap(pivot_row, j);
            sign = -sign;
        }

        let pivot = lu[j * n + j];
        if tolerance.is_negligible(pivot, scale) {
            return Factored {
                lu,
                perm,
                sign,
                singular_at: Some(j),
            };
        }
        for i in (j + 1)..n {
            lu[i * n + j] /= pivot;
        }
    }

    Factored {
        lu,
        perm,
        sign,
        singular_at: None,
    }
}

pub fn lu_decompose(m: &Matrix, options: &LinalgOptions) -> LinalgResult<LuDecomposition> {
    if !m.is_square() {
        return Err(LinalgError::NotSquare {
            rows: m.rows(),
            cols: m.cols(),
        });
    }
    validate_input(m, options)?;

    let n = m.rows();
    let factored = factor(m, options.tolerance);
    if let Some(pivot_index) = factored.singular_at {
        return Err(LinalgError::SingularMatrix {
            pivot_index: Some(pivot_index),
        });
    }

    let mut l = vec![0.0; n * n];
    let mut u = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            let value = factored.lu[i * n + j];
            match i.cmp(&j) {
                std::cmp::Ordering::Greater => l[i * n + j] = value,
                std::cmp::Ordering::Equal => {
                    l[i * n + j] = 1.0;
                    u[i * n + j] = value;
                }
                std::cmp::Ordering::Less => u[i * n + j] = value,
            }
        }
    }
    let mut p = vec![0.0; n * n];
    for (row, &source) in factored.perm.iter().enumerate() {
        p[row * n + source] = 1.0;
    }

    Ok(LuDecomposition {
        l: Matrix::from_row_major(n, n, l)?,
        u: Matrix::from_row_major(n, n, u)?,
        p: Matrix::from_row_major(n, n, p)?,
        pivots: factored.perm,
        sign: factored.sign,
    })
}

/// [`lu_decompose`] that appends one trace to `ledger`, success or failure.
pub fn lu_decompose_recorded(
    m: &Matrix,
    options: &LinalgOptions,
    ledger: &mut TraceLedger,
) -> LinalgResult<LuDecomposition> {
    let started = Instant::now();
    let result = lu_decompose(m, options);
    let trace = OperationTrace::new("lu_decompose", vec![m.rows(), m.cols()], options.mode)
        .with_timing_ns(started.elapsed().as_nanos());
    let trace = match &result {
        Ok(decomposition) => trace.with_detail(format!(
            "permutation_sign={}",
            decomposition.permutation_sign()
        )),
        Err(err) => trace
            .with_outcome(TraceOutcome::Rejected)
            .with_detail(err.to_string()),
    };
    ledger.record(trace);
    result
}
