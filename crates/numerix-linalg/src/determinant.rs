//! Determinant evaluation dispatched by matrix order.
//!
//! | order | method                                        |
//! |-------|-----------------------------------------------|
//! | 1, 2  | closed form                                   |
//! | 3     | wraparound diagonal products (rule of Sarrus) |
//! | 4     | cofactor expansion over index views           |
//! | >= 5  | signed product of LU pivots                   |
//!
//! The diagonal rule is exact only for order 3, so it is never applied
//! beyond it.
//!
//! Every order first runs pivoted elimination under the caller's
//! [`Tolerance`]. A negligible pivot makes the result exactly `0.0`
//! whichever formula the table would pick, so rounding in the closed
//! forms cannot leave a singular matrix with a nonzero determinant.

use numerix_runtime::Tolerance;

use crate::error::{LinalgError, LinalgResult};
use crate::lup::{Factored, factor};
use crate::matrix::Matrix;

/// Largest order evaluated by cofactor expansion; LU takes over above it.
pub const COFACTOR_MAX_ORDER: usize = 4;

/// Largest order [`det_cofactor`] accepts.
pub const COFACTOR_EXPANSION_LIMIT: usize = 10;

pub fn determinant(m: &Matrix, tolerance: Tolerance) -> LinalgResult<f64> {
    let n = ensure_square(m)?;
    let factored = factor(m, tolerance);
    if factored.singular_at.is_some() {
        return Ok(0.0);
    }
    Ok(match n {
        1 => m[(0, 0)],
        2 => m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)],
        3 => sarrus(m),
        n if n <= COFACTOR_MAX_ORDER => cofactor_unchecked(m),
        _ => pivot_product(&factored, n),
    })
}

/// Recursive cofactor expansion along the first remaining row.
///
/// O(n!) work; intended for small orders and as an oracle in tests.
/// Orders above [`COFACTOR_EXPANSION_LIMIT`] fail with
/// [`LinalgError::InvalidDimension`]. No tolerance is applied, so rounding
/// can leave a singular input with a tiny nonzero result.
pub fn det_cofactor(m: &Matrix) -> LinalgResult<f64> {
    let n = ensure_square(m)?;
    if n > COFACTOR_EXPANSION_LIMIT {
        return Err(LinalgError::InvalidDimension);
    }
    Ok(cofactor_unchecked(m))
}

/// `sign(P) * prod(diag(U))`; exactly `0.0` once a pivot is negligible.
pub fn det_lu(m: &Matrix, tolerance: Tolerance) -> LinalgResult<f64> {
    ensure_square(m)?;
    Ok(lu_unchecked(m, tolerance))
}

impl Matrix {
    /// Method form of [`determinant`].
    pub fn determinant(&self, tolerance: Tolerance) -> LinalgResult<f64> {
        determinant(self, tolerance)
    }
}

fn ensure_square(m: &Matrix) -> LinalgResult<usize> {
    if !m.is_square() {
        return Err(LinalgError::NotSquare {
            rows: m.rows(),
            cols: m.cols(),
        });
    }
    Ok(m.rows())
}

fn sarrus(m: &Matrix) -> f64 {
    let n = m.rows();
    let mut total = 0.0;
    for start in 0..n {
        let mut down_right = 1.0;
        let mut down_left = 1.0;
        for i in 0..n {
            down_right *= m[(i, (start + i) % n)];
            down_left *= m[(i, (start + n - i) % n)];
        }
        total += down_right - down_left;
    }
    total
}

fn cofactor_unchecked(m: &Matrix) -> f64 {
    let rows: Vec<usize> = (0..m.rows()).collect();
    let cols: Vec<usize> = (0..m.cols()).collect();
    expand(m, &rows, &cols)
}

fn expand(m: &Matrix, rows: &[usize], cols: &[usize]) -> f64 {
    match rows.len() {
        1 => m[(rows[0], cols[0])],
        2 => {
            m[(rows[0], cols[0])] * m[(rows[1], cols[1])]
                - m[(rows[0], cols[1])] * m[(rows[1], cols[0])]
        }
        _ => {
            let top = rows[0];
            let mut minor_cols = Vec::with_capacity(cols.len() - 1);
            let mut total = 0.0;
            for (h, &col) in cols.iter().enumerate() {
                let entry = m[(top, col)];
                if entry == 0.0 {
                    continue;
                }
                minor_cols.clear();
                minor_cols.extend(cols.iter().copied().filter(|&c| c != col));
                let sign = if h % 2 == 0 { 1.0 } else { -1.0 };
                total += sign * entry * expand(m, &rows[1..], &minor_cols);
            }
            total
        }
    }
}

fn lu_unchecked(m: &Matrix, tolerance: Tolerance) -> f64 {
    let factored = factor(m, tolerance);
    if factored.singular_at.is_some() {
        return 0.0;
    }
    pivot_product(&factored, m.rows())
}

fn pivot_product(factored: &Factored, n: usize) -> f64 {
    (0..n).fold(factored.sign, |acc, i| acc * factored.lu[i * n + i])
}
