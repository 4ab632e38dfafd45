use std::fmt::{Display, Formatter};
use std::ops::Index;

use nalgebra::DMatrix;
use numerix_runtime::Tolerance;
use serde::{Deserialize, Serialize};

use crate::error::{LinalgError, LinalgResult};

/// Dense row-major matrix with at least one row and one column.
///
/// Every operation returns a new value; the cached shape is fixed at
/// construction and can never drift from the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> LinalgResult<Self> {
        Self::from_row_slices(&rows)
    }

    pub fn from_row_slices(rows: &[Vec<f64>]) -> LinalgResult<Self> {
        let first = rows.first().ok_or(LinalgError::EmptyMatrix)?;
        let cols = first.len();
        if cols == 0 {
            return Err(LinalgError::EmptyMatrix);
        }
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(LinalgError::RaggedMatrix {
                    row: row_idx,
                    expected: cols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> LinalgResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(LinalgError::EmptyMatrix);
        }
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(LinalgError::InvalidDataLength {
                rows,
                cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Fixed-size constructor for shapes known at compile time.
    #[must_use]
    pub fn from_array<const R: usize, const C: usize>(rows: [[f64; C]; R]) -> Self {
        const { assert!(R > 0 && C > 0, "matrix must have at least one row and one column") };
        Self {
            rows: R,
            cols: C,
            data: rows.iter().flatten().copied().collect(),
        }
    }

    /// `n`x1 matrix holding `values`.
    pub fn column_vector(values: &[f64]) -> LinalgResult<Self> {
        Self::from_row_major(values.len(), 1, values.to_vec())
    }

    /// 1x`n` matrix holding `values`.
    pub fn row_vector(values: &[f64]) -> LinalgResult<Self> {
        Self::from_row_major(1, values.len(), values.to_vec())
    }

    pub fn identity(n: usize) -> LinalgResult<Self> {
        if n == 0 {
            return Err(LinalgError::InvalidDimension);
        }
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Ok(Self {
            rows: n,
            cols: n,
            data,
        })
    }

    pub fn zeros(rows: usize, cols: usize) -> LinalgResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(LinalgError::InvalidDimension);
        }
        Ok(Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        })
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[must_use]
    pub const fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Row-major backing storage.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.rows && col < self.cols).then(|| self.data[row * self.cols + col])
    }

    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        (row < self.rows).then(|| &self.data[row * self.cols..(row + 1) * self.cols])
    }

    #[must_use]
    pub fn column(&self, col: usize) -> Option<Vec<f64>> {
        (col < self.cols).then(|| self.data.iter().skip(col).step_by(self.cols).copied().collect())
    }

    #[must_use]
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.rows.min(self.cols))
            .map(|i| self.data[i * self.cols + i])
            .collect()
    }

    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data
            .chunks_exact(self.cols)
            .map(<[f64]>::to_vec)
            .collect()
    }

    /// Largest absolute entry; the reference magnitude for pivot tolerances.
    #[must_use]
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut data = vec![0.0; self.data.len()];
        for (r, row) in self.data.chunks_exact(self.cols).enumerate() {
            for (c, value) in row.iter().enumerate() {
                data[c * self.rows + r] = *value;
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    pub fn add(&self, other: &Self) -> LinalgResult<Self> {
        self.zip_with("add", other, |a, b| a + b)
    }

    pub fn subtract(&self, other: &Self) -> LinalgResult<Self> {
        self.zip_with("subtract", other, |a, b| a - b)
    }

    #[must_use]
    pub fn scalar_multiply(&self, k: f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|v| v * k).collect(),
        }
    }

    /// Matrix product. `other` is transposed once so every entry is a
    /// contiguous row-by-row dot product.
    pub fn multiply(&self, other: &Self) -> LinalgResult<Self> {
        if self.cols != other.rows {
            return Err(LinalgError::DimensionMismatch {
                operation: "multiply",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let other_t = other.transpose();
        let mut data = Vec::with_capacity(self.rows * other.cols);
        for lhs in self.data.chunks_exact(self.cols) {
            for rhs in other_t.data.chunks_exact(other_t.cols) {
                data.push(dot_unchecked(lhs, rhs));
            }
        }
        Ok(Self {
            rows: self.rows,
            cols: other.cols,
            data,
        })
    }

    pub fn remove_row(&self, row: usize) -> LinalgResult<Self> {
        self.check_row(row)?;
        if self.rows == 1 {
            return Err(LinalgError::EmptyMatrix);
        }
        let mut data = self.data.clone();
        data.drain(row * self.cols..(row + 1) * self.cols);
        Ok(Self {
            rows: self.rows - 1,
            cols: self.cols,
            data,
        })
    }

    pub fn remove_column(&self, col: usize) -> LinalgResult<Self> {
        if col >= self.cols {
            return Err(LinalgError::IndexOutOfRange {
                axis: "column",
                index: col,
                bound: self.cols,
            });
        }
        if self.cols == 1 {
            return Err(LinalgError::EmptyMatrix);
        }
        let data = self
            .data
            .iter()
            .enumerate()
            .filter(|(idx, _)| idx % self.cols != col)
            .map(|(_, v)| *v)
            .collect();
        Ok(Self {
            rows: self.rows,
            cols: self.cols - 1,
            data,
        })
    }

    /// Closed-form inverse of a 2x2 matrix.
    ///
    /// Fails with `SingularMatrix` when `|ad - bc|` is within `tolerance`
    /// of zero, scaled by the largest entry.
    pub fn invert_2x2(&self, tolerance: Tolerance) -> LinalgResult<Self> {
        if !self.is_square() {
            return Err(LinalgError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.rows != 2 {
            return Err(LinalgError::DimensionMismatch {
                operation: "invert_2x2",
                left: self.shape(),
                right: (2, 2),
            });
        }
        let [a, b, c, d] = [self.data[0], self.data[1], self.data[2], self.data[3]];
        let det = a * d - b * c;
        let scale = self.max_abs();
        if tolerance.is_negligible(det, scale * scale) {
            return Err(LinalgError::SingularMatrix { pivot_index: None });
        }
        Ok(Self::from_array([[d, -b], [-c, a]]).scalar_multiply(1.0 / det))
    }

    pub fn row_scale(&self, row: usize, k: f64) -> LinalgResult<Self> {
        self.check_row(row)?;
        let mut out = self.clone();
        for value in out.row_mut(row) {
            *value *= k;
        }
        Ok(out)
    }

    pub fn row_swap(&self, row1: usize, row2: usize) -> LinalgResult<Self> {
        self.check_row(row1)?;
        self.check_row(row2)?;
        let mut out = self.clone();
        out.swap_rows_in_place(row1, row2);
        Ok(out)
    }

    /// Adds `k` times row `from` to row `to`.
    pub fn row_add_multiple(&self, from: usize, to: usize, k: f64) -> LinalgResult<Self> {
        self.check_row(from)?;
        self.check_row(to)?;
        let source = self.data[from * self.cols..(from + 1) * self.cols].to_vec();
        let mut out = self.clone();
        for (target, value) in out.row_mut(to).iter_mut().zip(source) {
            *target += k * value;
        }
        Ok(out)
    }

    /// Element-wise comparison; shapes must match exactly.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: Tolerance) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, e)| tolerance.approx_eq(*a, *e))
    }

    pub(crate) fn swap_rows_in_place(&mut self, row1: usize, row2: usize) {
        if row1 == row2 {
            return;
        }
        let cols = self.cols;
        for c in 0..cols {
            self.data.swap(row1 * cols + c, row2 * cols + c);
        }
    }

    fn row_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    fn check_row(&self, row: usize) -> LinalgResult<()> {
        if row >= self.rows {
            return Err(LinalgError::IndexOutOfRange {
                axis: "row",
                index: row,
                bound: self.rows,
            });
        }
        Ok(())
    }

    fn zip_with(
        &self,
        operation: &'static str,
        other: &Self,
        f: impl Fn(f64, f64) -> f64,
    ) -> LinalgResult<Self> {
        if self.shape() != other.shape() {
            return Err(LinalgError::DimensionMismatch {
                operation,
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| f(*a, *b))
                .collect(),
        })
    }
}

/// Sum of pairwise products.
pub fn dot_product(u: &[f64], v: &[f64]) -> LinalgResult<f64> {
    if u.len() != v.len() {
        return Err(LinalgError::LengthMismatch {
            left: u.len(),
            right: v.len(),
        });
    }
    Ok(dot_unchecked(u, v))
}

fn dot_unchecked(u: &[f64], v: &[f64]) -> f64 {
    u.iter().zip(v).map(|(a, b)| a * b).sum()
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = LinalgError;

    fn try_from(rows: Vec<Vec<f64>>) -> LinalgResult<Self> {
        Self::from_rows(rows)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(matrix: Matrix) -> Self {
        matrix.to_rows()
    }
}

impl From<&Matrix> for DMatrix<f64> {
    fn from(matrix: &Matrix) -> Self {
        DMatrix::from_row_slice(matrix.rows, matrix.cols, &matrix.data)
    }
}

impl TryFrom<&DMatrix<f64>> for Matrix {
    type Error = LinalgError;

    fn try_from(matrix: &DMatrix<f64>) -> LinalgResult<Self> {
        let (rows, cols) = matrix.shape();
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(matrix[(r, c)]);
            }
        }
        Self::from_row_major(rows, cols, data)
    }
}

impl Display for Matrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (r, row) in self.data.chunks_exact(self.cols).enumerate() {
            if r > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for (c, value) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{value}")?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}
