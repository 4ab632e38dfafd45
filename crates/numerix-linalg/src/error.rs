use thiserror::Error;

pub type LinalgResult<T> = Result<T, LinalgError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinalgError {
    #[error("matrix must have at least one row and one column")]
    EmptyMatrix,
    #[error("ragged matrix: row {row} has {actual} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("data of length {actual} cannot fill a {rows}x{cols} matrix")]
    InvalidDataLength {
        rows: usize,
        cols: usize,
        actual: usize,
    },
    #[error("dimension mismatch in {operation}: left is {left:?}, right is {right:?}")]
    DimensionMismatch {
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
    #[error("length mismatch: left has {left} elements, right has {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("expected square matrix, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("singular matrix{}", pivot_suffix(.pivot_index))]
    SingularMatrix { pivot_index: Option<usize> },
    #[error("{axis} index {index} out of range for bound {bound}")]
    IndexOutOfRange {
        axis: &'static str,
        index: usize,
        bound: usize,
    },
    #[error("expected a 2x1 column vector, got {rows}x{cols}")]
    DimensionError { rows: usize, cols: usize },
    #[error("dimension must be greater than zero")]
    InvalidDimension,
    #[error("array must not contain infs or NaNs")]
    NonFiniteInput,
    #[error("tolerance components must be finite and non-negative")]
    InvalidTolerance,
    #[error("cannot undo a {rows}x{cols} transformation: only 2x2 inverses are supported")]
    UnsupportedUndo { rows: usize, cols: usize },
    #[error("transformation history is empty")]
    EmptyHistory,
    #[error("unknown rotation direction `{0}`")]
    InvalidDirection(String),
    #[error("unknown shear axis `{0}`")]
    InvalidAxis(String),
}

fn pivot_suffix(pivot_index: &Option<usize>) -> String {
    match pivot_index {
        Some(index) => format!(": pivot {index} is numerically zero"),
        None => String::from(": determinant is numerically zero"),
    }
}

#[cfg(test)]
mod tests {
    use super::LinalgError;

    #[test]
    fn singular_message_names_pivot() {
        let err = LinalgError::SingularMatrix {
            pivot_index: Some(2),
        };
        assert_eq!(
            err.to_string(),
            "singular matrix: pivot 2 is numerically zero"
        );
        let err = LinalgError::SingularMatrix { pivot_index: None };
        assert!(err.to_string().contains("determinant"));
    }

    #[test]
    fn mismatch_message_carries_shapes() {
        let err = LinalgError::DimensionMismatch {
            operation: "multiply",
            left: (1, 2),
            right: (1, 2),
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch in multiply: left is (1, 2), right is (1, 2)"
        );
    }
}
