//! 2D point transforms expressed as matrix products on 2x1 column vectors.

use std::str::FromStr;

use numerix_runtime::Tolerance;

use crate::error::{LinalgError, LinalgResult};
use crate::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationDirection {
    Clockwise,
    #[default]
    CounterClockwise,
}

impl FromStr for RotationDirection {
    type Err = LinalgError;

    fn from_str(s: &str) -> LinalgResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "clockwise" | "cw" => Ok(Self::Clockwise),
            "counterclockwise" | "anticlockwise" | "ccw" => Ok(Self::CounterClockwise),
            _ => Err(LinalgError::InvalidDirection(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShearAxis {
    X,
    Y,
}

impl FromStr for ShearAxis {
    type Err = LinalgError;

    fn from_str(s: &str) -> LinalgResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "xaxis" | "x" => Ok(Self::X),
            "yaxis" | "y" => Ok(Self::Y),
            _ => Err(LinalgError::InvalidAxis(s.to_owned())),
        }
    }
}

#[must_use]
pub fn rotation_matrix(degrees: f64, direction: RotationDirection) -> Matrix {
    let radians = degrees.to_radians();
    let (sin, cos) = radians.sin_cos();
    let sin = match direction {
        RotationDirection::Clockwise => -sin,
        RotationDirection::CounterClockwise => sin,
    };
    Matrix::from_array([[cos, -sin], [sin, cos]])
}

#[must_use]
pub fn scale_matrix(sx: f64, sy: f64) -> Matrix {
    Matrix::from_array([[sx, 0.0], [0.0, sy]])
}

#[must_use]
pub fn shear_matrix(k: f64, axis: ShearAxis) -> Matrix {
    match axis {
        ShearAxis::X => Matrix::from_array([[1.0, k], [0.0, 1.0]]),
        ShearAxis::Y => Matrix::from_array([[1.0, 0.0], [k, 1.0]]),
    }
}

/// Homogeneous 3x3 translation.
#[must_use]
pub fn translation_matrix(tx: f64, ty: f64) -> Matrix {
    Matrix::from_array([[1.0, 0.0, tx], [0.0, 1.0, ty], [0.0, 0.0, 1.0]])
}

pub fn rotate(point: &Matrix, degrees: f64, direction: RotationDirection) -> LinalgResult<Matrix> {
    apply(&rotation_matrix(degrees, direction), point)
}

pub fn scale(point: &Matrix, sx: f64, sy: f64) -> LinalgResult<Matrix> {
    apply(&scale_matrix(sx, sy), point)
}

pub fn shear(point: &Matrix, k: f64, axis: ShearAxis) -> LinalgResult<Matrix> {
    apply(&shear_matrix(k, axis), point)
}

pub fn affine(point: &Matrix, tx: f64, ty: f64) -> LinalgResult<Matrix> {
    apply(&translation_matrix(tx, ty), point)
}

/// Applies a 2x2 linear map, or a 3x3 homogeneous map by lifting the
/// point to `[x, y, 1]` and dropping the extra coordinate afterwards.
fn apply(transform: &Matrix, point: &Matrix) -> LinalgResult<Matrix> {
    ensure_point(point)?;
    if transform.rows() == 2 {
        return transform.multiply(point);
    }
    let lifted = Matrix::from_array([[point[(0, 0)]], [point[(1, 0)]], [1.0]]);
    let moved = transform.multiply(&lifted)?;
    Ok(Matrix::from_array([[moved[(0, 0)]], [moved[(1, 0)]]]))
}

fn ensure_point(point: &Matrix) -> LinalgResult<()> {
    if point.shape() != (2, 1) {
        return Err(LinalgError::DimensionError {
            rows: point.rows(),
            cols: point.cols(),
        });
    }
    Ok(())
}

/// A point plus the stack of transforms applied to it.
///
/// Only linear (2x2) steps can be undone; undoing a translation fails
/// and leaves the history untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformHistory {
    state: Matrix,
    applied: Vec<Matrix>,
}

impl TransformHistory {
    pub fn new(point: Matrix) -> LinalgResult<Self> {
        ensure_point(&point)?;
        Ok(Self {
            state: point,
            applied: Vec::new(),
        })
    }

    #[must_use]
    pub fn state(&self) -> &Matrix {
        &self.state
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.applied.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    pub fn rotate(&mut self, degrees: f64, direction: RotationDirection) -> LinalgResult<&Matrix> {
        self.push(rotation_matrix(degrees, direction))
    }

    pub fn scale(&mut self, sx: f64, sy: f64) -> LinalgResult<&Matrix> {
        self.push(scale_matrix(sx, sy))
    }

    pub fn shear(&mut self, k: f64, axis: ShearAxis) -> LinalgResult<&Matrix> {
        self.push(shear_matrix(k, axis))
    }

    pub fn affine(&mut self, tx: f64, ty: f64) -> LinalgResult<&Matrix> {
        self.push(translation_matrix(tx, ty))
    }

    /// Reverts the most recent transform by left-multiplying its inverse.
    pub fn undo(&mut self, tolerance: Tolerance) -> LinalgResult<&Matrix> {
        let last = self.applied.last().ok_or(LinalgError::EmptyHistory)?;
        if last.shape() != (2, 2) {
            return Err(LinalgError::UnsupportedUndo {
                rows: last.rows(),
                cols: last.cols(),
            });
        }
        let inverse = last.invert_2x2(tolerance)?;
        self.state = inverse.multiply(&self.state)?;
        self.applied.pop();
        Ok(&self.state)
    }

    fn push(&mut self, transform: Matrix) -> LinalgResult<&Matrix> {
        self.state = apply(&transform, &self.state)?;
        self.applied.push(transform);
        Ok(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: Tolerance = Tolerance::absolute(0.001);

    fn point(x: f64, y: f64) -> Matrix {
        Matrix::from_array([[x], [y]])
    }

    #[test]
    fn rotate_clockwise_quarter_turn() {
        let out = rotate(&point(0.0, 1.0), 90.0, RotationDirection::Clockwise).expect("2x1");
        assert!(out.approx_eq(&point(1.0, 0.0), EPS), "{out}");
    }

    #[test]
    fn rotate_counter_clockwise_quarter_turn() {
        let out =
            rotate(&point(1.0, 0.0), 90.0, RotationDirection::CounterClockwise).expect("2x1");
        assert!(out.approx_eq(&point(0.0, 1.0), EPS), "{out}");
    }

    #[test]
    fn scale_and_shear() {
        let scaled = scale(&point(2.0, 3.0), 2.0, -1.0).expect("2x1");
        assert_eq!(scaled, point(4.0, -3.0));
        let sheared_x = shear(&point(1.0, 2.0), 3.0, ShearAxis::X).expect("2x1");
        assert_eq!(sheared_x, point(7.0, 2.0));
        let sheared_y = shear(&point(1.0, 2.0), 3.0, ShearAxis::Y).expect("2x1");
        assert_eq!(sheared_y, point(1.0, 5.0));
    }

    #[test]
    fn affine_translates_through_homogeneous_lift() {
        let moved = affine(&point(1.0, 2.0), 10.0, -5.0).expect("2x1");
        assert_eq!(moved, point(11.0, -3.0));
    }

    #[test]
    fn non_point_inputs_are_rejected() {
        let row = Matrix::from_array([[1.0, 2.0]]);
        assert_eq!(
            rotate(&row, 45.0, RotationDirection::Clockwise),
            Err(LinalgError::DimensionError { rows: 1, cols: 2 })
        );
        let tall = Matrix::from_array([[1.0], [2.0], [3.0]]);
        assert!(matches!(
            affine(&tall, 1.0, 1.0),
            Err(LinalgError::DimensionError { rows: 3, cols: 1 })
        ));
        assert!(TransformHistory::new(tall).is_err());
    }

    #[test]
    fn parse_direction_and_axis() {
        assert_eq!(
            "clockwise".parse::<RotationDirection>(),
            Ok(RotationDirection::Clockwise)
        );
        assert_eq!(
            "CounterClockwise".parse::<RotationDirection>(),
            Ok(RotationDirection::CounterClockwise)
        );
        assert_eq!("xaxis".parse::<ShearAxis>(), Ok(ShearAxis::X));
        assert_eq!(
            "sideways".parse::<ShearAxis>(),
            Err(LinalgError::InvalidAxis(String::from("sideways")))
        );
        assert!("spin".parse::<RotationDirection>().is_err());
    }

    #[test]
    fn history_undo_restores_previous_state() {
        let mut history = TransformHistory::new(point(1.0, 2.0)).expect("2x1");
        history.scale(2.0, 4.0).expect("scale");
        history
            .rotate(30.0, RotationDirection::Clockwise)
            .expect("rotate");
        history.shear(0.5, ShearAxis::Y).expect("shear");
        assert_eq!(history.len(), 3);

        history.undo(Tolerance::default()).expect("undo shear");
        history.undo(Tolerance::default()).expect("undo rotate");
        assert!(history.state().approx_eq(&point(2.0, 8.0), EPS));
        history.undo(Tolerance::default()).expect("undo scale");
        assert!(history.state().approx_eq(&point(1.0, 2.0), EPS));
        assert_eq!(
            history.undo(Tolerance::default()),
            Err(LinalgError::EmptyHistory)
        );
    }

    #[test]
    fn history_cannot_undo_translation() {
        let mut history = TransformHistory::new(point(0.0, 0.0)).expect("2x1");
        history.affine(3.0, 4.0).expect("affine");
        assert_eq!(
            history.undo(Tolerance::default()),
            Err(LinalgError::UnsupportedUndo { rows: 3, cols: 3 })
        );
        assert_eq!(history.len(), 1);
        assert_eq!(history.state(), &point(3.0, 4.0));
    }

    #[test]
    fn history_cannot_undo_degenerate_scale() {
        let mut history = TransformHistory::new(point(1.0, 1.0)).expect("2x1");
        history.scale(0.0, 1.0).expect("scale");
        assert_eq!(
            history.undo(Tolerance::default()),
            Err(LinalgError::SingularMatrix { pivot_index: None })
        );
    }
}
