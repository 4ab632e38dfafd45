#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use numerix_linalg::{Matrix, RotationDirection, ShearAxis, TransformHistory};
use numerix_runtime::Tolerance;

#[derive(Debug, Arbitrary)]
enum Step {
    Rotate { degrees: f64, clockwise: bool },
    Scale { sx: f64, sy: f64 },
    Shear { k: f64, y_axis: bool },
    Affine { tx: f64, ty: f64 },
    Undo,
}

#[derive(Debug, Arbitrary)]
struct HistoryInput {
    x: f64,
    y: f64,
    steps: Vec<Step>,
}

fuzz_target!(|input: HistoryInput| {
    let point = Matrix::from_array([[input.x], [input.y]]);
    let mut history = TransformHistory::new(point).expect("2x1 point");
    for step in input.steps.into_iter().take(64) {
        let before = history.len();
        match step {
            Step::Rotate { degrees, clockwise } => {
                let direction = if clockwise {
                    RotationDirection::Clockwise
                } else {
                    RotationDirection::CounterClockwise
                };
                history.rotate(degrees, direction).expect("2x1 point");
            }
            Step::Scale { sx, sy } => {
                history.scale(sx, sy).expect("2x1 point");
            }
            Step::Shear { k, y_axis } => {
                let axis = if y_axis { ShearAxis::Y } else { ShearAxis::X };
                history.shear(k, axis).expect("2x1 point");
            }
            Step::Affine { tx, ty } => {
                history.affine(tx, ty).expect("2x1 point");
            }
            Step::Undo => {
                let undone = history.undo(Tolerance::default()).is_ok();
                let expected = if undone { before - 1 } else { before };
                assert_eq!(history.len(), expected);
                continue;
            }
        }
        assert_eq!(history.len(), before + 1);
        assert_eq!(history.state().shape(), (2, 1));
    }
});
