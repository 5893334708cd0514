use crate::error::{LossError, Result};
use crate::math::matrix::Matrix;

/// Sizes of one validated minibatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchDims {
    /// N — samples in the minibatch.
    pub num_train: usize,
    /// D — feature dimension.
    pub num_dims: usize,
    /// C — number of classes.
    pub num_classes: usize,
}

/// Checks `(W, X, y, reg)` before either loss form touches them.
///
/// Order matters only for which error is reported when several apply:
/// ragged matrices, non-finite entries, inner dimension, label count, empty
/// batch, empty class set, label range, then `reg`.
pub fn validate_inputs(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<BatchDims> {
    w.check_well_formed("W")?;
    x.check_well_formed("X")?;
    check_finite_entries(w, "W")?;
    check_finite_entries(x, "X")?;

    if w.rows != x.cols {
        return Err(LossError::ShapeMismatch { w_rows: w.rows, x_cols: x.cols });
    }
    if y.len() != x.rows {
        return Err(LossError::LabelCountMismatch { labels: y.len(), samples: x.rows });
    }
    if x.rows == 0 {
        return Err(LossError::EmptyBatch);
    }
    if w.cols == 0 {
        return Err(LossError::NoClasses);
    }
    if let Some((index, &label)) = y.iter().enumerate().find(|&(_, &label)| label >= w.cols) {
        return Err(LossError::LabelOutOfRange { index, label, classes: w.cols });
    }
    if !reg.is_finite() || reg < 0.0 {
        return Err(LossError::InvalidRegularization(reg));
    }

    Ok(BatchDims {
        num_train: x.rows,
        num_dims: x.cols,
        num_classes: w.cols,
    })
}

/// Passes `value` through unless it overflowed to NaN or ±inf.
pub fn ensure_finite(value: f64, what: &'static str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LossError::NumericOverflow { what })
    }
}

fn check_finite_entries(m: &Matrix, name: &'static str) -> Result<()> {
    match m.find_non_finite() {
        Some((row, col)) => Err(LossError::NonFinite { name, row, col }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ones(rows: usize, cols: usize) -> Matrix {
        Matrix::zeros(rows, cols).map(|_| 1.0)
    }

    #[test]
    fn accepts_consistent_inputs() {
        let dims = validate_inputs(&ones(3, 4), &ones(2, 3), &[0, 3], 0.1).unwrap();
        assert_eq!(dims, BatchDims { num_train: 2, num_dims: 3, num_classes: 4 });
    }

    #[test]
    fn rejects_each_bad_input() {
        let w = ones(3, 4);
        let x = ones(2, 3);

        assert_eq!(
            validate_inputs(&ones(5, 4), &x, &[0, 1], 0.0),
            Err(LossError::ShapeMismatch { w_rows: 5, x_cols: 3 })
        );
        assert_eq!(
            validate_inputs(&w, &x, &[0], 0.0),
            Err(LossError::LabelCountMismatch { labels: 1, samples: 2 })
        );
        assert_eq!(
            validate_inputs(&w, &ones(0, 3), &[], 0.0),
            Err(LossError::EmptyBatch)
        );
        assert_eq!(
            validate_inputs(&ones(3, 0), &x, &[0, 0], 0.0),
            Err(LossError::NoClasses)
        );
        assert_eq!(
            validate_inputs(&w, &x, &[0, 4], 0.0),
            Err(LossError::LabelOutOfRange { index: 1, label: 4, classes: 4 })
        );
        assert_eq!(
            validate_inputs(&w, &x, &[0, 1], -0.5),
            Err(LossError::InvalidRegularization(-0.5))
        );
        assert!(validate_inputs(&w, &x, &[0, 1], f64::INFINITY).is_err());
    }

    #[test]
    fn rejects_non_finite_entries() {
        let mut x = ones(2, 3);
        x.data[1][2] = f64::NAN;
        assert_eq!(
            validate_inputs(&ones(3, 4), &x, &[0, 1], 0.0),
            Err(LossError::NonFinite { name: "X", row: 1, col: 2 })
        );

        let mut w = ones(3, 4);
        w.data[0][3] = f64::NEG_INFINITY;
        assert_eq!(
            validate_inputs(&w, &ones(2, 3), &[0, 1], 0.0),
            Err(LossError::NonFinite { name: "W", row: 0, col: 3 })
        );
    }

    #[test]
    fn ensure_finite_flags_overflow() {
        assert_eq!(ensure_finite(1.5, "loss"), Ok(1.5));
        assert_eq!(
            ensure_finite(f64::INFINITY, "loss"),
            Err(LossError::NumericOverflow { what: "loss" })
        );
        assert!(ensure_finite(f64::NAN, "loss").is_err());
    }

    #[test]
    fn ragged_weights_are_named() {
        let mut w = ones(3, 4);
        w.data[1].pop();
        assert_eq!(
            validate_inputs(&w, &ones(2, 3), &[0, 1], 0.0),
            Err(LossError::RaggedMatrix { name: "W" })
        );
    }
}
