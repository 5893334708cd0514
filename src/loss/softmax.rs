use log::debug;

use crate::activation::softmax::{log_softmax_row, softmax_rows};
use crate::error::{LossError, Result};
use crate::loss::validate::{ensure_finite, validate_inputs, BatchDims};
use crate::math::matrix::Matrix;

/// Softmax cross-entropy loss and gradient, computed with explicit loops.
///
/// Inputs have dimension D, there are C classes, and the minibatch holds N
/// examples:
/// - `w`   — weights, shape (D, C)
/// - `x`   — minibatch data, shape (N, D)
/// - `y`   — labels, length N; `y[i] = c` means `x[i]` has label c, `0 <= c < C`
/// - `reg` — L2 regularization strength
///
/// Returns `(loss, dW)` with `dW` shaped like `w`.
///
/// The penalty is `reg * Σ W²` and its gradient `reg * W` (no factor ½ or 2),
/// so `reg` keeps the same meaning for every caller tuned against it.
///
/// # Errors
/// Any [`LossError`] from input validation, or
/// [`LossError::NumericOverflow`] when finite inputs push the scores, the
/// penalty, the loss or the gradient past `f64` range. No partial result is
/// returned in either case.
pub fn softmax_loss_naive(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<(f64, Matrix)> {
    let BatchDims { num_train, num_dims, num_classes } = validate_inputs(w, x, y, reg)?;

    let mut loss = 0.0;
    let mut dw = Matrix::zeros(num_dims, num_classes);

    // probs[i][j] starts as the raw score, then becomes p(class j | x_i).
    let mut probs = vec![vec![0.0; num_classes]; num_train];

    for i in 0..num_train {
        for j in 0..num_classes {
            for k in 0..num_dims {
                probs[i][j] += x.data[i][k] * w.data[k][j];
            }
        }
        if probs[i].iter().any(|s| !s.is_finite()) {
            return Err(LossError::NumericOverflow { what: "scores" });
        }

        let mut max = f64::NEG_INFINITY;
        for j in 0..num_classes {
            max = max.max(probs[i][j]);
        }

        let correct_shifted = probs[i][y[i]] - max;

        let mut sum = 0.0;
        for j in 0..num_classes {
            probs[i][j] = (probs[i][j] - max).exp();
            sum += probs[i][j];
        }
        for j in 0..num_classes {
            probs[i][j] /= sum;
        }

        loss -= correct_shifted - sum.ln();
    }

    let penalty = ensure_finite(reg * w.sum_squares(), "regularization penalty")?;
    loss /= num_train as f64;
    loss += penalty;
    let loss = ensure_finite(loss, "loss")?;

    // dL/dscores = P - onehot(y)
    for i in 0..num_train {
        probs[i][y[i]] -= 1.0;
    }

    for i in 0..num_train {
        for j in 0..num_dims {
            for k in 0..num_classes {
                dw.data[j][k] += x.data[i][j] * probs[i][k];
            }
        }
    }

    for j in 0..num_dims {
        for k in 0..num_classes {
            dw.data[j][k] /= num_train as f64;
            dw.data[j][k] += reg * w.data[j][k];
        }
    }
    if dw.find_non_finite().is_some() {
        return Err(LossError::NumericOverflow { what: "gradient" });
    }

    debug!(
        "softmax loss (naive): N={} D={} C={} reg={} loss={:.6}",
        num_train, num_dims, num_classes, reg, loss
    );

    Ok((loss, dw))
}

/// Softmax cross-entropy loss and gradient, computed with whole-matrix
/// operations.
///
/// Inputs and outputs are the same as [`softmax_loss_naive`], and so is the
/// order of every floating-point accumulation; the two agree to rounding.
pub fn softmax_loss_vectorized(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<(f64, Matrix)> {
    let BatchDims { num_train, num_dims, num_classes } = validate_inputs(w, x, y, reg)?;
    let n = num_train as f64;

    let scores = x.dot(w)?;
    if scores.find_non_finite().is_some() {
        return Err(LossError::NumericOverflow { what: "scores" });
    }

    let data_loss: f64 = scores.data.iter()
        .zip(y.iter())
        .map(|(row, &label)| -log_softmax_row(row)[label])
        .sum();
    let penalty = ensure_finite(reg * w.sum_squares(), "regularization penalty")?;
    let loss = ensure_finite(data_loss / n + penalty, "loss")?;

    let mut dscores = softmax_rows(&scores);
    for (row, &label) in dscores.data.iter_mut().zip(y.iter()) {
        row[label] -= 1.0;
    }

    let dw = x.transpose().dot(&dscores)?.map(|v| v / n) + w.map(|v| reg * v);
    if dw.find_non_finite().is_some() {
        return Err(LossError::NumericOverflow { what: "gradient" });
    }

    debug!(
        "softmax loss (vectorized): N={} D={} C={} reg={} loss={:.6}",
        num_train, num_dims, num_classes, reg, loss
    );

    Ok((loss, dw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ones(rows: usize, cols: usize) -> Matrix {
        Matrix::zeros(rows, cols).map(|_| 1.0)
    }

    #[test]
    fn zero_weights_give_ln_c() {
        let w = Matrix::zeros(3, 4);
        let x = ones(2, 3);
        let y = [0, 1];

        for f in [softmax_loss_naive, softmax_loss_vectorized] {
            let (loss, dw) = f(&w, &x, &y, 0.0).unwrap();
            assert_relative_eq!(loss, 4.0_f64.ln(), max_relative = 1e-12);

            // (1/N) Σ_i X[i,j] (0.25 - 1[y_i = k])
            let expected = [-0.25, -0.25, 0.25, 0.25];
            assert_eq!(dw.shape(), (3, 4));
            for row in &dw.data {
                for (v, e) in row.iter().zip(expected.iter()) {
                    assert_relative_eq!(*v, *e, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn hand_computed_two_class_case() {
        // One sample, scores = [0, ln 3] → p = [1/4, 3/4].
        let w = Matrix::from_data(vec![vec![0.0, 3.0_f64.ln()]]).unwrap();
        let x = ones(1, 1);
        let reg = 0.1;

        let (loss, dw) = softmax_loss_naive(&w, &x, &[0], reg).unwrap();
        let penalty = reg * 3.0_f64.ln().powi(2);
        assert_relative_eq!(loss, 4.0_f64.ln() + penalty, max_relative = 1e-12);
        assert_relative_eq!(dw.data[0][0], 0.25 - 1.0, epsilon = 1e-12);
        assert_relative_eq!(dw.data[0][1], 0.75 + reg * 3.0_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn naive_and_vectorized_agree_on_small_batch() {
        let w = Matrix::from_data(vec![
            vec![0.2, -0.1, 0.05],
            vec![-0.3, 0.4, 0.1],
        ]).unwrap();
        let x = Matrix::from_data(vec![
            vec![1.0, 2.0],
            vec![-1.5, 0.5],
            vec![0.0, -2.0],
            vec![3.0, 1.0],
        ]).unwrap();
        let y = [2, 0, 1, 1];

        let (l1, g1) = softmax_loss_naive(&w, &x, &y, 0.3).unwrap();
        let (l2, g2) = softmax_loss_vectorized(&w, &x, &y, 0.3).unwrap();

        assert_relative_eq!(l1, l2, max_relative = 1e-12);
        for (r1, r2) in g1.data.iter().zip(g2.data.iter()) {
            for (a, b) in r1.iter().zip(r2.iter()) {
                assert_relative_eq!(*a, *b, epsilon = 1e-15, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn large_scores_do_not_overflow() {
        let w = Matrix::from_data(vec![vec![1.0, -1.0, 0.0]]).unwrap();
        let x = Matrix::from_data(vec![vec![1000.0], vec![-1000.0]]).unwrap();
        let y = [1, 0];

        for f in [softmax_loss_naive, softmax_loss_vectorized] {
            let (loss, dw) = f(&w, &x, &y, 0.0).unwrap();
            assert!(loss.is_finite());
            // Each sample puts all mass on a wrong class two thousand logits above the label.
            assert_relative_eq!(loss, 2000.0, max_relative = 1e-12);
            assert!(dw.data.iter().flatten().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn errors_propagate_without_partial_result() {
        let w = Matrix::zeros(3, 4);
        let x = ones(2, 3);
        assert_eq!(
            softmax_loss_naive(&w, &x, &[0, 9], 0.0).unwrap_err(),
            LossError::LabelOutOfRange { index: 1, label: 9, classes: 4 }
        );
        assert_eq!(
            softmax_loss_vectorized(&w, &ones(2, 2), &[0, 1], 0.0).unwrap_err(),
            LossError::ShapeMismatch { w_rows: 3, x_cols: 2 }
        );
    }

    #[test]
    fn overflowing_scores_are_an_error() {
        let w = Matrix::from_data(vec![vec![1e200, 0.0]]).unwrap();
        let x = Matrix::from_data(vec![vec![1e200]]).unwrap();

        for f in [softmax_loss_naive, softmax_loss_vectorized] {
            assert_eq!(
                f(&w, &x, &[1], 0.0).unwrap_err(),
                LossError::NumericOverflow { what: "scores" }
            );
        }
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        let w = Matrix::zeros(1, 2);
        let x = Matrix::from_data(vec![vec![f64::NAN]]).unwrap();

        for f in [softmax_loss_naive, softmax_loss_vectorized] {
            let err = f(&w, &x, &[0], 0.0).unwrap_err();
            assert_eq!(err, LossError::NonFinite { name: "X", row: 0, col: 0 });
            assert!(err.is_invalid_input());
        }
    }

    #[test]
    fn overflowing_penalty_is_an_error() {
        // Scores stay at zero but Σ W² overflows.
        let w = Matrix::from_data(vec![vec![1e200, 0.0]]).unwrap();
        let x = Matrix::from_data(vec![vec![0.0]]).unwrap();

        for f in [softmax_loss_naive, softmax_loss_vectorized] {
            assert_eq!(
                f(&w, &x, &[0], 1.0).unwrap_err(),
                LossError::NumericOverflow { what: "regularization penalty" }
            );
        }
    }

    #[test]
    fn overflowing_loss_is_an_error() {
        // Finite scores ±1.7e308 whose gap to the label overflows.
        let w = Matrix::from_data(vec![vec![1.0, -1.0]]).unwrap();
        let x = Matrix::from_data(vec![vec![1.7e308]]).unwrap();

        for f in [softmax_loss_naive, softmax_loss_vectorized] {
            let err = f(&w, &x, &[1], 0.0).unwrap_err();
            assert_eq!(err, LossError::NumericOverflow { what: "loss" });
            assert!(!err.is_invalid_input());
        }
    }

    #[test]
    fn overflowing_gradient_is_an_error() {
        // Scores [0, 150]: p ≈ onehot(1), so each sample adds ≈ -1.5e308 to dW[0][0].
        let w = Matrix::from_data(vec![vec![0.0, 1e-306]]).unwrap();
        let x = Matrix::from_data(vec![vec![1.5e308], vec![1.5e308]]).unwrap();

        for f in [softmax_loss_naive, softmax_loss_vectorized] {
            assert_eq!(
                f(&w, &x, &[0, 0], 0.0).unwrap_err(),
                LossError::NumericOverflow { what: "gradient" }
            );
        }
    }
}
