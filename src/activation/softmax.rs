use crate::math::matrix::Matrix;

/// Numerically stable softmax of one row of class scores.
///
/// The row maximum is subtracted before exponentiating. It cancels in the
/// normalization, but keeps every exponent ≤ 0 so `exp()` can't overflow,
/// and at least one term equals 1 so the denominator never underflows to 0.
///
/// An empty row gives an empty distribution.
pub fn softmax_row(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();

    exps.into_iter().map(|e| e / sum).collect()
}

/// Log-probabilities of one row, `(s - max) - ln Σ exp(s - max)`.
///
/// Stays finite where `softmax_row(..).ln()` would hit `ln(0)` for classes
/// whose probability underflows.
pub fn log_softmax_row(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let log_sum = scores.iter().map(|s| (s - max).exp()).sum::<f64>().ln();

    scores.iter().map(|s| (s - max) - log_sum).collect()
}

/// Applies [`softmax_row`] to every row of an N×C score matrix.
pub fn softmax_rows(scores: &Matrix) -> Matrix {
    Matrix {
        rows: scores.rows,
        cols: scores.cols,
        data: scores.data.iter().map(|row| softmax_row(row)).collect(),
    }
}
