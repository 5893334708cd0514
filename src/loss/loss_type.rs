use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::loss::softmax::{softmax_loss_naive, softmax_loss_vectorized};
use crate::math::matrix::Matrix;

/// Selects which form of the softmax loss is evaluated.
///
/// - `Naive`      — explicit per-sample, per-class, per-feature loops.
/// - `Vectorized` — whole-matrix products (`X·W`, `Xᵀ·dscores`).
///
/// Both return the same loss and gradient up to rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftmaxImpl {
    Naive,
    #[default]
    Vectorized,
}

impl SoftmaxImpl {
    pub fn compute(self, w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<(f64, Matrix)> {
        match self {
            SoftmaxImpl::Naive      => softmax_loss_naive(w, x, y, reg),
            SoftmaxImpl::Vectorized => softmax_loss_vectorized(w, x, y, reg),
        }
    }
}
