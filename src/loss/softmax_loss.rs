use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::loss::loss_type::SoftmaxImpl;
use crate::math::matrix::Matrix;

/// A configured softmax loss: regularization strength plus the form used to
/// evaluate it.
///
/// # Fields
/// - `reg`            — L2 strength; the penalty is `reg * Σ W²`
/// - `implementation` — `naive` or `vectorized` (default) when deserialized
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxLoss {
    pub reg: f64,
    #[serde(default)]
    pub implementation: SoftmaxImpl,
}

impl SoftmaxLoss {
    /// Vectorized loss with the given regularization strength.
    pub fn new(reg: f64) -> Self {
        SoftmaxLoss {
            reg,
            implementation: SoftmaxImpl::default(),
        }
    }

    pub fn with_implementation(mut self, implementation: SoftmaxImpl) -> Self {
        self.implementation = implementation;
        self
    }

    /// Returns `(loss, dW)` for weights `w` on minibatch `(x, y)`.
    pub fn evaluate(&self, w: &Matrix, x: &Matrix, y: &[usize]) -> Result<(f64, Matrix)> {
        self.implementation.compute(w, x, y, self.reg)
    }

    /// Loss value alone; the shape the gradient checker wants.
    pub fn loss_only(&self, w: &Matrix, x: &Matrix, y: &[usize]) -> Result<f64> {
        self.evaluate(w, x, y).map(|(loss, _)| loss)
    }
}

impl Default for SoftmaxLoss {
    fn default() -> Self {
        SoftmaxLoss::new(0.0)
    }
}
