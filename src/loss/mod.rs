pub mod softmax;
pub mod validate;
pub mod loss_type;
pub mod softmax_loss;

pub use softmax::{softmax_loss_naive, softmax_loss_vectorized};
pub use validate::{ensure_finite, validate_inputs, BatchDims};
pub use loss_type::SoftmaxImpl;
pub use softmax_loss::SoftmaxLoss;
