pub mod math;
pub mod activation;
pub mod loss;
pub mod gradcheck;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use error::LossError;
pub use loss::softmax::{softmax_loss_naive, softmax_loss_vectorized};
pub use loss::loss_type::SoftmaxImpl;
pub use loss::softmax_loss::SoftmaxLoss;
pub use gradcheck::{grad_check_sparse, numerical_gradient, rel_error, GradCheckConfig, GradCheckSample};
