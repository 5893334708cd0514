pub mod numerical;
pub mod grad_check_config;

pub use numerical::{grad_check_sparse, numerical_gradient, rel_error, GradCheckSample};
pub use grad_check_config::GradCheckConfig;
