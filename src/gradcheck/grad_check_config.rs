use serde::{Serialize, Deserialize};

/// Settings for [`grad_check_sparse`](crate::gradcheck::grad_check_sparse).
///
/// - `num_checks` — how many randomly chosen weight entries to probe
/// - `step`       — finite-difference half-width `h`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradCheckConfig {
    pub num_checks: usize,
    pub step: f64,
}

impl GradCheckConfig {
    pub fn new(num_checks: usize, step: f64) -> Self {
        GradCheckConfig { num_checks, step }
    }
}

impl Default for GradCheckConfig {
    fn default() -> Self {
        GradCheckConfig {
            num_checks: 10,
            step: 1e-5,
        }
    }
}
