use log::{trace, warn};
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{LossError, Result};
use crate::gradcheck::grad_check_config::GradCheckConfig;
use crate::math::matrix::Matrix;

/// Relative error above which a sample is reported as suspicious.
const WARN_REL_ERROR: f64 = 1e-4;

/// Guards the denominator of `rel_error` when both values are ~0.
const REL_ERROR_FLOOR: f64 = 1e-12;

/// One probed weight entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradCheckSample {
    pub row: usize,
    pub col: usize,
    pub numerical: f64,
    pub analytic: f64,
    pub rel_error: f64,
}

/// `|a - b| / max(|a| + |b|, 1e-12)`
pub fn rel_error(a: f64, b: f64) -> f64 {
    (a - b).abs() / (a.abs() + b.abs()).max(REL_ERROR_FLOOR)
}

/// Central-difference estimate of ∂f/∂W at every entry of `w`:
///   (f(W + h·e_ij) - f(W - h·e_ij)) / 2h
///
/// Costs two evaluations of `f` per entry. `w` itself is never modified.
pub fn numerical_gradient<F>(mut f: F, w: &Matrix, h: f64) -> Result<Matrix>
where
    F: FnMut(&Matrix) -> Result<f64>,
{
    let mut probe = w.clone();
    let mut grad = Matrix::zeros(w.rows, w.cols);

    for i in 0..w.rows {
        for j in 0..w.cols {
            grad.data[i][j] = central_difference(&mut f, &mut probe, i, j, h)?;
        }
    }

    Ok(grad)
}

/// Compares `analytic` against a central-difference estimate at
/// `config.num_checks` randomly chosen entries of `w`.
///
/// Entries are drawn with replacement, so the same one may be probed twice.
pub fn grad_check_sparse<F, R>(
    mut f: F,
    w: &Matrix,
    analytic: &Matrix,
    config: &GradCheckConfig,
    rng: &mut R,
) -> Result<Vec<GradCheckSample>>
where
    F: FnMut(&Matrix) -> Result<f64>,
    R: Rng + ?Sized,
{
    if analytic.shape() != w.shape() {
        return Err(LossError::GradientShape {
            expected: w.shape(),
            actual: analytic.shape(),
        });
    }
    analytic.check_well_formed("dW")?;
    if w.rows == 0 || w.cols == 0 {
        return Ok(Vec::new());
    }

    let mut probe = w.clone();
    let mut samples = Vec::new();

    for _ in 0..config.num_checks {
        let row = rng.gen_range(0..w.rows);
        let col = rng.gen_range(0..w.cols);

        let numerical = central_difference(&mut f, &mut probe, row, col, config.step)?;
        let expected = analytic.data[row][col];
        let err = rel_error(numerical, expected);

        trace!(
            "grad check ({}, {}): numerical {:e} analytic {:e}, relative error {:e}",
            row, col, numerical, expected, err
        );
        if err > WARN_REL_ERROR {
            warn!(
                "grad check ({}, {}) disagrees: numerical {:e} vs analytic {:e} (relative error {:e})",
                row, col, numerical, expected, err
            );
        }

        samples.push(GradCheckSample {
            row,
            col,
            numerical,
            analytic: expected,
            rel_error: err,
        });
    }

    Ok(samples)
}

/// Perturbs `probe[i][j]` by ±h, evaluates `f` at both points and restores
/// the entry before returning, on success and on error alike.
fn central_difference<F>(f: &mut F, probe: &mut Matrix, i: usize, j: usize, h: f64) -> Result<f64>
where
    F: FnMut(&Matrix) -> Result<f64>,
{
    let old = probe.data[i][j];

    probe.data[i][j] = old + h;
    let plus = f(&*probe);
    probe.data[i][j] = old - h;
    let minus = f(&*probe);
    probe.data[i][j] = old;

    Ok((plus? - minus?) / (2.0 * h))
}
