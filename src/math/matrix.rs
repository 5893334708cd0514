use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;
use std::ops::{Add, Sub};

use crate::error::{LossError, Result};

/// Dense row-major matrix of `f64`.
///
/// `data` holds `rows` rows of `cols` values each. The fields are public, so a
/// matrix built by hand can be ragged; [`Matrix::check_well_formed`] catches
/// that before any computation indexes into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Uniform samples in [-1, 1).
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen::<f64>() * 2.0 - 1.0;
            }
        }

        res
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // Both uniforms on (0, 1] so ln() never sees zero.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Gaussian initialization: samples from N(0, std_dev²).
    ///
    /// A linear classifier usually starts from tiny weights
    /// (`std_dev = 1e-4`) so that every class begins roughly equiprobable and
    /// the initial loss sits near ln(C).
    pub fn gaussian<R: Rng + ?Sized>(rows: usize, cols: usize, std_dev: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
    }

    /// Builds a matrix from row vectors, rejecting ragged input.
    /// An empty `data` gives a 0×0 matrix.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = data.first().map_or(0, |row| row.len());
        let res = Matrix {
            rows: data.len(),
            cols,
            data
        };
        res.check_well_formed("data")?;
        Ok(res)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Verifies that `data` really is `rows × cols`.
    pub fn check_well_formed(&self, name: &'static str) -> Result<()> {
        if self.data.len() != self.rows || self.data.iter().any(|row| row.len() != self.cols) {
            return Err(LossError::RaggedMatrix { name });
        }
        Ok(())
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect()
        }
    }

    /// Matrix product `self · rhs`.
    ///
    /// The inner sum runs over `k` in ascending order, the same order an
    /// explicit triple loop would use, so results are bit-for-bit comparable
    /// with hand-written loops.
    pub fn dot(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(LossError::InnerDimension { left: self.cols, right: rhs.rows });
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    /// Position of the first NaN or ±inf entry, row-major.
    pub fn find_non_finite(&self) -> Option<(usize, usize)> {
        self.data.iter().enumerate().find_map(|(i, row)| {
            row.iter().position(|v| !v.is_finite()).map(|j| (i, j))
        })
    }

    /// Σ of every squared entry (the L2 penalty before scaling).
    pub fn sum_squares(&self) -> f64 {
        self.data.iter().flatten().map(|x| x * x).sum()
    }

    /// Largest absolute entry; 0 for an empty matrix.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().flatten().fold(0.0, |acc: f64, x| acc.max(x.abs()))
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = self;

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] += rhs.data[i][j];
            }
        }

        res
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = self;

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] -= rhs.data[i][j];
            }
        }

        res
    }
}
