use thiserror::Error;

/// Errors raised by the loss functions and the gradient checker.
///
/// Most variants are invalid-argument conditions caught before any
/// arithmetic runs. [`LossError::NumericOverflow`] is raised when finite
/// inputs still drive an intermediate value past `f64` range. Either way no
/// partial result is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LossError {
    /// `W` has `w_rows` rows but `X` has `x_cols` columns.
    #[error("invalid input: W has {w_rows} rows but X has {x_cols} columns")]
    ShapeMismatch { w_rows: usize, x_cols: usize },

    /// A matrix whose `data` does not match its declared `rows`/`cols`.
    #[error("invalid input: matrix {name} has rows of inconsistent length")]
    RaggedMatrix { name: &'static str },

    /// Inner dimensions of a matrix product disagree: `left` columns times
    /// `right` rows.
    #[error("invalid input: cannot multiply a matrix with {left} columns by one with {right} rows")]
    InnerDimension { left: usize, right: usize },

    /// NaN or ±inf entry in an input matrix.
    #[error("invalid input: matrix {name} contains a non-finite entry at ({row}, {col})")]
    NonFinite {
        name: &'static str,
        row: usize,
        col: usize,
    },

    #[error("invalid input: W has zero columns, there are no classes")]
    NoClasses,

    #[error("invalid input: minibatch is empty")]
    EmptyBatch,

    #[error("invalid input: {labels} labels given for {samples} samples")]
    LabelCountMismatch { labels: usize, samples: usize },

    /// `y[index] = label` is not a valid class index.
    #[error("invalid input: label {label} at index {index} is outside [0, {classes})")]
    LabelOutOfRange {
        index: usize,
        label: usize,
        classes: usize,
    },

    #[error("invalid input: regularization strength must be finite and non-negative, got {0}")]
    InvalidRegularization(f64),

    /// Analytic gradient handed to the gradient checker has the wrong shape.
    #[error("invalid input: gradient shape {actual:?} does not match weights shape {expected:?}")]
    GradientShape {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// `what` overflowed to a non-finite value despite finite inputs.
    #[error("numeric overflow: {what} is not finite")]
    NumericOverflow { what: &'static str },
}

impl LossError {
    /// True when the arguments themselves were rejected; false when valid
    /// arguments overflowed during the computation.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, LossError::NumericOverflow { .. })
    }
}

pub type Result<T> = std::result::Result<T, LossError>;
