pub mod softmax;

pub use softmax::{log_softmax_row, softmax_row, softmax_rows};
