//pure indicator transforms, each output aligned 1:1 with its input series
pub mod atr;
pub mod sma;

pub use atr::{atr, average_true_range, true_range};
pub use sma::{mean, sma, trailing_mean};
