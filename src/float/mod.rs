//! Generic [Float] type which acts as a stand-in for `f32` or `f64`.
use rustfft::num_traits::float::FloatCore as NumFloatCore;
use rustfft::FftNum;
use std::fmt::{Debug, Display};

/// Signals are processed as arrays of [Float]s. A [Float] is normally `f32` or `f64`.
pub trait Float: Display + Debug + NumFloatCore + FftNum {
    /// Converts an `f64` constant to this type, rounding if needed.
    fn from_f64_lossy(value: f64) -> Self;

    /// Widens (or copies) this value to `f64`.
    fn to_f64_lossy(self) -> f64;
}

impl Float for f64 {
    fn from_f64_lossy(value: f64) -> Self {
        value
    }

    fn to_f64_lossy(self) -> f64 {
        self
    }
}

impl Float for f32 {
    fn from_f64_lossy(value: f64) -> Self {
        value as f32
    }

    fn to_f64_lossy(self) -> f64 {
        self as f64
    }
}
