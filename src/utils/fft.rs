//! Forward/inverse complex transforms used for fast autocorrelation.
//!
//! Any transform works as long as it follows the unnormalized convention of
//! [rustfft]: applying [Transform::forward] then [Transform::inverse] scales the
//! input by `len()`. Callers are responsible for dividing that factor out.
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;
use rustfft::{Fft, FftPlanner};

use crate::float::Float;

pub trait Transform<T>
where
    T: Float,
{
    /// The number of points the transform operates on.
    fn len(&self) -> usize;

    /// In-place forward transform of a buffer of length `len()`.
    fn forward(&mut self, buffer: &mut [Complex<T>]);

    /// In-place inverse transform of a buffer of length `len()`, without normalization.
    fn inverse(&mut self, buffer: &mut [Complex<T>]);
}

/// [Transform] backed by [rustfft]. Both directions are planned once on creation.
pub struct RustFftTransform<T>
where
    T: Float,
{
    len: usize,
    forward: Arc<dyn Fft<T>>,
    inverse: Arc<dyn Fft<T>>,
    scratch: Vec<Complex<T>>,
}

impl<T> RustFftTransform<T>
where
    T: Float,
{
    pub fn new(len: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(len);
        let inverse = planner.plan_fft_inverse(len);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        RustFftTransform {
            len,
            forward,
            inverse,
            scratch: vec![Complex::zero(); scratch_len],
        }
    }
}

impl<T> Transform<T> for RustFftTransform<T>
where
    T: Float,
{
    fn len(&self) -> usize {
        self.len
    }

    fn forward(&mut self, buffer: &mut [Complex<T>]) {
        assert_eq!(buffer.len(), self.len());
        self.forward.process_with_scratch(buffer, &mut self.scratch);
    }

    fn inverse(&mut self, buffer: &mut [Complex<T>]) {
        assert_eq!(buffer.len(), self.len());
        self.inverse.process_with_scratch(buffer, &mut self.scratch);
    }
}

/// Direct O(N^2) evaluation of the discrete Fourier transform, with twiddle
/// factors computed in `f64`. Slow, but exact enough to serve as a reference
/// for checking other transforms.
pub struct NaiveDft<T>
where
    T: Float,
{
    len: usize,
    output: Vec<Complex<T>>,
}

impl<T> NaiveDft<T>
where
    T: Float,
{
    pub fn new(len: usize) -> Self {
        NaiveDft {
            len,
            output: vec![Complex::zero(); len],
        }
    }

    fn process(&mut self, buffer: &mut [Complex<T>], sign: f64) {
        assert_eq!(buffer.len(), self.len);
        let n = self.len as f64;
        for (k, out) in self.output.iter_mut().enumerate() {
            let (mut re, mut im) = (0.0, 0.0);
            for (j, x) in buffer.iter().enumerate() {
                // Reduce k*j modulo len before scaling to keep the angle small.
                let angle = sign * 2.0 * std::f64::consts::PI * ((k * j) % self.len) as f64 / n;
                let (sin, cos) = angle.sin_cos();
                let (x_re, x_im) = (x.re.to_f64_lossy(), x.im.to_f64_lossy());
                re += x_re * cos - x_im * sin;
                im += x_re * sin + x_im * cos;
            }
            *out = Complex::new(T::from_f64_lossy(re), T::from_f64_lossy(im));
        }
        buffer.copy_from_slice(&self.output);
    }
}

impl<T> Transform<T> for NaiveDft<T>
where
    T: Float,
{
    fn len(&self) -> usize {
        self.len
    }

    fn forward(&mut self, buffer: &mut [Complex<T>]) {
        self.process(buffer, -1.0);
    }

    fn inverse(&mut self, buffer: &mut [Complex<T>]) {
        self.process(buffer, 1.0);
    }
}
