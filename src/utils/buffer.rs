use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;

use crate::float::Float;

pub fn new_real_buffer<T: Float>(size: usize) -> Vec<T> {
    vec![T::zero(); size]
}

pub fn new_complex_buffer<T: Float>(size: usize) -> Vec<Complex<T>> {
    vec![Complex::zero(); size]
}

/// Copies `input` into the real part of `output` and zero-pads the rest of `output`.
pub fn copy_real_to_complex<T: Float>(input: &[T], output: &mut [Complex<T>]) {
    assert!(input.len() <= output.len());
    input.iter().zip(output.iter_mut()).for_each(|(i, o)| {
        o.re = *i;
        o.im = T::zero();
    });
    output[input.len()..]
        .iter_mut()
        .for_each(|o| *o = Complex::zero())
}

/// Copies the real part of the first `output.len()` values of `input` into `output`.
pub fn copy_complex_to_real<T: Float>(input: &[Complex<T>], output: &mut [T]) {
    assert!(output.len() <= input.len());
    input
        .iter()
        .map(|c| c.re)
        .zip(output.iter_mut())
        .for_each(|(i, o)| *o = i);
}

/// Computes |x|^2 for each complex value x in `arr`. This function
/// modifies `arr` in place and leaves the complex component zero.
pub fn modulus_squared<T: Float>(arr: &mut [Complex<T>]) {
    for s in arr.iter_mut() {
        s.re = s.re * s.re + s.im * s.im;
        s.im = T::zero();
    }
}

/// Multiplies every value of `arr` by `factor`.
pub fn scale<T: Float>(arr: &mut [T], factor: T) {
    arr.iter_mut().for_each(|a| *a = *a * factor);
}
