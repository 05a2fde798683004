use rustfft::num_complex::Complex;

use crate::float::Float;
use crate::utils::buffer::{copy_complex_to_real, copy_real_to_complex, scale};
use crate::utils::buffer::{new_complex_buffer, new_real_buffer};
use crate::utils::buffer::modulus_squared;
use crate::utils::fft::Transform;
use crate::utils::peak::{choose_key_maximum, correct_peak, PeakCorrection};

/// A pitch estimate for one analysis window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pitch<T>
where
    T: Float,
{
    /// Fundamental frequency in Hz.
    pub frequency: T,
    /// The refined pitch period in samples, `sample_rate / frequency`.
    pub lag: T,
    /// Continuous note number, where 69 is the reference pitch (A4).
    pub note: T,
    /// The interpolated NSDF value at the chosen lag. Close to 1 for clean periodic
    /// input; not clamped.
    pub clarity: T,
}

/// Converts a frequency to a continuous note number, where `reference` Hz maps to 69.
pub fn frequency_to_note<T: Float>(frequency: T, reference: T) -> T {
    let ratio = frequency.to_f64_lossy() / reference.to_f64_lossy();
    T::from_f64_lossy(12.0 * ratio.log2() + 69.0)
}

/// Inverse of [frequency_to_note].
pub fn note_to_frequency<T: Float>(note: T, reference: T) -> T {
    let semitones = note.to_f64_lossy() - 69.0;
    T::from_f64_lossy(reference.to_f64_lossy() * (semitones / 12.0).exp2())
}

/// Fills `cumulative` (of length `signal.len() + 1`) with the running sum of squares,
/// `cumulative[i] = signal[0]^2 + ... + signal[i - 1]^2`.
pub fn cumulative_squares<T: Float>(signal: &[T], cumulative: &mut [T]) {
    assert_eq!(cumulative.len(), signal.len() + 1);
    cumulative[0] = T::zero();
    for (i, &s) in signal.iter().enumerate() {
        cumulative[i + 1] = cumulative[i] + s * s;
    }
}

/// Computes _m(t)_, the energy of the two parts of `signal` that are compared at lag _t_,
/// for every lag in `0..result.len()`:
///
/// > m(t) = sum_{i=0}^{w-t-1} (x_i^2 + x_{i+t}^2)
///
/// `cumulative` is scratch space of length `signal.len() + 1`.
pub fn difference_energy<T: Float>(signal: &[T], cumulative: &mut [T], result: &mut [T]) {
    let w = signal.len();
    assert!(result.len() <= w);

    cumulative_squares(signal, cumulative);
    let total = cumulative[w];
    result
        .iter_mut()
        .enumerate()
        .for_each(|(tau, m)| *m = cumulative[w - tau] + total - cumulative[tau]);
}

/// Compute the autocorrelation of `signal` to `result`:
///
/// > r(t) = sum_{i=0}^{w-t-1} x_i x_{i+t}
///
/// `signal_complex` must have the length of `transform`, which must be at least
/// `signal.len() + result.len() - 1` so the zero padding prevents circular wrap-around.
pub fn autocorrelation<T, X>(
    signal: &[T],
    transform: &mut X,
    signal_complex: &mut [Complex<T>],
    result: &mut [T],
) where
    T: Float,
    X: Transform<T>,
{
    assert_eq!(signal_complex.len(), transform.len());
    assert!(signal.len() + result.len() <= transform.len() + 1);

    copy_real_to_complex(signal, signal_complex);
    transform.forward(signal_complex);
    modulus_squared(signal_complex);
    transform.inverse(signal_complex);
    copy_complex_to_real(signal_complex, result);

    // forward -> inverse scales by the transform length.
    let normalization = T::one() / T::from_usize(transform.len()).unwrap_or_else(T::one);
    scale(result, normalization);
}

/// Scratch buffers for computing the NSDF of windows of a fixed size.
pub struct NsdfBuffers<T>
where
    T: Float,
{
    pub signal_complex: Vec<Complex<T>>,
    pub cumulative: Vec<T>,
    pub energy: Vec<T>,
    pub autocorrelation: Vec<T>,
}

impl<T> NsdfBuffers<T>
where
    T: Float,
{
    /// Buffers for a window of `size` samples, `lag_count` lags and a transform of `fft_size` points.
    pub fn new(size: usize, lag_count: usize, fft_size: usize) -> Self {
        NsdfBuffers {
            signal_complex: new_complex_buffer(fft_size),
            cumulative: new_real_buffer(size + 1),
            energy: new_real_buffer(lag_count),
            autocorrelation: new_real_buffer(lag_count),
        }
    }
}

/// Computes the normalized square difference function
///
/// > nsdf(t) = 2 r(t) / m(t)
///
/// of `signal` for every lag in `0..result.len()`. Lags where `m(t)` is zero (silence)
/// come out as NaN.
pub fn normalized_square_difference<T, X>(
    signal: &[T],
    transform: &mut X,
    buffers: &mut NsdfBuffers<T>,
    result: &mut [T],
) where
    T: Float,
    X: Transform<T>,
{
    let two = T::from_f64_lossy(2.0);

    autocorrelation(
        signal,
        transform,
        &mut buffers.signal_complex,
        &mut buffers.autocorrelation,
    );
    difference_energy(signal, &mut buffers.cumulative, &mut buffers.energy);
    result
        .iter_mut()
        .zip(buffers.autocorrelation.iter().zip(buffers.energy.iter()))
        .for_each(|(n, (&r, &m))| *n = two * r / m)
}

/// Picks the pitch period from `nsdf` and converts it to a [Pitch]. Returns `None` when
/// no periodic candidate exists or the estimate is not a finite number.
pub fn pitch_from_nsdf<T>(
    nsdf: &[T],
    sample_rate: T,
    threshold: T,
    reference_pitch: T,
    correction: PeakCorrection,
) -> Option<Pitch<T>>
where
    T: Float,
{
    let peak = choose_key_maximum(nsdf, threshold)?;
    let (lag, clarity) = correct_peak(peak, nsdf, correction);
    if !(lag > T::zero()) {
        return None;
    }

    let frequency = sample_rate / lag;
    if !frequency.is_finite() || !clarity.is_finite() {
        return None;
    }

    Some(Pitch {
        frequency,
        lag,
        note: frequency_to_note(frequency, reference_pitch),
        clarity,
    })
}
