//! The McLeod pitch detection algorithm is based on the algorithm from the paper
//! *[A Smarter Way To Find Pitch](https://www.researchgate.net/publication/230554927_A_smarter_way_to_find_pitch)*.
//! It is efficient and offers an improvement over basic autocorrelation.
//!
//! The algorithm compares a window $S=(s_0,s_1,\ldots,s_{W-1})$ with lagged copies of itself.
//! For each lag $t$ in $[0, W/2)$ it computes the autocorrelation
//! $$ r(t) = \sum_{i=0}^{W-t-1} s_i s_{i+t} $$
//! and the energy of the two overlapping parts
//! $$ m(t) = \sum_{i=0}^{W-t-1} \left(s_i^2 + s_{i+t}^2\right), $$
//! and combines them into the *normalized square difference function*
//! $$ n(t) = \frac{2 r(t)}{m(t)}, $$
//! which lies in $[-1, 1]$ and equals 1 at $t=0$.
//!
//! Every positive lobe of $n$ between two downward zero crossings, skipping the lobe
//! around $t=0$, has a *key maximum*. The first key maximum greater than $k$ times the
//! highest NSDF value (from the first negative value on) is taken as the pitch period.
//! A parabola through the chosen lag and its neighbors refines the period to a
//! fractional lag; its vertex value is reported as the *clarity*.
//!
//! ## Implementation
//! $r$ is computed with an [FFT](https://en.wikipedia.org/wiki/Fast_Fourier_transform) over
//! the window zero-padded to $2W$, and $m$ from a running sum of squares, so a window costs
//! $O(W \log W)$. All buffers are allocated when the detector is created.

use crate::config::{DEFAULT_KEY_MAXIMUM_THRESHOLD, DEFAULT_REFERENCE_PITCH};
use crate::detector::internals::normalized_square_difference;
use crate::detector::internals::pitch_from_nsdf;
use crate::detector::internals::NsdfBuffers;
use crate::detector::internals::Pitch;
use crate::detector::PitchDetector;
use crate::float::Float;
use crate::utils::buffer::new_real_buffer;
use crate::utils::fft::{RustFftTransform, Transform};
use crate::utils::peak::PeakCorrection;

pub struct McLeodDetector<T, X = RustFftTransform<T>>
where
    T: Float,
    X: Transform<T>,
{
    size: usize,
    threshold: T,
    reference_pitch: T,
    peak_correction: PeakCorrection,
    transform: X,
    buffers: NsdfBuffers<T>,
    nsdf: Vec<T>,
}

impl<T> McLeodDetector<T>
where
    T: Float,
{
    /// A detector for windows of `size` samples, using the default key maximum threshold
    /// and a 440 Hz reference pitch.
    pub fn new(size: usize) -> Self {
        McLeodDetector::with_transform(size, RustFftTransform::new(2 * size))
    }
}

impl<T, X> McLeodDetector<T, X>
where
    T: Float,
    X: Transform<T>,
{
    /// A detector computing autocorrelations with `transform`, which must have
    /// `2 * size` points.
    pub fn with_transform(size: usize, transform: X) -> Self {
        assert!(size > 0, "Window size must be greater than 0");
        assert_eq!(
            transform.len(),
            2 * size,
            "The transform must have twice as many points as the window"
        );
        let lag_count = size / 2;

        McLeodDetector {
            size,
            threshold: T::from_f64_lossy(DEFAULT_KEY_MAXIMUM_THRESHOLD),
            reference_pitch: T::from_f64_lossy(DEFAULT_REFERENCE_PITCH),
            peak_correction: PeakCorrection::Quadratic,
            transform,
            buffers: NsdfBuffers::new(size, lag_count, 2 * size),
            nsdf: new_real_buffer(lag_count),
        }
    }

    /// Sets the key maximum threshold `k`, relative to the highest NSDF value.
    pub fn with_threshold(mut self, threshold: T) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the frequency in Hz of note 69.
    pub fn with_reference_pitch(mut self, reference_pitch: T) -> Self {
        self.reference_pitch = reference_pitch;
        self
    }

    /// Sets how the chosen lag is refined. Defaults to [PeakCorrection::Quadratic];
    /// with [PeakCorrection::None] lags are whole samples and the clarity is the raw
    /// NSDF value at the chosen lag.
    pub fn with_peak_correction(mut self, peak_correction: PeakCorrection) -> Self {
        self.peak_correction = peak_correction;
        self
    }

    pub fn threshold(&self) -> T {
        self.threshold
    }

    pub fn reference_pitch(&self) -> T {
        self.reference_pitch
    }

    pub fn peak_correction(&self) -> PeakCorrection {
        self.peak_correction
    }

    /// The NSDF of the most recently analyzed window, one value per lag in `0..size / 2`.
    pub fn nsdf(&self) -> &[T] {
        &self.nsdf
    }
}

impl<T, X> PitchDetector<T> for McLeodDetector<T, X>
where
    T: Float,
    X: Transform<T>,
{
    fn window_size(&self) -> usize {
        self.size
    }

    fn get_pitch(&mut self, signal: &[T], sample_rate: T) -> Option<Pitch<T>> {
        assert_eq!(signal.len(), self.size);

        normalized_square_difference(
            signal,
            &mut self.transform,
            &mut self.buffers,
            &mut self.nsdf,
        );

        // m(0) is twice the window energy; no energy means no pitch.
        match self.buffers.energy.first() {
            Some(&energy) if energy > T::zero() => {}
            _ => return None,
        }

        pitch_from_nsdf(
            &self.nsdf,
            sample_rate,
            self.threshold,
            self.reference_pitch,
            self.peak_correction,
        )
    }
}
