use crate::detector::internals::Pitch;
use crate::float::Float;

pub mod internals;
pub mod mcleod;

pub trait PitchDetector<T>
where
    T: Float,
{
    /// The number of samples `get_pitch` expects per window.
    fn window_size(&self) -> usize;

    /// Estimates the pitch of `signal`, which must hold exactly `window_size()` samples.
    /// Returns `None` when the window has no periodic content to report, for example
    /// silence.
    fn get_pitch(&mut self, signal: &[T], sample_rate: T) -> Option<Pitch<T>>;
}
