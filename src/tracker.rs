//! Streaming pitch tracking over (possibly overlapping) windows.
use crate::config::TrackerConfig;
use crate::detector::internals::Pitch;
use crate::detector::mcleod::McLeodDetector;
use crate::detector::PitchDetector;
use crate::error::ConfigError;
use crate::float::Float;
use crate::history::HistoryBuffer;

/// Collects blocks of samples of any length into windows of `window_size` samples,
/// analyzes each window as soon as it is complete, and then advances by `hop_size`
/// samples. Estimates are appended to a note history and a clarity history.
///
/// Windows without an estimate (silence, no periodicity) are reported to
/// [feed_with](PitchTracker::feed_with) handlers as `None` and are not added to the
/// histories.
///
/// The tracker is meant to be driven from one thread. If blocks arrive on several
/// threads, put the whole tracker behind one `Mutex` and hold the lock for the full
/// `feed` call.
pub struct PitchTracker<T, D = McLeodDetector<T>>
where
    T: Float,
    D: PitchDetector<T>,
{
    config: TrackerConfig,
    sample_rate: T,
    detector: D,
    input: Vec<T>,
    pitch_history: HistoryBuffer<T>,
    clarity_history: HistoryBuffer<T>,
    latest: Option<Pitch<T>>,
    processed_window_count: usize,
}

impl<T> PitchTracker<T>
where
    T: Float,
{
    /// Creates a tracker backed by a [McLeodDetector].
    pub fn new(config: TrackerConfig) -> Result<Self, ConfigError> {
        // Checked before the detector plans its transform.
        config.validate()?;
        let detector = McLeodDetector::new(config.window_size)
            .with_threshold(T::from_f64_lossy(config.threshold))
            .with_reference_pitch(T::from_f64_lossy(config.reference_pitch));
        Ok(PitchTracker::from_parts(config, detector))
    }
}

impl<T, D> PitchTracker<T, D>
where
    T: Float,
    D: PitchDetector<T>,
{
    /// Creates a tracker analyzing windows with `detector`. The threshold and reference
    /// pitch in `config` are not applied to `detector`.
    pub fn with_detector(config: TrackerConfig, detector: D) -> Result<Self, ConfigError> {
        config.validate()?;
        if detector.window_size() != config.window_size {
            return Err(ConfigError::WindowSizeMismatch {
                detector: detector.window_size(),
                window: config.window_size,
            });
        }
        Ok(PitchTracker::from_parts(config, detector))
    }

    /// `config` must already be validated and match `detector`.
    fn from_parts(config: TrackerConfig, detector: D) -> Self {
        log::debug!(
            "pitch tracker: window {} samples, hop {} samples, {} Hz",
            config.window_size,
            config.hop_size,
            config.sample_rate
        );

        PitchTracker {
            sample_rate: T::from_f64_lossy(config.sample_rate),
            detector,
            input: Vec::with_capacity(config.window_size + config.hop_size),
            pitch_history: HistoryBuffer::new(config.history_capacity),
            clarity_history: HistoryBuffer::new(config.history_capacity),
            latest: None,
            processed_window_count: 0,
            config,
        }
    }

    /// Appends `samples` and analyzes every window that becomes complete.
    /// Returns the number of windows analyzed.
    pub fn feed(&mut self, samples: &[T]) -> usize {
        self.feed_with(samples, |_| {})
    }

    /// Like [feed](PitchTracker::feed), but also calls `result_handler` with the result
    /// of every analyzed window, in order. The histories are updated before each call.
    pub fn feed_with<F>(&mut self, samples: &[T], mut result_handler: F) -> usize
    where
        F: FnMut(Option<Pitch<T>>),
    {
        let window_size = self.config.window_size;
        let hop_size = self.config.hop_size;
        self.input.extend_from_slice(samples);

        let mut window_count = 0;
        while self.input.len() >= window_size {
            let result = self
                .detector
                .get_pitch(&self.input[..window_size], self.sample_rate);

            match &result {
                Some(pitch) => {
                    log::trace!(
                        "window {}: {} Hz, note {}, clarity {}",
                        self.processed_window_count,
                        pitch.frequency,
                        pitch.note,
                        pitch.clarity
                    );
                    self.pitch_history.push(pitch.note);
                    self.clarity_history.push(pitch.clarity);
                }
                None => {
                    log::debug!("window {}: no pitch", self.processed_window_count);
                }
            }
            self.latest = result;
            self.processed_window_count += 1;
            window_count += 1;

            self.input.drain(..hop_size);
            result_handler(result);
        }

        window_count
    }

    /// Discards buffered samples, results and histories.
    pub fn reset(&mut self) {
        log::debug!(
            "pitch tracker reset after {} windows",
            self.processed_window_count
        );
        self.input.clear();
        self.pitch_history.clear();
        self.clarity_history.clear();
        self.latest = None;
        self.processed_window_count = 0;
    }

    /// The result of the most recently analyzed window.
    pub fn latest(&self) -> Option<&Pitch<T>> {
        self.latest.as_ref()
    }

    /// Note numbers of recent estimates, oldest first.
    pub fn pitch_history(&self) -> &HistoryBuffer<T> {
        &self.pitch_history
    }

    /// Clarities of recent estimates, oldest first.
    pub fn clarity_history(&self) -> &HistoryBuffer<T> {
        &self.clarity_history
    }

    /// The number of windows analyzed since the tracker was created or reset,
    /// including windows without an estimate.
    pub fn processed_window_count(&self) -> usize {
        self.processed_window_count
    }

    /// The number of buffered samples not yet covered by an analyzed window.
    pub fn pending_samples(&self) -> usize {
        self.input.len()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reports the first sample of each window as its frequency.
    struct FirstSampleDetector {
        size: usize,
    }

    impl PitchDetector<f64> for FirstSampleDetector {
        fn window_size(&self) -> usize {
            self.size
        }

        fn get_pitch(&mut self, signal: &[f64], _sample_rate: f64) -> Option<Pitch<f64>> {
            assert_eq!(signal.len(), self.size);
            if signal[0] < 0.0 {
                return None;
            }
            Some(Pitch {
                frequency: signal[0],
                lag: signal.len() as f64,
                note: signal[0],
                clarity: signal[signal.len() - 1],
            })
        }
    }

    fn tracker(window_size: usize, hop_size: usize) -> PitchTracker<f64, FirstSampleDetector> {
        let config = TrackerConfig::default()
            .window_size(window_size)
            .hop_size(hop_size)
            .history_capacity(8);
        PitchTracker::with_detector(config, FirstSampleDetector { size: window_size }).unwrap()
    }

    fn ramp(len: usize) -> Vec<f64> {
        (0..len).map(|i| i as f64).collect()
    }

    #[test]
    fn windows_advance_by_hop() {
        let mut tracker = tracker(10, 4);
        let mut starts = vec![];
        let count = tracker.feed_with(&ramp(30), |result| {
            starts.push(result.unwrap().frequency);
        });
        // Windows start at 0, 4, ..., 20; the next would need samples up to 33.
        assert_eq!(count, 6);
        assert_eq!(starts, vec![0.0, 4.0, 8.0, 12.0, 16.0, 20.0]);
        assert_eq!(tracker.pending_samples(), 30 - 24);
        assert_eq!(tracker.clarity_history().last(), Some(&29.0));
    }

    #[test]
    fn windows_wait_for_enough_samples() {
        let mut tracker = tracker(8, 8);
        let samples = ramp(20);
        assert_eq!(tracker.feed(&samples[..7]), 0);
        assert_eq!(tracker.pending_samples(), 7);
        assert!(tracker.latest().is_none());
        assert_eq!(tracker.feed(&samples[7..8]), 1);
        assert_eq!(tracker.pending_samples(), 0);
        assert_eq!(tracker.feed(&[]), 0);
        assert_eq!(tracker.feed(&samples[8..20]), 1);
        assert_eq!(tracker.latest().unwrap().frequency, 8.0);
        assert_eq!(tracker.pending_samples(), 4);
    }

    #[test]
    fn chunking_does_not_change_results() {
        let samples = ramp(200);
        let mut whole = tracker(16, 5);
        let mut expected = vec![];
        whole.feed_with(&samples, |result| expected.push(result));

        for chunk_size in [1, 3, 5, 16, 17, 64] {
            let mut chunked = tracker(16, 5);
            let mut results = vec![];
            for chunk in samples.chunks(chunk_size) {
                chunked.feed_with(chunk, |result| results.push(result));
            }
            assert_eq!(results, expected);
            assert_eq!(chunked.pitch_history(), whole.pitch_history());
            assert_eq!(chunked.pending_samples(), whole.pending_samples());
        }
    }

    #[test]
    fn missing_estimates_skip_history() {
        let mut tracker = tracker(4, 2);
        let samples = [1.0, 1.5, -1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut results = vec![];
        let count = tracker.feed_with(&samples, |result| results.push(result.is_some()));
        assert_eq!(count, 3);
        assert_eq!(results, vec![true, false, true]);
        assert_eq!(tracker.processed_window_count(), 3);
        assert_eq!(tracker.pitch_history().to_vec(), vec![1.0, 3.0]);
        assert_eq!(tracker.clarity_history().to_vec(), vec![2.0, 6.0]);
    }

    #[test]
    fn history_is_bounded() {
        let mut tracker = tracker(2, 1);
        tracker.feed(&ramp(100));
        assert_eq!(tracker.processed_window_count(), 99);
        let expected: Vec<f64> = (91..99).map(|i| i as f64).collect();
        assert_eq!(tracker.pitch_history().to_vec(), expected);
    }

    #[test]
    fn reset_clears_state() {
        let mut tracker = tracker(4, 2);
        tracker.feed(&ramp(11));
        tracker.reset();
        assert_eq!(tracker.pending_samples(), 0);
        assert_eq!(tracker.processed_window_count(), 0);
        assert!(tracker.pitch_history().is_empty());
        assert!(tracker.latest().is_none());
        assert_eq!(tracker.feed(&ramp(4)), 1);
        assert_eq!(tracker.latest().unwrap().frequency, 0.0);
    }

    #[test]
    fn rejects_invalid_configuration() {
        let config = TrackerConfig::default().window_size(64).hop_size(65);
        assert_eq!(
            PitchTracker::<f32>::new(config).err(),
            Some(ConfigError::HopExceedsWindow {
                hop: 65,
                window: 64
            })
        );

        let config = TrackerConfig::default().sample_rate(-1.0);
        assert!(matches!(
            PitchTracker::<f64>::new(config),
            Err(ConfigError::InvalidSampleRate(_))
        ));

        let config = TrackerConfig::default().window_size(32).hop_size(8);
        assert_eq!(
            PitchTracker::with_detector(config, FirstSampleDetector { size: 16 }).err(),
            Some(ConfigError::WindowSizeMismatch {
                detector: 16,
                window: 32
            })
        );
    }

    #[test]
    fn invalid_configuration_is_rejected_before_building_the_detector() {
        // A zero-sized McLeod detector panics on construction.
        let config = TrackerConfig::default().window_size(0);
        assert_eq!(
            PitchTracker::<f64>::new(config).err(),
            Some(ConfigError::ZeroWindowSize)
        );
    }

    #[test]
    fn mcleod_tracker_uses_config() {
        let config = TrackerConfig::default()
            .window_size(1024)
            .hop_size(256)
            .threshold(0.9)
            .reference_pitch(432.0);
        let tracker = PitchTracker::<f64>::new(config).unwrap();
        assert_eq!(tracker.detector().window_size(), 1024);
        assert_eq!(tracker.detector().threshold(), 0.9);
        assert_eq!(tracker.detector().reference_pitch(), 432.0);
        assert_eq!(tracker.config().hop_size, 256);
    }
}
