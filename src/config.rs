//! Construction-time settings shared by the tracker and its detector.
use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOW_SIZE: usize = 2048;
pub const DEFAULT_HOP_SIZE: usize = 1024;
pub const DEFAULT_HISTORY_CAPACITY: usize = 400;
pub const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

/// Fraction of the global NSDF maximum a lobe must exceed to be chosen as the pitch period.
pub const DEFAULT_KEY_MAXIMUM_THRESHOLD: f64 = 0.8;

/// Frequency in Hz of note number 69 (A4).
pub const DEFAULT_REFERENCE_PITCH: f64 = 440.0;

/// Settings for a [PitchTracker](crate::tracker::PitchTracker). None of these can be
/// changed after the tracker is built.
///
/// ```rust
/// use nsdf_pitch::config::TrackerConfig;
///
/// let config = TrackerConfig::default()
///     .sample_rate(48000.0)
///     .window_size(1024)
///     .hop_size(256);
/// assert!(config.validate().is_ok());
///
/// let invalid = TrackerConfig::default().window_size(512).hop_size(1024);
/// assert!(invalid.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackerConfig {
    /// Sample rate of the incoming stream in Hz.
    pub sample_rate: f64,
    /// Number of samples in each analysis window, `W`. Powers of two are fastest.
    pub window_size: usize,
    /// Number of samples the window advances between estimates. Must not exceed `window_size`.
    pub hop_size: usize,
    /// Number of estimates kept in each history buffer.
    pub history_capacity: usize,
    /// Key maximum threshold `k`.
    pub threshold: f64,
    /// Frequency of note 69 in Hz.
    pub reference_pitch: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            sample_rate: DEFAULT_SAMPLE_RATE,
            window_size: DEFAULT_WINDOW_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            threshold: DEFAULT_KEY_MAXIMUM_THRESHOLD,
            reference_pitch: DEFAULT_REFERENCE_PITCH,
        }
    }
}

impl TrackerConfig {
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn hop_size(mut self, hop_size: usize) -> Self {
        self.hop_size = hop_size;
        self
    }

    pub fn history_capacity(mut self, history_capacity: usize) -> Self {
        self.history_capacity = history_capacity;
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn reference_pitch(mut self, reference_pitch: f64) -> Self {
        self.reference_pitch = reference_pitch;
        self
    }

    /// Number of candidate lags examined per window, `W / 2`.
    pub fn max_tau(&self) -> usize {
        self.window_size / 2
    }

    /// Checks every setting, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::ZeroWindowSize);
        }
        if self.hop_size == 0 {
            return Err(ConfigError::ZeroHopSize);
        }
        if self.hop_size > self.window_size {
            return Err(ConfigError::HopExceedsWindow {
                hop: self.hop_size,
                window: self.window_size,
            });
        }
        // Written so that NaN is rejected too.
        if !(self.sample_rate > 0.0 && self.sample_rate.is_finite()) {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if !(self.reference_pitch > 0.0 && self.reference_pitch.is_finite()) {
            return Err(ConfigError::InvalidReferencePitch(self.reference_pitch));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = TrackerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.max_tau(), 1024);
    }

    #[test]
    fn hop_equal_to_window_is_allowed() {
        let config = TrackerConfig::default().window_size(256).hop_size(256);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_invalid_settings() {
        let base = TrackerConfig::default();
        assert_eq!(
            base.clone().window_size(0).hop_size(0).validate(),
            Err(ConfigError::ZeroWindowSize)
        );
        assert_eq!(
            base.clone().hop_size(0).validate(),
            Err(ConfigError::ZeroHopSize)
        );
        assert_eq!(
            base.clone().window_size(100).hop_size(101).validate(),
            Err(ConfigError::HopExceedsWindow {
                hop: 101,
                window: 100
            })
        );
        assert_eq!(
            base.clone().sample_rate(0.0).validate(),
            Err(ConfigError::InvalidSampleRate(0.0))
        );
        assert!(matches!(
            base.clone().sample_rate(f64::NAN).validate(),
            Err(ConfigError::InvalidSampleRate(_))
        ));
        assert_eq!(
            base.clone().history_capacity(0).validate(),
            Err(ConfigError::ZeroHistoryCapacity)
        );
        assert_eq!(
            base.clone().threshold(1.5).validate(),
            Err(ConfigError::InvalidThreshold(1.5))
        );
        assert_eq!(
            base.reference_pitch(-440.0).validate(),
            Err(ConfigError::InvalidReferencePitch(-440.0))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_round_trips_through_json() {
        let config = TrackerConfig::default().hop_size(512).threshold(0.9);
        let json = serde_json::to_string(&config).unwrap();
        let restored: TrackerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);

        // Missing fields fall back to their defaults.
        let partial: TrackerConfig = serde_json::from_str(r#"{"window_size": 4096}"#).unwrap();
        assert_eq!(partial.window_size, 4096);
        assert_eq!(partial.hop_size, DEFAULT_HOP_SIZE);
    }
}
