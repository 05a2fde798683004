use thiserror::Error;

/// Errors returned when a tracker or detector is built from an invalid configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The analysis window must hold at least one sample.
    #[error("window size must be greater than 0")]
    ZeroWindowSize,

    /// Consecutive windows must advance by at least one sample.
    #[error("hop size must be greater than 0")]
    ZeroHopSize,

    /// Hops larger than the window would skip input samples.
    #[error("hop size {hop} must not be greater than the window size {window}")]
    HopExceedsWindow {
        /// The requested hop size.
        hop: usize,
        /// The requested window size.
        window: usize,
    },

    #[error("sample rate must be a positive number of Hz, got {0}")]
    InvalidSampleRate(f64),

    #[error("history capacity must be greater than 0")]
    ZeroHistoryCapacity,

    /// The key maximum threshold is relative to the global NSDF maximum.
    #[error("key maximum threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("reference pitch must be a positive number of Hz, got {0}")]
    InvalidReferencePitch(f64),

    /// A detector supplied to a tracker analyzes windows of a different size.
    #[error("detector expects windows of {detector} samples, but the window size is {window}")]
    WindowSizeMismatch {
        /// The detector's window size.
        detector: usize,
        /// The configured window size.
        window: usize,
    },
}
