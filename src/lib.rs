//! # NSDF Pitch
//! *nsdf_pitch* estimates the pitch of a monophonic audio stream in real time using the
//! McLeod Pitch Method. Blocks of samples of any length are collected into overlapping
//! windows; each window yields a continuous note number and a clarity score, which are
//! kept in fixed size histories for tuners and pitch visualizers.
//!
//!   * [PitchTracker][tracker::PitchTracker] handles windowing and histories.
//!   * [McLeodDetector][detector::mcleod] analyzes a single window.
//!
//! # Examples
//! ```
//! use nsdf_pitch::config::TrackerConfig;
//! use nsdf_pitch::tracker::PitchTracker;
//!
//! fn main() {
//!     const SAMPLE_RATE: f64 = 44100.0;
//!
//!     let config = TrackerConfig::default()
//!         .sample_rate(SAMPLE_RATE)
//!         .window_size(2048)
//!         .hop_size(512);
//!     let mut tracker = PitchTracker::<f32>::new(config).unwrap();
//!
//!     // Blocks coming from some source (microphone, generated, etc...)
//!     let freq = 330.0;
//!     let signal: Vec<f32> = (0..8192)
//!         .map(|x| (2.0 * std::f64::consts::PI * x as f64 * freq / SAMPLE_RATE).sin() as f32)
//!         .collect();
//!
//!     for block in signal.chunks(256) {
//!         tracker.feed_with(block, |result| {
//!             if let Some(pitch) = result {
//!                 println!("Note: {}, Clarity: {}", pitch.note, pitch.clarity);
//!             }
//!         });
//!     }
//!
//!     let note = *tracker.pitch_history().last().unwrap();
//!     assert!((note - 64.0).abs() < 0.1);
//! }
//! ```

pub use detector::internals::Pitch;
pub use error::ConfigError;

pub mod config;
pub mod detector;
pub mod error;
pub mod float;
pub mod history;
pub mod tracker;
pub mod utils;
