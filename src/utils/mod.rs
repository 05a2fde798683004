pub mod buffer;
pub mod fft;
pub mod peak;
