//! Digital Signal Processing utilities

pub mod fft;
pub mod filters;
pub mod stats;
pub mod windows;

pub use fft::{welch_psd, PowerSpectrum, WelchEstimator};
pub use filters::{bandpass, BandpassFilter, Biquad};
pub use stats::{local_maxima, max_value, mean, percentile, std_dev};
pub use windows::{create_window, WindowType};
