// tests/test_utils/mod.rs
//
// Shared helpers for the integration tests. Every recording is synthetic, so
// the tests need no audio fixtures on disk.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use bellsplit::testgen::SyntheticRecording;
use bellsplit::{BellConfig, ConfigBuilder, SampleSequence};

/// Strike frequency used by most tests, the default detection frequency
pub const BELL_HZ: f64 = 2050.0;

pub fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_bellsplit"))
}

pub fn bellsplit() -> Command {
    Command::new(binary_path())
}

/// Strikes of one frequency rendered into a recording of `duration_secs`.
pub fn bell_recording(sample_rate: u32, duration_secs: f64, frequency_hz: f64, times: &[f64]) -> SampleSequence {
    SyntheticRecording::new(sample_rate, duration_secs)
        .strikes(frequency_hz, times)
        .render()
        .expect("Failed to render synthetic recording")
}

pub fn silence(sample_rate: u32, duration_secs: f64) -> SampleSequence {
    let len = (sample_rate as f64 * duration_secs) as usize;
    SampleSequence::new(vec![0.0; len], sample_rate).expect("Failed to build silent recording")
}

/// Write a recording into `dir` and return its path.
pub fn write_recording(dir: &Path, name: &str, recording: &SyntheticRecording) -> PathBuf {
    let path = dir.join(name);
    recording
        .write_wav(&path)
        .expect("Failed to write synthetic recording");
    path
}

pub fn sweep_config(low: f64, high: f64, step: f64) -> BellConfig {
    ConfigBuilder::new()
        .analysis_band(low, high)
        .sweep(step)
        .build()
        .expect("Invalid sweep configuration")
}

pub fn peak_config(count: usize) -> BellConfig {
    ConfigBuilder::new()
        .spectral_peaks(count)
        .build()
        .expect("Invalid peak configuration")
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64, what: &str) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "{}: expected {} ± {}, got {}",
        what,
        expected,
        tolerance,
        actual
    );
}
