// src/core/detector.rs
//
// Single-frequency bell detection: band-pass, envelope, peaks, events and
// optionally round boundaries.

use serde::Serialize;

use super::analysis::{
    amplitude_stats, envelope, find_peaks, group_peaks, match_rounds, GroupParams, PeakParams,
    RoundMatches,
};
use super::dsp::bandpass;
use super::signal::SampleSequence;
use crate::config::BellConfig;
use crate::detection::{AmplitudeStats, Event};
use crate::error::Result;

/// Events found at one detection frequency
#[derive(Debug, Clone, Serialize)]
pub struct EventDetection {
    pub frequency_hz: f64,
    /// All accepted envelope peaks, seconds
    pub peaks: Vec<f64>,
    pub events: Vec<Event>,
    pub amplitude: AmplitudeStats,
}

impl EventDetection {
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}

/// Events plus round outcomes for one recording
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub sample_rate: u32,
    pub duration_secs: f64,
    pub detection: EventDetection,
    pub rounds: RoundMatches,
}

impl DetectionReport {
    pub fn events(&self) -> &[Event] {
        &self.detection.events
    }
}

/// Runs the detection path with one fixed configuration
#[derive(Debug, Clone)]
pub struct BellDetector {
    config: BellConfig,
}

impl BellDetector {
    pub fn new(config: BellConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BellConfig {
        &self.config
    }

    fn peak_params(&self) -> PeakParams {
        PeakParams {
            min_height: self.config.min_peak_height,
            min_distance_secs: self.config.min_peak_distance_secs,
        }
    }

    fn group_params(&self) -> GroupParams {
        GroupParams {
            max_gap_secs: self.config.max_gap_secs,
            min_peaks: self.config.min_peaks,
        }
    }

    /// Events at the configured target frequency.
    pub fn detect_events(&self, signal: &SampleSequence) -> Result<EventDetection> {
        self.evaluate_at(signal, self.config.target_frequency_hz)
    }

    /// Events at an arbitrary center frequency, same bandwidth and thresholds.
    pub fn evaluate_at(&self, signal: &SampleSequence, frequency_hz: f64) -> Result<EventDetection> {
        let filtered = bandpass(
            signal.samples(),
            signal.sample_rate(),
            frequency_hz,
            self.config.bandwidth_hz,
            self.config.filter_order,
        )?;

        let env = envelope(&filtered);
        let peaks = find_peaks(&env, signal.sample_rate(), &self.peak_params());
        let events = group_peaks(&peaks, &self.group_params());

        log::debug!(
            "{:.1} Hz: {} peaks, {} events",
            frequency_hz,
            peaks.len(),
            events.len()
        );

        Ok(EventDetection {
            frequency_hz,
            peaks,
            events,
            amplitude: amplitude_stats(&env),
        })
    }

    /// Events at the target frequency and the rounds they delimit.
    pub fn detect_rounds(&self, signal: &SampleSequence) -> Result<DetectionReport> {
        let detection = self.detect_events(signal)?;
        let rounds = match_rounds(&detection.events, &self.config.round);

        log::info!(
            "Detected {} events and {} rounds at {:.1} Hz",
            detection.event_count(),
            rounds.round_count(),
            detection.frequency_hz
        );

        Ok(DetectionReport {
            sample_rate: signal.sample_rate(),
            duration_secs: signal.duration_secs(),
            detection,
            rounds,
        })
    }
}

impl Default for BellDetector {
    fn default() -> Self {
        Self::new(BellConfig::default())
    }
}
