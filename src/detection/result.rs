//! Detection result types: events, rounds and scored frequency candidates

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::config::CandidateMode;

/// One bell-ringing occurrence: a chain of peak timestamps in seconds.
///
/// Timestamps are non-decreasing and there is always at least one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent")]
pub struct Event {
    peaks: Vec<f64>,
}

/// Unchecked wire form of an `Event`
#[derive(Deserialize)]
struct RawEvent {
    peaks: Vec<f64>,
}

impl TryFrom<RawEvent> for Event {
    type Error = String;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        Event::new(raw.peaks).ok_or_else(|| "event peaks must be non-empty and non-decreasing".to_string())
    }
}

impl Event {
    /// Build an event, rejecting empty or out-of-order peak lists.
    pub fn new(peaks: Vec<f64>) -> Option<Self> {
        if peaks.is_empty() || peaks.windows(2).any(|w| w[1] < w[0]) {
            return None;
        }
        Some(Self { peaks })
    }

    /// First peak timestamp
    pub fn start(&self) -> f64 {
        self.peaks[0]
    }

    /// Last peak timestamp
    pub fn end(&self) -> f64 {
        self.peaks[self.peaks.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn peaks(&self) -> &[f64] {
        &self.peaks
    }
}

/// A matched pair of adjacent events delimiting one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundCandidate {
    /// 1-based, counting matched rounds only
    pub number: usize,
    /// Index of the opening event
    pub event_index: usize,
    pub start_secs: f64,
    pub duration_secs: f64,
}

impl RoundCandidate {
    pub fn end_secs(&self) -> f64 {
        self.start_secs + self.duration_secs
    }
}

/// Per-event outcome of round matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RoundOutcome {
    /// The event and its successor delimit a round
    Matched(RoundCandidate),
    /// The pair's duration falls outside the accepted range
    NoMatch {
        event_index: usize,
        start_secs: f64,
        duration_secs: f64,
    },
    /// Final event; there is no successor to pair with
    LastEvent { event_index: usize, start_secs: f64 },
}

impl RoundOutcome {
    pub fn event_index(&self) -> usize {
        match self {
            RoundOutcome::Matched(round) => round.event_index,
            RoundOutcome::NoMatch { event_index, .. } => *event_index,
            RoundOutcome::LastEvent { event_index, .. } => *event_index,
        }
    }

    pub fn as_round(&self) -> Option<&RoundCandidate> {
        match self {
            RoundOutcome::Matched(round) => Some(round),
            _ => None,
        }
    }
}

/// Mean, population standard deviation and maximum of an envelope
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeStats {
    pub mean: f64,
    pub std: f64,
    pub max: f64,
}

/// What `power_percentage` of a candidate is relative to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerBasis {
    /// PSD at the candidate over the largest in-band PSD value
    SpectralDensity,
    /// Envelope maximum over the largest envelope maximum among candidates
    PeakAmplitude,
}

impl std::fmt::Display for PowerBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerBasis::SpectralDensity => write!(f, "spectral density"),
            PowerBasis::PeakAmplitude => write!(f, "peak amplitude"),
        }
    }
}

/// Composite score and its weighted parts
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub total: f64,
    pub power: f64,
    pub events: f64,
    pub consistency: f64,
}

pub const POWER_WEIGHT: f64 = 0.4;
pub const EVENT_WEIGHT: f64 = 0.3;
pub const CONSISTENCY_WEIGHT: f64 = 0.3;

/// Event count at which the event component saturates
pub const EVENT_SATURATION: f64 = 10.0;

impl CandidateScore {
    pub fn compute(power_percentage: f64, events_detected: usize, consistency: f64) -> Self {
        let power = POWER_WEIGHT * power_percentage;
        let events = EVENT_WEIGHT * (events_detected as f64 / EVENT_SATURATION).min(1.0);
        let consistency = CONSISTENCY_WEIGHT * consistency;
        Self {
            total: power + events + consistency,
            power,
            events,
            consistency,
        }
    }
}

/// A scanned detection frequency with its evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyCandidate {
    pub frequency_hz: f64,
    /// PSD value at the candidate (peak mode only)
    pub spectral_power: Option<f64>,
    pub power_percentage: f64,
    pub power_basis: PowerBasis,
    pub events_detected: usize,
    pub amplitude: AmplitudeStats,
    pub consistency_score: f64,
    pub score: CandidateScore,
    /// Detected events with their peak timestamps
    #[serde(default)]
    pub events: Vec<Event>,
}

impl FrequencyCandidate {
    /// Candidate without per-event detail, scored from its inputs.
    pub fn new(
        frequency_hz: f64,
        power_percentage: f64,
        events_detected: usize,
        consistency_score: f64,
    ) -> Self {
        Self {
            frequency_hz,
            spectral_power: None,
            power_percentage,
            power_basis: PowerBasis::SpectralDensity,
            events_detected,
            amplitude: AmplitudeStats::default(),
            consistency_score,
            score: CandidateScore::compute(power_percentage, events_detected, consistency_score),
            events: Vec::new(),
        }
    }

    /// Recompute the composite score after the power fraction changed.
    pub fn rescore(&mut self) {
        self.score = CandidateScore::compute(
            self.power_percentage,
            self.events_detected,
            self.consistency_score,
        );
    }

    pub fn composite_score(&self) -> f64 {
        self.score.total
    }
}

/// Outcome of a frequency tuning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectralReport {
    pub source: String,
    pub sample_rate: u32,
    pub band_low_hz: f64,
    pub band_high_hz: f64,
    pub analyzed_at: DateTime<Local>,
    pub mode: CandidateMode,
    /// Ranked, best first
    pub candidates: Vec<FrequencyCandidate>,
    pub recommended_frequency_hz: f64,
}

impl SpectralReport {
    pub fn recommended(&self) -> Option<&FrequencyCandidate> {
        self.candidates.first()
    }
}
