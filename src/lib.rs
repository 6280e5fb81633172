//! bellsplit - Find boxing round bells in fight recordings
//!
//! Locates the round-start and round-end bell inside a long audio recording
//! and reports when each round begins and how long it lasts. A companion
//! tuning path scans candidate frequencies and recommends the one that detects
//! the bell best.
//!
//! ## Pipeline
//!
//! Detection: mono samples → Butterworth band-pass (zero phase) → amplitude
//! envelope → peak picking → peak grouping into events → round matching.
//!
//! Tuning: Welch PSD over the analysis band → candidate frequencies (spectral
//! peaks or a uniform sweep) → detection at each candidate → composite score.
//!
//! ## Module Structure
//!
//! - `core` - DSP, detection stages, detector, recommender and audio loading
//! - `cli` - Command-line interface
//! - `config` - Detection and tuning configuration
//! - `detection` - Result types
//! - `testgen` - Synthetic bell recordings
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bellsplit::{BellDetector, ConfigBuilder};
//! use bellsplit::core::load_mono;
//!
//! let signal = load_mono(Path::new("fight.wav"))?;
//! let config = ConfigBuilder::new().target_frequency(2050.0).build()?;
//! let report = BellDetector::new(config).detect_rounds(&signal)?;
//!
//! for round in report.rounds.rounds() {
//!     println!("Round {}: {:.1}s + {:.1}s", round.number, round.start_secs, round.duration_secs);
//! }
//! ```
//!
//! ## Scoring
//!
//! | Component   | Weight | Meaning                                      |
//! |-------------|--------|----------------------------------------------|
//! | Power       | 40%    | Spectral or peak-amplitude share             |
//! | Events      | 30%    | Detected events, saturating at ten           |
//! | Consistency | 30%    | Regularity of the spacing between events     |

// Core detection functionality
pub mod core;

// Command-line interface
pub mod cli;

// Detection and tuning configuration
pub mod config;

// Detection result types
pub mod detection;

pub mod error;

// Synthetic recordings
pub mod testgen;

pub use config::{BellConfig, CandidateMode, ConfigBuilder, RoundTiming, SpectralConfig};
pub use crate::core::{
    AnalyzerBuilder, BellAnalyzer, BellDetector, DetectionReport, EventDetection, SampleSequence,
    SpectralRecommender,
};
pub use detection::{
    AmplitudeStats, CandidateScore, Event, FrequencyCandidate, PowerBasis, RoundCandidate,
    RoundOutcome, SpectralReport,
};
pub use error::{BellError, Result};
