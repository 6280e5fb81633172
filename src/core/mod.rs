//! Core detection and tuning modules

pub mod analysis;
pub mod analyzer;
pub mod decoder;
pub mod detector;
pub mod dsp;
pub mod recommender;
pub mod signal;

pub use analyzer::{AnalyzerBuilder, BellAnalyzer};
pub use decoder::{decode_audio, extract_mono, load_mono, AudioData};
pub use detector::{BellDetector, DetectionReport, EventDetection};
pub use recommender::{Recommendation, ScanPoint, SpectralRecommender};
pub use signal::SampleSequence;
