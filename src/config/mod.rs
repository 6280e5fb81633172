//! Configuration module for bellsplit

mod settings;

pub use settings::{BellConfig, CandidateMode, ConfigBuilder, RoundTiming, SpectralConfig};
