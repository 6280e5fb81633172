// src/core/analyzer.rs
//
// High-level file API with builder pattern.

use anyhow::Result;
use chrono::Local;
use std::path::{Path, PathBuf};

use super::decoder::load_mono;
use super::detector::{BellDetector, DetectionReport};
use super::recommender::SpectralRecommender;
use super::signal::SampleSequence;
use crate::config::{BellConfig, ConfigBuilder};
use crate::detection::SpectralReport;

/// Builder for BellAnalyzer configuration
pub struct AnalyzerBuilder {
    config: ConfigBuilder,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            config: ConfigBuilder::new(),
        }
    }

    pub fn config(mut self, config: BellConfig) -> Self {
        self.config = ConfigBuilder::from_config(config);
        self
    }

    pub fn target_frequency(mut self, hz: f64) -> Self {
        self.config = self.config.target_frequency(hz);
        self
    }

    pub fn min_peak_height(mut self, height: f64) -> Self {
        self.config = self.config.min_peak_height(height);
        self
    }

    pub fn round_time(mut self, secs: f64) -> Self {
        self.config = self.config.round_time(secs);
        self
    }

    pub fn build<P: AsRef<Path>>(self, path: P) -> Result<BellAnalyzer> {
        let config = self.config.build()?;
        let signal = load_mono(path.as_ref())?;
        Ok(BellAnalyzer {
            path: path.as_ref().to_path_buf(),
            signal,
            config,
        })
    }
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A loaded recording plus the configuration to analyze it with
pub struct BellAnalyzer {
    path: PathBuf,
    signal: SampleSequence,
    config: BellConfig,
}

impl BellAnalyzer {
    /// Load with the default configuration
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        AnalyzerBuilder::new().build(path)
    }

    pub fn with_config<P: AsRef<Path>>(path: P, config: BellConfig) -> Result<Self> {
        AnalyzerBuilder::new().config(config).build(path)
    }

    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Events and rounds at the configured target frequency
    pub fn detect(&self) -> Result<DetectionReport> {
        Ok(BellDetector::new(self.config.clone()).detect_rounds(&self.signal)?)
    }

    /// Rank candidate frequencies and recommend one
    pub fn recommend(&self) -> Result<SpectralReport> {
        let recommender = SpectralRecommender::new(self.config.clone());
        let recommendation = recommender.recommend(&self.signal)?;

        Ok(SpectralReport {
            source: self.file_name(),
            sample_rate: self.signal.sample_rate(),
            band_low_hz: self.config.spectral.band_low_hz,
            band_high_hz: self.config.spectral.band_high_hz,
            analyzed_at: Local::now(),
            mode: self.config.spectral.mode,
            candidates: recommendation.candidates,
            recommended_frequency_hz: recommendation.recommended_frequency_hz,
        })
    }

    pub fn signal(&self) -> &SampleSequence {
        &self.signal
    }

    pub fn config(&self) -> &BellConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
