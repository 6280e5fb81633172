// src/config/settings.rs
//
// Detection and tuning configuration. One immutable value is threaded through
// every pipeline stage; nothing reads ambient defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::dsp::WindowType;
use crate::error::{BellError, Result};

/// Round boundary timing.
///
/// `lead_in_secs` and `trailing_pad_secs` are empirically tuned offsets: the
/// round starts slightly before the first bell strike and ends slightly after
/// the closing bell begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundTiming {
    /// Expected round length in seconds
    pub expected_secs: f64,
    /// Accepted deviation from `expected_secs`, inclusive on both sides
    pub tolerance_secs: f64,
    /// Seconds subtracted from the opening event start
    pub lead_in_secs: f64,
    /// Seconds added after the closing event start
    pub trailing_pad_secs: f64,
}

impl Default for RoundTiming {
    fn default() -> Self {
        Self {
            expected_secs: 120.0,
            tolerance_secs: 2.0,
            lead_in_secs: 0.5,
            trailing_pad_secs: 1.0,
        }
    }
}

impl RoundTiming {
    /// Inclusive range of durations accepted as a round.
    pub fn accepted_range(&self) -> (f64, f64) {
        (
            self.expected_secs - self.tolerance_secs,
            self.expected_secs + self.tolerance_secs,
        )
    }
}

/// How the spectral recommender picks the frequencies it evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CandidateMode {
    /// Strongest local maxima of the in-band power spectral density
    SpectralPeaks { count: usize },
    /// Every frequency of the band at a fixed step
    Sweep { step_hz: f64 },
}

impl Default for CandidateMode {
    fn default() -> Self {
        Self::SpectralPeaks { count: 5 }
    }
}

impl std::fmt::Display for CandidateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateMode::SpectralPeaks { count } => write!(f, "top {} spectral peaks", count),
            CandidateMode::Sweep { step_hz } => write!(f, "sweep every {} Hz", step_hz),
        }
    }
}

/// Spectral recommender settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralConfig {
    pub band_low_hz: f64,
    pub band_high_hz: f64,
    pub mode: CandidateMode,
    /// Upper bound on the Welch segment length
    pub max_segment_len: usize,
    pub window: WindowType,
    /// Evaluate candidates on the rayon pool
    pub parallel: bool,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            band_low_hz: 1500.0,
            band_high_hz: 2500.0,
            mode: CandidateMode::default(),
            max_segment_len: 2048,
            window: WindowType::Hann,
            parallel: true,
        }
    }
}

/// Complete bell detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BellConfig {
    /// Center of the detection band
    pub target_frequency_hz: f64,
    /// Half-width of the detection band
    pub bandwidth_hz: f64,
    /// Butterworth prototype order
    pub filter_order: usize,
    /// Minimum envelope value for a peak (depends on recording level)
    pub min_peak_height: f64,
    /// Minimum spacing between accepted peaks
    pub min_peak_distance_secs: f64,
    /// Maximum gap between consecutive peaks of one event
    pub max_gap_secs: f64,
    /// Minimum peaks for a group to count as an event
    pub min_peaks: usize,
    pub round: RoundTiming,
    pub spectral: SpectralConfig,
}

impl Default for BellConfig {
    fn default() -> Self {
        Self {
            target_frequency_hz: 2050.0,
            bandwidth_hz: 50.0,
            filter_order: 4,
            min_peak_height: 0.03,
            min_peak_distance_secs: 0.1,
            max_gap_secs: 0.6,
            min_peaks: 4,
            round: RoundTiming::default(),
            spectral: SpectralConfig::default(),
        }
    }
}

impl BellConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject values no pipeline stage can work with.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(BellError::Config(format!("{} must be positive, got {}", name, value)))
            }
        }

        positive("target_frequency_hz", self.target_frequency_hz)?;
        positive("bandwidth_hz", self.bandwidth_hz)?;
        positive("min_peak_distance_secs", self.min_peak_distance_secs)?;
        positive("max_gap_secs", self.max_gap_secs)?;
        positive("round.expected_secs", self.round.expected_secs)?;

        if self.filter_order == 0 {
            return Err(BellError::Config("filter_order must be at least 1".to_string()));
        }
        if self.min_peaks == 0 {
            return Err(BellError::Config("min_peaks must be at least 1".to_string()));
        }
        if self.min_peak_height.is_nan() || self.min_peak_height < 0.0 {
            return Err(BellError::Config(format!(
                "min_peak_height must be non-negative, got {}",
                self.min_peak_height
            )));
        }
        let round = &self.round;
        if [round.tolerance_secs, round.lead_in_secs, round.trailing_pad_secs]
            .iter()
            .any(|v| v.is_nan() || *v < 0.0)
        {
            return Err(BellError::Config(
                "round tolerance and pads must be non-negative".to_string(),
            ));
        }

        let spectral = &self.spectral;
        positive("spectral.band_low_hz", spectral.band_low_hz)?;
        if spectral.band_high_hz.is_nan() || spectral.band_high_hz <= spectral.band_low_hz {
            return Err(BellError::Config(format!(
                "analysis band is empty: {}..{} Hz",
                spectral.band_low_hz, spectral.band_high_hz
            )));
        }
        if spectral.max_segment_len < 2 {
            return Err(BellError::Config("spectral.max_segment_len must be at least 2".to_string()));
        }
        match spectral.mode {
            CandidateMode::SpectralPeaks { count } if count == 0 => {
                return Err(BellError::Config("spectral peak count must be at least 1".to_string()));
            }
            CandidateMode::Sweep { step_hz } => positive("spectral.mode.step_hz", step_hz)?,
            _ => {}
        }

        Ok(())
    }
}

/// Builder for custom configurations
pub struct ConfigBuilder {
    config: BellConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: BellConfig::default(),
        }
    }

    /// Start from an existing configuration, e.g. one loaded from disk.
    pub fn from_config(config: BellConfig) -> Self {
        Self { config }
    }

    pub fn target_frequency(mut self, hz: f64) -> Self {
        self.config.target_frequency_hz = hz;
        self
    }

    pub fn bandwidth(mut self, hz: f64) -> Self {
        self.config.bandwidth_hz = hz;
        self
    }

    pub fn filter_order(mut self, order: usize) -> Self {
        self.config.filter_order = order;
        self
    }

    pub fn min_peak_height(mut self, height: f64) -> Self {
        self.config.min_peak_height = height;
        self
    }

    pub fn min_peak_distance(mut self, secs: f64) -> Self {
        self.config.min_peak_distance_secs = secs;
        self
    }

    pub fn max_gap(mut self, secs: f64) -> Self {
        self.config.max_gap_secs = secs;
        self
    }

    pub fn min_peaks(mut self, count: usize) -> Self {
        self.config.min_peaks = count;
        self
    }

    pub fn round_time(mut self, secs: f64) -> Self {
        self.config.round.expected_secs = secs;
        self
    }

    pub fn round_tolerance(mut self, secs: f64) -> Self {
        self.config.round.tolerance_secs = secs;
        self
    }

    pub fn lead_in(mut self, secs: f64) -> Self {
        self.config.round.lead_in_secs = secs;
        self
    }

    pub fn trailing_pad(mut self, secs: f64) -> Self {
        self.config.round.trailing_pad_secs = secs;
        self
    }

    pub fn analysis_band(mut self, low_hz: f64, high_hz: f64) -> Self {
        self.config.spectral.band_low_hz = low_hz;
        self.config.spectral.band_high_hz = high_hz;
        self
    }

    pub fn spectral_peaks(mut self, count: usize) -> Self {
        self.config.spectral.mode = CandidateMode::SpectralPeaks { count };
        self
    }

    pub fn sweep(mut self, step_hz: f64) -> Self {
        self.config.spectral.mode = CandidateMode::Sweep { step_hz };
        self
    }

    pub fn max_segment_len(mut self, len: usize) -> Self {
        self.config.spectral.max_segment_len = len;
        self
    }

    pub fn window(mut self, window: WindowType) -> Self {
        self.config.spectral.window = window;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.spectral.parallel = parallel;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<BellConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BellConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.round.accepted_range(), (118.0, 122.0));
        assert_eq!(config.spectral.mode, CandidateMode::SpectralPeaks { count: 5 });
    }

    #[test]
    fn test_builder() {
        let config = ConfigBuilder::new()
            .target_frequency(1900.0)
            .min_peak_height(0.04)
            .sweep(25.0)
            .parallel(false)
            .build()
            .unwrap();

        assert_eq!(config.target_frequency_hz, 1900.0);
        assert_eq!(config.min_peak_height, 0.04);
        assert_eq!(config.spectral.mode, CandidateMode::Sweep { step_hz: 25.0 });
        assert!(!config.spectral.parallel);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ConfigBuilder::new().min_peaks(0).build().is_err());
        assert!(ConfigBuilder::new().sweep(0.0).build().is_err());
        assert!(ConfigBuilder::new().analysis_band(2500.0, 1500.0).build().is_err());
        assert!(ConfigBuilder::new().bandwidth(-1.0).build().is_err());
        assert!(ConfigBuilder::new().spectral_peaks(0).build().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: BellConfig =
            serde_json::from_str(r#"{"target_frequency_hz": 1800.0, "round": {"expected_secs": 180.0}}"#)
                .unwrap();
        assert_eq!(config.target_frequency_hz, 1800.0);
        assert_eq!(config.round.expected_secs, 180.0);
        assert_eq!(config.round.tolerance_secs, 2.0);
        assert_eq!(config.min_peaks, 4);
    }

    #[test]
    fn test_sweep_mode_json() {
        let config: BellConfig =
            serde_json::from_str(r#"{"spectral": {"mode": {"kind": "sweep", "step_hz": 10.0}}}"#)
                .unwrap();
        assert_eq!(config.spectral.mode, CandidateMode::Sweep { step_hz: 10.0 });
    }

    #[test]
    fn test_json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bell.json");
        let config = ConfigBuilder::new().target_frequency(1950.0).lead_in(0.25).build().unwrap();

        config.to_json_file(&path).unwrap();
        assert_eq!(BellConfig::from_json_file(&path).unwrap(), config);

        std::fs::write(&path, r#"{"min_peaks": 0}"#).unwrap();
        assert!(matches!(BellConfig::from_json_file(&path), Err(BellError::Config(_))));
    }
}
