// src/core/recommender.rs
//
// Frequency tuning: scan candidate detection frequencies, evaluate each through
// the detection path and rank them.

use rayon::prelude::*;

use super::analysis::{
    consistency_score, max_in_band_power, rank_candidates, select_optimal, spectral_peaks,
    sweep_frequencies,
};
use super::detector::BellDetector;
use super::dsp::{bandpass, WelchEstimator};
use super::signal::SampleSequence;
use crate::config::{BellConfig, CandidateMode};
use crate::detection::{FrequencyCandidate, PowerBasis};
use crate::error::Result;

/// A frequency to evaluate, with its PSD value in peak mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanPoint {
    pub frequency_hz: f64,
    pub spectral_power: Option<f64>,
    /// Largest in-band PSD value, the reference for `spectral_power`
    pub reference_power: Option<f64>,
}

/// Result of a tuning run, candidates ranked best first
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub candidates: Vec<FrequencyCandidate>,
    pub recommended_frequency_hz: f64,
}

/// Scores candidate detection frequencies for one recording
pub struct SpectralRecommender {
    detector: BellDetector,
}

impl SpectralRecommender {
    pub fn new(config: BellConfig) -> Self {
        Self {
            detector: BellDetector::new(config),
        }
    }

    pub fn config(&self) -> &BellConfig {
        self.detector.config()
    }

    /// Frequencies to evaluate, in scan order.
    pub fn scan_points(&self, signal: &SampleSequence) -> Result<Vec<ScanPoint>> {
        let spectral = &self.config().spectral;
        let (low, high) = (spectral.band_low_hz, spectral.band_high_hz);

        match spectral.mode {
            CandidateMode::Sweep { step_hz } => Ok(sweep_frequencies(low, high, step_hz)?
                .into_iter()
                .map(|frequency_hz| ScanPoint {
                    frequency_hz,
                    spectral_power: None,
                    reference_power: None,
                })
                .collect()),
            CandidateMode::SpectralPeaks { count } => {
                // Wide band-pass over the whole analysis band before estimating
                let filtered = bandpass(
                    signal.samples(),
                    signal.sample_rate(),
                    (low + high) / 2.0,
                    (high - low) / 2.0,
                    self.config().filter_order,
                )?;
                let psd = WelchEstimator::new(spectral.max_segment_len, spectral.window)
                    .estimate(&filtered, signal.sample_rate())?;

                let reference = max_in_band_power(&psd, low, high);
                let peaks = spectral_peaks(&psd, low, high, count);
                log::info!(
                    "Found {} significant spectral peaks in {:.0}-{:.0} Hz",
                    peaks.len(),
                    low,
                    high
                );

                Ok(peaks
                    .into_iter()
                    .map(|peak| ScanPoint {
                        frequency_hz: peak.frequency_hz,
                        spectral_power: Some(peak.power),
                        reference_power: Some(reference),
                    })
                    .collect())
            }
        }
    }

    /// Evaluate one frequency. `power_percentage` is only final in peak mode.
    pub fn evaluate(&self, signal: &SampleSequence, point: &ScanPoint) -> Result<FrequencyCandidate> {
        let detection = self.detector.evaluate_at(signal, point.frequency_hz)?;
        let consistency = consistency_score(&detection.events);

        let (power_percentage, power_basis) = match (point.spectral_power, point.reference_power) {
            (Some(power), Some(reference)) if reference > 0.0 => {
                (power / reference, PowerBasis::SpectralDensity)
            }
            (Some(_), _) => (0.0, PowerBasis::SpectralDensity),
            _ => (0.0, PowerBasis::PeakAmplitude),
        };

        let mut candidate = FrequencyCandidate::new(
            point.frequency_hz,
            power_percentage,
            detection.event_count(),
            consistency,
        );
        candidate.spectral_power = point.spectral_power;
        candidate.power_basis = power_basis;
        candidate.amplitude = detection.amplitude;
        candidate.events = detection.events;
        Ok(candidate)
    }

    /// Evaluate every scan point, in scan order. Points with an invalid band
    /// are skipped.
    pub fn evaluate_all(&self, signal: &SampleSequence, points: &[ScanPoint]) -> Result<Vec<FrequencyCandidate>> {
        let results: Vec<Result<FrequencyCandidate>> = if self.config().spectral.parallel {
            points.par_iter().map(|p| self.evaluate(signal, p)).collect()
        } else {
            points.iter().map(|p| self.evaluate(signal, p)).collect()
        };

        let mut candidates = Vec::with_capacity(results.len());
        for (point, result) in points.iter().zip(results) {
            match result {
                Ok(candidate) => candidates.push(candidate),
                Err(e) if e.is_band_error() => {
                    log::warn!("Skipping {:.1} Hz: {}", point.frequency_hz, e);
                }
                Err(e) => return Err(e),
            }
        }

        normalize_peak_amplitude(&mut candidates);
        Ok(candidates)
    }

    /// Scan, evaluate and rank. Fails with `NoSignalDetected` when no
    /// candidate finds an event.
    pub fn recommend(&self, signal: &SampleSequence) -> Result<Recommendation> {
        let points = self.scan_points(signal)?;
        log::info!(
            "Evaluating {} candidate frequencies ({})",
            points.len(),
            self.config().spectral.mode
        );

        let candidates = self.evaluate_all(signal, &points)?;
        let recommended_frequency_hz = select_optimal(&candidates)?.frequency_hz;
        let candidates = rank_candidates(candidates);

        for candidate in &candidates {
            log::debug!(
                "{:.1} Hz: score {:.3}, {} events, power {:.2}, consistency {:.2}",
                candidate.frequency_hz,
                candidate.composite_score(),
                candidate.events_detected,
                candidate.power_percentage,
                candidate.consistency_score
            );
        }
        log::info!("Recommended frequency: {:.1} Hz", recommended_frequency_hz);

        Ok(Recommendation {
            candidates,
            recommended_frequency_hz,
        })
    }
}

/// Envelope maxima relative to the largest one among the candidates.
fn normalize_peak_amplitude(candidates: &mut [FrequencyCandidate]) {
    let reference = candidates
        .iter()
        .filter(|c| c.power_basis == PowerBasis::PeakAmplitude)
        .map(|c| c.amplitude.max)
        .fold(0.0, f64::max);

    for candidate in candidates
        .iter_mut()
        .filter(|c| c.power_basis == PowerBasis::PeakAmplitude)
    {
        candidate.power_percentage = if reference > 0.0 {
            candidate.amplitude.max / reference
        } else {
            0.0
        };
        candidate.rescore();
    }
}

impl From<BellConfig> for SpectralRecommender {
    fn from(config: BellConfig) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::error::BellError;

    #[test]
    fn test_sweep_scan_points() {
        let config = ConfigBuilder::new()
            .analysis_band(1900.0, 2100.0)
            .sweep(50.0)
            .build()
            .unwrap();
        let signal = SampleSequence::new(vec![0.0; 100], 8000).unwrap();

        let points = SpectralRecommender::new(config).scan_points(&signal).unwrap();
        let freqs: Vec<f64> = points.iter().map(|p| p.frequency_hz).collect();
        assert_eq!(freqs, vec![1900.0, 1950.0, 2000.0, 2050.0, 2100.0]);
        assert!(points.iter().all(|p| p.spectral_power.is_none()));
    }

    #[test]
    fn test_peak_amplitude_normalization() {
        let mut candidates = vec![
            FrequencyCandidate::new(1900.0, 0.0, 1, 0.0),
            FrequencyCandidate::new(2000.0, 0.0, 1, 0.0),
        ];
        for (c, max) in candidates.iter_mut().zip([0.2, 0.8]) {
            c.power_basis = PowerBasis::PeakAmplitude;
            c.amplitude.max = max;
        }

        normalize_peak_amplitude(&mut candidates);
        assert!((candidates[0].power_percentage - 0.25).abs() < 1e-12);
        assert!((candidates[1].power_percentage - 1.0).abs() < 1e-12);
        assert!((candidates[1].composite_score() - 0.43).abs() < 1e-12);
    }

    #[test]
    fn test_silence_is_no_signal() {
        let config = ConfigBuilder::new().sweep(250.0).parallel(false).build().unwrap();
        let signal = SampleSequence::new(vec![0.0; 16000], 8000).unwrap();

        let err = SpectralRecommender::new(config).recommend(&signal).unwrap_err();
        assert!(matches!(err, BellError::NoSignalDetected { candidates: 5 }));
    }

    #[test]
    fn test_short_signal_insufficient_for_psd() {
        let signal = SampleSequence::new(vec![0.0; 3], 8000).unwrap();
        let err = SpectralRecommender::new(BellConfig::default())
            .recommend(&signal)
            .unwrap_err();
        assert!(matches!(err, BellError::InsufficientData { .. }));
    }
}
