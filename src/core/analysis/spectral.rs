// src/core/analysis/spectral.rs
//
// Candidate frequency generation from the power spectrum, and ranking of
// evaluated candidates by composite score

use crate::core::dsp::stats::{local_maxima, percentile};
use crate::core::dsp::PowerSpectrum;
use crate::detection::{CandidateScore, FrequencyCandidate};
use crate::error::{BellError, Result};

/// PSD percentile a spectral peak must reach to count as significant
pub const SIGNIFICANCE_PERCENTILE: f64 = 95.0;

/// A significant local maximum of the power spectrum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralPeak {
    pub frequency_hz: f64,
    pub power: f64,
}

/// Strongest in-band spectral peaks, by descending power.
///
/// The threshold is the 95th percentile of the whole spectrum. Candidates are
/// strict local maxima inside `low_hz..=high_hz` at or above it; at most
/// `count` are kept, equal powers staying in frequency order.
pub fn spectral_peaks(psd: &PowerSpectrum, low_hz: f64, high_hz: f64, count: usize) -> Vec<SpectralPeak> {
    let threshold = percentile(&psd.power, SIGNIFICANCE_PERCENTILE);

    let mut peaks: Vec<SpectralPeak> = local_maxima(&psd.power)
        .into_iter()
        .filter(|&i| psd.frequencies[i] >= low_hz && psd.frequencies[i] <= high_hz)
        .filter(|&i| psd.power[i] >= threshold)
        .map(|i| SpectralPeak {
            frequency_hz: psd.frequencies[i],
            power: psd.power[i],
        })
        .collect();

    peaks.sort_by(|a, b| b.power.partial_cmp(&a.power).unwrap_or(std::cmp::Ordering::Equal));
    peaks.truncate(count);
    peaks
}

/// Largest PSD value inside the band, 0.0 when the band holds no bin.
pub fn max_in_band_power(psd: &PowerSpectrum, low_hz: f64, high_hz: f64) -> f64 {
    psd.band_indices(low_hz, high_hz)
        .into_iter()
        .map(|i| psd.power[i])
        .fold(0.0, f64::max)
}

/// Every frequency from `low_hz` to `high_hz` inclusive in steps of `step_hz`.
pub fn sweep_frequencies(low_hz: f64, high_hz: f64, step_hz: f64) -> Result<Vec<f64>> {
    if !(step_hz.is_finite() && step_hz > 0.0) {
        return Err(BellError::Config(format!("sweep step must be positive, got {}", step_hz)));
    }
    if high_hz < low_hz {
        return Ok(Vec::new());
    }

    // Tolerance keeps the upper bound when the span is a multiple of the step
    let steps = ((high_hz - low_hz) / step_hz + 1e-9).floor() as usize;
    Ok((0..=steps).map(|k| low_hz + k as f64 * step_hz).collect())
}

/// Weighted composite of power, event count and consistency.
pub fn composite_score(power_percentage: f64, events_detected: usize, consistency: f64) -> f64 {
    CandidateScore::compute(power_percentage, events_detected, consistency).total
}

/// Sort candidates best first. Equal scores keep their scan order.
pub fn rank_candidates(mut candidates: Vec<FrequencyCandidate>) -> Vec<FrequencyCandidate> {
    candidates.sort_by(|a, b| {
        b.composite_score()
            .partial_cmp(&a.composite_score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates
}

/// Highest scoring candidate, the first one on ties.
///
/// Fails with `NoSignalDetected` when no candidate found a single event.
pub fn select_optimal(candidates: &[FrequencyCandidate]) -> Result<&FrequencyCandidate> {
    if candidates.iter().all(|c| c.events_detected == 0) {
        return Err(BellError::NoSignalDetected {
            candidates: candidates.len(),
        });
    }

    let mut best = &candidates[0];
    for candidate in &candidates[1..] {
        if candidate.composite_score() > best.composite_score() {
            best = candidate;
        }
    }
    Ok(best)
}
