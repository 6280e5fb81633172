// src/core/analysis/envelope.rs
//
// Amplitude envelope and peak picking on a band-limited signal

use crate::core::dsp::stats::{max_value, mean, std_dev};
use crate::detection::AmplitudeStats;

/// Peak picking thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakParams {
    /// Minimum envelope value of a peak
    pub min_height: f64,
    /// Minimum time between accepted peaks
    pub min_distance_secs: f64,
}

impl Default for PeakParams {
    fn default() -> Self {
        Self {
            min_height: 0.03,
            min_distance_secs: 0.1,
        }
    }
}

impl PeakParams {
    /// Minimum peak spacing in samples, never below one.
    pub fn distance_samples(&self, sample_rate: u32) -> usize {
        ((self.min_distance_secs * sample_rate as f64).ceil() as usize).max(1)
    }
}

/// Pointwise magnitude of the filtered signal.
pub fn envelope(filtered: &[f64]) -> Vec<f64> {
    filtered.iter().map(|v| v.abs()).collect()
}

/// Peak timestamps (seconds, ascending) of the envelope.
///
/// A peak is a strict local maximum at or above `min_height`. Scanning left to
/// right, the first qualifying sample is accepted and nothing closer than the
/// minimum distance after it is considered.
pub fn find_peaks(envelope: &[f64], sample_rate: u32, params: &PeakParams) -> Vec<f64> {
    let distance = params.distance_samples(sample_rate);
    if envelope.len() < distance || envelope.len() < 3 {
        return Vec::new();
    }

    let mut peaks = Vec::new();
    let mut last: Option<usize> = None;

    for i in 1..envelope.len() - 1 {
        if let Some(prev) = last {
            if i - prev < distance {
                continue;
            }
        }

        let value = envelope[i];
        if value >= params.min_height && value > envelope[i - 1] && value > envelope[i + 1] {
            peaks.push(i as f64 / sample_rate as f64);
            last = Some(i);
        }
    }

    peaks
}

/// Mean, population standard deviation and maximum of the envelope.
pub fn amplitude_stats(envelope: &[f64]) -> AmplitudeStats {
    AmplitudeStats {
        mean: mean(envelope),
        std: std_dev(envelope),
        max: max_value(envelope),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spikes(len: usize, positions: &[(usize, f64)]) -> Vec<f64> {
        let mut env = vec![0.0; len];
        for &(i, v) in positions {
            env[i] = v;
        }
        env
    }

    #[test]
    fn test_envelope_is_magnitude() {
        assert_eq!(envelope(&[-0.5, 0.25, 0.0]), vec![0.5, 0.25, 0.0]);
    }

    #[test]
    fn test_peaks_respect_height() {
        let env = spikes(1000, &[(100, 0.5), (300, 0.01), (500, 0.2)]);
        let params = PeakParams {
            min_height: 0.03,
            min_distance_secs: 0.01,
        };
        assert_eq!(find_peaks(&env, 1000, &params), vec![0.1, 0.5]);
    }

    #[test]
    fn test_peaks_respect_distance() {
        // 150 is within 100 samples of the accepted peak at 100
        let env = spikes(1000, &[(100, 0.5), (150, 0.9), (250, 0.4)]);
        let params = PeakParams {
            min_height: 0.03,
            min_distance_secs: 0.1,
        };
        assert_eq!(find_peaks(&env, 1000, &params), vec![0.1, 0.25]);
    }

    #[test]
    fn test_short_input_has_no_peaks() {
        let env = spikes(50, &[(10, 1.0)]);
        let params = PeakParams::default();
        assert!(find_peaks(&env, 1000, &params).is_empty());
        assert!(find_peaks(&[], 1000, &params).is_empty());
    }

    #[test]
    fn test_distance_rounds_up() {
        let params = PeakParams {
            min_height: 0.0,
            min_distance_secs: 0.1,
        };
        assert_eq!(params.distance_samples(44100), 4410);
        let tiny = PeakParams {
            min_height: 0.0,
            min_distance_secs: 1e-9,
        };
        assert_eq!(tiny.distance_samples(44100), 1);
    }

    #[test]
    fn test_amplitude_stats() {
        let stats = amplitude_stats(&[1.0, 3.0]);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.std, 1.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(amplitude_stats(&[]), AmplitudeStats::default());
    }
}
