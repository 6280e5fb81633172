//! FFT processing with windowing: Welch power spectral density

use rustfft::{num_complex::Complex, FftPlanner};

use super::windows::{create_window, WindowType};
use crate::error::{BellError, Result};

/// One-sided power spectral density
#[derive(Debug, Clone, Default)]
pub struct PowerSpectrum {
    /// Bin center frequencies in Hz, ascending from 0
    pub frequencies: Vec<f64>,
    /// Power density per bin (units²/Hz)
    pub power: Vec<f64>,
}

impl PowerSpectrum {
    /// Indices of bins whose frequency lies in `low..=high`.
    pub fn band_indices(&self, low: f64, high: f64) -> Vec<usize> {
        self.frequencies
            .iter()
            .enumerate()
            .filter(|(_, f)| **f >= low && **f <= high)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }
}

/// Welch estimator: averaged periodograms of overlapping windowed segments.
///
/// Segments overlap by half, have their mean removed and are scaled to a
/// density. Only full segments are averaged.
pub struct WelchEstimator {
    planner: FftPlanner<f64>,
    max_segment_len: usize,
    window_type: WindowType,
}

impl WelchEstimator {
    pub fn new(max_segment_len: usize, window_type: WindowType) -> Self {
        Self {
            planner: FftPlanner::new(),
            max_segment_len,
            window_type,
        }
    }

    /// Segment length used for a signal of `len` samples.
    pub fn segment_len(&self, len: usize) -> usize {
        self.max_segment_len.min(len / 2)
    }

    pub fn estimate(&mut self, samples: &[f64], sample_rate: u32) -> Result<PowerSpectrum> {
        let nperseg = self.segment_len(samples.len());
        if nperseg < 2 {
            return Err(BellError::InsufficientData {
                samples: samples.len(),
                required: 4,
            });
        }

        let fs = sample_rate as f64;
        let window = create_window(nperseg, self.window_type);
        let window_power: f64 = window.iter().map(|w| w * w).sum();
        let scale = 1.0 / (fs * window_power);

        let step = nperseg - nperseg / 2;
        let bins = nperseg / 2 + 1;
        let fft = self.planner.plan_fft_forward(nperseg);

        let mut accum = vec![0.0; bins];
        let mut segments = 0usize;
        let mut buffer = vec![Complex::new(0.0, 0.0); nperseg];

        let mut start = 0;
        while start + nperseg <= samples.len() {
            let segment = &samples[start..start + nperseg];
            let seg_mean = segment.iter().sum::<f64>() / nperseg as f64;

            for ((slot, &s), &w) in buffer.iter_mut().zip(segment).zip(&window) {
                *slot = Complex::new((s - seg_mean) * w, 0.0);
            }
            fft.process(&mut buffer);

            for (acc, c) in accum.iter_mut().zip(&buffer[..bins]) {
                *acc += c.norm_sqr();
            }
            segments += 1;
            start += step;
        }

        let last = bins - 1;
        let power = accum
            .iter()
            .enumerate()
            .map(|(k, &p)| {
                let mut density = p * scale / segments as f64;
                // Fold the negative half in, except for DC and an even-length Nyquist bin.
                if k != 0 && !(nperseg % 2 == 0 && k == last) {
                    density *= 2.0;
                }
                density
            })
            .collect();

        let frequencies = (0..bins).map(|k| k as f64 * fs / nperseg as f64).collect();

        Ok(PowerSpectrum { frequencies, power })
    }
}

/// Welch PSD with a fresh planner.
pub fn welch_psd(
    samples: &[f64],
    sample_rate: u32,
    max_segment_len: usize,
    window_type: WindowType,
) -> Result<PowerSpectrum> {
    WelchEstimator::new(max_segment_len, window_type).estimate(samples, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, amplitude: f64, sample_rate: u32, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f64 / sample_rate as f64).sin())
            .collect()
    }

    #[test]
    fn test_peak_at_tone() {
        let samples = sine(2000.0, 1.0, 16000, 16000);
        let psd = welch_psd(&samples, 16000, 2048, WindowType::Hann).unwrap();

        assert_eq!(psd.len(), 1025);
        let (peak_bin, _) = psd
            .power
            .iter()
            .enumerate()
            .fold((0, 0.0), |acc, (i, &p)| if p > acc.1 { (i, p) } else { acc });
        assert!((psd.frequencies[peak_bin] - 2000.0).abs() < 10.0);
    }

    #[test]
    fn test_total_power_matches_variance() {
        // Integrated density recovers the mean square of the signal (A²/2).
        let samples = sine(1000.0, 0.5, 8000, 8000);
        let psd = welch_psd(&samples, 8000, 1024, WindowType::Hann).unwrap();

        let df = psd.frequencies[1] - psd.frequencies[0];
        let total: f64 = psd.power.iter().sum::<f64>() * df;
        assert!((total - 0.125).abs() < 0.01, "total power {}", total);
    }

    #[test]
    fn test_dc_removed() {
        let samples = vec![3.0; 4096];
        let psd = welch_psd(&samples, 8000, 512, WindowType::Hann).unwrap();
        assert!(psd.power.iter().all(|&p| p.abs() < 1e-20));
    }

    #[test]
    fn test_segment_len_capped_by_signal() {
        let estimator = WelchEstimator::new(2048, WindowType::Hann);
        assert_eq!(estimator.segment_len(1000), 500);
        assert_eq!(estimator.segment_len(100_000), 2048);
    }

    #[test]
    fn test_insufficient_data() {
        let err = welch_psd(&[0.1, 0.2, 0.3], 8000, 2048, WindowType::Hann).unwrap_err();
        assert!(matches!(err, BellError::InsufficientData { samples: 3, .. }));
    }

    #[test]
    fn test_band_indices() {
        let psd = PowerSpectrum {
            frequencies: vec![0.0, 500.0, 1000.0, 1500.0, 2000.0],
            power: vec![0.0; 5],
        };
        assert_eq!(psd.band_indices(500.0, 1500.0), vec![1, 2, 3]);
    }
}
