//! Butterworth band-pass design and zero-phase filtering
//!
//! The filter is designed from the analog Butterworth prototype, moved to the
//! pass band with the lowpass-to-bandpass transform on pre-warped cutoffs and
//! discretized with the bilinear transform. It is kept as a cascade of
//! second-order sections: narrow bands at audio rates put the poles very close
//! to the unit circle, where a single high-order polynomial loses precision.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::error::{BellError, Result};

/// Poles closer than this to the real axis are treated as real.
const REAL_POLE_EPS: f64 = 1e-12;

/// One second-order section, `a[0]` normalized to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    pub b: [f64; 3],
    pub a: [f64; 3],
}

impl Biquad {
    /// Initial state of the transposed direct form for a unit step input.
    fn step_state(&self) -> [f64; 2] {
        let [b0, b1, b2] = self.b;
        let [_, a1, a2] = self.a;
        let rhs0 = b1 - a1 * b0;
        let rhs1 = b2 - a2 * b0;
        let z0 = (rhs0 + rhs1) / (1.0 + a1 + a2);
        [z0, rhs1 - a2 * z0]
    }

    fn dc_gain(&self) -> f64 {
        self.b.iter().sum::<f64>() / self.a.iter().sum::<f64>()
    }
}

/// Cascaded Butterworth band-pass filter
#[derive(Debug, Clone)]
pub struct BandpassFilter {
    sections: Vec<Biquad>,
}

impl BandpassFilter {
    /// Design a band-pass filter from normalized cutoffs (1.0 = Nyquist).
    ///
    /// `order` is the order of the lowpass prototype; the band-pass result has
    /// twice as many poles, realized as `order` sections.
    pub fn butterworth(order: usize, low: f64, high: f64) -> Result<Self> {
        if order == 0 {
            return Err(BellError::Config("filter order must be at least 1".to_string()));
        }
        if !(low > 0.0 && high < 1.0 && low < high) {
            return Err(BellError::Config(format!(
                "normalized cutoffs must satisfy 0 < low < high < 1, got {}..{}",
                low, high
            )));
        }

        // Bilinear transform at fs = 2, so normalized frequencies map directly.
        let fs = 2.0;
        let fs2 = 2.0 * fs;
        let warp = |w: f64| 2.0 * fs * (PI * w / fs).tan();
        let wl = warp(low);
        let wh = warp(high);
        let bw = wh - wl;
        let wo2 = wl * wh;

        let n = order as f64;
        let prototype: Vec<Complex64> = (0..order)
            .map(|k| {
                let m = -n + 1.0 + 2.0 * k as f64;
                -Complex64::from_polar(1.0, PI * m / (2.0 * n))
            })
            .collect();

        let mut analog_poles = Vec::with_capacity(2 * order);
        for p in &prototype {
            let p_lp = p * (bw / 2.0);
            let root = (p_lp * p_lp - wo2).sqrt();
            analog_poles.push(p_lp + root);
            analog_poles.push(p_lp - root);
        }

        // Zeros: `order` at the origin, mapped to z = 1, plus `order` at
        // infinity, mapped to z = -1.
        let mut gain = Complex64::new((bw * fs2).powi(order as i32), 0.0);
        for p in &analog_poles {
            gain /= fs2 - p;
        }
        let gain = gain.re;

        let digital_poles: Vec<Complex64> = analog_poles
            .iter()
            .map(|p| (fs2 + p) / (fs2 - p))
            .collect();

        let mut sections = Vec::with_capacity(order);
        let mut real_poles = Vec::new();
        for p in &digital_poles {
            if p.im > REAL_POLE_EPS {
                sections.push(Biquad {
                    b: [1.0, 0.0, -1.0],
                    a: [1.0, -2.0 * p.re, p.norm_sqr()],
                });
            } else if p.im.abs() <= REAL_POLE_EPS {
                real_poles.push(p.re);
            }
        }
        for pair in real_poles.chunks(2) {
            let (r1, r2) = (pair[0], pair.get(1).copied().unwrap_or(0.0));
            sections.push(Biquad {
                b: [1.0, 0.0, -1.0],
                a: [1.0, -(r1 + r2), r1 * r2],
            });
        }

        if let Some(first) = sections.first_mut() {
            for coeff in first.b.iter_mut() {
                *coeff *= gain;
            }
        }

        Ok(Self { sections })
    }

    /// Design directly from a center frequency and half-bandwidth in Hz.
    pub fn around(order: usize, center_hz: f64, bandwidth_hz: f64, sample_rate: u32) -> Result<Self> {
        let nyquist = sample_rate as f64 / 2.0;
        let low = (center_hz - bandwidth_hz) / nyquist;
        let high = (center_hz + bandwidth_hz) / nyquist;

        if !(low > 0.0 && high < 1.0 && low < high) {
            return Err(BellError::InvalidBand {
                center_hz,
                bandwidth_hz,
                sample_rate,
                low,
                high,
            });
        }

        Self::butterworth(order, low, high)
    }

    pub fn sections(&self) -> &[Biquad] {
        &self.sections
    }

    /// Number of samples reflected at each edge before zero-phase filtering.
    pub fn pad_len(&self) -> usize {
        let trivial_b2 = self.sections.iter().filter(|s| s.b[2] == 0.0).count();
        let trivial_a2 = self.sections.iter().filter(|s| s.a[2] == 0.0).count();
        3 * (2 * self.sections.len() + 1 - trivial_b2.min(trivial_a2))
    }

    /// Steady-state section states for a unit step, chained through the cascade.
    fn step_states(&self) -> Vec<[f64; 2]> {
        let mut scale = 1.0;
        self.sections
            .iter()
            .map(|section| {
                let [z0, z1] = section.step_state();
                let state = [z0 * scale, z1 * scale];
                scale *= section.dc_gain();
                state
            })
            .collect()
    }

    /// Causal filtering, starting from `initial` states scaled by `x0`.
    fn run(&self, input: &[f64], initial: &[[f64; 2]], x0: f64) -> Vec<f64> {
        let mut state: Vec<[f64; 2]> = initial.iter().map(|z| [z[0] * x0, z[1] * x0]).collect();

        input
            .iter()
            .map(|&x| {
                let mut value = x;
                for (section, z) in self.sections.iter().zip(state.iter_mut()) {
                    let y = section.b[0] * value + z[0];
                    z[0] = section.b[1] * value - section.a[1] * y + z[1];
                    z[1] = section.b[2] * value - section.a[2] * y;
                    value = y;
                }
                value
            })
            .collect()
    }

    /// Zero-phase filtering: forward pass, then a pass over the reversed output.
    ///
    /// Edges are extended by odd reflection and both passes start from the
    /// steady state of the first sample, which suppresses start-up transients.
    pub fn filtfilt(&self, input: &[f64]) -> Vec<f64> {
        if input.is_empty() {
            return Vec::new();
        }

        let edge = self.pad_len().min(input.len() - 1);
        let extended = odd_extend(input, edge);
        let states = self.step_states();

        let mut forward = self.run(&extended, &states, extended[0]);
        forward.reverse();
        let mut backward = self.run(&forward, &states, forward[0]);
        backward.reverse();

        backward[edge..edge + input.len()].to_vec()
    }
}

/// Extend `x` by `edge` samples at each end, mirrored through the end points.
fn odd_extend(x: &[f64], edge: usize) -> Vec<f64> {
    let n = x.len();
    let first = x[0];
    let last = x[n - 1];

    let mut out = Vec::with_capacity(n + 2 * edge);
    out.extend((1..=edge).rev().map(|i| 2.0 * first - x[i]));
    out.extend_from_slice(x);
    out.extend((1..=edge).map(|i| 2.0 * last - x[n - 1 - i]));
    out
}

/// Zero-phase Butterworth band-pass around `center_hz`.
///
/// Fails with `InvalidBand` when the band does not fit below the Nyquist rate.
pub fn bandpass(
    samples: &[f32],
    sample_rate: u32,
    center_hz: f64,
    bandwidth_hz: f64,
    order: usize,
) -> Result<Vec<f64>> {
    let filter = BandpassFilter::around(order, center_hz, bandwidth_hz, sample_rate)?;
    let input: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
    Ok(filter.filtfilt(&input))
}
