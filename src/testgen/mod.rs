// src/testgen/mod.rs
//
// Synthetic bell recordings for tests and demos.
// Damped sine strikes are placed at chosen times on a silent track, the result
// is peak-normalized and can be written as 16-bit PCM WAV.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::Path;

use crate::core::SampleSequence;

/// One bell strike: `amplitude * exp(-decay * t) * sin(2 pi f t)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BellTone {
    pub frequency_hz: f64,
    pub start_secs: f64,
    pub duration_secs: f64,
    pub amplitude: f64,
    /// Exponential decay rate per second
    pub decay: f64,
}

impl BellTone {
    pub fn new(frequency_hz: f64, start_secs: f64) -> Self {
        Self {
            frequency_hz,
            start_secs,
            duration_secs: 0.5,
            amplitude: 0.5,
            decay: 5.0,
        }
    }

    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration_secs = secs;
        self
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// Parse `FREQ@TIME`, e.g. `2050@12.5`.
    pub fn parse(text: &str) -> Result<Self, String> {
        let (freq, time) = text
            .split_once('@')
            .ok_or_else(|| format!("Invalid tone '{}'. Use FREQ@TIME, e.g. 2050@12.5", text))?;
        let frequency_hz: f64 = freq
            .trim()
            .parse()
            .map_err(|_| format!("Invalid tone frequency: {}", freq))?;
        let start_secs: f64 = time
            .trim()
            .parse()
            .map_err(|_| format!("Invalid tone time: {}", time))?;
        if frequency_hz <= 0.0 || start_secs < 0.0 {
            return Err(format!("Tone '{}' needs a positive frequency and non-negative time", text));
        }
        Ok(Self::new(frequency_hz, start_secs))
    }

    fn render_into(&self, buffer: &mut [f64], sample_rate: u32) -> bool {
        let rate = sample_rate as f64;
        let start = (self.start_secs * rate) as usize;
        let len = (self.duration_secs * rate) as usize;
        if start + len > buffer.len() {
            return false;
        }

        for (i, slot) in buffer[start..start + len].iter_mut().enumerate() {
            let t = i as f64 / rate;
            *slot += self.amplitude * (-self.decay * t).exp() * (2.0 * PI * self.frequency_hz * t).sin();
        }
        true
    }
}

/// A silent track with bell strikes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticRecording {
    pub sample_rate: u32,
    pub duration_secs: f64,
    pub tones: Vec<BellTone>,
    /// Absolute peak after normalization
    pub normalize_peak: f64,
}

impl SyntheticRecording {
    pub fn new(sample_rate: u32, duration_secs: f64) -> Self {
        Self {
            sample_rate,
            duration_secs,
            tones: Vec::new(),
            normalize_peak: 0.8,
        }
    }

    /// Three strikes at 1900, 2050 and 2200 Hz, at 2, 5 and 8 seconds.
    pub fn three_bells() -> Self {
        Self::new(44100, 10.0)
            .tone(BellTone::new(1900.0, 2.0))
            .tone(BellTone::new(2050.0, 5.0))
            .tone(BellTone::new(2200.0, 8.0))
    }

    pub fn tone(mut self, tone: BellTone) -> Self {
        self.tones.push(tone);
        self
    }

    /// Add a strike at `frequency_hz` for every start time.
    pub fn strikes(mut self, frequency_hz: f64, times: &[f64]) -> Self {
        self.tones.extend(times.iter().map(|&t| BellTone::new(frequency_hz, t)));
        self
    }

    pub fn normalize_to(mut self, peak: f64) -> Self {
        self.normalize_peak = peak;
        self
    }

    /// Render the track. Strikes that would run past the end are left out.
    pub fn render(&self) -> Result<SampleSequence> {
        let len = (self.duration_secs * self.sample_rate as f64) as usize;
        let mut buffer = vec![0.0f64; len];

        for tone in &self.tones {
            if !tone.render_into(&mut buffer, self.sample_rate) {
                log::warn!(
                    "Dropping {:.0} Hz strike at {:.2}s: past the end of the recording",
                    tone.frequency_hz,
                    tone.start_secs
                );
            }
        }

        let peak = buffer.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        let gain = if peak > 0.0 { self.normalize_peak / peak } else { 1.0 };
        let samples = buffer.iter().map(|v| (v * gain) as f32).collect();

        Ok(SampleSequence::new(samples, self.sample_rate)?)
    }

    /// Render and write as 16-bit mono PCM WAV.
    pub fn write_wav<P: AsRef<Path>>(&self, path: P) -> Result<SampleSequence> {
        let signal = self.render()?;
        write_wav(&signal, path.as_ref())?;
        Ok(signal)
    }
}

/// Write a mono sequence as 16-bit PCM WAV.
pub fn write_wav(signal: &SampleSequence, path: &Path) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: signal.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for &s in signal.samples() {
        let value = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value)?;
    }
    writer.finalize()?;
    Ok(())
}
