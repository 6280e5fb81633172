//! Mono sample sequence shared read-only by every pipeline stage

use crate::error::{BellError, Result};

/// Mono `f32` samples with their sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSequence {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleSequence {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(BellError::Config("sample rate must be positive".to_string()));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}
