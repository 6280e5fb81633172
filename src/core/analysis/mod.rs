//! Bell detection analysis stages
//!
//! Leaf-first:
//! - Envelope and peak picking on the band-limited signal
//! - Grouping of peaks into ringing events
//! - Round boundary matching between adjacent events
//! - Consistency of event spacing
//! - Spectral candidate generation and ranking

mod consistency;
mod envelope;
mod grouping;
mod rounds;
mod spectral;

pub use consistency::consistency_score;
pub use envelope::{amplitude_stats, envelope, find_peaks, PeakParams};
pub use grouping::{group_peaks, EventGrouper, GroupParams, GroupStep};
pub use rounds::{match_rounds, RoundMatches};
pub use spectral::{
    composite_score, max_in_band_power, rank_candidates, select_optimal, spectral_peaks,
    sweep_frequencies, SpectralPeak, SIGNIFICANCE_PERCENTILE,
};
