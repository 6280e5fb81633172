//! Detection result types for bellsplit

mod result;

pub use result::{
    AmplitudeStats, CandidateScore, Event, FrequencyCandidate, PowerBasis, RoundCandidate,
    RoundOutcome, SpectralReport, CONSISTENCY_WEIGHT, EVENT_SATURATION, EVENT_WEIGHT,
    POWER_WEIGHT,
};
