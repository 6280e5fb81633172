// src/core/analysis/rounds.rs
//
// Pairs adjacent events into rounds of an expected length

use serde::Serialize;

use crate::config::RoundTiming;
use crate::detection::{Event, RoundCandidate, RoundOutcome};

/// Round matching result: one outcome per event, in event order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoundMatches {
    pub outcomes: Vec<RoundOutcome>,
}

impl RoundMatches {
    /// Matched rounds only, numbered from 1
    pub fn rounds(&self) -> impl Iterator<Item = &RoundCandidate> {
        self.outcomes.iter().filter_map(RoundOutcome::as_round)
    }

    pub fn round_count(&self) -> usize {
        self.rounds().count()
    }
}

/// Decide for every adjacent pair of events whether it delimits a round.
///
/// A pair starting at event `i` gives `start = max(0, E_i.start - lead_in)` and
/// `duration = E_{i+1}.start - start + trailing_pad`. It is a round when the
/// duration lies within the tolerance of the expected length, inclusive.
pub fn match_rounds(events: &[Event], timing: &RoundTiming) -> RoundMatches {
    let (min_duration, max_duration) = timing.accepted_range();
    let mut outcomes = Vec::with_capacity(events.len());
    let mut number = 0;

    for (i, event) in events.iter().enumerate() {
        let start_secs = (event.start() - timing.lead_in_secs).max(0.0);

        let Some(next) = events.get(i + 1) else {
            outcomes.push(RoundOutcome::LastEvent {
                event_index: i,
                start_secs,
            });
            break;
        };

        let duration_secs = next.start() - start_secs + timing.trailing_pad_secs;
        if duration_secs >= min_duration && duration_secs <= max_duration {
            number += 1;
            log::debug!(
                "Round {} at {:.3}s lasting {:.3}s (events {} and {})",
                number,
                start_secs,
                duration_secs,
                i + 1,
                i + 2
            );
            outcomes.push(RoundOutcome::Matched(RoundCandidate {
                number,
                event_index: i,
                start_secs,
                duration_secs,
            }));
        } else {
            log::debug!(
                "Events {} and {} are {:.3}s apart, outside {:.1}..{:.1}s",
                i + 1,
                i + 2,
                duration_secs,
                min_duration,
                max_duration
            );
            outcomes.push(RoundOutcome::NoMatch {
                event_index: i,
                start_secs,
                duration_secs,
            });
        }
    }

    RoundMatches { outcomes }
}
