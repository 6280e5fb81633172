// src/core/analysis/consistency.rs
//
// Regularity of the spacing between event starts

use crate::core::dsp::stats::{mean, std_dev};
use crate::detection::Event;

/// Score in 0..=1 of how evenly spaced the event starts are.
///
/// Fewer than two events score 0.0 and a single interval scores 0.5. With
/// more intervals the score is `1 - std/mean` of the intervals, floored at 0.
pub fn consistency_score(events: &[Event]) -> f64 {
    if events.len() < 2 {
        return 0.0;
    }

    let intervals: Vec<f64> = events
        .windows(2)
        .map(|pair| pair[1].start() - pair[0].start())
        .collect();

    if intervals.len() == 1 {
        return 0.5;
    }

    let avg = mean(&intervals);
    if avg <= 0.0 {
        return 0.0;
    }

    (1.0 - std_dev(&intervals) / avg).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events_at(starts: &[f64]) -> Vec<Event> {
        starts
            .iter()
            .map(|&t| Event::new(vec![t, t + 0.1, t + 0.2, t + 0.3]).unwrap())
            .collect()
    }

    #[test]
    fn test_regular_spacing() {
        assert!(consistency_score(&events_at(&[10.0, 12.0, 14.0])) > 0.9);
    }

    #[test]
    fn test_irregular_spacing() {
        assert!(consistency_score(&events_at(&[10.0, 11.0, 15.0])) < 0.5);
    }

    #[test]
    fn test_degenerate_counts() {
        assert_eq!(consistency_score(&[]), 0.0);
        assert_eq!(consistency_score(&events_at(&[10.0])), 0.0);
        assert_eq!(consistency_score(&events_at(&[10.0, 130.0])), 0.5);
    }

    #[test]
    fn test_score_is_bounded() {
        let score = consistency_score(&events_at(&[0.0, 0.1, 50.0, 50.1]));
        assert!((0.0..=1.0).contains(&score));
    }
}
