// tests/rounds_test.rs
//
// Round boundaries in long recordings: a bell two minutes after another bell
// closes a round, anything else does not.

mod test_utils;

use bellsplit::{BellDetector, ConfigBuilder, RoundOutcome};
use test_utils::*;

const RATE: u32 = 8000;

#[test]
fn test_two_minute_round() {
    let signal = bell_recording(RATE, 130.0, BELL_HZ, &[1.0, 121.0]);
    let report = BellDetector::default().detect_rounds(&signal).unwrap();

    assert_eq!(report.events().len(), 2);
    assert_eq!(report.rounds.round_count(), 1);

    let round = report.rounds.rounds().next().unwrap();
    assert_eq!(round.number, 1);
    assert_eq!(round.event_index, 0);
    // Half a second of lead-in, one second of trailing pad
    assert_close(round.start_secs, 0.5, 0.05, "round start");
    assert_close(round.duration_secs, 121.5, 0.05, "round duration");
    assert!(matches!(report.rounds.outcomes[1], RoundOutcome::LastEvent { event_index: 1, .. }));
}

#[test]
fn test_short_gap_after_round_is_no_match() {
    let signal = bell_recording(RATE, 190.0, BELL_HZ, &[1.0, 121.0, 181.0]);
    let report = BellDetector::default().detect_rounds(&signal).unwrap();
    let outcomes = &report.rounds.outcomes;

    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[0], RoundOutcome::Matched(_)));
    match &outcomes[1] {
        RoundOutcome::NoMatch { duration_secs, .. } => {
            assert_close(*duration_secs, 61.5, 0.05, "second gap")
        }
        other => panic!("expected NoMatch, got {:?}", other),
    }
    assert!(matches!(outcomes[2], RoundOutcome::LastEvent { .. }));
}

#[test]
fn test_custom_round_length() {
    let signal = bell_recording(RATE, 70.0, BELL_HZ, &[2.0, 62.0]);
    let config = ConfigBuilder::new().round_time(60.0).build().unwrap();
    let report = BellDetector::new(config).detect_rounds(&signal).unwrap();

    assert_eq!(report.rounds.round_count(), 1);

    let defaults = BellDetector::default().detect_rounds(&signal).unwrap();
    assert_eq!(defaults.rounds.round_count(), 0);
}

#[test]
fn test_lead_in_clamped_at_recording_start() {
    let signal = bell_recording(RATE, 125.0, BELL_HZ, &[0.2, 120.2]);
    let report = BellDetector::default().detect_rounds(&signal).unwrap();

    let round = report.rounds.rounds().next().expect("round not matched");
    assert_eq!(round.start_secs, 0.0);
    assert_close(round.duration_secs, 121.2, 0.05, "round duration");
}
