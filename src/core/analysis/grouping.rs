// src/core/analysis/grouping.rs
//
// Clusters peak timestamps into bell-ringing events

use crate::detection::Event;

/// Grouping thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupParams {
    /// Maximum distance from the previous peak of the same event
    pub max_gap_secs: f64,
    /// Smallest group kept as an event
    pub min_peaks: usize,
}

impl Default for GroupParams {
    fn default() -> Self {
        Self {
            max_gap_secs: 0.6,
            min_peaks: 4,
        }
    }
}

/// What happened to the open group when a peak was pushed
#[derive(Debug, Clone, PartialEq)]
pub enum GroupStep {
    /// The peak joined the open group
    Extend,
    /// The open group was large enough and is emitted; the peak opens a new one
    Closed(Event),
    /// The open group was too small and is dropped; the peak opens a new one
    Discarded { peaks: usize },
}

/// Incremental peak grouper.
///
/// Peaks must be pushed in ascending order. A peak belongs to the open group
/// when it is within `max_gap_secs` of that group's last peak.
#[derive(Debug, Clone)]
pub struct EventGrouper {
    params: GroupParams,
    current: Vec<f64>,
}

impl EventGrouper {
    pub fn new(params: GroupParams) -> Self {
        Self {
            params,
            current: Vec::new(),
        }
    }

    pub fn push(&mut self, timestamp: f64) -> GroupStep {
        match self.current.last() {
            None => {
                self.current.push(timestamp);
                GroupStep::Extend
            }
            Some(&last) if timestamp - last <= self.params.max_gap_secs => {
                self.current.push(timestamp);
                GroupStep::Extend
            }
            Some(_) => {
                let closed = std::mem::replace(&mut self.current, vec![timestamp]);
                self.close(closed)
            }
        }
    }

    /// Flush the open group. Returns `None` when there was nothing to flush.
    pub fn finish(mut self) -> Option<GroupStep> {
        if self.current.is_empty() {
            return None;
        }
        let closed = std::mem::take(&mut self.current);
        Some(self.close(closed))
    }

    /// Number of peaks in the open group
    pub fn pending(&self) -> usize {
        self.current.len()
    }

    fn close(&self, peaks: Vec<f64>) -> GroupStep {
        let count = peaks.len();
        if count < self.params.min_peaks {
            return GroupStep::Discarded { peaks: count };
        }
        match Event::new(peaks) {
            Some(event) => GroupStep::Closed(event),
            None => GroupStep::Discarded { peaks: count },
        }
    }
}

/// Group ascending peak timestamps into events.
pub fn group_peaks(peaks: &[f64], params: &GroupParams) -> Vec<Event> {
    let mut grouper = EventGrouper::new(*params);
    let mut events = Vec::new();

    for &t in peaks {
        match grouper.push(t) {
            GroupStep::Closed(event) => events.push(event),
            GroupStep::Discarded { peaks } => {
                log::debug!("Discarded group of {} peaks before {:.3}s", peaks, t);
            }
            GroupStep::Extend => {}
        }
    }

    match grouper.finish() {
        Some(GroupStep::Closed(event)) => events.push(event),
        Some(GroupStep::Discarded { peaks }) => {
            log::debug!("Discarded trailing group of {} peaks", peaks);
        }
        _ => {}
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts(events: &[Event]) -> Vec<f64> {
        events.iter().map(|e| e.start()).collect()
    }

    #[test]
    fn test_single_event() {
        let events = group_peaks(&[1.0, 1.2, 1.4, 1.5], &GroupParams::default());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].len(), 4);
    }

    #[test]
    fn test_small_group_dropped() {
        let events = group_peaks(&[1.0, 1.2], &GroupParams::default());
        assert!(events.is_empty());
    }

    #[test]
    fn test_two_events() {
        let peaks = [1.0, 1.2, 1.4, 1.5, 2.2, 2.4, 2.6, 2.7];
        let events = group_peaks(&peaks, &GroupParams::default());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].len(), 4);
        assert_eq!(events[1].len(), 4);
        assert_eq!(starts(&events), vec![1.0, 2.2]);
    }

    #[test]
    fn test_gap_is_chained_from_last_peak() {
        // Spans 1.5 s overall, but no step exceeds the gap
        let peaks = [0.0, 0.5, 1.0, 1.5];
        let events = group_peaks(&peaks, &GroupParams::default());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_peaks(&[], &GroupParams::default()).is_empty());
    }

    #[test]
    fn test_state_machine_steps() {
        let mut grouper = EventGrouper::new(GroupParams {
            max_gap_secs: 0.6,
            min_peaks: 2,
        });
        assert_eq!(grouper.push(1.0), GroupStep::Extend);
        assert_eq!(grouper.push(5.0), GroupStep::Discarded { peaks: 1 });
        assert_eq!(grouper.push(5.3), GroupStep::Extend);
        assert_eq!(grouper.pending(), 2);

        match grouper.push(9.0) {
            GroupStep::Closed(event) => assert_eq!(event.peaks(), &[5.0, 5.3]),
            other => panic!("expected a closed event, got {:?}", other),
        }
        assert_eq!(grouper.finish(), Some(GroupStep::Discarded { peaks: 1 }));
    }

    #[test]
    fn test_events_are_ordered() {
        let peaks = [1.0, 1.1, 1.2, 1.3, 5.0, 5.1, 5.2, 5.3, 9.0, 9.1, 9.2, 9.3];
        let events = group_peaks(&peaks, &GroupParams::default());
        assert_eq!(starts(&events), vec![1.0, 5.0, 9.0]);
        assert!(events.iter().all(|e| e.peaks().windows(2).all(|w| w[0] <= w[1])));
    }
}
