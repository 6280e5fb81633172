//! Output formatting for CLI results

use anyhow::{bail, Context, Result};
use colorful::Colorful;
use serde::Serialize;
use serde_json::json;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::args::DumpFormat;
use crate::core::analysis::RoundMatches;
use crate::core::DetectionReport;
use crate::detection::{Event, FrequencyCandidate, RoundOutcome, SpectralReport};

const RULE_WIDTH: usize = 40;

/// `HH:MM:SS.mmm`, every field truncated. Hours are not wrapped.
pub fn format_timestamp(secs: f64) -> String {
    let secs = secs.max(0.0);
    let hours = (secs / 3600.0).floor() as u64;
    let minutes = ((secs % 3600.0) / 60.0).floor() as u64;
    let seconds = (secs % 60.0).floor() as u64;
    let millis = ((secs % 1.0) * 1000.0).floor() as u64;
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

/// `H:MM:SS` with the fraction dropped.
pub fn format_clock(secs: f64) -> String {
    let total = secs.max(0.0).floor() as u64;
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Clock form zero-padded to eight characters, e.g. `00:02:01`.
pub fn format_duration(secs: f64) -> String {
    format!("{:0>8}", format_clock(secs))
}

/// Plain-text event dump.
pub fn format_event_dump(events: &[Event]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    out.push_str("Bell Ringing Detection Debug Info\n");
    out.push_str(&rule);
    out.push('\n');

    for (i, event) in events.iter().enumerate() {
        let stamps: Vec<String> = event
            .peaks()
            .iter()
            .map(|&t| format!("'{}'", format_timestamp(t)))
            .collect();
        let _ = writeln!(out, "Event {}: [{}]", i + 1, stamps.join(", "));
    }

    out.push_str(&rule);
    out.push('\n');
    out
}

/// JSON event dump with rendered and raw timestamps.
pub fn event_dump_json(events: &[Event]) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            json!({
                "event": i + 1,
                "timestamps": event.peaks().iter().map(|&t| format_timestamp(t)).collect::<Vec<_>>(),
                "seconds": event.peaks(),
            })
        })
        .collect();
    json!({ "events": entries })
}

pub fn write_event_dump(path: &Path, events: &[Event], format: DumpFormat) -> Result<()> {
    let contents = match format {
        DumpFormat::Text => format_event_dump(events),
        DumpFormat::Json => serde_json::to_string_pretty(&event_dump_json(events))?,
    };
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write event dump: {}", path.display()))
}

/// One cut of the round plan
#[derive(Debug, Clone, Serialize)]
pub struct PlannedRound {
    pub round: usize,
    pub start_secs: f64,
    pub duration_secs: f64,
    /// Seek offset, three decimals
    pub ss: String,
    /// Cut length, three decimals
    pub t: String,
}

/// Start and duration of every matched round, for an external cutter.
pub fn round_plan(rounds: &RoundMatches) -> Vec<PlannedRound> {
    rounds
        .rounds()
        .map(|r| PlannedRound {
            round: r.number,
            start_secs: r.start_secs,
            duration_secs: r.duration_secs,
            ss: format!("{:.3}", r.start_secs),
            t: format!("{:.3}", r.duration_secs),
        })
        .collect()
}

pub fn write_round_plan(path: &Path, rounds: &RoundMatches) -> Result<()> {
    let json = serde_json::to_string_pretty(&round_plan(rounds))?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write round plan: {}", path.display()))
}

/// Per-event round listing without colors.
pub fn format_round_lines(rounds: &RoundMatches) -> Vec<String> {
    rounds
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            RoundOutcome::Matched(r) => format!(
                "Round {:02}: start {} duration {}",
                r.number,
                format_clock(r.start_secs),
                format_duration(r.duration_secs)
            ),
            RoundOutcome::NoMatch {
                event_index,
                start_secs,
                duration_secs,
            } => format!(
                "Event {} at {}: next event {} later, no match",
                event_index + 1,
                format_clock(*start_secs),
                format_duration(*duration_secs)
            ),
            RoundOutcome::LastEvent {
                event_index,
                start_secs,
            } => format!(
                "Event {} at {}: last group, no match",
                event_index + 1,
                format_clock(*start_secs)
            ),
        })
        .collect()
}

/// Print a detection report for one file
pub fn print_detection(path: &Path, report: &DetectionReport) {
    println!("{}", path.display().to_string().cyan());
    println!(
        "  {} Hz, {:.1}s, {} peaks at {:.1} Hz",
        report.sample_rate,
        report.duration_secs,
        report.detection.peaks.len(),
        report.detection.frequency_hz
    );

    let events = report.events();
    if events.is_empty() {
        println!("  {}", "No bell events detected".yellow());
        return;
    }

    println!("  Events: {}", events.len());
    for (i, event) in events.iter().enumerate() {
        println!(
            "    Event {}: {} ({} peaks)",
            i + 1,
            format_timestamp(event.start()),
            event.len()
        );
    }

    let lines = format_round_lines(&report.rounds);
    println!("  Rounds: {}", report.rounds.round_count());
    for (outcome, line) in report.rounds.outcomes.iter().zip(lines) {
        match outcome {
            RoundOutcome::Matched(_) => println!("    {}", line.green()),
            _ => println!("    {}", line.dim()),
        }
    }
}

/// Ranked candidate table
pub fn print_spectral_report(report: &SpectralReport) {
    println!(
        "{}  {} Hz, band {:.0}-{:.0} Hz, {}",
        report.source.clone().cyan(),
        report.sample_rate,
        report.band_low_hz,
        report.band_high_hz,
        report.mode
    );
    println!(
        "  Recommended frequency: {}",
        format!("{:.1} Hz", report.recommended_frequency_hz).green().bold()
    );
    println!("  {}", "-".repeat(76));

    for (rank, candidate) in report.candidates.iter().enumerate() {
        let line = format_candidate_line(rank + 1, candidate);
        if rank == 0 {
            println!("  {} {}", "✓".green(), line);
        } else {
            println!("    {}", line);
        }
        for (i, event) in candidate.events.iter().enumerate() {
            println!(
                "      Event {}: {} | Amplitude: {:.3}",
                i + 1,
                format_timestamp(event.start()),
                candidate.amplitude.max
            );
        }
    }

    println!("  {}", "-".repeat(76));
    println!(
        "  {}",
        "Score: 40% power, 30% events (10 saturate), 30% consistency".dim()
    );
}

pub fn format_candidate_line(rank: usize, candidate: &FrequencyCandidate) -> String {
    format!(
        "{}. {:6.1} Hz | Score: {:.2} | Events: {} | Power: {:.2} ({}) | Consistency: {:.2}",
        rank,
        candidate.frequency_hz,
        candidate.composite_score(),
        candidate.events_detected,
        candidate.power_percentage,
        candidate.power_basis,
        candidate.consistency_score
    )
}

pub fn write_spectral_report(path: &Path, report: &SpectralReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write spectral report: {}", path.display()))
}

/// Write `events_<freq>Hz.txt` for every candidate, frequency to 0.1 Hz.
///
/// Fails before writing anything when two candidates would share a file name.
pub fn write_candidate_dumps(dir: &Path, candidates: &[FrequencyCandidate]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let path = dir.join(candidate_dump_name(candidate.frequency_hz));
        if paths.contains(&path) {
            bail!(
                "Candidates closer than 0.1 Hz share the dump file {}",
                path.display()
            );
        }
        paths.push(path);
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create debug directory: {}", dir.display()))?;
    for (candidate, path) in candidates.iter().zip(&paths) {
        write_event_dump(path, &candidate.events, DumpFormat::Text)?;
    }
    Ok(paths)
}

fn candidate_dump_name(frequency_hz: f64) -> String {
    format!("events_{:.1}Hz.txt", frequency_hz)
}
