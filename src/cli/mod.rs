// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;
mod progress;

pub use args::{AnalyzeArgs, Cli, Command, DetectArgs, DumpFormat, GenerateArgs};
pub use output::{
    event_dump_json, format_clock, format_duration, format_event_dump, format_round_lines,
    format_timestamp, round_plan, PlannedRound,
};

use anyhow::{bail, Context, Result};
use colorful::Colorful;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{BellConfig, ConfigBuilder};
use crate::core::decoder::is_audio_file;
use crate::core::{BellAnalyzer, DetectionReport};
use crate::testgen::SyntheticRecording;

/// Run the parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let base = load_config(cli.config.as_deref())?;

    match &cli.command {
        Command::Detect(args) => run_detect(args, base),
        Command::Analyze(args) => run_analyze(args, base),
        Command::Generate(args) => run_generate(args),
    }
}

fn load_config(path: Option<&Path>) -> Result<BellConfig> {
    match path {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            BellConfig::from_json_file(path)
                .with_context(|| format!("Failed to load configuration: {}", path.display()))
        }
        None => Ok(BellConfig::default()),
    }
}

/// Audio files under `path`: the file itself, or a recursive directory walk.
pub fn collect_audio_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        bail!("Input not found: {}", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_audio_file(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    Ok(files)
}

/// With several inputs, prefix an output file name with the input's stem.
fn output_path_for(base: &Path, input: &Path, multiple: bool) -> PathBuf {
    if !multiple {
        return base.to_path_buf();
    }
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string());
    let name = base
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    base.with_file_name(format!("{}_{}", stem, name))
}

fn inputs_or_bail(input: &Path) -> Result<Vec<PathBuf>> {
    let files = collect_audio_files(input)?;
    if files.is_empty() {
        bail!("No audio files found in {}", input.display());
    }
    log::info!("Found {} audio file(s)", files.len());
    Ok(files)
}

/// Process every file, report failures, and fail if any file failed.
fn for_each_file<F>(files: &[PathBuf], mut process: F) -> Result<()>
where
    F: FnMut(&Path, Option<&indicatif::ProgressBar>) -> Result<()>,
{
    let pb = progress::create_file_progress(files.len());
    let mut failures = 0;

    for file in files {
        if let Err(e) = process(file.as_path(), pb.as_ref()) {
            failures += 1;
            progress::suspend(pb.as_ref(), || {
                eprintln!("{} {}: {:#}", "✗".red(), file.display(), e);
            });
        }
        progress::inc_progress(pb.as_ref());
    }
    progress::finish_progress(pb, "done");

    if failures > 0 {
        bail!("{} of {} file(s) failed", failures, files.len());
    }
    Ok(())
}

#[derive(Serialize)]
struct FileReport<'a> {
    file: String,
    report: &'a DetectionReport,
}

fn run_detect(args: &DetectArgs, base: BellConfig) -> Result<()> {
    let config = args.apply(ConfigBuilder::from_config(base)).build()?;
    let files = inputs_or_bail(&args.input)?;
    let multiple = files.len() > 1;

    for_each_file(&files, |file, pb| {
        let report = BellAnalyzer::with_config(file, config.clone())?.detect()?;

        if let Some(debug_file) = &args.debug_file {
            let path = output_path_for(debug_file, file, multiple);
            output::write_event_dump(&path, report.events(), args.dump_format)?;
            log::info!("Debug information written to {}", path.display());
        }
        if let Some(plan) = &args.plan {
            let path = output_path_for(plan, file, multiple);
            output::write_round_plan(&path, &report.rounds)?;
            log::info!("Round plan written to {}", path.display());
        }

        if args.json {
            let text = serde_json::to_string_pretty(&FileReport {
                file: file.display().to_string(),
                report: &report,
            })?;
            progress::suspend(pb, || println!("{}", text));
        } else {
            progress::suspend(pb, || output::print_detection(file, &report));
        }
        Ok(())
    })
}

fn run_analyze(args: &AnalyzeArgs, base: BellConfig) -> Result<()> {
    let config = args.apply(ConfigBuilder::from_config(base)).build()?;
    let files = inputs_or_bail(&args.input)?;
    let multiple = files.len() > 1;

    for_each_file(&files, |file, pb| {
        let analyzer = BellAnalyzer::with_config(file, config.clone())?;
        let report = analyzer.recommend()?;

        if let Some(output_path) = &args.output {
            let path = output_path_for(output_path, file, multiple);
            output::write_spectral_report(&path, &report)?;
            log::info!("Spectral report written to {}", path.display());
        }
        if let Some(dir) = &args.debug_dir {
            let dir = if multiple {
                dir.join(file.file_stem().unwrap_or_default())
            } else {
                dir.clone()
            };
            let written = output::write_candidate_dumps(&dir, &report.candidates)?;
            log::info!("Wrote {} candidate dumps to {}", written.len(), dir.display());
        }

        progress::suspend(pb, || output::print_spectral_report(&report));
        Ok(())
    })
}

fn run_generate(args: &GenerateArgs) -> Result<()> {
    let mut recording = SyntheticRecording::new(args.sample_rate, args.duration);
    recording.tones = if args.tones.is_empty() {
        SyntheticRecording::three_bells().tones
    } else {
        args.tones.clone()
    };

    let signal = recording.write_wav(&args.output)?;
    println!(
        "{} {} ({} strikes, {:.1}s at {} Hz)",
        "✓".green(),
        args.output.display(),
        recording.tones.len(),
        signal.duration_secs(),
        signal.sample_rate()
    );
    Ok(())
}
