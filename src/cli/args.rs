//! CLI argument parsing

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ConfigBuilder;
use crate::testgen::BellTone;

#[derive(Parser, Debug)]
#[command(name = "bellsplit", version)]
#[command(about = "Find boxing round bells in fight audio and recommend a detection frequency")]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// JSON configuration file; command-line flags override its values
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect bell events and round boundaries
    Detect(DetectArgs),
    /// Rank candidate frequencies and recommend one
    Analyze(AnalyzeArgs),
    /// Write a synthetic bell recording
    Generate(GenerateArgs),
}

/// Event dump format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Audio file or directory
    pub input: PathBuf,

    /// Detection frequency in Hz
    #[arg(long, value_name = "HZ")]
    pub target_freq: Option<f64>,

    /// Half-width of the detection band in Hz
    #[arg(long, value_name = "HZ")]
    pub bandwidth: Option<f64>,

    /// Minimum envelope peak height
    #[arg(long, value_name = "X")]
    pub min_height: Option<f64>,

    /// Minimum time between peaks in seconds
    #[arg(long, value_name = "S")]
    pub min_distance: Option<f64>,

    /// Maximum gap between peaks of one event in seconds
    #[arg(long, value_name = "S")]
    pub max_gap: Option<f64>,

    /// Minimum peaks per event
    #[arg(long, value_name = "N")]
    pub min_peaks: Option<usize>,

    /// Expected round length in seconds
    #[arg(long, value_name = "S")]
    pub round_time: Option<f64>,

    /// Accepted deviation from the round length in seconds
    #[arg(long, value_name = "S")]
    pub tolerance: Option<f64>,

    /// Write the event dump to this file
    #[arg(long, value_name = "PATH")]
    pub debug_file: Option<PathBuf>,

    /// Event dump format
    #[arg(long, value_enum, default_value = "text")]
    pub dump_format: DumpFormat,

    /// Write the round plan (start/duration per round) as JSON
    #[arg(long, value_name = "PATH")]
    pub plan: Option<PathBuf>,

    /// Print the detection report as JSON
    #[arg(long)]
    pub json: bool,
}

impl DetectArgs {
    pub fn apply(&self, mut builder: ConfigBuilder) -> ConfigBuilder {
        if let Some(v) = self.target_freq {
            builder = builder.target_frequency(v);
        }
        if let Some(v) = self.bandwidth {
            builder = builder.bandwidth(v);
        }
        if let Some(v) = self.min_height {
            builder = builder.min_peak_height(v);
        }
        if let Some(v) = self.min_distance {
            builder = builder.min_peak_distance(v);
        }
        if let Some(v) = self.max_gap {
            builder = builder.max_gap(v);
        }
        if let Some(v) = self.min_peaks {
            builder = builder.min_peaks(v);
        }
        if let Some(v) = self.round_time {
            builder = builder.round_time(v);
        }
        if let Some(v) = self.tolerance {
            builder = builder.round_tolerance(v);
        }
        builder
    }
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Audio file or directory
    pub input: PathBuf,

    /// Analysis band in Hz
    #[arg(long, num_args = 2, value_names = ["LO", "HI"])]
    pub band: Option<Vec<f64>>,

    /// Number of spectral peaks to evaluate
    #[arg(long, value_name = "N", conflicts_with = "step")]
    pub peaks: Option<usize>,

    /// Sweep the band at this step instead of using spectral peaks
    #[arg(long, value_name = "HZ")]
    pub step: Option<f64>,

    /// Half-width of the detection band in Hz
    #[arg(long, value_name = "HZ")]
    pub bandwidth: Option<f64>,

    /// Write the spectral report as JSON
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write an event dump per candidate into this directory
    #[arg(long, value_name = "DIR")]
    pub debug_dir: Option<PathBuf>,

    /// Evaluate candidates one at a time
    #[arg(long)]
    pub sequential: bool,
}

impl AnalyzeArgs {
    pub fn apply(&self, mut builder: ConfigBuilder) -> ConfigBuilder {
        if let Some(band) = &self.band {
            if let [low, high] = band.as_slice() {
                builder = builder.analysis_band(*low, *high);
            }
        }
        if let Some(count) = self.peaks {
            builder = builder.spectral_peaks(count);
        }
        if let Some(step) = self.step {
            builder = builder.sweep(step);
        }
        if let Some(v) = self.bandwidth {
            builder = builder.bandwidth(v);
        }
        if self.sequential {
            builder = builder.parallel(false);
        }
        builder
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output WAV file
    pub output: PathBuf,

    #[arg(long, default_value_t = 44100, value_name = "HZ")]
    pub sample_rate: u32,

    /// Length of the recording in seconds
    #[arg(long, default_value_t = 10.0, value_name = "S")]
    pub duration: f64,

    /// Bell strike as FREQ@TIME; repeatable. Defaults to 1900@2, 2050@5, 2200@8
    #[arg(long = "tone", value_name = "FREQ@TIME", value_parser = BellTone::parse)]
    pub tones: Vec<BellTone>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CandidateMode;

    #[test]
    fn test_detect_flags_override_config() {
        let cli = Cli::parse_from([
            "bellsplit",
            "detect",
            "fight.wav",
            "--target-freq",
            "1900",
            "--min-peaks",
            "3",
            "--round-time",
            "180",
        ]);
        let Command::Detect(args) = cli.command else {
            panic!("expected detect");
        };

        let config = args.apply(ConfigBuilder::new()).build().unwrap();
        assert_eq!(config.target_frequency_hz, 1900.0);
        assert_eq!(config.min_peaks, 3);
        assert_eq!(config.round.expected_secs, 180.0);
        assert_eq!(config.bandwidth_hz, 50.0);
        assert_eq!(args.dump_format, DumpFormat::Text);
    }

    #[test]
    fn test_analyze_sweep() {
        let cli = Cli::parse_from([
            "bellsplit",
            "--debug",
            "analyze",
            "fight.wav",
            "--band",
            "1800",
            "2300",
            "--step",
            "25",
            "--sequential",
        ]);
        assert!(cli.debug);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };

        let config = args.apply(ConfigBuilder::new()).build().unwrap();
        assert_eq!(config.spectral.band_low_hz, 1800.0);
        assert_eq!(config.spectral.band_high_hz, 2300.0);
        assert_eq!(config.spectral.mode, CandidateMode::Sweep { step_hz: 25.0 });
        assert!(!config.spectral.parallel);
    }

    #[test]
    fn test_peaks_and_step_conflict() {
        let result = Cli::try_parse_from([
            "bellsplit", "analyze", "fight.wav", "--peaks", "3", "--step", "10",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_generate_tones() {
        let cli = Cli::parse_from([
            "bellsplit",
            "generate",
            "out.wav",
            "--tone",
            "2050@1",
            "--tone",
            "2050@121",
            "--duration",
            "130",
        ]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.tones.len(), 2);
        assert_eq!(args.tones[1].start_secs, 121.0);
        assert_eq!(args.duration, 130.0);
    }
}
