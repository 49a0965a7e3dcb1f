use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use titrapeak::analysis::AnalysisConfig;
use titrapeak::chemistry::TimeUnit;
use titrapeak::metals::Metal;

mod analyze;
mod config;
mod csv_io;
mod model_curve;
mod peaks;

/// titrapeak - excess-base titration analysis
#[derive(Parser)]
#[command(name = "titrapeak")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Processor overrides shared by the subcommands
#[derive(Args, Debug, Default)]
pub struct ProcessArgs {
    /// Titrant concentration (mol/L)
    #[arg(long, value_name = "MOL_L")]
    c_b: Option<f64>,

    /// Pump rate (mL/min)
    #[arg(long, value_name = "ML_MIN")]
    pump_rate: Option<f64>,

    /// Initial sample volume (mL)
    #[arg(long, value_name = "ML")]
    v0: Option<f64>,

    /// Unit of the time column (s or min)
    #[arg(long)]
    time_unit: Option<TimeUnit>,

    /// Leading rows to skip
    #[arg(long)]
    start_index: Option<usize>,

    /// End of the baseline window (rows after the start index)
    #[arg(long)]
    baseline_end: Option<usize>,

    /// Known background-acid concentration (mol/L), skips estimation
    #[arg(long, value_name = "MOL_L")]
    c_a: Option<f64>,

    /// Ignore baseline rows below this pH
    #[arg(long)]
    ph_floor: Option<f64>,
}

/// Peak detection overrides shared by the subcommands
#[derive(Args, Debug, Default)]
pub struct PeakArgs {
    /// Apexes above this pH are dropped
    #[arg(long, conflicts_with = "no_cutoff")]
    cutoff: Option<f64>,

    /// Disable the pH cutoff
    #[arg(long)]
    no_cutoff: bool,

    /// Savitzky-Golay window length
    #[arg(long)]
    window: Option<usize>,

    /// Savitzky-Golay polynomial order
    #[arg(long)]
    polyorder: Option<usize>,

    /// Minimum derivative prominence
    #[arg(long)]
    prominence: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a time,pH CSV: background acid, excess base, peaks
    Analyze {
        /// Input CSV with time and pH columns
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write processed.csv, peaks.csv and model_curve.csv here
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Print the full result as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Attribute a peak to a metal, e.g. 1=Fe3+ (repeatable)
        #[arg(long = "assign", value_name = "ID=METAL", value_parser = parse_assignment)]
        assignments: Vec<(usize, Metal)>,

        #[command(flatten)]
        process: ProcessArgs,

        #[command(flatten)]
        peaks: PeakArgs,
    },

    /// Detect peaks in a pH,delta_b CSV
    Peaks {
        /// Input CSV with pH and excess-base columns
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write the peak table to this CSV file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        peaks: PeakArgs,
    },

    /// Compute the standalone background-acid curve
    ModelCurve {
        /// Background-acid concentration (mol/L)
        #[arg(long, value_name = "MOL_L")]
        c_a: f64,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Titrant concentration (mol/L)
        #[arg(long, value_name = "MOL_L")]
        c_b: Option<f64>,

        /// pH the curve should reach
        #[arg(long)]
        target_ph: Option<f64>,

        /// Grid points per sweep
        #[arg(long)]
        points: Option<usize>,

        /// Write the curve to this CSV file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn parse_assignment(s: &str) -> Result<(usize, Metal), String> {
    let (id, metal) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected ID=METAL, got '{}'", s))?;
    let id = id
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("Invalid peak id '{}': {}", id, e))?;
    let metal = metal.parse::<Metal>().map_err(|e| e.to_string())?;
    Ok((id, metal))
}

impl ProcessArgs {
    fn apply(&self, config: &mut AnalysisConfig) {
        let process = &mut config.process;
        if let Some(c_b) = self.c_b {
            process.base_concentration = c_b;
        }
        if let Some(rate) = self.pump_rate {
            process.pump_rate = rate;
        }
        if let Some(v0) = self.v0 {
            process.initial_volume = v0;
        }
        if let Some(unit) = self.time_unit {
            process.time_unit = unit;
        }
        if let Some(start) = self.start_index {
            process.start_index = start;
        }
        if self.baseline_end.is_some() {
            process.baseline_end = self.baseline_end;
        }
        if self.c_a.is_some() {
            process.fixed_background_acid = self.c_a;
        }
        if self.ph_floor.is_some() {
            process.baseline_ph_floor = self.ph_floor;
        }
    }
}

impl PeakArgs {
    fn apply(&self, config: &mut AnalysisConfig) {
        let peaks = &mut config.peaks;
        if self.no_cutoff {
            peaks.ph_cutoff = None;
        } else if self.cutoff.is_some() {
            peaks.ph_cutoff = self.cutoff;
        }
        if let Some(window) = self.window {
            peaks.window_length = window;
        }
        if let Some(order) = self.polyorder {
            peaks.polyorder = order;
        }
        if self.prominence.is_some() {
            peaks.prominence = self.prominence;
        }
    }
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            input,
            config,
            output_dir,
            json,
            assignments,
            process,
            peaks,
        } => {
            let mut settings = config::load(config.as_deref())?;
            process.apply(&mut settings);
            peaks.apply(&mut settings);
            analyze::run(input, &settings, output_dir, json, &assignments)
        }
        Commands::Peaks {
            input,
            config,
            output,
            json,
            peaks,
        } => {
            let mut settings = config::load(config.as_deref())?;
            peaks.apply(&mut settings);
            self::peaks::run(input, &settings, output, json)
        }
        Commands::ModelCurve {
            c_a,
            config,
            c_b,
            target_ph,
            points,
            output,
        } => {
            let mut settings = config::load(config.as_deref())?;
            if let Some(c_b) = c_b {
                settings.process.base_concentration = c_b;
            }
            if let Some(target) = target_ph {
                settings.model.target_ph = target;
            }
            if let Some(points) = points {
                settings.model.num_points = points;
            }
            model_curve::run(c_a, &settings, output)
        }
    }
}
