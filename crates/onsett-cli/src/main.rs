// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use clap::{ArgAction, Parser};
use log::info;
use onsett_cli::prompt::{confirm, display_name, select_file};
use onsett_cli::{
    CliError, ErrorEnvelope, FileOutcome, Overrides, RunConfig, init_logging, run_batch, run_file,
};
use onsett_core::Penalty;
use onsett_io::{OutputOptions, StorageError, discover_inputs, render_event_table};
use onsett_pipeline::CostConfig;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

/// Extract onset temperatures from pressure/temperature sensor logs.
#[derive(Parser, Debug)]
#[command(name = "onsett")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pressure sensor number, 1-2 [default: 1]
    #[arg(short = 'p', long, value_name = "N")]
    pressure_sensor: Option<usize>,

    /// Temperature sensor number, 1-4 [default: 1]
    #[arg(short = 't', long, value_name = "N")]
    temperature_sensor: Option<usize>,

    /// Directory searched for input files
    #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Extension of input files
    #[arg(long, default_value = "csv")]
    extension: String,

    /// Half-width of the onset search window in samples [default: 50]
    #[arg(short = 'r', long = "range", value_name = "SAMPLES")]
    window: Option<usize>,

    /// Lower bound of the pressure band in bar [default: 20]
    #[arg(long, value_name = "BAR")]
    pmin: Option<f64>,

    /// Upper bound of the pressure band in bar [default: 34]
    #[arg(long, value_name = "BAR")]
    pmax: Option<f64>,

    /// Change-point penalty: a positive number, bic or aic [default: 1400]
    #[arg(long, value_name = "VALUE|bic|aic")]
    penalty: Option<Penalty>,

    /// Segment cost: normal or l2 [default: normal]
    #[arg(long)]
    cost: Option<CostConfig>,

    /// Minimum samples between change points [default: 2]
    #[arg(long, value_name = "N")]
    min_segment_len: Option<usize>,

    /// Candidate change-point grid step [default: 5]
    #[arg(long, value_name = "N")]
    jump: Option<usize>,

    /// Header records before the first data row [default: 3]
    #[arg(long, value_name = "N")]
    header_rows: Option<usize>,

    /// Divisor turning raw temperature readings into degrees Celsius [default: 10]
    #[arg(long, value_name = "DIVISOR")]
    temperature_scale: Option<f64>,

    /// 0-based column of elapsed seconds
    #[arg(long, value_name = "COL")]
    time_column: Option<usize>,

    /// 0-based pressure column, overrides --pressure-sensor
    #[arg(long, value_name = "COL")]
    pressure_column: Option<usize>,

    /// 0-based temperature column, overrides --temperature-sensor
    #[arg(long, value_name = "COL")]
    temperature_column: Option<usize>,

    /// Process this file without interactive selection
    #[arg(short = 'i', long, value_name = "FILE", conflicts_with = "all")]
    input: Option<PathBuf>,

    /// Process every matching file in the directory
    #[arg(long)]
    all: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,

    /// Directory receiving the result archives
    #[arg(short = 'o', long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// JSON run configuration; explicit flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Do not render plots
    #[arg(long)]
    no_plots: bool,

    /// Keep the staging directory next to the archive
    #[arg(long)]
    keep_files: bool,

    /// Print the run summary as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            pressure_sensor: self.pressure_sensor,
            temperature_sensor: self.temperature_sensor,
            time_column: self.time_column,
            pressure_column: self.pressure_column,
            temperature_column: self.temperature_column,
            header_rows: self.header_rows,
            temperature_scale: self.temperature_scale,
            min_pressure_bar: self.pmin,
            max_pressure_bar: self.pmax,
            window: self.window,
            penalty: self.penalty,
            cost: self.cost,
            min_segment_len: self.min_segment_len,
            jump: self.jump,
        }
    }

    fn output_options(&self) -> OutputOptions {
        OutputOptions {
            output_dir: self.output_dir.clone(),
            plots: !self.no_plots,
            keep_files: self.keep_files,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => fail(&err, None),
    };
    if let Err(err) = run(&cli, &config) {
        fail(&err, Some(&config));
    }
}

fn fail(err: &CliError, parameters: Option<&RunConfig>) -> ! {
    emit_structured_error(err, parameters);
    process::exit(1);
}

fn resolve_config(cli: &Cli) -> Result<RunConfig, CliError> {
    let base = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    Ok(cli.overrides().apply(base)?)
}

fn run(cli: &Cli, config: &RunConfig) -> Result<(), CliError> {
    let options = cli.output_options();
    fs::create_dir_all(&options.output_dir).map_err(|err| {
        CliError::io(
            format!("failed to create {}", options.output_dir.display()),
            err,
        )
    })?;
    log_parameters(config);

    if cli.all {
        let files = discover_inputs(&cli.dir, &cli.extension)?;
        return process_all(&files, config, &options, cli.json);
    }

    let input = match &cli.input {
        Some(path) => path.clone(),
        None => match choose_input(cli)? {
            Some(path) => path,
            None => {
                info!("no file selected, stopping");
                return Ok(());
            }
        },
    };

    let outcome = run_file(&input, config, &options)?;
    if cli.json {
        print_json(&outcome.summary)?;
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

fn log_parameters(config: &RunConfig) {
    let schema = &config.schema;
    let pipeline = &config.pipeline;
    info!(
        "columns: time={}, pressure={}, temperature={} (header rows {}, temperature / {})",
        schema.time_column,
        schema.pressure_column,
        schema.temperature_column,
        schema.header_rows,
        schema.temperature_scale
    );
    info!(
        "pressure band [{}, {}] bar, onset window {} samples, cost {}, penalty {}",
        pipeline.band.min_bar,
        pipeline.band.max_bar,
        pipeline.window.half_width,
        pipeline.cost,
        pipeline.penalty
    );
}

/// Interactive selection and confirmation. Prompts go to stderr so stdout
/// carries only results.
fn choose_input(cli: &Cli) -> Result<Option<PathBuf>, CliError> {
    let files = discover_inputs(&cli.dir, &cli.extension)?;
    let prompt_err = |err: io::Error| CliError::io("interactive selection failed", err);

    let mut input = io::stdin().lock();
    let mut output = io::stderr().lock();
    let Some(path) = select_file(&mut input, &mut output, &files).map_err(prompt_err)? else {
        return Ok(None);
    };
    if cli.yes {
        return Ok(Some(path));
    }

    let question = format!("Use {}?", display_name(&path));
    if confirm(&mut input, &mut output, &question).map_err(prompt_err)? {
        Ok(Some(path))
    } else {
        Ok(None)
    }
}

fn process_all(
    files: &[PathBuf],
    config: &RunConfig,
    options: &OutputOptions,
    json: bool,
) -> Result<(), CliError> {
    let report = run_batch(files, config, options);
    for err in &report.failures {
        emit_structured_error(err, Some(config));
    }
    if json {
        let summaries: Vec<_> = report.outcomes.iter().map(|outcome| &outcome.summary).collect();
        print_json(&summaries)?;
    } else {
        report.outcomes.iter().for_each(print_outcome);
    }
    report.status()
}

fn print_outcome(outcome: &FileOutcome) {
    println!("{}", outcome.summary.input);
    println!("{}", render_event_table(&outcome.report.events));
    println!("results stored in {}", outcome.output.archive.display());
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(StorageError::from)?;
    println!("{json}");
    Ok(())
}

fn emit_structured_error(err: &CliError, parameters: Option<&RunConfig>) {
    eprintln!("{}", ErrorEnvelope::new(err, parameters).to_json());
}
