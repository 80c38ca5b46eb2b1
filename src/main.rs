//! fopdtsim command line driver
//!
//! Identifies a FOPDT model from a step-test CSV, tunes Ziegler-Nichols and CHR controllers
//! for it and reports their closed-loop overshoot.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use fopdtsim::analysis::{analyze, design_controller, Analysis, ControllerDesign};
use fopdtsim::config::AnalysisConfig;
use fopdtsim::dataset::{load_record, save_responses};
use fopdtsim::tuning::TuningRule;

/// Controller tuning rule requested on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum RuleArg {
    /// Ziegler-Nichols open-loop
    Zn,
    /// CHR with overshoot factor
    Chr,
    /// Gains from --kp, --ti, --td
    Manual,
}

#[derive(Parser, Debug)]
#[command(name = "fopdtsim")]
#[command(about = "FOPDT identification from step tests and PID tuning")]
#[command(version)]
struct Args {
    /// Step-test CSV with time, output and optional input columns
    data: PathBuf,

    /// Step amplitude (defaults to the mean of the input column)
    #[arg(short, long)]
    step_amplitude: Option<f64>,

    /// JSON analysis configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Additionally evaluate a controller with this rule
    #[arg(short = 'm', long, value_enum)]
    method: Option<RuleArg>,

    /// Proportional gain for --method manual
    #[arg(long)]
    kp: Option<f64>,

    /// Integral time for --method manual
    #[arg(long)]
    ti: Option<f64>,

    /// Derivative time for --method manual
    #[arg(long)]
    td: Option<f64>,

    /// Write measured and model responses to this CSV
    #[arg(short = 'o', long)]
    export: Option<PathBuf>,

    /// Write closed-loop responses to this CSV
    #[arg(long)]
    export_closed_loop: Option<PathBuf>,

    /// Print the analysis as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn requested_rule(args: &Args, config: &AnalysisConfig) -> Result<Option<TuningRule>> {
    let rule = match args.method {
        None => return Ok(None),
        Some(RuleArg::Zn) => TuningRule::ZieglerNichols,
        Some(RuleArg::Chr) => TuningRule::Chr {
            overshoot_factor: config.chr_overshoot_factor,
        },
        Some(RuleArg::Manual) => match (args.kp, args.ti, args.td) {
            (Some(kp), Some(ti), Some(td)) => TuningRule::Manual { kp, ti, td },
            _ => return Err(anyhow!("--method manual requires --kp, --ti and --td")),
        },
    };
    Ok(Some(rule))
}

fn print_report(analysis: &Analysis, extra: Option<&ControllerDesign>) {
    println!("Identification");
    for candidate in &analysis.candidates {
        println!("  {candidate}");
    }
    for failure in &analysis.failures {
        println!("  failed: {failure}");
    }
    println!("  {}", analysis.reference);
    println!(
        "Selected: {} ({})",
        analysis.selected.method, analysis.selected.params
    );

    println!("Controllers");
    for design in analysis.controllers.iter().chain(extra) {
        println!(
            "  {:<16} {}  overshoot {:.2} %",
            design.rule.name(),
            design.gains,
            design.response.overshoot_percent
        );
    }
    for failure in &analysis.controller_failures {
        println!("  {:<16} not applicable: {}", failure.rule.name(), failure.error);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match &args.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    let rule = requested_rule(&args, &config)?;

    let record = load_record(&args.data, args.step_amplitude)
        .with_context(|| format!("failed to load dataset {}", args.data.display()))?;

    let analysis = analyze(&record, &config).context("analysis failed")?;

    let time_grid = config.evaluation.times(&record)?;
    let extra = rule
        .map(|rule| {
            design_controller(
                &analysis.selected.params,
                &rule,
                &time_grid,
                config.evaluation_pade_order,
                &config.simulation,
            )
        })
        .transpose()
        .context("controller evaluation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_report(&analysis, extra.as_ref());
    }

    if let Some(path) = &args.export {
        let responses = &analysis.responses;
        save_responses(
            path,
            &responses.time,
            &[
                ("measured", responses.measured.as_slice()),
                (analysis.selected.method.as_str(), responses.selected.as_slice()),
                ("Reference", responses.reference.as_slice()),
            ],
        )
        .with_context(|| format!("failed to write {}", path.display()))?;
        info!("model responses written to {}", path.display());
    }

    if let Some(path) = &args.export_closed_loop {
        let designs: Vec<&ControllerDesign> =
            analysis.controllers.iter().chain(extra.as_ref()).collect();
        let columns: Vec<(&str, &[f64])> = designs
            .iter()
            .map(|d| (d.rule.name(), d.response.output.as_slice()))
            .collect();
        save_responses(path, &time_grid, &columns)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("closed-loop responses written to {}", path.display());
    }

    Ok(())
}
