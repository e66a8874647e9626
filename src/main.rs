//! opd-planner - command-line front end for the outpatient planner.
//!
//! Subcommands:
//! - `simulate`: run one day and print the result as JSON
//! - `train`: fit the action selector on recorded episodes
//! - `validate`: check a seed file without planning

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use opd_planner::config::PlannerConfig;
use opd_planner::error::PlannerError;
use opd_planner::learning::{Episode, QLearner};
use opd_planner::pipeline::{ErrorResponse, Simulation};
use opd_planner::registry::ResourcePool;
use opd_planner::validation::validate_input;

#[derive(Debug, Parser)]
#[command(name = "opd-planner", version, about = "Outpatient department planner")]
struct Cli {
    /// Also write logs to a daily rolling file in this directory.
    #[arg(long, global = true, env = "OPD_PLANNER_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run allocation, scheduling, workload distribution and prediction.
    Simulate(SimulateArgs),
    /// Train the action selector from a JSON episode file.
    Train(TrainArgs),
    /// Validate a JSON seed file.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct SimulateArgs {
    /// TOML configuration file.
    #[arg(long, env = "OPD_PLANNER_CONFIG")]
    config: Option<PathBuf>,
    /// JSON seed file. A sample day is generated when absent.
    #[arg(long)]
    data: Option<PathBuf>,
    /// Persisted Q-table, overriding `model_path` from the configuration.
    #[arg(long)]
    model: Option<PathBuf>,
    /// Seed for generated tasks.
    #[arg(long)]
    seed: Option<u64>,
    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Args)]
struct TrainArgs {
    /// JSON array of episodes.
    #[arg(long)]
    episodes: PathBuf,
    /// Where to write the trained Q-table.
    #[arg(long)]
    output: PathBuf,
    /// TOML configuration file.
    #[arg(long, env = "OPD_PLANNER_CONFIG")]
    config: Option<PathBuf>,
    /// Seed for exploration.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// JSON seed file. The generated sample day is checked when absent.
    #[arg(long)]
    data: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_dir.as_deref());

    let result = match cli.command {
        Command::Simulate(args) => simulate(args),
        Command::Train(args) => train(args),
        Command::Validate(args) => validate(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("command failed: {e:#}");
            // Clients only ever see the generic message.
            match serde_json::to_string(&ErrorResponse::internal()) {
                Ok(body) => println!("{body}"),
                Err(_) => println!(r#"{{"error":"An internal error occurred"}}"#),
            }
            ExitCode::FAILURE
        }
    }
}

/// Installs stderr logging and, with `log_dir`, a daily rolling file.
///
/// The returned guard flushes the file writer on drop.
fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "opd-planner.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    match path {
        Some(path) => PlannerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(PlannerConfig::default()),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let body = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{body}");
    Ok(())
}

fn simulate(args: SimulateArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if args.model.is_some() {
        config.model_path = args.model;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut simulation = Simulation::from_config(&config)?;
    let date = Local::now().date_naive();

    let mut pool = match &args.data {
        Some(path) => ResourcePool::from_json_file(path)
            .with_context(|| format!("loading seed data {}", path.display()))?,
        None => ResourcePool::sample(&config.simulation, simulation.workday(), date),
    };
    validate_input(&pool).map_err(PlannerError::Validation)?;

    let report = simulation.run(&mut pool, date);
    print_json(&report.to_response(&pool), args.pretty)
}

fn train(args: TrainArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let contents = fs::read_to_string(&args.episodes)
        .with_context(|| format!("reading episodes {}", args.episodes.display()))?;
    let episodes: Vec<Episode> = serde_json::from_str(&contents)?;

    let mut learner = QLearner::new(config.learning)?;
    if let Some(seed) = args.seed.or(config.seed) {
        learner = learner.with_seed(seed);
    }

    let report = learner.train(&episodes);
    learner
        .save(&args.output)
        .with_context(|| format!("writing q-table {}", args.output.display()))?;
    info!(output = %args.output.display(), "q-table saved");

    print_json(&report, false)
}

fn validate(args: ValidateArgs) -> Result<()> {
    let pool = match &args.data {
        Some(path) => ResourcePool::from_json_file(path)
            .with_context(|| format!("loading seed data {}", path.display()))?,
        None => {
            let config = PlannerConfig::default();
            let workday = config.workday.to_workday()?;
            ResourcePool::sample(&config.simulation, &workday, Local::now().date_naive())
        }
    };

    if let Err(errors) = validate_input(&pool) {
        for problem in &errors {
            eprintln!("{:?}: {}", problem.kind, problem);
        }
        return Err(PlannerError::Validation(errors).into());
    }

    info!(
        staff = pool.staff.len(),
        patients = pool.patients.len(),
        equipment = pool.equipment.len(),
        tasks = pool.tasks.len(),
        "seed data is valid"
    );
    println!(r#"{{"valid":true}}"#);
    Ok(())
}
