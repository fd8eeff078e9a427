//! Martingale Planner — Entry Point
//!
//! Command-line presentation layer over the staking core. Owns all I/O:
//! reads plan files and flags, prints reports, writes exports.
//!
//! Wiring sequence:
//! 1. Parse CLI arguments
//! 2. Read the plan file (if any)
//! 3. Init tracing (stderr; JSON when requested)
//! 4. Merge flag overrides, validate, run the command (plan / simulate / odds)
//! 5. Print JSON or CSV to stdout, or write it to `--output`

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info, warn};

use martingale_planner::adapters::export;
use martingale_planner::adapters::rng::SeededSource;
use martingale_planner::config::{self, AppConfig, LoggingConfig, SimulationConfig};
use martingale_planner::domain::odds::{self, OddsType, OddsValue};
use martingale_planner::domain::plan::PlanConfig;
use martingale_planner::usecases::planner::{self, PlanReport};
use martingale_planner::usecases::risk_advisory::{RiskAdvisor, Warning};
use martingale_planner::usecases::session_simulator::{self, SimulationSummary};

#[derive(Parser)]
#[command(
    name = "martingale",
    version,
    about = "Martingale staking progression, risk statistics and session simulator"
)]
struct Cli {
    /// Emit JSON log lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the progression, its statistics and risk warnings
    Plan {
        #[command(flatten)]
        plan: PlanArgs,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Monte Carlo sessions over the plan's progression
    Simulate {
        #[command(flatten)]
        plan: PlanArgs,
        /// Number of sessions (1..=100000)
        #[arg(long)]
        trials: Option<usize>,
        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Trials between progress reports
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Include every trial in the output
        #[arg(long)]
        show_trials: bool,
    },
    /// Convert odds between conventions
    Odds {
        /// Raw odds, e.g. 2.5, +150, -200, 3/2, 40
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Convention of VALUE
        #[arg(long = "type", default_value = "decimal")]
        kind: OddsType,
    },
}

#[derive(Args)]
struct PlanArgs {
    /// TOML plan file; flags below override its [plan] values
    #[arg(long, short)]
    config: Option<PathBuf>,
    #[arg(long)]
    base_bet: Option<f64>,
    #[arg(long)]
    bankroll: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    odds: Option<String>,
    #[arg(long)]
    odds_type: Option<OddsType>,
    #[arg(long)]
    max_rounds: Option<u32>,
    #[arg(long)]
    multiplier: Option<f64>,
    #[arg(long)]
    target_profit: Option<f64>,
    #[arg(long)]
    table_limit: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    #[serde(flatten)]
    report: &'a PlanReport,
    warnings: &'a [Warning],
}

#[derive(Serialize)]
struct SimulationOutput<'a> {
    summary: &'a SimulationSummary,
    expected_win_rate: f64,
    cancelled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    trials: Option<&'a [session_simulator::SimulationResult]>,
}

#[derive(Serialize)]
struct OddsOutput {
    input: String,
    kind: OddsType,
    decimal: f64,
    implied_probability: f64,
    forms: BTreeMap<String, OddsValue>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── 1. Load plan file (if the command takes one) ────────
    // [plan] and [simulation] are validated after flags are merged
    let config_path = match &cli.command {
        Command::Plan { plan, .. } | Command::Simulate { plan, .. } => plan.config.clone(),
        Command::Odds { .. } => None,
    };
    let app_config = config_path
        .as_deref()
        .map(|path| config::loader::read_config(path))
        .transpose()?;

    // ── 2. Initialize logging ───────────────────────────────
    let logging = app_config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    init_tracing(&logging, cli.log_level.as_deref(), cli.json_logs);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = app_config.is_some(),
        "Starting martingale planner"
    );
    if let (Some(path), Some(c)) = (config_path.as_deref(), app_config.as_ref()) {
        config::loader::log_loaded(path, c);
    }

    // ── 3. Run command ──────────────────────────────────────
    match cli.command {
        Command::Plan {
            plan,
            format,
            output,
        } => run_plan(&plan, app_config.as_ref(), format, output.as_deref()),
        Command::Simulate {
            plan,
            trials,
            seed,
            chunk_size,
            show_trials,
        } => {
            let mut simulation = app_config
                .as_ref()
                .map(|c| c.simulation.clone())
                .unwrap_or_default();
            simulation.trials = trials.unwrap_or(simulation.trials);
            simulation.seed = seed.or(simulation.seed);
            simulation.chunk_size = chunk_size.unwrap_or(simulation.chunk_size);
            run_simulation(&plan, app_config.as_ref(), &simulation, show_trials)
        }
        Command::Odds { value, kind } => run_odds(value, kind),
    }
}

fn init_tracing(logging: &LoggingConfig, cli_level: Option<&str>, cli_json: bool) {
    let level = cli_level.unwrap_or(&logging.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if cli_json || logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Merge flags over the file's `[plan]` table.
fn resolve_plan(args: &PlanArgs, app_config: Option<&AppConfig>) -> Result<PlanConfig> {
    let mut plan = match app_config {
        Some(c) => c.plan.clone(),
        None => PlanConfig::new(
            args.base_bet.context("--base-bet is required without --config")?,
            args.bankroll.context("--bankroll is required without --config")?,
            args.odds.clone().context("--odds is required without --config")?,
            args.odds_type.unwrap_or(OddsType::Decimal),
        ),
    };

    if let Some(base_bet) = args.base_bet {
        plan.base_bet = base_bet;
    }
    if let Some(bankroll) = args.bankroll {
        plan.bankroll = bankroll;
    }
    if let Some(odds) = &args.odds {
        plan.odds = OddsValue::from(odds.as_str());
    }
    if let Some(odds_type) = args.odds_type {
        plan.odds_type = odds_type;
    }
    if let Some(max_rounds) = args.max_rounds {
        plan.max_rounds = max_rounds;
    }
    if let Some(multiplier) = args.multiplier {
        plan.bet_multiplier = multiplier;
    }
    if args.target_profit.is_some() {
        plan.target_profit = args.target_profit;
    }
    if args.table_limit.is_some() {
        plan.max_table_limit = args.table_limit;
    }

    Ok(plan)
}

fn run_plan(
    args: &PlanArgs,
    app_config: Option<&AppConfig>,
    format: Format,
    output: Option<&Path>,
) -> Result<()> {
    let plan = resolve_plan(args, app_config)?;
    let report = planner::plan(&plan).context("Plan rejected")?;

    let advisor = app_config.map_or_else(RiskAdvisor::default, |c| RiskAdvisor::new(&c.advisory));
    let warnings = advisor.evaluate(&plan, &report.statistics);

    if report.rounds.is_empty() {
        warn!(
            base_bet = plan.base_bet,
            bankroll = plan.bankroll,
            "No viable progression: the first bet cannot be placed"
        );
    }
    for w in &warnings {
        warn!(kind = %w.kind, "{}", w.message);
    }
    info!(
        rounds = report.rounds.len(),
        stop_reason = ?report.stop_reason,
        expected_value = report.statistics.expected_value,
        bust_pct = report.statistics.bust_probability,
        warnings = warnings.len(),
        "Plan evaluated"
    );

    let rendered = match format {
        Format::Json => export::to_json(&PlanOutput {
            report: &report,
            warnings: &warnings,
        })?,
        Format::Csv => export::to_csv(&report.rounds, &report.statistics),
    };

    emit(&rendered, output)
}

fn run_simulation(
    args: &PlanArgs,
    app_config: Option<&AppConfig>,
    simulation: &SimulationConfig,
    show_trials: bool,
) -> Result<()> {
    let plan = resolve_plan(args, app_config)?;
    let report = planner::plan(&plan).context("Plan rejected")?;

    let mut rng = match simulation.seed {
        Some(seed) => SeededSource::seeded(seed),
        None => SeededSource::from_entropy(),
    };

    let outcome = session_simulator::simulate_sessions_chunked(
        &plan,
        simulation.trials,
        simulation.chunk_size,
        &mut rng,
        |progress| {
            debug!(
                completed = progress.completed,
                total = progress.total,
                "Simulation progress"
            );
            ControlFlow::Continue(())
        },
    )
    .context("Simulation rejected")?;

    let rendered = export::to_json(&SimulationOutput {
        summary: &outcome.summary,
        expected_win_rate: report.statistics.win_probability_at_least_once,
        cancelled: outcome.cancelled,
        trials: show_trials.then_some(outcome.trials.as_slice()),
    })?;

    emit(&rendered, None)
}

fn run_odds(value: String, kind: OddsType) -> Result<()> {
    let raw = OddsValue::from(value.as_str());
    let decimal = odds::to_decimal(&raw, kind);

    let rendered = export::to_json(&OddsOutput {
        input: value,
        kind,
        decimal,
        implied_probability: odds::implied_probability(decimal),
        forms: OddsType::ALL
            .iter()
            .map(|&form| (form.to_string(), odds::from_decimal(decimal, form)))
            .collect(),
    })?;

    emit(&rendered, None)
}

fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = rendered.len(), "Report written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
