//! Command-line entry point: load closes, estimate drift/volatility, simulate, report.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use gbmsim::calibration::{GbmEstimate, estimate_gbm_parameters_annualized};
use gbmsim::core::{RetentionPolicy, SimulationConfig, SimulationError, SimulationParameters};
use gbmsim::market::{CsvPriceProvider, MarketDataProvider};
use gbmsim::math::RngKind;
use gbmsim::mc::MonteCarloEngine;
use gbmsim::report::{AnalyticReference, render_summary, save_sample_paths_csv, save_terminal_csv};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_SAMPLE_PATHS: usize = 10;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RngArg {
    Xoshiro,
    Pcg64,
    Std,
}

impl From<RngArg> for RngKind {
    fn from(arg: RngArg) -> Self {
        match arg {
            RngArg::Xoshiro => RngKind::Xoshiro256PlusPlus,
            RngArg::Pcg64 => RngKind::Pcg64,
            RngArg::Std => RngKind::StdRng,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "gbm_forecast", about = "GBM stock price simulator", version)]
struct Args {
    /// Ticker symbol (e.g. AAPL); closes are read from `<data-dir>/<SYMBOL>.csv`.
    symbol: String,

    /// Directory holding per-symbol CSV files.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// First date of the estimation window (YYYY-MM-DD).
    #[arg(long, default_value = "2020-01-01")]
    start: NaiveDate,

    /// End of the estimation window, exclusive (YYYY-MM-DD).
    #[arg(long, default_value = "2023-01-01")]
    end: NaiveDate,

    /// JSON run configuration; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of simulated paths.
    #[arg(long)]
    simulations: Option<usize>,

    /// Trading days to simulate.
    #[arg(long)]
    days: Option<usize>,

    /// Run seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Upper bound on worker threads.
    #[arg(long)]
    workers: Option<usize>,

    #[arg(long, value_enum)]
    rng: Option<RngArg>,

    /// Keep every full path instead of terminal values plus samples.
    #[arg(long)]
    full_paths: bool,

    /// Number of full sample paths to keep for export.
    #[arg(long)]
    sample_paths: Option<usize>,

    /// Override the estimated initial price.
    #[arg(long)]
    s0: Option<f64>,

    /// Override the estimated annualized drift.
    #[arg(long)]
    mu: Option<f64>,

    /// Override the estimated annualized volatility.
    #[arg(long)]
    sigma: Option<f64>,

    /// Write terminal prices to `<SYMBOL>_simulation.csv`.
    #[arg(long)]
    save_csv: bool,

    /// Write sample paths to `<SYMBOL>_sample_paths.csv`.
    #[arg(long)]
    save_paths: bool,

    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Debug-level logging (ignored when RUST_LOG is set).
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Result<SimulationConfig, SimulationError> {
        let mut cfg = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(trials) = self.simulations {
            cfg.trials = trials;
        }
        if let Some(days) = self.days {
            cfg.horizon_days = days;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if self.workers.is_some() {
            cfg.max_workers = self.workers;
        }
        if let Some(rng) = self.rng {
            cfg.rng_kind = rng.into();
        }
        if self.full_paths {
            cfg.retention = RetentionPolicy::Full;
        } else if let Some(sample_paths) = self.sample_paths {
            cfg.retention = RetentionPolicy::TerminalOnly { sample_paths };
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Annualizes with the same trading-day count that sets the simulation step.
    fn estimate(&self, periods_per_year: f64) -> Result<GbmEstimate, SimulationError> {
        if let (Some(s0), Some(mu), Some(sigma)) = (self.s0, self.mu, self.sigma) {
            return Ok(GbmEstimate {
                mu,
                sigma,
                s0,
                observations: 0,
            });
        }

        println!("[+] Fetching data for {}...", self.symbol);
        let provider = CsvPriceProvider::new(&self.data_dir);
        let series = provider.fetch_closes(&self.symbol, self.start, self.end)?;
        let mut est = estimate_gbm_parameters_annualized(&series, periods_per_year)?;
        info!(
            symbol = %self.symbol,
            closes = series.len(),
            from = %series.first_date(),
            to = %series.last_date(),
            mu = est.mu,
            sigma = est.sigma,
            "estimated GBM parameters"
        );

        if let Some(s0) = self.s0 {
            est.s0 = s0;
        }
        if let Some(mu) = self.mu {
            est.mu = mu;
        }
        if let Some(sigma) = self.sigma {
            est.sigma = sigma;
        }
        Ok(est)
    }
}

fn run(args: &Args) -> Result<(), SimulationError> {
    let cfg = args.config()?;
    let est = args.estimate(cfg.trading_days_per_year)?;
    let params = SimulationParameters::new(est.s0, est.mu, est.sigma, cfg.horizon(), cfg.dt())?;

    println!("[+] Running {} simulations...", cfg.trials);
    let batch = MonteCarloEngine::from_config(&cfg).run(&params, cfg.trials)?;
    let summary = batch.summary()?;
    let analytic = AnalyticReference::from_parameters(&params)?;

    println!();
    print!(
        "{}",
        render_summary(&args.symbol, params.s0, &summary, Some(&analytic))
    );
    println!("  Seed: {}", batch.seed());

    if args.save_csv {
        let path = args.output_dir.join(format!("{}_simulation.csv", args.symbol));
        save_terminal_csv(&path, &batch)?;
        println!("[+] Saved simulation results to {}", path.display());
    }
    if args.save_paths {
        let path = args.output_dir.join(format!("{}_sample_paths.csv", args.symbol));
        let samples = batch.sample_paths(args.sample_paths.unwrap_or(DEFAULT_SAMPLE_PATHS));
        save_sample_paths_csv(&path, samples)?;
        println!("[+] Saved {} sample paths to {}", samples.len(), path.display());
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "simulation run failed");
            eprintln!("[-] Error: {err}");
            ExitCode::FAILURE
        }
    }
}
