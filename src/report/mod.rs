//! Presentation helpers: CSV export and console summaries.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use serde::Serialize;

use crate::core::{Result, SimulationParameters};
use crate::mc::{PricePath, SimulationBatch};
use crate::models::Gbm;
use crate::stats::TerminalDistributionSummary;

#[derive(Serialize)]
struct TerminalRow {
    terminal_price: f64,
}

/// Writes one row per trial with its terminal price, in task order.
pub fn write_terminal_csv<W: io::Write>(writer: W, batch: &SimulationBatch) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    for &terminal_price in batch.terminal_prices() {
        out.serialize(TerminalRow { terminal_price })?;
    }
    out.flush()?;
    Ok(())
}

pub fn save_terminal_csv(path: impl AsRef<Path>, batch: &SimulationBatch) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    write_terminal_csv(file, batch)
}

/// Writes sample trajectories column-wise: `step,path_<index>,...`, one row per step.
///
/// Paths are expected to share a length, as every path in a batch does.
pub fn write_sample_paths_csv<W: io::Write>(writer: W, paths: &[PricePath]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    let mut header = vec!["step".to_string()];
    header.extend(paths.iter().map(|p| format!("path_{}", p.index)));
    out.write_record(&header)?;

    let steps = paths.iter().map(PricePath::len).max().unwrap_or(0);
    for step in 0..steps {
        let mut record = Vec::with_capacity(paths.len() + 1);
        record.push(step.to_string());
        record.extend(
            paths
                .iter()
                .map(|p| p.values.get(step).map(f64::to_string).unwrap_or_default()),
        );
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

pub fn save_sample_paths_csv(path: impl AsRef<Path>, paths: &[PricePath]) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    write_sample_paths_csv(file, paths)
}

/// Closed-form GBM values over the horizon a path actually spans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalyticReference {
    pub horizon: f64,
    pub mean: f64,
    pub p5: f64,
    pub p95: f64,
}

impl AnalyticReference {
    pub fn from_parameters(params: &SimulationParameters) -> Result<Self> {
        let model = Gbm::new(params.mu, params.sigma)?;
        let horizon = params.effective_horizon();
        Ok(Self {
            horizon,
            mean: model.expected_terminal(params.s0, horizon),
            p5: model.terminal_quantile(params.s0, horizon, 0.05)?,
            p95: model.terminal_quantile(params.s0, horizon, 0.95)?,
        })
    }
}

/// Console block for one run.
pub fn render_summary(
    symbol: &str,
    s0: f64,
    summary: &TerminalDistributionSummary,
    analytic: Option<&AnalyticReference>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Simulation Results for {symbol}:");
    let _ = writeln!(out, "  Start Price: {s0:.2}");
    let _ = writeln!(out, "  Mean Final Price: {:.2}", summary.mean);
    let _ = writeln!(out, "  5th Percentile: {:.2}", summary.p5);
    let _ = writeln!(out, "  95th Percentile: {:.2}", summary.p95);
    let _ = writeln!(out, "  Std Dev: {:.2}", summary.std_dev);
    let _ = writeln!(out, "  Trials: {}", summary.count);
    if let Some(a) = analytic {
        let _ = writeln!(
            out,
            "  Analytic (T={:.4}y): mean {:.2}, p5 {:.2}, p95 {:.2}",
            a.horizon, a.mean, a.p5, a.p95
        );
    }
    out
}
