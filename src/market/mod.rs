//! Historical market data consumed by the parameter estimator.

pub mod csv_provider;

pub use csv_provider::CsvPriceProvider;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{Result, SimulationError};

/// Chronological closing prices for one symbol.
///
/// Deserialization goes through [`PriceSeries::new`], so a decoded series is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceSeries")]
pub struct PriceSeries {
    pub symbol: String,
    observations: Vec<(NaiveDate, f64)>,
}

#[derive(Deserialize)]
struct RawPriceSeries {
    symbol: String,
    observations: Vec<(NaiveDate, f64)>,
}

impl TryFrom<RawPriceSeries> for PriceSeries {
    type Error = SimulationError;

    fn try_from(raw: RawPriceSeries) -> Result<Self> {
        Self::new(raw.symbol, raw.observations)
    }
}

impl PriceSeries {
    /// Sorts by date and rejects empty series, duplicate dates, and non-positive closes.
    pub fn new(symbol: impl Into<String>, mut observations: Vec<(NaiveDate, f64)>) -> Result<Self> {
        let symbol = symbol.into();
        if observations.is_empty() {
            return Err(SimulationError::DataUnavailable {
                symbol,
                reason: "series is empty".to_string(),
            });
        }
        observations.sort_by_key(|(date, _)| *date);
        if let Some(w) = observations.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(SimulationError::DataUnavailable {
                symbol,
                reason: format!("duplicate observation for {}", w[0].0),
            });
        }
        if let Some((date, close)) = observations
            .iter()
            .find(|(_, close)| !close.is_finite() || *close <= 0.0)
        {
            return Err(SimulationError::DataUnavailable {
                symbol,
                reason: format!("close {close} on {date} is not a positive price"),
            });
        }
        Ok(Self {
            symbol,
            observations,
        })
    }

    pub fn observations(&self) -> &[(NaiveDate, f64)] {
        &self.observations
    }

    pub fn closes(&self) -> Vec<f64> {
        self.observations.iter().map(|(_, close)| *close).collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Most recent close; the simulation's `S0`.
    pub fn last_close(&self) -> f64 {
        self.observations[self.observations.len() - 1].1
    }

    pub fn first_date(&self) -> NaiveDate {
        self.observations[0].0
    }

    pub fn last_date(&self) -> NaiveDate {
        self.observations[self.observations.len() - 1].0
    }
}

/// Source of historical closes.
pub trait MarketDataProvider {
    /// Closes for `symbol` with `start <= date < end`.
    ///
    /// Fails with [`SimulationError::DataUnavailable`] for unknown symbols or an empty range.
    fn fetch_closes(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries>;
}
