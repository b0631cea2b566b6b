//! File-backed market data: one `<SYMBOL>.csv` per ticker.
//!
//! The header must name a date column (`date`) and a price column (`close`, or
//! `adj close`/`adj_close` when no plain close is present); matching is
//! case-insensitive and other columns are ignored. Rows whose close is empty or
//! `null` are skipped, as are rows outside the requested range.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::core::{Result, SimulationError};
use crate::market::{MarketDataProvider, PriceSeries};

#[derive(Debug, Clone)]
pub struct CsvPriceProvider {
    data_dir: PathBuf,
}

impl CsvPriceProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{symbol}.csv"))
    }

    fn read_rows(&self, symbol: &str, path: &Path) -> Result<Vec<(NaiveDate, f64)>> {
        let unavailable = |reason: String| SimulationError::DataUnavailable {
            symbol: symbol.to_string(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.to_ascii_lowercase())
            .collect();
        let find = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));
        let date_col = find(&["date"]).ok_or_else(|| unavailable("no `date` column".into()))?;
        let close_col = find(&["close"])
            .or_else(|| find(&["adj close", "adj_close"]))
            .ok_or_else(|| unavailable("no `close` column".into()))?;

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let raw_close = record.get(close_col).unwrap_or("");
            if raw_close.is_empty() || raw_close.eq_ignore_ascii_case("null") {
                continue;
            }
            let raw_date = record.get(date_col).unwrap_or("");
            let date = parse_date(raw_date)
                .ok_or_else(|| unavailable(format!("row {}: invalid date `{raw_date}`", line + 1)))?;
            let close = raw_close.parse::<f64>().map_err(|_| {
                unavailable(format!("row {}: invalid close `{raw_close}`", line + 1))
            })?;
            rows.push((date, close));
        }
        Ok(rows)
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

impl MarketDataProvider for CsvPriceProvider {
    fn fetch_closes(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let unavailable = |reason: String| SimulationError::DataUnavailable {
            symbol: symbol.to_string(),
            reason,
        };
        if start >= end {
            return Err(unavailable(format!("empty date range {start}..{end}")));
        }

        let path = self.path_for(symbol);
        if !path.is_file() {
            return Err(unavailable(format!("{} not found", path.display())));
        }

        let rows: Vec<_> = self
            .read_rows(symbol, &path)?
            .into_iter()
            .filter(|(date, _)| *date >= start && *date < end)
            .collect();
        if rows.is_empty() {
            return Err(unavailable(format!("no observations in {start}..{end}")));
        }

        debug!(symbol, rows = rows.len(), path = %path.display(), "loaded closes");
        PriceSeries::new(symbol, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn provider_with(symbol: &str, contents: &str) -> (tempfile::TempDir, CsvPriceProvider) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(format!("{symbol}.csv")), contents).unwrap();
        let provider = CsvPriceProvider::new(dir.path());
        (dir, provider)
    }

    #[test]
    fn reads_closes_within_end_exclusive_range() {
        let (_dir, provider) = provider_with(
            "ACME",
            "Date,Open,High,Low,Close,Volume\n\
             2020-01-02,1,1,1,100.0,10\n\
             2020-01-03,1,1,1,101.5,10\n\
             2020-01-06,1,1,1,null,10\n\
             2020-01-07,1,1,1,99.25,10\n\
             2020-01-08,1,1,1,98.0,10\n",
        );
        let series = provider
            .fetch_closes("ACME", d(2020, 1, 1), d(2020, 1, 8))
            .unwrap();
        assert_eq!(series.closes(), vec![100.0, 101.5, 99.25]);
        assert_eq!(series.last_date(), d(2020, 1, 7));
    }

    #[test]
    fn falls_back_to_adjusted_close_and_timestamps() {
        let (_dir, provider) = provider_with(
            "XYZ",
            "date,adj_close\n2021-03-01 00:00:00,10\n2021-03-02 00:00:00,11\n",
        );
        let series = provider
            .fetch_closes("XYZ", d(2021, 1, 1), d(2022, 1, 1))
            .unwrap();
        assert_eq!(series.closes(), vec![10.0, 11.0]);
    }

    #[test]
    fn unknown_symbol_and_empty_range_are_unavailable() {
        let (_dir, provider) = provider_with("ACME", "date,close\n2020-01-02,100\n");
        assert!(matches!(
            provider.fetch_closes("NOPE", d(2020, 1, 1), d(2021, 1, 1)),
            Err(SimulationError::DataUnavailable { .. })
        ));
        assert!(matches!(
            provider.fetch_closes("ACME", d(2022, 1, 1), d(2023, 1, 1)),
            Err(SimulationError::DataUnavailable { .. })
        ));
        assert!(matches!(
            provider.fetch_closes("ACME", d(2023, 1, 1), d(2022, 1, 1)),
            Err(SimulationError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn malformed_rows_name_the_row() {
        let (_dir, provider) = provider_with("BAD", "date,close\n2020-01-02,100\n2020-01-03,abc\n");
        let err = provider
            .fetch_closes("BAD", d(2020, 1, 1), d(2021, 1, 1))
            .unwrap_err();
        assert!(err.to_string().contains("row 2"), "{err}");
    }

    #[test]
    fn missing_close_column_is_reported() {
        let (_dir, provider) = provider_with("NOCLOSE", "date,open\n2020-01-02,100\n");
        let err = provider
            .fetch_closes("NOCLOSE", d(2020, 1, 1), d(2021, 1, 1))
            .unwrap_err();
        assert!(err.to_string().contains("close"), "{err}");
    }
}
