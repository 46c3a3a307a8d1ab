//! Historical zone prices loaded from a compiled CSV file
//!
//! Expected columns: `datetime,zone,price` with datetimes formatted as
//! `YYYY-MM-DD HH:MM:SS` (a `T` separator is also accepted).

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{PriceFeed, PriceWindow};
use crate::error::{RoiError, RoiResult};

/// Days counted per month of lookback
pub const LOOKBACK_DAYS_PER_MONTH: i64 = 30;

/// A single price print for a load zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub datetime: NaiveDateTime,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    datetime: String,
    zone: String,
    price: f64,
}

fn parse_datetime(raw: &str) -> RoiResult<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| RoiError::Parse(format!("invalid datetime {:?}: {}", raw, e)))
}

/// Price observations grouped by load zone, oldest first
#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    zones: HashMap<String, Vec<PriceObservation>>,
    /// End of every lookback window; defaults to each zone's newest observation
    as_of: Option<NaiveDateTime>,
}

impl PriceHistory {
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> RoiResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let history = Self::from_reader(file)?;
        log::info!(
            "Loaded price history for {} zones from {}",
            history.zones.len(),
            path.as_ref().display()
        );
        Ok(history)
    }

    pub fn from_reader<R: Read>(reader: R) -> RoiResult<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut history = Self::default();

        for result in csv_reader.deserialize() {
            let row: CsvRow = result?;
            let datetime = parse_datetime(&row.datetime)?;
            history.push(row.zone, datetime, row.price);
        }

        history.sort();
        Ok(history)
    }

    /// Pin the end of all lookback windows to a fixed instant
    pub fn with_as_of(mut self, as_of: NaiveDateTime) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn push(&mut self, zone: impl Into<String>, datetime: NaiveDateTime, price: f64) {
        if !price.is_finite() {
            log::warn!("Skipping non-finite price at {}", datetime);
            return;
        }
        self.zones
            .entry(zone.into())
            .or_default()
            .push(PriceObservation { datetime, price });
    }

    fn sort(&mut self) {
        for observations in self.zones.values_mut() {
            observations.sort_by_key(|o| o.datetime);
        }
    }

    pub fn zones(&self) -> impl Iterator<Item = &str> {
        self.zones.keys().map(String::as_str)
    }

    pub fn observations(&self, zone: &str) -> &[PriceObservation] {
        self.zones.get(zone).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mean price of observations strictly after `start` and not after `end`
    fn mean_between(observations: &[PriceObservation], start: Option<NaiveDateTime>, end: NaiveDateTime) -> Option<f64> {
        let (sum, count) = observations
            .iter()
            .filter(|o| o.datetime <= end && start.map_or(true, |s| o.datetime > s))
            .fold((0.0, 0usize), |(sum, count), o| (sum + o.price, count + 1));

        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }
}

impl PriceFeed for PriceHistory {
    fn average_price(&self, _iso_rto: &str, load_zone: &str, window: PriceWindow) -> Option<f64> {
        let observations = self.zones.get(load_zone)?;
        let end = self.as_of.or_else(|| observations.last().map(|o| o.datetime))?;

        let start = match window {
            PriceWindow::All => None,
            PriceWindow::Lookback(horizon) => {
                let days = horizon.months() as i64 * LOOKBACK_DAYS_PER_MONTH;
                Some(end - Duration::days(days))
            }
        };

        Self::mean_between(observations, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horizon::Horizon;
    use approx::assert_abs_diff_eq;

    const PRICES: &str = "\
datetime,zone,price
2024-01-01 00:00:00,NP-15 LMP,10.0
2024-06-01 00:00:00,NP-15 LMP,20.0
2024-10-01 00:00:00,NP-15 LMP,30.0
2024-12-01 00:00:00,NP-15 LMP,40.0
2024-12-01T00:00:00,SP-15 LMP,55.5
";

    #[test]
    fn test_lookback_windows() {
        let history = PriceHistory::from_reader(PRICES.as_bytes()).unwrap();

        // 6m window ends 2024-12-01 and starts 180 days earlier (2024-06-04)
        let six = history.average_price("CAISO", "NP-15 LMP", PriceWindow::Lookback(Horizon::SixMonths));
        assert_abs_diff_eq!(six.unwrap(), 35.0, epsilon = 1e-12);

        // 12m window starts 2023-12-07, so everything counts
        let twelve = history.average_price("CAISO", "NP-15 LMP", PriceWindow::Lookback(Horizon::TwelveMonths));
        assert_abs_diff_eq!(twelve.unwrap(), 25.0, epsilon = 1e-12);

        let all = history.average_price("CAISO", "NP-15 LMP", PriceWindow::All);
        assert_abs_diff_eq!(all.unwrap(), 25.0, epsilon = 1e-12);
    }

    #[test]
    fn test_as_of_limits_window() {
        let as_of = NaiveDateTime::parse_from_str("2024-07-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let history = PriceHistory::from_reader(PRICES.as_bytes()).unwrap().with_as_of(as_of);

        let six = history.average_price("CAISO", "NP-15 LMP", PriceWindow::Lookback(Horizon::SixMonths));
        assert_abs_diff_eq!(six.unwrap(), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_zone_is_none() {
        let history = PriceHistory::from_reader(PRICES.as_bytes()).unwrap();
        assert!(history.average_price("CAISO", "ZP-26 LMP", PriceWindow::All).is_none());
        assert_eq!(history.observations("SP-15 LMP").len(), 1);
    }

    #[test]
    fn test_bad_datetime_is_error() {
        let data = "datetime,zone,price\nyesterday,NP-15 LMP,10.0\n";
        assert!(matches!(PriceHistory::from_reader(data.as_bytes()), Err(RoiError::Parse(_))));
    }

    #[test]
    fn test_load_sample_prices() {
        let history = PriceHistory::from_csv_path("data/market/caiso_zone_prices.csv")
            .expect("Failed to load sample prices");
        assert_eq!(history.zones().count(), 3);
        for horizon in Horizon::ALL {
            let price = history.average_price("CAISO", "NP-15 LMP", PriceWindow::Lookback(horizon));
            assert!(price.unwrap() > 0.0);
        }
    }
}
