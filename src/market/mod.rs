//! Zone price feeds
//!
//! The engine only needs one scalar average price ($/MWh) per load zone and
//! horizon. Feeds implement [`PriceFeed`]; a zone without data yields `None`,
//! which marks that horizon's metrics as not computable.

mod history;

pub use history::{PriceHistory, PriceObservation, LOOKBACK_DAYS_PER_MONTH};

use std::collections::HashMap;
use std::sync::Arc;

use crate::horizon::{Horizon, HorizonSet};

/// Observation window for an average price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceWindow {
    /// Every observation available for the zone
    All,
    /// Observations inside the horizon's lookback window
    Lookback(Horizon),
}

/// Source of average settlement prices per load zone
pub trait PriceFeed: Send + Sync {
    fn average_price(&self, iso_rto: &str, load_zone: &str, window: PriceWindow) -> Option<f64>;

    /// Average price for every horizon
    fn horizon_prices(&self, iso_rto: &str, load_zone: &str) -> HorizonSet<Option<f64>> {
        HorizonSet::from_fn(|h| self.average_price(iso_rto, load_zone, PriceWindow::Lookback(h)))
    }
}

impl<F: PriceFeed + ?Sized> PriceFeed for Box<F> {
    fn average_price(&self, iso_rto: &str, load_zone: &str, window: PriceWindow) -> Option<f64> {
        (**self).average_price(iso_rto, load_zone, window)
    }
}

impl<F: PriceFeed + ?Sized> PriceFeed for Arc<F> {
    fn average_price(&self, iso_rto: &str, load_zone: &str, window: PriceWindow) -> Option<f64> {
        (**self).average_price(iso_rto, load_zone, window)
    }
}

/// Fixed prices keyed by load zone
#[derive(Debug, Clone, Default)]
pub struct FixedPriceFeed {
    zones: HashMap<String, HorizonSet<Option<f64>>>,
}

impl FixedPriceFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same price for every horizon of a zone
    pub fn with_price(mut self, load_zone: impl Into<String>, price: f64) -> Self {
        self.zones.insert(load_zone.into(), HorizonSet::uniform(Some(price)));
        self
    }

    /// Override the price of a single horizon
    pub fn with_horizon_price(
        mut self,
        load_zone: impl Into<String>,
        horizon: Horizon,
        price: Option<f64>,
    ) -> Self {
        let prices = self.zones.entry(load_zone.into()).or_default();
        *prices.get_mut(horizon) = price;
        self
    }
}

impl PriceFeed for FixedPriceFeed {
    fn average_price(&self, _iso_rto: &str, load_zone: &str, window: PriceWindow) -> Option<f64> {
        let prices = self.zones.get(load_zone)?;
        match window {
            PriceWindow::Lookback(h) => *prices.get(h),
            PriceWindow::All => {
                let known: Vec<f64> = prices.iter().filter_map(|(_, p)| *p).collect();
                if known.is_empty() {
                    None
                } else {
                    Some(known.iter().sum::<f64>() / known.len() as f64)
                }
            }
        }
    }
}
