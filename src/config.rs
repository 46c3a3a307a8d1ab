//! Engine configuration with environment overrides

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::metrics::{DiscountBasis, IrrSolver};
use crate::projection::{DebtTreatment, ProjectionConfig};

/// Everything the engine needs besides the financing table
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub projection: ProjectionConfig,
    pub discount: DiscountBasis,
    pub irr: IrrSolver,
}

impl EngineConfig {
    /// Defaults overridden by `ROI_*` environment variables
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with a custom variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let revenue = &mut config.projection.revenue;

        override_with(&lookup, "ROI_CAPACITY_MW", &mut revenue.capacity_mw);
        override_with(&lookup, "ROI_CAPACITY_FACTOR", &mut revenue.capacity_factor);
        override_with(&lookup, "ROI_PRICE_GROWTH_RATE", &mut revenue.price_growth_rate);
        override_with(&lookup, "ROI_IRR_TOLERANCE", &mut config.irr.tolerance);
        override_with(&lookup, "ROI_IRR_MAX_ITERATIONS", &mut config.irr.max_iterations);

        let mut settle = false;
        override_with(&lookup, "ROI_SETTLE_DEBT_AT_HORIZON", &mut settle);
        if settle {
            config.projection.debt = DebtTreatment::SettleAtHorizon;
        }

        let mut hurdle = match config.discount {
            DiscountBasis::Hurdle { annual_rate } => annual_rate,
            DiscountBasis::FinancingRate => 0.12,
        };
        let default_hurdle = hurdle;
        override_with(&lookup, "ROI_HURDLE_RATE", &mut hurdle);
        if !hurdle.is_finite() || hurdle <= -1.0 {
            log::warn!("Ignoring ROI_HURDLE_RATE={}, must be a finite rate above -100%", hurdle);
            hurdle = default_hurdle;
        }

        config.discount = match lookup("ROI_DISCOUNT_BASIS").as_deref().map(str::trim) {
            Some("financing") => DiscountBasis::FinancingRate,
            None | Some("hurdle") => DiscountBasis::Hurdle { annual_rate: hurdle },
            Some(other) => {
                log::warn!("Ignoring ROI_DISCOUNT_BASIS={:?}, expected hurdle or financing", other);
                DiscountBasis::Hurdle { annual_rate: hurdle }
            }
        };

        config
    }
}

fn override_with<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T) {
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => log::warn!("Ignoring {}={:?}, keeping default", key, raw),
        }
    }
}
