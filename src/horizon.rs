//! Lookback/projection horizons and per-horizon containers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RoiError;

/// One of the fixed evaluation windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "12m")]
    TwelveMonths,
    #[serde(rename = "24m")]
    TwentyFourMonths,
}

impl Horizon {
    /// All horizons, shortest first
    pub const ALL: [Horizon; 3] = [
        Horizon::SixMonths,
        Horizon::TwelveMonths,
        Horizon::TwentyFourMonths,
    ];

    /// Number of monthly periods covered by the horizon
    pub fn months(&self) -> u32 {
        match self {
            Horizon::SixMonths => 6,
            Horizon::TwelveMonths => 12,
            Horizon::TwentyFourMonths => 24,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Horizon::SixMonths => "6m",
            Horizon::TwelveMonths => "12m",
            Horizon::TwentyFourMonths => "24m",
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Horizon {
    type Err = RoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "6m" | "6" => Ok(Horizon::SixMonths),
            "12m" | "12" => Ok(Horizon::TwelveMonths),
            "24m" | "24" => Ok(Horizon::TwentyFourMonths),
            other => Err(RoiError::Parse(format!(
                "unknown horizon {:?} (expected 6m, 12m or 24m)",
                other
            ))),
        }
    }
}

/// Exactly one value per horizon
///
/// Stored as named fields so that a missing horizon cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HorizonSet<T> {
    #[serde(rename = "6m")]
    pub six_months: T,
    #[serde(rename = "12m")]
    pub twelve_months: T,
    #[serde(rename = "24m")]
    pub twenty_four_months: T,
}

impl<T> HorizonSet<T> {
    /// Build a set by evaluating `f` once per horizon, shortest first
    pub fn from_fn(mut f: impl FnMut(Horizon) -> T) -> Self {
        Self {
            six_months: f(Horizon::SixMonths),
            twelve_months: f(Horizon::TwelveMonths),
            twenty_four_months: f(Horizon::TwentyFourMonths),
        }
    }

    pub fn get(&self, horizon: Horizon) -> &T {
        match horizon {
            Horizon::SixMonths => &self.six_months,
            Horizon::TwelveMonths => &self.twelve_months,
            Horizon::TwentyFourMonths => &self.twenty_four_months,
        }
    }

    pub fn get_mut(&mut self, horizon: Horizon) -> &mut T {
        match horizon {
            Horizon::SixMonths => &mut self.six_months,
            Horizon::TwelveMonths => &mut self.twelve_months,
            Horizon::TwentyFourMonths => &mut self.twenty_four_months,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Horizon, &T) -> U) -> HorizonSet<U> {
        HorizonSet::from_fn(|h| f(h, self.get(h)))
    }

    /// Iterate `(horizon, value)` pairs, shortest horizon first
    pub fn iter(&self) -> impl Iterator<Item = (Horizon, &T)> {
        Horizon::ALL.into_iter().map(move |h| (h, self.get(h)))
    }
}

impl<T: Clone> HorizonSet<T> {
    /// Same value for every horizon
    pub fn uniform(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}
