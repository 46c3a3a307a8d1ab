//! Sorting queries over stored leads

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Lead;
use crate::error::RoiError;
use crate::horizon::Horizon;

/// Metric to rank leads by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Keep store order
    #[default]
    None,
    Npv,
    Irr,
}

impl FromStr for SortField {
    type Err = RoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(SortField::None),
            "npv" => Ok(SortField::Npv),
            "irr" => Ok(SortField::Irr),
            other => Err(RoiError::Parse(format!("unknown sort field: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = RoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(RoiError::Parse(format!("unknown sort direction: {}", other))),
        }
    }
}

/// Stateless listing query: which metric, at which horizon, in which direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadQuery {
    pub sort_field: SortField,
    pub horizon: Horizon,
    pub direction: SortDirection,
}

impl Default for LeadQuery {
    fn default() -> Self {
        Self {
            sort_field: SortField::None,
            horizon: Horizon::TwelveMonths,
            direction: SortDirection::Asc,
        }
    }
}

impl LeadQuery {
    pub fn sorted_by(sort_field: SortField, horizon: Horizon, direction: SortDirection) -> Self {
        Self { sort_field, horizon, direction }
    }

    /// Value the query ranks a lead by
    pub fn metric(&self, lead: &Lead) -> Option<f64> {
        let metrics = lead.metrics_for(self.horizon);
        match self.sort_field {
            SortField::None => None,
            SortField::Npv => metrics.npv,
            SortField::Irr => metrics.irr,
        }
    }

    /// Stable sort; not computable values rank lowest
    pub fn apply(&self, leads: &mut [Lead]) {
        if self.sort_field == SortField::None {
            return;
        }
        leads.sort_by(|a, b| {
            let (a, b) = (self.metric(a), self.metric(b));
            match self.direction {
                SortDirection::Asc => compare_metric(a, b),
                SortDirection::Desc => compare_metric(b, a),
            }
        });
    }
}

fn compare_metric(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.total_cmp(&b),
    }
}
