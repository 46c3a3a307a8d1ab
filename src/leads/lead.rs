//! Stored lead records

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RoiError;
use crate::horizon::{Horizon, HorizonSet};
use crate::metrics::HorizonMetrics;
use crate::project::ProjectInput;

/// Opaque lead identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(Uuid);

impl LeadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LeadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for LeadId {
    type Err = RoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(LeadId)
            .map_err(|e| RoiError::Parse(format!("invalid lead id {:?}: {}", s, e)))
    }
}

/// A fully evaluated project submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub project: ProjectInput,
    pub iso_rto: String,
    pub load_zone: String,

    /// Zone average over the whole available price history
    pub avg_ssp_price: Option<f64>,

    pub metrics: HorizonSet<HorizonMetrics>,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    pub fn metrics_for(&self, horizon: Horizon) -> &HorizonMetrics {
        self.metrics.get(horizon)
    }
}
