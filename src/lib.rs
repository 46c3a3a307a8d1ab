//! Grid ROI - analytics engine for financed smart-grid retrofit projects
//!
//! This library provides:
//! - Financing assumption lookup by credit rating and loan term
//! - Monthly cashflow projection with loan amortisation
//! - NPV, IRR and payback metrics over 6, 12 and 24 month horizons
//! - Lead storage and ranking by metric

pub mod config;
pub mod engine;
pub mod error;
pub mod financing;
pub mod horizon;
pub mod leads;
pub mod market;
pub mod metrics;
pub mod project;
pub mod projection;

// Re-export commonly used types
pub use config::EngineConfig;
pub use engine::RoiEngine;
pub use error::{RoiError, RoiResult};
pub use financing::{CreditRating, FinancingTable, FinancingTerms, LoanTerm};
pub use horizon::{Horizon, HorizonSet};
pub use leads::{InMemoryLeadStore, JsonLinesLeadStore, Lead, LeadId, LeadQuery, LeadService, LeadStore};
pub use market::{FixedPriceFeed, PriceFeed, PriceHistory, PriceWindow};
pub use metrics::{HorizonMetrics, IrrSolution, MetricCalculator};
pub use project::{ProjectInput, ProjectSubmission};
