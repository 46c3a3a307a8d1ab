//! Cashflow output structures for project projections

use serde::{Deserialize, Serialize};

use crate::horizon::Horizon;

/// A single month of projected project cashflows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    // Timing
    pub month: u32,

    // Revenue side
    pub energy_price: f64,
    pub energy_savings: f64,

    // Debt service
    pub opening_balance: f64,
    pub interest: f64,
    pub principal: f64,
    pub debt_service: f64,
    /// Outstanding principal repaid at the end of the horizon, if configured
    pub balloon_payment: f64,
    pub closing_balance: f64,

    // Summary
    pub net_cashflow: f64,
}

impl ProjectionRow {
    /// Create a new row with zeroed values
    pub fn new(month: u32) -> Self {
        Self {
            month,
            energy_price: 0.0,
            energy_savings: 0.0,
            opening_balance: 0.0,
            interest: 0.0,
            principal: 0.0,
            debt_service: 0.0,
            balloon_payment: 0.0,
            closing_balance: 0.0,
            net_cashflow: 0.0,
        }
    }
}

/// Complete projection for one project over one horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowProjection {
    pub horizon: Horizon,

    /// Equity paid at period 0 (positive amount)
    pub equity_outlay: f64,

    /// Monthly rows for periods 1..=horizon; empty when no price was available
    pub rows: Vec<ProjectionRow>,
}

impl CashflowProjection {
    pub fn new(horizon: Horizon, equity_outlay: f64) -> Self {
        Self {
            horizon,
            equity_outlay,
            rows: Vec::new(),
        }
    }

    /// Add a monthly row
    pub fn add_row(&mut self, row: ProjectionRow) {
        self.rows.push(row);
    }

    /// Whether any revenue periods were projected
    pub fn has_revenue(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Net cashflow series, period 0 first
    pub fn net_cashflows(&self) -> Vec<f64> {
        std::iter::once(-self.equity_outlay)
            .chain(self.rows.iter().map(|r| r.net_cashflow))
            .collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_energy_savings: f64 = self.rows.iter().map(|r| r.energy_savings).sum();
        let total_interest: f64 = self.rows.iter().map(|r| r.interest).sum();
        let total_principal: f64 = self.rows.iter().map(|r| r.principal).sum();
        let total_debt_service: f64 = self.rows.iter().map(|r| r.debt_service + r.balloon_payment).sum();
        let total_net_cf: f64 = self.rows.iter().map(|r| r.net_cashflow).sum();
        let ending_balance = self.rows.last().map(|r| r.closing_balance).unwrap_or(0.0);

        ProjectionSummary {
            total_months: self.rows.len() as u32,
            equity_outlay: self.equity_outlay,
            total_energy_savings,
            total_interest,
            total_principal,
            total_debt_service,
            total_net_cf,
            ending_balance,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_months: u32,
    pub equity_outlay: f64,
    pub total_energy_savings: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_debt_service: f64,
    pub total_net_cf: f64,
    pub ending_balance: f64,
}
