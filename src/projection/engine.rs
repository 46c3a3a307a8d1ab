//! Monthly cashflow projector for financed retrofit projects

use serde::{Deserialize, Serialize};

use super::amortization::LoanSchedule;
use super::cashflows::{CashflowProjection, ProjectionRow};
use crate::financing::FinancingTerms;
use crate::horizon::Horizon;
use crate::project::ProjectInput;

/// Average hours in a calendar month (8760 / 12)
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Scale of the retrofit used to turn a zone price into monthly savings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenueAssumptions {
    /// Displaced load in MW
    pub capacity_mw: f64,

    /// Share of hours the retrofit runs
    pub capacity_factor: f64,

    /// Annual escalation applied to the zone price
    pub price_growth_rate: f64,
}

impl Default for RevenueAssumptions {
    fn default() -> Self {
        Self {
            capacity_mw: 11.0,
            capacity_factor: 0.35,
            price_growth_rate: 0.025,
        }
    }
}

impl RevenueAssumptions {
    /// Energy displaced per month in MWh
    pub fn monthly_energy_mwh(&self) -> f64 {
        self.capacity_mw * HOURS_PER_MONTH * self.capacity_factor
    }

    /// Price for a projection month after escalation (month 1 is unescalated)
    pub fn escalated_price(&self, base_price: f64, month: u32) -> f64 {
        let years = month.saturating_sub(1) as f64 / 12.0;
        base_price * (1.0 + self.price_growth_rate).powf(years)
    }
}

/// How the loan is treated at the end of the projected horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtTreatment {
    /// Regular amortisation only
    #[default]
    Amortizing,
    /// Repay the outstanding balance in the last projected month
    SettleAtHorizon,
}

/// Configuration for a projection run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectionConfig {
    pub revenue: RevenueAssumptions,
    pub debt: DebtTreatment,
}

/// Builds period-by-period net cashflows for a project
#[derive(Debug, Clone, Default)]
pub struct CashflowProjector {
    config: ProjectionConfig,
}

impl CashflowProjector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project a validated project over one horizon
    pub fn project_input(
        &self,
        project: &ProjectInput,
        avg_price: Option<f64>,
        horizon: Horizon,
    ) -> CashflowProjection {
        self.project(project.total_project_cost, &project.financing, avg_price, horizon)
    }

    /// Project cashflows for `horizon` months after the equity outlay
    ///
    /// Without a usable price only the period-0 outlay is produced.
    pub fn project(
        &self,
        cost: f64,
        financing: &FinancingTerms,
        avg_price: Option<f64>,
        horizon: Horizon,
    ) -> CashflowProjection {
        let mut projection = CashflowProjection::new(horizon, cost * financing.equity_share());

        let Some(price) = avg_price.filter(|p| p.is_finite()) else {
            log::warn!("No usable zone price for {} horizon, projecting outlay only", horizon);
            return projection;
        };

        let loan = LoanSchedule::monthly(
            cost * financing.loan_to_value_ratio,
            financing.interest_rate_annual,
            financing.loan_term.months(),
        );
        let schedule = loan.take(horizon.months());
        let revenue = &self.config.revenue;

        for month in 1..=horizon.months() {
            let mut row = ProjectionRow::new(month);

            row.energy_price = revenue.escalated_price(price, month);
            row.energy_savings = revenue.monthly_energy_mwh() * row.energy_price;

            if let Some(debt) = schedule.get(month as usize - 1) {
                row.opening_balance = debt.opening_balance;
                row.interest = debt.interest;
                row.principal = debt.principal;
                row.debt_service = debt.payment;
                row.closing_balance = debt.closing_balance;
            }

            if month == horizon.months() && self.config.debt == DebtTreatment::SettleAtHorizon {
                row.balloon_payment = row.closing_balance;
                row.closing_balance = 0.0;
            }

            row.net_cashflow = row.energy_savings - row.debt_service - row.balloon_payment;
            projection.add_row(row);
        }

        projection
    }
}
