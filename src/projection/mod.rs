//! Cashflow projection for financed projects over a horizon

mod amortization;
mod engine;
mod cashflows;

pub use amortization::{AmortizationPeriod, LoanSchedule};
pub use engine::{CashflowProjector, DebtTreatment, ProjectionConfig, RevenueAssumptions, HOURS_PER_MONTH};
pub use cashflows::{CashflowProjection, ProjectionRow, ProjectionSummary};
