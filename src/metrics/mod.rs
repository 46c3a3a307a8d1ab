//! Return metrics over monthly cashflow series
//!
//! - NPV at a hurdle or financing-rate discount basis
//! - IRR with an explicit root selection policy
//! - Interpolated payback period

mod calculator;
mod discount;
mod irr;
mod payback;

pub use calculator::{CashflowMetrics, HorizonMetrics, MetricCalculator};
pub use discount::{annual_to_periodic, npv_at_rate, periodic_to_annual, DiscountBasis, DiscountRate};
pub use irr::{IrrSolution, IrrSolver};
pub use payback::payback_period;
