//! NPV, IRR and payback for a single cashflow series

use serde::{Deserialize, Serialize};

use super::discount::{npv_at_rate, periodic_to_annual, DiscountRate};
use super::irr::{IrrSolution, IrrSolver};
use super::payback::payback_period;
use crate::horizon::Horizon;

/// Metrics for one cashflow series. `None` marks a metric as not computable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashflowMetrics {
    pub npv: Option<f64>,
    /// Annualised IRR
    pub irr: Option<f64>,
    pub irr_solution: IrrSolution,
    pub payback_period_months: Option<f64>,
}

/// Computes the metrics of monthly series against a discount rate
#[derive(Debug, Clone, Copy)]
pub struct MetricCalculator {
    discount: DiscountRate,
    solver: IrrSolver,
}

impl MetricCalculator {
    pub fn new(discount: DiscountRate, solver: IrrSolver) -> Self {
        Self { discount, solver }
    }

    pub fn discount_rate(&self) -> DiscountRate {
        self.discount
    }

    /// Each metric is independent: one failing never blocks the others
    pub fn compute(&self, cashflows: &[f64]) -> CashflowMetrics {
        let npv = if cashflows.is_empty() {
            None
        } else {
            Some(npv_at_rate(cashflows, self.discount.monthly))
        };

        let irr_solution = self.solver.solve(cashflows);
        let irr = irr_solution.rate().map(|r| periodic_to_annual(r, 12));

        CashflowMetrics {
            npv,
            irr,
            irr_solution,
            payback_period_months: payback_period(cashflows),
        }
    }
}

/// Reported metrics for one horizon of a lead
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonMetrics {
    pub horizon: Horizon,
    pub irr: Option<f64>,
    pub npv: Option<f64>,
    pub payback_period_months: Option<f64>,
    /// Zone price the horizon was projected with
    pub avg_ssp_price: Option<f64>,
}

impl HorizonMetrics {
    pub fn from_metrics(horizon: Horizon, avg_ssp_price: Option<f64>, metrics: &CashflowMetrics) -> Self {
        Self {
            horizon,
            irr: metrics.irr,
            npv: metrics.npv,
            payback_period_months: metrics.payback_period_months,
            avg_ssp_price,
        }
    }

    /// All metrics unavailable, e.g. no zone price for the horizon
    pub fn not_computable(horizon: Horizon, avg_ssp_price: Option<f64>) -> Self {
        Self {
            horizon,
            irr: None,
            npv: None,
            payback_period_months: None,
            avg_ssp_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn calculator() -> MetricCalculator {
        MetricCalculator::new(DiscountRate::from_annual(0.12), IrrSolver::default())
    }

    #[test]
    fn test_single_outflow_then_inflows() {
        let mut flows = vec![-1_000_000.0];
        flows.extend(vec![100_000.0; 12]);

        let metrics = calculator().compute(&flows);
        let irr = metrics.irr.unwrap();
        let periodic = (1.0 + irr).powf(1.0 / 12.0) - 1.0;
        assert!(npv_at_rate(&flows, periodic).abs() < 10.0);

        // 10 months of 100k repays the outlay
        assert_abs_diff_eq!(metrics.payback_period_months.unwrap(), 10.0, epsilon = 1e-9);
        assert!(metrics.npv.unwrap() > 0.0);
    }

    #[test]
    fn test_npv_sign_matches_irr_against_hurdle() {
        let calc = calculator();
        for monthly in [60_000.0, 85_000.0, 90_000.0, 120_000.0] {
            let mut flows = vec![-1_000_000.0];
            flows.extend(vec![monthly; 12]);
            let metrics = calc.compute(&flows);
            let npv = metrics.npv.unwrap();
            let irr = metrics.irr.unwrap();
            assert_eq!(npv > 0.0, irr > calc.discount_rate().annual, "monthly {}", monthly);
        }
    }

    #[test]
    fn test_no_sign_change_keeps_npv() {
        let metrics = calculator().compute(&[-1_000_000.0]);
        assert_eq!(metrics.irr, None);
        assert_eq!(metrics.irr_solution, IrrSolution::NoSignChange);
        assert_eq!(metrics.npv, Some(-1_000_000.0));
        assert_eq!(metrics.payback_period_months, None);
    }

    #[test]
    fn test_empty_series() {
        let metrics = calculator().compute(&[]);
        assert_eq!(metrics.npv, None);
        assert_eq!(metrics.irr, None);
        assert_eq!(metrics.payback_period_months, None);
    }

    #[test]
    fn test_not_computable_serialises_as_null() {
        let metrics = HorizonMetrics::not_computable(Horizon::SixMonths, None);
        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json["horizon"], "6m");
        assert!(json["irr"].is_null());
        assert!(json["npv"].is_null());
        assert!(json["payback_period_months"].is_null());
    }
}
