//! Discount rates and net present value
//!
//! Supports:
//! - A configured hurdle rate (the equity discount rate)
//! - The project's own financing rate

use serde::{Deserialize, Serialize};

use crate::financing::FinancingTerms;

/// Where the annual discount rate comes from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum DiscountBasis {
    /// Fixed annual hurdle rate
    Hurdle { annual_rate: f64 },
    /// The project's annual interest rate
    FinancingRate,
}

impl Default for DiscountBasis {
    fn default() -> Self {
        DiscountBasis::Hurdle { annual_rate: 0.12 }
    }
}

impl DiscountBasis {
    /// Discount rate that applies to a project with these financing terms
    pub fn rate_for(&self, financing: &FinancingTerms) -> DiscountRate {
        match self {
            DiscountBasis::Hurdle { annual_rate } => DiscountRate::from_annual(*annual_rate),
            DiscountBasis::FinancingRate => DiscountRate::from_annual(financing.interest_rate_annual),
        }
    }
}

/// Annual effective rate and its monthly equivalent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountRate {
    pub annual: f64,
    pub monthly: f64,
}

impl DiscountRate {
    pub fn from_annual(annual: f64) -> Self {
        Self {
            annual,
            monthly: annual_to_periodic(annual, 12),
        }
    }

    /// Discount factor to a given month
    pub fn factor(&self, month: u32) -> f64 {
        (1.0 + self.monthly).powi(-(month as i32))
    }
}

/// Periodic rate equivalent to an annual effective rate
pub fn annual_to_periodic(annual: f64, periods_per_year: u32) -> f64 {
    (1.0 + annual).powf(1.0 / periods_per_year as f64) - 1.0
}

/// Annual effective rate equivalent to a periodic rate
pub fn periodic_to_annual(periodic: f64, periods_per_year: u32) -> f64 {
    (1.0 + periodic).powi(periods_per_year as i32) - 1.0
}

/// NPV at a periodic rate, the first cashflow at t = 0
pub fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_monthly_equivalent() {
        let rate = DiscountRate::from_annual(0.12);
        assert_abs_diff_eq!((1.0 + rate.monthly).powi(12), 1.12, epsilon = 1e-12);
        assert_abs_diff_eq!(rate.factor(12), 1.0 / 1.12, epsilon = 1e-12);
        assert_abs_diff_eq!(periodic_to_annual(rate.monthly, 12), 0.12, epsilon = 1e-12);
    }

    #[test]
    fn test_npv_basic() {
        // NPV at 10%: -1000 + 300/1.1 + 400/1.21 + 500/1.331 = -21.04
        let npv = npv_at_rate(&[-1000.0, 300.0, 400.0, 500.0], 0.10);
        assert_abs_diff_eq!(npv, -21.04, epsilon = 0.01);
    }

    #[test]
    fn test_npv_zero_rate_is_sum() {
        assert_abs_diff_eq!(npv_at_rate(&[-100.0, 50.0, 50.0, 50.0], 0.0), 50.0, epsilon = 1e-12);
    }

    #[test]
    fn test_npv_is_linear() {
        let flows = [-1_000_000.0, 90_000.0, 95_000.0, 110_000.0, 120_000.0];
        let base = npv_at_rate(&flows, 0.0095);
        for k in [-3.0, 0.5, 2.0, 17.25] {
            let scaled: Vec<f64> = flows.iter().map(|cf| cf * k).collect();
            assert_relative_eq!(npv_at_rate(&scaled, 0.0095), k * base, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_financing_basis() {
        use crate::financing::{CreditRating, LoanTerm};
        let terms = FinancingTerms::new(CreditRating::A, LoanTerm::Years10, 0.6, 0.0575).unwrap();
        let rate = DiscountBasis::FinancingRate.rate_for(&terms);
        assert_eq!(rate.annual, 0.0575);

        let rate = DiscountBasis::default().rate_for(&terms);
        assert_eq!(rate.annual, 0.12);
    }
}
