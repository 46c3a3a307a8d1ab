//! Level-payment loan amortisation

use serde::{Deserialize, Serialize};

/// One month of a loan's amortisation schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationPeriod {
    /// Period index (1-indexed)
    pub period: u32,
    pub opening_balance: f64,
    pub interest: f64,
    pub principal: f64,
    /// Total debt service (interest + principal)
    pub payment: f64,
    pub closing_balance: f64,
}

/// Fully amortising loan with equal payments per period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanSchedule {
    pub principal: f64,
    pub periodic_rate: f64,
    pub periods: u32,
    pub payment: f64,
}

impl LoanSchedule {
    /// Monthly schedule from an annual nominal rate and a term in months
    pub fn monthly(principal: f64, annual_rate: f64, term_months: u32) -> Self {
        let periodic_rate = annual_rate / 12.0;
        Self {
            principal,
            periodic_rate,
            periods: term_months,
            payment: Self::level_payment(principal, periodic_rate, term_months),
        }
    }

    /// Equal payment that retires `principal` over `periods` at `periodic_rate`
    ///
    /// Principal times the capital recovery factor; a zero rate repays linearly.
    pub fn level_payment(principal: f64, periodic_rate: f64, periods: u32) -> f64 {
        if periods == 0 || principal == 0.0 {
            return 0.0;
        }
        if periodic_rate.abs() < 1e-12 {
            return principal / periods as f64;
        }
        let discount = (1.0 + periodic_rate).powi(-(periods as i32));
        principal * periodic_rate / (1.0 - discount)
    }

    /// Schedule rows for periods 1..=n, stopping early once the loan is retired
    pub fn take(&self, n: u32) -> Vec<AmortizationPeriod> {
        let mut rows = Vec::with_capacity(n.min(self.periods) as usize);
        let mut balance = self.principal;

        for period in 1..=n.min(self.periods) {
            let interest = balance * self.periodic_rate;
            let mut principal = self.payment - interest;
            let mut payment = self.payment;

            // Final payment clears whatever rounding left on the balance
            if period == self.periods {
                principal = balance;
                payment = principal + interest;
            }

            let closing = balance - principal;
            rows.push(AmortizationPeriod {
                period,
                opening_balance: balance,
                interest,
                principal,
                payment,
                closing_balance: closing,
            });
            balance = closing;
        }

        rows
    }

    /// Outstanding balance after `n` payments
    pub fn balance_after(&self, n: u32) -> f64 {
        if n >= self.periods {
            return 0.0;
        }
        self.take(n).last().map(|r| r.closing_balance).unwrap_or(self.principal)
    }

    /// Full schedule
    pub fn schedule(&self) -> Vec<AmortizationPeriod> {
        self.take(self.periods)
    }
}
