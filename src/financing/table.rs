//! Rating/term lookup table for loan-to-value and interest rate assumptions

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::loader;
use super::terms::{CreditRating, FinancingTerms, LoanTerm};
use crate::error::{RoiError, RoiResult};

/// Underwriting assumption for one rating/term pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingAssumption {
    pub loan_to_value_ratio: f64,
    pub interest_rate_annual: f64,
}

/// Swappable lookup table from (rating, term) to financing assumptions
#[derive(Debug, Clone)]
pub struct FinancingTable {
    entries: HashMap<(CreditRating, LoanTerm), FinancingAssumption>,
}

impl FinancingTable {
    /// Build a table from explicit entries, enforcing bounds and monotonicity
    pub fn from_entries(
        entries: impl IntoIterator<Item = ((CreditRating, LoanTerm), FinancingAssumption)>,
    ) -> RoiResult<Self> {
        let table = Self {
            entries: entries.into_iter().collect(),
        };
        table.check_bounds()?;
        table.check_monotonic()?;
        Ok(table)
    }

    /// Default underwriting table
    ///
    /// Rate is a term base rate plus a credit spread; LTV is a rating base plus
    /// a term uplift. Worse ratings and longer terms never get lower values.
    pub fn default_table() -> Self {
        let mut entries = HashMap::new();
        for rating in CreditRating::ALL {
            for term in LoanTerm::ALL {
                entries.insert(
                    (rating, term),
                    FinancingAssumption {
                        loan_to_value_ratio: base_ltv(rating) + term_ltv_uplift(term),
                        interest_rate_annual: base_rate(term) + credit_spread(rating),
                    },
                );
            }
        }
        Self { entries }
    }

    /// Load the table from the default CSV location (data/assumptions/)
    pub fn from_csv() -> RoiResult<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_FINANCING_TABLE_PATH))
    }

    /// Load the table from a specific CSV file
    pub fn from_csv_path(path: &Path) -> RoiResult<Self> {
        let rows = loader::load_financing_rows(path)?;
        log::info!("Loaded {} financing assumptions from {}", rows.len(), path.display());
        Self::from_entries(rows)
    }

    /// Resolve financing terms for a rating/term pair
    pub fn resolve(&self, rating: CreditRating, term: LoanTerm) -> RoiResult<FinancingTerms> {
        let assumption = self.get(rating, term).ok_or_else(|| RoiError::UnknownFinancingProfile {
            rating: rating.to_string(),
            term: term.to_string(),
        })?;

        FinancingTerms::new(
            rating,
            term,
            assumption.loan_to_value_ratio,
            assumption.interest_rate_annual,
        )
    }

    /// Resolve from untyped labels (e.g. query parameters)
    ///
    /// Any label that does not parse is reported as an unknown profile.
    pub fn resolve_labels(&self, rating: &str, term: &str) -> RoiResult<FinancingTerms> {
        let unknown = || RoiError::UnknownFinancingProfile {
            rating: rating.to_string(),
            term: term.to_string(),
        };
        let parsed_rating: CreditRating = rating.parse().map_err(|_| unknown())?;
        let parsed_term: LoanTerm = term.parse().map_err(|_| unknown())?;
        self.resolve(parsed_rating, parsed_term)
    }

    pub fn get(&self, rating: CreditRating, term: LoanTerm) -> Option<&FinancingAssumption> {
        self.entries.get(&(rating, term))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_bounds(&self) -> RoiResult<()> {
        for ((rating, term), a) in &self.entries {
            let ltv = a.loan_to_value_ratio;
            if !ltv.is_finite() || !(0.0..1.0).contains(&ltv) {
                return Err(RoiError::InvalidAssumptions(format!(
                    "{}/{}: loan-to-value {} outside [0, 1)",
                    rating, term, ltv
                )));
            }
            let rate = a.interest_rate_annual;
            if !rate.is_finite() || rate < 0.0 {
                return Err(RoiError::InvalidAssumptions(format!(
                    "{}/{}: interest rate {} is negative",
                    rating, term, rate
                )));
            }
        }
        Ok(())
    }

    /// For a fixed term, a worse rating may not get a lower rate or LTV
    fn check_monotonic(&self) -> RoiResult<()> {
        for term in LoanTerm::ALL {
            let mut previous: Option<(CreditRating, &FinancingAssumption)> = None;
            for rating in CreditRating::ALL {
                let Some(current) = self.get(rating, term) else {
                    continue;
                };
                if let Some((better, prev)) = previous {
                    if current.interest_rate_annual < prev.interest_rate_annual {
                        return Err(RoiError::InvalidAssumptions(format!(
                            "{} rate {} is below {} rate {} for term {}",
                            rating, current.interest_rate_annual, better, prev.interest_rate_annual, term
                        )));
                    }
                    if current.loan_to_value_ratio < prev.loan_to_value_ratio {
                        return Err(RoiError::InvalidAssumptions(format!(
                            "{} LTV {} is below {} LTV {} for term {}",
                            rating, current.loan_to_value_ratio, better, prev.loan_to_value_ratio, term
                        )));
                    }
                }
                previous = Some((rating, current));
            }
        }
        Ok(())
    }
}

impl Default for FinancingTable {
    fn default() -> Self {
        Self::default_table()
    }
}

fn base_rate(term: LoanTerm) -> f64 {
    match term {
        LoanTerm::Years5 => 0.0400,
        LoanTerm::Years10 => 0.0425,
        LoanTerm::Years15 => 0.0450,
        LoanTerm::Years20 => 0.0465,
        LoanTerm::Years25 => 0.0475,
    }
}

fn credit_spread(rating: CreditRating) -> f64 {
    match rating {
        CreditRating::AAA => 0.005,
        CreditRating::AA => 0.010,
        CreditRating::A => 0.015,
        CreditRating::BBB => 0.020,
        CreditRating::BB => 0.025,
    }
}

fn base_ltv(rating: CreditRating) -> f64 {
    match rating {
        CreditRating::AAA => 0.50,
        CreditRating::AA => 0.55,
        CreditRating::A => 0.60,
        CreditRating::BBB => 0.65,
        CreditRating::BB => 0.70,
    }
}

fn term_ltv_uplift(term: LoanTerm) -> f64 {
    match term {
        LoanTerm::Years5 => 0.00,
        LoanTerm::Years10 => 0.02,
        LoanTerm::Years15 => 0.04,
        LoanTerm::Years20 => 0.06,
        LoanTerm::Years25 => 0.08,
    }
}
