//! Credit grades, loan terms and resolved financing terms

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RoiError, RoiResult};

/// Counterparty credit rating, best grade first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum CreditRating {
    AAA,
    AA,
    A,
    BBB,
    BB,
}

impl CreditRating {
    /// All grades ordered from best to worst credit quality
    pub const ALL: [CreditRating; 5] = [
        CreditRating::AAA,
        CreditRating::AA,
        CreditRating::A,
        CreditRating::BBB,
        CreditRating::BB,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CreditRating::AAA => "AAA",
            CreditRating::AA => "AA",
            CreditRating::A => "A",
            CreditRating::BBB => "BBB",
            CreditRating::BB => "BB",
        }
    }
}

impl Default for CreditRating {
    fn default() -> Self {
        CreditRating::AA
    }
}

impl fmt::Display for CreditRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreditRating {
    type Err = RoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AAA" => Ok(CreditRating::AAA),
            "AA" => Ok(CreditRating::AA),
            "A" => Ok(CreditRating::A),
            "BBB" => Ok(CreditRating::BBB),
            "BB" => Ok(CreditRating::BB),
            other => Err(RoiError::Parse(format!("unknown credit rating {:?}", other))),
        }
    }
}

impl TryFrom<String> for CreditRating {
    type Error = RoiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Loan amortisation term
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum LoanTerm {
    #[serde(rename = "5y")]
    Years5,
    #[serde(rename = "10y")]
    Years10,
    #[serde(rename = "15y")]
    Years15,
    #[serde(rename = "20y")]
    Years20,
    #[serde(rename = "25y")]
    Years25,
}

impl LoanTerm {
    pub const ALL: [LoanTerm; 5] = [
        LoanTerm::Years5,
        LoanTerm::Years10,
        LoanTerm::Years15,
        LoanTerm::Years20,
        LoanTerm::Years25,
    ];

    pub fn years(&self) -> u32 {
        match self {
            LoanTerm::Years5 => 5,
            LoanTerm::Years10 => 10,
            LoanTerm::Years15 => 15,
            LoanTerm::Years20 => 20,
            LoanTerm::Years25 => 25,
        }
    }

    pub fn months(&self) -> u32 {
        self.years() * 12
    }

    pub fn from_years(years: u32) -> Option<Self> {
        LoanTerm::ALL.into_iter().find(|t| t.years() == years)
    }
}

impl Default for LoanTerm {
    fn default() -> Self {
        LoanTerm::Years15
    }
}

impl fmt::Display for LoanTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}y", self.years())
    }
}

impl FromStr for LoanTerm {
    type Err = RoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        let digits = trimmed.strip_suffix('y').unwrap_or(&trimmed);
        digits
            .parse::<u32>()
            .ok()
            .and_then(LoanTerm::from_years)
            .ok_or_else(|| {
                RoiError::Parse(format!(
                    "unknown loan term {:?} (expected 5y, 10y, 15y, 20y or 25y)",
                    s
                ))
            })
    }
}

impl TryFrom<String> for LoanTerm {
    type Error = RoiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Resolved financing assumptions for a project
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingTerms {
    pub credit_rating: CreditRating,
    pub loan_term: LoanTerm,
    /// Financed share of the project cost, strictly below 1
    pub loan_to_value_ratio: f64,
    /// Annual nominal interest rate as a decimal
    pub interest_rate_annual: f64,
}

impl FinancingTerms {
    /// Build terms and reject anything that cannot be financed
    pub fn new(
        credit_rating: CreditRating,
        loan_term: LoanTerm,
        loan_to_value_ratio: f64,
        interest_rate_annual: f64,
    ) -> RoiResult<Self> {
        let terms = Self {
            credit_rating,
            loan_term,
            loan_to_value_ratio,
            interest_rate_annual,
        };
        terms.validate()?;
        Ok(terms)
    }

    /// Check the LTV and rate bounds. Values are never clamped.
    pub fn validate(&self) -> RoiResult<()> {
        let ltv = self.loan_to_value_ratio;
        if !ltv.is_finite() {
            return Err(RoiError::financing("loan_to_value_ratio", "must be a finite number"));
        }
        if ltv < 0.0 {
            return Err(RoiError::financing(
                "loan_to_value_ratio",
                format!("{} is negative", ltv),
            ));
        }
        if ltv >= 1.0 {
            return Err(RoiError::financing(
                "loan_to_value_ratio",
                format!("{} must be less than 1", ltv),
            ));
        }

        let rate = self.interest_rate_annual;
        if !rate.is_finite() || rate < 0.0 {
            return Err(RoiError::financing(
                "interest_rate_annual",
                format!("{} must be a finite, non-negative rate", rate),
            ));
        }
        Ok(())
    }

    /// Share of the project paid in cash at period 0
    pub fn equity_share(&self) -> f64 {
        1.0 - self.loan_to_value_ratio
    }

    pub fn monthly_interest_rate(&self) -> f64 {
        self.interest_rate_annual / 12.0
    }
}
