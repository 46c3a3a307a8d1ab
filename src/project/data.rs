//! Project input records submitted for evaluation

use serde::{Deserialize, Serialize};

use crate::error::{RoiError, RoiResult};
use crate::financing::{CreditRating, FinancingTable, FinancingTerms, LoanTerm};

/// A validated project ready for evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInput {
    pub company_name: String,

    /// Total installed cost in currency units
    pub total_project_cost: f64,

    pub site_zip_code: String,

    pub financing: FinancingTerms,
}

impl ProjectInput {
    /// Create a project and check its fields and financing
    pub fn new(
        company_name: impl Into<String>,
        total_project_cost: f64,
        site_zip_code: impl Into<String>,
        financing: FinancingTerms,
    ) -> RoiResult<Self> {
        let project = Self {
            company_name: company_name.into(),
            total_project_cost,
            site_zip_code: site_zip_code.into(),
            financing,
        };
        project.validate()?;
        Ok(project)
    }

    /// Validate identifiers, cost and financing terms
    pub fn validate(&self) -> RoiResult<()> {
        if self.company_name.trim().is_empty() {
            return Err(RoiError::project("company_name", "is required"));
        }
        if self.site_zip_code.trim().is_empty() {
            return Err(RoiError::project("site_zip_code", "is required"));
        }
        if !self.total_project_cost.is_finite() || self.total_project_cost <= 0.0 {
            return Err(RoiError::project(
                "total_project_cost",
                format!("{} must be a positive amount", self.total_project_cost),
            ));
        }
        self.financing.validate()
    }

    /// Cash paid by the sponsor at period 0
    pub fn equity_outlay(&self) -> f64 {
        self.total_project_cost * self.financing.equity_share()
    }

    /// Amount borrowed against the project
    pub fn financed_amount(&self) -> f64 {
        self.total_project_cost * self.financing.loan_to_value_ratio
    }
}

fn default_credit_rating() -> CreditRating {
    CreditRating::AA
}

fn default_loan_term() -> LoanTerm {
    LoanTerm::Years15
}

/// Raw project form as sent by a client
///
/// Financing selections may arrive pre-resolved (LTV and rate filled in) or
/// only as a rating and term, in which case the table supplies the values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSubmission {
    pub company_name: String,

    pub total_project_cost: f64,

    #[serde(alias = "zip_code")]
    pub site_zip_code: String,

    #[serde(default = "default_credit_rating")]
    pub credit_rating: CreditRating,

    #[serde(default = "default_loan_term", alias = "payback_period")]
    pub loan_term: LoanTerm,

    #[serde(default, alias = "ltv_ratio")]
    pub loan_to_value_ratio: Option<f64>,

    #[serde(default, alias = "interest_rate")]
    pub interest_rate_annual: Option<f64>,
}

impl ProjectSubmission {
    /// Resolve the financing selections and build a validated project
    ///
    /// Supplied LTV and rate are kept verbatim; only missing values come from
    /// the table.
    pub fn into_project(self, table: &FinancingTable) -> RoiResult<ProjectInput> {
        let financing = match (self.loan_to_value_ratio, self.interest_rate_annual) {
            (Some(ltv), Some(rate)) => FinancingTerms {
                credit_rating: self.credit_rating,
                loan_term: self.loan_term,
                loan_to_value_ratio: ltv,
                interest_rate_annual: rate,
            },
            (ltv, rate) => {
                let resolved = table.resolve(self.credit_rating, self.loan_term)?;
                FinancingTerms {
                    loan_to_value_ratio: ltv.unwrap_or(resolved.loan_to_value_ratio),
                    interest_rate_annual: rate.unwrap_or(resolved.interest_rate_annual),
                    ..resolved
                }
            }
        };

        ProjectInput::new(
            self.company_name,
            self.total_project_cost,
            self.site_zip_code,
            financing,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(ltv: f64) -> FinancingTerms {
        FinancingTerms {
            credit_rating: CreditRating::A,
            loan_term: LoanTerm::Years15,
            loan_to_value_ratio: ltv,
            interest_rate_annual: 0.05,
        }
    }

    #[test]
    fn test_project_validation() {
        assert!(ProjectInput::new("Acme", 2_500_000.0, "94105", terms(0.6)).is_ok());

        let err = ProjectInput::new("Acme", 0.0, "94105", terms(0.6)).unwrap_err();
        assert!(matches!(err, RoiError::InvalidProjectInput { .. }));

        let err = ProjectInput::new("  ", 1.0, "94105", terms(0.6)).unwrap_err();
        assert!(matches!(err, RoiError::InvalidProjectInput { .. }));

        let err = ProjectInput::new("Acme", 1.0, "", terms(0.6)).unwrap_err();
        assert!(matches!(err, RoiError::InvalidProjectInput { .. }));

        let err = ProjectInput::new("Acme", 1.0, "94105", terms(1.0)).unwrap_err();
        assert!(matches!(err, RoiError::InvalidFinancingTerms { .. }));
    }

    #[test]
    fn test_equity_and_debt_split() {
        let project = ProjectInput::new("Acme", 2_500_000.0, "94105", terms(0.6)).unwrap();
        assert!((project.equity_outlay() - 1_000_000.0).abs() < 1e-6);
        assert!((project.financed_amount() - 1_500_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_submission_fills_missing_financing() {
        let table = FinancingTable::default_table();
        let submission = ProjectSubmission {
            company_name: "Acme".into(),
            total_project_cost: 1_000_000.0,
            site_zip_code: "94105".into(),
            credit_rating: CreditRating::BBB,
            loan_term: LoanTerm::Years10,
            loan_to_value_ratio: None,
            interest_rate_annual: Some(0.07),
        };

        let project = submission.into_project(&table).unwrap();
        let resolved = table.resolve(CreditRating::BBB, LoanTerm::Years10).unwrap();
        assert_eq!(project.financing.loan_to_value_ratio, resolved.loan_to_value_ratio);
        assert_eq!(project.financing.interest_rate_annual, 0.07);
    }

    #[test]
    fn test_submission_keeps_invalid_ltv_for_rejection() {
        let table = FinancingTable::default_table();
        let submission = ProjectSubmission {
            company_name: "Acme".into(),
            total_project_cost: 1_000_000.0,
            site_zip_code: "94105".into(),
            credit_rating: CreditRating::AA,
            loan_term: LoanTerm::Years15,
            loan_to_value_ratio: Some(1.0),
            interest_rate_annual: Some(0.05),
        };
        let err = submission.into_project(&table).unwrap_err();
        assert!(matches!(err, RoiError::InvalidFinancingTerms { .. }));
    }

    #[test]
    fn test_submission_accepts_form_aliases() {
        let json = r#"{
            "company_name": "Acme",
            "total_project_cost": 2500000,
            "zip_code": "90210",
            "credit_rating": "A",
            "payback_period": "20y",
            "ltv_ratio": 0.6,
            "interest_rate": 0.05
        }"#;
        let submission: ProjectSubmission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.site_zip_code, "90210");
        assert_eq!(submission.loan_term, LoanTerm::Years20);
        assert_eq!(submission.loan_to_value_ratio, Some(0.6));
    }

    #[test]
    fn test_submission_defaults() {
        let json = r#"{"company_name": "Acme", "total_project_cost": 1.0, "site_zip_code": "1"}"#;
        let submission: ProjectSubmission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.credit_rating, CreditRating::AA);
        assert_eq!(submission.loan_term, LoanTerm::Years15);
        assert!(submission.interest_rate_annual.is_none());
    }
}
