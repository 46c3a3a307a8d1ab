//! ROI engine: resolve financing, project cashflows and compute metrics
//!
//! Holds the financing table and configuration once so that many projects can
//! be evaluated without re-reading CSV files.

use std::path::Path;

use crate::config::EngineConfig;
use crate::error::RoiResult;
use crate::financing::{CreditRating, FinancingTable, FinancingTerms, LoanTerm};
use crate::horizon::{Horizon, HorizonSet};
use crate::metrics::{HorizonMetrics, MetricCalculator};
use crate::project::ProjectInput;
use crate::projection::{CashflowProjection, CashflowProjector};

#[derive(Debug, Clone, Default)]
pub struct RoiEngine {
    table: FinancingTable,
    config: EngineConfig,
}

impl RoiEngine {
    pub fn new(table: FinancingTable, config: EngineConfig) -> Self {
        Self { table, config }
    }

    /// Engine with the financing table from the default CSV location
    pub fn from_csv(config: EngineConfig) -> RoiResult<Self> {
        Ok(Self::new(FinancingTable::from_csv()?, config))
    }

    pub fn from_csv_path(path: &Path, config: EngineConfig) -> RoiResult<Self> {
        Ok(Self::new(FinancingTable::from_csv_path(path)?, config))
    }

    pub fn table(&self) -> &FinancingTable {
        &self.table
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Financing terms for a rating and loan term
    pub fn resolve(&self, rating: CreditRating, term: LoanTerm) -> RoiResult<FinancingTerms> {
        self.table.resolve(rating, term)
    }

    /// Calculator discounting at the configured basis for this project
    pub fn calculator_for(&self, financing: &FinancingTerms) -> MetricCalculator {
        MetricCalculator::new(self.config.discount.rate_for(financing), self.config.irr)
    }

    pub fn project(&self, project: &ProjectInput, avg_price: Option<f64>, horizon: Horizon) -> CashflowProjection {
        CashflowProjector::new(self.config.projection).project_input(project, avg_price, horizon)
    }

    /// Metrics for one horizon; not computable when there is no zone price
    pub fn evaluate_horizon(
        &self,
        project: &ProjectInput,
        avg_price: Option<f64>,
        horizon: Horizon,
    ) -> HorizonMetrics {
        let projection = self.project(project, avg_price, horizon);
        if !projection.has_revenue() {
            return HorizonMetrics::not_computable(horizon, avg_price);
        }

        let metrics = self
            .calculator_for(&project.financing)
            .compute(&projection.net_cashflows());

        log::debug!(
            "{} {}: npv={:?} irr={:?} payback={:?} ({:?})",
            project.company_name,
            horizon,
            metrics.npv,
            metrics.irr,
            metrics.payback_period_months,
            metrics.irr_solution
        );

        HorizonMetrics::from_metrics(horizon, avg_price, &metrics)
    }

    /// Metrics for every horizon, each with its own zone price
    pub fn evaluate(&self, project: &ProjectInput, prices: &HorizonSet<Option<f64>>) -> HorizonSet<HorizonMetrics> {
        prices.map(|horizon, price| self.evaluate_horizon(project, *price, horizon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectInput {
        let financing = FinancingTerms::new(CreditRating::AA, LoanTerm::Years15, 0.6, 0.05).unwrap();
        ProjectInput::new("Acme Foods".to_string(), 2_500_000.0, "94105".to_string(), financing).unwrap()
    }

    #[test]
    fn test_reference_project() {
        let engine = RoiEngine::default();
        let hurdle = engine.calculator_for(&project().financing).discount_rate().annual;

        let metrics = engine.evaluate(&project(), &HorizonSet::uniform(Some(40.0)));

        let twelve = metrics.get(Horizon::TwelveMonths);
        let npv = twelve.npv.unwrap();
        let irr = twelve.irr.unwrap();
        assert!(npv > 0.0);
        assert_eq!(npv > 0.0, irr > hurdle);

        let six = metrics.get(Horizon::SixMonths);
        assert!(six.npv.unwrap() < 0.0);
        assert!(six.irr.unwrap() < hurdle);
        assert_eq!(six.payback_period_months, None);
    }

    #[test]
    fn test_missing_price_marks_only_that_horizon() {
        let engine = RoiEngine::default();
        let prices = HorizonSet {
            six_months: None,
            twelve_months: Some(40.0),
            twenty_four_months: Some(42.0),
        };
        let metrics = engine.evaluate(&project(), &prices);

        assert_eq!(*metrics.get(Horizon::SixMonths), HorizonMetrics::not_computable(Horizon::SixMonths, None));
        assert!(metrics.get(Horizon::TwelveMonths).npv.is_some());
        assert_eq!(metrics.get(Horizon::TwentyFourMonths).avg_ssp_price, Some(42.0));
    }

    #[test]
    fn test_resolve_uses_table() {
        let engine = RoiEngine::default();
        let terms = engine.resolve(CreditRating::AA, LoanTerm::Years15).unwrap();
        assert_eq!(terms, engine.table().resolve(CreditRating::AA, LoanTerm::Years15).unwrap());
    }
}
