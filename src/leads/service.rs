//! Lead submission and ranking

use chrono::Utc;
use rayon::prelude::*;

use super::{Lead, LeadId, LeadQuery, LeadStore};
use crate::engine::RoiEngine;
use crate::error::{RoiError, RoiResult};
use crate::financing::{CreditRating, FinancingTerms, LoanTerm};
use crate::horizon::HorizonSet;
use crate::market::{PriceFeed, PriceWindow};
use crate::project::{BatchEntry, ProjectInput, ProjectSubmission};

/// Evaluates submissions into leads and serves ranked listings
pub struct LeadService<S, F> {
    engine: RoiEngine,
    store: S,
    feed: F,
}

impl<S: LeadStore, F: PriceFeed> LeadService<S, F> {
    pub fn new(engine: RoiEngine, store: S, feed: F) -> Self {
        Self { engine, store, feed }
    }

    pub fn engine(&self) -> &RoiEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Financing terms offered for a rating and loan term
    pub fn financing_assumptions(&self, rating: CreditRating, term: LoanTerm) -> RoiResult<FinancingTerms> {
        self.engine.resolve(rating, term)
    }

    /// Evaluate a project with zone prices from the feed and store the lead
    pub fn submit(&self, project: ProjectInput, iso_rto: &str, load_zone: &str) -> RoiResult<Lead> {
        validate_location(iso_rto, load_zone)?;
        let prices = self.feed.horizon_prices(iso_rto, load_zone);
        self.submit_with_prices(project, iso_rto, load_zone, prices)
    }

    /// Evaluate a project with caller-supplied per-horizon prices
    pub fn submit_with_prices(
        &self,
        project: ProjectInput,
        iso_rto: &str,
        load_zone: &str,
        prices: HorizonSet<Option<f64>>,
    ) -> RoiResult<Lead> {
        project.validate()?;
        validate_location(iso_rto, load_zone)?;

        let metrics = self.engine.evaluate(&project, &prices);
        let lead = Lead {
            id: LeadId::new(),
            project,
            iso_rto: iso_rto.to_string(),
            load_zone: load_zone.to_string(),
            avg_ssp_price: self.feed.average_price(iso_rto, load_zone, PriceWindow::All),
            metrics,
            created_at: Utc::now(),
        };

        self.store.insert(lead.clone())?;
        log::info!(
            "Stored lead {} for {} ({} {})",
            lead.id,
            lead.project.company_name,
            lead.iso_rto,
            lead.load_zone
        );
        Ok(lead)
    }

    /// Fill missing financing from the table, then submit
    pub fn submit_form(&self, submission: ProjectSubmission, iso_rto: &str, load_zone: &str) -> RoiResult<Lead> {
        let project = submission.into_project(self.engine.table())?;
        self.submit(project, iso_rto, load_zone)
    }

    /// Submit many entries in parallel; results keep the input order
    pub fn submit_batch(&self, entries: Vec<BatchEntry>) -> Vec<RoiResult<Lead>> {
        entries
            .into_par_iter()
            .map(|entry| self.submit_form(entry.submission, &entry.iso_rto, &entry.load_zone))
            .collect()
    }

    pub fn get(&self, id: LeadId) -> RoiResult<Option<Lead>> {
        self.store.get(id)
    }

    /// All stored leads, ordered by the query
    pub fn list(&self, query: &LeadQuery) -> RoiResult<Vec<Lead>> {
        let mut leads = self.store.all()?;
        query.apply(&mut leads);
        Ok(leads)
    }
}

fn validate_location(iso_rto: &str, load_zone: &str) -> RoiResult<()> {
    if iso_rto.trim().is_empty() {
        return Err(RoiError::project("iso_rto", "is required"));
    }
    if load_zone.trim().is_empty() {
        return Err(RoiError::project("load_zone", "is required"));
    }
    Ok(())
}
