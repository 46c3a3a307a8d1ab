use gridroi::leads::{SortDirection, SortField};
use gridroi::project::load_batch;
use gridroi::{
    CreditRating, FinancingTerms, FixedPriceFeed, Horizon, InMemoryLeadStore, JsonLinesLeadStore, Lead,
    LeadQuery, LeadService, LeadStore, LoanTerm, PriceHistory, ProjectInput, RoiEngine, RoiError,
};

fn npvs(leads: &[Lead], horizon: Horizon) -> Vec<Option<f64>> {
    leads.iter().map(|l| l.metrics_for(horizon).npv).collect()
}

fn reference_project() -> ProjectInput {
    let financing = FinancingTerms::new(CreditRating::AA, LoanTerm::Years15, 0.6, 0.05).unwrap();
    ProjectInput::new("Pacific Creamery", 2_500_000.0, "94105", financing).unwrap()
}

#[test]
fn test_reference_project_metrics_agree_with_hurdle() {
    let service = LeadService::new(
        RoiEngine::default(),
        InMemoryLeadStore::new(),
        FixedPriceFeed::new().with_price("NP-15 LMP", 40.0),
    );
    let lead = service.submit(reference_project(), "CAISO", "NP-15 LMP").unwrap();

    let twelve = lead.metrics_for(Horizon::TwelveMonths);
    let npv = twelve.npv.unwrap();
    let irr = twelve.irr.unwrap();
    assert!(npv > 0.0);
    assert_eq!(npv > 0.0, irr > 0.12);
    assert!(twelve.payback_period_months.unwrap() <= 12.0);

    let six = lead.metrics_for(Horizon::SixMonths);
    assert!(six.npv.unwrap() < 0.0);
    assert!(six.irr.unwrap() < 0.12);
}

#[test]
fn test_full_ltv_never_reaches_the_store() {
    let service = LeadService::new(RoiEngine::default(), InMemoryLeadStore::new(), FixedPriceFeed::new());
    let mut project = reference_project();
    project.financing.loan_to_value_ratio = 1.0;

    let err = service.submit(project, "CAISO", "NP-15 LMP").unwrap_err();
    assert!(matches!(err, RoiError::InvalidFinancingTerms { .. }));
    assert!(service.list(&LeadQuery::default()).unwrap().is_empty());
}

#[test]
fn test_batch_from_sample_files_ranks_by_npv() {
    let dir = tempfile::tempdir().unwrap();
    let history = PriceHistory::from_csv_path("data/market/caiso_zone_prices.csv").unwrap();
    let store = JsonLinesLeadStore::open(dir.path().join("leads.jsonl")).unwrap();
    let service = LeadService::new(RoiEngine::default(), store, history);

    let entries = load_batch("data/projects_sample.csv").unwrap();
    let names: Vec<String> = entries.iter().map(|e| e.submission.company_name.clone()).collect();

    let results = service.submit_batch(entries);
    let stored: Vec<Lead> = results.into_iter().map(|r| r.unwrap()).collect();
    let stored_names: Vec<String> = stored.iter().map(|l| l.project.company_name.clone()).collect();
    assert_eq!(stored_names, names);

    for lead in &stored {
        assert!(lead.avg_ssp_price.is_some());
        assert!(lead.metrics_for(Horizon::TwentyFourMonths).npv.is_some());
    }

    let query = LeadQuery::sorted_by(SortField::Npv, Horizon::TwentyFourMonths, SortDirection::Desc);
    let ranked = service.list(&query).unwrap();
    assert_eq!(ranked.len(), stored.len());

    let values: Vec<f64> = npvs(&ranked, Horizon::TwentyFourMonths).into_iter().flatten().collect();
    assert!(values.windows(2).all(|w| w[0] >= w[1]));

    // Reopening the file sees every lead
    let reopened = JsonLinesLeadStore::open(dir.path().join("leads.jsonl")).unwrap();
    assert_eq!(reopened.all().unwrap().len(), stored.len());
}

#[test]
fn test_not_computable_leads_rank_lowest() {
    let feed = FixedPriceFeed::new()
        .with_price("NP-15 LMP", 40.0)
        .with_price("SP-15 LMP", 25.0);
    let service = LeadService::new(RoiEngine::default(), InMemoryLeadStore::new(), feed);

    service.submit(reference_project(), "CAISO", "NP-15 LMP").unwrap();
    service.submit(reference_project(), "CAISO", "ZP-26 LMP").unwrap();
    service.submit(reference_project(), "CAISO", "SP-15 LMP").unwrap();

    let asc = service
        .list(&LeadQuery::sorted_by(SortField::Irr, Horizon::TwelveMonths, SortDirection::Asc))
        .unwrap();
    let zones: Vec<&str> = asc.iter().map(|l| l.load_zone.as_str()).collect();
    assert_eq!(zones, vec!["ZP-26 LMP", "SP-15 LMP", "NP-15 LMP"]);

    let desc = service
        .list(&LeadQuery::sorted_by(SortField::Irr, Horizon::TwelveMonths, SortDirection::Desc))
        .unwrap();
    let zones: Vec<&str> = desc.iter().map(|l| l.load_zone.as_str()).collect();
    assert_eq!(zones, vec!["NP-15 LMP", "SP-15 LMP", "ZP-26 LMP"]);
}
