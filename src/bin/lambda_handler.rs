//! AWS Lambda handler for the ROI engine
//!
//! Accepts JSON events tagged by `action`:
//! - `financing_assumptions`: terms for a credit rating and loan term
//! - `submit_project`: evaluate a project and store it as a lead
//! - `list_leads`: stored leads, optionally ranked
//!
//! Supports Lambda Function URLs: when the event carries a string `body`, the
//! request is read from it and the reply is wrapped in an HTTP response.

use std::env;
use std::path::PathBuf;

use gridroi::leads::{SortDirection, SortField};
use gridroi::{
    EngineConfig, FinancingTable, FixedPriceFeed, Horizon, JsonLinesLeadStore, LeadQuery, LeadService,
    LeadStore, PriceFeed, PriceHistory, ProjectSubmission, RoiEngine, RoiError,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Deserialize;
use serde_json::{json, Value};

type Service = LeadService<JsonLinesLeadStore, Box<dyn PriceFeed>>;

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum RoiRequest {
    FinancingAssumptions {
        credit_rating: String,
        loan_term: String,
    },
    SubmitProject {
        project: ProjectSubmission,
        iso_rto: String,
        load_zone: String,
    },
    ListLeads {
        #[serde(default)]
        sort_field: SortField,
        #[serde(default = "default_horizon")]
        horizon: Horizon,
        #[serde(default)]
        direction: SortDirection,
    },
}

fn default_horizon() -> Horizon {
    Horizon::TwelveMonths
}

fn build_service() -> Result<Service, Error> {
    let table = match env::var("ROI_FINANCING_TABLE").ok() {
        Some(path) => FinancingTable::from_csv_path(&PathBuf::from(path))?,
        None => FinancingTable::default_table(),
    };
    let engine = RoiEngine::new(table, EngineConfig::from_env());

    let feed: Box<dyn PriceFeed> = match env::var("ROI_PRICE_HISTORY").ok() {
        Some(path) => Box::new(PriceHistory::from_csv_path(path)?),
        None => Box::new(FixedPriceFeed::new()),
    };

    // Lambda only allows writes under /tmp
    let store_path = env::var("ROI_LEAD_STORE").unwrap_or_else(|_| "/tmp/leads.jsonl".to_string());
    let store = JsonLinesLeadStore::open(store_path)?;

    Ok(LeadService::new(engine, store, feed))
}

fn dispatch<S: LeadStore, F: PriceFeed>(service: &LeadService<S, F>, request: RoiRequest) -> Result<Value, RoiError> {
    match request {
        RoiRequest::FinancingAssumptions { credit_rating, loan_term } => {
            let terms = service.engine().table().resolve_labels(&credit_rating, &loan_term)?;
            Ok(serde_json::to_value(terms)?)
        }
        RoiRequest::SubmitProject { project, iso_rto, load_zone } => {
            let lead = service.submit_form(project, &iso_rto, &load_zone)?;
            Ok(serde_json::to_value(lead)?)
        }
        RoiRequest::ListLeads { sort_field, horizon, direction } => {
            let leads = service.list(&LeadQuery::sorted_by(sort_field, horizon, direction))?;
            Ok(json!({ "leads": leads }))
        }
    }
}

/// Reply body and HTTP status for a request payload
fn respond<S: LeadStore, F: PriceFeed>(
    service: &LeadService<S, F>,
    payload: Result<RoiRequest, serde_json::Error>,
) -> (u16, Value) {
    let request = match payload {
        Ok(request) => request,
        Err(e) => return (400, json!({ "error": format!("Invalid request: {}", e) })),
    };

    match dispatch(service, request) {
        Ok(body) => (200, body),
        Err(e) if e.is_validation() => (400, json!({ "error": e.to_string() })),
        Err(e) => {
            log::error!("Request failed: {}", e);
            (500, json!({ "error": e.to_string() }))
        }
    }
}

async fn handler(service: &Service, event: LambdaEvent<Value>) -> Result<Value, Error> {
    let payload = event.payload;

    // Function URL events carry the request as a JSON string body
    if let Some(body) = payload.get("body").and_then(Value::as_str) {
        let (status, reply) = respond(service, serde_json::from_str(body));
        return Ok(json!({
            "statusCode": status,
            "headers": { "Content-Type": "application/json" },
            "body": reply.to_string(),
        }));
    }

    let (_, reply) = respond(service, serde_json::from_value(payload));
    Ok(reply)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let service = build_service()?;
    let service = &service;

    run(service_fn(move |event: LambdaEvent<Value>| async move { handler(service, event).await })).await
}
