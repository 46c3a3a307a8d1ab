//! Grid ROI CLI
//!
//! Resolve financing terms, submit projects and rank stored leads

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use gridroi::leads::{SortDirection, SortField};
use gridroi::project::load_batch;
use gridroi::{
    CreditRating, EngineConfig, FinancingTable, FixedPriceFeed, Horizon, JsonLinesLeadStore, Lead,
    LeadQuery, LeadService, LoanTerm, PriceFeed, PriceHistory, ProjectSubmission, RoiEngine,
};

#[derive(Parser)]
#[command(name = "gridroi", version, about = "ROI analytics for financed smart-grid retrofits")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Financing table CSV (built-in table when omitted)
    #[arg(long, global = true)]
    table: Option<PathBuf>,

    /// Lead store, one JSON document per line
    #[arg(long, default_value = "data/leads.jsonl", global = true)]
    store: PathBuf,

    /// Zone price history CSV (datetime,zone,price)
    #[arg(long, global = true)]
    prices: Option<PathBuf>,

    /// Fixed zone price as ZONE=PRICE, used when no history is given
    #[arg(long = "price", value_parser = parse_zone_price, global = true)]
    fixed_prices: Vec<(String, f64)>,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the financing terms for a credit rating and loan term
    Financing {
        #[arg(long, default_value = "AA")]
        rating: CreditRating,
        #[arg(long, default_value = "15y")]
        term: LoanTerm,
    },
    /// Evaluate a project and store it as a lead
    Submit {
        #[arg(long)]
        company: String,
        #[arg(long)]
        cost: f64,
        #[arg(long)]
        zip: String,
        #[arg(long, default_value = "AA")]
        rating: CreditRating,
        #[arg(long, default_value = "15y")]
        term: LoanTerm,
        /// Loan-to-value ratio (table value when omitted)
        #[arg(long)]
        ltv: Option<f64>,
        /// Annual interest rate (table value when omitted)
        #[arg(long)]
        rate: Option<f64>,
        #[arg(long)]
        iso: String,
        #[arg(long)]
        zone: String,
    },
    /// List stored leads, optionally ranked by a metric
    Leads {
        #[arg(long, default_value = "none")]
        sort: SortField,
        #[arg(long, default_value = "12m")]
        horizon: Horizon,
        #[arg(long, default_value = "asc")]
        direction: SortDirection,
    },
    /// Evaluate every project in a CSV file
    Batch { file: PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn parse_zone_price(raw: &str) -> Result<(String, f64), String> {
    let (zone, price) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected ZONE=PRICE, got {:?}", raw))?;
    let price = price
        .trim()
        .parse()
        .map_err(|e| format!("invalid price {:?}: {}", price, e))?;
    Ok((zone.trim().to_string(), price))
}

fn main() -> Result<()> {
    env_logger::init();
    run(Cli::parse())
}

fn open_service(
    engine: RoiEngine,
    feed: Box<dyn PriceFeed>,
    store: &Path,
) -> Result<LeadService<JsonLinesLeadStore, Box<dyn PriceFeed>>> {
    let store = JsonLinesLeadStore::open(store)
        .with_context(|| format!("opening lead store {}", store.display()))?;
    Ok(LeadService::new(engine, store, feed))
}

fn run(cli: Cli) -> Result<()> {
    let table = match &cli.table {
        Some(path) => FinancingTable::from_csv_path(path)
            .with_context(|| format!("loading financing table {}", path.display()))?,
        None => FinancingTable::default_table(),
    };
    let engine = RoiEngine::new(table, EngineConfig::from_env());

    let feed: Box<dyn PriceFeed> = match &cli.prices {
        Some(path) => Box::new(
            PriceHistory::from_csv_path(path)
                .with_context(|| format!("loading price history {}", path.display()))?,
        ),
        None => Box::new(
            cli.fixed_prices
                .iter()
                .fold(FixedPriceFeed::new(), |feed, (zone, price)| feed.with_price(zone.clone(), *price)),
        ),
    };

    // Only the lead commands touch the store file
    match cli.command {
        Commands::Financing { rating, term } => {
            let terms = engine.resolve(rating, term)?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&terms)?),
                OutputFormat::Table => {
                    println!("Financing terms for {} / {}", terms.credit_rating, terms.loan_term);
                    println!("  Loan-to-value: {:.2}%", terms.loan_to_value_ratio * 100.0);
                    println!("  Annual rate:   {:.3}%", terms.interest_rate_annual * 100.0);
                }
            }
        }
        Commands::Submit { company, cost, zip, rating, term, ltv, rate, iso, zone } => {
            let submission = ProjectSubmission {
                company_name: company,
                total_project_cost: cost,
                site_zip_code: zip,
                credit_rating: rating,
                loan_term: term,
                loan_to_value_ratio: ltv,
                interest_rate_annual: rate,
            };
            let service = open_service(engine, feed, &cli.store)?;
            let lead = service.submit_form(submission, &iso, &zone)?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&lead)?),
                OutputFormat::Table => print_lead_detail(&lead),
            }
        }
        Commands::Leads { sort, horizon, direction } => {
            let service = open_service(engine, feed, &cli.store)?;
            let leads = service.list(&LeadQuery::sorted_by(sort, horizon, direction))?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&leads)?),
                OutputFormat::Table => print_lead_table(&leads, horizon),
            }
        }
        Commands::Batch { file } => {
            let entries = load_batch(&file).with_context(|| format!("loading batch {}", file.display()))?;
            let total = entries.len();
            let service = open_service(engine, feed, &cli.store)?;
            let results = service.submit_batch(entries);

            let mut stored = Vec::new();
            for (line, result) in results.into_iter().enumerate() {
                match result {
                    Ok(lead) => stored.push(lead),
                    Err(e) => eprintln!("row {}: {}", line + 1, e),
                }
            }

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stored)?),
                OutputFormat::Table => {
                    println!("Stored {} of {} projects\n", stored.len(), total);
                    print_lead_table(&stored, Horizon::TwelveMonths);
                }
            }
        }
    }

    Ok(())
}

fn fmt_opt(value: Option<f64>, scale: f64, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v * scale),
        None => "n/a".to_string(),
    }
}

fn print_lead_detail(lead: &Lead) {
    println!("Lead {}", lead.id);
    println!("  Company: {}", lead.project.company_name);
    println!("  Cost:    ${:.0}", lead.project.total_project_cost);
    println!(
        "  Terms:   {} / {} LTV {:.2}% at {:.3}%",
        lead.project.financing.credit_rating,
        lead.project.financing.loan_term,
        lead.project.financing.loan_to_value_ratio * 100.0,
        lead.project.financing.interest_rate_annual * 100.0
    );
    println!("  Zone:    {} {} (avg ${}/MWh)", lead.iso_rto, lead.load_zone, fmt_opt(lead.avg_ssp_price, 1.0, 2));
    println!();
    println!("{:>8} {:>12} {:>16} {:>10} {:>14}", "Horizon", "Price", "NPV", "IRR %", "Payback (mo)");
    println!("{}", "-".repeat(64));
    for (horizon, m) in lead.metrics.iter() {
        println!(
            "{:>8} {:>12} {:>16} {:>10} {:>14}",
            horizon,
            fmt_opt(m.avg_ssp_price, 1.0, 2),
            fmt_opt(m.npv, 1.0, 0),
            fmt_opt(m.irr, 100.0, 2),
            fmt_opt(m.payback_period_months, 1.0, 1)
        );
    }
}

fn print_lead_table(leads: &[Lead], horizon: Horizon) {
    println!("{:<36} {:<24} {:>14} {:>16} {:>10}", "Id", "Company", "Cost", format!("NPV {}", horizon), "IRR %");
    println!("{}", "-".repeat(104));
    for lead in leads {
        let m = lead.metrics_for(horizon);
        println!(
            "{:<36} {:<24} {:>14.0} {:>16} {:>10}",
            lead.id,
            lead.project.company_name,
            lead.project.total_project_cost,
            fmt_opt(m.npv, 1.0, 0),
            fmt_opt(m.irr, 100.0, 2)
        );
    }
}
