//! Load batches of project submissions from CSV

use std::error::Error;
use std::path::Path;

use csv::Reader;
use serde::{Deserialize, Serialize};

use super::ProjectSubmission;
use crate::error::{RoiError, RoiResult};

/// One project submission together with the grid location it is priced in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub submission: ProjectSubmission,
    pub iso_rto: String,
    pub load_zone: String,
}

/// Raw CSV row matching the batch file columns
#[derive(Debug, Deserialize)]
struct CsvRow {
    company_name: String,
    total_project_cost: f64,
    site_zip_code: String,
    credit_rating: String,
    loan_term: String,
    #[serde(default)]
    loan_to_value_ratio: Option<f64>,
    #[serde(default)]
    interest_rate_annual: Option<f64>,
    iso_rto: String,
    load_zone: String,
}

impl CsvRow {
    fn into_entry(self, line: usize) -> RoiResult<BatchEntry> {
        let at_line = |e: RoiError| RoiError::Parse(format!("line {}: {}", line, e));

        Ok(BatchEntry {
            submission: ProjectSubmission {
                company_name: self.company_name,
                total_project_cost: self.total_project_cost,
                site_zip_code: self.site_zip_code,
                credit_rating: self.credit_rating.parse().map_err(at_line)?,
                loan_term: self.loan_term.parse().map_err(at_line)?,
                loan_to_value_ratio: self.loan_to_value_ratio,
                interest_rate_annual: self.interest_rate_annual,
            },
            iso_rto: self.iso_rto,
            load_zone: self.load_zone,
        })
    }
}

/// Load all batch entries from a CSV file
pub fn load_batch<P: AsRef<Path>>(path: P) -> RoiResult<Vec<BatchEntry>> {
    let file = std::fs::File::open(path)?;
    load_batch_from_reader(file)
}

/// Load batch entries from any reader (e.g., string buffer, request body)
pub fn load_batch_from_reader<R: std::io::Read>(reader: R) -> RoiResult<Vec<BatchEntry>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut entries = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result.map_err(|e| {
            RoiError::Parse(format!(
                "line {}: {}",
                index + 2,
                e.source().map(|s| s.to_string()).unwrap_or_else(|| e.to_string())
            ))
        })?;
        entries.push(row.into_entry(index + 2)?);
    }

    Ok(entries)
}
