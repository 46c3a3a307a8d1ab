//! CSV-based financing table loader
//!
//! Loads the rating/term assumption table from data/assumptions/

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::table::FinancingAssumption;
use super::terms::{CreditRating, LoanTerm};
use crate::error::{RoiError, RoiResult};

/// Default path to the financing assumption table
pub const DEFAULT_FINANCING_TABLE_PATH: &str = "data/assumptions/financing_table.csv";

/// Raw CSV row matching financing_table.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    credit_rating: String,
    loan_term_years: u32,
    loan_to_value_ratio: f64,
    interest_rate_annual: f64,
}

impl CsvRow {
    fn into_entry(self) -> RoiResult<((CreditRating, LoanTerm), FinancingAssumption)> {
        let rating: CreditRating = self.credit_rating.parse()?;
        let term = LoanTerm::from_years(self.loan_term_years).ok_or_else(|| {
            RoiError::InvalidAssumptions(format!("unsupported loan term {} years", self.loan_term_years))
        })?;

        Ok((
            (rating, term),
            FinancingAssumption {
                loan_to_value_ratio: self.loan_to_value_ratio,
                interest_rate_annual: self.interest_rate_annual,
            },
        ))
    }
}

/// Load financing rows from a CSV file
pub fn load_financing_rows(
    path: &Path,
) -> RoiResult<Vec<((CreditRating, LoanTerm), FinancingAssumption)>> {
    let file = File::open(path)?;
    load_financing_rows_from_reader(file)
}

/// Load financing rows from any reader
///
/// A rating/term pair listed twice is rejected rather than silently overwritten.
pub fn load_financing_rows_from_reader<R: Read>(
    reader: R,
) -> RoiResult<Vec<((CreditRating, LoanTerm), FinancingAssumption)>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows: Vec<((CreditRating, LoanTerm), FinancingAssumption)> = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        let (key, assumption) = row.into_entry()?;
        if rows.iter().any(|(existing, _)| *existing == key) {
            return Err(RoiError::InvalidAssumptions(format!(
                "duplicate entry for {}/{}",
                key.0, key.1
            )));
        }
        rows.push((key, assumption));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financing::FinancingTable;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_load_default_table_matches_builtin() {
        let loaded = FinancingTable::from_csv();
        assert!(loaded.is_ok(), "Failed to load financing table: {:?}", loaded.err());
        let loaded = loaded.unwrap();
        let builtin = FinancingTable::default_table();

        assert_eq!(loaded.len(), 25);
        for rating in CreditRating::ALL {
            for term in LoanTerm::ALL {
                let a = loaded.get(rating, term).unwrap();
                let b = builtin.get(rating, term).unwrap();
                assert_abs_diff_eq!(a.loan_to_value_ratio, b.loan_to_value_ratio, epsilon = 1e-9);
                assert_abs_diff_eq!(a.interest_rate_annual, b.interest_rate_annual, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_load_from_reader() {
        let data = "credit_rating,loan_term_years,loan_to_value_ratio,interest_rate_annual\n\
                    AAA,5,0.5,0.045\n\
                    BB,5,0.7,0.065\n";
        let rows = load_financing_rows_from_reader(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].0, (CreditRating::BB, LoanTerm::Years5));
    }

    #[test]
    fn test_rejects_unknown_term() {
        let data = "credit_rating,loan_term_years,loan_to_value_ratio,interest_rate_annual\n\
                    AAA,7,0.5,0.045\n";
        let err = load_financing_rows_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, RoiError::InvalidAssumptions(_)));
    }

    #[test]
    fn test_rejects_duplicate_pair() {
        let data = "credit_rating,loan_term_years,loan_to_value_ratio,interest_rate_annual\n\
                    A,10,0.6,0.05\n\
                    A,10,0.62,0.05\n";
        assert!(load_financing_rows_from_reader(data.as_bytes()).is_err());
    }
}
