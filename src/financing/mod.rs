//! Financing assumptions: credit grades, loan terms and the rating/term lookup table

mod terms;
mod table;
pub mod loader;

pub use terms::{CreditRating, LoanTerm, FinancingTerms};
pub use table::{FinancingAssumption, FinancingTable};
pub use loader::DEFAULT_FINANCING_TABLE_PATH;
