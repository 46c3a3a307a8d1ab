//! Evaluated leads, their stores and ranking queries

mod lead;
mod query;
mod service;
mod store;

pub use lead::{Lead, LeadId};
pub use query::{LeadQuery, SortDirection, SortField};
pub use service::LeadService;
pub use store::{InMemoryLeadStore, JsonLinesLeadStore, LeadStore};
