//! Project data structures and batch loading

mod data;
pub mod loader;

pub use data::{ProjectInput, ProjectSubmission};
pub use loader::{load_batch, load_batch_from_reader, BatchEntry};
