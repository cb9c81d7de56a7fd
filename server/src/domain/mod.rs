//! Domain layer
//!
//! - `criteria` - per-entity criteria and their field resolution
//! - `query` - criteria query service over a query executor

pub mod criteria;
pub mod query;

pub use criteria::{PatientCriteria, ProviderCriteria};
pub use query::QueryService;
