//! Per-entity criteria types

mod patient;
mod provider;

pub use patient::{PatientCriteria, PatientField};
pub use provider::{ProviderCriteria, ProviderField};
