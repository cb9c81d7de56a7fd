//! SQLite repositories
//!
//! Types (PatientRow, ProviderRow, etc.) should be imported from `crate::data::types`.

pub mod hospital;
pub mod patient;
pub mod provider;

pub use hospital::{
    create_hospital, delete_hospital, get_hospital, patch_hospital, update_hospital,
};
pub use patient::{create_patient, delete_patient, get_patient, patch_patient, update_patient};
pub use provider::{
    create_provider, delete_provider, get_provider, patch_provider, update_provider,
};
