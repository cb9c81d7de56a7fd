//! Shared data types
//!
//! Row types returned by repositories and the query executor, plus the
//! write models repositories accept.

mod entities;
mod enums;

pub use entities::{
    HospitalData, HospitalPatch, HospitalRow, PatientData, PatientPatch, PatientRow, ProviderData,
    ProviderPatch, ProviderRow,
};
pub use enums::Sex;
