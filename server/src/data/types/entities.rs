//! Entity rows and write models
//!
//! Instants are stored as unix milliseconds and exposed as `DateTime<Utc>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::Sex;

// ============================================================================
// Hospital
// ============================================================================

/// Hospital row from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Fields written on insert and full update
#[derive(Debug, Clone, PartialEq)]
pub struct HospitalData {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HospitalPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

// ============================================================================
// Provider
// ============================================================================

/// Provider row from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRow {
    pub id: i64,
    pub name: String,
    pub specialty: Option<String>,
    pub hospital_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderData {
    pub name: String,
    pub specialty: Option<String>,
    pub hospital_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderPatch {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub hospital_id: Option<i64>,
}

// ============================================================================
// Patient
// ============================================================================

/// Patient row from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRow {
    pub id: i64,
    pub name: String,
    pub date_of_birth: DateTime<Utc>,
    pub sex: Sex,
    pub provider_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatientData {
    pub name: String,
    pub date_of_birth: DateTime<Utc>,
    pub sex: Sex,
    pub provider_id: Option<i64>,
}

/// Non-null fields replace stored values, `None` keeps them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientPatch {
    pub name: Option<String>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub sex: Option<Sex>,
    pub provider_id: Option<i64>,
}
