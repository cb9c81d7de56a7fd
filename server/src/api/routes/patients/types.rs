//! Patient API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::{PatientData, PatientPatch, PatientRow, Sex};

/// Patient DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientDto {
    pub id: i64,
    pub name: String,
    pub date_of_birth: DateTime<Utc>,
    pub sex: Sex,
    pub provider_id: Option<i64>,
}

impl From<PatientRow> for PatientDto {
    fn from(row: PatientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            date_of_birth: row.date_of_birth,
            sex: row.sex,
            provider_id: row.provider_id,
        }
    }
}

/// Request body for creating or replacing a patient
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientRequest {
    /// Must be absent on create and match the path on update
    pub id: Option<i64>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    pub date_of_birth: DateTime<Utc>,

    pub sex: Sex,

    #[validate(range(min = 1, message = "providerId must be positive"))]
    pub provider_id: Option<i64>,
}

impl From<PatientRequest> for PatientData {
    fn from(body: PatientRequest) -> Self {
        Self {
            name: body.name,
            date_of_birth: body.date_of_birth,
            sex: body.sex,
            provider_id: body.provider_id,
        }
    }
}

/// Request body for a partial update; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientPatchRequest {
    pub id: Option<i64>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    pub date_of_birth: Option<DateTime<Utc>>,

    pub sex: Option<Sex>,

    #[validate(range(min = 1, message = "providerId must be positive"))]
    pub provider_id: Option<i64>,
}

impl From<PatientPatchRequest> for PatientPatch {
    fn from(body: PatientPatchRequest) -> Self {
        Self {
            name: body.name,
            date_of_birth: body.date_of_birth,
            sex: body.sex,
            provider_id: body.provider_id,
        }
    }
}
