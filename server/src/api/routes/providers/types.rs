//! Provider API types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::{ProviderData, ProviderPatch, ProviderRow};

/// Provider DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDto {
    pub id: i64,
    pub name: String,
    pub specialty: Option<String>,
    pub hospital_id: Option<i64>,
}

impl From<ProviderRow> for ProviderDto {
    fn from(row: ProviderRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            specialty: row.specialty,
            hospital_id: row.hospital_id,
        }
    }
}

/// Request body for creating or replacing a provider
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRequest {
    pub id: Option<i64>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(max = 255, message = "Specialty must be at most 255 characters"))]
    pub specialty: Option<String>,

    #[validate(range(min = 1, message = "hospitalId must be positive"))]
    pub hospital_id: Option<i64>,
}

impl From<ProviderRequest> for ProviderData {
    fn from(body: ProviderRequest) -> Self {
        Self {
            name: body.name,
            specialty: body.specialty,
            hospital_id: body.hospital_id,
        }
    }
}

/// Request body for a partial update
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderPatchRequest {
    pub id: Option<i64>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 255, message = "Specialty must be at most 255 characters"))]
    pub specialty: Option<String>,

    #[validate(range(min = 1, message = "hospitalId must be positive"))]
    pub hospital_id: Option<i64>,
}

impl From<ProviderPatchRequest> for ProviderPatch {
    fn from(body: ProviderPatchRequest) -> Self {
        Self {
            name: body.name,
            specialty: body.specialty,
            hospital_id: body.hospital_id,
        }
    }
}
