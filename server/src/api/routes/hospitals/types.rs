//! Hospital API types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::{HospitalData, HospitalPatch, HospitalRow};

/// Hospital DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct HospitalDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<HospitalRow> for HospitalDto {
    fn from(row: HospitalRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

/// Request body for creating or replacing a hospital
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct HospitalRequest {
    pub id: Option<i64>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

impl From<HospitalRequest> for HospitalData {
    fn from(body: HospitalRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
        }
    }
}

/// Request body for a partial update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct HospitalPatchRequest {
    pub id: Option<i64>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

impl From<HospitalPatchRequest> for HospitalPatch {
    fn from(body: HospitalPatchRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
        }
    }
}
