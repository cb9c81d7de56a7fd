//! Patient API endpoints

pub mod types;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::get;
use axum::{Json, Router};

use super::{EntityApiState, check_body_id, id_not_found, reject_new_id};
use crate::api::extractors::{CriteriaQuery, IdPath, ValidatedJson};
use crate::api::pagination::pagination_headers;
use crate::api::types::ApiError;
use crate::data::criteria::Criteria;
use crate::data::sqlite::repositories::{
    create_patient, delete_patient, get_patient, patch_patient, update_patient,
};
use crate::domain::PatientCriteria;

use types::{PatientDto, PatientPatchRequest, PatientRequest};

const ENTITY_NAME: &str = "Patient";

/// Build Patient API routes
pub fn routes(state: EntityApiState) -> Router<()> {
    Router::new()
        .route("/", get(list_patients).post(create))
        .route("/count", get(count_patients))
        .route(
            "/{id}",
            get(get_one)
                .put(update)
                .patch(partial_update)
                .delete(delete),
        )
        .with_state(state)
}

/// List patients matching the criteria parameters
#[utoipa::path(
    get,
    path = "/api/patients",
    tag = "patients",
    params(
        ("page" = Option<u32>, Query, description = "Zero-indexed page number"),
        ("size" = Option<u32>, Query, description = "Page size"),
        ("sort" = Option<String>, Query, description = "field,asc|desc (repeatable)"),
        ("distinct" = Option<bool>, Query, description = "Collapse duplicate rows"),
        ("name.contains" = Option<String>, Query, description = "Case-insensitive substring"),
        ("sex.equals" = Option<String>, Query, description = "MALE or FEMALE"),
        ("providerId.equals" = Option<i64>, Query, description = "Provider id")
    ),
    responses(
        (status = 200, description = "Page of patients; X-Total-Count and Link headers", body = [PatientDto]),
        (status = 400, description = "Invalid filter or paging parameter")
    )
)]
pub async fn list_patients(
    State(state): State<EntityApiState>,
    query: CriteriaQuery<PatientCriteria>,
) -> Result<(HeaderMap, Json<Vec<PatientDto>>), ApiError> {
    let request = query
        .paging
        .to_page_request(PatientCriteria::entity(), &state.pagination)?;
    let page = state
        .query
        .find_by_criteria_paged(&query.criteria, &request)
        .await?;
    let headers = pagination_headers(&query.uri, &page);
    Ok((headers, Json(page.map(PatientDto::from).content)))
}

/// Count patients matching the criteria parameters
#[utoipa::path(
    get,
    path = "/api/patients/count",
    tag = "patients",
    responses(
        (status = 200, description = "Number of matching patients", body = u64),
        (status = 400, description = "Invalid filter parameter")
    )
)]
pub async fn count_patients(
    State(state): State<EntityApiState>,
    query: CriteriaQuery<PatientCriteria>,
) -> Result<Json<u64>, ApiError> {
    let count = state.query.count_by_criteria(&query.criteria).await?;
    Ok(Json(count))
}

/// Get a patient by id
#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    tag = "patients",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient", body = PatientDto),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn get_one(
    State(state): State<EntityApiState>,
    IdPath(id): IdPath,
) -> Result<Json<PatientDto>, ApiError> {
    tracing::debug!(id, "get patient");
    let row = get_patient(state.database.pool(), id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found(ENTITY_NAME, id))?;
    Ok(Json(row.into()))
}

/// Create a patient
#[utoipa::path(
    post,
    path = "/api/patients",
    tag = "patients",
    request_body = PatientRequest,
    responses(
        (status = 201, description = "Patient created", body = PatientDto),
        (status = 400, description = "Invalid body, id present or unknown provider")
    )
)]
pub async fn create(
    State(state): State<EntityApiState>,
    ValidatedJson(body): ValidatedJson<PatientRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<PatientDto>), ApiError> {
    reject_new_id("patient", body.id)?;
    let row = create_patient(state.database.pool(), &body.into()).await?;
    tracing::debug!(id = row.id, "created patient");
    let location = format!("/api/patients/{}", row.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(row.into()),
    ))
}

/// Replace a patient
#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    tag = "patients",
    params(("id" = i64, Path, description = "Patient id")),
    request_body = PatientRequest,
    responses(
        (status = 200, description = "Patient updated", body = PatientDto),
        (status = 400, description = "Missing or mismatched id, or unknown patient")
    )
)]
pub async fn update(
    State(state): State<EntityApiState>,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<PatientRequest>,
) -> Result<Json<PatientDto>, ApiError> {
    check_body_id(id, body.id)?;
    let row = update_patient(state.database.pool(), id, &body.into())
        .await?
        .ok_or_else(|| id_not_found(ENTITY_NAME, id))?;
    Ok(Json(row.into()))
}

/// Update the fields present in the body
#[utoipa::path(
    patch,
    path = "/api/patients/{id}",
    tag = "patients",
    params(("id" = i64, Path, description = "Patient id")),
    request_body = PatientPatchRequest,
    responses(
        (status = 200, description = "Patient updated", body = PatientDto),
        (status = 400, description = "Missing or mismatched id"),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn partial_update(
    State(state): State<EntityApiState>,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<PatientPatchRequest>,
) -> Result<Json<PatientDto>, ApiError> {
    check_body_id(id, body.id)?;
    let row = patch_patient(state.database.pool(), id, &body.into())
        .await?
        .ok_or_else(|| ApiError::entity_not_found(ENTITY_NAME, id))?;
    Ok(Json(row.into()))
}

/// Delete a patient
#[utoipa::path(
    delete,
    path = "/api/patients/{id}",
    tag = "patients",
    params(("id" = i64, Path, description = "Patient id")),
    responses((status = 204, description = "Patient deleted or absent"))
)]
pub async fn delete(
    State(state): State<EntityApiState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    if !delete_patient(state.database.pool(), id).await? {
        tracing::debug!(id, "delete of absent patient");
    }
    Ok(StatusCode::NO_CONTENT)
}
