//! Provider API endpoints

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
    create_provider, delete_provider, get_provider, patch_provider, update_provider,
};
use crate::domain::ProviderCriteria;

use types::{ProviderDto, ProviderPatchRequest, ProviderRequest};

const ENTITY_NAME: &str = "Provider";

/// Build Provider API routes
pub fn routes(state: EntityApiState) -> Router<()> {
    Router::new()
        .route("/", get(list_providers).post(create))
        .route("/count", get(count_providers))
        .route(
            "/{id}",
            get(get_one)
                .put(update)
                .patch(partial_update)
                .delete(delete),
        )
        .with_state(state)
}

/// List providers matching the criteria parameters
#[utoipa::path(
    get,
    path = "/api/providers",
    tag = "providers",
    params(
        ("page" = Option<u32>, Query, description = "Zero-indexed page number"),
        ("size" = Option<u32>, Query, description = "Page size"),
        ("sort" = Option<String>, Query, description = "field,asc|desc (repeatable)"),
        ("distinct" = Option<bool>, Query, description = "Collapse rows repeated by patientId joins"),
        ("specialty.contains" = Option<String>, Query, description = "Case-insensitive substring"),
        ("patientId.in" = Option<String>, Query, description = "Comma separated patient ids"),
        ("hospitalId.equals" = Option<i64>, Query, description = "Hospital id")
    ),
    responses(
        (status = 200, description = "Page of providers; X-Total-Count and Link headers", body = [ProviderDto]),
        (status = 400, description = "Invalid filter or paging parameter")
    )
)]
pub async fn list_providers(
    State(state): State<EntityApiState>,
    query: CriteriaQuery<ProviderCriteria>,
) -> Result<(HeaderMap, Json<Vec<ProviderDto>>), ApiError> {
    let request = query
        .paging
        .to_page_request(ProviderCriteria::entity(), &state.pagination)?;
    let page = state
        .query
        .find_by_criteria_paged(&query.criteria, &request)
        .await?;
    let headers = pagination_headers(&query.uri, &page);
    Ok((headers, Json(page.map(ProviderDto::from).content)))
}

/// Count providers matching the criteria parameters
#[utoipa::path(
    get,
    path = "/api/providers/count",
    tag = "providers",
    responses(
        (status = 200, description = "Number of matching providers", body = u64),
        (status = 400, description = "Invalid filter parameter")
    )
)]
pub async fn count_providers(
    State(state): State<EntityApiState>,
    query: CriteriaQuery<ProviderCriteria>,
) -> Result<Json<u64>, ApiError> {
    let count = state.query.count_by_criteria(&query.criteria).await?;
    Ok(Json(count))
}

/// Get a provider by id
#[utoipa::path(
    get,
    path = "/api/providers/{id}",
    tag = "providers",
    params(("id" = i64, Path, description = "Provider id")),
    responses(
        (status = 200, description = "Provider", body = ProviderDto),
        (status = 404, description = "Provider not found")
    )
)]
pub async fn get_one(
    State(state): State<EntityApiState>,
    IdPath(id): IdPath,
) -> Result<Json<ProviderDto>, ApiError> {
    let row = get_provider(state.database.pool(), id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found(ENTITY_NAME, id))?;
    Ok(Json(row.into()))
}

/// Create a provider
#[utoipa::path(
    post,
    path = "/api/providers",
    tag = "providers",
    request_body = ProviderRequest,
    responses(
        (status = 201, description = "Provider created", body = ProviderDto),
        (status = 400, description = "Invalid body, id present or unknown hospital")
    )
)]
pub async fn create(
    State(state): State<EntityApiState>,
    ValidatedJson(body): ValidatedJson<ProviderRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<ProviderDto>), ApiError> {
    reject_new_id("provider", body.id)?;
    let row = create_provider(state.database.pool(), &body.into()).await?;
    tracing::debug!(id = row.id, "created provider");
    let location = format!("/api/providers/{}", row.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(row.into()),
    ))
}

/// Replace a provider
#[utoipa::path(
    put,
    path = "/api/providers/{id}",
    tag = "providers",
    params(("id" = i64, Path, description = "Provider id")),
    request_body = ProviderRequest,
    responses(
        (status = 200, description = "Provider updated", body = ProviderDto),
        (status = 400, description = "Missing or mismatched id, or unknown provider")
    )
)]
pub async fn update(
    State(state): State<EntityApiState>,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<ProviderRequest>,
) -> Result<Json<ProviderDto>, ApiError> {
    check_body_id(id, body.id)?;
    let row = update_provider(state.database.pool(), id, &body.into())
        .await?
        .ok_or_else(|| id_not_found(ENTITY_NAME, id))?;
    Ok(Json(row.into()))
}

/// Update the fields present in the body
#[utoipa::path(
    patch,
    path = "/api/providers/{id}",
    tag = "providers",
    params(("id" = i64, Path, description = "Provider id")),
    request_body = ProviderPatchRequest,
    responses(
        (status = 200, description = "Provider updated", body = ProviderDto),
        (status = 400, description = "Missing or mismatched id"),
        (status = 404, description = "Provider not found")
    )
)]
pub async fn partial_update(
    State(state): State<EntityApiState>,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<ProviderPatchRequest>,
) -> Result<Json<ProviderDto>, ApiError> {
    check_body_id(id, body.id)?;
    let row = patch_provider(state.database.pool(), id, &body.into())
        .await?
        .ok_or_else(|| ApiError::entity_not_found(ENTITY_NAME, id))?;
    Ok(Json(row.into()))
}

/// Delete a provider; its patients keep existing with no provider
#[utoipa::path(
    delete,
    path = "/api/providers/{id}",
    tag = "providers",
    params(("id" = i64, Path, description = "Provider id")),
    responses((status = 204, description = "Provider deleted or absent"))
)]
pub async fn delete(
    State(state): State<EntityApiState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    if !delete_provider(state.database.pool(), id).await? {
        tracing::debug!(id, "delete of absent provider");
    }
    Ok(StatusCode::NO_CONTENT)
}
