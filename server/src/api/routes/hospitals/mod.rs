//! Hospital API endpoints
//!
//! Hospitals have no criteria type; the list endpoint pages over every row.

pub mod types;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::get;
use axum::{Json, Router};

use super::{EntityApiState, check_body_id, id_not_found, reject_new_id};
use crate::api::extractors::{IdPath, PagingQuery, ValidatedJson};
use crate::api::pagination::pagination_headers;
use crate::api::types::ApiError;
use crate::data::sqlite::repositories::{
    create_hospital, delete_hospital, get_hospital, patch_hospital, update_hospital,
};
use crate::data::sqlite::schema::HOSPITAL;
use crate::data::types::HospitalRow;

use types::{HospitalDto, HospitalPatchRequest, HospitalRequest};

const ENTITY_NAME: &str = "Hospital";

/// Build Hospital API routes
pub fn routes(state: EntityApiState) -> Router<()> {
    Router::new()
        .route("/", get(list_hospitals).post(create))
        .route(
            "/{id}",
            get(get_one)
                .put(update)
                .patch(partial_update)
                .delete(delete),
        )
        .with_state(state)
}

/// List hospitals
#[utoipa::path(
    get,
    path = "/api/hospitals",
    tag = "hospitals",
    params(
        ("page" = Option<u32>, Query, description = "Zero-indexed page number"),
        ("size" = Option<u32>, Query, description = "Page size"),
        ("sort" = Option<String>, Query, description = "field,asc|desc (repeatable)")
    ),
    responses(
        (status = 200, description = "Page of hospitals; X-Total-Count and Link headers", body = [HospitalDto]),
        (status = 400, description = "Invalid paging parameter")
    )
)]
pub async fn list_hospitals(
    State(state): State<EntityApiState>,
    query: PagingQuery,
) -> Result<(HeaderMap, Json<Vec<HospitalDto>>), ApiError> {
    let request = query.paging.to_page_request(&HOSPITAL, &state.pagination)?;
    let page = state
        .query
        .find_all_paged::<HospitalRow>(&HOSPITAL, &request)
        .await?;
    let headers = pagination_headers(&query.uri, &page);
    Ok((headers, Json(page.map(HospitalDto::from).content)))
}

/// Get a hospital by id
#[utoipa::path(
    get,
    path = "/api/hospitals/{id}",
    tag = "hospitals",
    params(("id" = i64, Path, description = "Hospital id")),
    responses(
        (status = 200, description = "Hospital", body = HospitalDto),
        (status = 404, description = "Hospital not found")
    )
)]
pub async fn get_one(
    State(state): State<EntityApiState>,
    IdPath(id): IdPath,
) -> Result<Json<HospitalDto>, ApiError> {
    let row = get_hospital(state.database.pool(), id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found(ENTITY_NAME, id))?;
    Ok(Json(row.into()))
}

/// Create a hospital
#[utoipa::path(
    post,
    path = "/api/hospitals",
    tag = "hospitals",
    request_body = HospitalRequest,
    responses(
        (status = 201, description = "Hospital created", body = HospitalDto),
        (status = 400, description = "Invalid body or id present")
    )
)]
pub async fn create(
    State(state): State<EntityApiState>,
    ValidatedJson(body): ValidatedJson<HospitalRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<HospitalDto>), ApiError> {
    reject_new_id("hospital", body.id)?;
    let row = create_hospital(state.database.pool(), &body.into()).await?;
    tracing::debug!(id = row.id, "created hospital");
    let location = format!("/api/hospitals/{}", row.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(row.into()),
    ))
}

/// Replace a hospital
#[utoipa::path(
    put,
    path = "/api/hospitals/{id}",
    tag = "hospitals",
    params(("id" = i64, Path, description = "Hospital id")),
    request_body = HospitalRequest,
    responses(
        (status = 200, description = "Hospital updated", body = HospitalDto),
        (status = 400, description = "Missing or mismatched id, or unknown hospital")
    )
)]
pub async fn update(
    State(state): State<EntityApiState>,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<HospitalRequest>,
) -> Result<Json<HospitalDto>, ApiError> {
    check_body_id(id, body.id)?;
    let row = update_hospital(state.database.pool(), id, &body.into())
        .await?
        .ok_or_else(|| id_not_found(ENTITY_NAME, id))?;
    Ok(Json(row.into()))
}

/// Update the fields present in the body
#[utoipa::path(
    patch,
    path = "/api/hospitals/{id}",
    tag = "hospitals",
    params(("id" = i64, Path, description = "Hospital id")),
    request_body = HospitalPatchRequest,
    responses(
        (status = 200, description = "Hospital updated", body = HospitalDto),
        (status = 400, description = "Missing or mismatched id"),
        (status = 404, description = "Hospital not found")
    )
)]
pub async fn partial_update(
    State(state): State<EntityApiState>,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<HospitalPatchRequest>,
) -> Result<Json<HospitalDto>, ApiError> {
    check_body_id(id, body.id)?;
    let row = patch_hospital(state.database.pool(), id, &body.into())
        .await?
        .ok_or_else(|| ApiError::entity_not_found(ENTITY_NAME, id))?;
    Ok(Json(row.into()))
}

/// Delete a hospital
#[utoipa::path(
    delete,
    path = "/api/hospitals/{id}",
    tag = "hospitals",
    params(("id" = i64, Path, description = "Hospital id")),
    responses((status = 204, description = "Hospital deleted or absent"))
)]
pub async fn delete(
    State(state): State<EntityApiState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    if !delete_hospital(state.database.pool(), id).await? {
        tracing::debug!(id, "delete of absent hospital");
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::routes::test_support::{json_body, send};
    use crate::core::config::PaginationConfig;
    use crate::data::sqlite::test_service;

    async fn setup() -> Router {
        let db = Arc::new(test_service().await);
        routes(EntityApiState::new(db, PaginationConfig::default()))
    }

    #[tokio::test]
    async fn test_crud_round() {
        let router = setup().await;

        let response = send(
            &router,
            "POST",
            "/",
            Some(json!({ "name": "General", "description": "Downtown" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = json_body(response).await["id"].as_i64().unwrap();

        let response = send(
            &router,
            "PUT",
            &format!("/{}", id),
            Some(json!({ "id": id, "name": "General Hospital" })),
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(body["name"], "General Hospital");
        assert_eq!(body["description"], serde_json::Value::Null);

        let response = send(
            &router,
            "PATCH",
            &format!("/{}", id),
            Some(json!({ "id": id, "description": "Uptown" })),
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(body["name"], "General Hospital");
        assert_eq!(body["description"], "Uptown");

        let response = send(&router, "DELETE", &format!("/{}", id), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = send(&router, "GET", &format!("/{}", id), None).await;
        assert_eq!(json_body(response).await["code"], "HOSPITAL_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_pages_and_sorts() {
        let router = setup().await;
        for name in ["Beta", "Alpha", "Gamma"] {
            send(&router, "POST", "/", Some(json!({ "name": name }))).await;
        }

        let response = send(&router, "GET", "/?size=2&sort=name,asc", None).await;
        assert_eq!(response.headers()["x-total-count"], "3");
        let body = json_body(response).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|h| h["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);

        let response = send(&router, "GET", "/?name.equals=Alpha", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-total-count"], "3");
    }

    #[tokio::test]
    async fn test_validation_rejects_empty_name() {
        let router = setup().await;
        let response = send(&router, "POST", "/", Some(json!({ "name": "" }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Name must be 1-255 characters");
    }
}
