//! API route handlers

pub mod health;
pub mod hospitals;
pub mod patients;
pub mod providers;

use std::sync::Arc;

use crate::api::types::ApiError;
use crate::core::config::PaginationConfig;
use crate::data::SqliteService;
use crate::domain::QueryService;

/// Shared state for the entity endpoints
#[derive(Clone)]
pub struct EntityApiState {
    pub database: Arc<SqliteService>,
    pub query: QueryService<SqliteService>,
    pub pagination: PaginationConfig,
}

impl EntityApiState {
    pub fn new(database: Arc<SqliteService>, pagination: PaginationConfig) -> Self {
        Self {
            query: QueryService::new(Arc::clone(&database)),
            database,
            pagination,
        }
    }
}

/// A create body must not carry an id
fn reject_new_id(entity: &str, body_id: Option<i64>) -> Result<(), ApiError> {
    match body_id {
        Some(_) => Err(ApiError::bad_request(
            "ID_EXISTS",
            format!("A new {} cannot already have an ID", entity),
        )),
        None => Ok(()),
    }
}

/// An update body must carry the same id as the path
fn check_body_id(path_id: i64, body_id: Option<i64>) -> Result<(), ApiError> {
    match body_id {
        None => Err(ApiError::bad_request("ID_NULL", "Invalid id")),
        Some(id) if id != path_id => Err(ApiError::bad_request(
            "ID_INVALID",
            format!("Body id {} does not match path id {}", id, path_id),
        )),
        Some(_) => Ok(()),
    }
}

fn id_not_found(entity: &str, id: i64) -> ApiError {
    ApiError::bad_request("ID_NOT_FOUND", format!("{} {} not found", entity, id))
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, Response, header};
    use tower::ServiceExt;

    pub async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        router.clone().oneshot(request).await.unwrap()
    }

    pub async fn json_body(response: Response<Body>) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
