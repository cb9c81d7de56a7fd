//! API server initialization

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::middleware::{self, AllowedOrigins};
use super::openapi::openapi_json;
use super::routes::{EntityApiState, health, hospitals, patients, providers};
use crate::core::CoreApp;
use crate::core::constants::{API_PREFIX, DEFAULT_BODY_LIMIT};

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(&app.config.server.host, app.config.server.port);
        Self {
            app,
            allowed_origins,
        }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        let shutdown = app.shutdown.clone();
        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);

        let state = EntityApiState::new(app.database.clone(), app.config.pagination);
        let router = router(state, &allowed_origins);

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on http://{}{}", addr, API_PREFIX);
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        Ok(app)
    }
}

/// Full application router
pub fn router(state: EntityApiState, allowed_origins: &AllowedOrigins) -> Router {
    let api = Router::new()
        .route("/health", get(health::health))
        .route("/openapi.json", get(openapi_json))
        .nest("/hospitals", hospitals::routes(state.clone()))
        .nest("/providers", providers::routes(state.clone()))
        .nest("/patients", patients::routes(state));

    Router::new()
        .nest(API_PREFIX, api)
        .fallback(middleware::handle_404)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors(allowed_origins))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::api::routes::test_support::{json_body, send};
    use crate::core::config::PaginationConfig;
    use crate::data::sqlite::test_service;

    async fn setup() -> Router {
        let db = Arc::new(test_service().await);
        let state = EntityApiState::new(db, PaginationConfig::default());
        router(state, &AllowedOrigins::new("127.0.0.1", 8080))
    }

    #[tokio::test]
    async fn test_health() {
        let router = setup().await;
        let response = send(&router, "GET", "/api/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let router = setup().await;
        let response = send(&router, "GET", "/api/openapi.json", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["info"]["title"], "CareLink API");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let router = setup().await;
        let response = send(&router, "GET", "/api/doctors", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["code"], "ROUTE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_nested_routes_keep_full_uri_in_links() {
        let router = setup().await;
        for name in ["A", "B", "C"] {
            let response = send(&router, "POST", "/api/hospitals", Some(json!({ "name": name }))).await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = send(&router, "GET", "/api/hospitals?page=1&size=1", None).await;
        let link = response.headers()["link"].to_str().unwrap().to_string();
        assert!(link.contains("</api/hospitals?page=2&size=1>; rel=\"next\""));
        assert!(link.contains("</api/hospitals?page=0&size=1>; rel=\"first\""));
    }
}
