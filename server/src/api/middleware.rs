//! HTTP middleware (CORS, 404 handler)

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::response::IntoResponse;
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::types::ApiError;
use crate::core::constants::HEADER_TOTAL_COUNT;

/// Allowed origins configuration
#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    origins: Vec<String>,
}

impl AllowedOrigins {
    /// Create allowed origins from host and port configuration
    pub fn new(host: &str, port: u16) -> Self {
        // Loopback and wildcard binds are reachable under both local names
        let base_hosts: Vec<&str> = if is_local_or_all(host) {
            vec!["localhost", "127.0.0.1"]
        } else {
            vec![host]
        };

        let origins = base_hosts
            .iter()
            .flat_map(|h| [format!("http://{}:{}", h, port), format!("http://{}", h)])
            .collect();

        Self { origins }
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == origin)
    }

    fn as_header_values(&self) -> Vec<HeaderValue> {
        self.origins.iter().filter_map(|o| o.parse().ok()).collect()
    }
}

fn is_local_or_all(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]" | "127.0.0.1" | "localhost")
}

/// Create CORS layer
pub fn cors(allowed: &AllowedOrigins) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed.as_header_values()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
        .expose_headers([
            header::LINK,
            header::LOCATION,
            HeaderName::from_static(HEADER_TOTAL_COUNT),
        ])
}

/// Handle unknown routes with a JSON 404
pub async fn handle_404(req: Request) -> impl IntoResponse {
    tracing::debug!(method = %req.method(), uri = %req.uri(), "[404] no route");
    ApiError::not_found("ROUTE_NOT_FOUND", format!("No route for {}", req.uri().path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_host_allows_both_names() {
        let origins = AllowedOrigins::new("127.0.0.1", 8080);
        assert!(origins.is_allowed("http://localhost:8080"));
        assert!(origins.is_allowed("http://127.0.0.1:8080"));
        assert!(!origins.is_allowed("http://evil.example:8080"));
    }

    #[test]
    fn test_specific_host() {
        let origins = AllowedOrigins::new("10.1.2.3", 9000);
        assert!(origins.is_allowed("http://10.1.2.3:9000"));
        assert!(!origins.is_allowed("http://localhost:9000"));
    }
}
