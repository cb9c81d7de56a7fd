//! OpenAPI specification

use axum::http::header;
use axum::response::{IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{health, hospitals, patients, providers};
use crate::data::types::Sex;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CareLink API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Hospitals, providers and patients with criteria queries"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "hospitals", description = "Hospital management"),
        (name = "providers", description = "Provider management and queries"),
        (name = "patients", description = "Patient management and queries")
    ),
    paths(
        // Health
        health::health,
        // Hospitals
        hospitals::list_hospitals,
        hospitals::get_one,
        hospitals::create,
        hospitals::update,
        hospitals::partial_update,
        hospitals::delete,
        // Providers
        providers::list_providers,
        providers::count_providers,
        providers::get_one,
        providers::create,
        providers::update,
        providers::partial_update,
        providers::delete,
        // Patients
        patients::list_patients,
        patients::count_patients,
        patients::get_one,
        patients::create,
        patients::update,
        patients::partial_update,
        patients::delete,
    ),
    components(schemas(
        health::HealthResponse,
        hospitals::types::HospitalDto,
        hospitals::types::HospitalRequest,
        hospitals::types::HospitalPatchRequest,
        providers::types::ProviderDto,
        providers::types::ProviderRequest,
        providers::types::ProviderPatchRequest,
        patients::types::PatientDto,
        patients::types::PatientRequest,
        patients::types::PatientPatchRequest,
        Sex,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}
