//! Shared API types
//!
//! Error responses, paging parameters and sort parsing used by every entity
//! endpoint.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::core::config::PaginationConfig;
use crate::core::constants::{MAX_PAGE, MAX_SORT_FIELDS};
use crate::data::criteria::{EntityDef, FilterParamError, PageRequest, SortDirection, SortOrder};
use crate::data::sqlite::SqliteError;

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// `{ENTITY}_NOT_FOUND` for a missing row
    pub fn entity_not_found(entity: &str, id: i64) -> Self {
        Self::not_found(
            format!("{}_NOT_FOUND", entity.to_uppercase()),
            format!("{} {} not found", entity, id),
        )
    }

    pub fn from_sqlite(e: SqliteError) -> Self {
        match e {
            SqliteError::InvalidReference(what) => Self::bad_request(
                "INVALID_REFERENCE",
                format!("Referenced {} does not exist", what),
            ),
            e => {
                tracing::error!(error = %e, "SQLite error");
                Self::internal("Database operation failed")
            }
        }
    }
}

impl From<FilterParamError> for ApiError {
    fn from(e: FilterParamError) -> Self {
        tracing::debug!(error = %e, "Rejected filter parameters");
        Self::bad_request(e.code(), e.to_string())
    }
}

impl From<SqliteError> for ApiError {
    fn from(e: SqliteError) -> Self {
        Self::from_sqlite(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

/// Raw `page`, `size` and `sort` values from a query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingParams {
    pub page: Option<String>,
    pub size: Option<String>,
    pub sort: Vec<String>,
}

impl PagingParams {
    /// Pick the paging keys out of raw query pairs
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        pairs
            .iter()
            .fold(Self::default(), |mut params, (key, value)| {
                match key.as_str() {
                    "page" => params.page = Some(value.clone()),
                    "size" => params.size = Some(value.clone()),
                    "sort" => params.sort.push(value.clone()),
                    _ => {}
                }
                params
            })
    }

    /// Validate against the pagination limits and `entity`'s sortable fields
    pub fn to_page_request(
        &self,
        entity: &'static EntityDef,
        limits: &PaginationConfig,
    ) -> Result<PageRequest, ApiError> {
        let page = match &self.page {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                ApiError::bad_request("INVALID_PAGE", format!("Invalid page: {}", raw))
            })?,
            None => 0,
        };
        if page > MAX_PAGE {
            return Err(ApiError::bad_request(
                "INVALID_PAGE",
                format!("Page must be <= {}", MAX_PAGE),
            ));
        }

        let size = match &self.size {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                ApiError::bad_request("INVALID_PAGE_SIZE", format!("Invalid size: {}", raw))
            })?,
            None => limits.default_size,
        };
        if size == 0 || size > limits.max_size {
            return Err(ApiError::bad_request(
                "INVALID_PAGE_SIZE",
                format!("Size must be between 1 and {}", limits.max_size),
            ));
        }

        let sort = parse_sort(&self.sort, entity)?;
        Ok(PageRequest::new(page, size).with_sort(sort))
    }
}

/// Parse `field` or `field,asc|desc` sort values against the entity whitelist
pub fn parse_sort(values: &[String], entity: &'static EntityDef) -> Result<Vec<SortOrder>, ApiError> {
    if values.len() > MAX_SORT_FIELDS {
        return Err(ApiError::bad_request(
            "INVALID_SORT",
            format!("At most {} sort parameters are allowed", MAX_SORT_FIELDS),
        ));
    }

    values
        .iter()
        .map(|value| {
            let (field, direction) = match value.split_once(',') {
                Some((field, dir)) => (field.trim(), dir.trim()),
                None => (value.trim(), "asc"),
            };
            let direction = if direction.eq_ignore_ascii_case("asc") {
                SortDirection::Asc
            } else if direction.eq_ignore_ascii_case("desc") {
                SortDirection::Desc
            } else {
                return Err(ApiError::bad_request(
                    "INVALID_SORT",
                    format!("Invalid sort direction: {}", direction),
                ));
            };
            let column = entity.sort_column(field).ok_or_else(|| {
                ApiError::bad_request(
                    "INVALID_SORT_FIELD",
                    format!("Cannot sort {} by: {}", entity.name, field),
                )
            })?;
            Ok(SortOrder { column, direction })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::schema::PATIENT;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_paging_defaults() {
        let request = PagingParams::default()
            .to_page_request(&PATIENT, &PaginationConfig::default())
            .unwrap();
        assert_eq!(request.page, 0);
        assert_eq!(request.size, PaginationConfig::default().default_size);
        assert!(request.sort.is_empty());
    }

    #[test]
    fn test_paging_from_pairs_ignores_filters() {
        let params = PagingParams::from_pairs(&pairs(&[
            ("name.contains", "jo"),
            ("page", "2"),
            ("size", "5"),
            ("sort", "name,desc"),
            ("sort", "id"),
        ]));
        let request = params
            .to_page_request(&PATIENT, &PaginationConfig::default())
            .unwrap();
        assert_eq!(request.page, 2);
        assert_eq!(request.size, 5);
        assert_eq!(
            request.sort,
            vec![SortOrder::desc("name"), SortOrder::asc("id")]
        );
    }

    #[test]
    fn test_sort_maps_api_field_to_column() {
        let sort = parse_sort(&["dateOfBirth,DESC".to_string()], &PATIENT).unwrap();
        assert_eq!(sort, vec![SortOrder::desc("date_of_birth")]);
    }

    #[test]
    fn test_sort_rejects_unknown_field() {
        let err = parse_sort(&["ssn,asc".to_string()], &PATIENT).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { ref code, .. } if code == "INVALID_SORT_FIELD"));
    }

    #[test]
    fn test_sort_rejects_bad_direction() {
        assert!(parse_sort(&["name,sideways".to_string()], &PATIENT).is_err());
    }

    #[test]
    fn test_size_limits() {
        let limits = PaginationConfig {
            default_size: 10,
            max_size: 50,
        };
        let too_big = PagingParams {
            size: Some("51".to_string()),
            ..Default::default()
        };
        assert!(too_big.to_page_request(&PATIENT, &limits).is_err());

        let zero = PagingParams {
            size: Some("0".to_string()),
            ..Default::default()
        };
        assert!(zero.to_page_request(&PATIENT, &limits).is_err());

        let garbage = PagingParams {
            page: Some("-1".to_string()),
            ..Default::default()
        };
        assert!(garbage.to_page_request(&PATIENT, &limits).is_err());
    }

    #[test]
    fn test_filter_error_maps_to_bad_request() {
        let err: ApiError = FilterParamError::UnknownField("ssn".to_string()).into();
        assert!(
            matches!(err, ApiError::BadRequest { ref code, .. } if code == "UNKNOWN_FILTER_FIELD")
        );
    }

    #[test]
    fn test_invalid_reference_maps_to_bad_request() {
        let err = ApiError::from_sqlite(SqliteError::InvalidReference("provider 9".to_string()));
        assert!(matches!(err, ApiError::BadRequest { ref code, .. } if code == "INVALID_REFERENCE"));
    }

    #[test]
    fn test_entity_not_found_code() {
        let err = ApiError::entity_not_found("Patient", 3);
        assert!(
            matches!(err, ApiError::NotFound { ref code, ref message } if code == "PATIENT_NOT_FOUND" && message == "Patient 3 not found")
        );
    }
}
