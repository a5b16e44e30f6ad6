//! OpenAPI schema definitions for the error envelope.
//!
//! The domain [`Error`](crate::domain::Error) serialises through a private
//! DTO, so its schema is registered here in the adapter layer instead of on
//! the type itself.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Username/password authentication failed.
    #[schema(rename = "invalid_credentials")]
    InvalidCredentials,
    /// Missing or invalid bearer credential, or insufficient clearance.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "not_found")]
    NotFound,
    /// A uniqueness rule would be violated.
    #[schema(rename = "conflict")]
    Conflict,
    /// The database is unreachable or timed out.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "meal name must not be empty")]
    message: String,
    /// Request correlation id, echoed in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary structured details, such as the offending field.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::PartialSchema;

    use super::*;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn error_schema_is_registered_under_the_domain_name() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        let json = schema_to_json::<ErrorSchema>();
        assert!(json.contains("traceId"), "fields use camelCase: {json}");
    }

    #[rstest]
    #[case("invalid_request")]
    #[case("invalid_credentials")]
    #[case("unauthorized")]
    #[case("not_found")]
    #[case("conflict")]
    #[case("service_unavailable")]
    #[case("internal_error")]
    fn error_code_schema_lists_every_code(#[case] code: &str) {
        let json = schema_to_json::<ErrorCodeSchema>();
        assert!(json.contains(code), "missing {code}");
    }
}
