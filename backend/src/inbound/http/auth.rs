//! Account API handlers.
//!
//! ```text
//! POST   /api/v1/auth/signup {"username":"ada","password":"pw"}
//! POST   /api/v1/auth/login  {"username":"ada","password":"pw"}
//! DELETE /api/v1/user
//! ```

use actix_web::{HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::AuthSession;
use crate::domain::{
    ApiResult, Clearance, CredentialValidationError, Error, LoginCredentials, Registration,
    UserValidationError,
};
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Signup request body for `POST /api/v1/auth/signup`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[schema(example = "ada")]
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Requested clearance; `customer` when omitted.
    #[serde(default)]
    pub clearance: Option<Clearance>,
}

impl TryFrom<SignupRequest> for Registration {
    type Error = CredentialValidationError;

    fn try_from(value: SignupRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.username,
            &value.password,
            value.email.as_deref(),
            value.clearance,
        )
    }
}

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada")]
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = CredentialValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn map_credential_error(err: CredentialValidationError) -> Error {
    let (field, code) = match &err {
        CredentialValidationError::EmptyUsername => ("username", "empty_username"),
        CredentialValidationError::EmptyPassword => ("password", "empty_password"),
        CredentialValidationError::User(
            UserValidationError::EmptyUsername
            | UserValidationError::UsernameContainsWhitespace
            | UserValidationError::UsernameTooLong { .. },
        ) => ("username", "invalid_username"),
        CredentialValidationError::User(_) => ("email", "invalid_email"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Register a user and issue its first bearer credential.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = AuthSession),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username or email taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from(payload.into_inner()).map_err(map_credential_error)?;
    let session = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(session))
}

/// Exchange a username and password for a bearer credential.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthSession),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthSession>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_credential_error)?;
    let session = state.accounts.authenticate(&credentials).await?;
    Ok(web::Json(session))
}

/// Delete the calling user. Their credentials stop resolving immediately.
#[utoipa::path(
    delete,
    path = "/api/v1/user",
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "deleteUser"
)]
#[delete("/user")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<HttpResponse> {
    state.accounts.remove(auth.actor()).await?;
    Ok(HttpResponse::NoContent().finish())
}
