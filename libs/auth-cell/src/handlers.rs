use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::{Principal, TokenResponse};
use shared_models::error::AppError;
use shared_store::AppContext;

use crate::models::{AuthCellError, LoginRequest, SignupRequest};
use crate::services::account::AccountService;

fn map_auth_error(e: AuthCellError) -> AppError {
    match e {
        AuthCellError::InvalidCredentials => AppError::Auth(e.to_string()),
        AuthCellError::EmailTaken => AppError::ValidationError(e.to_string()),
        AuthCellError::Validation(msg) => AppError::ValidationError(msg),
        AuthCellError::Internal(msg) => AppError::Internal(msg),
    }
}

#[axum::debug_handler]
pub async fn signup(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = AccountService::new(ctx);
    let response = service.signup(request).await.map_err(map_auth_error)?;

    Ok((StatusCode::CREATED, Json(json!(response))))
}

#[axum::debug_handler]
pub async fn login(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(ctx);
    let response = service.login(request).await.map_err(map_auth_error)?;

    Ok(Json(json!(response)))
}

/// Echoes back the claims of an already-validated token. Reaching this
/// handler at all means the middleware accepted the bearer token.
#[axum::debug_handler]
pub async fn validate(
    Extension(principal): Extension<Principal>,
) -> Result<Json<TokenResponse>, AppError> {
    Ok(Json(TokenResponse {
        valid: true,
        user_id: principal.user_id,
        email: principal.email,
        role: principal.role,
    }))
}
