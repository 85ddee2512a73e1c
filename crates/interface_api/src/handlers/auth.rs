//! Auth handlers

use axum::{extract::State, Json};
use validator::Validate;

use domain_loan::{NewUserAccount, Role};

use crate::auth::{create_token, hash_password, verify_password};
use crate::dto::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::ApiError;
use crate::AppState;

/// Registers a new user account
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate().map_err(|e| {
        ApiError::Validation(
            e.field_errors()
                .into_iter()
                .flat_map(|(_, errors)| errors.iter().map(|err| err.to_string()))
                .collect(),
        )
    })?;

    let password_hash =
        hash_password(&request.password).map_err(|_| ApiError::Internal("hashing failed".into()))?;

    let account = state
        .users
        .create(NewUserAccount {
            name: request.name,
            email: request.email.to_lowercase(),
            password_hash,
            role: Role::User,
        })
        .await
        .map_err(|e| {
            if matches!(e, core_kernel::PortError::Conflict { .. }) {
                ApiError::Conflict("An account with this email already exists".to_string())
            } else {
                tracing::error!(error = %e, "Account creation failed");
                ApiError::Database("Temporary storage failure, please try again".to_string())
            }
        })?;

    let token = create_token(
        account.id,
        account.role,
        &state.config.jwt_secret,
        state.config.jwt_expiration_secs,
    )
    .map_err(|_| ApiError::Internal("token creation failed".into()))?;

    Ok(Json(AuthResponse {
        token,
        user: account.into(),
    }))
}

/// Authenticates a user and issues a token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let account = state
        .users
        .find_by_email(&request.email.to_lowercase())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Account lookup failed");
            ApiError::Database("Temporary storage failure, please try again".to_string())
        })?
        .ok_or(ApiError::Unauthorized)?;

    if !verify_password(&request.password, &account.password_hash) {
        return Err(ApiError::Unauthorized);
    }

    let token = create_token(
        account.id,
        account.role,
        &state.config.jwt_secret,
        state.config.jwt_expiration_secs,
    )
    .map_err(|_| ApiError::Internal("token creation failed".into()))?;

    Ok(Json(AuthResponse {
        token,
        user: account.into(),
    }))
}
