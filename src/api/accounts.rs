//! User account endpoints
//!
//! Responses carry the public projection of an account (id, username,
//! email). Rejected writes answer with a generic 400 and the cause is only
//! logged.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::account::{Account, AccountChanges, AccountId};
use crate::domain::DomainError;
use crate::infrastructure::account::CreateAccountRequest;

/// Message returned for every rejected write
pub const INVALID_USER_DATA: &str = "Invalid user data";

/// Create the accounts router
pub fn create_accounts_router() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route(
            "/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

/// Registration payload
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Degrade any write failure to a generic client rejection
fn reject_write(err: DomainError) -> ApiError {
    if err.is_client_error() {
        debug!(error = %err, "Account write rejected");
    } else {
        warn!(error = %err, "Account write failed");
    }

    ApiError::bad_request(INVALID_USER_DATA)
}

fn account_not_found(id: AccountId) -> ApiError {
    ApiError::not_found(format!("User '{}' not found", id))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<Account>, ApiError> {
    let request = CreateAccountRequest {
        username: request.username,
        email: request.email,
        password: request.password,
    };

    let account = state
        .account_service
        .create(request)
        .await
        .map_err(reject_write)?;

    Ok(Json(account))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Account>, ApiError> {
    let id = AccountId::new(id);

    state
        .account_service
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| account_not_found(id))
}

/// PATCH /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(changes): Json<AccountChanges>,
) -> Result<Json<Account>, ApiError> {
    let id = AccountId::new(id);

    match state.account_service.update(id, changes).await {
        Ok(account) => Ok(Json(account)),
        Err(DomainError::NotFound { .. }) => Err(account_not_found(id)),
        Err(err) => Err(reject_write(err)),
    }
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    let id = AccountId::new(id);

    if state.account_service.remove(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(account_not_found(id))
    }
}
