use axum::routing::{get, post};
use axum::{extract::State, Json, Router};
use common::types::ApiResponse;
use service::auth::domain::{AuthSession, LoginInput, PasswordResetConfirm, PasswordResetRequest, ResetTicket};
use tracing::{info, warn};

use super::ApiResult;
use crate::errors::ApiError;
use crate::extract::{JsonBody, PathParams};
use crate::metrics::LOGINS;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/password-reset", post(request_password_reset))
        .route("/auth/password-reset/confirm", post(confirm_password_reset))
        .route("/auth/password-reset/:token", get(validate_reset_token))
}

async fn login(State(state): State<AppState>, JsonBody(input): JsonBody<LoginInput>) -> ApiResult<AuthSession> {
    match state.credentials.verify(&input).await {
        Ok(session) => {
            LOGINS.with_label_values(&["success"]).inc();
            info!(user = %session.user.email, "login succeeded");
            Ok(Json(ApiResponse::ok_with_message(session, "login successful")))
        }
        Err(e) => {
            LOGINS.with_label_values(&["failure"]).inc();
            warn!(email = %input.email, error = %e, "login failed");
            Err(ApiError::from(e))
        }
    }
}

async fn request_password_reset(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<PasswordResetRequest>,
) -> ApiResult<ResetTicket> {
    let ticket = state.credentials.request_password_reset(&body.email).await?;
    Ok(Json(ApiResponse::ok(ticket)))
}

async fn validate_reset_token(
    State(state): State<AppState>,
    PathParams(token): PathParams<String>,
) -> ApiResult<bool> {
    Ok(Json(ApiResponse::ok(state.credentials.validate_reset_token(&token).await?)))
}

async fn confirm_password_reset(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<PasswordResetConfirm>,
) -> ApiResult<String> {
    let message = state.credentials.reset_password(&body.token, &body.new_password).await?;
    Ok(Json(ApiResponse::ok(message)))
}
