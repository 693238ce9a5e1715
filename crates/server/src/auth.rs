use axum::extract::{Request, State};
use axum::http::{header, Method};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::errors::ApiError;
use crate::state::AppState;

const PUBLIC_PATHS: &[&str] = &["/health", "/metrics"];

fn is_public(method: &Method, path: &str) -> bool {
    method == Method::OPTIONS || PUBLIC_PATHS.contains(&path) || path.starts_with("/auth/")
}

/// Extract the token of an `Authorization: Bearer <token>` header.
pub fn bearer_token(value: &str) -> Option<&str> {
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Reject every non-public request without a token the issuer accepts.
pub async fn require_bearer(State(state): State<AppState>, req: Request, next: Next) -> Result<Response, ApiError> {
    if is_public(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;
    match state.tokens.verify(token) {
        Ok(claims) => {
            if let Some(c) = claims {
                debug!(user = %c.sub, "bearer token accepted");
            }
            Ok(next.run(req).await)
        }
        Err(e) => {
            debug!(error = %e, "bearer token rejected");
            Err(ApiError::unauthorized("invalid bearer token"))
        }
    }
}
