pub mod auth;
pub mod links;
pub mod planos;
pub mod resources;

use axum::http::StatusCode;
use axum::{middleware, routing::get, Json, Router};
use common::types::{ApiResponse, Health};
use models::{Agrupador, Funcionalidade, Papel, Permissao, Plano};
use service::LinkKind;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::errors::ApiError;
use crate::metrics;
use crate::state::AppState;

pub(crate) type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics_text() -> (StatusCode, String) {
    metrics::encode_metrics()
}

/// Build the full REST API: entity resources, permission links, plan items and auth.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(resources::router::<Papel>())
        .merge(resources::router::<Permissao>())
        .merge(resources::router::<Funcionalidade>())
        .merge(resources::router::<Agrupador>())
        .merge(resources::router::<Plano>())
        .merge(links::router(LinkKind::PapelPermissao))
        .merge(links::router(LinkKind::FuncionalidadePermissao))
        .merge(planos::router())
        .merge(auth::router());

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_text))
        .merge(api)
        .layer(middleware::from_fn_with_state(state.clone(), crate::auth::require_bearer))
        .with_state(state)
        .layer(CorsLayer::very_permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
