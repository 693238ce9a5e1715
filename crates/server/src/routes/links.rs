use axum::routing::{get, post};
use axum::{extract::State, Extension, Json, Router};
use common::types::{ApiResponse, Selection};
use models::{Entity, EntityId, Permissao};
use serde::Deserialize;
use service::{LinkApi, LinkKind};

use super::ApiResult;
use crate::extract::{JsonBody, PathParams};
use crate::metrics::LINK_OPERATIONS;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceLinks {
    pub permissoes_ids: Vec<EntityId>,
}

/// `{parent}/:id/permissoes` endpoints of one link kind.
pub fn router(kind: LinkKind) -> Router<AppState> {
    let base = format!("{}/:id{}", kind.parent_resource(), Permissao::RESOURCE);
    Router::new()
        .route(&base, get(linked).put(replace))
        .route(&format!("{base}/selection"), get(linked))
        .route(&format!("{base}/:permissao_id"), post(link).delete(unlink))
        .layer(Extension(kind))
}

async fn linked(
    State(state): State<AppState>,
    Extension(kind): Extension<LinkKind>,
    PathParams(parent): PathParams<EntityId>,
) -> ApiResult<Vec<Selection>> {
    Ok(Json(ApiResponse::ok(state.links(kind).list_linked(parent).await?)))
}

async fn link(
    State(state): State<AppState>,
    Extension(kind): Extension<LinkKind>,
    PathParams((parent, permissao)): PathParams<(EntityId, EntityId)>,
) -> ApiResult<()> {
    state.links(kind).link(parent, permissao).await?;
    LINK_OPERATIONS.with_label_values(&[kind.parent_name(), "link"]).inc();
    Ok(Json(ApiResponse::acknowledged("permissao linked")))
}

async fn unlink(
    State(state): State<AppState>,
    Extension(kind): Extension<LinkKind>,
    PathParams((parent, permissao)): PathParams<(EntityId, EntityId)>,
) -> ApiResult<()> {
    state.links(kind).unlink(parent, permissao).await?;
    LINK_OPERATIONS.with_label_values(&[kind.parent_name(), "unlink"]).inc();
    Ok(Json(ApiResponse::acknowledged("permissao unlinked")))
}

async fn replace(
    State(state): State<AppState>,
    Extension(kind): Extension<LinkKind>,
    PathParams(parent): PathParams<EntityId>,
    JsonBody(body): JsonBody<ReplaceLinks>,
) -> ApiResult<Vec<Selection>> {
    let linked = state.links(kind).replace_links(parent, &body.permissoes_ids).await?;
    LINK_OPERATIONS.with_label_values(&[kind.parent_name(), "replace"]).inc();
    Ok(Json(ApiResponse::ok(linked)))
}
