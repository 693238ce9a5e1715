//! Plan item endpoints under `/planos/:id/...` and the catalogs used to compose plans.

use axum::routing::{delete, get, post, put};
use axum::{extract::State, Json, Router};
use common::types::ApiResponse;
use models::{CatalogItem, DireitoInput, EntityId, FuncionalidadePlanoInput, Plano, PrecoInput, Quota};
use serde::Deserialize;
use service::PlanoApi;

use super::ApiResult;
use crate::extract::{JsonBody, PathParams};
use crate::metrics::record_crud;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LimiteBody {
    pub limite: u64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/planos/:id/precos", post(add_preco))
        .route("/planos/:id/precos/:item_id", put(update_preco).delete(remove_preco))
        .route("/planos/:id/direitos", post(add_direito))
        .route("/planos/:id/direitos/:item_id", put(update_direito).delete(remove_direito))
        .route("/planos/:id/funcionalidades", post(add_funcionalidade))
        .route("/planos/:id/funcionalidades/:item_id", delete(remove_funcionalidade))
        .route("/planos/:id/funcionalidades/:item_id/quota", put(update_quota).delete(remove_quota))
        .route("/available-direitos", get(available_direitos))
        .route("/available-funcionalidades", get(available_funcionalidades))
}

fn updated(plano: Plano, op: &str) -> Json<ApiResponse<Plano>> {
    record_crud("plano_item", op);
    Json(ApiResponse::ok(plano))
}

async fn add_preco(
    State(state): State<AppState>,
    PathParams(id): PathParams<EntityId>,
    JsonBody(preco): JsonBody<PrecoInput>,
) -> ApiResult<Plano> {
    Ok(updated(state.planos().add_preco(id, preco).await?, "add_preco"))
}

async fn update_preco(
    State(state): State<AppState>,
    PathParams((id, preco_id)): PathParams<(EntityId, EntityId)>,
    JsonBody(preco): JsonBody<PrecoInput>,
) -> ApiResult<Plano> {
    Ok(updated(state.planos().update_preco(id, preco_id, preco).await?, "update_preco"))
}

async fn remove_preco(
    State(state): State<AppState>,
    PathParams((id, preco_id)): PathParams<(EntityId, EntityId)>,
) -> ApiResult<Plano> {
    Ok(updated(state.planos().remove_preco(id, preco_id).await?, "remove_preco"))
}

async fn add_direito(
    State(state): State<AppState>,
    PathParams(id): PathParams<EntityId>,
    JsonBody(direito): JsonBody<DireitoInput>,
) -> ApiResult<Plano> {
    Ok(updated(state.planos().add_direito(id, direito).await?, "add_direito"))
}

async fn update_direito(
    State(state): State<AppState>,
    PathParams((id, direito_id)): PathParams<(EntityId, EntityId)>,
    JsonBody(body): JsonBody<LimiteBody>,
) -> ApiResult<Plano> {
    Ok(updated(state.planos().update_direito(id, direito_id, body.limite).await?, "update_direito"))
}

async fn remove_direito(
    State(state): State<AppState>,
    PathParams((id, direito_id)): PathParams<(EntityId, EntityId)>,
) -> ApiResult<Plano> {
    Ok(updated(state.planos().remove_direito(id, direito_id).await?, "remove_direito"))
}

async fn add_funcionalidade(
    State(state): State<AppState>,
    PathParams(id): PathParams<EntityId>,
    JsonBody(item): JsonBody<FuncionalidadePlanoInput>,
) -> ApiResult<Plano> {
    Ok(updated(state.planos().add_funcionalidade(id, item).await?, "add_funcionalidade"))
}

async fn remove_funcionalidade(
    State(state): State<AppState>,
    PathParams((id, funcionalidade_id)): PathParams<(EntityId, EntityId)>,
) -> ApiResult<Plano> {
    Ok(updated(state.planos().remove_funcionalidade(id, funcionalidade_id).await?, "remove_funcionalidade"))
}

async fn update_quota(
    State(state): State<AppState>,
    PathParams((id, funcionalidade_id)): PathParams<(EntityId, EntityId)>,
    JsonBody(quota): JsonBody<Quota>,
) -> ApiResult<Plano> {
    Ok(updated(state.planos().update_quota(id, funcionalidade_id, quota).await?, "update_quota"))
}

async fn remove_quota(
    State(state): State<AppState>,
    PathParams((id, funcionalidade_id)): PathParams<(EntityId, EntityId)>,
) -> ApiResult<Plano> {
    Ok(updated(state.planos().remove_quota(id, funcionalidade_id).await?, "remove_quota"))
}

async fn available_direitos(State(state): State<AppState>) -> ApiResult<Vec<CatalogItem>> {
    Ok(Json(ApiResponse::ok(state.planos().available_direitos().await?)))
}

async fn available_funcionalidades(State(state): State<AppState>) -> ApiResult<Vec<CatalogItem>> {
    Ok(Json(ApiResponse::ok(state.planos().available_funcionalidades().await?)))
}
