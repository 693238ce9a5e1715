//! The seven endpoints every entity exposes under its collection path.

use axum::http::StatusCode;
use axum::routing::get;
use axum::{extract::State, Json, Router};
use common::types::{ApiResponse, PagedResult, Selection};
use models::{Entity, EntityId, Patch};
use service::pagination::Filter;
use service::repository::HasCollection;
use service::{CrudApi, Repository};

use super::ApiResult;
use crate::errors::ApiError;
use crate::extract::{JsonBody, PathParams, QueryParams};
use crate::metrics::record_crud;
use crate::state::AppState;

pub fn router<T>() -> Router<AppState>
where
    T: Entity,
    Repository: HasCollection<T>,
{
    let base = T::RESOURCE;
    Router::new()
        .route(base, get(list::<T>).post(create::<T>))
        .route(&format!("{base}/grid"), get(grid::<T>))
        .route(&format!("{base}/selection"), get(selection::<T>))
        .route(&format!("{base}/:id"), get(get_one::<T>).put(update::<T>).delete(remove::<T>))
}

async fn grid<T>(State(state): State<AppState>, QueryParams(filter): QueryParams<Filter>) -> ApiResult<PagedResult<T>>
where
    T: Entity,
    Repository: HasCollection<T>,
{
    let page = state.crud::<T>().list_paged(&filter).await?;
    record_crud(T::NAME, "grid");
    Ok(Json(ApiResponse::ok(page)))
}

async fn selection<T>(State(state): State<AppState>) -> ApiResult<Vec<Selection>>
where
    T: Entity,
    Repository: HasCollection<T>,
{
    Ok(Json(ApiResponse::ok(state.crud::<T>().selection().await?)))
}

async fn list<T>(State(state): State<AppState>) -> ApiResult<Vec<T>>
where
    T: Entity,
    Repository: HasCollection<T>,
{
    let all = state.crud::<T>().list().await?;
    record_crud(T::NAME, "list");
    Ok(Json(ApiResponse::ok(all)))
}

async fn get_one<T>(State(state): State<AppState>, PathParams(id): PathParams<EntityId>) -> ApiResult<T>
where
    T: Entity,
    Repository: HasCollection<T>,
{
    Ok(Json(ApiResponse::ok(state.crud::<T>().get_by_id(id).await?)))
}

async fn create<T>(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<T::Input>,
) -> Result<(StatusCode, Json<ApiResponse<T>>), ApiError>
where
    T: Entity,
    Repository: HasCollection<T>,
{
    let created = state.crud::<T>().create(input).await?;
    record_crud(T::NAME, "create");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok_with_message(created, format!("{} created", T::NAME)))))
}

async fn update<T>(
    State(state): State<AppState>,
    PathParams(id): PathParams<EntityId>,
    JsonBody(patch): JsonBody<Patch>,
) -> ApiResult<T>
where
    T: Entity,
    Repository: HasCollection<T>,
{
    let updated = state.crud::<T>().update(id, patch).await?;
    record_crud(T::NAME, "update");
    Ok(Json(ApiResponse::ok_with_message(updated, format!("{} updated", T::NAME))))
}

async fn remove<T>(State(state): State<AppState>, PathParams(id): PathParams<EntityId>) -> ApiResult<()>
where
    T: Entity,
    Repository: HasCollection<T>,
{
    state.crud::<T>().delete(id).await?;
    record_crud(T::NAME, "delete");
    Ok(Json(ApiResponse::acknowledged(format!("{} deleted", T::NAME))))
}
