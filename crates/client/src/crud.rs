use std::marker::PhantomData;

use async_trait::async_trait;
use common::types::{PagedResult, Selection};
use models::{Entity, EntityId, Patch};
use service::pagination::Filter;
use service::{CrudApi, ServiceError};

use crate::api::ApiClient;

/// [`CrudApi`] against `{RESOURCE}`, `{RESOURCE}/grid`, `{RESOURCE}/selection` and `{RESOURCE}/{id}`.
pub struct HttpCrud<T> {
    api: ApiClient,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> HttpCrud<T> {
    pub fn new(api: ApiClient) -> Self { Self { api, _entity: PhantomData } }

    fn item(id: EntityId) -> String { format!("{}/{}", T::RESOURCE, id) }
}

#[async_trait]
impl<T: Entity> CrudApi<T> for HttpCrud<T> {
    async fn get_by_id(&self, id: EntityId) -> Result<T, ServiceError> {
        self.api.get(&Self::item(id)).await
    }

    async fn create(&self, input: T::Input) -> Result<T, ServiceError> {
        self.api.post(T::RESOURCE, &input).await
    }

    async fn update(&self, id: EntityId, patch: Patch) -> Result<T, ServiceError> {
        self.api.put(&Self::item(id), &patch).await
    }

    async fn delete(&self, id: EntityId) -> Result<(), ServiceError> {
        self.api.delete::<serde_json::Value>(&Self::item(id)).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<T>, ServiceError> {
        self.api.get(T::RESOURCE).await
    }

    async fn list_paged(&self, filter: &Filter) -> Result<PagedResult<T>, ServiceError> {
        self.api.get_with(&format!("{}/grid", T::RESOURCE), filter).await
    }

    async fn selection(&self) -> Result<Vec<Selection>, ServiceError> {
        self.api.get(&format!("{}/selection", T::RESOURCE)).await
    }
}
