use async_trait::async_trait;
use common::types::Selection;
use models::{Entity, EntityId, Permissao};
use serde::Serialize;
use service::{LinkApi, LinkKind, ServiceError};

use crate::api::ApiClient;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplaceLinks<'a> {
    permissoes_ids: &'a [EntityId],
}

/// [`LinkApi`] against `{parent}/{id}/permissoes/...`.
#[derive(Clone)]
pub struct HttpLinks {
    api: ApiClient,
    kind: LinkKind,
}

impl HttpLinks {
    pub fn new(api: ApiClient, kind: LinkKind) -> Self { Self { api, kind } }

    fn linked(&self, parent: EntityId) -> String {
        format!("{}/{}{}", self.kind.parent_resource(), parent, Permissao::RESOURCE)
    }
}

#[async_trait]
impl LinkApi for HttpLinks {
    async fn link(&self, parent: EntityId, child: EntityId) -> Result<(), ServiceError> {
        self.api.post_empty::<serde_json::Value>(&format!("{}/{}", self.linked(parent), child)).await?;
        Ok(())
    }

    async fn unlink(&self, parent: EntityId, child: EntityId) -> Result<(), ServiceError> {
        self.api.delete::<serde_json::Value>(&format!("{}/{}", self.linked(parent), child)).await?;
        Ok(())
    }

    async fn list_linked(&self, parent: EntityId) -> Result<Vec<Selection>, ServiceError> {
        self.api.get(&format!("{}/selection", self.linked(parent))).await
    }

    async fn list_available(&self) -> Result<Vec<Selection>, ServiceError> {
        self.api.get(&format!("{}/selection", Permissao::RESOURCE)).await
    }

    async fn replace_links(&self, parent: EntityId, children: &[EntityId]) -> Result<Vec<Selection>, ServiceError> {
        self.api.put(&self.linked(parent), &ReplaceLinks { permissoes_ids: children }).await
    }
}
