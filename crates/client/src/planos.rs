use async_trait::async_trait;
use models::{CatalogItem, DireitoInput, EntityId, FuncionalidadePlanoInput, Plano, PrecoInput, Quota};
use serde_json::json;
use service::{PlanoApi, ServiceError};

use crate::api::ApiClient;

/// [`PlanoApi`] against `/planos/{id}/...` and the catalog endpoints.
#[derive(Clone)]
pub struct HttpPlanos {
    api: ApiClient,
}

impl HttpPlanos {
    pub fn new(api: ApiClient) -> Self { Self { api } }
}

fn sub(plano: EntityId, rest: &str) -> String { format!("/planos/{plano}/{rest}") }

/// DELETE of a plan sub-item answers with the updated plan.
async fn removed(api: &ApiClient, path: String) -> Result<Plano, ServiceError> {
    api.delete(&path).await?.ok_or_else(|| ServiceError::Transport(format!("response from {path} has no data")))
}

#[async_trait]
impl PlanoApi for HttpPlanos {
    async fn add_preco(&self, plano: EntityId, preco: PrecoInput) -> Result<Plano, ServiceError> {
        self.api.post(&sub(plano, "precos"), &preco).await
    }

    async fn update_preco(&self, plano: EntityId, preco_id: EntityId, preco: PrecoInput) -> Result<Plano, ServiceError> {
        self.api.put(&sub(plano, &format!("precos/{preco_id}")), &preco).await
    }

    async fn remove_preco(&self, plano: EntityId, preco_id: EntityId) -> Result<Plano, ServiceError> {
        removed(&self.api, sub(plano, &format!("precos/{preco_id}"))).await
    }

    async fn add_direito(&self, plano: EntityId, direito: DireitoInput) -> Result<Plano, ServiceError> {
        self.api.post(&sub(plano, "direitos"), &direito).await
    }

    async fn update_direito(&self, plano: EntityId, direito_id: EntityId, limite: u64) -> Result<Plano, ServiceError> {
        self.api.put(&sub(plano, &format!("direitos/{direito_id}")), &json!({ "limite": limite })).await
    }

    async fn remove_direito(&self, plano: EntityId, direito_id: EntityId) -> Result<Plano, ServiceError> {
        removed(&self.api, sub(plano, &format!("direitos/{direito_id}"))).await
    }

    async fn add_funcionalidade(&self, plano: EntityId, item: FuncionalidadePlanoInput) -> Result<Plano, ServiceError> {
        self.api.post(&sub(plano, "funcionalidades"), &item).await
    }

    async fn remove_funcionalidade(&self, plano: EntityId, funcionalidade_id: EntityId) -> Result<Plano, ServiceError> {
        removed(&self.api, sub(plano, &format!("funcionalidades/{funcionalidade_id}"))).await
    }

    async fn update_quota(&self, plano: EntityId, funcionalidade_id: EntityId, quota: Quota) -> Result<Plano, ServiceError> {
        self.api.put(&sub(plano, &format!("funcionalidades/{funcionalidade_id}/quota")), &quota).await
    }

    async fn remove_quota(&self, plano: EntityId, funcionalidade_id: EntityId) -> Result<Plano, ServiceError> {
        removed(&self.api, sub(plano, &format!("funcionalidades/{funcionalidade_id}/quota"))).await
    }

    async fn available_direitos(&self) -> Result<Vec<CatalogItem>, ServiceError> {
        self.api.get("/available-direitos").await
    }

    async fn available_funcionalidades(&self) -> Result<Vec<CatalogItem>, ServiceError> {
        self.api.get("/available-funcionalidades").await
    }
}
