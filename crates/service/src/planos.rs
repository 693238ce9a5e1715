//! Plan composition: prices, entitlements, functionalities and their quotas.

use std::sync::Arc;

use async_trait::async_trait;
use models::{
    CatalogItem, DireitoInput, DireitoPlano, Entity, EntityId, Funcionalidade, FuncionalidadePlano,
    FuncionalidadePlanoInput, Plano, Preco, PrecoInput, Quota,
};
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::repository::Repository;

pub const ITEM_ALREADY_ADDED: &str = "item already added";

/// Sub-resource operations of a plan. Every mutation returns the updated plan.
#[async_trait]
pub trait PlanoApi: Send + Sync {
    async fn add_preco(&self, plano: EntityId, preco: PrecoInput) -> Result<Plano, ServiceError>;
    async fn update_preco(&self, plano: EntityId, preco_id: EntityId, preco: PrecoInput) -> Result<Plano, ServiceError>;
    async fn remove_preco(&self, plano: EntityId, preco_id: EntityId) -> Result<Plano, ServiceError>;

    async fn add_direito(&self, plano: EntityId, direito: DireitoInput) -> Result<Plano, ServiceError>;
    async fn update_direito(&self, plano: EntityId, direito_id: EntityId, limite: u64) -> Result<Plano, ServiceError>;
    async fn remove_direito(&self, plano: EntityId, direito_id: EntityId) -> Result<Plano, ServiceError>;

    async fn add_funcionalidade(&self, plano: EntityId, item: FuncionalidadePlanoInput) -> Result<Plano, ServiceError>;
    async fn remove_funcionalidade(&self, plano: EntityId, funcionalidade_id: EntityId) -> Result<Plano, ServiceError>;

    /// Set or replace the quota of a functionality already in the plan.
    async fn update_quota(&self, plano: EntityId, funcionalidade_id: EntityId, quota: Quota) -> Result<Plano, ServiceError>;
    async fn remove_quota(&self, plano: EntityId, funcionalidade_id: EntityId) -> Result<Plano, ServiceError>;

    async fn available_direitos(&self) -> Result<Vec<CatalogItem>, ServiceError>;
    async fn available_funcionalidades(&self) -> Result<Vec<CatalogItem>, ServiceError>;
}

/// [`PlanoApi`] over the in-memory repository.
#[derive(Clone)]
pub struct LocalPlanos {
    repo: Arc<Repository>,
}

impl LocalPlanos {
    pub fn new(repo: Arc<Repository>) -> Self { Self { repo } }

    async fn edit<F>(&self, plano: EntityId, f: F) -> Result<Plano, ServiceError>
    where
        F: FnOnce(&mut Plano) -> Result<(), ServiceError>,
    {
        self.repo
            .planos
            .modify(plano, |p| {
                f(p)?;
                Ok(p.clone())
            })
            .await
    }
}

fn missing(what: &str) -> ServiceError { ServiceError::not_found(what) }

fn funcionalidade_mut(p: &mut Plano, id: EntityId) -> Result<&mut FuncionalidadePlano, ServiceError> {
    p.funcionalidades.iter_mut().find(|f| f.id == id).ok_or_else(|| missing(Funcionalidade::NAME))
}

#[async_trait]
impl PlanoApi for LocalPlanos {
    #[instrument(skip(self, preco))]
    async fn add_preco(&self, plano: EntityId, preco: PrecoInput) -> Result<Plano, ServiceError> {
        preco.validate()?;
        let mut id = 0;
        let updated = self
            .edit(plano, |p| {
                let floor = p.precos.iter().map(|x| x.id + 1).max().unwrap_or(0);
                id = self.repo.next_item_id(floor);
                p.precos.push(Preco { id, recorrencia: preco.recorrencia, valor: preco.valor });
                Ok(())
            })
            .await?;
        info!(preco_id = id, "preco_added");
        Ok(updated)
    }

    async fn update_preco(&self, plano: EntityId, preco_id: EntityId, preco: PrecoInput) -> Result<Plano, ServiceError> {
        preco.validate()?;
        self.edit(plano, |p| {
            let slot = p.precos.iter_mut().find(|x| x.id == preco_id).ok_or_else(|| missing("preco"))?;
            slot.recorrencia = preco.recorrencia;
            slot.valor = preco.valor;
            Ok(())
        })
        .await
    }

    async fn remove_preco(&self, plano: EntityId, preco_id: EntityId) -> Result<Plano, ServiceError> {
        self.edit(plano, |p| {
            let idx = p.precos.iter().position(|x| x.id == preco_id).ok_or_else(|| missing("preco"))?;
            p.precos.remove(idx);
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, direito), fields(direito_id = direito.id))]
    async fn add_direito(&self, plano: EntityId, direito: DireitoInput) -> Result<Plano, ServiceError> {
        let entry = self.repo.find_direito(direito.id).await.ok_or_else(|| missing("direito"))?;
        self.edit(plano, |p| {
            if p.direitos.iter().any(|d| d.id == entry.id) {
                return Err(ServiceError::Conflict(ITEM_ALREADY_ADDED.into()));
            }
            p.direitos.push(DireitoPlano { id: entry.id, nome: entry.nome, limite: direito.limite });
            Ok(())
        })
        .await
    }

    async fn update_direito(&self, plano: EntityId, direito_id: EntityId, limite: u64) -> Result<Plano, ServiceError> {
        self.edit(plano, |p| {
            let slot = p.direitos.iter_mut().find(|d| d.id == direito_id).ok_or_else(|| missing("direito"))?;
            slot.limite = limite;
            Ok(())
        })
        .await
    }

    async fn remove_direito(&self, plano: EntityId, direito_id: EntityId) -> Result<Plano, ServiceError> {
        self.edit(plano, |p| {
            let idx = p.direitos.iter().position(|d| d.id == direito_id).ok_or_else(|| missing("direito"))?;
            p.direitos.remove(idx);
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, item), fields(funcionalidade_id = item.id))]
    async fn add_funcionalidade(&self, plano: EntityId, item: FuncionalidadePlanoInput) -> Result<Plano, ServiceError> {
        let func = self.repo.funcionalidades.get(item.id).await.ok_or_else(|| missing(Funcionalidade::NAME))?;
        self.edit(plano, |p| {
            if p.funcionalidades.iter().any(|f| f.id == func.id) {
                return Err(ServiceError::Conflict(ITEM_ALREADY_ADDED.into()));
            }
            p.funcionalidades.push(FuncionalidadePlano { id: func.id, nome: func.nome, quota: item.quota });
            Ok(())
        })
        .await
    }

    async fn remove_funcionalidade(&self, plano: EntityId, funcionalidade_id: EntityId) -> Result<Plano, ServiceError> {
        self.edit(plano, |p| {
            let idx = p
                .funcionalidades
                .iter()
                .position(|f| f.id == funcionalidade_id)
                .ok_or_else(|| missing(Funcionalidade::NAME))?;
            p.funcionalidades.remove(idx);
            Ok(())
        })
        .await
    }

    async fn update_quota(&self, plano: EntityId, funcionalidade_id: EntityId, quota: Quota) -> Result<Plano, ServiceError> {
        self.edit(plano, |p| {
            funcionalidade_mut(p, funcionalidade_id)?.quota = Some(quota);
            Ok(())
        })
        .await
    }

    async fn remove_quota(&self, plano: EntityId, funcionalidade_id: EntityId) -> Result<Plano, ServiceError> {
        self.edit(plano, |p| {
            funcionalidade_mut(p, funcionalidade_id)?.quota = None;
            Ok(())
        })
        .await
    }

    async fn available_direitos(&self) -> Result<Vec<CatalogItem>, ServiceError> {
        Ok(self.repo.available_direitos().await)
    }

    async fn available_funcionalidades(&self) -> Result<Vec<CatalogItem>, ServiceError> {
        Ok(self.repo.available_funcionalidades().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{PeriodoQuota, Recorrencia};

    fn planos() -> LocalPlanos { LocalPlanos::new(Arc::new(Repository::seeded())) }

    #[tokio::test]
    async fn prices_get_fresh_ids() -> Result<(), anyhow::Error> {
        let svc = planos();
        let p = svc.add_preco(1, PrecoInput { recorrencia: Recorrencia::Semestral, valor: 210.0 }).await?;
        let added = p.precos.last().unwrap();
        assert_eq!(added.id, 5);
        let p = svc.update_preco(1, 5, PrecoInput { recorrencia: Recorrencia::Semestral, valor: 199.0 }).await?;
        assert_eq!(p.precos.last().unwrap().valor, 199.0);
        let p = svc.remove_preco(1, 5).await?;
        assert_eq!(p.precos.len(), 2);
        assert!(matches!(svc.remove_preco(1, 5).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn price_ids_stay_unique_after_plan_update() -> Result<(), anyhow::Error> {
        let repo = Arc::new(Repository::seeded());
        let svc = LocalPlanos::new(repo.clone());
        let patch = serde_json::json!({"precos": [{"id": 5, "recorrencia": "Mensal", "valor": 99.9}]});
        repo.planos.update(1, patch.as_object().unwrap()).await?;

        let p = svc.add_preco(1, PrecoInput { recorrencia: Recorrencia::Anual, valor: 999.0 }).await?;
        let ids: Vec<EntityId> = p.precos.iter().map(|x| x.id).collect();
        assert_eq!(ids, vec![5, 6]);
        let p = svc.remove_preco(1, 6).await?;
        assert_eq!(p.precos.len(), 1);
        assert_eq!(p.precos[0].valor, 99.9);

        let twice = serde_json::json!({"precos": [
            {"id": 7, "recorrencia": "Mensal", "valor": 1.0},
            {"id": 7, "recorrencia": "Anual", "valor": 2.0}
        ]});
        let r = repo.planos.update(1, twice.as_object().unwrap()).await;
        assert!(matches!(r, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let svc = planos();
        let r = svc.add_preco(1, PrecoInput { recorrencia: Recorrencia::Mensal, valor: -1.0 }).await;
        assert!(matches!(r, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn duplicate_items_conflict() -> Result<(), anyhow::Error> {
        let svc = planos();
        let r = svc.add_direito(1, DireitoInput { id: 1, limite: 3 }).await;
        assert!(matches!(r, Err(ServiceError::Conflict(m)) if m == ITEM_ALREADY_ADDED));
        let p = svc.add_direito(1, DireitoInput { id: 3, limite: 2 }).await?;
        assert_eq!(p.direitos.last().unwrap().nome, "Instâncias de WhatsApp");

        let r = svc.add_funcionalidade(2, FuncionalidadePlanoInput { id: 4, quota: None }).await;
        assert!(matches!(r, Err(ServiceError::Conflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn quota_lifecycle() -> Result<(), anyhow::Error> {
        let svc = planos();
        let p = svc.add_funcionalidade(1, FuncionalidadePlanoInput { id: 7, quota: None }).await?;
        assert_eq!(p.funcionalidades.last().unwrap().nome, "Gerar relatórios");
        let quota = Quota { tipo: PeriodoQuota::Diaria, limite: 10 };
        let p = svc.update_quota(1, 7, quota.clone()).await?;
        assert_eq!(p.funcionalidades.last().unwrap().quota, Some(quota));
        let p = svc.remove_quota(1, 7).await?;
        assert_eq!(p.funcionalidades.last().unwrap().quota, None);
        assert!(svc.update_quota(1, 6, Quota { tipo: PeriodoQuota::Anual, limite: 1 }).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn missing_plan_is_not_found() {
        let svc = planos();
        let r = svc.remove_direito(99, 1).await;
        assert!(matches!(r, Err(ServiceError::NotFound(m)) if m == "plano not found"));
    }

    #[tokio::test]
    async fn catalogs_are_listed() -> Result<(), anyhow::Error> {
        let svc = planos();
        assert_eq!(svc.available_direitos().await?.len(), 4);
        assert_eq!(svc.available_funcionalidades().await?.len(), 8);
        Ok(())
    }
}
