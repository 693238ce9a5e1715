//! Base CRUD contract shared by every entity service.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use common::types::{PagedResult, Selection};
use models::{Entity, EntityId, Patch};
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::pagination::{paginate, Filter};
use crate::repository::{Collection, HasCollection, LinkKind, Repository};

/// CRUD operations for one entity type; implemented locally over the repository
/// and remotely over HTTP.
#[async_trait]
pub trait CrudApi<T: Entity>: Send + Sync {
    async fn get_by_id(&self, id: EntityId) -> Result<T, ServiceError>;

    async fn create(&self, input: T::Input) -> Result<T, ServiceError>;

    /// Shallow merge of `patch` over the stored record.
    async fn update(&self, id: EntityId, patch: Patch) -> Result<T, ServiceError>;

    async fn delete(&self, id: EntityId) -> Result<(), ServiceError>;

    async fn list(&self) -> Result<Vec<T>, ServiceError>;

    async fn list_paged(&self, filter: &Filter) -> Result<PagedResult<T>, ServiceError>;

    /// Lightweight `{id, nome, descricao}` listing for pickers.
    async fn selection(&self) -> Result<Vec<Selection>, ServiceError>;
}

/// [`CrudApi`] over the in-memory repository.
pub struct LocalCrud<T> {
    repo: Arc<Repository>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> LocalCrud<T> {
    pub fn new(repo: Arc<Repository>) -> Self { Self { repo, _entity: PhantomData } }
}

impl<T> Clone for LocalCrud<T> {
    fn clone(&self) -> Self { Self::new(self.repo.clone()) }
}

impl<T: Entity> LocalCrud<T>
where
    Repository: HasCollection<T>,
{
    fn records(&self) -> &Collection<T> {
        HasCollection::<T>::collection(&*self.repo)
    }

    /// Records passing the type, active-flag and parent-link predicates, in insertion order.
    async fn filtered(&self, filter: &Filter) -> Vec<T> {
        let mut items = self.records().all().await;
        items.retain(|item| filter.matches(item));
        if T::LINK_CHILD {
            let parents = [
                (LinkKind::PapelPermissao, filter.papel_id),
                (LinkKind::FuncionalidadePermissao, filter.funcionalidade_id),
            ];
            for (kind, parent) in parents {
                if let Some(parent) = parent {
                    let linked = self.repo.links.children(kind, parent).await;
                    items.retain(|item| linked.contains(&item.id()));
                }
            }
        }
        items
    }
}

#[async_trait]
impl<T: Entity> CrudApi<T> for LocalCrud<T>
where
    Repository: HasCollection<T>,
{
    async fn get_by_id(&self, id: EntityId) -> Result<T, ServiceError> {
        self.records().get(id).await.ok_or_else(|| ServiceError::not_found(T::NAME))
    }

    #[instrument(skip(self, input), fields(entity = T::NAME))]
    async fn create(&self, input: T::Input) -> Result<T, ServiceError> {
        let created = self.records().insert(input).await?;
        info!(id = created.id(), "entity_created");
        Ok(created)
    }

    #[instrument(skip(self, patch), fields(entity = T::NAME))]
    async fn update(&self, id: EntityId, patch: Patch) -> Result<T, ServiceError> {
        let updated = self.records().update(id, &patch).await?;
        info!(fields = patch.len(), "entity_updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(entity = T::NAME))]
    async fn delete(&self, id: EntityId) -> Result<(), ServiceError> {
        self.records().remove(id).await?;
        info!("entity_deleted");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<T>, ServiceError> {
        Ok(self.records().all().await)
    }

    async fn list_paged(&self, filter: &Filter) -> Result<PagedResult<T>, ServiceError> {
        let items = self.filtered(filter).await;
        Ok(paginate(items, filter))
    }

    async fn selection(&self) -> Result<Vec<Selection>, ServiceError> {
        let items = self.records().all().await;
        Ok(items.iter().filter(|x| x.ativo()).map(Entity::selection).collect())
    }
}

/// Shared handle used by state containers and the composition root.
pub type SharedCrud<T> = Arc<dyn CrudApi<T>>;

#[cfg(test)]
mod tests {
    use super::*;
    use models::{Agrupador, Papel, PapelInput, Permissao, TipoAgrupador};
    use serde_json::json;

    fn papeis(repo: &Arc<Repository>) -> LocalCrud<Papel> { LocalCrud::new(repo.clone()) }

    #[tokio::test]
    async fn create_get_update_delete() -> Result<(), anyhow::Error> {
        let repo = Arc::new(Repository::empty());
        let svc = papeis(&repo);

        let created = svc.create(PapelInput::new("Advogado(a) Júnior", Some("Atua sob supervisão"))).await?;
        assert_eq!(svc.get_by_id(created.id).await?, created);

        let patch = json!({"ativo": false}).as_object().cloned().unwrap();
        let updated = svc.update(created.id, patch).await?;
        assert!(!updated.ativo);
        assert_eq!(updated.nome, created.nome);
        assert_eq!(updated.descricao, created.descricao);

        svc.delete(created.id).await?;
        assert!(matches!(svc.get_by_id(created.id).await, Err(ServiceError::NotFound(m)) if m == "papel not found"));
        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let repo = Arc::new(Repository::empty());
        assert!(matches!(papeis(&repo).delete(7).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn ten_records_paged() -> Result<(), anyhow::Error> {
        let repo = Arc::new(Repository::empty());
        let svc = papeis(&repo);
        for i in 1..=10 {
            svc.create(PapelInput::new(format!("Papel {i:02}"), None)).await?;
        }
        let page = svc.list_paged(&Filter::page(2, 3)).await?;
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_pages, 4);
        assert!(page.has_next && page.has_previous);

        let empty = LocalCrud::<Papel>::new(Arc::new(Repository::empty())).list_paged(&Filter::default()).await?;
        assert!(empty.items.is_empty());
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next && !empty.has_previous);
        Ok(())
    }

    #[tokio::test]
    async fn tipo_and_parent_predicates() -> Result<(), anyhow::Error> {
        let repo = Arc::new(Repository::seeded());
        let agrupadores = LocalCrud::<Agrupador>::new(repo.clone());
        let page = agrupadores.list_paged(&Filter::page(1, 100).of_tipo(TipoAgrupador::Permissao)).await?;
        assert!(page.items.iter().all(|a| a.tipo == TipoAgrupador::Permissao));
        assert_eq!(page.total_items, 9);

        let permissoes = LocalCrud::<Permissao>::new(repo.clone());
        let filter = Filter { papel_id: Some(2), ..Filter::default() };
        let ids: Vec<_> = permissoes.list_paged(&filter).await?.items.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 4]);
        Ok(())
    }

    #[tokio::test]
    async fn selection_lists_active_records() -> Result<(), anyhow::Error> {
        let repo = Arc::new(Repository::seeded());
        let svc = papeis(&repo);
        let patch = json!({"ativo": false}).as_object().cloned().unwrap();
        svc.update(2, patch).await?;
        let sel = svc.selection().await?;
        assert_eq!(sel.len(), 1);
        assert_eq!(sel[0].id, 1);
        Ok(())
    }
}
