//! Many-to-many links between roles or functionalities and permissions.

use std::sync::Arc;

use async_trait::async_trait;
use common::types::Selection;
use models::{Entity, EntityId, Permissao};
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::repository::{LinkKind, Repository};

/// Link operations of one parent kind (papel or funcionalidade) towards permissions.
#[async_trait]
pub trait LinkApi: Send + Sync {
    /// Idempotent: linking an already linked pair is a no-op.
    async fn link(&self, parent: EntityId, child: EntityId) -> Result<(), ServiceError>;

    /// Idempotent: unlinking a pair that is not linked is a no-op.
    async fn unlink(&self, parent: EntityId, child: EntityId) -> Result<(), ServiceError>;

    /// Permissions currently linked to `parent`, in link order.
    async fn list_linked(&self, parent: EntityId) -> Result<Vec<Selection>, ServiceError>;

    /// Permissions that can be linked.
    async fn list_available(&self) -> Result<Vec<Selection>, ServiceError>;

    /// Make `children` the exact linked set of `parent`.
    async fn replace_links(&self, parent: EntityId, children: &[EntityId]) -> Result<Vec<Selection>, ServiceError>;
}

/// [`LinkApi`] over the repository link table.
#[derive(Clone)]
pub struct LocalLinks {
    repo: Arc<Repository>,
    kind: LinkKind,
}

impl LocalLinks {
    pub fn new(repo: Arc<Repository>, kind: LinkKind) -> Self { Self { repo, kind } }

    pub fn kind(&self) -> LinkKind { self.kind }

    async fn ensure_parent(&self, parent: EntityId) -> Result<(), ServiceError> {
        if self.repo.parent_exists(self.kind, parent).await {
            Ok(())
        } else {
            Err(ServiceError::not_found(self.kind.parent_name()))
        }
    }

    async fn ensure_child(&self, child: EntityId) -> Result<(), ServiceError> {
        if self.repo.permissoes.contains(child).await {
            Ok(())
        } else {
            Err(ServiceError::not_found(Permissao::NAME))
        }
    }

    /// Remove rows pointing at deleted permissions.
    async fn purge_dangling(&self, parent: EntityId) {
        let existing = self.repo.permissoes.ids().await;
        let dropped = self.repo.links.retain_children(self.kind, parent, |c| existing.contains(&c)).await;
        if dropped > 0 {
            debug!(parent, dropped, "dangling_links_purged");
        }
    }
}

#[async_trait]
impl LinkApi for LocalLinks {
    #[instrument(skip(self), fields(kind = ?self.kind))]
    async fn link(&self, parent: EntityId, child: EntityId) -> Result<(), ServiceError> {
        self.ensure_parent(parent).await?;
        self.ensure_child(child).await?;
        self.purge_dangling(parent).await;
        if self.repo.links.link(self.kind, parent, child).await {
            info!("permission_linked");
        }
        Ok(())
    }

    #[instrument(skip(self), fields(kind = ?self.kind))]
    async fn unlink(&self, parent: EntityId, child: EntityId) -> Result<(), ServiceError> {
        self.ensure_parent(parent).await?;
        self.purge_dangling(parent).await;
        if self.repo.links.unlink(self.kind, parent, child).await {
            info!("permission_unlinked");
        }
        Ok(())
    }

    async fn list_linked(&self, parent: EntityId) -> Result<Vec<Selection>, ServiceError> {
        self.ensure_parent(parent).await?;
        let mut linked = Vec::new();
        for child in self.repo.links.children(self.kind, parent).await {
            if let Some(p) = self.repo.permissoes.get(child).await {
                linked.push(p.selection());
            }
        }
        Ok(linked)
    }

    async fn list_available(&self) -> Result<Vec<Selection>, ServiceError> {
        let all = self.repo.permissoes.all().await;
        Ok(all.iter().filter(|p| p.ativo).map(Entity::selection).collect())
    }

    #[instrument(skip(self, children), fields(kind = ?self.kind, count = children.len()))]
    async fn replace_links(&self, parent: EntityId, children: &[EntityId]) -> Result<Vec<Selection>, ServiceError> {
        self.ensure_parent(parent).await?;
        for &child in children {
            self.ensure_child(child).await?;
        }
        self.repo.links.replace(self.kind, parent, children).await;
        info!("links_replaced");
        self.list_linked(parent).await
    }
}
