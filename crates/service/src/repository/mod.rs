//! In-memory repository backing mock mode and the REST API.
//!
//! One explicit object owns every collection and link table. It is built at
//! startup (seeded or empty) and `reset()` restores that initial state, so
//! tests get a clean store without process-wide globals.

pub mod seed;

use std::sync::atomic::{AtomicU64, Ordering};

use models::{
    Agrupador, CatalogItem, Entity, EntityId, Funcionalidade, Papel, Patch, Permissao, Plano,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::ServiceError;
pub use seed::Seed;

/// Ordered collection of one entity type with a monotonic id counter.
pub struct Collection<T> {
    items: RwLock<Vec<T>>,
    next_id: AtomicU64,
}

impl<T: Entity> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        let next = first_free_id(&items);
        Self { items: RwLock::new(items), next_id: AtomicU64::new(next) }
    }

    /// Snapshot in insertion order.
    pub async fn all(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    pub async fn get(&self, id: EntityId) -> Option<T> {
        self.items.read().await.iter().find(|x| x.id() == id).cloned()
    }

    pub async fn contains(&self, id: EntityId) -> bool {
        self.items.read().await.iter().any(|x| x.id() == id)
    }

    pub async fn ids(&self) -> Vec<EntityId> {
        self.items.read().await.iter().map(Entity::id).collect()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Create a record from its input, assigning the next free id.
    pub async fn insert(&self, input: T::Input) -> Result<T, ServiceError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = T::from_input(id, input)?;
        self.items.write().await.push(record.clone());
        debug!(entity = T::NAME, id, "record_inserted");
        Ok(record)
    }

    /// Shallow-merge `patch` over the stored record; the stored record is untouched on error.
    pub async fn update(&self, id: EntityId, patch: &Patch) -> Result<T, ServiceError> {
        let mut items = self.items.write().await;
        let slot = items.iter_mut().find(|x| x.id() == id).ok_or_else(|| ServiceError::not_found(T::NAME))?;
        let updated = slot.merged(patch)?;
        *slot = updated.clone();
        Ok(updated)
    }

    /// Apply `f` to a copy of the record and commit it only if `f` succeeds and the
    /// result still validates.
    pub async fn modify<R, F>(&self, id: EntityId, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut T) -> Result<R, ServiceError>,
    {
        let mut items = self.items.write().await;
        let slot = items.iter_mut().find(|x| x.id() == id).ok_or_else(|| ServiceError::not_found(T::NAME))?;
        let mut draft = slot.clone();
        let out = f(&mut draft)?;
        draft.validate()?;
        *slot = draft;
        Ok(out)
    }

    pub async fn remove(&self, id: EntityId) -> Result<T, ServiceError> {
        let mut items = self.items.write().await;
        let idx = items.iter().position(|x| x.id() == id).ok_or_else(|| ServiceError::not_found(T::NAME))?;
        Ok(items.remove(idx))
    }

    /// Replace the whole content, restarting the id counter above the new maximum.
    pub async fn replace_all(&self, records: Vec<T>) {
        let next = first_free_id(&records);
        *self.items.write().await = records;
        self.next_id.store(next, Ordering::SeqCst);
    }
}

fn first_free_id<T: Entity>(items: &[T]) -> EntityId {
    items.iter().map(Entity::id).max().unwrap_or(0) + 1
}

/// Which many-to-many relation a link row belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkKind {
    PapelPermissao,
    FuncionalidadePermissao,
}

impl LinkKind {
    pub fn parent_name(&self) -> &'static str {
        match self {
            LinkKind::PapelPermissao => Papel::NAME,
            LinkKind::FuncionalidadePermissao => Funcionalidade::NAME,
        }
    }

    pub fn parent_resource(&self) -> &'static str {
        match self {
            LinkKind::PapelPermissao => Papel::RESOURCE,
            LinkKind::FuncionalidadePermissao => Funcionalidade::RESOURCE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub kind: LinkKind,
    pub parent: EntityId,
    pub child: EntityId,
}

/// Link rows kept in creation order; a (kind, parent, child) triple appears at most once.
#[derive(Default)]
pub struct LinkTable {
    rows: RwLock<Vec<Link>>,
}

impl LinkTable {
    pub fn new(rows: Vec<Link>) -> Self {
        let mut unique: Vec<Link> = Vec::with_capacity(rows.len());
        for row in rows {
            if !unique.contains(&row) {
                unique.push(row);
            }
        }
        Self { rows: RwLock::new(unique) }
    }

    /// Returns whether a new row was added.
    pub async fn link(&self, kind: LinkKind, parent: EntityId, child: EntityId) -> bool {
        let row = Link { kind, parent, child };
        let mut rows = self.rows.write().await;
        if rows.contains(&row) {
            return false;
        }
        rows.push(row);
        true
    }

    /// Returns whether a row was removed.
    pub async fn unlink(&self, kind: LinkKind, parent: EntityId, child: EntityId) -> bool {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| !(r.kind == kind && r.parent == parent && r.child == child));
        rows.len() != before
    }

    pub async fn children(&self, kind: LinkKind, parent: EntityId) -> Vec<EntityId> {
        self.rows
            .read()
            .await
            .iter()
            .filter(|r| r.kind == kind && r.parent == parent)
            .map(|r| r.child)
            .collect()
    }

    /// Set the exact child set of a parent, de-duplicated, in the given order.
    pub async fn replace(&self, kind: LinkKind, parent: EntityId, children: &[EntityId]) {
        let mut rows = self.rows.write().await;
        rows.retain(|r| !(r.kind == kind && r.parent == parent));
        for &child in children {
            let row = Link { kind, parent, child };
            if !rows.contains(&row) {
                rows.push(row);
            }
        }
    }

    /// Drop rows of `parent` whose child fails `keep`; returns how many were dropped.
    pub async fn retain_children<F>(&self, kind: LinkKind, parent: EntityId, keep: F) -> usize
    where
        F: Fn(EntityId) -> bool,
    {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.kind != kind || r.parent != parent || keep(r.child));
        before - rows.len()
    }

    pub async fn reset(&self, rows: Vec<Link>) {
        *self.rows.write().await = LinkTable::new(rows).rows.into_inner();
    }
}

/// The explicit store behind mock mode.
pub struct Repository {
    pub papeis: Collection<Papel>,
    pub permissoes: Collection<Permissao>,
    pub funcionalidades: Collection<Funcionalidade>,
    pub agrupadores: Collection<Agrupador>,
    pub planos: Collection<Plano>,
    pub links: LinkTable,
    direitos: RwLock<Vec<CatalogItem>>,
    item_ids: AtomicU64,
    initial: Seed,
}

impl Repository {
    pub fn from_seed(seed: Seed) -> Self {
        let item_ids = AtomicU64::new(seed.first_free_item_id());
        Self {
            papeis: Collection::new(seed.papeis.clone()),
            permissoes: Collection::new(seed.permissoes.clone()),
            funcionalidades: Collection::new(seed.funcionalidades.clone()),
            agrupadores: Collection::new(seed.agrupadores.clone()),
            planos: Collection::new(seed.planos.clone()),
            links: LinkTable::new(seed.links.clone()),
            direitos: RwLock::new(seed.direitos.clone()),
            item_ids,
            initial: seed,
        }
    }

    /// Demonstration data: roles, permissions, functionalities, groupings and two plans.
    pub fn seeded() -> Self { Self::from_seed(Seed::demo()) }

    pub fn empty() -> Self { Self::from_seed(Seed::default()) }

    /// Restore the state the repository was constructed with.
    pub async fn reset(&self) {
        let seed = &self.initial;
        self.papeis.replace_all(seed.papeis.clone()).await;
        self.permissoes.replace_all(seed.permissoes.clone()).await;
        self.funcionalidades.replace_all(seed.funcionalidades.clone()).await;
        self.agrupadores.replace_all(seed.agrupadores.clone()).await;
        self.planos.replace_all(seed.planos.clone()).await;
        self.links.reset(seed.links.clone()).await;
        *self.direitos.write().await = seed.direitos.clone();
        self.item_ids.store(seed.first_free_item_id(), Ordering::SeqCst);
        debug!("repository_reset");
    }

    /// Entitlement catalog offered when composing plans.
    pub async fn available_direitos(&self) -> Vec<CatalogItem> {
        self.direitos.read().await.clone()
    }

    pub async fn find_direito(&self, id: EntityId) -> Option<CatalogItem> {
        self.direitos.read().await.iter().find(|d| d.id == id).cloned()
    }

    /// Functionality catalog, derived from the functionality collection.
    pub async fn available_funcionalidades(&self) -> Vec<CatalogItem> {
        self.funcionalidades
            .all()
            .await
            .into_iter()
            .map(|f| CatalogItem { id: f.id, nome: f.nome })
            .collect()
    }

    /// Id for plan sub-items (prices), never below `floor`.
    pub fn next_item_id(&self, floor: EntityId) -> EntityId {
        self.item_ids.fetch_max(floor, Ordering::SeqCst);
        self.item_ids.fetch_add(1, Ordering::SeqCst)
    }

    /// Whether the parent side of a link exists.
    pub async fn parent_exists(&self, kind: LinkKind, id: EntityId) -> bool {
        match kind {
            LinkKind::PapelPermissao => self.papeis.contains(id).await,
            LinkKind::FuncionalidadePermissao => self.funcionalidades.contains(id).await,
        }
    }
}

impl Default for Repository {
    fn default() -> Self { Self::empty() }
}

/// Access to the collection of one entity type.
pub trait HasCollection<T: Entity>: Send + Sync {
    fn collection(&self) -> &Collection<T>;
}

macro_rules! has_collection {
    ($ty:ty, $field:ident) => {
        impl HasCollection<$ty> for Repository {
            fn collection(&self) -> &Collection<$ty> { &self.$field }
        }
    };
}

has_collection!(Papel, papeis);
has_collection!(Permissao, permissoes);
has_collection!(Funcionalidade, funcionalidades);
has_collection!(Agrupador, agrupadores);
has_collection!(Plano, planos);
