//! State containers mirroring service results for a UI layer.
//!
//! Each operation reports its outcome on the shared [`NotificationQueue`].
//! Failures of `load` and `delete` are reported and swallowed, failures of
//! `create`, `update` and `login` are reported, recorded and returned.

use std::sync::Arc;

use common::types::PagedResult;
use models::{Entity, EntityId, Patch};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, warn};

use crate::auth::gate::LoginOutcome;
use crate::auth::{AuthError, AuthGate, AuthUser};
use crate::crud::SharedCrud;
use crate::errors::ServiceError;
use crate::notifications::NotificationQueue;
use crate::pagination::Filter;

/// Paging metadata of the last loaded page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_items: u64,
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> From<&PagedResult<T>> for PageInfo {
    fn from(p: &PagedResult<T>) -> Self {
        Self {
            total_items: p.total_items,
            current_page: p.current_page,
            page_size: p.page_size,
            total_pages: p.total_pages,
            has_next: p.has_next,
            has_previous: p.has_previous,
        }
    }
}

struct Mirror<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
    page: Option<PageInfo>,
}

/// Local mirror of one entity collection.
pub struct CollectionState<T: Entity> {
    api: SharedCrud<T>,
    notifications: NotificationQueue,
    mirror: RwLock<Mirror<T>>,
}

impl<T: Entity> CollectionState<T> {
    pub fn new(api: SharedCrud<T>, notifications: NotificationQueue) -> Self {
        Self {
            api,
            notifications,
            mirror: RwLock::new(Mirror { items: Vec::new(), loading: false, error: None, page: None }),
        }
    }

    pub async fn items(&self) -> Vec<T> { self.mirror.read().await.items.clone() }

    pub async fn loading(&self) -> bool { self.mirror.read().await.loading }

    pub async fn error(&self) -> Option<String> { self.mirror.read().await.error.clone() }

    pub async fn page_info(&self) -> Option<PageInfo> { self.mirror.read().await.page }

    async fn begin(&self) {
        let mut m = self.mirror.write().await;
        m.loading = true;
        m.error = None;
    }

    async fn fail(&self, action: &str, e: &ServiceError) {
        let message = format!("failed to {action} {}: {e}", T::NAME);
        self.notifications.error(message.clone());
        let mut m = self.mirror.write().await;
        m.loading = false;
        m.error = Some(message);
    }

    /// Replace the mirror with the full collection. Errors keep the previous items.
    pub async fn load(&self) {
        self.begin().await;
        match self.api.list().await {
            Ok(items) => {
                let mut m = self.mirror.write().await;
                m.items = items;
                m.page = None;
                m.loading = false;
            }
            Err(e) => {
                warn!(entity = T::NAME, error = %e, "load_failed");
                self.fail("load", &e).await;
            }
        }
    }

    /// Replace the mirror with one page.
    pub async fn load_page(&self, filter: &Filter) -> Option<PageInfo> {
        self.begin().await;
        match self.api.list_paged(filter).await {
            Ok(page) => {
                let info = PageInfo::from(&page);
                let mut m = self.mirror.write().await;
                m.items = page.items;
                m.page = Some(info);
                m.loading = false;
                Some(info)
            }
            Err(e) => {
                warn!(entity = T::NAME, error = %e, "load_page_failed");
                self.fail("load", &e).await;
                None
            }
        }
    }

    pub async fn create(&self, input: T::Input) -> Result<T, ServiceError> {
        self.begin().await;
        match self.api.create(input).await {
            Ok(created) => {
                let mut m = self.mirror.write().await;
                m.items.push(created.clone());
                m.loading = false;
                drop(m);
                self.notifications.success(format!("{} created", T::NAME));
                Ok(created)
            }
            Err(e) => {
                self.fail("create", &e).await;
                Err(e)
            }
        }
    }

    pub async fn update(&self, id: EntityId, patch: Patch) -> Result<T, ServiceError> {
        self.begin().await;
        match self.api.update(id, patch).await {
            Ok(updated) => {
                let mut m = self.mirror.write().await;
                if let Some(slot) = m.items.iter_mut().find(|x| x.id() == id) {
                    *slot = updated.clone();
                }
                m.loading = false;
                drop(m);
                self.notifications.success(format!("{} updated", T::NAME));
                Ok(updated)
            }
            Err(e) => {
                self.fail("update", &e).await;
                Err(e)
            }
        }
    }

    /// Returns whether the record was deleted; failures are only reported.
    pub async fn delete(&self, id: EntityId) -> bool {
        self.begin().await;
        match self.api.delete(id).await {
            Ok(()) => {
                let mut m = self.mirror.write().await;
                m.items.retain(|x| x.id() != id);
                m.loading = false;
                drop(m);
                self.notifications.success(format!("{} deleted", T::NAME));
                true
            }
            Err(e) => {
                error!(entity = T::NAME, id, error = %e, "delete_failed");
                self.fail("delete", &e).await;
                false
            }
        }
    }
}

/// Login/logout with user feedback on top of [`AuthGate`].
pub struct AuthState {
    gate: AuthGate,
    notifications: NotificationQueue,
    error: RwLock<Option<String>>,
}

impl AuthState {
    pub fn new(gate: AuthGate, notifications: NotificationQueue) -> Self {
        Self { gate, notifications, error: RwLock::new(None) }
    }

    pub fn gate(&self) -> &AuthGate { &self.gate }

    pub async fn error(&self) -> Option<String> { self.error.read().await.clone() }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        *self.error.write().await = None;
        match self.gate.login(email, password).await {
            Ok(outcome) => {
                self.notifications.success(format!("welcome, {}", outcome.session.user.nome));
                Ok(outcome)
            }
            Err(e) => {
                self.notifications.error(e.to_string());
                *self.error.write().await = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Always lands on the login screen.
    pub async fn logout(&self) -> &'static str {
        let to = self.gate.logout().await;
        self.notifications.info("signed out");
        to
    }

    pub async fn is_authenticated(&self) -> bool { self.gate.is_authenticated().await }

    pub async fn current_user(&self) -> Option<AuthUser> { self.gate.current_user().await }
}
