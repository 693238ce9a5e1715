use std::sync::Arc;
use std::time::Duration;

use configs::{ApiMode, AppConfig};
use models::{Agrupador, Entity, Funcionalidade, Papel, Permissao, Plano};
use service::auth::{AuthGate, CredentialVerifier, FileSessionStore, FixedCredentials, SessionStore, TokenIssuer};
use service::notifications::NotificationQueue;
use service::state::{AuthState, CollectionState};
use service::{LinkApi, LinkKind, LocalCrud, LocalLinks, LocalPlanos, PlanoApi, Repository, ServiceError, SharedCrud};
use tracing::info;

use crate::{ApiClient, HttpCrud, HttpLinks, HttpPlanos, RemoteCredentials};

/// One shared instance of every service, wired for mock or remote mode.
#[derive(Clone)]
pub struct AdminContext {
    pub mode: ApiMode,
    /// Present in mock mode.
    pub repository: Option<Arc<Repository>>,
    pub papeis: SharedCrud<Papel>,
    pub permissoes: SharedCrud<Permissao>,
    pub funcionalidades: SharedCrud<Funcionalidade>,
    pub agrupadores: SharedCrud<Agrupador>,
    pub planos: SharedCrud<Plano>,
    pub plano_itens: Arc<dyn PlanoApi>,
    pub papel_permissoes: Arc<dyn LinkApi>,
    pub funcionalidade_permissoes: Arc<dyn LinkApi>,
    pub notifications: NotificationQueue,
    pub auth: AuthGate,
}

impl AdminContext {
    /// Build from configuration; the session lives at `auth.session_path`.
    pub async fn from_config(cfg: &AppConfig) -> Result<Self, ServiceError> {
        let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open(&cfg.auth.session_path).await?);
        let notifications = NotificationQueue::new(cfg.notifications.default_duration_ms);
        let ctx = match cfg.api.mode {
            ApiMode::Mock => {
                let repo = Arc::new(if cfg.server.seed_data { Repository::seeded() } else { Repository::empty() });
                Self::mock(repo, session, TokenIssuer::new(cfg.auth.jwt_secret.clone()), notifications)?
            }
            ApiMode::Remote => {
                let api = ApiClient::new(&cfg.api.base_url, Duration::from_secs(cfg.api.timeout_secs), session)?;
                Self::remote(api, notifications)
            }
        };
        info!(mode = ?ctx.mode, "admin_context_ready");
        Ok(ctx)
    }

    /// Services over an in-process repository with the demo accounts.
    pub fn mock(
        repo: Arc<Repository>,
        session: Arc<dyn SessionStore>,
        issuer: TokenIssuer,
        notifications: NotificationQueue,
    ) -> Result<Self, ServiceError> {
        let credentials: Arc<dyn CredentialVerifier> = Arc::new(FixedCredentials::demo(issuer)?);
        Ok(Self {
            mode: ApiMode::Mock,
            papeis: Arc::new(LocalCrud::<Papel>::new(repo.clone())),
            permissoes: Arc::new(LocalCrud::<Permissao>::new(repo.clone())),
            funcionalidades: Arc::new(LocalCrud::<Funcionalidade>::new(repo.clone())),
            agrupadores: Arc::new(LocalCrud::<Agrupador>::new(repo.clone())),
            planos: Arc::new(LocalCrud::<Plano>::new(repo.clone())),
            plano_itens: Arc::new(LocalPlanos::new(repo.clone())),
            papel_permissoes: Arc::new(LocalLinks::new(repo.clone(), LinkKind::PapelPermissao)),
            funcionalidade_permissoes: Arc::new(LocalLinks::new(repo.clone(), LinkKind::FuncionalidadePermissao)),
            repository: Some(repo),
            notifications,
            auth: AuthGate::new(credentials, session),
        })
    }

    /// Services talking to the REST API through `api`.
    pub fn remote(api: ApiClient, notifications: NotificationQueue) -> Self {
        let credentials: Arc<dyn CredentialVerifier> = Arc::new(RemoteCredentials::new(api.clone()));
        Self {
            mode: ApiMode::Remote,
            repository: None,
            papeis: Arc::new(HttpCrud::<Papel>::new(api.clone())),
            permissoes: Arc::new(HttpCrud::<Permissao>::new(api.clone())),
            funcionalidades: Arc::new(HttpCrud::<Funcionalidade>::new(api.clone())),
            agrupadores: Arc::new(HttpCrud::<Agrupador>::new(api.clone())),
            planos: Arc::new(HttpCrud::<Plano>::new(api.clone())),
            plano_itens: Arc::new(HttpPlanos::new(api.clone())),
            papel_permissoes: Arc::new(HttpLinks::new(api.clone(), LinkKind::PapelPermissao)),
            funcionalidade_permissoes: Arc::new(HttpLinks::new(api.clone(), LinkKind::FuncionalidadePermissao)),
            notifications,
            auth: AuthGate::new(credentials, api.session()),
        }
    }

    /// A state container for one collection sharing this context's notifications.
    pub fn collection<T: Entity>(&self, api: SharedCrud<T>) -> CollectionState<T> {
        CollectionState::new(api, self.notifications.clone())
    }

    pub fn auth_state(&self) -> AuthState {
        AuthState::new(self.auth.clone(), self.notifications.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::auth::MemorySessionStore;
    use service::pagination::Filter;

    #[tokio::test]
    async fn mock_context_shares_one_repository() -> Result<(), anyhow::Error> {
        let repo = Arc::new(Repository::seeded());
        let ctx = AdminContext::mock(repo.clone(), Arc::new(MemorySessionStore::new()), TokenIssuer::mock(), NotificationQueue::default())?;
        ctx.papel_permissoes.link(2, 9).await?;
        let page = ctx.permissoes.list_paged(&Filter { papel_id: Some(2), ..Filter::default() }).await?;
        assert_eq!(page.total_items, 3);

        let papeis = ctx.collection(ctx.papeis.clone());
        papeis.load().await;
        assert_eq!(papeis.items().await.len(), 2);

        let auth = ctx.auth_state();
        auth.login("gestor@follawup.com", "123456").await?;
        assert_eq!(ctx.auth.current_user().await.map(|u| u.papel), Some("gestor".into()));
        Ok(())
    }

    #[tokio::test]
    async fn from_config_defaults_to_mock() -> Result<(), anyhow::Error> {
        let mut cfg = AppConfig::default();
        cfg.auth.session_path = std::env::temp_dir()
            .join(format!("session_{}.json", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned();
        let ctx = AdminContext::from_config(&cfg).await?;
        assert_eq!(ctx.mode, ApiMode::Mock);
        assert!(ctx.repository.is_some());
        assert!(!ctx.auth.is_authenticated().await);
        Ok(())
    }
}
