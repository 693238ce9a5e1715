//! Service layer of the admin: the generic paged CRUD contract, the in-memory
//! repository behind mock mode, role/functionality permission links, plan
//! composition, authentication and the client-side state containers.
//!
//! Every contract is an async trait (`CrudApi`, `LinkApi`, `PlanoApi`,
//! `CredentialVerifier`, `SessionStore`) with a local implementation here; the
//! `client` crate implements the same traits over HTTP.
//!
//! # Examples
//! ```
//! use std::sync::Arc;
//! use models::{Papel, PapelInput};
//! use service::crud::{CrudApi, LocalCrud};
//! use service::pagination::Filter;
//! use service::repository::Repository;
//!
//! let repo = Arc::new(Repository::empty());
//! let papeis = LocalCrud::<Papel>::new(repo);
//! let created = tokio_test::block_on(papeis.create(PapelInput::new("Advogado(a)", None))).unwrap();
//! let page = tokio_test::block_on(papeis.list_paged(&Filter::default())).unwrap();
//! assert_eq!(page.items, vec![created]);
//! ```

pub mod errors;
pub mod pagination;
pub mod repository;
pub mod crud;
pub mod links;
pub mod planos;
pub mod auth;
pub mod storage;
pub mod notifications;
pub mod modal;
pub mod state;

pub use crud::{CrudApi, LocalCrud, SharedCrud};
pub use errors::ServiceError;
pub use links::{LinkApi, LocalLinks};
pub use planos::{LocalPlanos, PlanoApi};
pub use repository::{LinkKind, Repository};
