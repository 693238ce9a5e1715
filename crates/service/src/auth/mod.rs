//! Authentication: credential verification, durable session storage and the
//! navigation guard deciding which screens are reachable.

pub mod credentials;
pub mod domain;
pub mod errors;
pub mod gate;
pub mod routes;
pub mod session;
pub mod token;

pub use credentials::{CredentialVerifier, FixedCredentials};
pub use domain::{AuthSession, AuthUser, LoginInput};
pub use errors::AuthError;
pub use gate::AuthGate;
pub use routes::{NavigationDecision, RouteTable};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
pub use token::TokenIssuer;
