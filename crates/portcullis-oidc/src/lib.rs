//! Multi-tenant OIDC relying party.
//!
//! This crate implements the login/session/logout state machine of a web
//! application's security module across seven identity providers (GitHub,
//! Twitter, Google, Spotify, Microsoft, Facebook, Apple). It handles
//! authorization-request issuance, callback validation, code exchange,
//! claims normalization and tenant-scoped cookie sessions.
//!
//! # Features
//!
//! - **Multi-tenant**: each tenant selects a provider configuration; login
//!   paths (`login-<tenant>`) and session cookies (`q_session_<tenant>`) are
//!   tenant-scoped and independent
//! - **CSRF protection**: signed JWT state parameter with PKCE (S256) and
//!   OIDC nonce
//! - **Stateless sessions**: signed cookie sessions, no server-side store
//! - **Claims mapping**: provider quirks (missing emails, username
//!   fallbacks, combined display names) normalize to one canonical record
//!
//! # Example
//!
//! ```rust,ignore
//! use portcullis_oidc::{security_router, SecurityConfig, SecurityState, SECURITY_MOUNT};
//!
//! let state = SecurityState::new(config);
//! let app = Router::new()
//!     .nest(SECURITY_MOUNT, security_router(&state))
//!     .with_state(state);
//! ```

pub mod claims;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod providers;
pub mod router;
pub mod session;
pub mod state;

pub use claims::{IdentityClaims, WelcomeView};
pub use config::{AppleKeys, SecurityConfig, TenantConfig, TenantRegistry};
pub use error::{OidcError, OidcResult, ProviderKind};
pub use extractors::SessionPrincipal;
pub use router::{security_router, SecurityState, CALLBACK_PATH, LOGOUT_PATH, SECURITY_MOUNT};
pub use session::{clear_session_cookie, session_cookie_name, SessionService};
pub use state::StateService;
