//! Router and shared state for the security endpoints.

use std::sync::Arc;

use axum::{extract::State, routing::get, Router};

use crate::config::{SecurityConfig, TenantRegistry};
use crate::handlers;
use crate::session::SessionService;
use crate::state::StateService;

/// Mount point of the security endpoints.
pub const SECURITY_MOUNT: &str = "/_renarde/security";

/// Callback path, relative to [`SECURITY_MOUNT`].
pub const CALLBACK_PATH: &str = "/oidc-success";

/// Logout path, relative to [`SECURITY_MOUNT`].
pub const LOGOUT_PATH: &str = "/logout";

/// Shared state for the security handlers.
#[derive(Clone)]
pub struct SecurityState {
    /// Configured tenants.
    pub tenants: Arc<TenantRegistry>,
    /// Signed-state (CSRF) service.
    pub state_service: StateService,
    /// Session token/cookie service.
    pub sessions: SessionService,
    /// Externally visible base URL, no trailing slash.
    pub public_url: String,
    /// Path of the post-login welcome view.
    pub welcome_path: String,
}

impl SecurityState {
    #[must_use]
    pub fn new(config: SecurityConfig) -> Self {
        let state_service = StateService::new(&config.state_secret);
        let sessions = SessionService::new(&config.session_secret, config.session_lifetime_secs);
        Self {
            tenants: Arc::new(TenantRegistry::new(config.tenants)),
            state_service,
            sessions,
            public_url: config.public_url,
            welcome_path: config.welcome_path,
        }
    }

    /// Absolute redirect URI the providers call back to.
    #[must_use]
    pub fn callback_url(&self) -> String {
        format!("{}{SECURITY_MOUNT}{CALLBACK_PATH}", self.public_url)
    }

    /// Absolute URL of the welcome view.
    #[must_use]
    pub fn welcome_url(&self) -> String {
        format!("{}{}", self.public_url, self.welcome_path)
    }

    /// Absolute URL of the application root.
    #[must_use]
    pub fn root_url(&self) -> String {
        format!("{}/", self.public_url)
    }
}

/// Create the security router, to be nested under [`SECURITY_MOUNT`].
///
/// Login routes are registered per configured tenant: the tenant name is
/// embedded mid-segment (`login-github`), which the path router cannot
/// parameterize, and an unmatched tenant should 404 anyway.
pub fn security_router(state: &SecurityState) -> Router<SecurityState> {
    let mut router = Router::new()
        .route(
            CALLBACK_PATH,
            get(handlers::callback_query).post(handlers::callback_form),
        )
        .route(LOGOUT_PATH, get(handlers::logout));

    for name in state.tenants.names() {
        let tenant = name.clone();
        router = router.route(
            &format!("/login-{name}"),
            get(move |State(state): State<SecurityState>| {
                let tenant = tenant.clone();
                async move { handlers::login(state, tenant).await }
            }),
        );
    }

    router
}
