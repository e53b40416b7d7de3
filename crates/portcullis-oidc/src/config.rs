//! Tenant and module configuration.
//!
//! A tenant is a configured identity-provider integration identified by a
//! short name ("github", "apple"). The registry is explicit, in-memory
//! configuration handed to [`crate::SecurityState`]; there is no ambient
//! global provider setup.

use std::collections::HashMap;

use crate::error::ProviderKind;

/// Apple Sign In signing material (Services ID key).
#[derive(Debug, Clone)]
pub struct AppleKeys {
    /// Apple Developer Team ID.
    pub team_id: String,
    /// Key ID of the P8 private key.
    pub key_id: String,
    /// P8 private key content (PEM).
    pub private_key: String,
}

/// Configuration for one tenant.
#[derive(Debug, Clone)]
pub struct TenantConfig {
    /// Tenant identifier; selects the login path (`login-<name>`) and the
    /// session cookie name (`q_session_<name>`).
    pub name: String,
    pub kind: ProviderKind,
    pub client_id: String,
    pub client_secret: String,
    /// Base-URL override pointing every provider endpoint at a single host.
    /// `None` uses the provider's real endpoints; tests point this at a mock.
    pub issuer: Option<String>,
    /// Apple signing material; required when `kind` is [`ProviderKind::Apple`].
    pub apple: Option<AppleKeys>,
}

impl TenantConfig {
    pub fn new(
        name: impl Into<String>,
        kind: ProviderKind,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            issuer: None,
            apple: None,
        }
    }

    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    #[must_use]
    pub fn with_apple_keys(
        mut self,
        team_id: impl Into<String>,
        key_id: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        self.apple = Some(AppleKeys {
            team_id: team_id.into(),
            key_id: key_id.into(),
            private_key: private_key.into(),
        });
        self
    }
}

/// In-memory registry of configured tenants.
#[derive(Debug, Default)]
pub struct TenantRegistry {
    tenants: HashMap<String, TenantConfig>,
}

impl TenantRegistry {
    #[must_use]
    pub fn new(tenants: Vec<TenantConfig>) -> Self {
        let mut registry = Self::default();
        for tenant in tenants {
            registry.register(tenant);
        }
        registry
    }

    pub fn register(&mut self, tenant: TenantConfig) {
        self.tenants.insert(tenant.name.clone(), tenant);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TenantConfig> {
        self.tenants.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.tenants.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}

/// Default session lifetime: 8 hours.
pub const DEFAULT_SESSION_LIFETIME_SECS: i64 = 8 * 3600;

/// Default path of the post-login welcome view.
pub const DEFAULT_WELCOME_PATH: &str = "/oidc-welcome";

/// Configuration for the security module.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Externally visible base URL of the application, no trailing slash
    /// (e.g. `https://app.example.com`). Used for the callback redirect URI,
    /// the welcome redirect, and the post-logout redirect.
    pub public_url: String,
    /// Path the callback redirects to after establishing a session.
    pub welcome_path: String,
    /// Secret signing the short-lived state parameter.
    pub state_secret: String,
    /// Secret signing session cookies.
    pub session_secret: String,
    pub session_lifetime_secs: i64,
    pub tenants: Vec<TenantConfig>,
}

impl SecurityConfig {
    pub fn new(
        public_url: impl Into<String>,
        state_secret: impl Into<String>,
        session_secret: impl Into<String>,
    ) -> Self {
        let mut public_url = public_url.into();
        while public_url.ends_with('/') {
            public_url.pop();
        }
        Self {
            public_url,
            welcome_path: DEFAULT_WELCOME_PATH.to_string(),
            state_secret: state_secret.into(),
            session_secret: session_secret.into(),
            session_lifetime_secs: DEFAULT_SESSION_LIFETIME_SECS,
            tenants: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tenant(mut self, tenant: TenantConfig) -> Self {
        self.tenants.push(tenant);
        self
    }

    #[must_use]
    pub fn with_welcome_path(mut self, path: impl Into<String>) -> Self {
        self.welcome_path = path.into();
        self
    }
}
