//! Application configuration loaded from environment variables.
//!
//! Fail-fast: required variables must be present and valid, or the
//! application exits with a clear error message. Tenants are registered
//! from `<PROVIDER>_CLIENT_ID` / `<PROVIDER>_CLIENT_SECRET` pairs; only
//! configured providers get a login route.

use std::env;

use thiserror::Error;

use portcullis_oidc::{ProviderKind, SecurityConfig, TenantConfig};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}")]
    MissingVariable { var: String },

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("No tenants configured; set at least one <PROVIDER>_CLIENT_ID/_CLIENT_SECRET pair")]
    NoTenants,
}

/// Demo application configuration.
#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub security: SecurityConfig,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("PORT") {
            Ok(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                var: "PORT".to_string(),
                message: format!("'{value}' is not a valid port"),
            })?,
            Err(_) => 8080,
        };
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let public_url =
            env::var("PUBLIC_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));
        let state_secret = require("STATE_SECRET")?;
        let session_secret = require("SESSION_SECRET")?;

        let mut security = SecurityConfig::new(public_url, state_secret, session_secret);

        for kind in ProviderKind::ALL {
            let Some(tenant) = tenant_from_env(kind)? else {
                continue;
            };
            security = security.with_tenant(tenant);
        }

        if security.tenants.is_empty() {
            return Err(ConfigError::NoTenants);
        }

        Ok(Self {
            host,
            port,
            rust_log,
            security,
        })
    }
}

fn require(var: &str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVariable {
            var: var.to_string(),
        }),
    }
}

/// Build a tenant from `<PROVIDER>_CLIENT_ID` etc., if configured.
fn tenant_from_env(kind: ProviderKind) -> Result<Option<TenantConfig>, ConfigError> {
    let prefix = kind.to_string().to_uppercase();
    let Ok(client_id) = env::var(format!("{prefix}_CLIENT_ID")) else {
        return Ok(None);
    };
    let client_secret = env::var(format!("{prefix}_CLIENT_SECRET")).unwrap_or_default();

    let mut tenant = TenantConfig::new(kind.to_string(), kind, client_id, client_secret);

    if let Ok(issuer) = env::var(format!("{prefix}_ISSUER")) {
        tenant = tenant.with_issuer(issuer);
    }

    if kind == ProviderKind::Apple {
        let team_id = require("APPLE_TEAM_ID")?;
        let key_id = require("APPLE_KEY_ID")?;
        let private_key = require("APPLE_PRIVATE_KEY")?;
        tenant = tenant.with_apple_keys(team_id, key_id, private_key);
    }

    Ok(Some(tenant))
}
