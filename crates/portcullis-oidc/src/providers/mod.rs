//! Identity provider implementations.
//!
//! One module per provider. Each provider maps its own claim shape into the
//! canonical [`IdentityClaims`]; the per-provider quirks (missing emails,
//! username fallbacks, combined display names) live here and nowhere else.

pub mod apple;
pub mod facebook;
pub mod github;
pub mod google;
pub mod microsoft;
pub mod spotify;
pub mod twitter;

pub use async_trait::async_trait;

use crate::claims::IdentityClaims;
use crate::config::TenantConfig;
use crate::error::{OidcError, OidcResult, ProviderKind};

/// Token response from a provider's token endpoint.
#[derive(Debug, Clone)]
pub struct TokenResponse {
    /// Access token for API calls.
    pub access_token: String,
    /// Refresh token for obtaining new access tokens.
    pub refresh_token: Option<String>,
    /// Token expiration in seconds.
    pub expires_in: Option<i64>,
    /// ID token (OIDC providers).
    pub id_token: Option<String>,
}

/// Trait for identity provider implementations.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Get the provider kind.
    fn kind(&self) -> ProviderKind;

    /// Get the authorization URL for initiating the login flow.
    ///
    /// # Arguments
    ///
    /// * `state` - Signed CSRF state parameter
    /// * `pkce_challenge` - PKCE code challenge (S256); ignored by providers
    ///   without PKCE support
    /// * `redirect_uri` - Callback URL
    /// * `nonce` - OIDC nonce, echoed in the ID token by OIDC providers
    fn authorization_url(
        &self,
        state: &str,
        pkce_challenge: &str,
        redirect_uri: &str,
        nonce: Option<&str>,
    ) -> String;

    /// Exchange an authorization code for tokens.
    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
        redirect_uri: &str,
    ) -> OidcResult<TokenResponse>;

    /// Fetch the subject's identity and map it to canonical claims.
    ///
    /// For pure-OIDC providers this decodes the ID token instead of calling
    /// a userinfo endpoint; `expected_nonce` is cross-checked there.
    async fn fetch_identity(
        &self,
        tokens: &TokenResponse,
        expected_nonce: Option<&str>,
    ) -> OidcResult<IdentityClaims>;

    /// Get the default scopes for this provider.
    fn default_scopes(&self) -> Vec<String>;
}

/// Provider factory building provider instances from tenant configuration.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the provider for a tenant, applying its issuer override.
    pub fn for_tenant(config: &TenantConfig) -> OidcResult<Box<dyn IdentityProvider>> {
        let provider: Box<dyn IdentityProvider> = match config.kind {
            ProviderKind::Github => {
                let mut p =
                    github::GithubProvider::new(config.client_id.clone(), config.client_secret.clone());
                if let Some(base) = &config.issuer {
                    p = p.with_base_url(base);
                }
                Box::new(p)
            }
            ProviderKind::Twitter => {
                let mut p = twitter::TwitterProvider::new(
                    config.client_id.clone(),
                    config.client_secret.clone(),
                );
                if let Some(base) = &config.issuer {
                    p = p.with_base_url(base);
                }
                Box::new(p)
            }
            ProviderKind::Google => {
                let mut p =
                    google::GoogleProvider::new(config.client_id.clone(), config.client_secret.clone());
                if let Some(base) = &config.issuer {
                    p = p.with_base_url(base);
                }
                Box::new(p)
            }
            ProviderKind::Spotify => {
                let mut p = spotify::SpotifyProvider::new(
                    config.client_id.clone(),
                    config.client_secret.clone(),
                );
                if let Some(base) = &config.issuer {
                    p = p.with_base_url(base);
                }
                Box::new(p)
            }
            ProviderKind::Microsoft => {
                let mut p = microsoft::MicrosoftProvider::new(
                    config.client_id.clone(),
                    config.client_secret.clone(),
                    None,
                );
                if let Some(base) = &config.issuer {
                    p = p.with_base_url(base);
                }
                Box::new(p)
            }
            ProviderKind::Facebook => {
                let mut p = facebook::FacebookProvider::new(
                    config.client_id.clone(),
                    config.client_secret.clone(),
                );
                if let Some(base) = &config.issuer {
                    p = p.with_base_url(base);
                }
                Box::new(p)
            }
            ProviderKind::Apple => {
                let keys = config
                    .apple
                    .as_ref()
                    .ok_or_else(|| OidcError::ConfigurationError {
                        message: "Apple requires team_id, key_id and private_key".to_string(),
                    })?;
                let mut p = apple::AppleProvider::new(
                    config.client_id.clone(),
                    keys.team_id.clone(),
                    keys.key_id.clone(),
                    &keys.private_key,
                )?;
                if let Some(base) = &config.issuer {
                    p = p.with_base_url(base);
                }
                Box::new(p)
            }
        };
        Ok(provider)
    }
}

// Re-export providers
pub use apple::AppleProvider;
pub use facebook::FacebookProvider;
pub use github::GithubProvider;
pub use google::GoogleProvider;
pub use microsoft::MicrosoftProvider;
pub use spotify::SpotifyProvider;
pub use twitter::TwitterProvider;
