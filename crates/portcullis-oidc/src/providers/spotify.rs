//! Spotify `OAuth2` provider implementation.
//!
//! Spotify reports a combined `display_name` and no username claim.

use super::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{IdentityProvider, TokenResponse};
use crate::claims::{split_display_name, IdentityClaims};
use crate::error::{OidcError, OidcResult, ProviderKind};

/// Spotify hosts.
const ACCOUNTS_BASE: &str = "https://accounts.spotify.com";
const API_BASE: &str = "https://api.spotify.com";

/// Spotify endpoint paths.
const AUTHORIZATION_PATH: &str = "/authorize";
const TOKEN_PATH: &str = "/api/token";
const USERINFO_PATH: &str = "/v1/me";

/// Spotify token response.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct SpotifyTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    token_type: String,
}

/// Spotify profile response (`GET /v1/me`).
#[derive(Debug, Deserialize)]
struct SpotifyUserInfo {
    id: String,
    display_name: Option<String>,
    email: Option<String>,
}

/// Spotify `OAuth2` provider.
#[derive(Clone)]
pub struct SpotifyProvider {
    client_id: String,
    client_secret: String,
    accounts_base: String,
    api_base: String,
    http_client: Client,
}

impl SpotifyProvider {
    #[must_use]
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
            accounts_base: ACCOUNTS_BASE.to_string(),
            api_base: API_BASE.to_string(),
            http_client: Client::new(),
        }
    }

    /// Point both Spotify hosts at a single base URL (test environments).
    #[must_use]
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.accounts_base = base.to_string();
        self.api_base = base.to_string();
        self
    }
}

#[async_trait]
impl IdentityProvider for SpotifyProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Spotify
    }

    fn authorization_url(
        &self,
        state: &str,
        pkce_challenge: &str,
        redirect_uri: &str,
        _nonce: Option<&str>,
    ) -> String {
        let scopes = self.default_scopes().join(" ");

        format!(
            "{}{AUTHORIZATION_PATH}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&code_challenge={}&code_challenge_method=S256",
            self.accounts_base,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scopes),
            urlencoding::encode(state),
            urlencoding::encode(pkce_challenge),
        )
    }

    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
        redirect_uri: &str,
    ) -> OidcResult<TokenResponse> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("code_verifier", pkce_verifier),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .http_client
            .post(format!("{}{TOKEN_PATH}", self.accounts_base))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OidcError::TokenExchangeFailed {
                provider: ProviderKind::Spotify,
                status: status.as_u16(),
            });
        }

        let token_response: SpotifyTokenResponse = response.json().await?;

        Ok(TokenResponse {
            access_token: token_response.access_token,
            refresh_token: token_response.refresh_token,
            expires_in: token_response.expires_in,
            id_token: None, // Spotify is not OIDC
        })
    }

    async fn fetch_identity(
        &self,
        tokens: &TokenResponse,
        _expected_nonce: Option<&str>,
    ) -> OidcResult<IdentityClaims> {
        let response = self
            .http_client
            .get(format!("{}{USERINFO_PATH}", self.api_base))
            .bearer_auth(&tokens.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OidcError::UserInfoFailed {
                provider: ProviderKind::Spotify,
            });
        }

        let user_info: SpotifyUserInfo = response.json().await?;

        let (first_name, last_name) = user_info
            .display_name
            .as_deref()
            .map(split_display_name)
            .unwrap_or((None, None));

        Ok(IdentityClaims {
            auth_id: user_info.id,
            email: user_info.email,
            first_name,
            last_name,
            user_name: None, // Spotify has no username claim
        })
    }

    fn default_scopes(&self) -> Vec<String> {
        vec![
            "user-read-email".to_string(),
            "user-read-private".to_string(),
        ]
    }
}
