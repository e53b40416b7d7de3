//! Twitter (X) `OAuth2` provider implementation.
//!
//! Twitter's v2 API requires PKCE and never exposes an email address; the
//! canonical claims carry `email: None` by construction.

use super::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{IdentityProvider, TokenResponse};
use crate::claims::{split_display_name, IdentityClaims};
use crate::error::{OidcError, OidcResult, ProviderKind};

/// Twitter hosts.
const WEB_BASE: &str = "https://twitter.com";
const API_BASE: &str = "https://api.twitter.com";

/// Twitter endpoint paths.
const AUTHORIZATION_PATH: &str = "/i/oauth2/authorize";
const TOKEN_PATH: &str = "/2/oauth2/token";
const USERINFO_PATH: &str = "/2/users/me";

/// Twitter token response.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct TwitterTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    token_type: String,
}

/// Twitter userinfo envelope (`GET /2/users/me`).
#[derive(Debug, Deserialize)]
struct TwitterUserResponse {
    data: TwitterUser,
}

#[derive(Debug, Deserialize)]
struct TwitterUser {
    id: String,
    name: String,
    username: String,
}

/// Twitter `OAuth2` provider.
#[derive(Clone)]
pub struct TwitterProvider {
    client_id: String,
    client_secret: String,
    web_base: String,
    api_base: String,
    http_client: Client,
}

impl TwitterProvider {
    #[must_use]
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
            web_base: WEB_BASE.to_string(),
            api_base: API_BASE.to_string(),
            http_client: Client::new(),
        }
    }

    /// Point both Twitter hosts at a single base URL (test environments).
    #[must_use]
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.web_base = base.to_string();
        self.api_base = base.to_string();
        self
    }
}

#[async_trait]
impl IdentityProvider for TwitterProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Twitter
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
            self.web_base,
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
            .post(format!("{}{TOKEN_PATH}", self.api_base))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OidcError::TokenExchangeFailed {
                provider: ProviderKind::Twitter,
                status: status.as_u16(),
            });
        }

        let token_response: TwitterTokenResponse = response.json().await?;

        Ok(TokenResponse {
            access_token: token_response.access_token,
            refresh_token: token_response.refresh_token,
            expires_in: token_response.expires_in,
            id_token: None, // Twitter is not OIDC
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
                provider: ProviderKind::Twitter,
            });
        }

        let user: TwitterUserResponse = response.json().await?;
        let (first_name, last_name) = split_display_name(&user.data.name);

        Ok(IdentityClaims {
            auth_id: user.data.id,
            email: None, // Twitter does not expose email addresses
            first_name,
            last_name,
            user_name: Some(user.data.username),
        })
    }

    fn default_scopes(&self) -> Vec<String> {
        vec!["users.read".to_string(), "tweet.read".to_string()]
    }
}
