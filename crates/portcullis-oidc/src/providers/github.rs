//! GitHub `OAuth2` provider implementation.

use super::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use super::{IdentityProvider, TokenResponse};
use crate::claims::{split_display_name, IdentityClaims};
use crate::error::{OidcError, OidcResult, ProviderKind};

/// GitHub `OAuth2` hosts.
const WEB_BASE: &str = "https://github.com";
const API_BASE: &str = "https://api.github.com";

/// GitHub `OAuth2` endpoint paths.
const AUTHORIZATION_PATH: &str = "/login/oauth/authorize";
const TOKEN_PATH: &str = "/login/oauth/access_token";
const USERINFO_PATH: &str = "/user";
const USER_EMAILS_PATH: &str = "/user/emails";

/// GitHub token response.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct GithubTokenResponse {
    access_token: String,
    token_type: String,
    scope: Option<String>,
}

/// GitHub userinfo response.
#[derive(Debug, Deserialize)]
struct GithubUserInfo {
    /// Numeric account id; kept as a string in the canonical claims.
    id: i64,
    login: String,
    name: Option<String>,
    email: Option<String>,
}

/// GitHub email response (for resolving the primary email).
#[derive(Debug, Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

/// GitHub `OAuth2` provider.
#[derive(Clone)]
pub struct GithubProvider {
    client_id: String,
    client_secret: String,
    web_base: String,
    api_base: String,
    http_client: Client,
}

impl GithubProvider {
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

    /// Point both GitHub hosts at a single base URL (test environments).
    #[must_use]
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.web_base = base.to_string();
        self.api_base = base.to_string();
        self
    }

    /// Resolve the primary verified email from the emails endpoint.
    async fn fetch_primary_email(&self, access_token: &str) -> OidcResult<Option<String>> {
        let response = self
            .http_client
            .get(format!("{}{USER_EMAILS_PATH}", self.api_base))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "portcullis")
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(status = %status, "GitHub emails endpoint failed");
            return Ok(None);
        }

        let emails: Vec<GithubEmail> = response.json().await?;

        for email in &emails {
            if email.primary && email.verified {
                return Ok(Some(email.email.clone()));
            }
        }
        for email in emails {
            if email.primary {
                return Ok(Some(email.email));
            }
        }

        Ok(None)
    }
}

#[async_trait]
impl IdentityProvider for GithubProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Github
    }

    fn authorization_url(
        &self,
        state: &str,
        _pkce_challenge: &str,
        redirect_uri: &str,
        _nonce: Option<&str>,
    ) -> String {
        let scopes = self.default_scopes().join(" ");

        // Note: GitHub doesn't support PKCE, so we ignore the challenge
        format!(
            "{}{AUTHORIZATION_PATH}?client_id={}&redirect_uri={}&scope={}&state={}",
            self.web_base,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scopes),
            urlencoding::encode(state),
        )
    }

    async fn exchange_code(
        &self,
        code: &str,
        _pkce_verifier: &str,
        redirect_uri: &str,
    ) -> OidcResult<TokenResponse> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .http_client
            .post(format!("{}{TOKEN_PATH}", self.web_base))
            .header("Accept", "application/json")
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OidcError::TokenExchangeFailed {
                provider: ProviderKind::Github,
                status: status.as_u16(),
            });
        }

        let token_response: GithubTokenResponse = response.json().await?;

        Ok(TokenResponse {
            access_token: token_response.access_token,
            refresh_token: None, // GitHub doesn't return refresh tokens
            expires_in: None,    // GitHub tokens don't expire (unless revoked)
            id_token: None,      // GitHub is not OIDC
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
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "portcullis")
            .bearer_auth(&tokens.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OidcError::UserInfoFailed {
                provider: ProviderKind::Github,
            });
        }

        let user_info: GithubUserInfo = response.json().await?;

        // The profile email may be hidden; the emails endpoint is
        // authoritative when it is.
        let email = match user_info.email {
            Some(email) => Some(email),
            None => self.fetch_primary_email(&tokens.access_token).await?,
        };

        let (first_name, last_name) = user_info
            .name
            .as_deref()
            .map(split_display_name)
            .unwrap_or((None, None));

        Ok(IdentityClaims {
            auth_id: user_info.id.to_string(),
            email,
            first_name,
            last_name,
            user_name: Some(user_info.login),
        })
    }

    fn default_scopes(&self) -> Vec<String> {
        vec!["read:user".to_string(), "user:email".to_string()]
    }
}
