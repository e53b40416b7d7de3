//! Facebook `OAuth2` provider implementation.
//!
//! Facebook's Graph API reports split first/last names but no username.

use super::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{IdentityProvider, TokenResponse};
use crate::claims::IdentityClaims;
use crate::error::{OidcError, OidcResult, ProviderKind};

/// Facebook hosts.
const WEB_BASE: &str = "https://www.facebook.com";
const GRAPH_BASE: &str = "https://graph.facebook.com";

/// Facebook endpoint paths.
const AUTHORIZATION_PATH: &str = "/v19.0/dialog/oauth";
const TOKEN_PATH: &str = "/v19.0/oauth/access_token";
const USERINFO_PATH: &str = "/me";

/// Profile fields requested from the Graph API.
const PROFILE_FIELDS: &str = "id,first_name,last_name,email";

/// Facebook token response.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct FacebookTokenResponse {
    access_token: String,
    expires_in: Option<i64>,
    token_type: String,
}

/// Facebook profile response.
#[derive(Debug, Deserialize)]
struct FacebookUserInfo {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

/// Facebook `OAuth2` provider.
#[derive(Clone)]
pub struct FacebookProvider {
    client_id: String,
    client_secret: String,
    web_base: String,
    graph_base: String,
    http_client: Client,
}

impl FacebookProvider {
    #[must_use]
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
            web_base: WEB_BASE.to_string(),
            graph_base: GRAPH_BASE.to_string(),
            http_client: Client::new(),
        }
    }

    /// Point both Facebook hosts at a single base URL (test environments).
    #[must_use]
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.web_base = base.to_string();
        self.graph_base = base.to_string();
        self
    }
}

#[async_trait]
impl IdentityProvider for FacebookProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Facebook
    }

    fn authorization_url(
        &self,
        state: &str,
        _pkce_challenge: &str,
        redirect_uri: &str,
        _nonce: Option<&str>,
    ) -> String {
        let scopes = self.default_scopes().join(",");

        // Note: Facebook's web dialog doesn't support PKCE
        format!(
            "{}{AUTHORIZATION_PATH}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
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
            .post(format!("{}{TOKEN_PATH}", self.graph_base))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OidcError::TokenExchangeFailed {
                provider: ProviderKind::Facebook,
                status: status.as_u16(),
            });
        }

        let token_response: FacebookTokenResponse = response.json().await?;

        Ok(TokenResponse {
            access_token: token_response.access_token,
            refresh_token: None, // Facebook uses long-lived token exchange instead
            expires_in: token_response.expires_in,
            id_token: None, // Facebook is not OIDC
        })
    }

    async fn fetch_identity(
        &self,
        tokens: &TokenResponse,
        _expected_nonce: Option<&str>,
    ) -> OidcResult<IdentityClaims> {
        let response = self
            .http_client
            .get(format!("{}{USERINFO_PATH}", self.graph_base))
            .query(&[("fields", PROFILE_FIELDS)])
            .bearer_auth(&tokens.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OidcError::UserInfoFailed {
                provider: ProviderKind::Facebook,
            });
        }

        let user_info: FacebookUserInfo = response.json().await?;

        Ok(IdentityClaims {
            auth_id: user_info.id,
            email: user_info.email,
            first_name: user_info.first_name,
            last_name: user_info.last_name,
            user_name: None, // Facebook has no username claim
        })
    }

    fn default_scopes(&self) -> Vec<String> {
        vec!["email".to_string(), "public_profile".to_string()]
    }
}
