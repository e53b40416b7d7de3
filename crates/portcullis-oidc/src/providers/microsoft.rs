//! Microsoft (Azure AD) OAuth2/OIDC provider implementation.

use super::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{IdentityProvider, TokenResponse};
use crate::claims::IdentityClaims;
use crate::error::{OidcError, OidcResult, ProviderKind};

/// Default Azure tenant (allows all Microsoft accounts).
const DEFAULT_TENANT: &str = "common";

/// Microsoft hosts.
const LOGIN_BASE: &str = "https://login.microsoftonline.com";
const GRAPH_BASE: &str = "https://graph.microsoft.com";

/// Microsoft endpoint paths (relative to the authority).
const AUTHORIZATION_PATH: &str = "/oauth2/v2.0/authorize";
const TOKEN_PATH: &str = "/oauth2/v2.0/token";
const USERINFO_PATH: &str = "/oidc/userinfo";

/// Microsoft token response.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct MicrosoftTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    id_token: Option<String>,
    token_type: String,
}

/// Microsoft userinfo response.
#[derive(Debug, Deserialize)]
struct MicrosoftUserInfo {
    sub: String,
    email: Option<String>,
    upn: Option<String>,
    preferred_username: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
}

/// Microsoft (Azure AD) `OAuth2` provider.
#[derive(Clone)]
pub struct MicrosoftProvider {
    client_id: String,
    client_secret: String,
    login_base: String,
    tenant: String,
    graph_base: String,
    http_client: Client,
}

impl MicrosoftProvider {
    /// Create a new Microsoft provider.
    ///
    /// # Arguments
    ///
    /// * `client_id` - Azure AD application client ID
    /// * `client_secret` - Azure AD application client secret
    /// * `tenant` - Azure tenant ID or "common"/"organizations"/"consumers"
    #[must_use]
    pub fn new(client_id: String, client_secret: String, tenant: Option<String>) -> Self {
        Self {
            client_id,
            client_secret,
            login_base: LOGIN_BASE.to_string(),
            tenant: tenant.unwrap_or_else(|| DEFAULT_TENANT.to_string()),
            graph_base: GRAPH_BASE.to_string(),
            http_client: Client::new(),
        }
    }

    /// Point both Microsoft hosts at a single base URL (test environments).
    #[must_use]
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.login_base = base.to_string();
        self.graph_base = base.to_string();
        self
    }

    fn authorization_endpoint(&self) -> String {
        format!("{}/{}{AUTHORIZATION_PATH}", self.login_base, self.tenant)
    }

    fn token_endpoint(&self) -> String {
        format!("{}/{}{TOKEN_PATH}", self.login_base, self.tenant)
    }

    fn userinfo_endpoint(&self) -> String {
        format!("{}{USERINFO_PATH}", self.graph_base)
    }
}

#[async_trait]
impl IdentityProvider for MicrosoftProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Microsoft
    }

    fn authorization_url(
        &self,
        state: &str,
        pkce_challenge: &str,
        redirect_uri: &str,
        nonce: Option<&str>,
    ) -> String {
        let scopes = self.default_scopes().join(" ");

        let mut url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&code_challenge={}&code_challenge_method=S256&response_mode=query",
            self.authorization_endpoint(),
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scopes),
            urlencoding::encode(state),
            urlencoding::encode(pkce_challenge),
        );

        if let Some(nonce) = nonce {
            url.push_str(&format!("&nonce={}", urlencoding::encode(nonce)));
        }

        url
    }

    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
        redirect_uri: &str,
    ) -> OidcResult<TokenResponse> {
        let scopes = self.default_scopes().join(" ");

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("code_verifier", pkce_verifier),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri),
            ("scope", &scopes),
        ];

        let response = self
            .http_client
            .post(self.token_endpoint())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OidcError::TokenExchangeFailed {
                provider: ProviderKind::Microsoft,
                status: status.as_u16(),
            });
        }

        let token_response: MicrosoftTokenResponse = response.json().await?;

        Ok(TokenResponse {
            access_token: token_response.access_token,
            refresh_token: token_response.refresh_token,
            expires_in: token_response.expires_in,
            id_token: token_response.id_token,
        })
    }

    async fn fetch_identity(
        &self,
        tokens: &TokenResponse,
        _expected_nonce: Option<&str>,
    ) -> OidcResult<IdentityClaims> {
        let response = self
            .http_client
            .get(self.userinfo_endpoint())
            .bearer_auth(&tokens.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OidcError::UserInfoFailed {
                provider: ProviderKind::Microsoft,
            });
        }

        let user_info: MicrosoftUserInfo = response.json().await?;

        // Microsoft often omits the UPN; the preferred username degrades to
        // the email address in that case.
        let user_name = user_info
            .upn
            .or(user_info.preferred_username)
            .or_else(|| user_info.email.clone());

        Ok(IdentityClaims {
            auth_id: user_info.sub,
            email: user_info.email,
            first_name: user_info.given_name,
            last_name: user_info.family_name,
            user_name,
        })
    }

    fn default_scopes(&self) -> Vec<String> {
        vec![
            "openid".to_string(),
            "email".to_string(),
            "profile".to_string(),
        ]
    }
}
