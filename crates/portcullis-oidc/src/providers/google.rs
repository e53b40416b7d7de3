//! Google OAuth2/OIDC provider implementation.

use super::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{IdentityProvider, TokenResponse};
use crate::claims::IdentityClaims;
use crate::error::{OidcError, OidcResult, ProviderKind};

/// Google hosts.
const AUTH_BASE: &str = "https://accounts.google.com";
const TOKEN_BASE: &str = "https://oauth2.googleapis.com";
const USERINFO_BASE: &str = "https://openidconnect.googleapis.com";

/// Google endpoint paths.
const AUTHORIZATION_PATH: &str = "/o/oauth2/v2/auth";
const TOKEN_PATH: &str = "/token";
const USERINFO_PATH: &str = "/v1/userinfo";

/// Google token response.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct GoogleTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    id_token: Option<String>,
    token_type: String,
}

/// Google userinfo response. Google issues no username claim.
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
}

/// Google `OAuth2` provider.
#[derive(Clone)]
pub struct GoogleProvider {
    client_id: String,
    client_secret: String,
    auth_base: String,
    token_base: String,
    userinfo_base: String,
    http_client: Client,
}

impl GoogleProvider {
    #[must_use]
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
            auth_base: AUTH_BASE.to_string(),
            token_base: TOKEN_BASE.to_string(),
            userinfo_base: USERINFO_BASE.to_string(),
            http_client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Point all Google hosts at a single base URL (test environments).
    #[must_use]
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.auth_base = base.to_string();
        self.token_base = base.to_string();
        self.userinfo_base = base.to_string();
        self
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
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
            "{}{AUTHORIZATION_PATH}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&code_challenge={}&code_challenge_method=S256",
            self.auth_base,
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
            .post(format!("{}{TOKEN_PATH}", self.token_base))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OidcError::TokenExchangeFailed {
                provider: ProviderKind::Google,
                status: status.as_u16(),
            });
        }

        let token_response: GoogleTokenResponse = response.json().await?;

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
            .get(format!("{}{USERINFO_PATH}", self.userinfo_base))
            .bearer_auth(&tokens.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OidcError::UserInfoFailed {
                provider: ProviderKind::Google,
            });
        }

        let user_info: GoogleUserInfo = response.json().await?;

        Ok(IdentityClaims {
            auth_id: user_info.sub,
            email: user_info.email,
            first_name: user_info.given_name,
            last_name: user_info.family_name,
            user_name: None, // Google has no username claim
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

#[cfg(test)]
mod tests {
    use super::*;

    fn test_provider() -> GoogleProvider {
        GoogleProvider::new("client-id".to_string(), "client-secret".to_string())
    }

    #[test]
    fn authorization_url_includes_nonce_when_present() {
        let url = test_provider().authorization_url(
            "state-token",
            "pkce-challenge",
            "https://example.com/callback",
            Some("nonce-value"),
        );

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth"));
        assert!(url.contains("code_challenge=pkce-challenge"));
        assert!(url.contains("nonce=nonce-value"));
    }

    #[test]
    fn authorization_url_omits_absent_nonce() {
        let url = test_provider().authorization_url("s", "c", "http://cb", None);
        assert!(!url.contains("nonce="));
    }

    #[test]
    fn userinfo_without_username() {
        let info: GoogleUserInfo = serde_json::from_str(
            r#"{"sub": "USERID", "email": "google@example.com", "given_name": "Foo", "family_name": "Bar"}"#,
        )
        .unwrap();
        assert_eq!(info.sub, "USERID");
        assert_eq!(info.given_name.as_deref(), Some("Foo"));
    }

    #[test]
    fn provider_kind() {
        assert_eq!(test_provider().kind(), ProviderKind::Google);
    }
}
