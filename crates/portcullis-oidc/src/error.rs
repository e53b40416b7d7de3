//! Relying-party error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Identity provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Github,
    Twitter,
    Google,
    Spotify,
    Microsoft,
    Facebook,
    Apple,
}

impl ProviderKind {
    /// All supported provider kinds.
    pub const ALL: [ProviderKind; 7] = [
        ProviderKind::Github,
        ProviderKind::Twitter,
        ProviderKind::Google,
        ProviderKind::Spotify,
        ProviderKind::Microsoft,
        ProviderKind::Facebook,
        ProviderKind::Apple,
    ];

    /// Whether this provider issues OIDC ID tokens.
    #[must_use]
    pub fn is_oidc(self) -> bool {
        matches!(
            self,
            ProviderKind::Google | ProviderKind::Microsoft | ProviderKind::Apple
        )
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Github => write!(f, "github"),
            ProviderKind::Twitter => write!(f, "twitter"),
            ProviderKind::Google => write!(f, "google"),
            ProviderKind::Spotify => write!(f, "spotify"),
            ProviderKind::Microsoft => write!(f, "microsoft"),
            ProviderKind::Facebook => write!(f, "facebook"),
            ProviderKind::Apple => write!(f, "apple"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = OidcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "github" => Ok(ProviderKind::Github),
            "twitter" => Ok(ProviderKind::Twitter),
            "google" => Ok(ProviderKind::Google),
            "spotify" => Ok(ProviderKind::Spotify),
            "microsoft" => Ok(ProviderKind::Microsoft),
            "facebook" => Ok(ProviderKind::Facebook),
            "apple" => Ok(ProviderKind::Apple),
            _ => Err(OidcError::InvalidProvider {
                provider: s.to_string(),
            }),
        }
    }
}

/// Relying-party errors.
#[derive(Debug, Error)]
pub enum OidcError {
    #[error("Unknown tenant: {tenant}")]
    UnknownTenant { tenant: String },

    #[error("Invalid provider: {provider}")]
    InvalidProvider { provider: String },

    #[error("Invalid callback: {reason}")]
    InvalidCallback { reason: String },

    #[error("Invalid state parameter: {reason}")]
    InvalidState { reason: String },

    #[error("Provider returned error: {error}")]
    ProviderError { error: String },

    #[error("Token exchange failed with provider {provider}: HTTP {status}")]
    TokenExchangeFailed { provider: ProviderKind, status: u16 },

    #[error("Failed to fetch user info from {provider}")]
    UserInfoFailed { provider: ProviderKind },

    #[error("ID token verification failed for {provider}: {reason}")]
    IdTokenVerificationFailed {
        provider: ProviderKind,
        reason: String,
    },

    #[error("No authenticated session")]
    SessionRequired,

    #[error("Provider configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error response structure for HTTP responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl OidcError {
    /// Get the error code for HTTP responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            OidcError::UnknownTenant { .. } => "unknown_tenant",
            OidcError::InvalidProvider { .. } => "invalid_provider",
            OidcError::InvalidCallback { .. } => "invalid_callback",
            OidcError::InvalidState { .. } => "invalid_state",
            OidcError::ProviderError { .. } => "provider_error",
            OidcError::TokenExchangeFailed { .. } => "token_exchange_failed",
            OidcError::UserInfoFailed { .. } => "user_info_failed",
            OidcError::IdTokenVerificationFailed { .. } => "id_token_verification_failed",
            OidcError::SessionRequired => "session_required",
            OidcError::ConfigurationError { .. } => "configuration_error",
            OidcError::HttpError(_) => "http_error",
            OidcError::JsonError(_) => "json_error",
            OidcError::JwtError(_) => "jwt_error",
            OidcError::InternalError { .. } => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            OidcError::UnknownTenant { .. } => StatusCode::NOT_FOUND,
            OidcError::InvalidProvider { .. } => StatusCode::BAD_REQUEST,
            OidcError::InvalidCallback { .. } => StatusCode::BAD_REQUEST,
            OidcError::InvalidState { .. } => StatusCode::BAD_REQUEST,
            OidcError::ProviderError { .. } => StatusCode::BAD_REQUEST,
            OidcError::TokenExchangeFailed { .. } => StatusCode::BAD_GATEWAY,
            OidcError::UserInfoFailed { .. } => StatusCode::BAD_GATEWAY,
            OidcError::IdTokenVerificationFailed { .. } => StatusCode::BAD_REQUEST,
            OidcError::SessionRequired => StatusCode::UNAUTHORIZED,
            OidcError::ConfigurationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            OidcError::HttpError(_) => StatusCode::BAD_GATEWAY,
            OidcError::JsonError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OidcError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OidcError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for OidcError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Sanitize errors that may contain IdP-controlled or library-internal detail.
        let message = match &self {
            OidcError::HttpError(e) => {
                tracing::error!("OIDC HTTP client error: {:?}", e);
                "An HTTP client error occurred".to_string()
            }
            OidcError::JsonError(e) => {
                tracing::error!("OIDC JSON error: {:?}", e);
                "A data processing error occurred".to_string()
            }
            OidcError::JwtError(e) => {
                tracing::error!("OIDC JWT error: {:?}", e);
                "A token processing error occurred".to_string()
            }
            OidcError::InternalError { message } => {
                tracing::error!("OIDC internal error: {}", message);
                "An internal error occurred".to_string()
            }
            OidcError::ConfigurationError { message } => {
                tracing::error!("OIDC configuration error: {}", message);
                "A provider configuration error occurred".to_string()
            }
            OidcError::InvalidState { reason } => {
                tracing::warn!("Invalid OIDC state: {}", reason);
                "Invalid or expired state parameter".to_string()
            }
            OidcError::InvalidCallback { .. } => "Invalid OIDC callback".to_string(),
            OidcError::IdTokenVerificationFailed { provider, reason } => {
                tracing::warn!(provider = %provider, reason = %reason, "ID token rejected");
                format!("ID token verification failed for {provider}")
            }
            OidcError::TokenExchangeFailed { provider, status } => {
                tracing::warn!(provider = %provider, status = %status, "Token exchange failed");
                format!("Token exchange failed with {provider}")
            }
            OidcError::UserInfoFailed { provider } => {
                format!("Failed to fetch user info from {provider}")
            }
            _ => self.to_string(),
        };
        let body = ErrorResponse {
            error: self.error_code().to_string(),
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Result type alias for relying-party operations.
pub type OidcResult<T> = Result<T, OidcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_round_trips_through_display() {
        for kind in ProviderKind::ALL {
            let parsed: ProviderKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let result = "myspace".parse::<ProviderKind>();
        assert!(matches!(result, Err(OidcError::InvalidProvider { .. })));
    }

    #[test]
    fn status_codes_follow_the_wire_contract() {
        assert_eq!(
            OidcError::UnknownTenant {
                tenant: "nope".into()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            OidcError::InvalidState {
                reason: "tampered".into()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            OidcError::SessionRequired.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn oidc_kinds_issue_id_tokens() {
        assert!(ProviderKind::Apple.is_oidc());
        assert!(ProviderKind::Google.is_oidc());
        assert!(ProviderKind::Microsoft.is_oidc());
        assert!(!ProviderKind::Github.is_oidc());
        assert!(!ProviderKind::Twitter.is_oidc());
    }
}
