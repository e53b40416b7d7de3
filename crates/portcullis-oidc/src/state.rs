//! Signed state parameter and PKCE.
//!
//! The state parameter is a short-lived HS256 JWT carrying the tenant, the
//! PKCE verifier and the OIDC nonce. The callback needs no server-side
//! lookup: a valid signature proves the flow originated here (CSRF
//! protection), and a mismatched or expired state is rejected outright.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{OidcError, OidcResult, ProviderKind};

/// State lifetime in minutes.
const STATE_LIFETIME_MINUTES: i64 = 10;

/// PKCE code verifier length in bytes (before base64 encoding).
const PKCE_VERIFIER_LENGTH: usize = 32;

/// OIDC nonce length in bytes (before base64 encoding).
const OIDC_NONCE_LENGTH: usize = 16;

/// State claims stored in a signed JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateClaims {
    /// Random nonce for uniqueness.
    pub nonce: String,
    /// Tenant the flow was initiated for.
    pub tenant: String,
    /// PKCE code verifier.
    pub pkce_verifier: String,
    /// OIDC nonce echoed back in the provider's ID token.
    pub oidc_nonce: Option<String>,
    /// Expiration timestamp.
    pub exp: i64,
    /// Issued at timestamp.
    pub iat: i64,
}

/// PKCE challenge and verifier pair.
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    /// Code verifier (secret, stored in state).
    pub verifier: String,
    /// Code challenge (SHA256 hash, sent to provider).
    pub challenge: String,
}

/// Service creating and validating signed state parameters.
#[derive(Clone)]
pub struct StateService {
    state_secret: Vec<u8>,
}

impl StateService {
    #[must_use]
    pub fn new(state_secret: &str) -> Self {
        Self {
            state_secret: state_secret.as_bytes().to_vec(),
        }
    }

    /// Generate a new PKCE challenge pair (S256).
    #[must_use]
    pub fn generate_pkce() -> PkceChallenge {
        let mut verifier_bytes = [0u8; PKCE_VERIFIER_LENGTH];
        rand::rngs::OsRng.fill_bytes(&mut verifier_bytes);
        let verifier = URL_SAFE_NO_PAD.encode(verifier_bytes);

        let mut hasher = Sha256::new();
        hasher.update(verifier.as_bytes());
        let challenge = URL_SAFE_NO_PAD.encode(hasher.finalize());

        PkceChallenge {
            verifier,
            challenge,
        }
    }

    /// Verify a PKCE verifier against a challenge.
    #[must_use]
    pub fn verify_pkce(verifier: &str, challenge: &str) -> bool {
        let mut hasher = Sha256::new();
        hasher.update(verifier.as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize()) == challenge
    }

    /// Generate an OIDC nonce for providers that echo it in the ID token.
    #[must_use]
    pub fn generate_oidc_nonce(kind: ProviderKind) -> Option<String> {
        if !kind.is_oidc() {
            return None;
        }
        let mut bytes = [0u8; OIDC_NONCE_LENGTH];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Some(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Create a signed state parameter for a login flow.
    pub fn create_state(
        &self,
        tenant: &str,
        pkce_verifier: &str,
        oidc_nonce: Option<String>,
    ) -> OidcResult<String> {
        let now = Utc::now();
        let exp = now + Duration::minutes(STATE_LIFETIME_MINUTES);

        let claims = StateClaims {
            nonce: Uuid::new_v4().to_string(),
            tenant: tenant.to_string(),
            pkce_verifier: pkce_verifier.to_string(),
            oidc_nonce,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.state_secret),
        )?;

        Ok(token)
    }

    /// Validate and decode a state parameter.
    ///
    /// A bad signature, structural damage or expiry all map to
    /// [`OidcError::InvalidState`].
    pub fn validate_state(&self, state: &str) -> OidcResult<StateClaims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.required_spec_claims.clear();

        let token_data = decode::<StateClaims>(
            state,
            &DecodingKey::from_secret(&self.state_secret),
            &validation,
        )
        .map_err(|e| OidcError::InvalidState {
            reason: e.to_string(),
        })?;

        Ok(token_data.claims)
    }
}
