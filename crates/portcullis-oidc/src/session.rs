//! Tenant-scoped cookie sessions.
//!
//! A session is a signed HS256 JWT carrying the canonical identity claims,
//! stored in a cookie named `q_session_<tenant>`. Exactly one cookie exists
//! per tenant per browser context; sessions of different tenants are
//! independent, and logout clears only the cookie of the tenant that
//! authenticated the request.

use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::claims::IdentityClaims;
use crate::error::{OidcError, OidcResult};

/// Session cookie name prefix; the tenant name is appended.
pub const SESSION_COOKIE_PREFIX: &str = "q_session_";

/// Cookie name for a tenant's session.
#[must_use]
pub fn session_cookie_name(tenant: &str) -> String {
    format!("{SESSION_COOKIE_PREFIX}{tenant}")
}

/// Claims stored in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub tenant: String,
    pub auth_id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    /// The canonical identity record this session was established from.
    #[must_use]
    pub fn identity(&self) -> IdentityClaims {
        IdentityClaims {
            auth_id: self.auth_id.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            user_name: self.user_name.clone(),
        }
    }
}

/// Service issuing and validating session tokens and their cookies.
#[derive(Clone)]
pub struct SessionService {
    session_secret: Vec<u8>,
    lifetime_secs: i64,
}

impl SessionService {
    #[must_use]
    pub fn new(session_secret: &str, lifetime_secs: i64) -> Self {
        Self {
            session_secret: session_secret.as_bytes().to_vec(),
            lifetime_secs,
        }
    }

    /// Issue a session token for a tenant from freshly mapped claims.
    pub fn issue(&self, tenant: &str, identity: &IdentityClaims) -> OidcResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = SessionClaims {
            tenant: tenant.to_string(),
            auth_id: identity.auth_id.clone(),
            email: identity.email.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            user_name: identity.user_name.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.session_secret),
        )?;

        Ok(token)
    }

    /// Validate a session token. Expired or resigned tokens are rejected.
    pub fn validate(&self, token: &str) -> OidcResult<SessionClaims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.required_spec_claims.clear();

        let token_data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(&self.session_secret),
            &validation,
        )
        .map_err(|_| OidcError::SessionRequired)?;

        Ok(token_data.claims)
    }

    /// Build the Set-Cookie value establishing a tenant session.
    #[must_use]
    pub fn session_cookie(&self, tenant: &str, token: &str) -> String {
        format!(
            "{}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            session_cookie_name(tenant),
            self.lifetime_secs
        )
    }
}

/// Build the Set-Cookie value clearing a tenant session.
///
/// The value is set to the empty string, which cooperating clients surface
/// as a cleared-but-present cookie.
#[must_use]
pub fn clear_session_cookie(tenant: &str) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        session_cookie_name(tenant)
    )
}

/// Extract all `q_session_*` cookies from a request as (tenant, token) pairs.
#[must_use]
pub fn extract_session_cookies(headers: &HeaderMap) -> Vec<(String, String)> {
    let Some(cookie_header) = headers.get(header::COOKIE) else {
        return Vec::new();
    };
    let Ok(cookie_str) = cookie_header.to_str() else {
        return Vec::new();
    };

    let mut sessions = Vec::new();
    // Cookie header format: "name1=value1; name2=value2"
    for part in cookie_str.split(';') {
        let part = part.trim();
        if let Some((name, value)) = part.split_once('=') {
            if let Some(tenant) = name.strip_prefix(SESSION_COOKIE_PREFIX) {
                if !tenant.is_empty() && !value.is_empty() {
                    sessions.push((tenant.to_string(), value.trim().to_string()));
                }
            }
        }
    }
    sessions
}
