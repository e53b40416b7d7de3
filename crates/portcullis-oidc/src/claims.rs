//! Canonical identity claims and the welcome view model.
//!
//! Providers assert wildly different claim sets: GitHub has an explicit
//! username but a numeric subject, Twitter has no email, Microsoft may omit
//! the UPN, Apple omits names entirely. Everything is normalized into
//! [`IdentityClaims`] at the provider boundary; absence is `None`, never an
//! error.

use serde::{Deserialize, Serialize};

/// Canonical identity record produced by the claims mapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Provider-unique subject identifier. Kept as a string even when the
    /// provider reports a numeric value.
    pub auth_id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
}

/// View model for the post-login welcome page.
#[derive(Debug, Clone)]
pub struct WelcomeView {
    pub tenant: String,
    pub claims: IdentityClaims,
}

impl WelcomeView {
    /// The debug welcome line. Absent claims render as the literal text
    /// `null` (compatibility contract with existing consumers).
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Welcome from OIDC for tenant {}, authId: {}, firstname: {}, lastname: {}, username: {}, email: {}",
            self.tenant,
            self.claims.auth_id,
            or_null(&self.claims.first_name),
            or_null(&self.claims.last_name),
            or_null(&self.claims.user_name),
            or_null(&self.claims.email),
        )
    }

    /// The secondary greeting line; username renders as the empty string
    /// when absent.
    #[must_use]
    pub fn greeting(&self) -> String {
        format!(
            "OIDC Welcome {}",
            self.claims.user_name.as_deref().unwrap_or("")
        )
    }
}

fn or_null(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("null")
}

/// Split a single display name into (first, last) on the first whitespace.
///
/// Used by providers that only report a combined name (GitHub, Twitter,
/// Spotify).
#[must_use]
pub(crate) fn split_display_name(name: &str) -> (Option<String>, Option<String>) {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return (None, None);
    }
    match trimmed.split_once(char::is_whitespace) {
        Some((first, last)) => (Some(first.to_string()), Some(last.trim().to_string())),
        None => (Some(trimmed.to_string()), None),
    }
}
