//! Axum extractors for session-guarded routes.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::claims::IdentityClaims;
use crate::error::OidcError;
use crate::router::SecurityState;
use crate::session::extract_session_cookies;

/// The authenticated principal behind any valid tenant session.
///
/// Scans the request's `q_session_*` cookies and accepts the first one that
/// validates. Access is tenant-agnostic: a session of any tenant authorizes
/// protected routes. Rejection is a 401.
#[derive(Debug, Clone)]
pub struct SessionPrincipal {
    pub tenant: String,
    pub claims: IdentityClaims,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionPrincipal
where
    S: Send + Sync,
    SecurityState: FromRef<S>,
{
    type Rejection = OidcError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let security = SecurityState::from_ref(state);

        for (tenant, token) in extract_session_cookies(&parts.headers) {
            let Ok(session) = security.sessions.validate(&token) else {
                continue;
            };
            // Cookie name and signed tenant must agree.
            if session.tenant != tenant {
                continue;
            }
            return Ok(SessionPrincipal {
                tenant,
                claims: session.identity(),
            });
        }

        Err(OidcError::SessionRequired)
    }
}
