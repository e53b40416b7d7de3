//! Logout handler: `GET /_renarde/security/logout`.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use tracing::info;

use super::see_other_with_cookie;
use crate::error::{OidcError, OidcResult};
use crate::router::SecurityState;
use crate::session::{clear_session_cookie, extract_session_cookies};

/// Terminate the authenticated session.
///
/// Clears the session cookie of the tenant that authenticated the request
/// (other tenants' sessions are untouched) and redirects to the application
/// root with `303 See Other`. Requires an authenticated session.
pub async fn logout(
    State(state): State<SecurityState>,
    headers: HeaderMap,
) -> OidcResult<Response> {
    for (tenant, token) in extract_session_cookies(&headers) {
        let Ok(session) = state.sessions.validate(&token) else {
            continue;
        };
        if session.tenant != tenant {
            continue;
        }

        info!(tenant = %tenant, auth_id = %session.auth_id, "Logging out");

        return Ok(see_other_with_cookie(
            &state.root_url(),
            &clear_session_cookie(&tenant),
        ));
    }

    Err(OidcError::SessionRequired)
}
