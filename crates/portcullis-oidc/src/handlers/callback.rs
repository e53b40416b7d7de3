//! Callback handler: `GET|POST /_renarde/security/oidc-success`.
//!
//! Most providers redirect back with `code`/`state` in the query string;
//! Apple replays them as an `application/x-www-form-urlencoded` POST
//! (`form_post` response mode). Both paths funnel into the same exchange.

use axum::extract::{Query, State};
use axum::response::Response;
use axum::Form;
use serde::Deserialize;
use tracing::{info, warn};

use super::found_with_cookie;
use crate::error::{OidcError, OidcResult};
use crate::providers::ProviderFactory;
use crate::router::SecurityState;

/// Callback parameters delivered in the query string.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: String,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Callback parameters delivered as a form body (Apple).
#[derive(Debug, Deserialize)]
pub struct CallbackForm {
    pub code: Option<String>,
    pub state: String,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Handle a provider callback delivered via query parameters.
pub async fn callback_query(
    State(state): State<SecurityState>,
    Query(query): Query<CallbackQuery>,
) -> OidcResult<Response> {
    if let Some(error) = &query.error {
        warn!(
            error = %error,
            description = ?query.error_description,
            "Provider returned error on callback"
        );
        return Err(OidcError::ProviderError {
            error: error.clone(),
        });
    }

    let code = query.code.ok_or_else(|| OidcError::InvalidCallback {
        reason: "Missing authorization code".to_string(),
    })?;

    process_callback(state, &code, &query.state).await
}

/// Handle a provider callback delivered as a form POST. The body is decoded
/// exactly once; a double-encoded `code`/`state` fails the exchange
/// downstream instead of being silently repaired.
pub async fn callback_form(
    State(state): State<SecurityState>,
    Form(form): Form<CallbackForm>,
) -> OidcResult<Response> {
    if let Some(error) = &form.error {
        warn!(error = %error, "Provider returned error on form callback");
        return Err(OidcError::ProviderError {
            error: error.clone(),
        });
    }

    let code = form.code.ok_or_else(|| OidcError::InvalidCallback {
        reason: "Missing authorization code".to_string(),
    })?;

    process_callback(state, &code, &form.state).await
}

/// Validate state, exchange the code, map claims, establish the session.
async fn process_callback(
    state: SecurityState,
    code: &str,
    state_token: &str,
) -> OidcResult<Response> {
    // A bad signature or expired state is a CSRF rejection, not a warning.
    let claims = state.state_service.validate_state(state_token)?;

    let tenant = state
        .tenants
        .get(&claims.tenant)
        .ok_or_else(|| OidcError::UnknownTenant {
            tenant: claims.tenant.clone(),
        })?;

    info!(tenant = %tenant.name, provider = %tenant.kind, "Processing OIDC callback");

    let provider = ProviderFactory::for_tenant(tenant)?;
    let redirect_uri = state.callback_url();

    let tokens = provider
        .exchange_code(code, &claims.pkce_verifier, &redirect_uri)
        .await?;

    let identity = provider
        .fetch_identity(&tokens, claims.oidc_nonce.as_deref())
        .await?;

    info!(
        tenant = %tenant.name,
        auth_id = %identity.auth_id,
        "Mapped provider claims, establishing session"
    );

    let session_token = state.sessions.issue(&tenant.name, &identity)?;
    let cookie = state.sessions.session_cookie(&tenant.name, &session_token);

    Ok(found_with_cookie(&state.welcome_url(), &cookie))
}
