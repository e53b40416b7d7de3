//! Authorization initiator: `GET /_renarde/security/login-<tenant>`.

use axum::response::Response;
use tracing::info;

use super::found;
use crate::error::{OidcError, OidcResult};
use crate::providers::ProviderFactory;
use crate::router::SecurityState;
use crate::state::StateService;

/// Initiate the login flow for a tenant.
///
/// Redirects to the provider's authorization endpoint with a signed state,
/// a PKCE challenge, and (for OIDC providers) a nonce.
pub async fn login(state: SecurityState, tenant: String) -> OidcResult<Response> {
    let config = state
        .tenants
        .get(&tenant)
        .ok_or_else(|| OidcError::UnknownTenant {
            tenant: tenant.clone(),
        })?;

    info!(tenant = %tenant, provider = %config.kind, "Initiating OIDC login");

    let pkce = StateService::generate_pkce();
    let oidc_nonce = StateService::generate_oidc_nonce(config.kind);

    let state_token =
        state
            .state_service
            .create_state(&config.name, &pkce.verifier, oidc_nonce.clone())?;

    let redirect_uri = state.callback_url();

    let provider = ProviderFactory::for_tenant(config)?;
    let auth_url = provider.authorization_url(
        &state_token,
        &pkce.challenge,
        &redirect_uri,
        oidc_nonce.as_deref(),
    );

    Ok(found(&auth_url))
}
