//! Negative-path tests: unknown tenants, forged state, provider errors,
//! double-encoded exchanges.

mod support;

use reqwest::StatusCode;

use portcullis_oidc::{session_cookie_name, StateService};
use portcullis_oidc_testing::{FlowClient, MockIdentityProvider, MockProviderConfig};

use support::spawn_app;

#[tokio::test]
async fn unknown_tenant_login_is_not_found() {
    let mock = MockIdentityProvider::start(MockProviderConfig::github()).await;
    let app = spawn_app(vec![mock.tenant_config()]).await;
    let mut client = FlowClient::new();

    let response = client
        .follow(&app.security_url("/login-myspace"))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn structurally_invalid_state_is_rejected() {
    let mock = MockIdentityProvider::start(MockProviderConfig::github()).await;
    let app = spawn_app(vec![mock.tenant_config()]).await;
    let mut client = FlowClient::new();

    let response = client
        .get(&format!(
            "{}?code=anything&state=not.a.valid-token",
            app.security_url("/oidc-success")
        ))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(client.cookie(&session_cookie_name("github")).is_none());
}

#[tokio::test]
async fn state_signed_by_another_party_is_rejected() {
    let mock = MockIdentityProvider::start(MockProviderConfig::github()).await;
    let app = spawn_app(vec![mock.tenant_config()]).await;
    let mut client = FlowClient::new();

    // Structurally valid JWT, wrong signing secret: a forged state must be
    // treated as a CSRF attempt, not exchanged.
    let forged = StateService::new("attacker-controlled-secret")
        .create_state("github", "some-verifier", None)
        .unwrap();

    let response = client
        .get(&format!(
            "{}?code={}&state={forged}",
            app.security_url("/oidc-success"),
            urlencoding::encode(mock.issued_code()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(client.cookie(&session_cookie_name("github")).is_none());
}

#[tokio::test]
async fn provider_error_aborts_the_flow() {
    let mock = MockIdentityProvider::start(MockProviderConfig::google()).await;
    let app = spawn_app(vec![mock.tenant_config()]).await;
    let mut client = FlowClient::new();

    let response = client
        .get(&format!(
            "{}?error=access_denied&state=whatever",
            app.security_url("/oidc-success")
        ))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(client.cookie(&session_cookie_name("google")).is_none());
}

#[tokio::test]
async fn double_encoded_apple_exchange_fails() {
    let mock = MockIdentityProvider::start(MockProviderConfig::apple()).await;
    let app = spawn_app(vec![mock.tenant_config()]).await;
    let mut client = FlowClient::new();

    let response = client
        .follow(&app.security_url("/login-apple"))
        .await
        .unwrap();
    let payload = response.json().unwrap();
    let code = payload["code"].as_str().unwrap().to_string();
    let state = payload["state"].as_str().unwrap().to_string();

    // Pre-encoding the code before the form encoder runs simulates the
    // double-encoding defect: the provider decodes once, sees the wrong
    // bytes, and refuses the grant.
    let pre_encoded = urlencoding::encode(&code).into_owned();
    let callback = client
        .post_form(
            &app.security_url("/oidc-success"),
            &[("state", state.as_str()), ("code", pre_encoded.as_str())],
        )
        .await
        .unwrap();

    assert_eq!(callback.status, StatusCode::BAD_GATEWAY);
    assert!(client.cookie(&session_cookie_name("apple")).is_none());

    // The literal body succeeds with the very same state
    let callback = client
        .post_form(
            &app.security_url("/oidc-success"),
            &[("state", state.as_str()), ("code", code.as_str())],
        )
        .await
        .unwrap();
    assert_eq!(callback.status, StatusCode::FOUND);
}

#[tokio::test]
async fn protected_page_requires_a_session() {
    let mock = MockIdentityProvider::start(MockProviderConfig::github()).await;
    let app = spawn_app(vec![mock.tenant_config()]).await;
    let mut client = FlowClient::new();

    let response = client
        .get(&app.url("/SecureController/hello"))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_a_session_is_unauthorized() {
    let mock = MockIdentityProvider::start(MockProviderConfig::github()).await;
    let app = spawn_app(vec![mock.tenant_config()]).await;
    let mut client = FlowClient::new();

    let response = client.get(&app.security_url("/logout")).await.unwrap();
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
