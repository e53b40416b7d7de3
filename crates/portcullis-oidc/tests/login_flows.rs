//! Full login/logout round trips for every tenant, driven through a live
//! app against in-process mock providers.

mod support;

use reqwest::StatusCode;

use portcullis_oidc::session_cookie_name;
use portcullis_oidc_testing::{FlowClient, MockIdentityProvider, MockProviderConfig};

use support::{expected_welcome_body, spawn_app, TestApp};

/// Drive a full login: initiation, provider hop, callback, welcome view,
/// protected page, logout. Mirrors one tenant's end-to-end contract.
async fn oidc_round_trip(
    config: MockProviderConfig,
    auth_id: &str,
    email: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
    user_name: Option<&str>,
) {
    let tenant = config.tenant.clone();
    let mock = MockIdentityProvider::start(config).await;
    let app = spawn_app(vec![mock.tenant_config()]).await;
    let mut client = FlowClient::new();

    let response = client
        .follow(&app.security_url(&format!("/login-{tenant}")))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::OK);
    let expected = expected_welcome_body(&tenant, auth_id, email, first_name, last_name, user_name);
    assert!(
        response.body.contains(&expected),
        "welcome body mismatch for {tenant}:\n  expected fragment: {expected:?}\n  body: {:?}",
        response.body
    );

    let cookie_name = session_cookie_name(&tenant);
    assert!(
        client.cookie(&cookie_name).is_some_and(|v| !v.is_empty()),
        "missing session cookie {cookie_name}"
    );

    verify_logged_in_and_logout(&mut client, &app, &cookie_name).await;
}

async fn verify_logged_in_and_logout(client: &mut FlowClient, app: &TestApp, cookie_name: &str) {
    // Can reach the protected page
    let hello = client.get(&app.url("/SecureController/hello")).await.unwrap();
    assert_eq!(hello.status, StatusCode::OK);

    // Logout: 303 home, cookie cleared
    let logout = client.get(&app.security_url("/logout")).await.unwrap();
    assert_eq!(logout.status, StatusCode::SEE_OTHER);
    assert_eq!(
        logout.location(),
        Some(format!("{}/", app.public_url).as_str())
    );
    assert_eq!(client.cookie(cookie_name), Some(""));

    // The session no longer authorizes the protected page
    let hello = client.get(&app.url("/SecureController/hello")).await.unwrap();
    assert_eq!(hello.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn github_login() {
    // this ID is numeric, and we want to keep it that way to test that it works
    oidc_round_trip(
        MockProviderConfig::github(),
        "1234",
        Some("github@example.com"),
        Some("Foo"),
        Some("Bar"),
        Some("GithubUser"),
    )
    .await;
}

#[tokio::test]
async fn twitter_login() {
    // twitter has no email
    oidc_round_trip(
        MockProviderConfig::twitter(),
        "USERID",
        None,
        Some("Foo"),
        Some("Bar"),
        Some("TwitterUser"),
    )
    .await;
}

#[tokio::test]
async fn google_login() {
    // google has no username
    oidc_round_trip(
        MockProviderConfig::google(),
        "USERID",
        Some("google@example.com"),
        Some("Foo"),
        Some("Bar"),
        None,
    )
    .await;
}

#[tokio::test]
async fn spotify_login() {
    // spotify has no username
    oidc_round_trip(
        MockProviderConfig::spotify(),
        "USERID",
        Some("spotify@example.com"),
        Some("Foo"),
        Some("Bar"),
        None,
    )
    .await;
}

#[tokio::test]
async fn microsoft_login() {
    // MS does not set the UPN, defaults to the email as preferred username
    oidc_round_trip(
        MockProviderConfig::microsoft(),
        "USERID",
        Some("microsoft@example.com"),
        Some("Foo"),
        Some("Bar"),
        Some("microsoft@example.com"),
    )
    .await;
}

#[tokio::test]
async fn facebook_login() {
    // no user name from facebook
    oidc_round_trip(
        MockProviderConfig::facebook(),
        "USERID",
        Some("facebook@example.com"),
        Some("Foo"),
        Some("Bar"),
        None,
    )
    .await;
}

#[tokio::test]
async fn apple_login() {
    let mock = MockIdentityProvider::start(MockProviderConfig::apple()).await;
    let app = spawn_app(vec![mock.tenant_config()]).await;
    let mut client = FlowClient::new();

    // Apple's form_post mode: the mock surfaces code and state as JSON for
    // the client to replay as a form POST.
    let response = client
        .follow(&app.security_url("/login-apple"))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);

    let payload = response.json().unwrap();
    let code = payload["code"].as_str().unwrap().to_string();
    let state = payload["state"].as_str().unwrap().to_string();

    // The body must be form-encoded exactly once, no re-encoding
    let callback = client
        .post_form(
            &app.security_url("/oidc-success"),
            &[("state", state.as_str()), ("code", code.as_str())],
        )
        .await
        .unwrap();
    assert_eq!(callback.status, StatusCode::FOUND);
    let location = callback.location().unwrap().to_string();

    // now move on to the GET, but make sure we go over http
    let welcome = client.follow(&location).await.unwrap();
    assert_eq!(welcome.status, StatusCode::OK);
    // no name, username from apple
    let expected = expected_welcome_body(
        "apple",
        "USERID",
        Some("apple@example.com"),
        None,
        None,
        None,
    );
    assert!(
        welcome.body.contains(&expected),
        "welcome body mismatch for apple:\n  expected fragment: {expected:?}\n  body: {:?}",
        welcome.body
    );

    let cookie_name = session_cookie_name("apple");
    assert!(client.cookie(&cookie_name).is_some_and(|v| !v.is_empty()));

    verify_logged_in_and_logout(&mut client, &app, &cookie_name).await;
}

#[tokio::test]
async fn sessions_of_different_tenants_are_independent() {
    let github = MockIdentityProvider::start(MockProviderConfig::github()).await;
    let google = MockIdentityProvider::start(MockProviderConfig::google()).await;
    let app = spawn_app(vec![github.tenant_config(), google.tenant_config()]).await;
    let mut client = FlowClient::new();

    client
        .follow(&app.security_url("/login-github"))
        .await
        .unwrap();
    client
        .follow(&app.security_url("/login-google"))
        .await
        .unwrap();

    let github_cookie = session_cookie_name("github");
    let google_cookie = session_cookie_name("google");
    assert!(client.cookie(&github_cookie).is_some_and(|v| !v.is_empty()));
    assert!(client.cookie(&google_cookie).is_some_and(|v| !v.is_empty()));

    // First logout clears exactly one tenant's session
    let logout = client.get(&app.security_url("/logout")).await.unwrap();
    assert_eq!(logout.status, StatusCode::SEE_OTHER);
    assert_eq!(client.cookie(&github_cookie), Some(""));
    assert!(client.cookie(&google_cookie).is_some_and(|v| !v.is_empty()));

    // The surviving session still authorizes protected resources
    let hello = client.get(&app.url("/SecureController/hello")).await.unwrap();
    assert_eq!(hello.status, StatusCode::OK);

    // Second logout clears the other tenant
    let logout = client.get(&app.security_url("/logout")).await.unwrap();
    assert_eq!(logout.status, StatusCode::SEE_OTHER);
    assert_eq!(client.cookie(&google_cookie), Some(""));

    let hello = client.get(&app.url("/SecureController/hello")).await.unwrap();
    assert_eq!(hello.status, StatusCode::UNAUTHORIZED);
}
