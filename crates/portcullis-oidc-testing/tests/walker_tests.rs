//! Behavioral tests for the redirect walker against a live server.

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use portcullis_oidc_testing::{FlowClient, FlowError};

/// Serve a tiny app on an ephemeral port and return its base URL.
async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn redirect(status: StatusCode, location: &str) -> impl IntoResponse {
    (status, [(header::LOCATION, location.to_string())])
}

#[tokio::test]
async fn follow_resolves_a_redirect_chain() {
    let router = Router::new()
        .route("/start", get(|| async { redirect(StatusCode::FOUND, "/middle") }))
        .route(
            "/middle",
            get(|| async { redirect(StatusCode::SEE_OTHER, "/end") }),
        )
        .route("/end", get(|| async { "done" }));
    let base = spawn(router).await;

    let mut client = FlowClient::new();
    let response = client.follow(&format!("{base}/start")).await.unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "done");
}

#[tokio::test]
async fn follow_on_terminal_response_returns_immediately() {
    let router = Router::new().route("/end", get(|| async { "done" }));
    let base = spawn(router).await;

    let mut client = FlowClient::new();
    // Two walks of the same terminal URL behave identically: one request
    // each, no hops consumed.
    for _ in 0..2 {
        let response = client.follow(&format!("{base}/end")).await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "done");
    }
}

#[tokio::test]
async fn redirect_loop_is_bounded() {
    let router =
        Router::new().route("/loop", get(|| async { redirect(StatusCode::FOUND, "/loop") }));
    let base = spawn(router).await;

    let mut client = FlowClient::new().with_max_hops(5);
    let result = client.follow(&format!("{base}/loop")).await;

    assert!(matches!(
        result,
        Err(FlowError::TooManyRedirects { max_hops: 5 })
    ));
}

#[tokio::test]
async fn redirect_without_location_is_an_error() {
    let router = Router::new().route("/bare", get(|| async { StatusCode::FOUND }));
    let base = spawn(router).await;

    let mut client = FlowClient::new();
    let result = client.follow(&format!("{base}/bare")).await;

    assert!(matches!(result, Err(FlowError::MissingLocation)));
}

#[tokio::test]
async fn https_locations_are_downgraded_before_following() {
    // The app advertises an https Location on its own (plaintext) port; the
    // walker must downgrade it rather than attempt TLS.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().unwrap();
    let secure_location = format!("https://{addr}/end");

    let router = Router::new()
        .route(
            "/start",
            get(move || {
                let location = secure_location.clone();
                async move { redirect(StatusCode::FOUND, &location) }
            }),
        )
        .route("/end", get(|| async { "plaintext" }));
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let mut client = FlowClient::new();
    let response = client.follow(&format!("http://{addr}/start")).await.unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "plaintext");
}

#[tokio::test]
async fn cookies_persist_across_hops() {
    let router = Router::new()
        .route(
            "/set",
            get(|| async {
                (
                    StatusCode::FOUND,
                    [
                        (header::LOCATION, "/read".to_string()),
                        (header::SET_COOKIE, "flavor=oatmeal; Path=/".to_string()),
                    ],
                )
            }),
        )
        .route(
            "/read",
            get(|headers: axum::http::HeaderMap| async move {
                headers
                    .get(header::COOKIE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string()
            }),
        );
    let base = spawn(router).await;

    let mut client = FlowClient::new();
    let response = client.follow(&format!("{base}/set")).await.unwrap();

    assert!(response.body.contains("flavor=oatmeal"));
    assert_eq!(client.cookie("flavor"), Some("oatmeal"));
}
