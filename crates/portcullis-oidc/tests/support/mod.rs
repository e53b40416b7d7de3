//! Shared harness for the login-flow integration tests.

use axum::routing::get;
use axum::Router;

use portcullis_oidc::{
    security_router, SecurityConfig, SecurityState, SessionPrincipal, TenantConfig, WelcomeView,
    SECURITY_MOUNT,
};

pub const STATE_SECRET: &str = "integration-test-state-secret";
pub const SESSION_SECRET: &str = "integration-test-session-secret";

/// A running application under test.
pub struct TestApp {
    /// Externally advertised base URL (https, mirroring TLS-forcing
    /// providers; the walker downgrades it).
    pub public_url: String,
    /// Plaintext base URL the server actually listens on.
    pub base_http: String,
}

impl TestApp {
    pub fn security_url(&self, path: &str) -> String {
        format!("{}{SECURITY_MOUNT}{path}", self.base_http)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_http)
    }
}

/// Spawn the app under test with the given tenants on an ephemeral port.
pub async fn spawn_app(tenants: Vec<TenantConfig>) -> TestApp {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    let public_url = format!("https://{addr}");
    let mut config = SecurityConfig::new(&public_url, STATE_SECRET, SESSION_SECRET);
    for tenant in tenants {
        config = config.with_tenant(tenant);
    }

    let state = SecurityState::new(config);
    let router = app_router(&state).with_state(state);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        public_url,
        base_http: format!("http://{addr}"),
    }
}

fn app_router(state: &SecurityState) -> Router<SecurityState> {
    Router::new()
        .route("/", get(index))
        .route("/oidc-welcome", get(welcome))
        .route("/SecureController/hello", get(secure_hello))
        .nest(SECURITY_MOUNT, security_router(state))
}

async fn index() -> &'static str {
    "Home"
}

async fn welcome(principal: SessionPrincipal) -> String {
    let view = WelcomeView {
        tenant: principal.tenant,
        claims: principal.claims,
    };
    format!("Message: {}\n{}", view.message(), view.greeting())
}

async fn secure_hello(_principal: SessionPrincipal) -> &'static str {
    "Hello"
}

/// Expected welcome body, composed independently of the library's renderer.
/// Absent claims print the literal `null` in the message line and the empty
/// string in the greeting line.
pub fn expected_welcome_body(
    tenant: &str,
    auth_id: &str,
    email: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
    user_name: Option<&str>,
) -> String {
    fn or_null(value: Option<&str>) -> &str {
        value.unwrap_or("null")
    }
    format!(
        "Message: Welcome from OIDC for tenant {tenant}, authId: {auth_id}, firstname: {}, lastname: {}, username: {}, email: {}\nOIDC Welcome {}",
        or_null(first_name),
        or_null(last_name),
        or_null(user_name),
        or_null(email),
        user_name.unwrap_or(""),
    )
}
