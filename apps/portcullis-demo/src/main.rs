//! Portcullis demo application.
//!
//! Mounts the OIDC security module next to a welcome view and a protected
//! controller, the minimal surface a relying application needs.

mod config;
mod logging;

use axum::routing::get;
use axum::Router;
use tokio::signal;
use tracing::info;

use config::Config;
use portcullis_oidc::{
    security_router, SecurityState, SessionPrincipal, WelcomeView, SECURITY_MOUNT,
};

#[tokio::main]
async fn main() {
    // Load configuration (fail-fast on missing required values)
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.rust_log);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.host,
        port = config.port,
        tenants = config.security.tenants.len(),
        "Starting portcullis demo"
    );

    let state = SecurityState::new(config.security);
    let app = Router::new()
        .route("/", get(index))
        .route("/oidc-welcome", get(welcome))
        .route("/SecureController/hello", get(secure_hello))
        .nest(SECURITY_MOUNT, security_router(&state))
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    info!(addr = %addr, "Listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Error: server failed: {e}");
        std::process::exit(1);
    }
}

async fn index() -> &'static str {
    "Home"
}

/// Post-login welcome view rendering the mapped claims.
async fn welcome(principal: SessionPrincipal) -> String {
    let view = WelcomeView {
        tenant: principal.tenant,
        claims: principal.claims,
    };
    format!("Message: {}\n{}", view.message(), view.greeting())
}

/// A protected resource; any tenant's valid session grants access.
async fn secure_hello(principal: SessionPrincipal) -> String {
    format!("Hello {}", principal.claims.auth_id)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
