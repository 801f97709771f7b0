use form_relay::{config, router, service::RelayService};
use tracing_subscriber::EnvFilter;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load config
    let cfg = config::load_config().expect("failed to locate or load configuration");
    tracing::info!("Successfully loaded form relay config");

    // Setup mail clients
    let service = RelayService::from_config(&cfg).expect("failed to set up SMTP clients");
    let service_ptr = Arc::new(service);

    // Connectivity is only reported, never required
    let verifier = service_ptr.clone();
    tokio::spawn(async move { verifier.verify_connections().await });

    // Setup router
    let router = router(service_ptr);

    // Start server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", cfg.port))
        .await
        .expect("Failed to bind to address");

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Form relay starting, listening on {}", addr),
        Err(e) => tracing::warn!("Could not determine listening address: {e}"),
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping");
}
