//! Server startup and graceful shutdown

use anyhow::Result;
use axum::Router;
use quillbox_core::Config;

/// Start the server with graceful shutdown
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port());
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let upload = config.upload();
    tracing::info!(
        upload_root = %upload.upload_root.display(),
        media_url = %upload.media_url,
        upload_url_prefix = ?upload.upload_url_prefix,
        thumbnail_width = upload.thumbnail_size.0,
        thumbnail_height = upload.thumbnail_size.1,
        icon_rules = upload.icon_rules.len(),
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM; in-flight uploads finish before the server exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!(signal = "ctrl_c", "Shutdown requested"),
        _ = terminate => tracing::info!(signal = "terminate", "Shutdown requested"),
    }
}
