/**
 * Chatline Server Entry Point
 *
 * Loads `.env`, initializes tracing, reads the configuration and serves
 * the Axum application until Ctrl-C.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use chatline::backend::server::create_app;
    use chatline::shared::AppConfig;
    use tracing_subscriber::EnvFilter;

    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chatline=debug,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = AppConfig::from_env()?;
    if config.uses_default_secret() {
        tracing::warn!("[STARTUP] JWT_SECRET not set, using the development default");
    }
    if config.is_memory_database() {
        tracing::warn!("[STARTUP] Using an in-memory database, data is lost on exit");
    }

    let addr = config.bind_addr;
    let app = create_app(config).await?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("[STARTUP] Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

#[cfg(feature = "ssr")]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin chatline-server --features ssr");
    std::process::exit(1);
}
