use std::net::SocketAddr;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plateiq_oauth_example::{AppState, Config};

#[derive(Parser, Debug)]
#[command(name = "plateiq-oauth-example")]
#[command(about = "Sign in with Plate IQ using the OAuth2 authorization code flow")]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 5000, env = "PORT")]
    port: u16,

    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1", env = "BIND")]
    bind: String,

    #[command(flatten)]
    config: Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plateiq_oauth_example=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.config.normalized();

    if config.client_id.is_none() {
        tracing::warn!("PLATEIQ_AUTH_CLIENT_ID is not set, logins will fail");
    }

    tracing::info!("Base URL: {}", config.base_url);
    tracing::info!("Plate IQ auth: {}, API: {}", config.auth_url, config.api_url);

    let app = plateiq_oauth_example::router(AppState::new(config));

    // Parse bind address
    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port).parse()?;

    tracing::info!("Starting plateiq-oauth-example on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
