use clap::Parser;
use passkey_serve::{DevServer, ServeConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServeConfig::parse();
    let server = DevServer::start(&config).await?;
    tracing::info!(url = %server.url(), root = %config.root.display(), "Serving passkey demo");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    server.stop().await;

    Ok(())
}
