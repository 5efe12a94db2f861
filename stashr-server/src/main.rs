use clap::Parser;
use stashr_server::{run, shutdown_signal, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stashr=info,stashr_server=info,stashr_core=info,tonic=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    run(config, shutdown_signal()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
