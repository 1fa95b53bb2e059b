//! Registry server binary

use registry_core::{Conference, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting conference registry server");

    // Load configuration
    let config = Config::from_env()?;

    // Spawn registry
    let conference = Conference::spawn(config)?;
    tracing::info!(owner = %conference.owner(), price = %conference.price(), "Registry ready");

    tokio::signal::ctrl_c().await?;

    // Dump the notification log before shutdown so observers can reconcile
    let events = conference.events().await?;
    tracing::info!(
        event_count = events.len(),
        "Final event log: {}",
        serde_json::to_string_pretty(&events)?
    );

    conference.shutdown().await?;
    tracing::info!("Registry server stopped");
    Ok(())
}
