use hodl_tracker::{bootstrap, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Initialize logging and tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,hodl_tracker=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("🚀 Starting escrow contract tracker");

    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    let (session, scheduler) = bootstrap::initialize(&config).await?;
    scheduler.start();

    tokio::signal::ctrl_c().await?;
    scheduler.stop();

    let state = session.snapshot().await;
    info!(
        "👋 Shutting down with {} tracked contract(s)",
        state.contracts.len()
    );

    Ok(())
}
