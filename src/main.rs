//! Folio client - loads every catalog collection once and reports on it

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_client::{
    config::{AppConfig, LoggingConfig},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    init_tracing(&config.logging);

    tracing::info!("Starting folio-client v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Catalog API at {}", config.api.base_url);

    let state = AppState::new(config)?;

    let mut failed = 0;
    for (kind, outcome) in state.stores.search_all().await {
        match outcome.into_result() {
            Ok(Some(count)) => println!("{}: {} records", kind, count),
            Ok(None) => println!("{}: superseded", kind),
            Err(e) => {
                failed += 1;
                tracing::error!("Loading {} failed: {}", kind, e);
                println!("{}: failed ({})", kind, e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} collection(s) failed to load", failed);
    }
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("folio_client={}", logging.level).into());

    let json = logging.format.eq_ignore_ascii_case("json");

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}
