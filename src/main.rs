use csv_import::{server, utils::DEFAULT_CONFIG_PATH, AppConfig, AppState};
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = env::var("CSV_IMPORT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = AppConfig::load_or_default(&config_path)?;

    init_tracing(&config)?;
    if !std::path::Path::new(&config_path).exists() {
        tracing::warn!(config = %config_path, "Config file not found, using defaults");
    }
    tracing::info!(config = %config_path, "Loaded configuration: {:?}", config.server.name);

    let args: Vec<String> = env::args().collect();

    let port = args
        .get(1)
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    let bind_addr = args
        .get(2)
        .map(|s| s.as_str())
        .unwrap_or(config.server.bind_addr.as_str());

    let app_state = AppState::from_config(&config)?;
    for target in app_state.registry.targets() {
        tracing::info!(model = %target.name, fields = ?target.fields, "Registered target");
    }

    server::serve(app_state, bind_addr, port).await?;

    tracing::info!("CSV import server shutting down");
    Ok(())
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("csv_import={}", config.logging.level)))?;

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
