use genrelay::{
    logger::{self, LoggerConfig},
    server::{self, AppContext},
    Config, GeminiImageClient,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::from_env())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &config);

    let upstream = GeminiImageClient::new(config.gemini.clone()).map_err(|e| {
        log::error!("❌ Failed to initialize Gemini client: {}", e);
        e
    })?;
    let context = AppContext::new(Arc::new(upstream));

    server::run(config.server, context).await?;

    log::info!("👋 Server stopped");
    Ok(())
}
