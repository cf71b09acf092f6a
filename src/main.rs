use pixrelay::logger::{self, LoggerConfig};
use pixrelay::models::aspect;
use pixrelay::Config;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::from_env())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}", e);
            return Err(e.into());
        }
    };

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &config);
    logger::log_config_info(&config);

    log::info!("📐 Supported aspect ratios:");
    for (ratio, description) in aspect::supported_ratios() {
        log::info!("  {} - {}", ratio, description);
    }

    pixrelay::server::run(config).await?;
    Ok(())
}
