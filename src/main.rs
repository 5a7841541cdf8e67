use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use yatube::web::WebServer;
use yatube::{Config, Database};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let mut config = match Config::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {CONFIG_PATH}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    // Initialize logging
    if let Err(e) = yatube::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        yatube::logging::init_console_only(&config.logging.level);
    }

    info!("Yatube - a small blogging service");

    if let Err(e) = config.validate() {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    let db = match Database::open(&config.database.path).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to open database {}: {}", config.database.path, e);
            return ExitCode::FAILURE;
        }
    };

    let server = match WebServer::new(&config, db.clone()) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to set up web server: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Server configured on {}", server.addr());

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        db.close().await;
        return ExitCode::FAILURE;
    }

    db.close().await;
    ExitCode::SUCCESS
}
