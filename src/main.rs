//! Application entry point resolving the runtime configuration and
//! starting the Actix-Web server.
use dotenvy::dotenv;
use validator::Validate;

use pushkind_server::models::config::ServerConfig;
use pushkind_server::{logging, server};

#[actix_web::main]
async fn main() {
    // Load environment variables from `.env` in local development.
    dotenv().ok();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error resolving server configuration: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = logging::init(&config) {
        eprintln!("Error initializing logging: {err}");
        std::process::exit(1);
    }

    if let Err(err) = config.validate() {
        log::error!("Invalid server configuration: {err}");
        std::process::exit(1);
    }

    match server::run(config).await {
        Ok(_) => log::info!("Server stopped"),
        Err(err) => {
            log::error!("Error running server: {err}");
            std::process::exit(1);
        }
    }
}
