//! Search Gateway Main Entry Point
//!
//! Serves index, document and autocomplete operations over HTTP, backed by
//! OpenSearch.

use dotenv::dotenv;
use search_gateway::{server, Dependencies, GatewayConfig, GatewayError};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("search_gateway=info,search_gateway_repository=info")
    });

    let json_output = env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    if json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "search-gateway",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "search-gateway",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), GatewayError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting Search Gateway");

    let config = GatewayConfig::from_env();
    let addr = config.listen_addr()?;

    let deps = match Dependencies::new(&config) {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let app = server::create_app(deps.state);

    match server::run_server(app, addr).await {
        Ok(()) => {
            info!("Search gateway stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Search gateway failed");
            Err(GatewayError::server(e.to_string()))
        }
    }
}
