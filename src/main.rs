//! File Picker Server Entry Point
//!
//! Initializes logging, loads configuration, opens the files directory and
//! starts the HTTP server.

use anyhow::{Context, Result};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use file_picker::core::{Config, FilePickerServer, transport::HttpTransport};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    // A missing or invalid files directory is fatal at startup
    let server = FilePickerServer::new(config.clone()).with_context(|| {
        format!(
            "cannot serve files directory '{}'",
            config.files.directory.display()
        )
    })?;

    info!(
        "Serving files from: {}",
        server.files().root().path().display()
    );

    HttpTransport::new(config.http)
        .run(server)
        .await
        .context("HTTP server failed")?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// `RUST_LOG` directives are honoured on top of the configured level.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
