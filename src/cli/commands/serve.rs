//! Serve command implementation

use crate::cli::error::CliError;
use crate::config::ServerConfig;
use std::path::Path;
use tracing::info;

/// Build the server configuration from an optional file and flag overrides
pub fn load_server_config(
    config_path: Option<&Path>,
    listen: Option<&str>,
) -> Result<ServerConfig, CliError> {
    let mut config = match config_path {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(listen) = listen {
        config.listen_addr = listen.to_string();
    }
    Ok(config)
}

/// Handle the serve command
///
/// Blocks on a multi-threaded runtime until the server stops.
pub fn handle_serve(config_path: Option<&Path>, listen: Option<&str>) -> Result<(), CliError> {
    let config = load_server_config(config_path, listen)?;
    info!(
        listen = %config.listen_addr,
        max_upload_bytes = config.max_upload_bytes,
        "Starting geodatabase schema server"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Server(format!("Failed to start runtime: {}", e)))?;
    runtime
        .block_on(crate::server::serve(config))
        .map_err(|e| CliError::Server(e.to_string()))
}
