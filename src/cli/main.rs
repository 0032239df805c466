//! gdb-schema: inspect geodatabase catalogs and serve the upload endpoint

use clap::{Parser, Subcommand};
use gdb_schema_sdk::cli::OutputFormat;
use gdb_schema_sdk::cli::commands::inspect::handle_inspect;
use gdb_schema_sdk::config::DEFAULT_TARGET_SRS;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "gdb-schema")]
#[command(version, about = "Reconstruct the schema of an Esri mobile geodatabase")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract the schema of a geodatabase file and print it
    Inspect {
        /// Path to the .geodatabase / .gdb file
        path: PathBuf,

        /// Target spatial reference system, echoed in the report
        #[arg(long, default_value = DEFAULT_TARGET_SRS)]
        target_srs: String,

        /// Area of interest as minX,minY,maxX,maxY
        #[arg(long)]
        bbox: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Serve the HTTP upload endpoint
    #[cfg(feature = "server")]
    Serve {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to listen on, overrides the configuration file
        #[arg(short, long)]
        listen: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect {
            path,
            target_srs,
            bbox,
            format,
        } => handle_inspect(&path, &target_srs, bbox.as_deref(), format)?,
        #[cfg(feature = "server")]
        Command::Serve { config, listen } => {
            gdb_schema_sdk::cli::commands::serve::handle_serve(config.as_deref(), listen.as_deref())?
        }
    }
    Ok(())
}
