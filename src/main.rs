//! `dockerlink` application entry point.
//!
//! Resolves an engine connection from layered configuration and either prints
//! it or verifies the engine responds. Domain errors are converted to
//! `eyre::Report` at this boundary.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/dockerlink/config.toml` or path from `DOCKERLINK_CONFIG_PATH`)
//! 3. Environment variables (`DOCKERLINK_*`)
//! 4. Command-line arguments

use clap::Parser;
use dockerlink::config::{AppConfig, Cli, Commands, load_config};
use dockerlink::engine::{ClientSupplier, health};
use dockerlink::error::Result as DockerlinkResult;
use eyre::{Report, Result as EyreResult};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV_VAR: &str = "DOCKERLINK_LOG";

/// Application entry point.
fn main() -> EyreResult<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli).map_err(Report::from)?;

    run(cli.command, &config).map_err(Report::from)
}

/// Install a stderr subscriber filtered by `DOCKERLINK_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Execute the CLI command, returning domain-specific errors.
fn run(command: Commands, config: &AppConfig) -> DockerlinkResult<()> {
    let supplier = config.to_builder()?.build()?;
    match command {
        Commands::Show => {
            show(&supplier);
            Ok(())
        }
        Commands::Ping => ping(&supplier),
    }
}

/// Print the resolved client configuration.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn show(supplier: &ClientSupplier) {
    let resolved = supplier.client_config();
    println!("name:        {}", supplier.name());
    println!("docker_host: {}", resolved.docker_host());
    match resolved.cert_path() {
        Some(path) => println!("cert_path:   {path}"),
        None => println!("cert_path:   (none)"),
    }
    println!("tls_verify:  {}", resolved.tls_verify());
}

/// Build a client and ping the engine.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn ping(supplier: &ClientSupplier) -> DockerlinkResult<()> {
    let docker = supplier.get()?;
    health::verify(&docker)?;
    println!(
        "{}: engine at {} is responding",
        supplier.name(),
        supplier.client_config().docker_host()
    );
    Ok(())
}
