//! Command-line argument definitions for dockerlink.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Command-line interface for dockerlink.
#[derive(Debug, Parser)]
#[command(name = "dockerlink")]
#[command(
    author,
    version,
    about = "Configure and verify cached container engine connections"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Name of the client supplier.
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// Container engine address (unix://, tcp://, http:// or a socket path).
    #[arg(long, global = true)]
    pub docker_host: Option<String>,

    /// Directory holding the TLS client certificates.
    #[arg(long, global = true)]
    pub cert_path: Option<Utf8PathBuf>,

    /// Verify the engine with TLS (true or false).
    #[arg(long, global = true)]
    pub tls_verify: Option<bool>,

    /// Engine config directory to import (config.json or env file).
    #[arg(long, global = true)]
    pub config_dir: Option<Utf8PathBuf>,
}

/// Available subcommands.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Commands {
    /// Print the resolved engine client configuration without connecting.
    Show,

    /// Build a client and verify the engine responds.
    Ping,
}
