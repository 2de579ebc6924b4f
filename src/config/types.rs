//! Configuration data types for dockerlink.

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::engine::SupplierBuilder;
use crate::error::Result;

/// Supplier name used when none is configured.
pub const DEFAULT_SUPPLIER_NAME: &str = "local";

/// Root application configuration.
///
/// This structure is loaded from configuration files, environment variables,
/// and command-line arguments with layered precedence. The precedence order
/// (lowest to highest) is: defaults, configuration file, environment variables,
/// command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `DOCKERLINK_CONFIG_PATH` environment variable
/// 2. `.dockerlink.toml` in the current working directory
/// 3. `.dockerlink.toml` in the home directory
/// 4. `~/.config/dockerlink/config.toml` (XDG default)
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "DOCKERLINK",
    discovery(
        app_name = "dockerlink",
        env_var = "DOCKERLINK_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".dockerlink.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// Name of the client supplier.
    pub name: Option<String>,

    /// The daemon address, e.g. `tcp://10.0.0.5:2376`.
    pub docker_host: Option<String>,

    /// Directory holding `key.pem`, `cert.pem` and `ca.pem`.
    pub cert_path: Option<Utf8PathBuf>,

    /// Whether to verify the daemon with TLS.
    pub tls_verify: Option<bool>,

    /// Engine config directory to import before explicit settings.
    pub config_dir: Option<Utf8PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: Some(DEFAULT_SUPPLIER_NAME.to_owned()),
            docker_host: None,
            cert_path: None,
            tls_verify: None,
            config_dir: None,
        }
    }
}

impl AppConfig {
    /// Creates a builder carrying this configuration.
    ///
    /// The config directory is imported first so explicit `docker_host`,
    /// `cert_path` and `tls_verify` settings override it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if `config_dir` holds no engine config,
    /// or a `BuilderError` for an empty name or host.
    pub fn to_builder(&self) -> Result<SupplierBuilder> {
        let mut builder = SupplierBuilder::new();
        if let Some(ref name) = self.name {
            builder.with_name(name.as_str())?;
        }
        if let Some(ref dir) = self.config_dir {
            builder.with_docker_config_dir(dir)?;
        }
        if let Some(ref host) = self.docker_host {
            builder.with_docker_host(host.as_str())?;
        }
        if let Some(ref path) = self.cert_path {
            builder.with_cert_path(path)?;
        }
        if let Some(verify) = self.tls_verify {
            builder.with_tls_verify(verify)?;
        }
        Ok(builder)
    }
}
