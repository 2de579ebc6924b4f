//! Configuration system for dockerlink.
//!
//! This module provides the configuration structures and CLI definitions for
//! the dockerlink binary. Precedence: CLI flags override environment
//! variables, which override configuration files, which override defaults.
//!
//! The configuration file is expected at `~/.config/dockerlink/config.toml`
//! by default.
//!
//! # Example Configuration
//!
//! ```toml
//! name = "build-farm"
//! docker_host = "tcp://10.0.0.5:2376"
//! cert_path = "/etc/dockerlink/certs"
//! tls_verify = true
//! ```

mod cli;
mod loader;
mod types;


pub use cli::{Cli, Commands};
pub use loader::{env_var_names, load_config};
pub use types::{AppConfig, DEFAULT_SUPPLIER_NAME};
