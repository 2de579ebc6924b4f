//! Semantic error types for dockerlink.
//!
//! This module defines the error hierarchy for dockerlink, following the principle of
//! using semantic error enums (via `thiserror`) for conditions the caller might
//! inspect or retry, while reserving opaque errors (`eyre::Report`) for the
//! binary boundary.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while assembling a supplier builder.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A required argument was empty.
    #[error("{field} must not be empty")]
    EmptyValue {
        /// The name of the rejected argument.
        field: &'static str,
    },

    /// A path argument could not be resolved to an absolute UTF-8 path.
    #[error("invalid path '{path}': {message}")]
    InvalidPath {
        /// The rejected path as given.
        path: String,
        /// Why the path was rejected.
        message: String,
    },

    /// A mutation or finalization was attempted after `build()`.
    #[error("build() has already been called")]
    AlreadyBuilt,

    /// `build()` was called before a name was set.
    #[error("with_name() must be set")]
    NameNotSet,
}

impl BuilderError {
    /// Returns whether the error reports an illegal builder state rather than
    /// a rejected argument.
    #[must_use]
    pub const fn is_illegal_state(&self) -> bool {
        matches!(self, Self::AlreadyBuilt | Self::NameNotSet)
    }
}

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No engine configuration could be loaded from the directory.
    #[error("could not load config from: {directory}")]
    NotFound {
        /// The directory that was searched.
        directory: Utf8PathBuf,
    },

    /// A configuration file exists but could not be read.
    #[error("failed to read {path}: {message}")]
    ReadFailed {
        /// The path of the unreadable file.
        path: Utf8PathBuf,
        /// A description of the read failure.
        message: String,
    },

    /// A configuration file could not be parsed.
    #[error("failed to parse {path}: {message}")]
    ParseError {
        /// The path of the malformed file.
        path: Utf8PathBuf,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors that can occur while constructing or verifying an engine client.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The client library could not construct a client for the host.
    #[error("failed to connect to container engine at {host}: {message}")]
    ConnectionFailed {
        /// The host the client was built for.
        host: String,
        /// The message reported by the client library.
        message: String,
    },

    /// Health check failed - engine did not respond correctly.
    #[error("container engine health check failed: {message}")]
    HealthCheckFailed {
        /// A description of the health check failure.
        message: String,
    },

    /// Health check timed out.
    #[error("container engine health check timed out after {seconds} seconds")]
    HealthCheckTimeout {
        /// The timeout duration in seconds.
        seconds: u64,
    },

    /// A runtime for a blocking health check could not be created.
    #[error("failed to create async runtime: {message}")]
    RuntimeCreationFailed {
        /// A description of the runtime failure.
        message: String,
    },
}

/// Top-level error type for dockerlink.
///
/// At the binary boundary (main.rs) these errors are converted to
/// `eyre::Report` for human-readable reporting.
#[derive(Debug, Error)]
pub enum DockerlinkError {
    /// An error occurred while assembling a builder.
    #[error(transparent)]
    Builder(#[from] BuilderError),

    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while constructing or verifying a client.
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

/// A specialised `Result` type for dockerlink operations.
pub type Result<T> = std::result::Result<T, DockerlinkError>;
