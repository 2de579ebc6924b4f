//! Construction of engine clients from a finished configuration.
//!
//! [`ClientFactory`] is the seam between the cached supplier and the client
//! library. [`BollardClientFactory`] is the production implementation; it
//! picks the Bollard connector from the host scheme and the TLS setting.

use std::time::Duration;

use bollard::Docker;
use camino::Utf8Path;
use smart_default::SmartDefault;
use tracing::debug;

use super::EngineClientConfig;
use crate::error::{ConnectionError, Result};

/// Timeout and pool limits applied when constructing a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SmartDefault)]
pub struct TransportPolicy {
    /// Maximum time to establish a connection.
    #[default(Duration::from_secs(3))]
    pub connect_timeout: Duration,
    /// Maximum time to wait for a response.
    #[default(Duration::from_secs(3))]
    pub read_timeout: Duration,
    /// Maximum number of pooled connections.
    #[default(100)]
    pub max_total_connections: usize,
    /// Maximum number of pooled connections per host.
    #[default(10)]
    pub max_connections_per_host: usize,
}

impl TransportPolicy {
    /// The single request timeout, in whole seconds, for clients that do not
    /// separate connect and read timeouts.
    #[must_use]
    pub fn request_timeout_secs(&self) -> u64 {
        self.connect_timeout.max(self.read_timeout).as_secs().max(1)
    }
}

/// Builds engine clients from a finished [`EngineClientConfig`].
pub trait ClientFactory: Send + Sync {
    /// The client produced by this factory.
    type Client: Send + Sync;

    /// Returns the fresh configuration the supplier's steps are applied to.
    ///
    /// The default reads the engine environment variables of the process.
    fn default_config(&self) -> EngineClientConfig {
        EngineClientConfig::from_env(&mockable::DefaultEnv::new())
    }

    /// Constructs a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::ConnectionFailed` if the client library
    /// rejects the configuration.
    fn create(&self, config: &EngineClientConfig) -> Result<Self::Client>;
}

/// Classifies host endpoint types for connection handling.
enum SocketType {
    /// Unix socket or Windows named pipe with explicit scheme.
    Socket,
    /// HTTP, HTTPS, or TCP endpoint.
    Http,
    /// Bare path without scheme prefix.
    BarePath,
}

impl SocketType {
    fn is_socket_scheme(host: &str) -> bool {
        host.starts_with("unix://") || host.starts_with("npipe://")
    }

    fn is_http_scheme(host: &str) -> bool {
        host.starts_with("tcp://") || host.starts_with("http://") || host.starts_with("https://")
    }

    fn classify(host: &str) -> Self {
        match (Self::is_socket_scheme(host), Self::is_http_scheme(host)) {
            (true, _) => Self::Socket,
            (_, true) => Self::Http,
            _ => Self::BarePath,
        }
    }
}

/// Normalize a bare socket path to a URI with the appropriate scheme.
///
/// Paths starting with `\\` or `//` are named pipes; everything else is a
/// Unix socket. Detection is syntax-based, not platform-based.
fn normalize_bare_path(path: &str) -> String {
    if path.starts_with("\\\\") || path.starts_with("//") {
        format!("npipe://{path}")
    } else {
        format!("unix://{path}")
    }
}

/// Builds [`bollard::Docker`] clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct BollardClientFactory {
    policy: TransportPolicy,
}

impl BollardClientFactory {
    /// Creates a factory applying `policy`.
    #[must_use]
    pub const fn new(policy: TransportPolicy) -> Self {
        Self { policy }
    }

    /// The policy applied to constructed clients.
    #[must_use]
    pub const fn policy(&self) -> &TransportPolicy {
        &self.policy
    }

    fn connect_http(
        host: &str,
        config: &EngineClientConfig,
        timeout: u64,
    ) -> std::result::Result<Docker, String> {
        if !config.tls_verify() {
            let http_host = host.replacen("tcp://", "http://", 1);
            return Docker::connect_with_http(&http_host, timeout, bollard::API_DEFAULT_VERSION)
                .map_err(|e| e.to_string());
        }

        let cert_dir = config
            .cert_path()
            .ok_or("TLS verification requires a certificate path")?;
        Self::connect_tls(host, cert_dir, timeout)
    }

    fn connect_tls(
        host: &str,
        cert_dir: &Utf8Path,
        timeout: u64,
    ) -> std::result::Result<Docker, String> {
        let https_host = host
            .replacen("tcp://", "https://", 1)
            .replacen("http://", "https://", 1);
        Docker::connect_with_ssl(
            &https_host,
            cert_dir.join("key.pem").as_std_path(),
            cert_dir.join("cert.pem").as_std_path(),
            cert_dir.join("ca.pem").as_std_path(),
            timeout,
            bollard::API_DEFAULT_VERSION,
        )
        .map_err(|e| e.to_string())
    }
}

impl ClientFactory for BollardClientFactory {
    type Client = Docker;

    fn create(&self, config: &EngineClientConfig) -> Result<Docker> {
        let host = config.docker_host();
        let timeout = self.policy.request_timeout_secs();
        debug!(
            %host,
            tls_verify = config.tls_verify(),
            timeout_secs = timeout,
            max_total_connections = self.policy.max_total_connections,
            max_connections_per_host = self.policy.max_connections_per_host,
            "constructing bollard client"
        );

        let docker = match SocketType::classify(host) {
            SocketType::Socket => {
                Docker::connect_with_socket(host, timeout, bollard::API_DEFAULT_VERSION)
                    .map_err(|e| e.to_string())
            }
            SocketType::Http => Self::connect_http(host, config, timeout),
            SocketType::BarePath => Docker::connect_with_socket(
                &normalize_bare_path(host),
                timeout,
                bollard::API_DEFAULT_VERSION,
            )
            .map_err(|e| e.to_string()),
        }
        .map_err(|message| ConnectionError::ConnectionFailed {
            host: host.to_owned(),
            message,
        })?;

        Ok(docker)
    }
}
