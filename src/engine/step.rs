//! Deferred mutations applied to a fresh [`EngineClientConfig`].

use std::fmt;
use std::sync::Arc;

use camino::Utf8PathBuf;

use super::EngineClientConfig;

/// A caller-supplied configuration mutation.
pub type CustomStep = Arc<dyn Fn(&mut EngineClientConfig) + Send + Sync>;

/// A single configuration step registered on a builder.
///
/// Steps are applied in registration order every time a supplier constructs
/// a client, so later steps override earlier ones touching the same field.
#[derive(Clone)]
pub enum ConfigStep {
    /// Set the daemon address.
    DockerHost(String),
    /// Set the TLS client certificate directory.
    CertPath(Utf8PathBuf),
    /// Enable or disable TLS verification.
    TlsVerify(bool),
    /// Apply an arbitrary mutation.
    Custom(CustomStep),
}

impl ConfigStep {
    /// Wraps a closure as a custom step.
    pub fn custom<F>(step: F) -> Self
    where
        F: Fn(&mut EngineClientConfig) + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(step))
    }

    /// Applies this step to `config`.
    pub fn apply(&self, config: &mut EngineClientConfig) {
        match self {
            Self::DockerHost(host) => config.set_docker_host(host.as_str()),
            Self::CertPath(path) => config.set_cert_path(path.clone()),
            Self::TlsVerify(verify) => config.set_tls_verify(*verify),
            Self::Custom(step) => step(config),
        }
    }
}

impl fmt::Debug for ConfigStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DockerHost(host) => f.debug_tuple("DockerHost").field(host).finish(),
            Self::CertPath(path) => f.debug_tuple("CertPath").field(path).finish(),
            Self::TlsVerify(verify) => f.debug_tuple("TlsVerify").field(verify).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Custom steps compare by identity.
impl PartialEq for ConfigStep {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::DockerHost(a), Self::DockerHost(b)) => a == b,
            (Self::CertPath(a), Self::CertPath(b)) => a == b,
            (Self::TlsVerify(a), Self::TlsVerify(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
