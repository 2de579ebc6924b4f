//! The mutable client configuration threaded through configuration steps.
//!
//! A fresh [`EngineClientConfig`] is created for every client construction.
//! Its defaults follow the engine client conventions: the `DOCKER_HOST`,
//! `DOCKER_CERT_PATH` and `DOCKER_TLS_VERIFY` environment variables, then the
//! platform socket and `$HOME/.docker`.

use camino::{Utf8Path, Utf8PathBuf};

/// Key naming the daemon address.
pub const DOCKER_HOST: &str = "DOCKER_HOST";

/// Key naming the TLS client certificate directory.
pub const DOCKER_CERT_PATH: &str = "DOCKER_CERT_PATH";

/// Key toggling TLS verification (`"1"` enables it).
pub const DOCKER_TLS_VERIFY: &str = "DOCKER_TLS_VERIFY";

/// Address of the local engine socket.
pub const LOCAL_ENGINE_HOST: &str = "unix:///var/run/docker.sock";

/// Default socket path for Unix platforms.
#[cfg(unix)]
const DEFAULT_HOST: &str = LOCAL_ENGINE_HOST;

/// Default socket path for Windows platforms.
#[cfg(windows)]
const DEFAULT_HOST: &str = "npipe:////./pipe/docker_engine";

/// Parses a `DOCKER_TLS_VERIFY` value.
///
/// Only `"1"` (ignoring surrounding whitespace) enables verification. Any
/// other value, including `"true"` and `"yes"`, disables it.
#[must_use]
pub fn parse_tls_verify(value: &str) -> bool {
    value.trim() == "1"
}

/// Connection settings for a single engine client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineClientConfig {
    docker_host: String,
    cert_path: Option<Utf8PathBuf>,
    tls_verify: bool,
}

impl Default for EngineClientConfig {
    fn default() -> Self {
        Self {
            docker_host: DEFAULT_HOST.to_owned(),
            cert_path: None,
            tls_verify: false,
        }
    }
}

impl EngineClientConfig {
    /// Builds the default configuration from the given environment.
    ///
    /// Empty variables are treated as unset.
    #[must_use]
    pub fn from_env<E: mockable::Env>(env: &E) -> Self {
        let lookup = |key: &str| env.string(key).filter(|value| !value.is_empty());

        let docker_host = lookup(DOCKER_HOST).unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let cert_path = lookup(DOCKER_CERT_PATH)
            .map(Utf8PathBuf::from)
            .or_else(|| lookup("HOME").map(|home| Utf8PathBuf::from(home).join(".docker")));
        let tls_verify = lookup(DOCKER_TLS_VERIFY).is_some_and(|value| parse_tls_verify(&value));

        Self {
            docker_host,
            cert_path,
            tls_verify,
        }
    }

    /// Sets the daemon address.
    pub fn set_docker_host(&mut self, host: impl Into<String>) {
        self.docker_host = host.into();
    }

    /// Sets the TLS client certificate directory.
    pub fn set_cert_path(&mut self, path: impl Into<Utf8PathBuf>) {
        self.cert_path = Some(path.into());
    }

    /// Enables or disables TLS verification.
    pub const fn set_tls_verify(&mut self, verify: bool) {
        self.tls_verify = verify;
    }

    /// The daemon address.
    #[must_use]
    pub fn docker_host(&self) -> &str {
        &self.docker_host
    }

    /// The TLS client certificate directory, if any.
    #[must_use]
    pub fn cert_path(&self) -> Option<&Utf8Path> {
        self.cert_path.as_deref()
    }

    /// Whether TLS verification is enabled.
    #[must_use]
    pub const fn tls_verify(&self) -> bool {
        self.tls_verify
    }
}
