//! Fluent accumulation of engine connection settings.
//!
//! A [`SupplierBuilder`] records [`ConfigStep`]s without touching the engine
//! or the filesystem (apart from [`with_docker_config_dir`]) and finalizes
//! exactly once into a [`ClientSupplier`]. Every mutator goes through
//! [`SupplierBuilder::ensure_mutable`], so no method can change a finalized
//! builder.
//!
//! ```ignore
//! use dockerlink::engine::SupplierBuilder;
//!
//! let mut builder = SupplierBuilder::new();
//! let supplier = builder.with_name("local")?.with_local_engine()?.build()?;
//! let docker = supplier.get()?;
//! ```
//!
//! [`with_docker_config_dir`]: SupplierBuilder::with_docker_config_dir

use std::path::Path;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use super::{
    BollardClientFactory, ClientFactory, ClientSupplier, ConfigDocument, ConfigLoader, ConfigStep,
    DockerConfigLoader, EngineClientConfig, client_config,
};
use crate::error::{BuilderError, ConfigError, Result};

/// Accumulates configuration steps and a name for a [`ClientSupplier`].
#[derive(Debug, Default)]
pub struct SupplierBuilder {
    name: Option<String>,
    steps: Vec<ConfigStep>,
    finalized: bool,
}

impl SupplierBuilder {
    /// Creates an empty, unfinalized builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) const fn seeded(name: String, steps: Vec<ConfigStep>) -> Self {
        Self {
            name: Some(name),
            steps,
            finalized: false,
        }
    }

    /// The name set so far.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The steps registered so far, in order.
    #[must_use]
    pub fn steps(&self) -> &[ConfigStep] {
        &self.steps
    }

    /// Whether [`build`](Self::build) has succeeded on this builder.
    #[must_use]
    pub const fn is_built(&self) -> bool {
        self.finalized
    }

    /// Rejects any change once the builder has been finalized.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::AlreadyBuilt` after a successful `build()`.
    pub fn ensure_mutable(&self) -> Result<()> {
        if self.finalized {
            return Err(BuilderError::AlreadyBuilt.into());
        }
        Ok(())
    }

    fn push_step(&mut self, step: ConfigStep) -> Result<&mut Self> {
        self.ensure_mutable()?;
        debug!(builder = ?self.name, ?step, "registered configuration step");
        self.steps.push(step);
        Ok(self)
    }

    /// Sets the supplier name.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::AlreadyBuilt` after `build()`, or
    /// `BuilderError::EmptyValue` for an empty name.
    pub fn with_name(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let value = name.into();
        if value.is_empty() {
            return Err(BuilderError::EmptyValue { field: "name" }.into());
        }
        self.name = Some(value);
        Ok(self)
    }

    /// Targets the local engine socket (`unix:///var/run/docker.sock`).
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::AlreadyBuilt` after `build()`.
    pub fn with_local_engine(&mut self) -> Result<&mut Self> {
        self.with_docker_host(client_config::LOCAL_ENGINE_HOST)
    }

    /// Registers a step setting the daemon address.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::AlreadyBuilt` after `build()`, or
    /// `BuilderError::EmptyValue` for an empty host.
    pub fn with_docker_host(&mut self, host: impl Into<String>) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let value = host.into();
        if value.is_empty() {
            return Err(BuilderError::EmptyValue { field: "docker_host" }.into());
        }
        self.push_step(ConfigStep::DockerHost(value))
    }

    /// Registers a step setting the certificate directory to the absolute
    /// form of `path`. Accepts `str`, `Path` and `Utf8Path` alike.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::AlreadyBuilt` after `build()`,
    /// `BuilderError::EmptyValue` for an empty path, or
    /// `BuilderError::InvalidPath` if it cannot be made absolute or is not
    /// valid UTF-8.
    pub fn with_cert_path(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let relative = path.as_ref();
        if relative.as_os_str().is_empty() {
            return Err(BuilderError::EmptyValue { field: "cert_path" }.into());
        }
        let absolute = absolute_utf8(relative)?;
        self.push_step(ConfigStep::CertPath(absolute))
    }

    /// Registers a step enabling or disabling TLS verification.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::AlreadyBuilt` after `build()`.
    pub fn with_tls_verify(&mut self, verify: bool) -> Result<&mut Self> {
        self.push_step(ConfigStep::TlsVerify(verify))
    }

    /// Registers an arbitrary configuration step.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::AlreadyBuilt` after `build()`.
    pub fn with_builder_config<F>(&mut self, step: F) -> Result<&mut Self>
    where
        F: Fn(&mut EngineClientConfig) + Send + Sync + 'static,
    {
        self.push_step(ConfigStep::custom(step))
    }

    /// Imports `DOCKER_HOST`, `DOCKER_CERT_PATH` and `DOCKER_TLS_VERIFY` from
    /// `document`, skipping keys that are absent or empty.
    ///
    /// The certificate path is taken as written. `DOCKER_TLS_VERIFY` enables
    /// verification only for `"1"`.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::AlreadyBuilt` after `build()`.
    pub fn with_client_config(&mut self, document: &ConfigDocument) -> Result<&mut Self> {
        self.ensure_mutable()?;
        if let Some(host) = document.non_empty(client_config::DOCKER_HOST) {
            self.with_docker_host(host)?;
        }
        if let Some(cert_path) = document.non_empty(client_config::DOCKER_CERT_PATH) {
            self.push_step(ConfigStep::CertPath(Utf8PathBuf::from(cert_path)))?;
        }
        if let Some(verify) = document.non_empty(client_config::DOCKER_TLS_VERIFY) {
            self.with_tls_verify(client_config::parse_tls_verify(verify))?;
        }
        Ok(self)
    }

    /// Loads the engine config stored in `directory` and imports it with
    /// [`with_client_config`](Self::with_client_config).
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::AlreadyBuilt` after `build()`,
    /// `ConfigError::NotFound` if the directory holds no config, or the
    /// loader's error if a config file is unreadable.
    pub fn with_docker_config_dir(&mut self, directory: impl AsRef<Utf8Path>) -> Result<&mut Self> {
        self.with_docker_config_dir_using(&DockerConfigLoader, directory)
    }

    /// Like [`with_docker_config_dir`](Self::with_docker_config_dir) with a
    /// caller-supplied loader.
    ///
    /// # Errors
    ///
    /// See [`with_docker_config_dir`](Self::with_docker_config_dir).
    pub fn with_docker_config_dir_using<L: ConfigLoader>(
        &mut self,
        loader: &L,
        directory: impl AsRef<Utf8Path>,
    ) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let dir = directory.as_ref();
        let document = loader
            .load(dir)?
            .ok_or_else(|| ConfigError::NotFound {
                directory: dir.to_owned(),
            })?;
        self.with_client_config(&document)
    }

    /// Finalizes the builder into a supplier of Bollard clients.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::AlreadyBuilt` on a second call, or
    /// `BuilderError::NameNotSet` if no name was set. A failed call leaves
    /// the builder unfinalized.
    pub fn build(&mut self) -> Result<ClientSupplier<BollardClientFactory>> {
        self.build_with_factory(BollardClientFactory::default())
    }

    /// Finalizes the builder into a supplier using `factory`.
    ///
    /// # Errors
    ///
    /// See [`build`](Self::build).
    pub fn build_with_factory<F: ClientFactory>(&mut self, factory: F) -> Result<ClientSupplier<F>> {
        self.ensure_mutable()?;
        let name = self
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .ok_or(BuilderError::NameNotSet)?;
        self.finalized = true;
        info!(supplier = %name, steps = self.steps.len(), "finalized client supplier");
        Ok(ClientSupplier::new(
            name,
            Arc::from(self.steps.clone()),
            factory,
        ))
    }
}

/// Resolves `path` against the working directory without touching the
/// filesystem.
fn absolute_utf8(path: &Path) -> Result<Utf8PathBuf> {
    let invalid = |message: String| BuilderError::InvalidPath {
        path: path.display().to_string(),
        message,
    };
    let absolute = std::path::absolute(path).map_err(|e| invalid(e.to_string()))?;
    Utf8PathBuf::from_path_buf(absolute)
        .map_err(|_| invalid(String::from("path is not valid UTF-8")).into())
}
