//! Engine client configuration, construction and caching.
//!
//! Callers assemble a [`SupplierBuilder`] from explicit calls and on-disk
//! engine config, finalize it once into a [`ClientSupplier`], then ask the
//! supplier for clients. Configuration is merged by step order: each step
//! mutates the same fresh [`EngineClientConfig`], so later steps win.
//!
//! ```ignore
//! use dockerlink::engine::SupplierBuilder;
//!
//! let mut builder = SupplierBuilder::new();
//! builder
//!     .with_name("machine-dev")?
//!     .with_docker_config_dir("/home/scanner/.docker/machine/machines/dev")?;
//! let supplier = builder.build()?;
//! let docker = supplier.get()?;
//! ```

mod builder;
pub mod client_config;
mod document;
mod factory;
pub mod health;
mod loader;
mod step;
mod supplier;

pub use builder::SupplierBuilder;
pub use client_config::EngineClientConfig;
pub use document::ConfigDocument;
pub use factory::{BollardClientFactory, ClientFactory, TransportPolicy};
pub use loader::{ConfigLoader, DockerConfigLoader};
pub use step::{ConfigStep, CustomStep};
pub use supplier::{ClientCache, ClientSupplier, FRESHNESS_WINDOW, is_fresh};
