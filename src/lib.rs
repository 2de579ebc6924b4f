//! Cached, configurable connections to Docker-compatible container engines.
//!
//! `dockerlink` manages the local client object used to talk to a container
//! engine. A [`engine::SupplierBuilder`] accumulates connection settings from
//! explicit calls and on-disk engine config, then finalizes once into a named
//! [`engine::ClientSupplier`] that lazily constructs a client and reuses it for
//! ten minutes before rebuilding.
//!
//! # Modules
//!
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`engine`]: Builder, supplier, client factory and health checks
//! - [`error`]: Semantic error types for the library

pub mod config;
pub mod engine;
pub mod error;
