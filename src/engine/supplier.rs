//! Lazily constructed, time-bounded engine clients.
//!
//! A [`ClientSupplier`] is the finalized form of a
//! [`SupplierBuilder`](super::SupplierBuilder). It owns an immutable snapshot
//! of the builder's name and steps and a single-entry [`ClientCache`]. The
//! cache mutex is held while a client is constructed, so concurrent callers
//! racing on an empty or stale entry build it once.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info};

use super::{BollardClientFactory, ClientFactory, ConfigStep, EngineClientConfig, SupplierBuilder};
use crate::error::Result;

/// How long a constructed client is reused before it is rebuilt.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(10 * 60);

/// Returns whether an entry created at `created_at` is still usable at `now`.
#[must_use]
pub fn is_fresh(created_at: Instant, now: Instant, window: Duration) -> bool {
    now.saturating_duration_since(created_at) < window
}

struct CachedClient<C> {
    client: Arc<C>,
    created_at: Instant,
}

/// A single-entry cache whose entry expires after a fixed window.
pub struct ClientCache<C> {
    window: Duration,
    entry: Mutex<Option<CachedClient<C>>>,
}

impl<C> ClientCache<C> {
    /// Creates an empty cache with the given freshness window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            entry: Mutex::new(None),
        }
    }

    /// Returns the cached value if it is fresh at `now`, otherwise stores and
    /// returns the result of `create`.
    ///
    /// A failed `create` leaves the previous entry untouched.
    ///
    /// # Errors
    ///
    /// Returns whatever `create` returns.
    pub fn get_or_try_insert_with<E, F>(&self, now: Instant, create: F) -> std::result::Result<Arc<C>, E>
    where
        F: FnOnce() -> std::result::Result<C, E>,
    {
        let mut entry = self.entry.lock();
        if let Some(cached) = entry
            .as_ref()
            .filter(|cached| is_fresh(cached.created_at, now, self.window))
        {
            return Ok(Arc::clone(&cached.client));
        }

        let client = Arc::new(create()?);
        *entry = Some(CachedClient {
            client: Arc::clone(&client),
            created_at: now,
        });
        Ok(client)
    }

    /// Discards the cached entry regardless of age.
    pub fn clear(&self) {
        *self.entry.lock() = None;
    }

    /// When the current entry was stored, if there is one.
    #[must_use]
    pub fn created_at(&self) -> Option<Instant> {
        self.entry.lock().as_ref().map(|cached| cached.created_at)
    }
}

/// A named, finalized source of cached engine clients.
pub struct ClientSupplier<F: ClientFactory = BollardClientFactory> {
    name: String,
    steps: Arc<[ConfigStep]>,
    factory: F,
    cache: ClientCache<F::Client>,
}

impl<F: ClientFactory> ClientSupplier<F> {
    pub(crate) fn new(name: String, steps: Arc<[ConfigStep]>, factory: F) -> Self {
        Self {
            name,
            steps,
            factory,
            cache: ClientCache::new(FRESHNESS_WINDOW),
        }
    }

    /// The name captured when the builder was finalized.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configuration steps, in registration order.
    #[must_use]
    pub fn steps(&self) -> &[ConfigStep] {
        &self.steps
    }

    /// The factory constructing this supplier's clients.
    #[must_use]
    pub const fn factory(&self) -> &F {
        &self.factory
    }

    /// Applies every step, in order, to a fresh default configuration.
    #[must_use]
    pub fn client_config(&self) -> EngineClientConfig {
        let mut config = self.factory.default_config();
        for step in self.steps.iter() {
            step.apply(&mut config);
        }
        config
    }

    /// Returns a client, constructing one if the cache is empty or stale.
    ///
    /// # Errors
    ///
    /// Returns the factory's error unchanged if construction fails. Any
    /// previously cached client is left in place.
    pub fn get(&self) -> Result<Arc<F::Client>> {
        self.get_at(Instant::now())
    }

    pub(crate) fn get_at(&self, now: Instant) -> Result<Arc<F::Client>> {
        self.cache.get_or_try_insert_with(now, || {
            let config = self.client_config();
            info!(
                supplier = %self.name,
                host = config.docker_host(),
                "constructing engine client"
            );
            self.factory.create(&config)
        })
    }

    /// Discards the cached client so the next [`get`](Self::get) rebuilds.
    pub fn reset(&self) {
        debug!(supplier = %self.name, "discarding cached engine client");
        self.cache.clear();
    }

    /// When the cached client was constructed, if one is cached.
    #[must_use]
    pub fn cached_at(&self) -> Option<Instant> {
        self.cache.created_at()
    }

    /// Returns an independent, unfinalized builder seeded with this
    /// supplier's name and steps.
    #[must_use]
    pub fn new_builder(&self) -> SupplierBuilder {
        SupplierBuilder::seeded(self.name.clone(), self.steps.to_vec())
    }
}

impl<F: ClientFactory> fmt::Debug for ClientSupplier<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSupplier")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
