//! Shared behavioural-test state for client supplier scenarios.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use dockerlink::engine::{ClientFactory, ClientSupplier, EngineClientConfig, SupplierBuilder};
use dockerlink::error::Result;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Step result type for client supplier BDD tests.
pub type StepResult<T> = std::result::Result<T, String>;

/// A client stamped with its construction sequence number.
#[derive(Debug)]
pub struct FakeClient {
    /// The order in which the factory created this client.
    pub serial: usize,
}

/// A factory producing [`FakeClient`]s and counting constructions.
#[derive(Clone, Default)]
pub struct CountingFactory {
    /// Number of clients constructed so far.
    pub created: Arc<AtomicUsize>,
}

impl ClientFactory for CountingFactory {
    type Client = FakeClient;

    fn default_config(&self) -> EngineClientConfig {
        EngineClientConfig::default()
    }

    fn create(&self, _config: &EngineClientConfig) -> Result<FakeClient> {
        let serial = self.created.fetch_add(1, Ordering::SeqCst);
        Ok(FakeClient { serial })
    }
}

/// The supplier type exercised by the scenarios.
pub type TestSupplier = ClientSupplier<CountingFactory>;

/// Shared scenario state for client supplier behavioural tests.
#[derive(Default, ScenarioState)]
pub struct ClientSupplierState {
    /// The builder under configuration.
    pub(crate) builder: Slot<Arc<Mutex<SupplierBuilder>>>,

    /// The factory handed to finalized suppliers.
    pub(crate) factory: Slot<CountingFactory>,

    /// The supplier produced by finalization.
    pub(crate) supplier: Slot<Arc<TestSupplier>>,

    /// A supplier derived through `new_builder()`.
    pub(crate) derived: Slot<Arc<TestSupplier>>,

    /// The first client handed out.
    pub(crate) first_client: Slot<Arc<FakeClient>>,

    /// The second client handed out.
    pub(crate) second_client: Slot<Arc<FakeClient>>,

    /// The most recent error, rendered together with its classification.
    pub(crate) error: Slot<ObservedError>,
}

/// An error observed by a step.
#[derive(Clone, Debug)]
pub struct ObservedError {
    /// Whether the error reports an illegal builder state.
    pub illegal_state: bool,
    /// The error message.
    pub message: String,
}

/// Fixture providing a fresh client supplier state.
#[fixture]
pub fn client_supplier_state() -> ClientSupplierState {
    let state = ClientSupplierState::default();
    state.factory.set(CountingFactory::default());
    state
}

impl ClientSupplierState {
    /// Runs `f` with exclusive access to the builder.
    pub(crate) fn with_builder<T>(
        &self,
        f: impl FnOnce(&mut SupplierBuilder) -> T,
    ) -> StepResult<T> {
        let builder = self
            .builder
            .get()
            .ok_or_else(|| String::from("builder should be set"))?;
        let mut guard = builder
            .lock()
            .map_err(|_| String::from("builder mutex poisoned"))?;
        Ok(f(&mut guard))
    }

    /// Returns the finalized supplier.
    pub(crate) fn supplier(&self) -> StepResult<Arc<TestSupplier>> {
        self.supplier
            .get()
            .ok_or_else(|| String::from("supplier should be built"))
    }

    /// Returns the factory shared by all suppliers in the scenario.
    pub(crate) fn factory(&self) -> StepResult<CountingFactory> {
        self.factory
            .get()
            .ok_or_else(|| String::from("factory should be set"))
    }
}
