//! Given/When step definitions for client supplier scenarios.

use std::sync::{Arc, Mutex};

use dockerlink::engine::{ConfigDocument, SupplierBuilder};
use dockerlink::error::DockerlinkError;
use rstest_bdd_macros::{given, when};

use super::state::{ClientSupplierState, ObservedError, StepResult};

fn observe(error: &DockerlinkError) -> ObservedError {
    let illegal_state = matches!(error, DockerlinkError::Builder(e) if e.is_illegal_state());
    ObservedError {
        illegal_state,
        message: error.to_string(),
    }
}

// =============================================================================
// Given step definitions
// =============================================================================

#[given("an empty supplier builder")]
#[expect(
    clippy::unnecessary_wraps,
    reason = "rstest-bdd step functions must return StepResult for consistency"
)]
fn empty_supplier_builder(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    client_supplier_state
        .builder
        .set(Arc::new(Mutex::new(SupplierBuilder::new())));
    Ok(())
}

#[given("a supplier builder named {name}")]
fn supplier_builder_named(
    client_supplier_state: &ClientSupplierState,
    name: String,
) -> StepResult<()> {
    let mut builder = SupplierBuilder::new();
    builder.with_name(name).map_err(|e| e.to_string())?;
    client_supplier_state
        .builder
        .set(Arc::new(Mutex::new(builder)));
    Ok(())
}

#[given("the docker host is set to {host}")]
fn docker_host_is_set_to(
    client_supplier_state: &ClientSupplierState,
    host: String,
) -> StepResult<()> {
    client_supplier_state
        .with_builder(|builder| builder.with_docker_host(host).map(|_| ()))?
        .map_err(|e| e.to_string())
}

#[given("a finalized supplier named {name}")]
fn finalized_supplier_named(
    client_supplier_state: &ClientSupplierState,
    name: String,
) -> StepResult<()> {
    supplier_builder_named(client_supplier_state, name)?;
    docker_host_is_set_to(client_supplier_state, String::from("tcp://127.0.0.1:2375"))?;
    the_builder_is_finalized(client_supplier_state)?;
    client_supplier_state
        .supplier
        .get()
        .map(|_| ())
        .ok_or_else(|| String::from("finalization should produce a supplier"))
}

// =============================================================================
// When step definitions
// =============================================================================

#[when("the builder is finalized")]
fn the_builder_is_finalized(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    let factory = client_supplier_state.factory()?;
    let result = client_supplier_state.with_builder(|builder| builder.build_with_factory(factory))?;
    match result {
        Ok(supplier) => client_supplier_state.supplier.set(Arc::new(supplier)),
        Err(e) => client_supplier_state.error.set(observe(&e)),
    }
    Ok(())
}

#[when("the docker host is changed to {host}")]
fn docker_host_is_changed_to(
    client_supplier_state: &ClientSupplierState,
    host: String,
) -> StepResult<()> {
    let result = client_supplier_state
        .with_builder(|builder| builder.with_docker_host(host).map(|_| ()))?;
    if let Err(e) = result {
        client_supplier_state.error.set(observe(&e));
    }
    Ok(())
}

#[when("a client config with host, TLS verification and certificates is imported")]
fn tls_client_config_is_imported(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    let document = ConfigDocument::from_iter([
        ("DOCKER_HOST", "tcp://1.2.3.4:2376"),
        ("DOCKER_TLS_VERIFY", "1"),
        ("DOCKER_CERT_PATH", "/certs"),
    ]);
    client_supplier_state
        .with_builder(|builder| builder.with_client_config(&document).map(|_| ()))?
        .map_err(|e| e.to_string())
}

#[when("a client config without engine keys is imported")]
fn empty_client_config_is_imported(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    let document = ConfigDocument::from_iter([("DOCKER_MACHINE_NAME", "dev")]);
    client_supplier_state
        .with_builder(|builder| builder.with_client_config(&document).map(|_| ()))?
        .map_err(|e| e.to_string())
}

#[when("the local engine is selected")]
fn local_engine_is_selected(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    client_supplier_state
        .with_builder(|builder| builder.with_local_engine().map(|_| ()))?
        .map_err(|e| e.to_string())
}

#[when("a client is requested")]
fn a_client_is_requested(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    let client = client_supplier_state
        .supplier()?
        .get()
        .map_err(|e| e.to_string())?;
    client_supplier_state.first_client.set(client);
    Ok(())
}

#[when("a client is requested again")]
fn a_client_is_requested_again(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    let client = client_supplier_state
        .supplier()?
        .get()
        .map_err(|e| e.to_string())?;
    client_supplier_state.second_client.set(client);
    Ok(())
}

#[when("a client is requested twice")]
fn a_client_is_requested_twice(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    a_client_is_requested(client_supplier_state)?;
    a_client_is_requested_again(client_supplier_state)
}

#[when("the supplier is reset")]
fn the_supplier_is_reset(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    client_supplier_state.supplier()?.reset();
    Ok(())
}

#[when("a derived supplier named {name} is built")]
fn derived_supplier_is_built(
    client_supplier_state: &ClientSupplierState,
    name: String,
) -> StepResult<()> {
    let factory = client_supplier_state.factory()?;
    let mut builder = client_supplier_state.supplier()?.new_builder();
    let derived = builder
        .with_name(name)
        .and_then(|b| b.build_with_factory(factory))
        .map_err(|e| e.to_string())?;
    derived.get().map_err(|e| e.to_string())?;
    client_supplier_state.derived.set(Arc::new(derived));
    Ok(())
}

#[when("the derived supplier is reset")]
fn the_derived_supplier_is_reset(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    client_supplier_state
        .derived
        .get()
        .ok_or_else(|| String::from("derived supplier should be built"))?
        .reset();
    Ok(())
}
