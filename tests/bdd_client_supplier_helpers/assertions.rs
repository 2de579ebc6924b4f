//! Then-step assertions for client supplier scenarios.

use std::sync::Arc;

use dockerlink::engine::EngineClientConfig;
use dockerlink::error::DockerlinkError;
use rstest_bdd_macros::then;

use super::state::{ClientSupplierState, FakeClient, StepResult};

fn expect_illegal_state(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    let error = client_supplier_state
        .error
        .get()
        .ok_or_else(|| String::from("an error should have been observed"))?;
    if error.illegal_state {
        Ok(())
    } else {
        Err(format!("expected an illegal state error, got: {}", error.message))
    }
}

fn step_count(client_supplier_state: &ClientSupplierState) -> StepResult<usize> {
    client_supplier_state.with_builder(|builder| builder.steps().len())
}

#[then("finalization fails with an illegal state error")]
fn finalization_fails(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    if client_supplier_state.supplier.get().is_some() {
        return Err(String::from("expected no supplier to be produced"));
    }
    expect_illegal_state(client_supplier_state)
}

#[then("finalizing again fails with an illegal state error")]
fn finalizing_again_fails(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    let factory = client_supplier_state.factory()?;
    let result = client_supplier_state.with_builder(|builder| builder.build_with_factory(factory))?;
    match result {
        Ok(_) => Err(String::from("expected the second build to fail")),
        Err(DockerlinkError::Builder(e)) if e.is_illegal_state() => Ok(()),
        Err(e) => Err(format!("expected an illegal state error, got: {e}")),
    }
}

#[then("the mutation fails with an illegal state error")]
fn mutation_fails(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    expect_illegal_state(client_supplier_state)
}

#[then("the builder is not finalized")]
fn builder_is_not_finalized(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    if client_supplier_state.with_builder(|builder| builder.is_built())? {
        return Err(String::from("expected the builder to remain unfinalized"));
    }
    Ok(())
}

#[then("a supplier named {name} is produced")]
fn supplier_named(client_supplier_state: &ClientSupplierState, name: String) -> StepResult<()> {
    let supplier = client_supplier_state.supplier()?;
    if supplier.name() == name {
        Ok(())
    } else {
        Err(format!("expected supplier {name}, got {}", supplier.name()))
    }
}

#[then("the builder has {count} configuration steps")]
fn builder_has_steps(client_supplier_state: &ClientSupplierState, count: usize) -> StepResult<()> {
    let actual = step_count(client_supplier_state)?;
    if actual == count {
        Ok(())
    } else {
        Err(format!("expected {count} steps, got {actual}"))
    }
}

#[then("the builder still has {count} configuration step")]
fn builder_still_has_steps(
    client_supplier_state: &ClientSupplierState,
    count: usize,
) -> StepResult<()> {
    builder_has_steps(client_supplier_state, count)
}

#[then("the resolved docker host is {host}")]
fn resolved_docker_host(client_supplier_state: &ClientSupplierState, host: String) -> StepResult<()> {
    let resolved = resolved_config(client_supplier_state)?;
    if resolved.docker_host() == host {
        Ok(())
    } else {
        Err(format!("expected host {host}, got {}", resolved.docker_host()))
    }
}

#[then("TLS verification is enabled")]
fn tls_verification_enabled(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    if resolved_config(client_supplier_state)?.tls_verify() {
        Ok(())
    } else {
        Err(String::from("expected TLS verification to be enabled"))
    }
}

#[then("both clients are the same instance")]
fn clients_are_same(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    let (first, second) = clients(client_supplier_state)?;
    if Arc::ptr_eq(&first, &second) {
        Ok(())
    } else {
        Err(format!(
            "expected one cached client, got serials {} and {}",
            first.serial, second.serial
        ))
    }
}

#[then("the clients are different instances")]
fn clients_are_different(client_supplier_state: &ClientSupplierState) -> StepResult<()> {
    let (first, second) = clients(client_supplier_state)?;
    if Arc::ptr_eq(&first, &second) {
        Err(String::from("expected a rebuilt client"))
    } else {
        Ok(())
    }
}

#[then("{count} client has been constructed")]
fn one_client_constructed(
    client_supplier_state: &ClientSupplierState,
    count: usize,
) -> StepResult<()> {
    clients_constructed(client_supplier_state, count)
}

#[then("{count} clients have been constructed")]
fn clients_constructed(client_supplier_state: &ClientSupplierState, count: usize) -> StepResult<()> {
    let created = client_supplier_state
        .factory()?
        .created
        .load(std::sync::atomic::Ordering::SeqCst);
    if created == count {
        Ok(())
    } else {
        Err(format!("expected {count} constructions, got {created}"))
    }
}

/// Replays the builder's steps over a default configuration.
fn resolved_config(
    client_supplier_state: &ClientSupplierState,
) -> StepResult<EngineClientConfig> {
    let mut config = EngineClientConfig::default();
    client_supplier_state.with_builder(|builder| {
        for step in builder.steps() {
            step.apply(&mut config);
        }
    })?;
    Ok(config)
}

type ClientPair = (Arc<FakeClient>, Arc<FakeClient>);

fn clients(client_supplier_state: &ClientSupplierState) -> StepResult<ClientPair> {
    let first = client_supplier_state
        .first_client
        .get()
        .ok_or_else(|| String::from("first client should be set"))?;
    let second = client_supplier_state
        .second_client
        .get()
        .ok_or_else(|| String::from("second client should be set"))?;
    Ok((first, second))
}
