//! Helpers for the on-chain address registry

use alloy_primitives::Address;
use tracing::info;

use crate::{
    errors::ScriptError,
    solidity::IAddressRegistry,
    utils::{send_tx, Client},
};

/// Read the registry entry for the given name.
///
/// An unregistered name reads as the zero address.
pub async fn registry_entry(
    client: &Client,
    registry_address: Address,
    name: &str,
) -> Result<Address, ScriptError> {
    let registry = IAddressRegistry::new(registry_address, client.clone());
    registry
        .get(name.to_string())
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
}

/// Publish an address under the given name, skipping the write if the entry
/// already matches.
///
/// Returns whether a registry write was sent.
pub async fn ensure_registered(
    client: &Client,
    registry_address: Address,
    name: &str,
    address: Address,
    confirmations: u64,
) -> Result<bool, ScriptError> {
    let current = registry_entry(client, registry_address, name).await?;
    if current == address {
        info!("registry entry `{name}` already set to {address:#x}, skipping");
        return Ok(false);
    }

    let registry = IAddressRegistry::new(registry_address, client.clone());
    send_tx(registry.set(name.to_string(), address), confirmations).await?;
    info!("registry entry `{name}` set to {address:#x}");

    Ok(true)
}
