//! The idempotent deployment core: deterministic address derivation and
//! deploy-if-absent helpers
//!
//! Every deployment path here checks existing on-chain state before issuing
//! a transaction, so the scripts are safe to re-run against a partially or
//! fully deployed protocol.

use alloy::{network::TransactionBuilder, providers::Provider, rpc::types::TransactionRequest};
use alloy_primitives::{keccak256, Address, Bytes, B256};
use tracing::info;

use crate::{
    constants::SALT_NAMESPACE,
    errors::ScriptError,
    solidity::ICreate2Factory,
    utils::{send_tx, Client},
};

/// The outcome of a deterministic deployment
pub struct DeployOutcome {
    /// The address the contract lives at
    pub address: Address,
    /// Whether a deployment transaction was sent; `false` means the contract
    /// was already deployed and the deployment was skipped
    pub deployed: bool,
}

/// Whether a contract is deployed at the given address
pub async fn is_deployed(client: &Client, address: Address) -> Result<bool, ScriptError> {
    let code = client
        .get_code_at(address)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(!code.is_empty())
}

/// Derive the CREATE2 salt for the given contract name.
///
/// Salts are derived from a fixed namespace so that re-runs and fresh
/// checkouts agree on every contract's target address.
pub fn contract_salt(name: &str) -> B256 {
    keccak256(format!("{SALT_NAMESPACE}:{name}").as_bytes())
}

/// Compute the address at which the factory deploys the given init code
/// (EIP-1014)
pub fn deterministic_address(factory: Address, salt: B256, init_code: &[u8]) -> Address {
    factory.create2_from_code(salt, init_code)
}

/// Deploy init code through the CREATE2 factory, skipping the deployment if
/// the target address already has code.
///
/// Errors if the deployment lands but leaves no code at the precomputed
/// address, which indicates a factory mismatch or salt drift.
pub async fn deploy_deterministic(
    client: &Client,
    factory_address: Address,
    salt: B256,
    init_code: Bytes,
    confirmations: u64,
) -> Result<DeployOutcome, ScriptError> {
    let target = deterministic_address(factory_address, salt, &init_code);
    if is_deployed(client, target).await? {
        info!("contract already deployed at {target:#x}, skipping");
        return Ok(DeployOutcome {
            address: target,
            deployed: false,
        });
    }

    let factory = ICreate2Factory::new(factory_address, client.clone());
    let receipt = send_tx(factory.deploy_call(salt, init_code), confirmations)
        .await
        .map_err(|e| match e {
            ScriptError::ContractInteraction(s) => ScriptError::ContractDeployment(s),
            e => e,
        })?;

    if !is_deployed(client, target).await? {
        return Err(ScriptError::ContractDeployment(format!(
            "no code at {:#x} after deployment (tx {:#x})",
            target, receipt.transaction_hash,
        )));
    }

    Ok(DeployOutcome {
        address: target,
        deployed: true,
    })
}

/// Deploy raw init code with a plain CREATE transaction.
///
/// Used to bootstrap the CREATE2 factory itself, which cannot be deployed
/// deterministically before a factory exists on the network.
pub async fn deploy_bytecode(
    client: &Client,
    init_code: Bytes,
    confirmations: u64,
) -> Result<Address, ScriptError> {
    let tx = TransactionRequest::default().with_deploy_code(init_code);
    let pending = client
        .send_transaction(tx)
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    let receipt = pending
        .with_required_confirmations(confirmations)
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    if !receipt.status() {
        return Err(ScriptError::ContractDeployment(format!(
            "deployment transaction {:#x} reverted",
            receipt.transaction_hash,
        )));
    }

    receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment("deployment receipt carries no contract address".to_string())
    })
}

#[cfg(test)]
mod tests {
    //! Tests for deterministic address derivation

    use alloy_primitives::{address, b256, bytes, Address, Bytes, B256};

    use super::{contract_salt, deterministic_address};

    /// The address derivation matches the EIP-1014 reference vectors
    #[test]
    fn test_eip1014_vectors() {
        let cases = [
            (
                Address::ZERO,
                B256::ZERO,
                bytes!("00"),
                address!("4d1a2e2bb4f88f0250f26ffff098b0b30b26bf38"),
            ),
            (
                address!("deadbeef00000000000000000000000000000000"),
                B256::ZERO,
                bytes!("00"),
                address!("b928f69bb1d91cd65274e3c79d8986362984fda3"),
            ),
            (
                address!("deadbeef00000000000000000000000000000000"),
                b256!("000000000000000000000000feed000000000000000000000000000000000000"),
                bytes!("00"),
                address!("d04116cdd17bebe565eb2422f2497e06cc1c9833"),
            ),
            (
                Address::ZERO,
                B256::ZERO,
                bytes!("deadbeef"),
                address!("70f2b2914a2a4b783faefb75f459a580616fcb5e"),
            ),
            (
                address!("00000000000000000000000000000000deadbeef"),
                b256!("00000000000000000000000000000000000000000000000000000000cafebabe"),
                bytes!("deadbeef"),
                address!("60f3f640a8508fc6a86d45df051962668e1e8ac7"),
            ),
            (
                address!("00000000000000000000000000000000deadbeef"),
                b256!("00000000000000000000000000000000000000000000000000000000cafebabe"),
                bytes!("deadbeefdeadbeefdeadbeefdeadbeefdeadbeef"),
                address!("1d8bfdc5d46dc4f61d6b6115972536ebe6a8854c"),
            ),
            (
                Address::ZERO,
                B256::ZERO,
                Bytes::new(),
                address!("e33c0c7f7df4809055c3eba6c09cfe4baf1bd9e0"),
            ),
        ];

        for (factory, salt, init_code, expected) in cases {
            assert_eq!(deterministic_address(factory, salt, &init_code), expected);
        }
    }

    /// Salt derivation is deterministic & distinguishes contract names
    #[test]
    fn test_salt_derivation() {
        assert_eq!(contract_salt("treasury"), contract_salt("treasury"));
        assert_ne!(contract_salt("treasury"), contract_salt("staking"));
    }

    /// Distinct salts land distinct addresses for the same init code
    #[test]
    fn test_salt_separates_addresses() {
        let factory = address!("00000000000000000000000000000000deadbeef");
        let init_code = bytes!("60806040");

        let a = deterministic_address(factory, contract_salt("treasury"), &init_code);
        let b = deterministic_address(factory, contract_salt("staking"), &init_code);
        assert_ne!(a, b);
    }
}
