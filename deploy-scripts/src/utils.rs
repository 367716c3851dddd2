//! Utilities for the deploy scripts: client setup, the deployments manifest,
//! and init code artifacts

use std::{fs, path::Path, str::FromStr};

use alloy::{
    contract::{CallBuilder, CallDecoder},
    network::{Ethereum, EthereumWallet},
    providers::{DynProvider, ProviderBuilder},
    rpc::types::TransactionReceipt,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use alloy_primitives::{Address, Bytes};
use serde_json::{json, Value};

use crate::{
    constants::{ARTIFACT_EXTENSION, DEPLOYMENTS_KEY},
    errors::ScriptError,
};

/// The provider type used throughout the scripts
pub type Client = DynProvider;

/// The call builder type for contract calls made by the scripts
pub type ScriptCallBuilder<'a, C> = CallBuilder<&'a DynProvider, C, Ethereum>;

/// Set up the RPC client with the deployer's key attached, returning the
/// client along with the deployer's address
pub fn setup_client(priv_key: &str, rpc_url: &str) -> Result<(Client, Address), ScriptError> {
    let url =
        Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let deployer = signer.address();

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .with_simple_nonce_management()
        .connect_http(url);

    Ok((DynProvider::new(provider), deployer))
}

/// Send a contract call, wait for the given number of confirmations, and
/// check the receipt status
pub async fn send_tx<C: CallDecoder>(
    tx: ScriptCallBuilder<'_, C>,
    confirmations: u64,
) -> Result<TransactionReceipt, ScriptError> {
    let pending = tx
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    let receipt = pending
        .with_required_confirmations(confirmations)
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    if !receipt.status() {
        return Err(ScriptError::ContractInteraction(format!(
            "transaction {:#x} reverted",
            receipt.transaction_hash
        )));
    }

    Ok(receipt)
}

/// Parse a hex address argument
pub fn parse_addr(addr: &str) -> Result<Address, ScriptError> {
    Address::from_str(addr).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}

/// Parse the deployments manifest, if it exists
fn read_manifest(file_path: &Path) -> Result<Option<Value>, ScriptError> {
    if !file_path.exists() {
        return Ok(None);
    }

    let contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::ReadManifest(e.to_string()))?;
    let parsed =
        serde_json::from_str(&contents).map_err(|e| ScriptError::ReadManifest(e.to_string()))?;

    Ok(Some(parsed))
}

/// Read a contract address from the deployments manifest, returning `None`
/// if the manifest or the entry doesn't exist yet
pub fn try_read_deployment(
    file_path: &Path,
    contract_key: &str,
) -> Result<Option<Address>, ScriptError> {
    let Some(parsed) = read_manifest(file_path)? else {
        return Ok(None);
    };

    match parsed[DEPLOYMENTS_KEY][contract_key].as_str() {
        Some(addr_str) => Address::from_str(addr_str)
            .map(Some)
            .map_err(|e| ScriptError::ReadManifest(e.to_string())),
        None => Ok(None),
    }
}

/// Read a contract address from the deployments manifest, erroring if the
/// entry is missing
pub fn read_deployment(file_path: &Path, contract_key: &str) -> Result<Address, ScriptError> {
    try_read_deployment(file_path, contract_key)?.ok_or_else(|| {
        ScriptError::ReadManifest(format!(
            "no `{}` entry in deployments manifest at {}",
            contract_key,
            file_path.display(),
        ))
    })
}

/// Record a deployed contract address in the deployments manifest, creating
/// the manifest if it doesn't exist yet
pub fn write_deployment(
    file_path: &Path,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    let mut parsed = read_manifest(file_path)?.unwrap_or_else(|| json!({}));
    parsed[DEPLOYMENTS_KEY][contract_key] = Value::String(format!("{address:#x}"));

    let serialized = serde_json::to_string_pretty(&parsed)
        .map_err(|e| ScriptError::WriteManifest(e.to_string()))?;
    fs::write(file_path, serialized).map_err(|e| ScriptError::WriteManifest(e.to_string()))
}

/// Read a contract's init code artifact (hex, constructor arguments
/// pre-encoded) from the artifacts directory
pub fn read_artifact(artifacts_dir: &Path, artifact_name: &str) -> Result<Bytes, ScriptError> {
    let path = artifacts_dir.join(format!("{artifact_name}.{ARTIFACT_EXTENSION}"));
    let contents = fs::read_to_string(&path)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;

    let stripped = contents.trim().trim_start_matches("0x");
    if stripped.is_empty() {
        return Err(ScriptError::ArtifactParsing(format!(
            "empty init code artifact at {}",
            path.display(),
        )));
    }

    let init_code = hex::decode(stripped)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;

    Ok(init_code.into())
}

#[cfg(test)]
mod tests {
    //! Tests for manifest & artifact handling

    use std::{env, fs, path::PathBuf};

    use alloy_primitives::Address;

    use super::{read_artifact, read_deployment, try_read_deployment, write_deployment};

    /// Create a scratch file path unique to the given test
    fn scratch_file(name: &str) -> PathBuf {
        env::temp_dir().join(format!("deploy-scripts-{}-{}.json", std::process::id(), name))
    }

    /// Writing then reading a deployment round-trips the address
    #[test]
    fn test_manifest_round_trip() {
        let path = scratch_file("round-trip");
        let addr = Address::repeat_byte(0x42);

        write_deployment(&path, "treasury_contract", addr).unwrap();
        assert_eq!(read_deployment(&path, "treasury_contract").unwrap(), addr);

        fs::remove_file(&path).unwrap();
    }

    /// Updating one entry leaves the others untouched
    #[test]
    fn test_manifest_update_preserves_entries() {
        let path = scratch_file("update");
        let treasury = Address::repeat_byte(0x01);
        let staking = Address::repeat_byte(0x02);

        write_deployment(&path, "treasury_contract", treasury).unwrap();
        write_deployment(&path, "staking_contract", staking).unwrap();

        let redeployed = Address::repeat_byte(0x03);
        write_deployment(&path, "staking_contract", redeployed).unwrap();

        assert_eq!(read_deployment(&path, "treasury_contract").unwrap(), treasury);
        assert_eq!(read_deployment(&path, "staking_contract").unwrap(), redeployed);

        fs::remove_file(&path).unwrap();
    }

    /// Missing manifests & entries read as `None`, and as an error from the
    /// strict reader
    #[test]
    fn test_manifest_missing_entries() {
        let path = scratch_file("missing");
        assert!(try_read_deployment(&path, "treasury_contract")
            .unwrap()
            .is_none());

        write_deployment(&path, "treasury_contract", Address::ZERO).unwrap();
        assert!(try_read_deployment(&path, "staking_contract")
            .unwrap()
            .is_none());
        assert!(read_deployment(&path, "staking_contract").is_err());

        fs::remove_file(&path).unwrap();
    }

    /// Artifacts parse with or without a `0x` prefix & surrounding
    /// whitespace; empty & malformed artifacts are rejected
    #[test]
    fn test_artifact_parsing() {
        let dir = env::temp_dir();
        let name = format!("deploy-scripts-artifact-{}", std::process::id());
        let path = dir.join(format!("{name}.bin"));

        fs::write(&path, "0x60806040\n").unwrap();
        let init_code = read_artifact(&dir, &name).unwrap();
        assert_eq!(init_code.as_ref(), [0x60, 0x80, 0x60, 0x40]);

        fs::write(&path, "60806040").unwrap();
        assert_eq!(read_artifact(&dir, &name).unwrap(), init_code);

        fs::write(&path, "").unwrap();
        assert!(read_artifact(&dir, &name).is_err());

        fs::write(&path, "not hex").unwrap();
        assert!(read_artifact(&dir, &name).is_err());

        fs::remove_file(&path).unwrap();
    }
}
