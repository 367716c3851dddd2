//! Implementations of the deploy script commands

use std::path::Path;

use alloy_primitives::Address;
use tracing::{info, warn};

use crate::{
    cli::{
        DeployArgs, DeployFactoryArgs, DeployProtocolArgs, RegisterArgs, SetupArgs, StatusArgs,
    },
    constants::{FACTORY_ARTIFACT, FACTORY_CONTRACT_KEY},
    deploy::{contract_salt, deploy_bytecode, deploy_deterministic, is_deployed},
    errors::ScriptError,
    registry::{ensure_registered, registry_entry},
    solidity::{IBondDepository, IStaking, ITokenMigrator, ITreasury},
    types::ProtocolContract,
    utils::{
        parse_addr, read_artifact, read_deployment, send_tx, try_read_deployment,
        write_deployment, Client,
    },
};

/// Bootstrap the CREATE2 factory with a plain CREATE transaction
pub async fn deploy_factory(
    args: DeployFactoryArgs,
    client: Client,
    deployments_path: &Path,
    confirmations: u64,
) -> Result<(), ScriptError> {
    if let Some(address) = try_read_deployment(deployments_path, FACTORY_CONTRACT_KEY)? {
        if is_deployed(&client, address).await? {
            info!("factory already deployed at {address:#x}, skipping");
            return Ok(());
        }
        warn!("manifest points at factory {address:#x} but no code is deployed there, redeploying");
    }

    let init_code = read_artifact(&args.artifacts, FACTORY_ARTIFACT)?;
    let address = deploy_bytecode(&client, init_code, confirmations).await?;
    write_deployment(deployments_path, FACTORY_CONTRACT_KEY, address)?;

    info!("factory deployed at {address:#x}");
    Ok(())
}

/// Deterministically deploy a single protocol contract
pub async fn deploy_contract(
    args: DeployArgs,
    client: Client,
    deployments_path: &Path,
    confirmations: u64,
) -> Result<(), ScriptError> {
    let address = deploy_single(
        args.contract,
        &args.artifacts,
        &client,
        deployments_path,
        confirmations,
    )
    .await?;

    if args.register {
        let registry =
            read_deployment(deployments_path, ProtocolContract::Registry.manifest_key())?;
        ensure_registered(
            &client,
            registry,
            &args.contract.to_string(),
            address,
            confirmations,
        )
        .await?;
    }

    Ok(())
}

/// Deploy the full protocol: every contract in dependency order, then the
/// configuration sequence, then the registry sync
pub async fn deploy_protocol(
    args: DeployProtocolArgs,
    client: Client,
    deployer: Address,
    deployments_path: &Path,
    confirmations: u64,
) -> Result<(), ScriptError> {
    for contract in ProtocolContract::DEPLOY_ORDER {
        deploy_single(
            contract,
            &args.artifacts,
            &client,
            deployments_path,
            confirmations,
        )
        .await?;
    }

    setup_protocol(
        SetupArgs {},
        client.clone(),
        deployer,
        deployments_path,
        confirmations,
    )
    .await?;

    register_contracts(
        RegisterArgs {
            contract: None,
            address: None,
        },
        client,
        deployments_path,
        confirmations,
    )
    .await
}

/// Deploy one contract through the factory & record it in the manifest
async fn deploy_single(
    contract: ProtocolContract,
    artifacts: &Path,
    client: &Client,
    deployments_path: &Path,
    confirmations: u64,
) -> Result<Address, ScriptError> {
    if contract.test_only() {
        warn!("deploying `{contract}` - THIS SHOULD ONLY BE DONE FOR TESTING");
    }

    let factory = read_deployment(deployments_path, FACTORY_CONTRACT_KEY)?;
    let init_code = read_artifact(artifacts, contract.artifact_name())?;
    let salt = contract_salt(&contract.to_string());

    let outcome = deploy_deterministic(client, factory, salt, init_code, confirmations).await?;
    if outcome.deployed {
        info!("`{contract}` deployed at {:#x}", outcome.address);
    }

    write_deployment(deployments_path, contract.manifest_key(), outcome.address)?;
    Ok(outcome.address)
}

/// Run the post-deploy configuration sequence.
///
/// Each step reads the current on-chain value and only sends the setter
/// when it differs from the desired value.
pub async fn setup_protocol(
    _args: SetupArgs,
    client: Client,
    deployer: Address,
    deployments_path: &Path,
    confirmations: u64,
) -> Result<(), ScriptError> {
    let treasury_address =
        read_deployment(deployments_path, ProtocolContract::Treasury.manifest_key())?;
    let staking_address =
        read_deployment(deployments_path, ProtocolContract::Staking.manifest_key())?;
    let distributor_address = read_deployment(
        deployments_path,
        ProtocolContract::Distributor.manifest_key(),
    )?;
    let depository_address = read_deployment(
        deployments_path,
        ProtocolContract::BondDepository.manifest_key(),
    )?;
    let migrator_address = read_deployment(
        deployments_path,
        ProtocolContract::TokenMigrator.manifest_key(),
    )?;

    // Grant the depository the reserve-depositor permission on the treasury
    let treasury = ITreasury::new(treasury_address, client.clone());
    let enabled = treasury
        .isReserveDepositor(depository_address)
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if enabled {
        info!("bond depository already enabled as a reserve depositor, skipping");
    } else {
        let owner = treasury
            .owner()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        check_owner(owner, deployer, "treasury")?;

        send_tx(
            treasury.enableReserveDepositor(depository_address),
            confirmations,
        )
        .await?;
        info!("bond depository enabled as a reserve depositor");
    }

    // Wire the staking contract to the reward distributor
    let staking = IStaking::new(staking_address, client.clone());
    let current_distributor = staking
        .distributor()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if current_distributor == distributor_address {
        info!("staking distributor already set to {distributor_address:#x}, skipping");
    } else {
        let owner = staking
            .owner()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        check_owner(owner, deployer, "staking")?;

        send_tx(staking.setDistributor(distributor_address), confirmations).await?;
        info!("staking distributor set to {distributor_address:#x}");
    }

    // Wire the bond depository to the staking contract
    let depository = IBondDepository::new(depository_address, client.clone());
    let current_staking = depository
        .staking()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if current_staking == staking_address {
        info!("depository staking contract already set to {staking_address:#x}, skipping");
    } else {
        let owner = depository
            .owner()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        check_owner(owner, deployer, "bond depository")?;

        send_tx(depository.setStaking(staking_address), confirmations).await?;
        info!("depository staking contract set to {staking_address:#x}");
    }

    // Enable migration on the token migrator
    let migrator = ITokenMigrator::new(migrator_address, client.clone());
    let migration_enabled = migrator
        .migrationEnabled()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if migration_enabled {
        info!("token migration already enabled, skipping");
    } else {
        let owner = migrator
            .owner()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        check_owner(owner, deployer, "token migrator")?;

        send_tx(migrator.enableMigration(), confirmations).await?;
        info!("token migration enabled");
    }

    Ok(())
}

/// Sync manifest addresses into the on-chain registry
pub async fn register_contracts(
    args: RegisterArgs,
    client: Client,
    deployments_path: &Path,
    confirmations: u64,
) -> Result<(), ScriptError> {
    let registry = read_deployment(deployments_path, ProtocolContract::Registry.manifest_key())?;

    if let Some(contract) = args.contract {
        let address = match &args.address {
            Some(addr) => parse_addr(addr)?,
            None => read_deployment(deployments_path, contract.manifest_key())?,
        };

        ensure_registered(&client, registry, &contract.to_string(), address, confirmations)
            .await?;
        return Ok(());
    }

    if args.address.is_some() {
        return Err(ScriptError::CalldataConstruction(
            "an explicit address requires a contract selector".to_string(),
        ));
    }

    for contract in ProtocolContract::DEPLOY_ORDER {
        // The registry needs no entry pointing at itself
        if contract == ProtocolContract::Registry {
            continue;
        }

        match try_read_deployment(deployments_path, contract.manifest_key())? {
            Some(address) => {
                ensure_registered(
                    &client,
                    registry,
                    &contract.to_string(),
                    address,
                    confirmations,
                )
                .await?;
            }
            None => info!("no manifest entry for `{contract}`, skipping"),
        }
    }

    Ok(())
}

/// Report per-contract deployment & registration status
pub async fn report_status(
    _args: StatusArgs,
    client: Client,
    deployments_path: &Path,
) -> Result<(), ScriptError> {
    let registry = try_read_deployment(deployments_path, ProtocolContract::Registry.manifest_key())?;

    match try_read_deployment(deployments_path, FACTORY_CONTRACT_KEY)? {
        Some(address) => {
            let code = is_deployed(&client, address).await?;
            info!("factory: {address:#x} (code: {code})");
        }
        None => info!("factory: not deployed"),
    }

    for contract in ProtocolContract::ALL {
        let Some(address) = try_read_deployment(deployments_path, contract.manifest_key())? else {
            info!("`{contract}`: not deployed");
            continue;
        };

        let code = is_deployed(&client, address).await?;
        if contract == ProtocolContract::Registry {
            info!("`{contract}`: {address:#x} (code: {code})");
            continue;
        }

        let registered = match registry {
            Some(registry_address) => {
                registry_entry(&client, registry_address, &contract.to_string()).await? == address
            }
            None => false,
        };
        info!("`{contract}`: {address:#x} (code: {code}, registered: {registered})");
    }

    Ok(())
}

/// Check that the deployer controls the given admin contract before sending
/// a transaction that would otherwise revert on-chain
fn check_owner(owner: Address, deployer: Address, contract: &str) -> Result<(), ScriptError> {
    if owner != deployer {
        return Err(ScriptError::PermissionCheck(format!(
            "deployer {deployer:#x} is not the owner of the {contract} contract (owner is {owner:#x})",
        )));
    }

    Ok(())
}
