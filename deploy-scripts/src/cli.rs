//! Definitions of CLI arguments and commands for the deploy scripts

use std::path::{Path, PathBuf};

use alloy_primitives::Address;
use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{
        deploy_contract, deploy_factory, deploy_protocol, register_contracts, report_status,
        setup_protocol,
    },
    constants::DEFAULT_DEPLOY_CONFIRMATIONS,
    errors::ScriptError,
    types::ProtocolContract,
    utils::Client,
};

/// The CLI for the protocol deploy scripts
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer
    // TODO: Better key management
    #[arg(short, long, env = "DEPLOYER_PRIV_KEY")]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Path to the deployments manifest for the target network
    #[arg(short, long, default_value = "deployments.json")]
    pub deployments_path: PathBuf,

    /// The number of confirmations to wait for after each transaction
    #[arg(short, long, default_value_t = DEFAULT_DEPLOY_CONFIRMATIONS)]
    pub confirmations: u64,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The deploy script commands
#[derive(Subcommand)]
pub enum Command {
    /// Bootstrap the CREATE2 factory on the target network
    DeployFactory(DeployFactoryArgs),
    /// Deterministically deploy a single protocol contract
    Deploy(DeployArgs),
    /// Deploy the full protocol, configure it, and sync the registry
    DeployProtocol(DeployProtocolArgs),
    /// Run the post-deploy configuration sequence
    Setup(SetupArgs),
    /// Sync manifest addresses into the on-chain registry
    Register(RegisterArgs),
    /// Report per-contract deployment & registration status
    Status(StatusArgs),
}

impl Command {
    /// Run the command
    pub async fn run(
        self,
        client: Client,
        deployer: Address,
        deployments_path: &Path,
        confirmations: u64,
    ) -> Result<(), ScriptError> {
        match self {
            Command::DeployFactory(args) => {
                deploy_factory(args, client, deployments_path, confirmations).await
            }
            Command::Deploy(args) => {
                deploy_contract(args, client, deployments_path, confirmations).await
            }
            Command::DeployProtocol(args) => {
                deploy_protocol(args, client, deployer, deployments_path, confirmations).await
            }
            Command::Setup(args) => {
                setup_protocol(args, client, deployer, deployments_path, confirmations).await
            }
            Command::Register(args) => {
                register_contracts(args, client, deployments_path, confirmations).await
            }
            Command::Status(args) => report_status(args, client, deployments_path).await,
        }
    }
}

/// Bootstrap the CREATE2 factory.
///
/// The factory is deployed with a plain CREATE transaction since no factory
/// exists to deploy through yet. If the manifest already points at a live
/// factory, nothing is sent.
#[derive(Args)]
pub struct DeployFactoryArgs {
    /// Directory containing the init code artifacts
    #[arg(short, long)]
    pub artifacts: PathBuf,
}

/// Deterministically deploy a single protocol contract through the factory.
///
/// The deployment is skipped if code already exists at the precomputed
/// address; either way the address is recorded in the manifest.
#[derive(Args)]
pub struct DeployArgs {
    /// The contract to deploy
    #[arg(short, long)]
    pub contract: ProtocolContract,

    /// Directory containing the init code artifacts
    #[arg(short, long)]
    pub artifacts: PathBuf,

    /// Also publish the address to the on-chain registry
    #[arg(long)]
    pub register: bool,
}

/// Deploy every protocol contract in dependency order, then configure the
/// protocol and sync the registry
#[derive(Args)]
pub struct DeployProtocolArgs {
    /// Directory containing the init code artifacts
    #[arg(short, long)]
    pub artifacts: PathBuf,
}

/// Run the post-deploy configuration sequence against the addresses in the
/// manifest.
///
/// Every step checks current on-chain state first, so a fully configured
/// protocol results in zero transactions.
#[derive(Args)]
pub struct SetupArgs {}

/// Sync manifest addresses into the on-chain registry
#[derive(Args)]
pub struct RegisterArgs {
    /// Restrict the sync to a single contract
    #[arg(short, long)]
    pub contract: Option<ProtocolContract>,

    /// Register this address instead of the manifest entry; requires
    /// `--contract`
    #[arg(long)]
    pub address: Option<String>,
}

/// Report per-contract deployment & registration status; sends no
/// transactions
#[derive(Args)]
pub struct StatusArgs {}

#[cfg(test)]
mod tests {
    //! Tests for the CLI shape

    use clap::CommandFactory;

    use super::Cli;

    /// The clap definition is internally consistent
    #[test]
    fn test_cli_shape() {
        Cli::command().debug_assert();
    }
}
