use clap::Parser;
use deploy_scripts::{cli::Cli, errors::ScriptError, utils::setup_client};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        priv_key,
        rpc_url,
        deployments_path,
        confirmations,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let (client, deployer) = setup_client(&priv_key, &rpc_url)?;

    command
        .run(client, deployer, &deployments_path, confirmations)
        .await
}
