//! Constants used in the deploy scripts

/// The default number of confirmations to wait for after each transaction
pub const DEFAULT_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The namespace prefixed to contract names when deriving CREATE2 salts.
///
/// Bumping this namespace moves every contract to a fresh set of
/// deterministic addresses, which is how a new protocol version is deployed
/// alongside an old one.
pub const SALT_NAMESPACE: &str = "bond-protocol.v1";

/// The file extension of init code artifacts
pub const ARTIFACT_EXTENSION: &str = "bin";

/// The artifact name of the CREATE2 factory contract
pub const FACTORY_ARTIFACT: &str = "Create2Factory";

/// The deployments key in the deployments manifest
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The CREATE2 factory contract key in the deployments manifest
pub const FACTORY_CONTRACT_KEY: &str = "create2_factory_contract";

/// The address registry contract key in the deployments manifest
pub const REGISTRY_CONTRACT_KEY: &str = "registry_contract";

/// The treasury contract key in the deployments manifest
pub const TREASURY_CONTRACT_KEY: &str = "treasury_contract";

/// The bond depository contract key in the deployments manifest
pub const BOND_DEPOSITORY_CONTRACT_KEY: &str = "bond_depository_contract";

/// The staking contract key in the deployments manifest
pub const STAKING_CONTRACT_KEY: &str = "staking_contract";

/// The staking distributor contract key in the deployments manifest
pub const DISTRIBUTOR_CONTRACT_KEY: &str = "distributor_contract";

/// The token migrator contract key in the deployments manifest
pub const TOKEN_MIGRATOR_CONTRACT_KEY: &str = "token_migrator_contract";

/// The test reserve token contract key in the deployments manifest
pub const TEST_RESERVE_TOKEN_CONTRACT_KEY: &str = "test_reserve_token_contract";
