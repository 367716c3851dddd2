//! Type definitions used throughout the deploy scripts

use std::fmt::{self, Display};

use clap::ValueEnum;

use crate::constants::{
    BOND_DEPOSITORY_CONTRACT_KEY, DISTRIBUTOR_CONTRACT_KEY, REGISTRY_CONTRACT_KEY,
    STAKING_CONTRACT_KEY, TEST_RESERVE_TOKEN_CONTRACT_KEY, TOKEN_MIGRATOR_CONTRACT_KEY,
    TREASURY_CONTRACT_KEY,
};

/// The protocol contracts managed by the deploy scripts
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProtocolContract {
    /// The on-chain address registry
    Registry,
    /// The treasury contract
    Treasury,
    /// The bond depository contract
    BondDepository,
    /// The staking contract
    Staking,
    /// The staking reward distributor contract
    Distributor,
    /// The token migrator contract
    TokenMigrator,
    /// A mintable reserve token, used on devnets only
    TestReserveToken,
}

impl ProtocolContract {
    /// Every contract the scripts know about
    pub const ALL: [Self; 7] = [
        Self::Registry,
        Self::Treasury,
        Self::Staking,
        Self::Distributor,
        Self::BondDepository,
        Self::TokenMigrator,
        Self::TestReserveToken,
    ];

    /// The contracts of a full protocol deployment, in dependency order.
    ///
    /// The registry comes first so that later deployments can be registered
    /// as they land; the depository and migrator come last since their
    /// configuration references the other contracts.
    pub const DEPLOY_ORDER: [Self; 6] = [
        Self::Registry,
        Self::Treasury,
        Self::Staking,
        Self::Distributor,
        Self::BondDepository,
        Self::TokenMigrator,
    ];

    /// The name of the contract's init code artifact
    pub fn artifact_name(&self) -> &'static str {
        match self {
            ProtocolContract::Registry => "AddressRegistry",
            ProtocolContract::Treasury => "Treasury",
            ProtocolContract::BondDepository => "BondDepository",
            ProtocolContract::Staking => "Staking",
            ProtocolContract::Distributor => "StakingDistributor",
            ProtocolContract::TokenMigrator => "TokenMigrator",
            ProtocolContract::TestReserveToken => "TestReserveToken",
        }
    }

    /// The contract's key in the deployments manifest
    pub fn manifest_key(&self) -> &'static str {
        match self {
            ProtocolContract::Registry => REGISTRY_CONTRACT_KEY,
            ProtocolContract::Treasury => TREASURY_CONTRACT_KEY,
            ProtocolContract::BondDepository => BOND_DEPOSITORY_CONTRACT_KEY,
            ProtocolContract::Staking => STAKING_CONTRACT_KEY,
            ProtocolContract::Distributor => DISTRIBUTOR_CONTRACT_KEY,
            ProtocolContract::TokenMigrator => TOKEN_MIGRATOR_CONTRACT_KEY,
            ProtocolContract::TestReserveToken => TEST_RESERVE_TOKEN_CONTRACT_KEY,
        }
    }

    /// Whether the contract should only ever be deployed for testing
    pub fn test_only(&self) -> bool {
        matches!(self, ProtocolContract::TestReserveToken)
    }
}

impl Display for ProtocolContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolContract::Registry => write!(f, "registry"),
            ProtocolContract::Treasury => write!(f, "treasury"),
            ProtocolContract::BondDepository => write!(f, "bond-depository"),
            ProtocolContract::Staking => write!(f, "staking"),
            ProtocolContract::Distributor => write!(f, "distributor"),
            ProtocolContract::TokenMigrator => write!(f, "token-migrator"),
            ProtocolContract::TestReserveToken => write!(f, "test-reserve-token"),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Tests for the contract name mappings

    use std::collections::HashSet;

    use super::ProtocolContract;

    /// The display names double as on-chain registry keys, so they must be
    /// distinct and stable
    #[test]
    fn test_display_names_distinct() {
        let names: HashSet<String> = ProtocolContract::ALL
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(names.len(), ProtocolContract::ALL.len());
    }

    /// Manifest keys must be distinct so no contract overwrites another's
    /// manifest entry
    #[test]
    fn test_manifest_keys_distinct() {
        let keys: HashSet<&str> = ProtocolContract::ALL
            .iter()
            .map(|c| c.manifest_key())
            .collect();
        assert_eq!(keys.len(), ProtocolContract::ALL.len());
    }

    /// A full deployment covers every contract exactly once, except the
    /// test-only ones
    #[test]
    fn test_deploy_order_covers_protocol() {
        let deployed: HashSet<String> = ProtocolContract::DEPLOY_ORDER
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(deployed.len(), ProtocolContract::DEPLOY_ORDER.len());

        for contract in ProtocolContract::ALL {
            assert_eq!(
                deployed.contains(&contract.to_string()),
                !contract.test_only(),
            );
        }
    }
}
