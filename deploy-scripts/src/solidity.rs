//! Definitions of Solidity functions called during deployment & configuration

use alloy::sol;

sol! {
    /// The factory through which protocol contracts are deployed at
    /// deterministic (CREATE2) addresses
    #[sol(rpc)]
    interface ICreate2Factory {
        function deploy(bytes32 salt, bytes initCode) external payable returns (address deployed);
    }

    /// The on-chain address registry publishing canonical contract locations.
    ///
    /// An unregistered name reads as the zero address.
    #[sol(rpc)]
    interface IAddressRegistry {
        function owner() external view returns (address);
        function get(string name) external view returns (address);
        function set(string name, address value) external;
    }

    /// The administrative surface of the treasury
    #[sol(rpc)]
    interface ITreasury {
        function owner() external view returns (address);
        function isReserveDepositor(address depositor) external view returns (bool);
        function enableReserveDepositor(address depositor) external;
    }

    /// The administrative surface of the staking contract
    #[sol(rpc)]
    interface IStaking {
        function owner() external view returns (address);
        function distributor() external view returns (address);
        function setDistributor(address distributor) external;
    }

    /// The administrative surface of the bond depository
    #[sol(rpc)]
    interface IBondDepository {
        function owner() external view returns (address);
        function staking() external view returns (address);
        function setStaking(address staking) external;
    }

    /// The administrative surface of the token migrator
    #[sol(rpc)]
    interface ITokenMigrator {
        function owner() external view returns (address);
        function migrationEnabled() external view returns (bool);
        function enableMigration() external;
    }
}
