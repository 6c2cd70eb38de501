//! Dankcoin chain parameters
//!
//! This crate defines the consensus-critical parameters of every Dankcoin
//! network (main, test, regtest and the in-process unit-test harness),
//! builds and verifies each genesis block, carries the checkpoint tables and
//! keeps track of which network the process has selected.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod block;
pub mod checkpoints;
pub mod genesis;
pub mod hash;
pub mod network;
pub mod networks;
pub mod overrides;
pub mod params;
pub mod registry;
pub mod seeds;

pub use checkpoints::{ChainTip, CheckpointData};
pub use genesis::{GenesisBlock, GenesisInputs};
pub use hash::{Hash256, Target};
pub use network::{Base58Prefixes, Base58Type, NetworkId, NetworkSelection};
pub use overrides::{ChainParamsOverrides, GenesisOverride, ParamField, UnitTestOverrides};
pub use params::{ChainFlags, ChainParams, DnsSeed, MajorityThresholds};
pub use registry::{
    modifiable_params, params, params_for, registry, select_params,
    select_params_from_selection, ChainParamsRegistry, ModifiableParams,
};
pub use seeds::{SeedAddress, SeedSpec6};

/// Error types for chain parameter operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Computed genesis hash differs from the declared one
    #[error("Genesis hash mismatch on {network}: expected {expected}, computed {computed}")]
    GenesisHashMismatch {
        /// Network being constructed
        network: NetworkId,
        /// Declared hash
        expected: Hash256,
        /// Hash computed from the genesis inputs
        computed: Hash256,
    },

    /// Computed genesis merkle root differs from the declared one
    #[error("Genesis merkle root mismatch on {network}: expected {expected}, computed {computed}")]
    GenesisMerkleRootMismatch {
        /// Network being constructed
        network: NetworkId,
        /// Declared merkle root
        expected: Hash256,
        /// Merkle root computed from the coinbase
        computed: Hash256,
    },

    /// Active parameters requested before any network was selected
    #[error("No network selected")]
    NoNetworkSelected,

    /// Parameter mutation requested while a non-unittest network is active
    #[error("Parameters of network {0} are not modifiable")]
    NotModifiable(NetworkId),

    /// Network name outside the known set
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    /// More than one network requested at once
    #[error("Conflicting network selection: at most one of testnet, regtest and unittest may be set")]
    ConflictingNetworks,

    /// Checkpoint heights are not strictly increasing
    #[error("Checkpoint at height {height} does not follow checkpoint at height {previous}")]
    CheckpointOrder {
        /// Height of the preceding checkpoint
        previous: u32,
        /// Offending height
        height: u32,
    },

    /// Malformed hash literal
    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    /// Malformed hex literal
    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, Error>;
