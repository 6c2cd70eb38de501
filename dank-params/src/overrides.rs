//! Explicit override tables
//!
//! A derived network is its base plus one of these tables, so what differs
//! from main is plain data that can be listed and compared.

use crate::checkpoints::CheckpointData;
use crate::hash::{Hash256, Target};
use crate::network::Base58Prefixes;
use crate::params::{ChainParams, DnsSeed, MajorityThresholds};
use crate::seeds::SeedSpec6;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Name of an overridable parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ParamField {
    /// P2P message start bytes
    MessageStart,
    /// Alert public key
    AlertPubkey,
    /// Default port
    DefaultPort,
    /// Proof-of-work limit
    PowLimit,
    /// Subsidy halving interval
    SubsidyHalvingInterval,
    /// Supermajority thresholds
    Majority,
    /// Default miner threads
    MinerThreads,
    /// Retarget timespan
    TargetTimespan,
    /// Block spacing
    TargetSpacing,
    /// Base58 prefixes
    Base58Prefixes,
    /// Mandatory v2 height
    EnforceV2AfterHeight,
    /// Fixed seeds
    FixedSeeds,
    /// DNS seeds
    DnsSeeds,
    /// Genesis block
    Genesis,
    /// Checkpoint table
    Checkpoints,
    /// Flag: RPC password
    RequireRpcPassword,
    /// Flag: mining requires peers
    MiningRequiresPeers,
    /// Flag: min-difficulty blocks
    AllowMinDifficultyBlocks,
    /// Flag: consistency checks
    DefaultConsistencyChecks,
    /// Flag: standard transactions only
    RequireStandard,
    /// Flag: on-demand block generation
    MineBlocksOnDemand,
    /// Flag: skip proof of work
    SkipProofOfWorkCheck,
    /// Flag: deprecated `testnet` RPC field
    TestnetToBeDeprecatedFieldRpc,
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Genesis header changes and the hash they must produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisOverride {
    /// Block time
    pub time: Option<u32>,
    /// Compact difficulty
    pub bits: Option<u32>,
    /// Nonce
    pub nonce: Option<u32>,
    /// Declared hash of the rebuilt block
    pub expected_hash: Hash256,
}

/// Field overrides applied on top of a base network
#[derive(Debug, Clone, Default)]
pub struct ChainParamsOverrides {
    /// P2P message start bytes
    pub message_start: Option<[u8; 4]>,
    /// Alert public key
    pub alert_pubkey: Option<Vec<u8>>,
    /// Default port
    pub default_port: Option<u16>,
    /// Proof-of-work limit
    pub pow_limit: Option<Target>,
    /// Subsidy halving interval
    pub subsidy_halving_interval: Option<u32>,
    /// Supermajority thresholds
    pub majority: Option<MajorityThresholds>,
    /// Default miner threads
    pub miner_threads: Option<u32>,
    /// Retarget timespan
    pub target_timespan: Option<u64>,
    /// Block spacing
    pub target_spacing: Option<u64>,
    /// Base58 prefixes
    pub base58_prefixes: Option<Base58Prefixes>,
    /// Mandatory v2 height (`Some(None)` clears it)
    pub enforce_v2_after_height: Option<Option<u32>>,
    /// Fixed seed records
    pub fixed_seeds: Option<Vec<SeedSpec6>>,
    /// DNS seeds
    pub dns_seeds: Option<Vec<DnsSeed>>,
    /// Genesis header changes
    pub genesis: Option<GenesisOverride>,
    /// Checkpoint table
    pub checkpoints: Option<Arc<CheckpointData>>,
    /// Flag: RPC password
    pub require_rpc_password: Option<bool>,
    /// Flag: mining requires peers
    pub mining_requires_peers: Option<bool>,
    /// Flag: min-difficulty blocks
    pub allow_min_difficulty_blocks: Option<bool>,
    /// Flag: consistency checks
    pub default_consistency_checks: Option<bool>,
    /// Flag: standard transactions only
    pub require_standard: Option<bool>,
    /// Flag: on-demand block generation
    pub mine_blocks_on_demand: Option<bool>,
    /// Flag: skip proof of work
    pub skip_proof_of_work_check: Option<bool>,
    /// Flag: deprecated `testnet` RPC field
    pub testnet_to_be_deprecated_field_rpc: Option<bool>,
}

impl ChainParamsOverrides {
    /// Fields this table overrides
    pub fn fields(&self) -> Vec<ParamField> {
        let set = [
            (ParamField::MessageStart, self.message_start.is_some()),
            (ParamField::AlertPubkey, self.alert_pubkey.is_some()),
            (ParamField::DefaultPort, self.default_port.is_some()),
            (ParamField::PowLimit, self.pow_limit.is_some()),
            (ParamField::SubsidyHalvingInterval, self.subsidy_halving_interval.is_some()),
            (ParamField::Majority, self.majority.is_some()),
            (ParamField::MinerThreads, self.miner_threads.is_some()),
            (ParamField::TargetTimespan, self.target_timespan.is_some()),
            (ParamField::TargetSpacing, self.target_spacing.is_some()),
            (ParamField::Base58Prefixes, self.base58_prefixes.is_some()),
            (ParamField::EnforceV2AfterHeight, self.enforce_v2_after_height.is_some()),
            (ParamField::FixedSeeds, self.fixed_seeds.is_some()),
            (ParamField::DnsSeeds, self.dns_seeds.is_some()),
            (ParamField::Genesis, self.genesis.is_some()),
            (ParamField::Checkpoints, self.checkpoints.is_some()),
            (ParamField::RequireRpcPassword, self.require_rpc_password.is_some()),
            (ParamField::MiningRequiresPeers, self.mining_requires_peers.is_some()),
            (ParamField::AllowMinDifficultyBlocks, self.allow_min_difficulty_blocks.is_some()),
            (ParamField::DefaultConsistencyChecks, self.default_consistency_checks.is_some()),
            (ParamField::RequireStandard, self.require_standard.is_some()),
            (ParamField::MineBlocksOnDemand, self.mine_blocks_on_demand.is_some()),
            (ParamField::SkipProofOfWorkCheck, self.skip_proof_of_work_check.is_some()),
            (
                ParamField::TestnetToBeDeprecatedFieldRpc,
                self.testnet_to_be_deprecated_field_rpc.is_some(),
            ),
        ];

        set.into_iter().filter(|(_, present)| *present).map(|(field, _)| field).collect()
    }
}

/// Per-test-case changes to the unit test network.
///
/// Only these fields may change after construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitTestOverrides {
    /// Blocks between subsidy halvings
    pub subsidy_halving_interval: Option<u32>,
    /// Enforce threshold
    pub enforce_block_upgrade_majority: Option<u32>,
    /// Reject threshold
    pub reject_block_outdated_majority: Option<u32>,
    /// Sampling window
    pub to_check_block_upgrade_majority: Option<u32>,
    /// Consistency checks flag
    pub default_consistency_checks: Option<bool>,
    /// Min-difficulty flag
    pub allow_min_difficulty_blocks: Option<bool>,
    /// Skip proof-of-work flag
    pub skip_proof_of_work_check: Option<bool>,
}

impl UnitTestOverrides {
    /// Write the set fields into `params`
    pub(crate) fn apply_to(&self, params: &mut ChainParams) {
        if let Some(v) = self.subsidy_halving_interval {
            params.subsidy_halving_interval = v;
        }
        if let Some(v) = self.enforce_block_upgrade_majority {
            params.majority.enforce_block_upgrade = v;
        }
        if let Some(v) = self.reject_block_outdated_majority {
            params.majority.reject_block_outdated = v;
        }
        if let Some(v) = self.to_check_block_upgrade_majority {
            params.majority.to_check_block_upgrade = v;
        }
        if let Some(v) = self.default_consistency_checks {
            params.flags.default_consistency_checks = v;
        }
        if let Some(v) = self.allow_min_difficulty_blocks {
            params.flags.allow_min_difficulty_blocks = v;
        }
        if let Some(v) = self.skip_proof_of_work_check {
            params.flags.skip_proof_of_work_check = v;
        }
    }
}
