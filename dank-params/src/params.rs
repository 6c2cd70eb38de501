//! Per-network chain parameters

use crate::checkpoints::CheckpointData;
use crate::genesis::GenesisBlock;
use crate::hash::{Hash256, Target};
use crate::network::{Base58Prefixes, Base58Type, NetworkId};
use crate::overrides::{ChainParamsOverrides, ParamField};
use crate::seeds::{convert_seed6, SeedAddress};
use crate::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// DNS seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsSeed {
    /// Operator name
    pub name: String,
    /// Hostname to resolve
    pub host: String,
}

impl DnsSeed {
    /// Create a DNS seed entry
    pub fn new(name: &str, host: &str) -> Self {
        Self {
            name: name.to_string(),
            host: host.to_string(),
        }
    }
}

/// Block version supermajority thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorityThresholds {
    /// Blocks in the window that must signal before the new rules are enforced
    pub enforce_block_upgrade: u32,
    /// Blocks in the window that must signal before old versions are rejected
    pub reject_block_outdated: u32,
    /// Size of the sampling window
    pub to_check_block_upgrade: u32,
}

/// Behavioral switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainFlags {
    /// RPC requires a password
    pub require_rpc_password: bool,
    /// Mining waits for connected peers
    pub mining_requires_peers: bool,
    /// Accept min-difficulty blocks after a long gap
    pub allow_min_difficulty_blocks: bool,
    /// Run expensive internal consistency checks by default
    pub default_consistency_checks: bool,
    /// Only relay and mine standard transactions
    pub require_standard: bool,
    /// Blocks may be generated on demand over RPC
    pub mine_blocks_on_demand: bool,
    /// Skip proof-of-work validation
    pub skip_proof_of_work_check: bool,
    /// Keep the deprecated `testnet` RPC field
    pub testnet_to_be_deprecated_field_rpc: bool,
}

/// Consensus and network parameters of one network
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainParams {
    /// Network identifier
    pub network_id: NetworkId,
    /// P2P message start bytes
    #[serde(with = "hex::serde")]
    pub message_start: [u8; 4],
    /// Alert signing public key
    #[serde(with = "hex::serde")]
    pub alert_pubkey: Vec<u8>,
    /// Default P2P port
    pub default_port: u16,
    /// Highest allowed proof-of-work target
    pub pow_limit: Target,
    /// Blocks between subsidy halvings
    pub subsidy_halving_interval: u32,
    /// Block version supermajority thresholds
    pub majority: MajorityThresholds,
    /// Default number of miner threads (0 = one per core)
    pub miner_threads: u32,
    /// Difficulty retarget timespan in seconds
    pub target_timespan: u64,
    /// Target block spacing in seconds
    pub target_spacing: u64,
    /// Base58 version bytes
    pub base58_prefixes: Base58Prefixes,
    /// Behavioral switches
    pub flags: ChainFlags,
    /// Height after which v2 blocks are mandatory; `None` falls back to the
    /// supermajority rule
    pub enforce_v2_after_height: Option<u32>,
    /// Fixed seed nodes
    pub fixed_seeds: Vec<SeedAddress>,
    /// DNS seeds
    pub dns_seeds: Vec<DnsSeed>,
    /// Genesis block
    pub genesis: GenesisBlock,
    /// Checkpoint table
    pub checkpoints: Arc<CheckpointData>,
}

impl ChainParams {
    /// Canonical network name
    pub fn network_name(&self) -> &'static str {
        self.network_id.as_str()
    }

    /// Genesis block hash
    pub fn genesis_hash(&self) -> Hash256 {
        self.genesis.hash()
    }

    /// Blocks between difficulty retargets
    pub fn difficulty_adjustment_interval(&self) -> u64 {
        self.target_timespan / self.target_spacing
    }

    /// Base58 prefix for a role
    pub fn base58_prefix(&self, kind: Base58Type) -> &[u8] {
        self.base58_prefixes.get(kind)
    }

    /// Checkpoint hash required at `height`
    pub fn checkpoint_at(&self, height: u32) -> Option<&Hash256> {
        self.checkpoints.hash_at(height)
    }

    /// Sync progress estimate for `height` at time `now`
    pub fn estimate_progress(&self, height: u32, now: i64) -> f64 {
        self.checkpoints.estimate_progress(height, now, self.target_spacing)
    }

    /// Derive a network from `base` by applying `overrides`.
    ///
    /// Fields without an override are inherited unchanged. A genesis override
    /// rebuilds the block and verifies it against its declared hash.
    pub fn derive<R: Rng + ?Sized>(
        base: &ChainParams,
        network_id: NetworkId,
        overrides: &ChainParamsOverrides,
        now: i64,
        rng: &mut R,
    ) -> Result<ChainParams> {
        let mut params = base.clone();
        params.network_id = network_id;

        if let Some(v) = overrides.message_start {
            params.message_start = v;
        }
        if let Some(v) = &overrides.alert_pubkey {
            params.alert_pubkey = v.clone();
        }
        if let Some(v) = overrides.default_port {
            params.default_port = v;
        }
        if let Some(v) = overrides.pow_limit {
            params.pow_limit = v;
        }
        if let Some(v) = overrides.subsidy_halving_interval {
            params.subsidy_halving_interval = v;
        }
        if let Some(v) = overrides.majority {
            params.majority = v;
        }
        if let Some(v) = overrides.miner_threads {
            params.miner_threads = v;
        }
        if let Some(v) = overrides.target_timespan {
            params.target_timespan = v;
        }
        if let Some(v) = overrides.target_spacing {
            params.target_spacing = v;
        }
        if let Some(v) = &overrides.base58_prefixes {
            params.base58_prefixes = v.clone();
        }
        if let Some(v) = overrides.enforce_v2_after_height {
            params.enforce_v2_after_height = v;
        }
        if let Some(seeds) = &overrides.fixed_seeds {
            params.fixed_seeds = convert_seed6(seeds, now, rng);
        }
        if let Some(v) = &overrides.dns_seeds {
            params.dns_seeds = v.clone();
        }
        if let Some(v) = &overrides.checkpoints {
            params.checkpoints = Arc::clone(v);
        }

        let flags = &mut params.flags;
        let set = |slot: &mut bool, value: Option<bool>| {
            if let Some(v) = value {
                *slot = v;
            }
        };
        set(&mut flags.require_rpc_password, overrides.require_rpc_password);
        set(&mut flags.mining_requires_peers, overrides.mining_requires_peers);
        set(&mut flags.allow_min_difficulty_blocks, overrides.allow_min_difficulty_blocks);
        set(&mut flags.default_consistency_checks, overrides.default_consistency_checks);
        set(&mut flags.require_standard, overrides.require_standard);
        set(&mut flags.mine_blocks_on_demand, overrides.mine_blocks_on_demand);
        set(&mut flags.skip_proof_of_work_check, overrides.skip_proof_of_work_check);
        set(
            &mut flags.testnet_to_be_deprecated_field_rpc,
            overrides.testnet_to_be_deprecated_field_rpc,
        );

        if let Some(genesis) = &overrides.genesis {
            let header = base.genesis.header();
            let rebuilt = base.genesis.with_header(
                genesis.time.unwrap_or(header.time),
                genesis.bits.unwrap_or(header.bits),
                genesis.nonce.unwrap_or(header.nonce),
            );
            rebuilt.verify(network_id, genesis.expected_hash, base.genesis.merkle_root())?;
            params.genesis = rebuilt;
        }

        tracing::debug!(
            network = %network_id,
            base = %base.network_id,
            overrides = overrides.fields().len(),
            "Derived chain parameters"
        );
        Ok(params)
    }

    /// Fields whose values differ from `other`.
    ///
    /// Fixed seeds compare by address and port, since their last-seen times
    /// are randomized; the genesis block compares by hash.
    pub fn differing_fields(&self, other: &ChainParams) -> Vec<ParamField> {
        let seeds_match = self.fixed_seeds.len() == other.fixed_seeds.len()
            && self
                .fixed_seeds
                .iter()
                .zip(other.fixed_seeds.iter())
                .all(|(a, b)| a.addr == b.addr && a.port == b.port);

        let checks = [
            (ParamField::MessageStart, self.message_start == other.message_start),
            (ParamField::AlertPubkey, self.alert_pubkey == other.alert_pubkey),
            (ParamField::DefaultPort, self.default_port == other.default_port),
            (ParamField::PowLimit, self.pow_limit == other.pow_limit),
            (
                ParamField::SubsidyHalvingInterval,
                self.subsidy_halving_interval == other.subsidy_halving_interval,
            ),
            (ParamField::Majority, self.majority == other.majority),
            (ParamField::MinerThreads, self.miner_threads == other.miner_threads),
            (ParamField::TargetTimespan, self.target_timespan == other.target_timespan),
            (ParamField::TargetSpacing, self.target_spacing == other.target_spacing),
            (ParamField::Base58Prefixes, self.base58_prefixes == other.base58_prefixes),
            (
                ParamField::EnforceV2AfterHeight,
                self.enforce_v2_after_height == other.enforce_v2_after_height,
            ),
            (ParamField::FixedSeeds, seeds_match),
            (ParamField::DnsSeeds, self.dns_seeds == other.dns_seeds),
            (ParamField::Genesis, self.genesis.hash() == other.genesis.hash()),
            (ParamField::Checkpoints, *self.checkpoints == *other.checkpoints),
            (
                ParamField::RequireRpcPassword,
                self.flags.require_rpc_password == other.flags.require_rpc_password,
            ),
            (
                ParamField::MiningRequiresPeers,
                self.flags.mining_requires_peers == other.flags.mining_requires_peers,
            ),
            (
                ParamField::AllowMinDifficultyBlocks,
                self.flags.allow_min_difficulty_blocks == other.flags.allow_min_difficulty_blocks,
            ),
            (
                ParamField::DefaultConsistencyChecks,
                self.flags.default_consistency_checks == other.flags.default_consistency_checks,
            ),
            (
                ParamField::RequireStandard,
                self.flags.require_standard == other.flags.require_standard,
            ),
            (
                ParamField::MineBlocksOnDemand,
                self.flags.mine_blocks_on_demand == other.flags.mine_blocks_on_demand,
            ),
            (
                ParamField::SkipProofOfWorkCheck,
                self.flags.skip_proof_of_work_check == other.flags.skip_proof_of_work_check,
            ),
            (
                ParamField::TestnetToBeDeprecatedFieldRpc,
                self.flags.testnet_to_be_deprecated_field_rpc
                    == other.flags.testnet_to_be_deprecated_field_rpc,
            ),
        ];

        checks
            .into_iter()
            .filter(|(_, same)| !same)
            .map(|(field, _)| field)
            .collect()
    }

    /// Pretty JSON dump
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
