//! Built-in network definitions
//!
//! Main is written out in full. Testnet, regtest and unittest are override
//! tables applied to their base, in that construction order.

use crate::block::COIN;
use crate::checkpoints::CheckpointData;
use crate::genesis::{pay_to_pubkey, GenesisBlock, GenesisInputs};
use crate::hash::{Hash256, Target};
use crate::network::{Base58Prefixes, NetworkId};
use crate::overrides::{ChainParamsOverrides, GenesisOverride};
use crate::params::{ChainFlags, ChainParams, DnsSeed, MajorityThresholds};
use crate::seeds::{convert_seed6, MAIN_SEEDS, TESTNET_SEEDS};
use crate::Result;
use rand::Rng;
use std::sync::Arc;

/// Message embedded in every genesis coinbase
pub const GENESIS_MESSAGE: &str =
    "DANK times 14/Nov/2015 Breaking News - You can now share Rare Pepes using Dankcoin";

/// Recipient of the genesis coinbase output
const GENESIS_OUTPUT_PUBKEY: &str = "049ed967f7c8fdcbe176c3b6455320ad92afd399d4cee77cc28060c3f415a654d327083d10f8b62486d6b94214529fc95dd16b888663a89a2f93ce0be466f01fd7";

const MAIN_ALERT_PUBKEY: &str = "04dd495d02a611dffc9647dd1a50e5f84ae4114f7324903d55b2d9a10f77d3aea02db3e19e0f342b698c4c640f376287a4c09146bf71860730c9d467f467fe937d";
const TESTNET_ALERT_PUBKEY: &str = "048d084203c95c7dc8347cde083f849002a33d01326854954481686abf83fb9bbc80fbc01e71dbcdd41c0326f42b5e06885722fbc23a2fa94da17bdb65bdd608a8";

/// Declared main genesis hash
pub const MAIN_GENESIS_HASH: &str = "ace489e89e9b99dc4e83076aafbd8d7b91101d735f6f4d2857166b3e53e01b30";
/// Declared testnet genesis hash
pub const TESTNET_GENESIS_HASH: &str = "fd02c3b498848a37683a2db3c2d6347f0ac99545e5ce0cc42551887625e940d9";
/// Declared regtest genesis hash
pub const REGTEST_GENESIS_HASH: &str = "4ef245bd3d4da0fd9070586d897345a694deafcdc7457febcf1af05bb442d8d4";
/// Declared genesis merkle root, shared by every network
pub const GENESIS_MERKLE_ROOT: &str = "8785cd2a9d8d3b1b8a251bdc50ae2dcaa281fc02db90f15191140106c00c92d8";

const TARGET_TIMESPAN: u64 = 7 * 24 * 60 * 60 / 2; // 3.5 days
const TARGET_SPACING: u64 = 5 * 60 / 2; // 2.5 minutes

/// Main checkpoints
pub fn main_checkpoints() -> Result<CheckpointData> {
    CheckpointData::new(
        &[
            (0, MAIN_GENESIS_HASH),
            (1, "faee446cd46a9802b01aba659240186cc4ce3b46f59949d0305f8ba5ef439f16"),
            (2, "dc9aee80648c1cfa16546a496aee97a3ba093ca0ca812bb7bde21c7141a17a47"),
            (25, "93c23a926cb099a02180fa63c346a4d24df8efc94c56447e82fdfd7e96c72cd7"),
            (50, "ecec9d2d181dc8b5444265a019c8ec2fb028c79ac7fbfbf2a16b64b333073309"),
            (95, "ae26a1e76046676745271672488b10c920018f214c727c5c80c4be5fa7135179"),
        ],
        1447561485, // time of the last checkpoint block
        95,         // transactions between genesis and the last checkpoint
        5500.0,     // estimated transactions per day after it
    )
}

/// Testnet checkpoints
pub fn testnet_checkpoints() -> Result<CheckpointData> {
    CheckpointData::new(&[(0, TESTNET_GENESIS_HASH)], 1447542101, 0, 576.0)
}

/// Regtest checkpoints
pub fn regtest_checkpoints() -> Result<CheckpointData> {
    CheckpointData::new(&[(0, REGTEST_GENESIS_HASH)], 1447542586, 0, 0.0)
}

/// Main network, specified in full
pub fn main<R: Rng + ?Sized>(now: i64, rng: &mut R) -> Result<ChainParams> {
    let genesis = GenesisBlock::build(&GenesisInputs {
        message: GENESIS_MESSAGE.as_bytes().to_vec(),
        subsidy: 420 * COIN,
        recipient_script: pay_to_pubkey(&hex::decode(GENESIS_OUTPUT_PUBKEY)?),
        version: 1,
        time: 1447541441,
        bits: 0x1e0ffff0,
        nonce: 1175058,
    });
    genesis.verify(
        NetworkId::Main,
        MAIN_GENESIS_HASH.parse::<Hash256>()?,
        GENESIS_MERKLE_ROOT.parse::<Hash256>()?,
    )?;

    Ok(ChainParams {
        network_id: NetworkId::Main,
        message_start: [0xde, 0xca, 0xfe, 0xcb],
        alert_pubkey: hex::decode(MAIN_ALERT_PUBKEY)?,
        default_port: 4200,
        pow_limit: Target::max_shifted_right(20),
        subsidy_halving_interval: 450_500,
        majority: MajorityThresholds {
            enforce_block_upgrade: 750,
            reject_block_outdated: 950,
            to_check_block_upgrade: 1000,
        },
        miner_threads: 0,
        target_timespan: TARGET_TIMESPAN,
        target_spacing: TARGET_SPACING,
        base58_prefixes: Base58Prefixes {
            pubkey_address: vec![55],
            script_address: vec![143],
            secret_key: vec![117],
            ext_public_key: vec![0x04, 0x83, 0xd7, 0xa8],
            ext_secret_key: vec![0x04, 0x83, 0xbf, 0xc3],
        },
        flags: ChainFlags {
            require_rpc_password: true,
            mining_requires_peers: true,
            allow_min_difficulty_blocks: false,
            default_consistency_checks: false,
            require_standard: true,
            mine_blocks_on_demand: false,
            skip_proof_of_work_check: false,
            testnet_to_be_deprecated_field_rpc: false,
        },
        // v2 blocks are mandatory from block 1 on
        enforce_v2_after_height: Some(1),
        fixed_seeds: convert_seed6(MAIN_SEEDS, now, rng),
        dns_seeds: vec![
            DnsSeed::new("dankcoin.org", "dankseed.dankcoin.org"),
            DnsSeed::new("pepeshare.com", "dankseed.pepeshare.com"),
        ],
        genesis,
        checkpoints: Arc::new(main_checkpoints()?),
    })
}

/// Testnet, relative to main
pub fn testnet_overrides() -> Result<ChainParamsOverrides> {
    Ok(ChainParamsOverrides {
        message_start: Some([0xcb, 0xfe, 0xca, 0xde]),
        alert_pubkey: Some(hex::decode(TESTNET_ALERT_PUBKEY)?),
        default_port: Some(14200),
        majority: Some(MajorityThresholds {
            enforce_block_upgrade: 51,
            reject_block_outdated: 75,
            to_check_block_upgrade: 100,
        }),
        genesis: Some(GenesisOverride {
            time: Some(1447542101),
            bits: None,
            nonce: Some(641147),
            expected_hash: TESTNET_GENESIS_HASH.parse()?,
        }),
        base58_prefixes: Some(Base58Prefixes {
            pubkey_address: vec![65],
            script_address: vec![174],
            secret_key: vec![127],
            ext_public_key: vec![0x04, 0x26, 0x76, 0xd4],
            ext_secret_key: vec![0x04, 0x26, 0xa7, 0x26],
        }),
        fixed_seeds: Some(TESTNET_SEEDS.to_vec()),
        dns_seeds: Some(vec![DnsSeed::new("dankcoin.org", "testnet-dankseed.dankcoin.org")]),
        checkpoints: Some(Arc::new(testnet_checkpoints()?)),
        allow_min_difficulty_blocks: Some(true),
        require_standard: Some(false),
        testnet_to_be_deprecated_field_rpc: Some(true),
        ..Default::default()
    })
}

/// Regtest, relative to testnet
pub fn regtest_overrides() -> Result<ChainParamsOverrides> {
    Ok(ChainParamsOverrides {
        message_start: Some([0xd0, 0xc5, 0xd1, 0xde]),
        default_port: Some(19444),
        pow_limit: Some(Target::max_shifted_right(1)),
        subsidy_halving_interval: Some(150),
        majority: Some(MajorityThresholds {
            enforce_block_upgrade: 750,
            reject_block_outdated: 950,
            to_check_block_upgrade: 1000,
        }),
        miner_threads: Some(1),
        genesis: Some(GenesisOverride {
            time: Some(1447542586),
            bits: Some(0x207fffff),
            nonce: Some(11),
            expected_hash: REGTEST_GENESIS_HASH.parse()?,
        }),
        fixed_seeds: Some(Vec::new()),
        dns_seeds: Some(Vec::new()),
        checkpoints: Some(Arc::new(regtest_checkpoints()?)),
        // v2 enforcement follows the supermajority rule
        enforce_v2_after_height: Some(None),
        require_rpc_password: Some(false),
        mining_requires_peers: Some(false),
        default_consistency_checks: Some(true),
        mine_blocks_on_demand: Some(true),
        testnet_to_be_deprecated_field_rpc: Some(false),
        ..Default::default()
    })
}

/// Unit test network, relative to main. Shares main's checkpoint table.
pub fn unittest_overrides(main: &ChainParams) -> ChainParamsOverrides {
    ChainParamsOverrides {
        default_port: Some(18445),
        fixed_seeds: Some(Vec::new()),
        dns_seeds: Some(Vec::new()),
        checkpoints: Some(Arc::clone(&main.checkpoints)),
        enforce_v2_after_height: Some(None),
        require_rpc_password: Some(false),
        mining_requires_peers: Some(false),
        default_consistency_checks: Some(true),
        mine_blocks_on_demand: Some(true),
        ..Default::default()
    }
}

/// Testnet params
pub fn testnet<R: Rng + ?Sized>(main: &ChainParams, now: i64, rng: &mut R) -> Result<ChainParams> {
    ChainParams::derive(main, NetworkId::Testnet, &testnet_overrides()?, now, rng)
}

/// Regtest params
pub fn regtest<R: Rng + ?Sized>(testnet: &ChainParams, now: i64, rng: &mut R) -> Result<ChainParams> {
    ChainParams::derive(testnet, NetworkId::Regtest, &regtest_overrides()?, now, rng)
}

/// Unit test params
pub fn unittest<R: Rng + ?Sized>(main: &ChainParams, now: i64, rng: &mut R) -> Result<ChainParams> {
    ChainParams::derive(main, NetworkId::UnitTest, &unittest_overrides(main), now, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_main_genesis() {
        let main = main(0, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(main.genesis_hash().to_string(), MAIN_GENESIS_HASH);
        assert_eq!(main.genesis.merkle_root().to_string(), GENESIS_MERKLE_ROOT);
        assert_eq!(main.genesis.coinbase().output[0].value, 420 * COIN);
    }

    #[test]
    fn test_derived_genesis_hashes() {
        let mut rng = StdRng::seed_from_u64(0);
        let main = main(0, &mut rng).unwrap();
        let testnet = testnet(&main, 0, &mut rng).unwrap();
        let regtest = regtest(&testnet, 0, &mut rng).unwrap();

        assert_eq!(testnet.genesis_hash().to_string(), TESTNET_GENESIS_HASH);
        assert_eq!(regtest.genesis_hash().to_string(), REGTEST_GENESIS_HASH);
        assert_eq!(regtest.genesis.merkle_root().to_string(), GENESIS_MERKLE_ROOT);
    }

    #[test]
    fn test_checkpoint_tables_anchor_genesis() {
        assert_eq!(main_checkpoints().unwrap().hash_at(0).unwrap().to_string(), MAIN_GENESIS_HASH);
        assert_eq!(
            testnet_checkpoints().unwrap().hash_at(0).unwrap().to_string(),
            TESTNET_GENESIS_HASH
        );
        assert_eq!(
            regtest_checkpoints().unwrap().hash_at(0).unwrap().to_string(),
            REGTEST_GENESIS_HASH
        );
    }

    #[test]
    fn test_genesis_script_sig_bytes() {
        let main = main(0, &mut StdRng::seed_from_u64(0)).unwrap();
        let script_sig = main.genesis.coinbase().input[0].script_sig.as_bytes();
        // 82 bytes is past the direct-push range, so the message uses OP_PUSHDATA1
        assert_eq!(&script_sig[..9], &[0x04, 0xff, 0xff, 0x00, 0x1d, 0x01, 0x04, 0x4c, 82]);
        assert_eq!(&script_sig[9..], GENESIS_MESSAGE.as_bytes());
    }
}
