//! Genesis block construction and verification

use crate::block::{BlockHeader, OutPoint, Script, ScriptBuilder, Transaction, TxIn, TxOut, OP_CHECKSIG};
use crate::hash::Hash256;
use crate::network::NetworkId;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Compact difficulty pushed at the start of every genesis coinbase
pub const GENESIS_COINBASE_BITS: i64 = 486_604_799;

/// Script number pushed after the compact difficulty
pub const GENESIS_COINBASE_EXTRA: i64 = 4;

/// Everything a genesis block is derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisInputs {
    /// Free-form message embedded in the coinbase input
    #[serde(with = "hex::serde")]
    pub message: Vec<u8>,
    /// Coinbase output amount in satoshis
    pub subsidy: i64,
    /// Coinbase output script
    pub recipient_script: Script,
    /// Block version
    pub version: i32,
    /// Block time
    pub time: u32,
    /// Compact difficulty target
    pub bits: u32,
    /// Nonce
    pub nonce: u32,
}

/// The first block of a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenesisBlock {
    header: BlockHeader,
    coinbase: Transaction,
    hash: Hash256,
}

/// Build the pay-to-pubkey recipient script used by genesis coinbases
pub fn pay_to_pubkey(pubkey: &[u8]) -> Script {
    ScriptBuilder::new().push_slice(pubkey).push_opcode(OP_CHECKSIG).into_script()
}

fn coinbase_transaction(inputs: &GenesisInputs) -> Transaction {
    let script_sig = ScriptBuilder::new()
        .push_int(GENESIS_COINBASE_BITS)
        .push_num(GENESIS_COINBASE_EXTRA)
        .push_slice(&inputs.message)
        .into_script();

    Transaction {
        version: 1,
        input: vec![TxIn {
            previous_output: OutPoint::null(),
            script_sig,
            sequence: u32::MAX,
        }],
        output: vec![TxOut {
            value: inputs.subsidy,
            script_pubkey: inputs.recipient_script.clone(),
        }],
        lock_time: 0,
    }
}

impl GenesisBlock {
    /// Build the genesis block and derive its merkle root and hash
    pub fn build(inputs: &GenesisInputs) -> Self {
        let coinbase = coinbase_transaction(inputs);
        // With a single transaction the merkle root is its txid.
        let header = BlockHeader {
            version: inputs.version,
            prev_blockhash: Hash256::ZERO,
            merkle_root: coinbase.txid(),
            time: inputs.time,
            bits: inputs.bits,
            nonce: inputs.nonce,
        };
        let hash = header.block_hash();
        Self { header, coinbase, hash }
    }

    /// Same coinbase under a different time, bits and nonce
    pub fn with_header(&self, time: u32, bits: u32, nonce: u32) -> Self {
        let header = BlockHeader {
            time,
            bits,
            nonce,
            ..self.header.clone()
        };
        let hash = header.block_hash();
        Self {
            header,
            coinbase: self.coinbase.clone(),
            hash,
        }
    }

    /// Check the derived hash and merkle root against the declared values
    pub fn verify(&self, network: NetworkId, expected_hash: Hash256, expected_merkle_root: Hash256) -> Result<()> {
        if self.hash != expected_hash {
            return Err(Error::GenesisHashMismatch {
                network,
                expected: expected_hash,
                computed: self.hash,
            });
        }
        if self.header.merkle_root != expected_merkle_root {
            return Err(Error::GenesisMerkleRootMismatch {
                network,
                expected: expected_merkle_root,
                computed: self.header.merkle_root,
            });
        }
        tracing::debug!(network = %network, hash = %self.hash, "Genesis block verified");
        Ok(())
    }

    /// Block hash
    pub fn hash(&self) -> Hash256 {
        self.hash
    }

    /// Merkle root
    pub fn merkle_root(&self) -> Hash256 {
        self.header.merkle_root
    }

    /// Header
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    /// The only transaction in the block
    pub fn coinbase(&self) -> &Transaction {
        &self.coinbase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::COIN;

    fn sample_inputs() -> GenesisInputs {
        GenesisInputs {
            message: b"hello".to_vec(),
            subsidy: 50 * COIN,
            recipient_script: pay_to_pubkey(&[0x02; 33]),
            version: 1,
            time: 1_400_000_000,
            bits: 0x207fffff,
            nonce: 0,
        }
    }

    #[test]
    fn test_coinbase_script_sig_layout() {
        let block = GenesisBlock::build(&sample_inputs());
        let script_sig = block.coinbase().input[0].script_sig.as_bytes();
        assert_eq!(&script_sig[..7], &[0x04, 0xff, 0xff, 0x00, 0x1d, 0x01, 0x04]);
        assert_eq!(script_sig[7], 5);
        assert_eq!(&script_sig[8..], b"hello");
    }

    #[test]
    fn test_merkle_root_is_coinbase_txid() {
        let block = GenesisBlock::build(&sample_inputs());
        assert_eq!(block.merkle_root(), block.coinbase().txid());
        assert_eq!(block.hash(), block.header().block_hash());
    }

    #[test]
    fn test_with_header_keeps_coinbase() {
        let block = GenesisBlock::build(&sample_inputs());
        let other = block.with_header(1_400_000_001, 0x207fffff, 3);
        assert_eq!(other.merkle_root(), block.merkle_root());
        assert_ne!(other.hash(), block.hash());
        assert_eq!(other.header().nonce, 3);
    }

    #[test]
    fn test_verify_reports_mismatch() {
        let block = GenesisBlock::build(&sample_inputs());
        let root = block.merkle_root();

        assert!(block.verify(NetworkId::Regtest, block.hash(), root).is_ok());
        assert!(matches!(
            block.verify(NetworkId::Regtest, Hash256::ZERO, root),
            Err(Error::GenesisHashMismatch { .. })
        ));
        assert!(matches!(
            block.verify(NetworkId::Regtest, block.hash(), Hash256::ZERO),
            Err(Error::GenesisMerkleRootMismatch { .. })
        ));
    }
}
