//! Minimal block and transaction encoding
//!
//! Only what is needed to serialize and hash a genesis block: a script
//! builder, a transaction with a single coinbase input and a block header.
//! The byte layout follows the consensus wire format exactly.

use crate::hash::Hash256;
use serde::{Deserialize, Serialize};

/// Satoshis per coin
pub const COIN: i64 = 100_000_000;

/// Push the next byte as data
pub const OP_PUSHDATA1: u8 = 0x4c;
/// Push the next two-byte length of data
pub const OP_PUSHDATA2: u8 = 0x4d;
/// Push the next four-byte length of data
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Push the number -1
pub const OP_1NEGATE: u8 = 0x4f;
/// Push the number 1 (OP_2..OP_16 follow)
pub const OP_1: u8 = 0x51;
/// Signature check against the preceding key
pub const OP_CHECKSIG: u8 = 0xac;

/// Raw script bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script(#[serde(with = "hex::serde")] pub Vec<u8>);

impl Script {
    /// Script bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Incremental script builder
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    bytes: Vec<u8>,
}

impl ScriptBuilder {
    /// Empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an integer, using the small-integer opcodes where they apply
    pub fn push_int(self, n: i64) -> Self {
        match n {
            -1 => self.push_opcode(OP_1NEGATE),
            0 => self.push_opcode(0x00),
            1..=16 => self.push_opcode(OP_1 + (n as u8 - 1)),
            _ => self.push_num(n),
        }
    }

    /// Push an integer as script-number data, even when an opcode would do
    pub fn push_num(self, n: i64) -> Self {
        let encoded = script_num(n);
        self.push_slice(&encoded)
    }

    /// Push raw data with the shortest length prefix
    pub fn push_slice(mut self, data: &[u8]) -> Self {
        let len = data.len();
        if len < OP_PUSHDATA1 as usize {
            self.bytes.push(len as u8);
        } else if len <= 0xff {
            self.bytes.push(OP_PUSHDATA1);
            self.bytes.push(len as u8);
        } else if len <= 0xffff {
            self.bytes.push(OP_PUSHDATA2);
            self.bytes.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            self.bytes.push(OP_PUSHDATA4);
            self.bytes.extend_from_slice(&(len as u32).to_le_bytes());
        }
        self.bytes.extend_from_slice(data);
        self
    }

    /// Append a single opcode
    pub fn push_opcode(mut self, opcode: u8) -> Self {
        self.bytes.push(opcode);
        self
    }

    /// Finish
    pub fn into_script(self) -> Script {
        Script(self.bytes)
    }
}

/// Minimal little-endian sign-magnitude encoding of a script number
fn script_num(n: i64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    let negative = n < 0;
    let mut abs = n.unsigned_abs();
    let mut out = Vec::new();
    while abs > 0 {
        out.push((abs & 0xff) as u8);
        abs >>= 8;
    }
    // A set high bit would be read as the sign, so add a padding byte.
    let last = out.len() - 1;
    if out[last] & 0x80 != 0 {
        out.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        out[last] |= 0x80;
    }
    out
}

/// Append a CompactSize length prefix
pub fn write_compact_size(buf: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => buf.push(n as u8),
        0xfd..=0xffff => {
            buf.push(0xfd);
            buf.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buf.push(0xfe);
            buf.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xff);
            buf.extend_from_slice(&n.to_le_bytes());
        }
    }
}

fn write_script(buf: &mut Vec<u8>, script: &Script) {
    write_compact_size(buf, script.0.len() as u64);
    buf.extend_from_slice(&script.0);
}

/// Reference to a previous output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutPoint {
    /// Previous transaction id
    pub txid: Hash256,
    /// Output index
    pub vout: u32,
}

impl OutPoint {
    /// The null outpoint spent by coinbase inputs
    pub fn null() -> Self {
        Self {
            txid: Hash256::ZERO,
            vout: u32::MAX,
        }
    }
}

/// Transaction input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    /// Spent output
    pub previous_output: OutPoint,
    /// Unlocking script (free-form for coinbase)
    pub script_sig: Script,
    /// Sequence number
    pub sequence: u32,
}

/// Transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    /// Amount in satoshis
    pub value: i64,
    /// Locking script
    pub script_pubkey: Script,
}

/// Transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Version
    pub version: i32,
    /// Inputs
    pub input: Vec<TxIn>,
    /// Outputs
    pub output: Vec<TxOut>,
    /// Lock time
    pub lock_time: u32,
}

impl Transaction {
    /// Consensus serialization
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&self.version.to_le_bytes());

        write_compact_size(&mut buf, self.input.len() as u64);
        for txin in &self.input {
            buf.extend_from_slice(txin.previous_output.txid.as_bytes());
            buf.extend_from_slice(&txin.previous_output.vout.to_le_bytes());
            write_script(&mut buf, &txin.script_sig);
            buf.extend_from_slice(&txin.sequence.to_le_bytes());
        }

        write_compact_size(&mut buf, self.output.len() as u64);
        for txout in &self.output {
            buf.extend_from_slice(&txout.value.to_le_bytes());
            write_script(&mut buf, &txout.script_pubkey);
        }

        buf.extend_from_slice(&self.lock_time.to_le_bytes());
        buf
    }

    /// Transaction id
    pub fn txid(&self) -> Hash256 {
        Hash256::sha256d(&self.encode())
    }
}

/// Size of a serialized block header
pub const HEADER_SIZE: usize = 80;

/// Block header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Block version
    pub version: i32,
    /// Previous block hash
    pub prev_blockhash: Hash256,
    /// Merkle root of the block's transactions
    pub merkle_root: Hash256,
    /// Block time (unix seconds)
    pub time: u32,
    /// Compact difficulty target
    pub bits: u32,
    /// Nonce
    pub nonce: u32,
}

impl BlockHeader {
    /// Consensus serialization
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(self.prev_blockhash.as_bytes());
        out[36..68].copy_from_slice(self.merkle_root.as_bytes());
        out[68..72].copy_from_slice(&self.time.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }

    /// Block hash
    pub fn block_hash(&self) -> Hash256 {
        Hash256::sha256d(&self.encode())
    }
}
