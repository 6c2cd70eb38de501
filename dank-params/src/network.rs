//! Dankcoin network identifiers and address prefixes

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Network identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NetworkId {
    /// Production network
    Main,
    /// Public test network
    Testnet,
    /// Local regression test network
    Regtest,
    /// In-process unit test harness
    UnitTest,
}

impl NetworkId {
    /// Every network, in construction order
    pub const ALL: [NetworkId; 4] = [
        NetworkId::Main,
        NetworkId::Testnet,
        NetworkId::Regtest,
        NetworkId::UnitTest,
    ];

    /// Canonical name
    pub const fn as_str(&self) -> &'static str {
        match self {
            NetworkId::Main => "main",
            NetworkId::Testnet => "test",
            NetworkId::Regtest => "regtest",
            NetworkId::UnitTest => "unittest",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NetworkId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| Error::UnknownNetwork(s.to_string()))
    }
}

/// Role of a base58 version prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Base58Type {
    /// Pay-to-pubkey-hash address
    PubkeyAddress,
    /// Pay-to-script-hash address
    ScriptAddress,
    /// WIF private key
    SecretKey,
    /// BIP32 extended public key
    ExtPublicKey,
    /// BIP32 extended private key
    ExtSecretKey,
}

/// Base58 version bytes, one sequence per role.
///
/// Lengths differ between roles and are part of the encoding format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base58Prefixes {
    /// Pubkey address prefix
    #[serde(with = "hex::serde")]
    pub pubkey_address: Vec<u8>,
    /// Script address prefix
    #[serde(with = "hex::serde")]
    pub script_address: Vec<u8>,
    /// Secret key prefix
    #[serde(with = "hex::serde")]
    pub secret_key: Vec<u8>,
    /// Extended public key prefix
    #[serde(with = "hex::serde")]
    pub ext_public_key: Vec<u8>,
    /// Extended secret key prefix
    #[serde(with = "hex::serde")]
    pub ext_secret_key: Vec<u8>,
}

impl Base58Prefixes {
    /// Prefix bytes for a role
    pub fn get(&self, kind: Base58Type) -> &[u8] {
        match kind {
            Base58Type::PubkeyAddress => &self.pubkey_address,
            Base58Type::ScriptAddress => &self.script_address,
            Base58Type::SecretKey => &self.secret_key,
            Base58Type::ExtPublicKey => &self.ext_public_key,
            Base58Type::ExtSecretKey => &self.ext_secret_key,
        }
    }
}

/// Network choice as carried by command-line flags or a config file.
///
/// Main is chosen when no flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSelection {
    /// Use the public test network
    pub testnet: bool,
    /// Use the regression test network
    pub regtest: bool,
    /// Use the unit test network
    pub unittest: bool,
}

impl NetworkSelection {
    /// Resolve to exactly one network
    pub fn resolve(&self) -> Result<NetworkId> {
        match (self.testnet, self.regtest, self.unittest) {
            (false, false, false) => Ok(NetworkId::Main),
            (true, false, false) => Ok(NetworkId::Testnet),
            (false, true, false) => Ok(NetworkId::Regtest),
            (false, false, true) => Ok(NetworkId::UnitTest),
            _ => Err(Error::ConflictingNetworks),
        }
    }
}
