//! 256-bit hash and target types

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// A 256-bit hash in internal byte order.
///
/// Displayed and parsed in reversed (block explorer) order, so the genesis
/// hash of main prints as `ace489e8...`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// All-zero hash
    pub const ZERO: Self = Self([0u8; 32]);

    /// Double SHA-256 of `data`
    pub fn sha256d(data: &[u8]) -> Self {
        let first = Sha256::digest(data);
        let second = Sha256::digest(first);
        let mut out = [0u8; 32];
        out.copy_from_slice(&second);
        Self(out)
    }

    /// Bytes in internal order
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        f.write_str(&hex::encode(reversed))
    }
}

impl FromStr for Hash256 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 64 {
            return Err(Error::InvalidHash(s.to_string()));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| Error::InvalidHash(s.to_string()))?;
        bytes.reverse();
        Ok(Self(bytes))
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A 256-bit unsigned proof-of-work target, big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Target(#[serde(with = "hex::serde")] pub [u8; 32]);

impl Target {
    /// `~0 >> shift`, the conventional way of writing a difficulty ceiling
    pub fn max_shifted_right(shift: u32) -> Self {
        let mut bytes = [0xffu8; 32];
        let shift = shift.min(256) as usize;
        let zero_bytes = shift / 8;
        for b in bytes.iter_mut().take(zero_bytes) {
            *b = 0;
        }
        if zero_bytes < 32 {
            bytes[zero_bytes] = 0xff >> (shift % 8);
        }
        Self(bytes)
    }

    /// Expand compact "bits" into a full target.
    ///
    /// The sign bit is ignored and bytes shifted past the top are dropped.
    pub fn from_compact(bits: u32) -> Self {
        let size = (bits >> 24) as usize;
        let mut word = bits & 0x007f_ffff;
        let mut bytes = [0u8; 32];

        if size <= 3 {
            word >>= 8 * (3 - size);
            bytes[29..].copy_from_slice(&word.to_be_bytes()[1..]);
        } else {
            let mantissa = word.to_be_bytes();
            for (i, byte) in mantissa[1..].iter().enumerate() {
                // Most significant mantissa byte lands at index 32 - size.
                let index = 32 + i;
                if index >= size && index - size < 32 {
                    bytes[index - size] = *byte;
                }
            }
        }

        Self(bytes)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_display_is_reversed() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xd8;
        bytes[31] = 0x87;
        let hash = Hash256(bytes);
        let shown = hash.to_string();
        assert!(shown.starts_with("87"));
        assert!(shown.ends_with("d8"));
        assert_eq!(shown.parse::<Hash256>().unwrap(), hash);
    }

    #[test]
    fn test_hash_parse_accepts_prefix() {
        let plain: Hash256 = "ace489e89e9b99dc4e83076aafbd8d7b91101d735f6f4d2857166b3e53e01b30"
            .parse()
            .unwrap();
        let prefixed: Hash256 = "0xace489e89e9b99dc4e83076aafbd8d7b91101d735f6f4d2857166b3e53e01b30"
            .parse()
            .unwrap();
        assert_eq!(plain, prefixed);
    }

    #[test]
    fn test_hash_parse_rejects_bad_input() {
        assert!("abcd".parse::<Hash256>().is_err());
        assert!("zz".repeat(32).parse::<Hash256>().is_err());
    }

    #[test]
    fn test_sha256d_empty() {
        // sha256d("") in internal order
        assert_eq!(
            hex::encode(Hash256::sha256d(b"").0),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn test_max_shifted_right() {
        let limit = Target::max_shifted_right(20);
        assert_eq!(&limit.0[..3], &[0x00, 0x00, 0x0f]);
        assert!(limit.0[3..].iter().all(|b| *b == 0xff));

        let regtest = Target::max_shifted_right(1);
        assert_eq!(regtest.0[0], 0x7f);
        assert_eq!(Target::max_shifted_right(0).0, [0xff; 32]);
        assert_eq!(Target::max_shifted_right(256).0, [0x00; 32]);
    }

    #[test]
    fn test_from_compact() {
        let target = Target::from_compact(0x1e0ffff0);
        assert_eq!(&target.0[..5], &[0x00, 0x00, 0x0f, 0xff, 0xf0]);
        assert!(target.0[5..].iter().all(|b| *b == 0));

        let easy = Target::from_compact(0x207fffff);
        assert_eq!(&easy.0[..3], &[0x7f, 0xff, 0xff]);

        let tiny = Target::from_compact(0x03123456);
        assert_eq!(&tiny.0[29..], &[0x12, 0x34, 0x56]);

        let tinier = Target::from_compact(0x02123456);
        assert_eq!(&tinier.0[29..], &[0x00, 0x12, 0x34]);
    }
}
