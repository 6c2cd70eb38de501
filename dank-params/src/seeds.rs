//! Fixed seed nodes
//!
//! Seed records are compiled in as raw IPv6 (or IPv4-mapped) addresses and
//! turned into peer addresses with a randomized "last seen" time, so a fresh
//! node only leans on them until gossip hands it newer addresses.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv6Addr, SocketAddr};

/// One week in seconds
pub const ONE_WEEK: i64 = 7 * 24 * 60 * 60;

/// Compiled-in seed record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSpec6 {
    /// IPv6 address bytes (IPv4 addresses are mapped)
    pub addr: [u8; 16],
    /// Port
    pub port: u16,
}

/// Peer address produced from a seed record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedAddress {
    /// IPv6 address bytes
    pub addr: [u8; 16],
    /// Port
    pub port: u16,
    /// Advertised last-seen time (unix seconds)
    pub time: i64,
}

impl SeedAddress {
    /// Address, with IPv4-mapped addresses unwrapped
    pub fn ip(&self) -> IpAddr {
        let v6 = Ipv6Addr::from(self.addr);
        match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        }
    }

    /// Socket address
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip(), self.port)
    }

    /// Whether this address came from `spec`
    pub fn matches(&self, spec: &SeedSpec6) -> bool {
        self.addr == spec.addr && self.port == spec.port
    }
}

/// Convert seed records, giving each a last-seen time between one and two
/// weeks before `now`.
pub fn convert_seed6<R: Rng + ?Sized>(data: &[SeedSpec6], now: i64, rng: &mut R) -> Vec<SeedAddress> {
    data.iter()
        .map(|spec| SeedAddress {
            addr: spec.addr,
            port: spec.port,
            time: now.saturating_sub(rng.gen_range(0..ONE_WEEK)).saturating_sub(ONE_WEEK),
        })
        .collect()
}

/// [`convert_seed6`] against the wall clock and the thread-local RNG
pub fn convert_seed6_now(data: &[SeedSpec6]) -> Vec<SeedAddress> {
    convert_seed6(data, chrono::Utc::now().timestamp(), &mut rand::thread_rng())
}

/// Fixed seeds for main. Empty until seed data is compiled in.
pub const MAIN_SEEDS: &[SeedSpec6] = &[];

/// Fixed seeds for testnet. Empty until seed data is compiled in, so the
/// testnet fixed-seed override currently matches main's empty list.
pub const TESTNET_SEEDS: &[SeedSpec6] = &[];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ipv4_mapped(a: u8, b: u8, c: u8, d: u8) -> [u8; 16] {
        let mut addr = [0u8; 16];
        addr[10] = 0xff;
        addr[11] = 0xff;
        addr[12..].copy_from_slice(&[a, b, c, d]);
        addr
    }

    #[test]
    fn test_convert_preserves_order() {
        let specs = [
            SeedSpec6 { addr: ipv4_mapped(10, 0, 0, 1), port: 4200 },
            SeedSpec6 { addr: ipv4_mapped(10, 0, 0, 2), port: 4201 },
            SeedSpec6 { addr: [0x20; 16], port: 4202 },
        ];
        let mut rng = StdRng::seed_from_u64(7);
        let out = convert_seed6(&specs, 1_500_000_000, &mut rng);

        assert_eq!(out.len(), specs.len());
        for (addr, spec) in out.iter().zip(specs.iter()) {
            assert!(addr.matches(spec));
        }
    }

    #[test]
    fn test_convert_time_window() {
        let specs = vec![SeedSpec6 { addr: ipv4_mapped(10, 0, 0, 1), port: 4200 }; 500];
        let now = 1_447_541_441;
        let mut rng = StdRng::seed_from_u64(42);

        for addr in convert_seed6(&specs, now, &mut rng) {
            assert!(addr.time <= now - ONE_WEEK);
            assert!(addr.time > now - 2 * ONE_WEEK);
        }
    }

    #[test]
    fn test_convert_with_extreme_clock() {
        let specs = [SeedSpec6 { addr: ipv4_mapped(10, 0, 0, 1), port: 4200 }];
        let mut rng = StdRng::seed_from_u64(3);

        let out = convert_seed6(&specs, i64::MIN, &mut rng);
        assert_eq!(out[0].time, i64::MIN);

        let out = convert_seed6(&specs, i64::MAX, &mut rng);
        assert!(out[0].time <= i64::MAX - ONE_WEEK);
    }

    #[test]
    fn test_seed_tables_are_empty() {
        assert!(MAIN_SEEDS.is_empty());
        assert!(TESTNET_SEEDS.is_empty());
    }

    #[test]
    fn test_ip_unwraps_ipv4_mapped() {
        let addr = SeedAddress {
            addr: ipv4_mapped(192, 168, 1, 5),
            port: 4200,
            time: 0,
        };
        assert_eq!(addr.socket_addr().to_string(), "192.168.1.5:4200");

        let v6 = SeedAddress { addr: [0x20; 16], port: 1, time: 0 };
        assert!(v6.ip().is_ipv6());
    }

    #[test]
    fn test_empty_input() {
        assert!(convert_seed6_now(&[]).is_empty());
    }
}
