//! Network parameter registry and active-network selection
//!
//! [`ChainParamsRegistry`] owns one parameter set per network and remembers
//! which one is active. It can be created and passed around explicitly, or
//! used through the process-wide instance behind [`registry`].

use crate::network::{NetworkId, NetworkSelection};
use crate::networks;
use crate::overrides::UnitTestOverrides;
use crate::params::ChainParams;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rand::Rng;
use std::sync::Arc;

/// Parameter sets for every network plus the current selection
#[derive(Debug)]
pub struct ChainParamsRegistry {
    main: Arc<ChainParams>,
    testnet: Arc<ChainParams>,
    regtest: Arc<ChainParams>,
    unittest: RwLock<Arc<ChainParams>>,
    unittest_pristine: Arc<ChainParams>,
    active: RwLock<Option<NetworkId>>,
}

impl ChainParamsRegistry {
    /// Build every network against the wall clock and thread RNG
    pub fn new() -> Result<Self> {
        Self::with_entropy(chrono::Utc::now().timestamp(), &mut rand::thread_rng())
    }

    /// Build every network with an explicit clock value and random source.
    ///
    /// Fails if any genesis block does not reproduce its declared hash.
    pub fn with_entropy<R: Rng + ?Sized>(now: i64, rng: &mut R) -> Result<Self> {
        let main = networks::main(now, rng)?;
        let testnet = networks::testnet(&main, now, rng)?;
        let regtest = networks::regtest(&testnet, now, rng)?;
        let unittest = Arc::new(networks::unittest(&main, now, rng)?);

        for params in [&main, &testnet, &regtest, &*unittest] {
            tracing::info!(
                network = %params.network_id,
                genesis = %params.genesis_hash(),
                port = params.default_port,
                "Chain parameters ready"
            );
        }

        Ok(Self {
            main: Arc::new(main),
            testnet: Arc::new(testnet),
            regtest: Arc::new(regtest),
            unittest: RwLock::new(Arc::clone(&unittest)),
            unittest_pristine: unittest,
            active: RwLock::new(None),
        })
    }

    /// Make `network` the active network. Re-selection is allowed.
    pub fn select(&self, network: NetworkId) {
        let previous = self.active.write().replace(network);
        match previous {
            Some(prev) if prev != network => {
                tracing::info!(from = %prev, to = %network, "Switched active network")
            }
            Some(_) => {}
            None => tracing::info!(network = %network, "Selected network"),
        }
    }

    /// Resolve `selection` and select the result
    pub fn select_from(&self, selection: &NetworkSelection) -> Result<NetworkId> {
        let network = selection.resolve()?;
        self.select(network);
        Ok(network)
    }

    /// Currently selected network, if any
    pub fn selected(&self) -> Option<NetworkId> {
        *self.active.read()
    }

    /// Parameters of the active network
    pub fn active(&self) -> Result<Arc<ChainParams>> {
        let network = self.selected().ok_or(Error::NoNetworkSelected)?;
        Ok(self.get(network))
    }

    /// Parameters of any network, without touching the selection
    pub fn get(&self, network: NetworkId) -> Arc<ChainParams> {
        match network {
            NetworkId::Main => Arc::clone(&self.main),
            NetworkId::Testnet => Arc::clone(&self.testnet),
            NetworkId::Regtest => Arc::clone(&self.regtest),
            NetworkId::UnitTest => Arc::clone(&self.unittest.read()),
        }
    }

    /// Mutable view of the unit test parameters.
    ///
    /// Only available while the unit test network is active.
    pub fn modifiable(&self) -> Result<ModifiableParams<'_>> {
        self.ensure_unittest_active()?;
        Ok(ModifiableParams { registry: self })
    }

    fn ensure_unittest_active(&self) -> Result<()> {
        match self.selected() {
            Some(NetworkId::UnitTest) => Ok(()),
            Some(other) => Err(Error::NotModifiable(other)),
            None => Err(Error::NoNetworkSelected),
        }
    }
}

/// Setters for the whitelisted unit test fields.
///
/// Every write replaces the shared snapshot, so `Arc`s handed out earlier
/// keep the values they were read with.
#[derive(Debug, Clone, Copy)]
pub struct ModifiableParams<'a> {
    registry: &'a ChainParamsRegistry,
}

impl ModifiableParams<'_> {
    /// Apply a whole set of per-test overrides
    pub fn apply(&self, overrides: &UnitTestOverrides) -> Result<()> {
        self.registry.ensure_unittest_active()?;
        let mut slot = self.registry.unittest.write();
        let mut params = ChainParams::clone(&slot);
        overrides.apply_to(&mut params);
        *slot = Arc::new(params);
        tracing::debug!(?overrides, "Updated unittest parameters");
        Ok(())
    }

    /// Restore the parameters the unit test network was built with
    pub fn reset(&self) -> Result<()> {
        self.registry.ensure_unittest_active()?;
        *self.registry.unittest.write() = Arc::clone(&self.registry.unittest_pristine);
        Ok(())
    }

    /// Set the subsidy halving interval
    pub fn set_subsidy_halving_interval(&self, interval: u32) -> Result<()> {
        self.apply(&UnitTestOverrides {
            subsidy_halving_interval: Some(interval),
            ..Default::default()
        })
    }

    /// Set the enforce threshold
    pub fn set_enforce_block_upgrade_majority(&self, majority: u32) -> Result<()> {
        self.apply(&UnitTestOverrides {
            enforce_block_upgrade_majority: Some(majority),
            ..Default::default()
        })
    }

    /// Set the reject threshold
    pub fn set_reject_block_outdated_majority(&self, majority: u32) -> Result<()> {
        self.apply(&UnitTestOverrides {
            reject_block_outdated_majority: Some(majority),
            ..Default::default()
        })
    }

    /// Set the sampling window
    pub fn set_to_check_block_upgrade_majority(&self, window: u32) -> Result<()> {
        self.apply(&UnitTestOverrides {
            to_check_block_upgrade_majority: Some(window),
            ..Default::default()
        })
    }

    /// Toggle default consistency checks
    pub fn set_default_consistency_checks(&self, enabled: bool) -> Result<()> {
        self.apply(&UnitTestOverrides {
            default_consistency_checks: Some(enabled),
            ..Default::default()
        })
    }

    /// Toggle min-difficulty blocks
    pub fn set_allow_min_difficulty_blocks(&self, allowed: bool) -> Result<()> {
        self.apply(&UnitTestOverrides {
            allow_min_difficulty_blocks: Some(allowed),
            ..Default::default()
        })
    }

    /// Toggle the proof-of-work check
    pub fn set_skip_proof_of_work_check(&self, skip: bool) -> Result<()> {
        self.apply(&UnitTestOverrides {
            skip_proof_of_work_check: Some(skip),
            ..Default::default()
        })
    }
}

static REGISTRY: Lazy<ChainParamsRegistry> = Lazy::new(|| match ChainParamsRegistry::new() {
    Ok(registry) => registry,
    Err(e) => {
        tracing::error!("Chain parameters failed verification: {}", e);
        panic!("chain parameters failed verification: {e}");
    }
});

/// Process-wide registry, built on first use.
///
/// # Panics
///
/// Panics if a genesis block fails verification; the chain's identity
/// cannot be trusted and startup must not continue.
pub fn registry() -> &'static ChainParamsRegistry {
    &REGISTRY
}

/// Select the process-wide active network
pub fn select_params(network: NetworkId) {
    registry().select(network);
}

/// Resolve a network selection and make it active
pub fn select_params_from_selection(selection: &NetworkSelection) -> Result<NetworkId> {
    registry().select_from(selection)
}

/// Parameters of the process-wide active network.
///
/// # Panics
///
/// Panics if no network has been selected yet.
pub fn params() -> Arc<ChainParams> {
    match registry().active() {
        Ok(params) => params,
        Err(e) => panic!("chain parameters requested before selection: {e}"),
    }
}

/// Parameters of a specific network
pub fn params_for(network: NetworkId) -> Arc<ChainParams> {
    registry().get(network)
}

/// Unit test parameter setters.
///
/// # Panics
///
/// Panics unless the unit test network is active.
pub fn modifiable_params() -> ModifiableParams<'static> {
    match registry().modifiable() {
        Ok(view) => view,
        Err(e) => panic!("unittest parameters are not modifiable: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn registry() -> ChainParamsRegistry {
        ChainParamsRegistry::with_entropy(1_500_000_000, &mut StdRng::seed_from_u64(9)).unwrap()
    }

    #[test]
    fn test_unselected_active_fails() {
        let registry = registry();
        assert!(registry.selected().is_none());
        assert!(matches!(registry.active(), Err(Error::NoNetworkSelected)));
    }

    #[test]
    fn test_reselect() {
        let registry = registry();
        registry.select(NetworkId::Main);
        registry.select(NetworkId::Regtest);
        assert_eq!(registry.active().unwrap().network_id, NetworkId::Regtest);
    }

    #[test]
    fn test_modifiable_requires_unittest() {
        let registry = registry();
        assert!(matches!(registry.modifiable(), Err(Error::NoNetworkSelected)));

        registry.select(NetworkId::Main);
        assert!(matches!(registry.modifiable(), Err(Error::NotModifiable(NetworkId::Main))));

        registry.select(NetworkId::UnitTest);
        assert!(registry.modifiable().is_ok());
    }

    #[test]
    fn test_view_rechecks_selection() {
        let registry = registry();
        registry.select(NetworkId::UnitTest);
        let view = registry.modifiable().unwrap();

        registry.select(NetworkId::Testnet);
        assert!(matches!(
            view.set_subsidy_halving_interval(10),
            Err(Error::NotModifiable(NetworkId::Testnet))
        ));
    }

    #[test]
    fn test_snapshots_are_stable() {
        let registry = registry();
        registry.select(NetworkId::UnitTest);
        let before = registry.active().unwrap();

        registry.modifiable().unwrap().set_skip_proof_of_work_check(true).unwrap();

        assert!(!before.flags.skip_proof_of_work_check);
        assert!(registry.active().unwrap().flags.skip_proof_of_work_check);
    }

    #[test]
    fn test_reset_restores_pristine() {
        let registry = registry();
        registry.select(NetworkId::UnitTest);
        let pristine = registry.active().unwrap();
        let view = registry.modifiable().unwrap();

        view.apply(&UnitTestOverrides {
            subsidy_halving_interval: Some(3),
            allow_min_difficulty_blocks: Some(true),
            ..Default::default()
        })
        .unwrap();
        assert_ne!(*registry.active().unwrap(), *pristine);

        view.reset().unwrap();
        assert_eq!(*registry.active().unwrap(), *pristine);
    }
}
