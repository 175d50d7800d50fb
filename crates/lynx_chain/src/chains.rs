//! Configurations for Lynx chains.

use std::sync::OnceLock;

use lynx_chain_config::{ChainConfig, ForkCondition, HardforkActivation};
use lynx_primitives::HashMap;

use crate::Hardfork;

/// Lynx devnet chain ID
pub const LYNX_DEVNET_CHAIN_ID: u64 = 1337;

const DEVNET_HARDFORKS: &[HardforkActivation<Hardfork>] = &[HardforkActivation {
    condition: ForkCondition::Block(0),
    hardfork: Hardfork::Lynx,
}];

fn devnet_config() -> &'static ChainConfig<Hardfork> {
    static CONFIG: OnceLock<ChainConfig<Hardfork>> = OnceLock::new();

    CONFIG.get_or_init(|| {
        let hardfork_activations = DEVNET_HARDFORKS.into();

        ChainConfig {
            name: "Lynx devnet".to_owned(),
            chain_id: LYNX_DEVNET_CHAIN_ID,
            hardfork_activations,
        }
    })
}

fn lynx_chain_configs() -> &'static HashMap<u64, ChainConfig<Hardfork>> {
    static CONFIGS: OnceLock<HashMap<u64, ChainConfig<Hardfork>>> = OnceLock::new();

    CONFIGS.get_or_init(|| {
        let mut configs = HashMap::default();
        configs.insert(LYNX_DEVNET_CHAIN_ID, devnet_config().clone());

        configs
    })
}

/// Returns the corresponding configuration to the provided chain ID, if
/// it is supported.
pub fn lynx_chain_config(chain_id: u64) -> Option<&'static ChainConfig<Hardfork>> {
    lynx_chain_configs().get(&chain_id)
}
