use core::fmt::Debug;

/// Fork condition for a hardfork.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ForkCondition {
    /// Activation based on block number.
    Block(u64),
    /// Activation based on UNIX timestamp.
    Timestamp(u64),
}

impl ForkCondition {
    /// Whether the condition is met by a block with the provided number and
    /// timestamp.
    pub fn is_active(&self, block_number: u64, timestamp: u64) -> bool {
        match self {
            ForkCondition::Block(activation) => block_number >= *activation,
            ForkCondition::Timestamp(activation) => timestamp >= *activation,
        }
    }
}

/// A type representing the activation of a hardfork.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardforkActivation<HardforkT> {
    /// The condition for the hardfork activation.
    pub condition: ForkCondition,
    /// The hardfork to be activated.
    pub hardfork: HardforkT,
}

/// A struct that stores the hardforks for a chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct HardforkActivations<HardforkT> {
    /// Hardforks in order of activation
    hardforks: Vec<HardforkActivation<HardforkT>>,
}

impl<HardforkT> HardforkActivations<HardforkT> {
    /// Constructs a new instance with the provided hardforks.
    pub fn new(hardforks: Vec<HardforkActivation<HardforkT>>) -> Self {
        Self { hardforks }
    }
}

impl<HardforkT: Clone> HardforkActivations<HardforkT> {
    /// Returns the hardfork active for a block with the provided number and
    /// timestamp.
    ///
    /// The last activation whose condition is met wins.
    pub fn hardfork_at_block(&self, block_number: u64, timestamp: u64) -> Option<HardforkT> {
        self.hardforks
            .iter()
            .rev()
            .find(|HardforkActivation { condition, .. }| {
                condition.is_active(block_number, timestamp)
            })
            .map(|activation| activation.hardfork.clone())
    }
}

impl<HardforkT: Clone> From<&[HardforkActivation<HardforkT>]> for HardforkActivations<HardforkT> {
    fn from(hardforks: &[HardforkActivation<HardforkT>]) -> Self {
        Self {
            hardforks: hardforks.to_vec(),
        }
    }
}

/// An error that occurs when no hardfork is active for a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("No hardfork is active for block #{block_number} with timestamp {timestamp}")]
pub struct UnknownHardfork {
    /// The block's number
    pub block_number: u64,
    /// The block's timestamp
    pub timestamp: u64,
}

/// Type that stores the configuration for a chain.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig<HardforkT> {
    /// Chain name
    pub name: String,
    /// Chain ID
    pub chain_id: u64,
    /// Hardfork activations for the chain
    pub hardfork_activations: HardforkActivations<HardforkT>,
}

impl<HardforkT: Clone + Debug> ChainConfig<HardforkT> {
    /// Resolves the hardfork active for a block with the provided number and
    /// timestamp.
    pub fn hardfork_at(
        &self,
        block_number: u64,
        timestamp: u64,
    ) -> Result<HardforkT, UnknownHardfork> {
        let hardfork = self
            .hardfork_activations
            .hardfork_at_block(block_number, timestamp)
            .ok_or(UnknownHardfork {
                block_number,
                timestamp,
            })?;

        log::trace!(
            "Resolved hardfork {hardfork:?} for block #{block_number} on chain {}",
            self.name
        );

        Ok(hardfork)
    }
}
