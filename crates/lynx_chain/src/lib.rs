//! Lynx chain types

mod block;
pub mod chains;
pub mod receipt;
pub mod transaction;

use lynx_block_api::LynxBlock;
use lynx_block_header::{
    HeaderRules, MAX_EXTRA_DATA_BYTES,
    schema::{LYNX_HEADER_SCHEMA, LYNX_MINING_HEADER_SCHEMA},
};
use lynx_chain_spec::{ForkConfig, ForkSpec};

pub use self::{
    block::{DEFAULT_BLOCK_GAS_LIMIT, PrepareBlockError, prepare_next_block},
    receipt::{LondonReceiptBuilder, TypedReceipt},
    transaction::{LegacyTransaction, LegacyTransactionBuilder},
};

/// Configuration of the Lynx fork.
pub const LYNX_FORK: ForkConfig = ForkConfig {
    name: "lynx",
    header_schema: LYNX_HEADER_SCHEMA,
    mining_header_schema: LYNX_MINING_HEADER_SCHEMA,
    header_rules: HeaderRules::new(MAX_EXTRA_DATA_BYTES),
};

/// Lynx hardforks
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Hardfork {
    /// The Lynx fork
    #[default]
    Lynx,
}

impl Hardfork {
    /// Returns the configuration of the hardfork.
    pub const fn fork_config(self) -> ForkConfig {
        match self {
            Hardfork::Lynx => LYNX_FORK,
        }
    }
}

/// Type-level specification of the Lynx fork.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LynxChainSpec;

impl ForkSpec for LynxChainSpec {
    type SignedTransaction = LegacyTransaction;
    type Receipt = TypedReceipt;
    type TransactionBuilder = LegacyTransactionBuilder;
    type ReceiptBuilder = LondonReceiptBuilder;

    const FORK: ForkConfig = LYNX_FORK;
}

/// A block of the Lynx fork.
pub type Block = LynxBlock<LynxChainSpec>;
