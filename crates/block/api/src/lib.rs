mod block;
mod genesis;

use core::fmt::Debug;

use auto_impl::auto_impl;
use lynx_block_header::BlockHeader;
use lynx_chain_spec::{ReceiptBuilder, TransactionBuilder};
use lynx_primitives::B256;

pub use self::{
    block::{BloomFilter, LynxBlock},
    genesis::GenesisBlockOptions,
};

/// Trait for implementations of a Lynx block.
#[auto_impl(&, Arc)]
pub trait Block<SignedTransactionT>: Debug {
    /// Returns the block's hash.
    fn block_hash(&self) -> B256;

    /// Returns the block's header.
    fn header(&self) -> &BlockHeader;

    /// Returns the block's transactions.
    fn transactions(&self) -> &[SignedTransactionT];
}

/// Trait for reading the block data that is not part of the header.
#[auto_impl(&, Arc)]
pub trait ChainStore {
    /// The store's error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Retrieves the transactions of the block with the provided header.
    fn block_transactions<BuilderT: TransactionBuilder>(
        &self,
        header: &BlockHeader,
    ) -> Result<Vec<BuilderT::Transaction>, Self::Error>;

    /// Retrieves the receipts of the block with the provided header.
    fn receipts<BuilderT: ReceiptBuilder>(
        &self,
        header: &BlockHeader,
    ) -> Result<Vec<BuilderT::Receipt>, Self::Error>;
}

/// An error that occurs upon creation of a [`LynxBlock`] from stored data.
#[derive(Debug, thiserror::Error)]
pub enum BlockCreationError<StoreErrorT> {
    /// The block's data is not available in the store.
    #[error("Transactions of block {header} are not available locally")]
    BlockNotFound {
        /// The block's header
        header: Box<BlockHeader>,
        /// The store's error
        #[source]
        source: StoreErrorT,
    },
}

impl<StoreErrorT> BlockCreationError<StoreErrorT> {
    /// Whether retrying with the same input can never succeed.
    ///
    /// Missing data may be retrieved later, so this is never the case.
    pub fn is_permanent(&self) -> bool {
        match self {
            BlockCreationError::BlockNotFound { .. } => false,
        }
    }
}
