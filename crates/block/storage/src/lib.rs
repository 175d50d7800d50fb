//! In-memory storage of the block data that is not part of a header.
#![warn(missing_docs)]

use alloy_rlp::Encodable;
use lynx_block_api::{ChainStore, LynxBlock};
use lynx_block_header::BlockHeader;
use lynx_chain_spec::{ForkSpec, ReceiptBuilder, TransactionBuilder};
use lynx_primitives::{B256, BLANK_ROOT_HASH, Bytes, HashMap};
use parking_lot::RwLock;

/// An error that occurs when reading from an [`InMemoryChainStore`].
#[derive(Debug, thiserror::Error)]
pub enum InMemoryStoreError {
    /// No transactions are stored for the root
    #[error("No transactions are stored for transaction root {transaction_root}")]
    MissingTransactions {
        /// The header's transaction root
        transaction_root: B256,
    },
    /// No receipts are stored for the root
    #[error("No receipts are stored for receipt root {receipt_root}")]
    MissingReceipts {
        /// The header's receipt root
        receipt_root: B256,
    },
    /// A stored encoding could not be decoded
    #[error("Failed to decode item {index} stored for root {root}")]
    Decode {
        /// The root the item is stored under
        root: B256,
        /// The item's index
        index: usize,
        /// The decoding error
        #[source]
        source: alloy_rlp::Error,
    },
}

/// A chain store that keeps the encodings of transactions and receipts in
/// memory, keyed by the root committing to them.
///
/// Roots are not recomputed on insertion; the header is trusted to commit to
/// the provided items.
#[derive(Debug, Default)]
pub struct InMemoryChainStore {
    headers: RwLock<HashMap<B256, BlockHeader>>,
    transactions: RwLock<HashMap<B256, Vec<Bytes>>>,
    receipts: RwLock<HashMap<B256, Vec<Bytes>>>,
}

impl InMemoryChainStore {
    /// Stores the block's header and transactions.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn insert_block<ForkSpecT: ForkSpec>(&self, block: &LynxBlock<ForkSpecT>) {
        let header = block.header();
        log::debug!(
            "Storing block {header} with {} transactions",
            block.transactions().len()
        );

        self.transactions
            .write()
            .insert(*header.transaction_root(), encode_all(block.transactions()));
        self.headers.write().insert(block.hash(), header.clone());
    }

    /// Stores the receipts of the block with the provided header.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn insert_receipts<ReceiptT: Encodable>(&self, header: &BlockHeader, receipts: &[ReceiptT]) {
        self.receipts
            .write()
            .insert(*header.receipt_root(), encode_all(receipts));
    }

    /// Retrieves the header of the block with the provided hash.
    pub fn header_by_hash(&self, hash: &B256) -> Option<BlockHeader> {
        self.headers.read().get(hash).cloned()
    }
}

impl ChainStore for InMemoryChainStore {
    type Error = InMemoryStoreError;

    fn block_transactions<BuilderT: TransactionBuilder>(
        &self,
        header: &BlockHeader,
    ) -> Result<Vec<BuilderT::Transaction>, Self::Error> {
        let transaction_root = *header.transaction_root();

        let transactions = self.transactions.read();
        let encoded: &[Bytes] = match transactions.get(&transaction_root) {
            Some(encoded) => encoded.as_slice(),
            None if transaction_root == BLANK_ROOT_HASH => &[],
            None => return Err(InMemoryStoreError::MissingTransactions { transaction_root }),
        };

        decode_all(transaction_root, encoded, BuilderT::decode_transaction)
    }

    fn receipts<BuilderT: ReceiptBuilder>(
        &self,
        header: &BlockHeader,
    ) -> Result<Vec<BuilderT::Receipt>, Self::Error> {
        let receipt_root = *header.receipt_root();

        let receipts = self.receipts.read();
        let encoded: &[Bytes] = match receipts.get(&receipt_root) {
            Some(encoded) => encoded.as_slice(),
            None if receipt_root == BLANK_ROOT_HASH => &[],
            None => return Err(InMemoryStoreError::MissingReceipts { receipt_root }),
        };

        decode_all(receipt_root, encoded, BuilderT::decode_receipt)
    }
}

fn encode_all<ItemT: Encodable>(items: &[ItemT]) -> Vec<Bytes> {
    items
        .iter()
        .map(|item| Bytes::from(alloy_rlp::encode(item)))
        .collect()
}

fn decode_all<ItemT>(
    root: B256,
    encoded: &[Bytes],
    decode: impl Fn(&[u8]) -> alloy_rlp::Result<ItemT>,
) -> Result<Vec<ItemT>, InMemoryStoreError> {
    encoded
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let item: &[u8] = item;
            decode(item).map_err(|source| InMemoryStoreError::Decode {
                root,
                index,
                source,
            })
        })
        .collect()
}
