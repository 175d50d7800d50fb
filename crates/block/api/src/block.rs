use alloy_rlp::Encodable;
use derive_where::derive_where;
use lynx_block_header::BlockHeader;
use lynx_chain_spec::ForkSpec;
use lynx_primitives::{B256, Bloom, BloomInput};

use crate::{Block, BlockCreationError, ChainStore};

/// Read-only view of a block's logs bloom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BloomFilter(Bloom);

impl BloomFilter {
    /// Whether the provided value may have been logged in the block.
    ///
    /// False positives are possible; false negatives are not.
    pub fn contains(&self, value: &[u8]) -> bool {
        self.0.contains_input(BloomInput::Raw(value))
    }

    /// Returns the underlying bloom.
    pub fn as_bloom(&self) -> &Bloom {
        &self.0
    }
}

impl From<&BlockHeader> for BloomFilter {
    fn from(header: &BlockHeader) -> Self {
        Self(*header.bloom())
    }
}

/// A Lynx block: a header and its transactions.
#[derive_where(Clone, Debug, PartialEq)]
pub struct LynxBlock<ForkSpecT: ForkSpec> {
    header: BlockHeader,
    transactions: Vec<ForkSpecT::SignedTransaction>,
    bloom_filter: BloomFilter,
}

impl<ForkSpecT: ForkSpec> LynxBlock<ForkSpecT> {
    /// Constructs a block from its header and transactions.
    pub fn new(header: BlockHeader, transactions: Vec<ForkSpecT::SignedTransaction>) -> Self {
        let bloom_filter = BloomFilter::from(&header);

        Self {
            header,
            transactions,
            bloom_filter,
        }
    }

    /// Constructs the block with the provided header, loading its
    /// transactions from the store.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn from_header<ChainStoreT: ChainStore>(
        header: BlockHeader,
        chain_store: &ChainStoreT,
    ) -> Result<Self, BlockCreationError<ChainStoreT::Error>> {
        match chain_store.block_transactions::<ForkSpecT::TransactionBuilder>(&header) {
            Ok(transactions) => Ok(Self::new(header, transactions)),
            Err(source) => {
                log::warn!("Failed to load transactions of block {header}: {source}");

                Err(BlockCreationError::BlockNotFound {
                    header: Box::new(header),
                    source,
                })
            }
        }
    }

    /// Loads the receipts of the block's transactions from the store.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn get_receipts<ChainStoreT: ChainStore>(
        &self,
        chain_store: &ChainStoreT,
    ) -> Result<Vec<ForkSpecT::Receipt>, ChainStoreT::Error> {
        chain_store.receipts::<ForkSpecT::ReceiptBuilder>(&self.header)
    }

    /// The block's hash
    pub fn hash(&self) -> B256 {
        self.header.hash()
    }

    /// The block's number
    pub fn number(&self) -> u64 {
        self.header.block_number()
    }

    /// The block's header
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    /// The block's transactions
    pub fn transactions(&self) -> &[ForkSpecT::SignedTransaction] {
        &self.transactions
    }

    /// The block's logs bloom
    pub fn bloom_filter(&self) -> &BloomFilter {
        &self.bloom_filter
    }

    /// Consumes the block, returning its header and transactions.
    pub fn into_parts(self) -> (BlockHeader, Vec<ForkSpecT::SignedTransaction>) {
        (self.header, self.transactions)
    }
}

impl<ForkSpecT: ForkSpec> Block<ForkSpecT::SignedTransaction> for LynxBlock<ForkSpecT> {
    fn block_hash(&self) -> B256 {
        self.hash()
    }

    fn header(&self) -> &BlockHeader {
        &self.header
    }

    fn transactions(&self) -> &[ForkSpecT::SignedTransaction] {
        &self.transactions
    }
}

impl<ForkSpecT: ForkSpec> Encodable for LynxBlock<ForkSpecT> {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        let payload_length = self.header.length() + self.transactions.length();

        alloy_rlp::Header {
            list: true,
            payload_length,
        }
        .encode(out);

        self.header.encode(out);
        self.transactions.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.header.length() + self.transactions.length();

        payload_length + alloy_rlp::length_of_length(payload_length)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use alloy_rlp::Decodable as _;
    use lynx_block_header::{
        HeaderOptions, HeaderRules, MAX_EXTRA_DATA_BYTES,
        schema::{LYNX_HEADER_SCHEMA, LYNX_MINING_HEADER_SCHEMA},
    };
    use lynx_chain_spec::{ForkConfig, ReceiptBuilder, TransactionBuilder};
    use lynx_primitives::Bytes;

    use super::*;

    #[derive(Debug)]
    struct TestFork;

    struct BytesBuilder;

    impl TransactionBuilder for BytesBuilder {
        type Transaction = Bytes;

        fn decode_transaction(mut encoded: &[u8]) -> alloy_rlp::Result<Bytes> {
            Bytes::decode(&mut encoded)
        }
    }

    struct GasUsedBuilder;

    impl ReceiptBuilder for GasUsedBuilder {
        type Receipt = u64;

        fn decode_receipt(mut encoded: &[u8]) -> alloy_rlp::Result<u64> {
            u64::decode(&mut encoded)
        }
    }

    impl ForkSpec for TestFork {
        type SignedTransaction = Bytes;
        type Receipt = u64;
        type TransactionBuilder = BytesBuilder;
        type ReceiptBuilder = GasUsedBuilder;

        const FORK: ForkConfig = ForkConfig {
            name: "test",
            header_schema: LYNX_HEADER_SCHEMA,
            mining_header_schema: LYNX_MINING_HEADER_SCHEMA,
            header_rules: HeaderRules::new(MAX_EXTRA_DATA_BYTES),
        };
    }

    #[derive(Debug, thiserror::Error)]
    #[error("No data for root {0}")]
    struct MissingData(B256);

    #[derive(Default)]
    struct TestStore {
        transactions: HashMap<B256, Vec<Vec<u8>>>,
        receipts: HashMap<B256, Vec<Vec<u8>>>,
    }

    impl ChainStore for TestStore {
        type Error = MissingData;

        fn block_transactions<BuilderT: TransactionBuilder>(
            &self,
            header: &BlockHeader,
        ) -> Result<Vec<BuilderT::Transaction>, Self::Error> {
            let root = *header.transaction_root();
            let encoded = self.transactions.get(&root).ok_or(MissingData(root))?;

            Ok(encoded
                .iter()
                .map(|encoded| BuilderT::decode_transaction(encoded).unwrap())
                .collect())
        }

        fn receipts<BuilderT: ReceiptBuilder>(
            &self,
            header: &BlockHeader,
        ) -> Result<Vec<BuilderT::Receipt>, Self::Error> {
            let root = *header.receipt_root();
            let encoded = self.receipts.get(&root).ok_or(MissingData(root))?;

            Ok(encoded
                .iter()
                .map(|encoded| BuilderT::decode_receipt(encoded).unwrap())
                .collect())
        }
    }

    fn header(transaction_root: B256) -> BlockHeader {
        let mut bloom = Bloom::ZERO;
        bloom.accrue(BloomInput::Raw(b"transfer"));

        BlockHeader::new(
            4,
            HeaderOptions {
                parent_hash: Some(B256::repeat_byte(3)),
                transaction_root: Some(transaction_root),
                receipt_root: Some(transaction_root),
                bloom: Some(bloom),
                timestamp: Some(100),
                ..HeaderOptions::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn delegates_to_header() {
        let header = header(B256::repeat_byte(9));
        let block = LynxBlock::<TestFork>::new(header.clone(), vec![Bytes::from_static(b"tx")]);

        assert_eq!(block.hash(), header.hash());
        assert_eq!(block.block_hash(), header.hash());
        assert_eq!(block.number(), 4);
        assert_eq!(block.bloom_filter().as_bloom(), header.bloom());
        assert!(block.bloom_filter().contains(b"transfer"));
    }

    #[test]
    fn duplicate_transactions_are_kept() {
        let transaction = Bytes::from_static(b"tx");
        let block = LynxBlock::<TestFork>::new(
            header(B256::repeat_byte(9)),
            vec![transaction.clone(), transaction.clone()],
        );

        assert_eq!(block.transactions(), [transaction.clone(), transaction]);
    }

    #[test]
    fn from_header_loads_transactions() -> anyhow::Result<()> {
        let root = B256::repeat_byte(9);
        let mut store = TestStore::default();
        store.transactions.insert(
            root,
            vec![
                alloy_rlp::encode(Bytes::from_static(b"first")),
                alloy_rlp::encode(Bytes::from_static(b"second")),
            ],
        );
        store
            .receipts
            .insert(root, vec![alloy_rlp::encode(21_000u64)]);

        let block = LynxBlock::<TestFork>::from_header(header(root), &store)?;

        assert_eq!(
            block.transactions(),
            [Bytes::from_static(b"first"), Bytes::from_static(b"second")]
        );
        assert_eq!(block.get_receipts(&store)?, vec![21_000]);

        Ok(())
    }

    #[test]
    fn from_header_missing_data() {
        let root = B256::repeat_byte(9);
        let header = header(root);

        let error = LynxBlock::<TestFork>::from_header(header.clone(), &TestStore::default())
            .unwrap_err();
        assert!(!error.is_permanent());

        let BlockCreationError::BlockNotFound {
            header: missing,
            source,
        } = error;
        assert_eq!(*missing, header);
        assert_eq!(source.0, root);
    }

    #[test]
    fn encoding() {
        let header = header(B256::repeat_byte(9));
        let transactions = vec![Bytes::from_static(b"tx")];
        let block = LynxBlock::<TestFork>::new(header.clone(), transactions.clone());

        let encoded = alloy_rlp::encode(&block);
        assert_eq!(encoded.len(), block.length());

        let mut payload = encoded.as_slice();
        let list = alloy_rlp::Header::decode(&mut payload).unwrap();
        assert!(list.list);

        let decoded_header = BlockHeader::decode(&mut payload).unwrap();
        assert_eq!(decoded_header, header);
        assert_eq!(Vec::<Bytes>::decode(&mut payload).unwrap(), transactions);
        assert!(payload.is_empty());
    }
}
