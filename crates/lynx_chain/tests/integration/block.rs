use lynx_block_api::{BlockCreationError, ChainStore as _};
use lynx_block_header::BlockHeader;
use lynx_block_storage::{InMemoryChainStore, InMemoryStoreError};
use lynx_chain::{Block, LegacyTransactionBuilder, LondonReceiptBuilder};
use lynx_primitives::{B256, GENESIS_PARENT_HASH};

use crate::common::{
    GENESIS_TIMESTAMP, child_header, genesis_block, successful_receipt, transfer,
};

#[test]
fn genesis_block_defaults() {
    let genesis = genesis_block();

    assert!(genesis.header().is_genesis());
    assert_eq!(*genesis.header().parent_hash(), GENESIS_PARENT_HASH);
    assert_eq!(genesis.header().timestamp(), GENESIS_TIMESTAMP);
    assert_eq!(genesis.number(), 0);
    assert_eq!(genesis.hash(), genesis.header().hash());
    assert_eq!(genesis.header().epoch(), 1);
    assert_eq!(genesis.header().slot(), 1);
    assert!(genesis.transactions().is_empty());
}

#[test]
fn genesis_block_loads_from_empty_store() -> anyhow::Result<()> {
    let genesis = genesis_block();
    let store = InMemoryChainStore::default();

    let loaded = Block::from_header(genesis.header().clone(), &store)?;
    assert_eq!(loaded, genesis);
    assert!(loaded.get_receipts(&store)?.is_empty());

    Ok(())
}

#[test]
fn persisted_block_roundtrip() -> anyhow::Result<()> {
    let genesis = genesis_block();
    let transactions = vec![transfer(0), transfer(1)];
    let receipts = vec![successful_receipt(21_000), successful_receipt(42_000)];

    let header = child_header(genesis.header(), &transactions, &receipts);
    let block = Block::new(header.clone(), transactions.clone());

    let store = InMemoryChainStore::default();
    store.insert_block(&block);
    store.insert_receipts(&header, &receipts);

    let loaded = Block::from_header(header.clone(), &store)?;
    assert_eq!(loaded.transactions(), transactions.as_slice());
    assert_eq!(loaded.hash(), block.hash());
    assert_eq!(loaded.get_receipts(&store)?, receipts);

    assert_eq!(
        store.block_transactions::<LegacyTransactionBuilder>(&header)?,
        transactions
    );
    assert_eq!(store.receipts::<LondonReceiptBuilder>(&header)?, receipts);

    Ok(())
}

#[test]
fn missing_transactions_are_reported_as_not_found() {
    let genesis = genesis_block();
    let transactions = vec![transfer(0)];
    let receipts = vec![successful_receipt(21_000)];
    let header = child_header(genesis.header(), &transactions, &receipts);

    let error = Block::from_header(header.clone(), &InMemoryChainStore::default())
        .expect_err("Transactions were never stored");

    assert!(!error.is_permanent());
    match error {
        BlockCreationError::BlockNotFound {
            header: missing,
            source,
        } => {
            assert_eq!(*missing, header);
            assert!(matches!(
                source,
                InMemoryStoreError::MissingTransactions { transaction_root }
                    if transaction_root == *header.transaction_root()
            ));
        }
    }
}

#[test]
fn bloom_projection_follows_header() {
    let receipts = vec![successful_receipt(21_000)];
    let bloom = receipts[0].data().logs_bloom;

    let mut options = genesis_block().header().to_options();
    options.parent_hash = Some(B256::repeat_byte(1));
    options.bloom = Some(bloom);
    let header = BlockHeader::new(1, options).expect("Timestamp is set");

    let block = Block::new(header, Vec::new());
    assert_eq!(*block.bloom_filter().as_bloom(), bloom);
    assert!(block.bloom_filter().contains(B256::repeat_byte(0xaa).as_slice()));
}

#[test]
fn transactions_keep_duplicates() {
    let genesis = genesis_block();
    let transactions = vec![transfer(0), transfer(0)];
    let header = child_header(genesis.header(), &transactions, &[]);

    let block = Block::new(header, transactions.clone());
    assert_eq!(block.transactions().len(), 2);
    assert_eq!(block.transactions()[0], block.transactions()[1]);
    assert_eq!(
        block.transactions()[0].transaction_hash(),
        transactions[1].transaction_hash()
    );
}
