use lynx_block_header::{BlockHeader, HeaderValidityError};
use lynx_block_storage::InMemoryChainStore;
use lynx_chain::{
    Block, DEFAULT_BLOCK_GAS_LIMIT, PrepareBlockError,
    chains::{LYNX_DEVNET_CHAIN_ID, lynx_chain_config},
    prepare_next_block,
};
use lynx_chain_config::{ChainConfig, HardforkActivations, UnknownHardfork};
use lynx_chain_spec::ForkSpec as _;
use lynx_primitives::{B256, Bytes, U256};

use crate::common::{child_header, genesis_block, successful_receipt, transfer};

fn devnet() -> &'static ChainConfig<lynx_chain::Hardfork> {
    lynx_chain_config(LYNX_DEVNET_CHAIN_ID).expect("Devnet is supported")
}

/// Hashes of the ancestors of the block with the provided parent hash, most
/// recent first.
fn ancestor_hashes(store: &InMemoryChainStore, parent_hash: B256) -> Vec<B256> {
    let mut hashes = Vec::new();
    let mut next = store.header_by_hash(&parent_hash);
    while let Some(header) = next {
        hashes.push(header.hash());
        next = store.header_by_hash(header.parent_hash());
    }

    hashes
}

#[test]
fn extend_chain_from_genesis() -> anyhow::Result<()> {
    let store = InMemoryChainStore::default();

    let genesis = genesis_block();
    store.insert_block(&genesis);

    let transactions = vec![transfer(0)];
    let receipts = vec![successful_receipt(21_000)];
    let candidate = child_header(genesis.header(), &transactions, &receipts);

    let parent = store
        .header_by_hash(candidate.parent_hash())
        .expect("Genesis was stored");
    let context = prepare_next_block(
        devnet(),
        &candidate,
        Some(&parent),
        DEFAULT_BLOCK_GAS_LIMIT,
        ancestor_hashes(&store, *candidate.parent_hash()),
    )?;

    assert_eq!(context.block_number(), 1);
    assert_eq!(context.timestamp(), genesis.header().timestamp() + 1);
    assert_eq!(context.chain_id(), LYNX_DEVNET_CHAIN_ID);
    assert_eq!(context.gas_limit(), DEFAULT_BLOCK_GAS_LIMIT);
    assert_eq!(context.difficulty(), U256::ZERO);
    assert!(context.base_fee_per_gas().is_err());
    assert_eq!(context.prev_hashes(), [genesis.hash()]);

    let block = Block::new(candidate, transactions);
    store.insert_block(&block);
    store.insert_receipts(block.header(), &receipts);

    // The persisted block becomes the parent of the next candidate
    let next = child_header(block.header(), &[], &[]);
    let context = prepare_next_block(
        devnet(),
        &next,
        Some(block.header()),
        DEFAULT_BLOCK_GAS_LIMIT,
        ancestor_hashes(&store, *next.parent_hash()),
    )?;
    assert_eq!(context.prev_hashes(), [block.hash(), genesis.hash()]);

    Ok(())
}

#[test]
fn rejects_candidate_without_parent() {
    let genesis = genesis_block();
    let candidate = child_header(genesis.header(), &[], &[]);

    let error = prepare_next_block(devnet(), &candidate, None, DEFAULT_BLOCK_GAS_LIMIT, [])
        .expect_err("Parent is missing");

    assert!(matches!(
        error,
        PrepareBlockError::InvalidHeader(HeaderValidityError::MissingParent { block_number: 1 })
    ));
}

#[test]
fn rejects_candidate_that_does_not_advance_time() {
    let genesis = genesis_block();

    let mut options = child_header(genesis.header(), &[], &[]).to_options();
    options.timestamp = Some(genesis.header().timestamp());
    let candidate = BlockHeader::new(1, options).expect("Timestamp is set");

    let error = prepare_next_block(
        devnet(),
        &candidate,
        Some(genesis.header()),
        DEFAULT_BLOCK_GAS_LIMIT,
        [],
    )
    .expect_err("Timestamp equals parent");

    assert!(matches!(
        error,
        PrepareBlockError::InvalidHeader(HeaderValidityError::NonMonotonicTimestamp { .. })
    ));
}

#[test]
fn rejects_oversized_extra_data() {
    let genesis = genesis_block();

    let mut options = child_header(genesis.header(), &[], &[]).to_options();
    options.extra_data = Some(Bytes::from(vec![0u8; 33]));
    let candidate = BlockHeader::new(1, options).expect("Timestamp is set");

    let error = prepare_next_block(
        devnet(),
        &candidate,
        Some(genesis.header()),
        DEFAULT_BLOCK_GAS_LIMIT,
        [],
    )
    .expect_err("Extra data exceeds 32 bytes");

    assert!(matches!(
        error,
        PrepareBlockError::InvalidHeader(HeaderValidityError::InvalidHeaderField {
            actual: 33,
            max: 32,
            ..
        })
    ));
}

#[test]
fn rejects_block_without_active_hardfork() {
    let genesis = genesis_block();
    let candidate = child_header(genesis.header(), &[], &[]);

    let config = ChainConfig {
        name: "empty".to_owned(),
        chain_id: 0,
        hardfork_activations: HardforkActivations::default(),
    };

    let error = prepare_next_block(
        &config,
        &candidate,
        Some(genesis.header()),
        DEFAULT_BLOCK_GAS_LIMIT,
        [],
    )
    .expect_err("No hardfork is active");

    assert!(matches!(
        error,
        PrepareBlockError::UnknownHardfork(UnknownHardfork {
            block_number: 1,
            ..
        })
    ));
}

#[test]
fn fork_hashes_match_header() {
    let genesis = genesis_block();

    assert_eq!(
        lynx_chain::LynxChainSpec::FORK.header_hash(genesis.header()),
        genesis.hash()
    );
    assert_eq!(
        lynx_chain::LynxChainSpec::FORK.mining_hash(genesis.header()),
        genesis.header().mining_hash()
    );
}
