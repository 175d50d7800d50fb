//! Common types and functions for integration tests

use lynx_block_api::GenesisBlockOptions;
use lynx_block_header::{BlockHeader, HeaderOptions};
use lynx_chain::{
    Block, LegacyTransaction,
    receipt::{ExecutionLog, Receipt, TransactionType, TypedReceipt},
};
use lynx_primitives::{Address, B256, Bytes, TxKind, U256, address, keccak256};

pub const GENESIS_TIMESTAMP: u64 = 1_514_764_800;

pub const RECEIVER: Address = address!("0x0000000000000000000000000000000000000002");

pub fn genesis_block() -> Block {
    Block::genesis(GenesisBlockOptions {
        timestamp: Some(GENESIS_TIMESTAMP),
        ..GenesisBlockOptions::default()
    })
    .expect("Genesis block has a timestamp")
}

pub fn transfer(nonce: u64) -> LegacyTransaction {
    LegacyTransaction::new(
        nonce,
        0,
        100_000,
        TxKind::Call(RECEIVER),
        U256::from(20),
        Bytes::from_static(b"Aliens are real!"),
        (27, U256::from(1), U256::from(2)),
    )
}

pub fn successful_receipt(cumulative_gas_used: u64) -> TypedReceipt {
    TypedReceipt::new(
        Receipt::new(
            true,
            cumulative_gas_used,
            vec![ExecutionLog {
                address: RECEIVER,
                topics: vec![B256::repeat_byte(0xaa)],
                data: Bytes::new(),
            }],
        ),
        TransactionType::Legacy,
    )
}

/// Commitment to a list of items, standing in for a trie root.
pub fn commitment<ItemT: alloy_rlp::Encodable>(items: &[ItemT]) -> B256 {
    let mut encoded = Vec::new();
    alloy_rlp::encode_list(items, &mut encoded);

    keccak256(encoded)
}

/// Constructs the header of a block extending `parent`.
pub fn child_header(
    parent: &BlockHeader,
    transactions: &[LegacyTransaction],
    receipts: &[TypedReceipt],
) -> BlockHeader {
    BlockHeader::from_parent(
        parent,
        HeaderOptions {
            transaction_root: Some(commitment(transactions)),
            receipt_root: Some(commitment(receipts)),
            gas_used: receipts
                .last()
                .map(|receipt| receipt.data().cumulative_gas_used),
            timestamp: Some(parent.timestamp() + 1),
            ..HeaderOptions::default()
        },
    )
    .expect("Parent is not the last block")
}
