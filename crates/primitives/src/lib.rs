//! Primitive types shared by the Lynx crates.
//!
//! They are based on the same primitive types as `revm`, so values can be
//! handed to an EVM without conversion.
#![warn(missing_docs)]

pub use alloy_primitives::{Bloom, BloomInput};
pub use revm_primitives::{
    Address, B256, Bytes, HashMap, HashSet, KECCAK_EMPTY, TxKind, U256, address, b256, hex,
    keccak256,
};

/// The parent hash of a genesis block.
pub const GENESIS_PARENT_HASH: B256 = B256::ZERO;

/// The genesis block number.
pub const GENESIS_BLOCK_NUMBER: u64 = 0;

/// The coinbase used when none is provided.
pub const ZERO_ADDRESS: Address = Address::ZERO;

/// The root hash of an empty Merkle Patricia trie; i.e. `keccak256(rlp(""))`.
pub const BLANK_ROOT_HASH: B256 =
    b256!("0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421");

/// The byte width of a logs bloom.
pub const BLOOM_BYTE_LENGTH: usize = 256;
