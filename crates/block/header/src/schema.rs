//! Declarations of the header field layouts.
//!
//! Every layout is a static list of `(field, kind)` pairs. The order of the
//! list is the order of the canonical encoding and is part of the consensus
//! contract: changing it changes every header hash.

/// A field of a Lynx block header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeaderField {
    /// The parent block's hash
    ParentHash,
    /// The block's beneficiary address
    Coinbase,
    /// The state's root hash
    StateRoot,
    /// The transactions' root hash
    TransactionRoot,
    /// The receipts' root hash
    ReceiptRoot,
    /// The logs' bloom
    Bloom,
    /// The block's number
    BlockNumber,
    /// The amount of gas used by the block
    GasUsed,
    /// The block's timestamp
    Timestamp,
    /// The block's extra data
    ExtraData,
    /// The epoch the block was sealed in
    Epoch,
    /// The slot within the epoch the block was sealed in
    Slot,
}

impl HeaderField {
    /// The field's name, as used in error messages and serialized headers.
    pub const fn name(self) -> &'static str {
        match self {
            HeaderField::ParentHash => "parent_hash",
            HeaderField::Coinbase => "coinbase",
            HeaderField::StateRoot => "state_root",
            HeaderField::TransactionRoot => "transaction_root",
            HeaderField::ReceiptRoot => "receipt_root",
            HeaderField::Bloom => "bloom",
            HeaderField::BlockNumber => "block_number",
            HeaderField::GasUsed => "gas_used",
            HeaderField::Timestamp => "timestamp",
            HeaderField::ExtraData => "extra_data",
            HeaderField::Epoch => "epoch",
            HeaderField::Slot => "slot",
        }
    }
}

/// How a field's value is framed inside the canonical encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// A 32-byte hash.
    Hash32,
    /// A 20-byte address.
    Address,
    /// A 32-byte trie root.
    TrieRoot,
    /// A big-endian integer, left-padded to exactly 256 bytes.
    FixedUint256,
    /// A big-endian integer without leading zeros.
    BigEndianInt,
    /// An arbitrary byte string.
    Binary,
}

impl FieldKind {
    /// The exact byte length of an encoded value of this kind, if fixed.
    pub const fn fixed_length(self) -> Option<usize> {
        match self {
            FieldKind::Hash32 | FieldKind::TrieRoot => Some(32),
            FieldKind::Address => Some(20),
            FieldKind::FixedUint256 => Some(256),
            FieldKind::BigEndianInt | FieldKind::Binary => None,
        }
    }
}

/// A single entry of a [`HeaderSchema`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// The header field
    pub field: HeaderField,
    /// The field's encoding
    pub kind: FieldKind,
}

const fn spec(field: HeaderField, kind: FieldKind) -> FieldSpec {
    FieldSpec { field, kind }
}

/// A versioned, ordered header field layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderSchema {
    /// Name of the layout
    pub name: &'static str,
    /// Layout version, bumped whenever the field list changes
    pub version: u8,
    /// Fields in encoding order
    pub fields: &'static [FieldSpec],
}

impl HeaderSchema {
    /// Whether the layout contains the provided field.
    pub fn contains(&self, field: HeaderField) -> bool {
        self.fields.iter().any(|spec| spec.field == field)
    }
}

/// Layout of a sealed Lynx header.
///
/// Compared to the base protocol, the ommers hash, difficulty, gas limit, mix
/// hash and nonce are absent and `epoch`/`slot` are appended.
pub const LYNX_HEADER_SCHEMA: HeaderSchema = HeaderSchema {
    name: "lynx",
    version: 1,
    fields: &[
        spec(HeaderField::ParentHash, FieldKind::Hash32),
        spec(HeaderField::Coinbase, FieldKind::Address),
        spec(HeaderField::StateRoot, FieldKind::TrieRoot),
        spec(HeaderField::TransactionRoot, FieldKind::TrieRoot),
        spec(HeaderField::ReceiptRoot, FieldKind::TrieRoot),
        spec(HeaderField::Bloom, FieldKind::FixedUint256),
        spec(HeaderField::BlockNumber, FieldKind::BigEndianInt),
        spec(HeaderField::GasUsed, FieldKind::BigEndianInt),
        spec(HeaderField::Timestamp, FieldKind::BigEndianInt),
        spec(HeaderField::ExtraData, FieldKind::Binary),
        spec(HeaderField::Epoch, FieldKind::FixedUint256),
        spec(HeaderField::Slot, FieldKind::FixedUint256),
    ],
};

/// Layout of a Lynx header before it is sealed with its epoch and slot.
pub const LYNX_MINING_HEADER_SCHEMA: HeaderSchema = HeaderSchema {
    name: "lynx-mining",
    version: 1,
    fields: &[
        spec(HeaderField::ParentHash, FieldKind::Hash32),
        spec(HeaderField::Coinbase, FieldKind::Address),
        spec(HeaderField::StateRoot, FieldKind::TrieRoot),
        spec(HeaderField::TransactionRoot, FieldKind::TrieRoot),
        spec(HeaderField::ReceiptRoot, FieldKind::TrieRoot),
        spec(HeaderField::Bloom, FieldKind::FixedUint256),
        spec(HeaderField::BlockNumber, FieldKind::BigEndianInt),
        spec(HeaderField::GasUsed, FieldKind::BigEndianInt),
        spec(HeaderField::Timestamp, FieldKind::BigEndianInt),
        spec(HeaderField::ExtraData, FieldKind::Binary),
    ],
};
