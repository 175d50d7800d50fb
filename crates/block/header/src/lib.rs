//! Lynx block header
//!
//! The Lynx fork replaces the proof-of-work fields of the base protocol's
//! header with an `epoch` and `slot` assignment, and drops the ommers hash,
//! difficulty and gas limit.

pub mod codec;
pub mod schema;
mod validation;

use core::fmt;
use std::{
    sync::OnceLock,
    time::{SystemTime, UNIX_EPOCH},
};

use derive_where::derive_where;
use lynx_primitives::{
    Address, B256, BLANK_ROOT_HASH, Bloom, Bytes, GENESIS_BLOCK_NUMBER, GENESIS_PARENT_HASH,
    ZERO_ADDRESS,
};

pub use self::validation::{
    HeaderRules, HeaderValidityError, MAX_EXTRA_DATA_BYTES, validate_next_header,
};
use self::{
    codec::FieldValue,
    schema::{HeaderField, HeaderSchema, LYNX_HEADER_SCHEMA, LYNX_MINING_HEADER_SCHEMA},
};

/// The epoch and slot assigned to a header when none are provided.
pub const DEFAULT_EPOCH_AND_SLOT: u64 = 1;

/// An error that occurs upon creation of a [`BlockHeader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HeaderCreationError {
    /// A timestamp can only be derived for genesis headers.
    #[error(
        "Must set timestamp explicitly if this is not a genesis header. Parent hash: {parent_hash}"
    )]
    AmbiguousTimestamp {
        /// The header's parent hash
        parent_hash: B256,
    },
    /// The parent is the last block number can represent.
    #[error("Block #{parent_number} cannot have a child, as its number would overflow")]
    BlockNumberOverflow {
        /// The parent's block number
        parent_number: u64,
    },
}

/// An error that occurs when accessing a field that does not exist at the
/// block's hardfork.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{field} is not available at block #{block_number}")]
pub struct FieldUnavailable {
    /// Name of the requested field
    pub field: &'static str,
    /// The block's number
    pub block_number: u64,
}

/// Options for constructing a [`BlockHeader`].
///
/// Fields that are not set default to the zero or empty value of their type,
/// with the exception of the trie roots, which default to the root of an
/// empty trie, and the epoch and slot.
#[derive(Clone, Debug, Default)]
pub struct HeaderOptions {
    /// The parent block's hash
    pub parent_hash: Option<B256>,
    /// The block's beneficiary address
    pub coinbase: Option<Address>,
    /// The state's root hash
    pub state_root: Option<B256>,
    /// The transactions' root hash
    pub transaction_root: Option<B256>,
    /// The receipts' root hash
    pub receipt_root: Option<B256>,
    /// The logs' bloom
    pub bloom: Option<Bloom>,
    /// The amount of gas used by the block
    pub gas_used: Option<u64>,
    /// The block's timestamp
    pub timestamp: Option<u64>,
    /// The block's extra data
    pub extra_data: Option<Bytes>,
    /// The block's epoch
    pub epoch: Option<u64>,
    /// The block's slot
    pub slot: Option<u64>,
}

/// Lynx block header
#[derive(Clone, serde::Deserialize, serde::Serialize)]
#[derive_where(Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    parent_hash: B256,
    coinbase: Address,
    state_root: B256,
    transaction_root: B256,
    receipt_root: B256,
    bloom: Bloom,
    block_number: u64,
    gas_used: u64,
    timestamp: u64,
    extra_data: Bytes,
    epoch: u64,
    slot: u64,
    #[derive_where(skip)]
    #[serde(skip)]
    hash: OnceLock<B256>,
}

/// The complete set of field values of a [`BlockHeader`].
pub(crate) struct HeaderParts {
    pub parent_hash: B256,
    pub coinbase: Address,
    pub state_root: B256,
    pub transaction_root: B256,
    pub receipt_root: B256,
    pub bloom: Bloom,
    pub block_number: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: Bytes,
    pub epoch: u64,
    pub slot: u64,
}

impl BlockHeader {
    /// Constructs a header with the provided block number and options.
    ///
    /// Only a header whose parent is the genesis sentinel may omit its
    /// timestamp, in which case the current time is used.
    pub fn new(block_number: u64, options: HeaderOptions) -> Result<Self, HeaderCreationError> {
        let HeaderOptions {
            parent_hash,
            coinbase,
            state_root,
            transaction_root,
            receipt_root,
            bloom,
            gas_used,
            timestamp,
            extra_data,
            epoch,
            slot,
        } = options;

        let parent_hash = parent_hash.unwrap_or(GENESIS_PARENT_HASH);
        let timestamp = match timestamp {
            Some(timestamp) => timestamp,
            None if parent_hash == GENESIS_PARENT_HASH => unix_timestamp(),
            // Without the parent header, a next timestamp cannot be selected.
            None => return Err(HeaderCreationError::AmbiguousTimestamp { parent_hash }),
        };

        Ok(Self::from_parts(HeaderParts {
            parent_hash,
            coinbase: coinbase.unwrap_or(ZERO_ADDRESS),
            state_root: state_root.unwrap_or(BLANK_ROOT_HASH),
            transaction_root: transaction_root.unwrap_or(BLANK_ROOT_HASH),
            receipt_root: receipt_root.unwrap_or(BLANK_ROOT_HASH),
            bloom: bloom.unwrap_or_default(),
            block_number,
            gas_used: gas_used.unwrap_or_default(),
            timestamp,
            extra_data: extra_data.unwrap_or_default(),
            epoch: epoch.unwrap_or(DEFAULT_EPOCH_AND_SLOT),
            slot: slot.unwrap_or(DEFAULT_EPOCH_AND_SLOT),
        }))
    }

    /// Constructs the header of a block extending `parent`.
    ///
    /// The parent hash and block number are derived from `parent`, overriding
    /// those in `options`. Without a timestamp, the later of the current time
    /// and one second past the parent's timestamp is used.
    pub fn from_parent(
        parent: &BlockHeader,
        mut options: HeaderOptions,
    ) -> Result<Self, HeaderCreationError> {
        let block_number = parent.block_number.checked_add(1).ok_or(
            HeaderCreationError::BlockNumberOverflow {
                parent_number: parent.block_number,
            },
        )?;

        options.parent_hash = Some(parent.hash());
        options.timestamp = Some(
            options
                .timestamp
                .unwrap_or_else(|| unix_timestamp().max(parent.timestamp.saturating_add(1))),
        );

        Self::new(block_number, options)
    }

    pub(crate) fn from_parts(parts: HeaderParts) -> Self {
        let HeaderParts {
            parent_hash,
            coinbase,
            state_root,
            transaction_root,
            receipt_root,
            bloom,
            block_number,
            gas_used,
            timestamp,
            extra_data,
            epoch,
            slot,
        } = parts;

        Self {
            parent_hash,
            coinbase,
            state_root,
            transaction_root,
            receipt_root,
            bloom,
            block_number,
            gas_used,
            timestamp,
            extra_data,
            epoch,
            slot,
            hash: OnceLock::new(),
        }
    }

    /// Returns the options that reconstruct this header.
    pub fn to_options(&self) -> HeaderOptions {
        HeaderOptions {
            parent_hash: Some(self.parent_hash),
            coinbase: Some(self.coinbase),
            state_root: Some(self.state_root),
            transaction_root: Some(self.transaction_root),
            receipt_root: Some(self.receipt_root),
            bloom: Some(self.bloom),
            gas_used: Some(self.gas_used),
            timestamp: Some(self.timestamp),
            extra_data: Some(self.extra_data.clone()),
            epoch: Some(self.epoch),
            slot: Some(self.slot),
        }
    }

    /// Calculates the block's hash.
    ///
    /// The hash is computed on first access and cached for the lifetime of
    /// the header.
    pub fn hash(&self) -> B256 {
        *self
            .hash
            .get_or_init(|| codec::hash(&codec::encode(&LYNX_HEADER_SCHEMA, self)))
    }

    /// Returns the block's hash as a `0x`-prefixed hex string.
    pub fn hex_hash(&self) -> String {
        self.hash().to_string()
    }

    /// Calculates the hash of the header before it is sealed with an epoch
    /// and slot.
    pub fn mining_hash(&self) -> B256 {
        codec::hash(&codec::encode(&LYNX_MINING_HEADER_SCHEMA, self))
    }

    /// Calculates the hash of the header using the provided layout.
    pub fn hash_with_schema(&self, schema: &HeaderSchema) -> B256 {
        codec::hash(&codec::encode(schema, self))
    }

    /// Whether the header is the header of a genesis block.
    ///
    /// Both conditions are needed. A header with the genesis parent hash but a
    /// non-zero number must not bypass parent validation.
    pub fn is_genesis(&self) -> bool {
        self.parent_hash == GENESIS_PARENT_HASH && self.block_number == GENESIS_BLOCK_NUMBER
    }

    /// The base fee per gas. Lynx headers never contain one.
    pub fn base_fee_per_gas(&self) -> Result<u128, FieldUnavailable> {
        Err(FieldUnavailable {
            field: "base_fee_per_gas",
            block_number: self.block_number,
        })
    }

    /// The parent block's hash
    pub fn parent_hash(&self) -> &B256 {
        &self.parent_hash
    }

    /// The block's beneficiary address
    pub fn coinbase(&self) -> &Address {
        &self.coinbase
    }

    /// The state's root hash
    pub fn state_root(&self) -> &B256 {
        &self.state_root
    }

    /// The transactions' root hash
    pub fn transaction_root(&self) -> &B256 {
        &self.transaction_root
    }

    /// The receipts' root hash
    pub fn receipt_root(&self) -> &B256 {
        &self.receipt_root
    }

    /// The logs' bloom
    pub fn bloom(&self) -> &Bloom {
        &self.bloom
    }

    /// The block's number
    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    /// The amount of gas used by the block
    pub fn gas_used(&self) -> u64 {
        self.gas_used
    }

    /// The block's timestamp
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// The block's extra data
    pub fn extra_data(&self) -> &Bytes {
        &self.extra_data
    }

    /// The block's epoch
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The block's slot
    pub fn slot(&self) -> u64 {
        self.slot
    }

    /// Returns the value of the provided field.
    pub fn field_value(&self, field: HeaderField) -> FieldValue<'_> {
        match field {
            HeaderField::ParentHash => FieldValue::Hash(&self.parent_hash),
            HeaderField::Coinbase => FieldValue::Address(&self.coinbase),
            HeaderField::StateRoot => FieldValue::Hash(&self.state_root),
            HeaderField::TransactionRoot => FieldValue::Hash(&self.transaction_root),
            HeaderField::ReceiptRoot => FieldValue::Hash(&self.receipt_root),
            HeaderField::Bloom => FieldValue::Bloom(&self.bloom),
            HeaderField::BlockNumber => FieldValue::Uint(self.block_number),
            HeaderField::GasUsed => FieldValue::Uint(self.gas_used),
            HeaderField::Timestamp => FieldValue::Uint(self.timestamp),
            HeaderField::ExtraData => FieldValue::Bytes(&self.extra_data),
            HeaderField::Epoch => FieldValue::Uint(self.epoch),
            HeaderField::Slot => FieldValue::Uint(self.slot),
        }
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Current time must be after unix epoch")
        .as_secs()
}

impl fmt::Display for BlockHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ", self.block_number)?;
        for byte in self.hash().iter().take(4) {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl alloy_rlp::Encodable for BlockHeader {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        out.put_slice(&codec::encode(&LYNX_HEADER_SCHEMA, self));
    }

    fn length(&self) -> usize {
        codec::encoded_length(&LYNX_HEADER_SCHEMA, self)
    }
}

impl alloy_rlp::Decodable for BlockHeader {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        codec::decode(&LYNX_HEADER_SCHEMA, buf)
    }
}
