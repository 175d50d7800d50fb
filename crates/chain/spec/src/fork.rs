use core::fmt::Debug;

use lynx_block_header::{
    BlockHeader, HeaderRules, HeaderValidityError,
    schema::{HeaderSchema, LYNX_HEADER_SCHEMA},
    validate_next_header,
};
use lynx_primitives::B256;

/// Decodes a fork's stored transaction encodings.
pub trait TransactionBuilder {
    /// The fork's signed transaction type.
    type Transaction;

    /// Decodes a single transaction.
    fn decode_transaction(encoded: &[u8]) -> alloy_rlp::Result<Self::Transaction>;
}

/// Decodes a fork's stored receipt encodings.
pub trait ReceiptBuilder {
    /// The fork's receipt type.
    type Receipt;

    /// Decodes a single receipt.
    fn decode_receipt(encoded: &[u8]) -> alloy_rlp::Result<Self::Receipt>;
}

/// Value-level configuration of a fork.
///
/// A fork that changes a single rule of its predecessor is derived from it
/// using [`ForkConfig::inherit`] followed by the override.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForkConfig {
    /// The fork's name
    pub name: &'static str,
    /// Layout of a sealed header
    pub header_schema: HeaderSchema,
    /// Layout of a header that is being mined
    pub mining_header_schema: HeaderSchema,
    /// Rules for extending a chain with a new header
    pub header_rules: HeaderRules,
}

impl ForkConfig {
    /// Constructs a fork with the same configuration as `parent`.
    pub const fn inherit(parent: ForkConfig, name: &'static str) -> Self {
        Self { name, ..parent }
    }

    /// Overrides the fork's header validation rules.
    pub const fn with_header_rules(self, header_rules: HeaderRules) -> Self {
        Self {
            header_rules,
            ..self
        }
    }

    /// Overrides the fork's header layouts.
    pub const fn with_header_schemas(
        self,
        header_schema: HeaderSchema,
        mining_header_schema: HeaderSchema,
    ) -> Self {
        Self {
            header_schema,
            mining_header_schema,
            ..self
        }
    }

    /// Calculates the hash of the provided header under this fork's layout.
    pub fn header_hash(&self, header: &BlockHeader) -> B256 {
        if self.header_schema == LYNX_HEADER_SCHEMA {
            header.hash()
        } else {
            header.hash_with_schema(&self.header_schema)
        }
    }

    /// Calculates the mining hash of the provided header under this fork's
    /// layout.
    pub fn mining_hash(&self, header: &BlockHeader) -> B256 {
        header.hash_with_schema(&self.mining_header_schema)
    }

    /// Validates whether `header` may extend `parent` under this fork's rules.
    pub fn validate_header(
        &self,
        header: &BlockHeader,
        parent: Option<&BlockHeader>,
    ) -> Result<(), HeaderValidityError> {
        validate_next_header(&self.header_rules, header, parent)
    }
}

/// Type-level specification of a fork.
pub trait ForkSpec: 'static {
    /// The fork's signed transaction type.
    type SignedTransaction: Clone + Debug + PartialEq + alloy_rlp::Encodable;
    /// The fork's receipt type.
    type Receipt: Debug + alloy_rlp::Encodable;
    /// Type that decodes the fork's transactions.
    type TransactionBuilder: TransactionBuilder<Transaction = Self::SignedTransaction>;
    /// Type that decodes the fork's receipts.
    type ReceiptBuilder: ReceiptBuilder<Receipt = Self::Receipt>;

    /// The fork's value-level configuration.
    const FORK: ForkConfig;
}
