//! Types related to transaction receipts.

use alloy_rlp::{Buf as _, RlpDecodable, RlpEncodable};
use lynx_chain_spec::ReceiptBuilder;
use lynx_primitives::{Address, B256, Bloom, BloomInput, Bytes};

/// A log emitted during the execution of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, RlpDecodable, RlpEncodable)]
pub struct ExecutionLog {
    /// The emitting contract's address
    pub address: Address,
    /// Indexed topics
    pub topics: Vec<B256>,
    /// Non-indexed data
    pub data: Bytes,
}

/// The outcome of a transaction's execution.
#[derive(Clone, Debug, PartialEq, Eq, RlpDecodable, RlpEncodable)]
pub struct Receipt {
    /// Whether the transaction succeeded
    pub status: bool,
    /// Cumulative gas used in block after this transaction was executed
    pub cumulative_gas_used: u64,
    /// Bloom filter of the logs generated within this transaction
    pub logs_bloom: Bloom,
    /// Logs generated within this transaction
    pub logs: Vec<ExecutionLog>,
}

impl Receipt {
    /// Constructs a receipt, deriving its bloom from the logs.
    pub fn new(status: bool, cumulative_gas_used: u64, logs: Vec<ExecutionLog>) -> Self {
        let mut logs_bloom = Bloom::ZERO;
        for log in &logs {
            logs_bloom.accrue(BloomInput::Raw(log.address.as_slice()));
            for topic in &log.topics {
                logs_bloom.accrue(BloomInput::Raw(topic.as_slice()));
            }
        }

        Self {
            status,
            cumulative_gas_used,
            logs_bloom,
            logs,
        }
    }
}

/// Type of the transaction a receipt belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionType {
    /// Legacy transaction
    Legacy,
    /// EIP-2930 transaction
    Eip2930,
    /// EIP-1559 transaction
    Eip1559,
}

impl From<TransactionType> for u8 {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Legacy => 0,
            TransactionType::Eip2930 => 1,
            TransactionType::Eip1559 => 2,
        }
    }
}

impl TryFrom<u8> for TransactionType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TransactionType::Legacy),
            1 => Ok(TransactionType::Eip2930),
            2 => Ok(TransactionType::Eip1559),
            value => Err(value),
        }
    }
}

/// An EIP-2718 typed receipt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypedReceipt {
    /// Receipt of a legacy transaction
    Legacy(Receipt),
    /// Receipt of an EIP-2930 transaction
    Eip2930(Receipt),
    /// Receipt of an EIP-1559 transaction
    Eip1559(Receipt),
}

impl TypedReceipt {
    /// Constructs a typed envelope around the given receipt.
    pub fn new(receipt: Receipt, transaction_type: TransactionType) -> Self {
        match transaction_type {
            TransactionType::Legacy => Self::Legacy(receipt),
            TransactionType::Eip2930 => Self::Eip2930(receipt),
            TransactionType::Eip1559 => Self::Eip1559(receipt),
        }
    }

    /// Returns the receipt inside the envelope.
    pub fn data(&self) -> &Receipt {
        match self {
            TypedReceipt::Legacy(receipt)
            | TypedReceipt::Eip2930(receipt)
            | TypedReceipt::Eip1559(receipt) => receipt,
        }
    }

    /// Returns the type of the receipt's transaction.
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TypedReceipt::Legacy(_) => TransactionType::Legacy,
            TypedReceipt::Eip2930(_) => TransactionType::Eip2930,
            TypedReceipt::Eip1559(_) => TransactionType::Eip1559,
        }
    }
}

impl alloy_rlp::Decodable for TypedReceipt {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let first = *buf.first().ok_or(alloy_rlp::Error::InputTooShort)?;
        let transaction_type = if first >= alloy_rlp::EMPTY_LIST_CODE {
            TransactionType::Legacy
        } else {
            // Consume the type byte
            buf.advance(1);

            TransactionType::try_from(first)
                .map_err(|_type| alloy_rlp::Error::Custom("unknown receipt type"))?
        };

        let receipt = <Receipt as alloy_rlp::Decodable>::decode(buf)?;
        Ok(TypedReceipt::new(receipt, transaction_type))
    }
}

impl alloy_rlp::Encodable for TypedReceipt {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        let transaction_type: u8 = self.transaction_type().into();
        if transaction_type > 0 {
            out.put_u8(transaction_type);
        }

        alloy_rlp::Encodable::encode(self.data(), out);
    }

    fn length(&self) -> usize {
        let type_length = usize::from(u8::from(self.transaction_type()) > 0u8);
        type_length + alloy_rlp::Encodable::length(self.data())
    }
}

/// Decodes receipts of legacy, EIP-2930 and EIP-1559 transactions.
#[derive(Clone, Copy, Debug)]
pub struct LondonReceiptBuilder;

impl ReceiptBuilder for LondonReceiptBuilder {
    type Receipt = TypedReceipt;

    fn decode_receipt(encoded: &[u8]) -> alloy_rlp::Result<TypedReceipt> {
        alloy_rlp::decode_exact(encoded)
    }
}
