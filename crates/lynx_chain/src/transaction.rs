use std::sync::OnceLock;

use alloy_rlp::{RlpDecodable, RlpEncodable};
use lynx_chain_spec::TransactionBuilder;
use lynx_primitives::{B256, Bytes, TxKind, U256, keccak256};

/// A signed legacy transaction.
///
/// The signature is kept as raw `v`, `r`, `s` values; the sender is not
/// recovered.
#[derive(Clone, Debug, Eq, RlpEncodable)]
pub struct LegacyTransaction {
    // The order of these fields determines encoding order.
    /// The sender's nonce
    pub nonce: u64,
    /// Price per unit of gas
    pub gas_price: u128,
    /// Maximum amount of gas the transaction may use
    pub gas_limit: u64,
    /// Call target or contract creation
    pub kind: TxKind,
    /// Amount of wei transferred
    pub value: U256,
    /// Call data or init code
    pub input: Bytes,
    /// Signature recovery value
    pub v: u64,
    /// Signature `r` value
    pub r: U256,
    /// Signature `s` value
    pub s: U256,
    /// Cached transaction hash
    #[rlp(skip)]
    hash: OnceLock<B256>,
}

impl LegacyTransaction {
    /// The type identifier of a legacy transaction.
    pub const TYPE: u8 = 0;

    /// Constructs a transaction from its fields and signature.
    pub fn new(
        nonce: u64,
        gas_price: u128,
        gas_limit: u64,
        kind: TxKind,
        value: U256,
        input: Bytes,
        signature: (u64, U256, U256),
    ) -> Self {
        let (v, r, s) = signature;

        Self {
            nonce,
            gas_price,
            gas_limit,
            kind,
            value,
            input,
            v,
            r,
            s,
            hash: OnceLock::new(),
        }
    }

    /// The transaction's hash; i.e. the keccak-256 hash of its encoding.
    pub fn transaction_hash(&self) -> &B256 {
        self.hash.get_or_init(|| keccak256(alloy_rlp::encode(self)))
    }

    /// The chain ID the transaction was signed for, if it is replay-protected.
    pub fn chain_id(&self) -> Option<u64> {
        (self.v >= 35).then(|| (self.v - 35) / 2)
    }
}

impl alloy_rlp::Decodable for LegacyTransaction {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        #[derive(RlpDecodable)]
        struct Decodable {
            // The order of these fields determines decoding order.
            nonce: u64,
            gas_price: u128,
            gas_limit: u64,
            kind: TxKind,
            value: U256,
            input: Bytes,
            v: u64,
            r: U256,
            s: U256,
        }

        let Decodable {
            nonce,
            gas_price,
            gas_limit,
            kind,
            value,
            input,
            v,
            r,
            s,
        } = <Decodable as alloy_rlp::Decodable>::decode(buf)?;

        Ok(Self::new(
            nonce,
            gas_price,
            gas_limit,
            kind,
            value,
            input,
            (v, r, s),
        ))
    }
}

impl PartialEq for LegacyTransaction {
    fn eq(&self, other: &Self) -> bool {
        self.nonce == other.nonce
            && self.gas_price == other.gas_price
            && self.gas_limit == other.gas_limit
            && self.kind == other.kind
            && self.value == other.value
            && self.input == other.input
            && self.v == other.v
            && self.r == other.r
            && self.s == other.s
    }
}

/// Decodes the transactions of the Lynx fork.
#[derive(Clone, Copy, Debug)]
pub struct LegacyTransactionBuilder;

impl TransactionBuilder for LegacyTransactionBuilder {
    type Transaction = LegacyTransaction;

    fn decode_transaction(encoded: &[u8]) -> alloy_rlp::Result<LegacyTransaction> {
        match encoded.first() {
            Some(first) if *first < alloy_rlp::EMPTY_LIST_CODE => Err(alloy_rlp::Error::Custom(
                "typed transactions are not supported",
            )),
            _ => alloy_rlp::decode_exact(encoded),
        }
    }
}
