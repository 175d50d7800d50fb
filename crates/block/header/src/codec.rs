//! Canonical encoding of headers.
//!
//! A header is encoded as an RLP list of the fields declared by a
//! [`HeaderSchema`], each framed according to its [`FieldKind`].

use alloy_rlp::Header;
use lynx_primitives::{Address, B256, BLOOM_BYTE_LENGTH, Bloom, Bytes, keccak256};

use crate::{
    BlockHeader, HeaderParts,
    schema::{FieldKind, FieldSpec, HeaderField, HeaderSchema},
};

const ADDRESS_LENGTH: usize = 20;
const HASH_LENGTH: usize = 32;

/// The value of a single header field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldValue<'header> {
    /// A hash or trie root
    Hash(&'header B256),
    /// An address
    Address(&'header Address),
    /// A logs bloom
    Bloom(&'header Bloom),
    /// An unsigned integer
    Uint(u64),
    /// A byte string
    Bytes(&'header [u8]),
}

impl FieldValue<'_> {
    /// The value's big-endian byte representation.
    fn to_be_bytes(self) -> Vec<u8> {
        match self {
            FieldValue::Hash(hash) => hash.to_vec(),
            FieldValue::Address(address) => address.to_vec(),
            FieldValue::Bloom(bloom) => bloom.to_vec(),
            FieldValue::Uint(value) => value.to_be_bytes().to_vec(),
            FieldValue::Bytes(bytes) => bytes.to_vec(),
        }
    }
}

/// Encodes the provided header's fields in the order declared by the schema.
pub fn encode(schema: &HeaderSchema, header: &BlockHeader) -> Vec<u8> {
    let fields: Vec<Vec<u8>> = schema
        .fields
        .iter()
        .map(|spec| frame(spec.kind, header.field_value(spec.field)))
        .collect();

    let payload_length = fields
        .iter()
        .map(|field| <[u8] as alloy_rlp::Encodable>::length(field))
        .sum();

    let mut out = Vec::with_capacity(payload_length + alloy_rlp::length_of_length(payload_length));
    Header {
        list: true,
        payload_length,
    }
    .encode(&mut out);

    for field in &fields {
        <[u8] as alloy_rlp::Encodable>::encode(field, &mut out);
    }

    out
}

/// The length of the provided header's encoding, without encoding it.
pub fn encoded_length(schema: &HeaderSchema, header: &BlockHeader) -> usize {
    let payload_length: usize = schema
        .fields
        .iter()
        .map(|spec| framed_length(spec.kind, header.field_value(spec.field)))
        .sum();

    payload_length + alloy_rlp::length_of_length(payload_length)
}

/// Computes the digest of an encoded header.
pub fn hash(encoded: &[u8]) -> B256 {
    keccak256(encoded)
}

/// Decodes a header that was encoded using the provided schema.
///
/// The schema must declare every header field.
pub fn decode(schema: &HeaderSchema, buf: &mut &[u8]) -> alloy_rlp::Result<BlockHeader> {
    let header = Header::decode(buf)?;
    if !header.list {
        return Err(alloy_rlp::Error::UnexpectedString);
    }

    let (mut payload, rest) = buf
        .split_at_checked(header.payload_length)
        .ok_or(alloy_rlp::Error::InputTooShort)?;

    let mut parts = DecodedParts::default();
    for spec in schema.fields {
        let raw = Header::decode_bytes(&mut payload, false)?;
        parts.assign(*spec, unframe(spec.kind, raw)?)?;
    }

    if !payload.is_empty() {
        return Err(alloy_rlp::Error::ListLengthMismatch {
            expected: header.payload_length,
            got: header.payload_length - payload.len(),
        });
    }

    *buf = rest;
    parts.into_header()
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let empty: &[u8] = &[];

    bytes
        .iter()
        .position(|byte| *byte != 0)
        .map_or(empty, |start| bytes.split_at(start).1)
}

fn frame(kind: FieldKind, value: FieldValue<'_>) -> Vec<u8> {
    let bytes = value.to_be_bytes();

    match kind {
        FieldKind::Hash32 | FieldKind::Address | FieldKind::TrieRoot | FieldKind::Binary => bytes,
        FieldKind::BigEndianInt => strip_leading_zeros(&bytes).to_vec(),
        FieldKind::FixedUint256 => {
            let significant = strip_leading_zeros(&bytes);
            debug_assert!(significant.len() <= BLOOM_BYTE_LENGTH);

            let mut padded = vec![0u8; BLOOM_BYTE_LENGTH.max(significant.len())];
            let offset = padded.len() - significant.len();
            padded.split_at_mut(offset).1.copy_from_slice(significant);
            padded
        }
    }
}

/// The length of a framed value's RLP string encoding.
fn framed_length(kind: FieldKind, value: FieldValue<'_>) -> usize {
    match (kind.fixed_length(), value) {
        (Some(length), _) => length + alloy_rlp::length_of_length(length),
        (None, FieldValue::Bytes(bytes)) if kind == FieldKind::Binary => {
            <[u8] as alloy_rlp::Encodable>::length(bytes)
        }
        (None, FieldValue::Uint(value)) if kind == FieldKind::BigEndianInt => {
            <u64 as alloy_rlp::Encodable>::length(&value)
        }
        (None, value) => <[u8] as alloy_rlp::Encodable>::length(&frame(kind, value)),
    }
}

fn unframe(kind: FieldKind, raw: &[u8]) -> alloy_rlp::Result<&[u8]> {
    match kind.fixed_length() {
        Some(length) if raw.len() != length => Err(alloy_rlp::Error::UnexpectedLength),
        Some(_) => Ok(raw),
        None if kind == FieldKind::BigEndianInt && raw.first() == Some(&0) => {
            Err(alloy_rlp::Error::LeadingZero)
        }
        None => Ok(raw),
    }
}

fn decode_hash(raw: &[u8]) -> alloy_rlp::Result<B256> {
    if raw.len() == HASH_LENGTH {
        Ok(B256::from_slice(raw))
    } else {
        Err(alloy_rlp::Error::UnexpectedLength)
    }
}

fn decode_uint(raw: &[u8]) -> alloy_rlp::Result<u64> {
    let significant = strip_leading_zeros(raw);
    if significant.len() > size_of::<u64>() {
        return Err(alloy_rlp::Error::Overflow);
    }

    Ok(significant
        .iter()
        .fold(0u64, |value, byte| (value << 8) | u64::from(*byte)))
}

#[derive(Default)]
struct DecodedParts {
    parent_hash: Option<B256>,
    coinbase: Option<Address>,
    state_root: Option<B256>,
    transaction_root: Option<B256>,
    receipt_root: Option<B256>,
    bloom: Option<Bloom>,
    block_number: Option<u64>,
    gas_used: Option<u64>,
    timestamp: Option<u64>,
    extra_data: Option<Bytes>,
    epoch: Option<u64>,
    slot: Option<u64>,
}

impl DecodedParts {
    fn assign(&mut self, spec: FieldSpec, raw: &[u8]) -> alloy_rlp::Result<()> {
        match spec.field {
            HeaderField::ParentHash => self.parent_hash = Some(decode_hash(raw)?),
            HeaderField::Coinbase => {
                if raw.len() != ADDRESS_LENGTH {
                    return Err(alloy_rlp::Error::UnexpectedLength);
                }
                self.coinbase = Some(Address::from_slice(raw));
            }
            HeaderField::StateRoot => self.state_root = Some(decode_hash(raw)?),
            HeaderField::TransactionRoot => self.transaction_root = Some(decode_hash(raw)?),
            HeaderField::ReceiptRoot => self.receipt_root = Some(decode_hash(raw)?),
            HeaderField::Bloom => {
                if raw.len() != BLOOM_BYTE_LENGTH {
                    return Err(alloy_rlp::Error::UnexpectedLength);
                }
                self.bloom = Some(Bloom::from_slice(raw));
            }
            HeaderField::BlockNumber => self.block_number = Some(decode_uint(raw)?),
            HeaderField::GasUsed => self.gas_used = Some(decode_uint(raw)?),
            HeaderField::Timestamp => self.timestamp = Some(decode_uint(raw)?),
            HeaderField::ExtraData => self.extra_data = Some(Bytes::copy_from_slice(raw)),
            HeaderField::Epoch => self.epoch = Some(decode_uint(raw)?),
            HeaderField::Slot => self.slot = Some(decode_uint(raw)?),
        }

        Ok(())
    }

    fn into_header(self) -> alloy_rlp::Result<BlockHeader> {
        const MISSING_FIELD: alloy_rlp::Error =
            alloy_rlp::Error::Custom("header layout does not declare every field");

        Ok(BlockHeader::from_parts(HeaderParts {
            parent_hash: self.parent_hash.ok_or(MISSING_FIELD)?,
            coinbase: self.coinbase.ok_or(MISSING_FIELD)?,
            state_root: self.state_root.ok_or(MISSING_FIELD)?,
            transaction_root: self.transaction_root.ok_or(MISSING_FIELD)?,
            receipt_root: self.receipt_root.ok_or(MISSING_FIELD)?,
            bloom: self.bloom.ok_or(MISSING_FIELD)?,
            block_number: self.block_number.ok_or(MISSING_FIELD)?,
            gas_used: self.gas_used.ok_or(MISSING_FIELD)?,
            timestamp: self.timestamp.ok_or(MISSING_FIELD)?,
            extra_data: self.extra_data.ok_or(MISSING_FIELD)?,
            epoch: self.epoch.ok_or(MISSING_FIELD)?,
            slot: self.slot.ok_or(MISSING_FIELD)?,
        }))
    }
}
