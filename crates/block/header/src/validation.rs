use crate::{BlockHeader, schema::HeaderField};

/// The default maximum size of a header's extra data, in bytes.
pub const MAX_EXTRA_DATA_BYTES: usize = 32;

/// Rules a header must satisfy to extend its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderRules {
    /// Maximum size of the extra data, in bytes
    pub max_extra_data_bytes: usize,
}

impl HeaderRules {
    /// Constructs rules with the provided extra data bound.
    pub const fn new(max_extra_data_bytes: usize) -> Self {
        Self {
            max_extra_data_bytes,
        }
    }
}

impl Default for HeaderRules {
    fn default() -> Self {
        Self::new(MAX_EXTRA_DATA_BYTES)
    }
}

/// An error that occurs when a header cannot extend its parent.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HeaderValidityError {
    /// The header's parent is not known.
    #[error("Parent of block #{block_number} is missing")]
    MissingParent {
        /// The number of the rejected block
        block_number: u64,
    },
    /// A header field exceeds its bound.
    #[error("The {} field of block #{block_number} is {actual} bytes long, which exceeds the maximum of {max} bytes", .field.name())]
    InvalidHeaderField {
        /// The offending field
        field: HeaderField,
        /// The number of the rejected block
        block_number: u64,
        /// The field's size
        actual: usize,
        /// The field's maximum size
        max: usize,
    },
    /// The header does not directly follow its parent.
    #[error("Block number {actual} does not follow parent block number {parent}")]
    NonSequentialBlockNumber {
        /// The header's block number
        actual: u64,
        /// The parent's block number
        parent: u64,
    },
    /// The header's timestamp does not exceed its parent's.
    #[error("Timestamp {child} must be greater than parent timestamp {parent}")]
    NonMonotonicTimestamp {
        /// The header's timestamp
        child: u64,
        /// The parent's timestamp
        parent: u64,
    },
}

impl HeaderValidityError {
    /// Whether the header can never become valid.
    ///
    /// A missing parent may become available later, e.g. after a sync step.
    /// All other rejections depend only on the header and its parent.
    pub fn is_permanent(&self) -> bool {
        !matches!(self, HeaderValidityError::MissingParent { .. })
    }
}

/// Validates whether `header` may extend `parent`.
///
/// Checks are applied in order and the first failure is returned:
/// the parent must be present, the extra data must be within bounds, the
/// block number must be exactly one higher than the parent's, and the
/// timestamp must be strictly greater than the parent's.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn validate_next_header(
    rules: &HeaderRules,
    header: &BlockHeader,
    parent: Option<&BlockHeader>,
) -> Result<(), HeaderValidityError> {
    let result = check_next_header(rules, header, parent);
    if let Err(error) = &result {
        log::debug!("Rejected header {header}: {error}");
    }

    result
}

fn check_next_header(
    rules: &HeaderRules,
    header: &BlockHeader,
    parent: Option<&BlockHeader>,
) -> Result<(), HeaderValidityError> {
    let Some(parent) = parent else {
        return Err(HeaderValidityError::MissingParent {
            block_number: header.block_number(),
        });
    };

    let extra_data_len = header.extra_data().len();
    if extra_data_len > rules.max_extra_data_bytes {
        return Err(HeaderValidityError::InvalidHeaderField {
            field: HeaderField::ExtraData,
            block_number: header.block_number(),
            actual: extra_data_len,
            max: rules.max_extra_data_bytes,
        });
    }

    if parent.block_number().checked_add(1) != Some(header.block_number()) {
        return Err(HeaderValidityError::NonSequentialBlockNumber {
            actual: header.block_number(),
            parent: parent.block_number(),
        });
    }

    if header.timestamp() <= parent.timestamp() {
        return Err(HeaderValidityError::NonMonotonicTimestamp {
            child: header.timestamp(),
            parent: parent.timestamp(),
        });
    }

    Ok(())
}
