use std::sync::OnceLock;

use derive_where::derive_where;
use lynx_block_header::{BlockHeader, FieldUnavailable};
use lynx_primitives::{Address, B256, U256};
use parking_lot::Mutex;

type PrevHashesSource = Box<dyn Iterator<Item = B256> + Send>;

/// Values of an [`ExecutionContext`].
#[derive(Clone, Debug, Default)]
pub struct ContextOptions {
    /// The block's beneficiary address
    pub coinbase: Address,
    /// The block's timestamp
    pub timestamp: u64,
    /// The block's number
    pub block_number: u64,
    /// The block's difficulty
    pub difficulty: U256,
    /// The block's gas limit
    pub gas_limit: u64,
    /// The chain ID
    pub chain_id: u64,
    /// The block's base fee per gas, if the fork has one
    pub base_fee_per_gas: Option<u128>,
}

/// The environment a block's transactions are executed in.
///
/// Constructed once per candidate block, right before execution.
#[derive_where(Debug)]
pub struct ExecutionContext {
    coinbase: Address,
    timestamp: u64,
    block_number: u64,
    difficulty: U256,
    gas_limit: u64,
    chain_id: u64,
    base_fee_per_gas: Option<u128>,
    prev_hashes: OnceLock<Vec<B256>>,
    #[derive_where(skip)]
    prev_hashes_source: Mutex<Option<PrevHashesSource>>,
}

impl ExecutionContext {
    /// Constructs a new instance.
    ///
    /// `prev_hashes` yields the hashes of the ancestors of the block, most
    /// recent first. It is not traversed until [`Self::prev_hashes`] is first
    /// called.
    pub fn new<PrevHashesT>(options: ContextOptions, prev_hashes: PrevHashesT) -> Self
    where
        PrevHashesT: IntoIterator<Item = B256>,
        PrevHashesT::IntoIter: Send + 'static,
    {
        let ContextOptions {
            coinbase,
            timestamp,
            block_number,
            difficulty,
            gas_limit,
            chain_id,
            base_fee_per_gas,
        } = options;

        Self {
            coinbase,
            timestamp,
            block_number,
            difficulty,
            gas_limit,
            chain_id,
            base_fee_per_gas,
            prev_hashes: OnceLock::new(),
            prev_hashes_source: Mutex::new(Some(Box::new(prev_hashes.into_iter()))),
        }
    }

    /// Constructs the context of the block with the provided header.
    pub fn for_header<PrevHashesT>(
        header: &BlockHeader,
        gas_limit: u64,
        chain_id: u64,
        prev_hashes: PrevHashesT,
    ) -> Self
    where
        PrevHashesT: IntoIterator<Item = B256>,
        PrevHashesT::IntoIter: Send + 'static,
    {
        Self::new(
            ContextOptions {
                coinbase: *header.coinbase(),
                timestamp: header.timestamp(),
                block_number: header.block_number(),
                difficulty: U256::ZERO,
                gas_limit,
                chain_id,
                base_fee_per_gas: header.base_fee_per_gas().ok(),
            },
            prev_hashes,
        )
    }

    /// The block's beneficiary address
    pub fn coinbase(&self) -> &Address {
        &self.coinbase
    }

    /// The block's timestamp
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// The block's number
    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    /// The block's gas limit
    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    /// The chain ID
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The block's difficulty.
    ///
    /// Returns zero for any positive stored difficulty, so only a stored zero
    /// is observable.
    pub fn difficulty(&self) -> U256 {
        // FIXME: the comparison is likely inverted; confirm the intended
        // clamp before changing observable behavior.
        if self.difficulty > U256::ZERO {
            U256::ZERO
        } else {
            self.difficulty
        }
    }

    /// The block's base fee per gas.
    pub fn base_fee_per_gas(&self) -> Result<u128, FieldUnavailable> {
        self.base_fee_per_gas.ok_or(FieldUnavailable {
            field: "base_fee_per_gas",
            block_number: self.block_number,
        })
    }

    /// The hashes of the block's ancestors, most recent first.
    ///
    /// The source is consumed on the first call and the result is cached.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn prev_hashes(&self) -> &[B256] {
        self.prev_hashes.get_or_init(|| {
            self.prev_hashes_source
                .lock()
                .take()
                .map(Iterator::collect)
                .unwrap_or_default()
        })
    }
}
