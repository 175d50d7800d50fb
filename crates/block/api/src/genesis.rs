use lynx_block_header::{BlockHeader, HeaderCreationError, HeaderOptions};
use lynx_chain_spec::ForkSpec;
use lynx_primitives::{Address, B256, Bytes, GENESIS_BLOCK_NUMBER};

use crate::LynxBlock;

/// Options for creating a genesis block.
#[derive(Clone, Debug, Default)]
pub struct GenesisBlockOptions {
    /// The block's beneficiary address
    pub coinbase: Option<Address>,
    /// The genesis state's root hash
    pub state_root: Option<B256>,
    /// The block's timestamp. Defaults to the current time.
    pub timestamp: Option<u64>,
    /// The block's extra data
    pub extra_data: Option<Bytes>,
    /// The block's epoch
    pub epoch: Option<u64>,
    /// The block's slot
    pub slot: Option<u64>,
}

impl From<GenesisBlockOptions> for HeaderOptions {
    fn from(value: GenesisBlockOptions) -> Self {
        let GenesisBlockOptions {
            coinbase,
            state_root,
            timestamp,
            extra_data,
            epoch,
            slot,
        } = value;

        Self {
            coinbase,
            state_root,
            timestamp,
            extra_data,
            epoch,
            slot,
            ..HeaderOptions::default()
        }
    }
}

impl<ForkSpecT: ForkSpec> LynxBlock<ForkSpecT> {
    /// Constructs an empty genesis block.
    pub fn genesis(options: GenesisBlockOptions) -> Result<Self, HeaderCreationError> {
        let header = BlockHeader::new(GENESIS_BLOCK_NUMBER, options.into())?;

        Ok(Self::new(header, Vec::new()))
    }
}
