use lynx_block_header::{BlockHeader, HeaderValidityError};
use lynx_chain_config::{ChainConfig, UnknownHardfork};
use lynx_chain_spec::ExecutionContext;
use lynx_primitives::B256;

use crate::Hardfork;

/// The gas limit of a Lynx block, which is not part of its header.
pub const DEFAULT_BLOCK_GAS_LIMIT: u64 = 3_141_592;

/// An error that occurs when preparing a block for execution.
#[derive(Debug, thiserror::Error)]
pub enum PrepareBlockError {
    /// No hardfork is active at the block's height.
    #[error(transparent)]
    UnknownHardfork(#[from] UnknownHardfork),
    /// The block's header cannot extend its parent.
    #[error(transparent)]
    InvalidHeader(#[from] HeaderValidityError),
}

/// Validates `candidate` against `parent` under the hardfork active at the
/// candidate's height and constructs the context to execute it in.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn prepare_next_block<PrevHashesT>(
    chain_config: &ChainConfig<Hardfork>,
    candidate: &BlockHeader,
    parent: Option<&BlockHeader>,
    gas_limit: u64,
    prev_hashes: PrevHashesT,
) -> Result<ExecutionContext, PrepareBlockError>
where
    PrevHashesT: IntoIterator<Item = B256>,
    PrevHashesT::IntoIter: Send + 'static,
{
    let hardfork = chain_config.hardfork_at(candidate.block_number(), candidate.timestamp())?;
    let fork = hardfork.fork_config();
    fork.validate_header(candidate, parent)?;

    log::debug!("Prepared block {candidate} under the {} fork", fork.name);

    Ok(ExecutionContext::for_header(
        candidate,
        gas_limit,
        chain_config.chain_id,
        prev_hashes,
    ))
}
