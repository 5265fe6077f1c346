//! Assembly errors.

use thiserror::Error;

use crate::error::GridError;
use crate::provider::FetchError;
use crate::region::Region;

/// Errors that stop an assembly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssemblyError {
    /// Region, resolution or tile count rejected before any fetch
    #[error("Invalid assembly input: {0}")]
    Config(#[from] GridError),

    /// A tile failed after exhausting its retries under the abort policy
    #[error("Tile #{index} {bounds} failed after {attempts} attempt(s): {source}")]
    TileFetch {
        index: usize,
        bounds: Region,
        attempts: u32,
        #[source]
        source: FetchError,
    },

    /// The cancellation token fired
    #[error("Assembly cancelled after {completed} of {total} tiles")]
    Cancelled { completed: usize, total: usize },
}

impl AssemblyError {
    /// Whether rerunning the assembly could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AssemblyError::TileFetch { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}
