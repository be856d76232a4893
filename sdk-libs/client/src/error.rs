use thiserror::Error;

use crate::{indexer::IndexerError, pack::PackError, rpc::RpcError};

#[derive(Error, Debug)]
pub enum CounterClientError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Indexer(#[from] IndexerError),

    #[error(transparent)]
    Pack(#[from] PackError),

    #[error("Counter account {0} not found")]
    CounterNotFound(String),

    #[error("Compressed account {0} has no data")]
    MissingAccountData(String),

    #[error("Borsh error: {0}")]
    Borsh(#[from] std::io::Error),
}

impl CounterClientError {
    /// Whether running the whole operation again, with fresh proofs and a
    /// fresh blockhash, can succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CounterClientError::Indexer(e) => e.is_retryable(),
            CounterClientError::Rpc(e) => e.is_blockhash_not_found(),
            _ => false,
        }
    }
}
