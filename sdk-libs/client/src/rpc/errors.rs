use std::{fmt::Debug, io};

use solana_client::client_error::ClientError;
use solana_sdk::{signer::SignerError, transaction::TransactionError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("TransactionError: {0}")]
    TransactionError(#[from] Box<TransactionError>),

    #[error("ClientError: {0}")]
    ClientError(#[from] Box<ClientError>),

    #[error("SignerError: {0}")]
    SignerError(#[from] SignerError),

    #[error("IoError: {0}")]
    IoError(#[from] Box<io::Error>),

    #[error("Error: `{0}`")]
    CustomError(String),
}

impl From<TransactionError> for RpcError {
    fn from(err: TransactionError) -> Self {
        RpcError::TransactionError(Box::new(err))
    }
}

impl From<ClientError> for RpcError {
    fn from(err: ClientError) -> Self {
        RpcError::ClientError(Box::new(err))
    }
}

impl From<io::Error> for RpcError {
    fn from(err: io::Error) -> Self {
        RpcError::IoError(Box::new(err))
    }
}

impl RpcError {
    /// Transaction error carried by this error, whether it was produced
    /// locally or reported by the validator.
    pub fn transaction_error(&self) -> Option<TransactionError> {
        match self {
            RpcError::TransactionError(err) => Some(err.as_ref().clone()),
            RpcError::ClientError(err) => err.get_transaction_error(),
            _ => None,
        }
    }

    pub fn is_blockhash_not_found(&self) -> bool {
        matches!(
            self.transaction_error(),
            Some(TransactionError::BlockhashNotFound)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blockhash_not_found_is_detected() {
        let err = RpcError::from(TransactionError::BlockhashNotFound);
        assert!(err.is_blockhash_not_found());
        let err = RpcError::from(ClientError::from(TransactionError::BlockhashNotFound));
        assert!(err.is_blockhash_not_found());
        assert!(!RpcError::CustomError("boom".to_string()).is_blockhash_not_found());
    }
}
