use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexerError {
    #[error("Photon API error in {context}: {message}")]
    PhotonError { context: String, message: String },

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Address {address} already exists")]
    AddressAlreadyExists { address: String },

    #[error("Missing result in {context}: {message}")]
    MissingResult { context: String, message: String },

    #[error("Invalid response data")]
    InvalidResponseData,

    #[error("Base58 decode error in {field}: {message}")]
    Base58DecodeError { field: String, message: String },

    #[error("Base64 decode error: {0}")]
    Base64DecodeError(String),

    #[error("Account not found")]
    AccountNotFound,

    #[error("Tree {0} is not registered")]
    UnknownTree(Pubkey),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

impl IndexerError {
    pub fn missing_result(context: &str, message: &str) -> Self {
        IndexerError::MissingResult {
            context: context.to_string(),
            message: message.to_string(),
        }
    }

    pub fn base58_decode_error(field: &str, message: &str) -> Self {
        IndexerError::Base58DecodeError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Whether repeating the request can succeed without changing its
    /// inputs. Only transport failures qualify, errors reported by Photon
    /// itself are final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, IndexerError::ApiError(_))
    }
}

impl From<reqwest::Error> for IndexerError {
    fn from(error: reqwest::Error) -> Self {
        IndexerError::ApiError(error.to_string())
    }
}

impl From<base64::DecodeError> for IndexerError {
    fn from(error: base64::DecodeError) -> Self {
        IndexerError::Base64DecodeError(error.to_string())
    }
}
