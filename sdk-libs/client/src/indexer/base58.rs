use solana_sdk::pubkey::Pubkey;

use crate::indexer::error::IndexerError;

pub trait Base58Conversions {
    fn to_base58(&self) -> String;
    fn from_base58(s: &str) -> Result<Self, IndexerError>
    where
        Self: Sized;
}

impl Base58Conversions for [u8; 32] {
    fn to_base58(&self) -> String {
        bs58::encode(self).into_string()
    }

    fn from_base58(s: &str) -> Result<Self, IndexerError> {
        decode_base58_to_fixed_array(s)
    }
}

impl Base58Conversions for Pubkey {
    fn to_base58(&self) -> String {
        self.to_string()
    }

    fn from_base58(s: &str) -> Result<Self, IndexerError> {
        decode_base58_to_fixed_array(s).map(Pubkey::new_from_array)
    }
}

pub fn decode_base58_to_fixed_array<const N: usize>(input: &str) -> Result<[u8; N], IndexerError> {
    let mut buffer = [0u8; N];
    let decoded_len = bs58::decode(input)
        .onto(&mut buffer)
        .map_err(|e| IndexerError::base58_decode_error(input, &e.to_string()))?;

    if decoded_len != N {
        return Err(IndexerError::base58_decode_error(
            input,
            &format!("expected {} bytes, got {}", N, decoded_len),
        ));
    }

    Ok(buffer)
}
