use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

use super::{
    AddressWithTree, Hash, IndexedCompressedAccount, IndexerError, Response,
    ValidityProofWithContext,
};
use crate::address::Address;

#[async_trait]
pub trait Indexer: Send + Sync {
    /// Requests one proof covering the inclusion of `hashes` and the
    /// non-inclusion of `new_addresses`. An empty vector adds no constraint.
    async fn get_validity_proof(
        &self,
        hashes: Vec<Hash>,
        new_addresses: Vec<AddressWithTree>,
    ) -> Result<Response<ValidityProofWithContext>, IndexerError>;

    async fn get_compressed_account(
        &self,
        address: Address,
    ) -> Result<Response<Option<IndexedCompressedAccount>>, IndexerError>;

    async fn get_compressed_accounts_by_owner(
        &self,
        owner: &Pubkey,
    ) -> Result<Response<Vec<IndexedCompressedAccount>>, IndexerError>;

    async fn get_indexer_slot(&self) -> Result<u64, IndexerError>;
}
