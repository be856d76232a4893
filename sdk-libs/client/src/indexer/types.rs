use solana_sdk::pubkey::Pubkey;

use super::{
    api_model::{ApiCompressedAccount, ApiCompressedProof, ApiValidityProof},
    base58::{decode_base58_to_fixed_array, Base58Conversions},
    tree_info::TreeRegistry,
    IndexerError,
};
use crate::{
    address::Address,
    compressed_account::{
        CompressedAccount, CompressedAccountData, CompressedAccountWithMerkleContext,
        CompressedProof, MerkleContext,
    },
};

pub type Hash = [u8; 32];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressWithTree {
    pub address: Address,
    pub tree: Pubkey,
}

/// Validity proof together with the tree state it was generated against.
///
/// Entries are ordered with the proven hashes first, followed by the new
/// addresses, in the order they were requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidityProofWithContext {
    pub compressed_proof: CompressedProof,
    pub roots: Vec<Hash>,
    pub root_indices: Vec<u16>,
    pub leaf_indices: Vec<u32>,
    pub leaves: Vec<Hash>,
    pub merkle_trees: Vec<Pubkey>,
    pub queues: Vec<Pubkey>,
}

impl ValidityProofWithContext {
    pub(crate) fn from_api_model(
        value: ApiValidityProof,
        registry: &TreeRegistry,
    ) -> Result<Self, IndexerError> {
        let compressed_proof = compressed_proof_from_api_model(&value.compressed_proof)?;
        let roots = value
            .roots
            .iter()
            .map(|x| Hash::from_base58(x))
            .collect::<Result<Vec<_>, _>>()?;
        let leaves = value
            .leaves
            .iter()
            .map(|x| Hash::from_base58(x))
            .collect::<Result<Vec<_>, _>>()?;
        let merkle_trees = value
            .merkle_trees
            .iter()
            .map(|x| Pubkey::from_base58(x))
            .collect::<Result<Vec<_>, _>>()?;
        let queues = merkle_trees
            .iter()
            .map(|tree| registry.queue(tree))
            .collect::<Result<Vec<_>, _>>()?;
        let root_indices = value
            .root_indices
            .iter()
            .map(|x| u16::try_from(*x).map_err(|_| IndexerError::InvalidResponseData))
            .collect::<Result<Vec<_>, _>>()?;
        let leaf_indices = value
            .leaf_indices
            .iter()
            .map(|x| u32::try_from(*x).map_err(|_| IndexerError::InvalidResponseData))
            .collect::<Result<Vec<_>, _>>()?;

        if root_indices.len() != merkle_trees.len() || roots.len() != merkle_trees.len() {
            return Err(IndexerError::InvalidResponseData);
        }

        Ok(Self {
            compressed_proof,
            roots,
            root_indices,
            leaf_indices,
            leaves,
            merkle_trees,
            queues,
        })
    }
}

fn compressed_proof_from_api_model(
    value: &ApiCompressedProof,
) -> Result<CompressedProof, IndexerError> {
    Ok(CompressedProof {
        a: value
            .a
            .as_slice()
            .try_into()
            .map_err(|_| IndexerError::InvalidResponseData)?,
        b: value
            .b
            .as_slice()
            .try_into()
            .map_err(|_| IndexerError::InvalidResponseData)?,
        c: value
            .c
            .as_slice()
            .try_into()
            .map_err(|_| IndexerError::InvalidResponseData)?,
    })
}

/// Compressed account as reported by the indexer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexedCompressedAccount {
    pub account: CompressedAccountWithMerkleContext,
    pub hash: Hash,
    pub slot_created: u64,
    pub seq: Option<u64>,
}

impl IndexedCompressedAccount {
    pub(crate) fn from_api_model(
        value: ApiCompressedAccount,
        registry: &TreeRegistry,
    ) -> Result<Self, IndexerError> {
        let merkle_tree_pubkey = Pubkey::from_base58(&value.tree)?;
        let data = value
            .data
            .map(|data| {
                Ok::<_, IndexerError>(CompressedAccountData {
                    discriminator: data.discriminator.to_le_bytes(),
                    data: base64::decode(&data.data)?,
                    data_hash: decode_base58_to_fixed_array(&data.data_hash)?,
                })
            })
            .transpose()?;
        let address = value
            .address
            .as_deref()
            .map(Address::from_base58)
            .transpose()?;

        Ok(Self {
            account: CompressedAccountWithMerkleContext {
                compressed_account: CompressedAccount {
                    owner: Pubkey::from_base58(&value.owner)?,
                    lamports: value.lamports,
                    address,
                    data,
                },
                merkle_context: MerkleContext {
                    merkle_tree_pubkey,
                    nullifier_queue_pubkey: registry.queue(&merkle_tree_pubkey)?,
                    leaf_index: value.leaf_index,
                    queue_index: None,
                },
            },
            hash: Hash::from_base58(&value.hash)?,
            slot_created: value.slot_created,
            seq: value.seq,
        })
    }

    pub fn address(&self) -> Option<Address> {
        self.account.compressed_account.address
    }
}
