use std::collections::HashMap;

use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    address::AddressSeed,
    compressed_account::{
        AddressMerkleContext, AddressTreeAccounts, CompressedAccountWithMerkleContext,
        MerkleContext, NewAddressParams, NewAddressParamsPacked,
        OutputCompressedAccountWithContext, OutputCompressedAccountWithPackedContext,
        PackedAddressMerkleContext, PackedCompressedAccountWithMerkleContext, PackedMerkleContext,
        StateTreeAccounts,
    },
    indexer::ValidityProofWithContext,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PackError {
    #[error("At least one new address is required")]
    EmptyNewAddressParams,

    #[error("At least one input compressed account is required")]
    EmptyInputs,

    #[error("Validity proof carries no trees")]
    EmptyProof,

    #[error("Validity proof has no root index for input {0}")]
    MissingRootIndex(usize),

    #[error("Remaining accounts exceed 256 entries")]
    TooManyAccounts,
}

/// Collection of remaining accounts which are sent to the program.
#[derive(Debug, Default)]
pub struct PackedAccounts {
    next_index: u16,
    map: HashMap<Pubkey, (u8, AccountMeta)>,
    overflowed: bool,
}

impl PackedAccounts {
    /// Returns the index of the provided `pubkey` in the collection.
    ///
    /// If the provided `pubkey` is not a part of the collection, it gets
    /// inserted with a `next_index`.
    ///
    /// If the provided `pubkey` already exists in the collection, its already
    /// existing index is returned.
    pub fn insert_or_get(&mut self, pubkey: Pubkey) -> u8 {
        self.insert_or_get_config(pubkey, false, true)
    }

    pub fn insert_or_get_config(
        &mut self,
        pubkey: Pubkey,
        is_signer: bool,
        is_writable: bool,
    ) -> u8 {
        if let Some((index, _)) = self.map.get(&pubkey) {
            return *index;
        }
        if self.next_index > u8::MAX as u16 {
            self.overflowed = true;
            return u8::MAX;
        }
        let index = self.next_index as u8;
        self.next_index += 1;
        self.map.insert(
            pubkey,
            (
                index,
                AccountMeta {
                    pubkey,
                    is_signer,
                    is_writable,
                },
            ),
        );
        index
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Converts the collection of accounts to a vector of [`AccountMeta`],
    /// which can be used as remaining accounts in instructions or CPI calls.
    pub fn to_account_metas(&self) -> Result<Vec<AccountMeta>, PackError> {
        if self.overflowed {
            return Err(PackError::TooManyAccounts);
        }
        let mut remaining_accounts = self.map.values().collect::<Vec<_>>();
        // hash maps are not sorted so we need to sort manually and collect into a vector again
        remaining_accounts.sort_by_key(|(index, _)| *index);
        Ok(remaining_accounts
            .into_iter()
            .map(|(_, meta)| meta.clone())
            .collect())
    }
}

pub fn pack_merkle_context(
    merkle_context: &MerkleContext,
    remaining_accounts: &mut PackedAccounts,
) -> PackedMerkleContext {
    let MerkleContext {
        merkle_tree_pubkey,
        nullifier_queue_pubkey,
        leaf_index,
        queue_index,
    } = merkle_context;
    let merkle_tree_pubkey_index = remaining_accounts.insert_or_get(*merkle_tree_pubkey);
    let nullifier_queue_pubkey_index = remaining_accounts.insert_or_get(*nullifier_queue_pubkey);

    PackedMerkleContext {
        merkle_tree_pubkey_index,
        nullifier_queue_pubkey_index,
        leaf_index: *leaf_index,
        queue_index: *queue_index,
    }
}

pub fn pack_address_merkle_context(
    address_merkle_context: &AddressMerkleContext,
    remaining_accounts: &mut PackedAccounts,
) -> PackedAddressMerkleContext {
    let AddressMerkleContext {
        address_merkle_tree_pubkey,
        address_queue_pubkey,
    } = address_merkle_context;
    let address_merkle_tree_pubkey_index =
        remaining_accounts.insert_or_get(*address_merkle_tree_pubkey);
    let address_queue_pubkey_index = remaining_accounts.insert_or_get(*address_queue_pubkey);

    PackedAddressMerkleContext {
        address_merkle_tree_pubkey_index,
        address_queue_pubkey_index,
    }
}

/// Packs all address trees first, then all address queues.
pub fn pack_new_addresses_params(
    addresses_params: &[NewAddressParams],
    remaining_accounts: &mut PackedAccounts,
) -> Vec<NewAddressParamsPacked> {
    let tree_indices = addresses_params
        .iter()
        .map(|x| remaining_accounts.insert_or_get(x.address_merkle_tree_pubkey))
        .collect::<Vec<_>>();
    addresses_params
        .iter()
        .zip(tree_indices)
        .map(|(x, address_merkle_tree_account_index)| NewAddressParamsPacked {
            seed: x.seed,
            address_queue_account_index: remaining_accounts.insert_or_get(x.address_queue_pubkey),
            address_merkle_tree_account_index,
            address_merkle_tree_root_index: x.address_merkle_tree_root_index,
        })
        .collect()
}

pub fn pack_output_compressed_accounts(
    output_compressed_accounts: &[OutputCompressedAccountWithContext],
    remaining_accounts: &mut PackedAccounts,
) -> Vec<OutputCompressedAccountWithPackedContext> {
    output_compressed_accounts
        .iter()
        .map(|x| OutputCompressedAccountWithPackedContext {
            compressed_account: x.compressed_account.clone(),
            merkle_tree_index: remaining_accounts.insert_or_get(x.merkle_tree),
        })
        .collect()
}

/// Packs input accounts against the root indices of `proof`, followed by the
/// output accounts.
pub fn pack_compressed_accounts(
    input_compressed_accounts: &[CompressedAccountWithMerkleContext],
    root_indices: &[u16],
    output_compressed_accounts: &[OutputCompressedAccountWithContext],
    remaining_accounts: &mut PackedAccounts,
) -> Result<
    (
        Vec<PackedCompressedAccountWithMerkleContext>,
        Vec<OutputCompressedAccountWithPackedContext>,
    ),
    PackError,
> {
    let packed_inputs = input_compressed_accounts
        .iter()
        .enumerate()
        .map(|(i, x)| {
            let root_index = *root_indices.get(i).ok_or(PackError::MissingRootIndex(i))?;
            Ok::<_, PackError>(PackedCompressedAccountWithMerkleContext {
                compressed_account: x.compressed_account.clone(),
                merkle_context: pack_merkle_context(&x.merkle_context, remaining_accounts),
                root_index,
                read_only: false,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let packed_outputs =
        pack_output_compressed_accounts(output_compressed_accounts, remaining_accounts);
    Ok((packed_inputs, packed_outputs))
}

/// Instruction arguments for creating a compressed account at a new address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedNewAccountContext {
    pub merkle_context: PackedMerkleContext,
    pub address_merkle_context: PackedAddressMerkleContext,
    pub address_merkle_tree_root_index: u16,
    pub output_compressed_accounts: Vec<OutputCompressedAccountWithPackedContext>,
    pub remaining_accounts: Vec<AccountMeta>,
}

/// Instruction arguments for updating or closing an existing compressed
/// account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedInputAccountContext {
    pub merkle_context: PackedMerkleContext,
    pub root_index: u16,
    pub address_merkle_context: PackedAddressMerkleContext,
    pub address_merkle_tree_root_index: u16,
    pub packed_inputs: Vec<PackedCompressedAccountWithMerkleContext>,
    pub output_compressed_accounts: Vec<OutputCompressedAccountWithPackedContext>,
    pub remaining_accounts: Vec<AccountMeta>,
}

/// Packs the accounts of an instruction which only creates new addresses.
///
/// The remaining accounts are ordered as: output trees, address trees,
/// address queues, then `output_state_tree` and its nullifier queue if not
/// already present. The returned merkle context points at leaf 0 of
/// `output_state_tree`.
pub fn pack_new(
    output_compressed_accounts: &[OutputCompressedAccountWithContext],
    new_address_params: &[NewAddressParams],
    output_state_tree: &StateTreeAccounts,
) -> Result<PackedNewAccountContext, PackError> {
    let mut remaining_accounts = PackedAccounts::default();

    let (_, output_compressed_accounts) =
        pack_compressed_accounts(&[], &[], output_compressed_accounts, &mut remaining_accounts)?;
    let packed_new_address_params =
        pack_new_addresses_params(new_address_params, &mut remaining_accounts);
    let NewAddressParamsPacked {
        address_merkle_tree_account_index,
        address_queue_account_index,
        address_merkle_tree_root_index,
        ..
    } = *packed_new_address_params
        .first()
        .ok_or(PackError::EmptyNewAddressParams)?;

    let merkle_context = PackedMerkleContext {
        merkle_tree_pubkey_index: remaining_accounts.insert_or_get(output_state_tree.merkle_tree),
        nullifier_queue_pubkey_index: remaining_accounts
            .insert_or_get(output_state_tree.nullifier_queue),
        leaf_index: 0,
        queue_index: None,
    };
    let remaining_accounts = remaining_accounts.to_account_metas()?;
    debug!(
        "packed {} new address(es) into {} remaining accounts",
        new_address_params.len(),
        remaining_accounts.len()
    );

    Ok(PackedNewAccountContext {
        merkle_context,
        address_merkle_context: PackedAddressMerkleContext {
            address_merkle_tree_pubkey_index: address_merkle_tree_account_index,
            address_queue_pubkey_index: address_queue_account_index,
        },
        address_merkle_tree_root_index,
        output_compressed_accounts,
        remaining_accounts,
    })
}

/// Builds the parameters for creating `seed`'s address from a validity proof.
///
/// Address proofs follow state proofs in the indexer response, so the last
/// root index, tree and queue belong to the new address.
pub fn new_address_params(
    seed: AddressSeed,
    proof: &ValidityProofWithContext,
) -> Result<NewAddressParams, PackError> {
    match (
        proof.root_indices.last(),
        proof.merkle_trees.last(),
        proof.queues.last(),
    ) {
        (Some(root_index), Some(merkle_tree), Some(queue)) => Ok(NewAddressParams {
            seed,
            address_queue_pubkey: *queue,
            address_merkle_tree_pubkey: *merkle_tree,
            address_merkle_tree_root_index: *root_index,
        }),
        _ => Err(PackError::EmptyProof),
    }
}

/// Packs the accounts of an instruction which consumes existing compressed
/// accounts.
///
/// `merkle_context` and `root_index` of the result belong to the first input
/// only. The address context is packed from the first entry of
/// `new_address_params`, or from `address_tree` with root index 0 when no
/// address is created.
pub fn pack_with_input(
    input_compressed_accounts: &[CompressedAccountWithMerkleContext],
    proof: &ValidityProofWithContext,
    output_compressed_accounts: &[OutputCompressedAccountWithContext],
    new_address_params: &[NewAddressParams],
    address_tree: &AddressTreeAccounts,
) -> Result<PackedInputAccountContext, PackError> {
    if input_compressed_accounts.is_empty() {
        return Err(PackError::EmptyInputs);
    }
    if input_compressed_accounts.len() > 1 {
        warn!(
            "{} input accounts packed, only the first merkle context is returned",
            input_compressed_accounts.len()
        );
    }
    let mut remaining_accounts = PackedAccounts::default();

    let (packed_inputs, output_compressed_accounts) = pack_compressed_accounts(
        input_compressed_accounts,
        &proof.root_indices,
        output_compressed_accounts,
        &mut remaining_accounts,
    )?;
    let PackedCompressedAccountWithMerkleContext {
        merkle_context,
        root_index,
        ..
    } = packed_inputs[0].clone();

    let (address_merkle_context, address_merkle_tree_root_index) =
        match pack_new_addresses_params(new_address_params, &mut remaining_accounts).first() {
            Some(packed) => (
                PackedAddressMerkleContext {
                    address_merkle_tree_pubkey_index: packed.address_merkle_tree_account_index,
                    address_queue_pubkey_index: packed.address_queue_account_index,
                },
                packed.address_merkle_tree_root_index,
            ),
            None => (
                pack_address_merkle_context(&(*address_tree).into(), &mut remaining_accounts),
                0,
            ),
        };
    let remaining_accounts = remaining_accounts.to_account_metas()?;

    Ok(PackedInputAccountContext {
        merkle_context,
        root_index,
        address_merkle_context,
        address_merkle_tree_root_index,
        packed_inputs,
        output_compressed_accounts,
        remaining_accounts,
    })
}
