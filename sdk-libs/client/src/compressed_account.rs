use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;

use crate::address::{Address, AddressSeed};

#[derive(Debug, Clone, Copy, BorshDeserialize, BorshSerialize, PartialEq, Eq, Default)]
pub struct QueueIndex {
    /// Id of queue in queue account.
    pub queue_id: u8,
    /// Index of compressed account hash in queue.
    pub index: u16,
}

#[derive(Debug, Clone, Copy, BorshDeserialize, BorshSerialize, PartialEq, Eq, Default)]
pub struct MerkleContext {
    pub merkle_tree_pubkey: Pubkey,
    pub nullifier_queue_pubkey: Pubkey,
    pub leaf_index: u32,
    /// Index of leaf in queue. Placeholder of batched Merkle tree updates
    /// currently unimplemented.
    pub queue_index: Option<QueueIndex>,
}

#[derive(Debug, Clone, Copy, BorshDeserialize, BorshSerialize, PartialEq, Eq, Default)]
pub struct PackedMerkleContext {
    pub merkle_tree_pubkey_index: u8,
    pub nullifier_queue_pubkey_index: u8,
    pub leaf_index: u32,
    pub queue_index: Option<QueueIndex>,
}

#[derive(Debug, Clone, Copy, BorshDeserialize, BorshSerialize, PartialEq, Eq, Default)]
pub struct AddressMerkleContext {
    pub address_merkle_tree_pubkey: Pubkey,
    pub address_queue_pubkey: Pubkey,
}

#[derive(Debug, Clone, Copy, BorshDeserialize, BorshSerialize, PartialEq, Eq, Default)]
pub struct PackedAddressMerkleContext {
    pub address_merkle_tree_pubkey_index: u8,
    pub address_queue_pubkey_index: u8,
}

/// State tree an output account is appended to, together with the queue
/// its leaves are nullified through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTreeAccounts {
    pub merkle_tree: Pubkey,
    pub nullifier_queue: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressTreeAccounts {
    pub merkle_tree: Pubkey,
    pub queue: Pubkey,
}

impl From<AddressTreeAccounts> for AddressMerkleContext {
    fn from(value: AddressTreeAccounts) -> Self {
        AddressMerkleContext {
            address_merkle_tree_pubkey: value.merkle_tree,
            address_queue_pubkey: value.queue,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAddressParams {
    pub seed: AddressSeed,
    pub address_queue_pubkey: Pubkey,
    pub address_merkle_tree_pubkey: Pubkey,
    pub address_merkle_tree_root_index: u16,
}

#[derive(Debug, Clone, Copy, BorshDeserialize, BorshSerialize, PartialEq, Eq)]
pub struct NewAddressParamsPacked {
    pub seed: AddressSeed,
    pub address_queue_account_index: u8,
    pub address_merkle_tree_account_index: u8,
    pub address_merkle_tree_root_index: u16,
}

#[derive(Debug, Clone, BorshDeserialize, BorshSerialize, PartialEq, Eq, Default)]
pub struct CompressedAccountData {
    pub discriminator: [u8; 8],
    pub data: Vec<u8>,
    pub data_hash: [u8; 32],
}

#[derive(Debug, Clone, BorshDeserialize, BorshSerialize, PartialEq, Eq, Default)]
pub struct CompressedAccount {
    pub owner: Pubkey,
    pub lamports: u64,
    pub address: Option<Address>,
    pub data: Option<CompressedAccountData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompressedAccountWithMerkleContext {
    pub compressed_account: CompressedAccount,
    pub merkle_context: MerkleContext,
}

/// Compressed account that will be appended to `merkle_tree` by the
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputCompressedAccountWithContext {
    pub compressed_account: CompressedAccount,
    pub merkle_tree: Pubkey,
}

#[derive(Debug, Clone, BorshDeserialize, BorshSerialize, PartialEq, Eq)]
pub struct PackedCompressedAccountWithMerkleContext {
    pub compressed_account: CompressedAccount,
    pub merkle_context: PackedMerkleContext,
    /// Index of root used in inclusion validity proof.
    pub root_index: u16,
    /// Placeholder to mark accounts read-only unimplemented set to false.
    pub read_only: bool,
}

#[derive(Debug, Clone, BorshDeserialize, BorshSerialize, PartialEq, Eq)]
pub struct OutputCompressedAccountWithPackedContext {
    pub compressed_account: CompressedAccount,
    pub merkle_tree_index: u8,
}

/// Empty output account claiming `address` for `program_id`. The program
/// fills in the data when it executes.
pub fn create_new_address_output_state(
    address: Address,
    program_id: Pubkey,
    merkle_tree: Pubkey,
) -> Vec<OutputCompressedAccountWithContext> {
    vec![OutputCompressedAccountWithContext {
        compressed_account: CompressedAccount {
            owner: program_id,
            lamports: 0,
            address: Some(address),
            data: None,
        },
        merkle_tree,
    }]
}

#[derive(Debug, Clone, Copy, BorshDeserialize, BorshSerialize, PartialEq, Eq)]
pub struct CompressedProof {
    pub a: [u8; 32],
    pub b: [u8; 64],
    pub c: [u8; 32],
}

impl Default for CompressedProof {
    fn default() -> Self {
        Self {
            a: [0; 32],
            b: [0; 64],
            c: [0; 32],
        }
    }
}
