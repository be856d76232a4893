use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;

use crate::{
    compressed_account::{AddressTreeAccounts, StateTreeAccounts},
    constants::{ADDRESS_MERKLE_TREE_V1, ADDRESS_QUEUE_V1, NULLIFIER_QUEUE_V1, STATE_MERKLE_TREE_V1},
    indexer::error::IndexerError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeType {
    State,
    Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeMeta {
    pub tree: Pubkey,
    pub queue: Pubkey,
    pub tree_type: TreeType,
}

/// Maps Merkle trees to their companion queues.
///
/// The indexer reports only tree pubkeys in proofs, so the queue that has to
/// be passed to the program is looked up here.
#[derive(Debug, Clone)]
pub struct TreeRegistry {
    trees: HashMap<Pubkey, TreeMeta>,
}

impl TreeRegistry {
    pub fn new(state_trees: &[StateTreeAccounts], address_trees: &[AddressTreeAccounts]) -> Self {
        let mut registry = TreeRegistry {
            trees: HashMap::with_capacity(state_trees.len() + address_trees.len()),
        };
        for accounts in state_trees {
            registry.insert(TreeMeta {
                tree: accounts.merkle_tree,
                queue: accounts.nullifier_queue,
                tree_type: TreeType::State,
            });
        }
        for accounts in address_trees {
            registry.insert(TreeMeta {
                tree: accounts.merkle_tree,
                queue: accounts.queue,
                tree_type: TreeType::Address,
            });
        }
        registry
    }

    pub fn insert(&mut self, meta: TreeMeta) {
        self.trees.insert(meta.tree, meta);
    }

    pub fn get(&self, tree: &Pubkey) -> Option<&TreeMeta> {
        self.trees.get(tree)
    }

    pub fn queue(&self, tree: &Pubkey) -> Result<Pubkey, IndexerError> {
        self.get(tree)
            .map(|meta| meta.queue)
            .ok_or(IndexerError::UnknownTree(*tree))
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl Default for TreeRegistry {
    /// Localnet v1 trees.
    fn default() -> Self {
        Self::new(
            &[StateTreeAccounts {
                merkle_tree: STATE_MERKLE_TREE_V1,
                nullifier_queue: NULLIFIER_QUEUE_V1,
            }],
            &[AddressTreeAccounts {
                merkle_tree: ADDRESS_MERKLE_TREE_V1,
                queue: ADDRESS_QUEUE_V1,
            }],
        )
    }
}
