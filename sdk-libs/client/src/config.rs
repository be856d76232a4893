use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

use crate::{
    compressed_account::{AddressTreeAccounts, StateTreeAccounts},
    constants::{
        ADDRESS_MERKLE_TREE_V1, ADDRESS_QUEUE_V1, COUNTER_PROGRAM_ID, DEFAULT_INDEXER_URL,
        DEFAULT_RPC_URL, NULLIFIER_QUEUE_V1, STATE_MERKLE_TREE_V1,
    },
    indexer::TreeRegistry,
    system_accounts::SystemProgramIds,
    transaction::{ExplorerConfig, PriorityFeeConfig},
};

/// Everything a client needs to talk to a cluster and its indexer.
///
/// `Default` targets a local test validator with the v1 test trees.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub rpc_url: String,
    pub commitment: CommitmentConfig,
    pub indexer_url: String,
    pub indexer_api_key: Option<String>,
    pub program_id: Pubkey,
    pub state_tree: StateTreeAccounts,
    pub address_tree: AddressTreeAccounts,
    pub system_program_ids: SystemProgramIds,
    pub priority_fee: PriorityFeeConfig,
    pub explorer: ExplorerConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            commitment: CommitmentConfig::confirmed(),
            indexer_url: DEFAULT_INDEXER_URL.to_string(),
            indexer_api_key: None,
            program_id: COUNTER_PROGRAM_ID,
            state_tree: StateTreeAccounts {
                merkle_tree: STATE_MERKLE_TREE_V1,
                nullifier_queue: NULLIFIER_QUEUE_V1,
            },
            address_tree: AddressTreeAccounts {
                merkle_tree: ADDRESS_MERKLE_TREE_V1,
                queue: ADDRESS_QUEUE_V1,
            },
            system_program_ids: SystemProgramIds::default(),
            priority_fee: PriorityFeeConfig::default(),
            explorer: ExplorerConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Registry of the configured trees, used to resolve queues of trees
    /// reported by the indexer.
    pub fn tree_registry(&self) -> TreeRegistry {
        TreeRegistry::new(&[self.state_tree], &[self.address_tree])
    }
}
