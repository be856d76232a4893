#![allow(dead_code)]
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use borsh::BorshSerialize;
use counter_client::{
    address::Address,
    compressed_account::{
        CompressedAccount, CompressedAccountData, CompressedAccountWithMerkleContext,
        CompressedProof, MerkleContext,
    },
    counter::{counter_address, CounterCompressedAccount},
    indexer::{
        AddressWithTree, Base58Conversions, Context, Hash, IndexedCompressedAccount, Indexer,
        IndexerError, Response, TreeRegistry, ValidityProofWithContext,
    },
    rpc::{RpcConnection, RpcError},
    ClientConfig,
};
use solana_sdk::{
    hash::Hash as Blockhash,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::{Transaction, TransactionError},
};

pub const SLOT: u64 = 100;
pub const STATE_ROOT_INDEX: u16 = 10;
pub const ADDRESS_ROOT_INDEX: u16 = 20;

#[derive(Debug, Default)]
struct MockRpcState {
    latest_blockhash: Option<Blockhash>,
    sent: Vec<Transaction>,
}

/// Validator double which accepts transactions signed against its latest
/// blockhash only.
#[derive(Debug)]
pub struct MockRpc {
    payer: Keypair,
    state: Mutex<MockRpcState>,
    /// Number of blockhashes that expire right after they were handed out.
    expiring_blockhashes: AtomicUsize,
}

impl MockRpc {
    pub fn new() -> Self {
        Self {
            payer: Keypair::new(),
            state: Mutex::new(MockRpcState::default()),
            expiring_blockhashes: AtomicUsize::new(0),
        }
    }

    /// The next `count` blockhashes go stale before a transaction using them
    /// can be sent.
    pub fn with_expiring_blockhashes(count: usize) -> Self {
        let rpc = Self::new();
        rpc.expiring_blockhashes.store(count, Ordering::SeqCst);
        rpc
    }

    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().sent.clone()
    }
}

#[async_trait]
impl RpcConnection for MockRpc {
    fn get_payer(&self) -> &Keypair {
        &self.payer
    }

    fn get_url(&self) -> String {
        "mock://rpc".to_string()
    }

    async fn health(&self) -> Result<(), RpcError> {
        Ok(())
    }

    async fn get_latest_blockhash(&self) -> Result<Blockhash, RpcError> {
        let handed_out = Blockhash::new_unique();
        let expire = self
            .expiring_blockhashes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |x| x.checked_sub(1))
            .is_ok();
        let mut state = self.state.lock().unwrap();
        state.latest_blockhash = Some(if expire {
            Blockhash::new_unique()
        } else {
            handed_out
        });
        Ok(handed_out)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RpcError> {
        let mut state = self.state.lock().unwrap();
        if state.latest_blockhash != Some(transaction.message.recent_blockhash) {
            return Err(TransactionError::BlockhashNotFound.into());
        }
        transaction
            .verify()
            .map_err(|_| RpcError::from(TransactionError::SignatureFailure))?;
        state.sent.push(transaction.clone());
        Ok(transaction.signatures[0])
    }

    async fn confirm_transaction(&self, signature: Signature) -> Result<bool, RpcError> {
        let state = self.state.lock().unwrap();
        Ok(state.sent.iter().any(|x| x.signatures[0] == signature))
    }

    async fn get_balance(&self, _pubkey: &Pubkey) -> Result<u64, RpcError> {
        Ok(1_000_000_000)
    }

    async fn airdrop_lamports(&self, _to: &Pubkey, _lamports: u64) -> Result<Signature, RpcError> {
        Ok(Signature::new_unique())
    }
}

/// Indexer double serving accounts from memory. Proof root indices are
/// `STATE_ROOT_INDEX + i` for hashes and `ADDRESS_ROOT_INDEX + i` for new
/// addresses.
#[derive(Debug)]
pub struct MockIndexer {
    config: ClientConfig,
    registry: TreeRegistry,
    accounts: Mutex<HashMap<Address, IndexedCompressedAccount>>,
    pub proof_requests: Mutex<Vec<(Vec<Hash>, Vec<AddressWithTree>)>>,
    lookups: AtomicUsize,
}

impl MockIndexer {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            config: config.clone(),
            registry: config.tree_registry(),
            accounts: Mutex::new(HashMap::new()),
            proof_requests: Mutex::new(Vec::new()),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Stores `owner`'s counter at its derived address and returns it.
    pub fn insert_counter(&self, owner: &Pubkey, counter: u64) -> IndexedCompressedAccount {
        let (address, _) = counter_address(owner, &self.config);
        let data = CounterCompressedAccount {
            owner: *owner,
            counter,
        }
        .try_to_vec()
        .unwrap();
        let account = IndexedCompressedAccount {
            account: CompressedAccountWithMerkleContext {
                compressed_account: CompressedAccount {
                    owner: self.config.program_id,
                    lamports: 0,
                    address: Some(address),
                    data: Some(CompressedAccountData {
                        discriminator: [1u8; 8],
                        data,
                        data_hash: [2u8; 32],
                    }),
                },
                merkle_context: MerkleContext {
                    merkle_tree_pubkey: self.config.state_tree.merkle_tree,
                    nullifier_queue_pubkey: self.config.state_tree.nullifier_queue,
                    leaf_index: 3,
                    queue_index: None,
                },
            },
            hash: address_hash(&address),
            slot_created: SLOT,
            seq: Some(3),
        };
        self.accounts
            .lock()
            .unwrap()
            .insert(address, account.clone());
        account
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn tree_of_hash(&self, hash: &Hash) -> Result<Pubkey, IndexerError> {
        self.accounts
            .lock()
            .unwrap()
            .values()
            .find(|x| x.hash == *hash)
            .map(|x| x.account.merkle_context.merkle_tree_pubkey)
            .ok_or(IndexerError::AccountNotFound)
    }
}

fn address_hash(address: &Address) -> Hash {
    let mut hash = *address;
    hash[31] ^= 0xff;
    hash
}

#[async_trait]
impl Indexer for MockIndexer {
    async fn get_validity_proof(
        &self,
        hashes: Vec<Hash>,
        new_addresses: Vec<AddressWithTree>,
    ) -> Result<Response<ValidityProofWithContext>, IndexerError> {
        self.proof_requests
            .lock()
            .unwrap()
            .push((hashes.clone(), new_addresses.clone()));

        for new_address in new_addresses.iter() {
            if self.accounts.lock().unwrap().contains_key(&new_address.address) {
                return Err(IndexerError::AddressAlreadyExists {
                    address: new_address.address.to_base58(),
                });
            }
        }

        let mut proof = ValidityProofWithContext {
            compressed_proof: CompressedProof {
                a: [1u8; 32],
                b: [2u8; 64],
                c: [3u8; 32],
            },
            ..Default::default()
        };
        for (i, hash) in hashes.iter().enumerate() {
            let tree = self.tree_of_hash(hash)?;
            proof.roots.push([4u8; 32]);
            proof.root_indices.push(STATE_ROOT_INDEX + i as u16);
            proof.leaf_indices.push(3);
            proof.leaves.push(*hash);
            proof.merkle_trees.push(tree);
            proof.queues.push(self.registry.queue(&tree)?);
        }
        for (i, new_address) in new_addresses.iter().enumerate() {
            proof.roots.push([5u8; 32]);
            proof.root_indices.push(ADDRESS_ROOT_INDEX + i as u16);
            proof.merkle_trees.push(new_address.tree);
            proof.queues.push(self.registry.queue(&new_address.tree)?);
        }

        Ok(Response {
            context: Context { slot: SLOT },
            value: proof,
        })
    }

    async fn get_compressed_account(
        &self,
        address: Address,
    ) -> Result<Response<Option<IndexedCompressedAccount>>, IndexerError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(Response {
            context: Context { slot: SLOT },
            value: self.accounts.lock().unwrap().get(&address).cloned(),
        })
    }

    async fn get_compressed_accounts_by_owner(
        &self,
        owner: &Pubkey,
    ) -> Result<Response<Vec<IndexedCompressedAccount>>, IndexerError> {
        Ok(Response {
            context: Context { slot: SLOT },
            value: self
                .accounts
                .lock()
                .unwrap()
                .values()
                .filter(|x| x.account.compressed_account.owner == *owner)
                .cloned()
                .collect(),
        })
    }

    async fn get_indexer_slot(&self) -> Result<u64, IndexerError> {
        Ok(SLOT)
    }
}
