//! Client for the compressed counter program.
//!
//! The program keeps one `CounterCompressedAccount` per signer at the address
//! derived from `["counter", signer]`. Its instructions take the light system
//! accounts followed by a packed remaining-accounts table.
use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::{
    hash::hash,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use tracing::{debug, info};

use crate::{
    address::{derive_address, Address, AddressSeed},
    compressed_account::{
        create_new_address_output_state, CompressedProof, OutputCompressedAccountWithContext,
        PackedAddressMerkleContext, PackedMerkleContext,
    },
    config::ClientConfig,
    error::CounterClientError,
    indexer::{AddressWithTree, Base58Conversions, IndexedCompressedAccount, Indexer},
    pack::{
        new_address_params, pack_new, pack_with_input, PackedInputAccountContext,
        PackedNewAccountContext,
    },
    rpc::RpcConnection,
    system_accounts::{required_static_accounts, StaticAccounts},
    transaction::send_transaction_with_priority_fee,
};

pub const COUNTER_SEED: &[u8] = b"counter";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CounterCompressedAccount {
    pub owner: Pubkey,
    pub counter: u64,
}

/// Address of `signer`'s counter in the configured address tree, with the
/// seed it was derived from.
pub fn counter_address(signer: &Pubkey, config: &ClientConfig) -> (Address, AddressSeed) {
    derive_address(
        &[COUNTER_SEED, signer.as_ref()],
        &config.address_tree.merkle_tree,
        &config.program_id,
    )
}

/// Anchor discriminator of the global instruction `name`.
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(format!("global:{}", name).as_bytes()).to_bytes()[..8]);
    discriminator
}

/// Arguments shared by all counter instructions.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CounterInstructionData {
    /// Serialized current state of every input account.
    pub inputs: Vec<Vec<u8>>,
    pub proof: CompressedProof,
    pub merkle_context: PackedMerkleContext,
    pub merkle_tree_root_index: u16,
    pub address_merkle_context: PackedAddressMerkleContext,
    pub address_merkle_tree_root_index: u16,
}

impl CounterInstructionData {
    pub fn data(&self, instruction_name: &str) -> Result<Vec<u8>, CounterClientError> {
        let mut data = instruction_discriminator(instruction_name).to_vec();
        data.extend(self.try_to_vec()?);
        Ok(data)
    }
}

fn counter_instruction(
    instruction_name: &str,
    signer: &Pubkey,
    static_accounts: &StaticAccounts,
    instruction_data: &CounterInstructionData,
    remaining_accounts: &[AccountMeta],
) -> Result<Instruction, CounterClientError> {
    let mut accounts = Vec::with_capacity(9 + remaining_accounts.len());
    accounts.push(AccountMeta::new(*signer, true));
    accounts.extend(static_accounts.to_account_metas());
    accounts.extend_from_slice(remaining_accounts);

    Ok(Instruction {
        program_id: static_accounts.self_program,
        accounts,
        data: instruction_data.data(instruction_name)?,
    })
}

pub fn create_counter_instruction(
    signer: &Pubkey,
    static_accounts: &StaticAccounts,
    proof: CompressedProof,
    packed: &PackedNewAccountContext,
) -> Result<Instruction, CounterClientError> {
    let instruction_data = CounterInstructionData {
        inputs: vec![],
        proof,
        merkle_context: packed.merkle_context,
        merkle_tree_root_index: 0,
        address_merkle_context: packed.address_merkle_context,
        address_merkle_tree_root_index: packed.address_merkle_tree_root_index,
    };
    counter_instruction(
        "create",
        signer,
        static_accounts,
        &instruction_data,
        &packed.remaining_accounts,
    )
}

fn update_counter_instruction(
    instruction_name: &str,
    signer: &Pubkey,
    static_accounts: &StaticAccounts,
    proof: CompressedProof,
    current: &CounterCompressedAccount,
    packed: &PackedInputAccountContext,
) -> Result<Instruction, CounterClientError> {
    let instruction_data = CounterInstructionData {
        inputs: vec![current.try_to_vec()?],
        proof,
        merkle_context: packed.merkle_context,
        merkle_tree_root_index: packed.root_index,
        address_merkle_context: packed.address_merkle_context,
        address_merkle_tree_root_index: packed.address_merkle_tree_root_index,
    };
    counter_instruction(
        instruction_name,
        signer,
        static_accounts,
        &instruction_data,
        &packed.remaining_accounts,
    )
}

pub fn increment_counter_instruction(
    signer: &Pubkey,
    static_accounts: &StaticAccounts,
    proof: CompressedProof,
    current: &CounterCompressedAccount,
    packed: &PackedInputAccountContext,
) -> Result<Instruction, CounterClientError> {
    update_counter_instruction("increment", signer, static_accounts, proof, current, packed)
}

pub fn delete_counter_instruction(
    signer: &Pubkey,
    static_accounts: &StaticAccounts,
    proof: CompressedProof,
    current: &CounterCompressedAccount,
    packed: &PackedInputAccountContext,
) -> Result<Instruction, CounterClientError> {
    update_counter_instruction("delete", signer, static_accounts, proof, current, packed)
}

/// Decodes the counter stored in an indexed compressed account.
pub fn decode_counter(
    account: &IndexedCompressedAccount,
) -> Result<CounterCompressedAccount, CounterClientError> {
    let data = account
        .account
        .compressed_account
        .data
        .as_ref()
        .ok_or_else(|| CounterClientError::MissingAccountData(account.hash.to_base58()))?;
    Ok(CounterCompressedAccount::deserialize(&mut data.data.as_slice())?)
}

/// Claims the counter address of `payer` and creates a zeroed counter.
pub async fn create_counter<R: RpcConnection, I: Indexer>(
    rpc: &R,
    indexer: &I,
    payer: &Keypair,
    config: &ClientConfig,
) -> Result<Signature, CounterClientError> {
    let (address, seed) = counter_address(&payer.pubkey(), config);
    debug!("creating counter at {}", address.to_base58());

    let proof = indexer
        .get_validity_proof(
            vec![],
            vec![AddressWithTree {
                address,
                tree: config.address_tree.merkle_tree,
            }],
        )
        .await?
        .value;
    let address_params = new_address_params(seed, &proof)?;
    let output_compressed_accounts = create_new_address_output_state(
        address,
        config.program_id,
        config.state_tree.merkle_tree,
    );
    let packed = pack_new(
        &output_compressed_accounts,
        &[address_params],
        &config.state_tree,
    )?;

    let static_accounts = required_static_accounts(config.program_id, &config.system_program_ids);
    let instruction = create_counter_instruction(
        &payer.pubkey(),
        &static_accounts,
        proof.compressed_proof,
        &packed,
    )?;
    let signature = send_transaction_with_priority_fee(
        rpc,
        instruction,
        payer,
        &config.priority_fee,
        &config.explorer,
    )
    .await?;
    info!("counter {} created", address.to_base58());
    Ok(signature)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CounterUpdate {
    Increment,
    Delete,
}

impl CounterUpdate {
    fn instruction_name(&self) -> &'static str {
        match self {
            CounterUpdate::Increment => "increment",
            CounterUpdate::Delete => "delete",
        }
    }
}

async fn update_counter<R: RpcConnection, I: Indexer>(
    update: CounterUpdate,
    rpc: &R,
    indexer: &I,
    payer: &Keypair,
    config: &ClientConfig,
) -> Result<Signature, CounterClientError> {
    let (address, _) = counter_address(&payer.pubkey(), config);
    let account = indexer
        .get_compressed_account(address)
        .await?
        .value
        .ok_or_else(|| CounterClientError::CounterNotFound(address.to_base58()))?;
    let current = decode_counter(&account)?;

    let proof = indexer
        .get_validity_proof(vec![account.hash], vec![])
        .await?
        .value;
    // A deleted counter leaves no output account behind.
    let output_compressed_accounts = match update {
        CounterUpdate::Increment => vec![OutputCompressedAccountWithContext {
            compressed_account: account.account.compressed_account.clone(),
            merkle_tree: config.state_tree.merkle_tree,
        }],
        CounterUpdate::Delete => vec![],
    };
    let packed = pack_with_input(
        &[account.account],
        &proof,
        &output_compressed_accounts,
        &[],
        &config.address_tree,
    )?;

    let static_accounts = required_static_accounts(config.program_id, &config.system_program_ids);
    let instruction = update_counter_instruction(
        update.instruction_name(),
        &payer.pubkey(),
        &static_accounts,
        proof.compressed_proof,
        &current,
        &packed,
    )?;
    let signature = send_transaction_with_priority_fee(
        rpc,
        instruction,
        payer,
        &config.priority_fee,
        &config.explorer,
    )
    .await?;
    info!(
        "counter {} {} at value {}",
        address.to_base58(),
        update.instruction_name(),
        current.counter
    );
    Ok(signature)
}

pub async fn increment_counter<R: RpcConnection, I: Indexer>(
    rpc: &R,
    indexer: &I,
    payer: &Keypair,
    config: &ClientConfig,
) -> Result<Signature, CounterClientError> {
    update_counter(CounterUpdate::Increment, rpc, indexer, payer, config).await
}

pub async fn delete_counter<R: RpcConnection, I: Indexer>(
    rpc: &R,
    indexer: &I,
    payer: &Keypair,
    config: &ClientConfig,
) -> Result<Signature, CounterClientError> {
    update_counter(CounterUpdate::Delete, rpc, indexer, payer, config).await
}

/// Looks up `owner`'s counter. Returns `None` if it was never created or has
/// been deleted.
pub async fn fetch_counter<I: Indexer>(
    indexer: &I,
    owner: &Pubkey,
    config: &ClientConfig,
) -> Result<Option<CounterCompressedAccount>, CounterClientError> {
    let (address, _) = counter_address(owner, config);
    match indexer.get_compressed_account(address).await?.value {
        Some(account) => Ok(Some(decode_counter(&account)?)),
        None => Ok(None),
    }
}
