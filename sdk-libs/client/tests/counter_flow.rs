mod test_utils;

use borsh::BorshDeserialize;
use counter_client::{
    counter::{
        counter_address, create_counter, delete_counter, fetch_counter, increment_counter,
        instruction_discriminator, CounterCompressedAccount, CounterInstructionData,
    },
    indexer::{AddressWithTree, IndexerError},
    retry::{with_retry, RetryConfig},
    rpc::RpcConnection,
    transaction::{send_transaction_with_priority_fee, ExplorerConfig, PriorityFeeConfig},
    ClientConfig, CounterClientError,
};
use solana_sdk::{
    compute_budget::{self, ComputeBudgetInstruction},
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    system_program,
    transaction::Transaction,
};
use test_utils::{MockIndexer, MockRpc, ADDRESS_ROOT_INDEX, STATE_ROOT_INDEX};

/// Program id and account keys of every instruction in `transaction`.
fn decompile(transaction: &Transaction) -> Vec<(Pubkey, Vec<Pubkey>, Vec<u8>)> {
    let keys = &transaction.message.account_keys;
    transaction
        .message
        .instructions
        .iter()
        .map(|ix| {
            (
                keys[ix.program_id_index as usize],
                ix.accounts.iter().map(|i| keys[*i as usize]).collect(),
                ix.data.clone(),
            )
        })
        .collect()
}

#[test]
fn test_counter_address_is_deterministic() {
    let config = ClientConfig::default();
    let signer = Keypair::new().pubkey();

    let first = counter_address(&signer, &config);
    let second = counter_address(&signer, &config);
    assert_eq!(first, second);
    assert_eq!(first.0[0], 0);
    assert_eq!(first.1[0], 0);
}

#[tokio::test]
async fn test_create_counter() {
    let config = ClientConfig::default();
    let rpc = MockRpc::new();
    let indexer = MockIndexer::new(&config);
    let payer = Keypair::new();

    create_counter(&rpc, &indexer, &payer, &config).await.unwrap();

    let (address, _) = counter_address(&payer.pubkey(), &config);
    let requests = indexer.proof_requests.lock().unwrap().clone();
    assert_eq!(
        requests,
        vec![(
            vec![],
            vec![AddressWithTree {
                address,
                tree: config.address_tree.merkle_tree,
            }]
        )]
    );

    let sent = rpc.sent_transactions();
    assert_eq!(sent.len(), 1);
    let instructions = decompile(&sent[0]);
    assert_eq!(instructions.len(), 3);

    let (program_id, accounts, data) = &instructions[2];
    assert_eq!(*program_id, config.program_id);
    assert_eq!(data[..8], instruction_discriminator("create"));
    assert_eq!(accounts[0], payer.pubkey());
    assert_eq!(accounts[1], config.program_id);
    // Output tree, address tree, address queue, nullifier queue.
    assert_eq!(
        accounts[9..],
        [
            config.state_tree.merkle_tree,
            config.address_tree.merkle_tree,
            config.address_tree.queue,
            config.state_tree.nullifier_queue,
        ]
    );

    let instruction_data = CounterInstructionData::deserialize(&mut &data[8..]).unwrap();
    assert!(instruction_data.inputs.is_empty());
    assert_eq!(instruction_data.merkle_context.leaf_index, 0);
    assert_eq!(instruction_data.merkle_context.merkle_tree_pubkey_index, 0);
    assert_eq!(instruction_data.merkle_context.nullifier_queue_pubkey_index, 3);
    assert_eq!(
        instruction_data.address_merkle_tree_root_index,
        ADDRESS_ROOT_INDEX
    );
    assert_eq!(
        instruction_data
            .address_merkle_context
            .address_merkle_tree_pubkey_index,
        1
    );
    assert_eq!(instruction_data.proof.a, [1u8; 32]);
}

#[tokio::test]
async fn test_create_existing_counter_fails() {
    let config = ClientConfig::default();
    let rpc = MockRpc::new();
    let indexer = MockIndexer::new(&config);
    let payer = Keypair::new();
    indexer.insert_counter(&payer.pubkey(), 0);

    let result = create_counter(&rpc, &indexer, &payer, &config).await;
    assert!(matches!(
        result,
        Err(CounterClientError::Indexer(
            IndexerError::AddressAlreadyExists { .. }
        ))
    ));
    assert!(rpc.sent_transactions().is_empty());
}

#[tokio::test]
async fn test_increment_counter() {
    let config = ClientConfig::default();
    let rpc = MockRpc::new();
    let indexer = MockIndexer::new(&config);
    let payer = Keypair::new();
    let account = indexer.insert_counter(&payer.pubkey(), 41);

    increment_counter(&rpc, &indexer, &payer, &config)
        .await
        .unwrap();

    let requests = indexer.proof_requests.lock().unwrap().clone();
    assert_eq!(requests, vec![(vec![account.hash], vec![])]);

    let sent = rpc.sent_transactions();
    let (program_id, accounts, data) = decompile(&sent[0]).remove(2);
    assert_eq!(program_id, config.program_id);
    assert_eq!(data[..8], instruction_discriminator("increment"));
    // Input tree and queue, then the fallback address tree and queue.
    assert_eq!(
        accounts[9..],
        [
            config.state_tree.merkle_tree,
            config.state_tree.nullifier_queue,
            config.address_tree.merkle_tree,
            config.address_tree.queue,
        ]
    );

    let instruction_data = CounterInstructionData::deserialize(&mut &data[8..]).unwrap();
    let current =
        CounterCompressedAccount::deserialize(&mut instruction_data.inputs[0].as_slice()).unwrap();
    assert_eq!(current.counter, 41);
    assert_eq!(current.owner, payer.pubkey());
    assert_eq!(instruction_data.merkle_tree_root_index, STATE_ROOT_INDEX);
    assert_eq!(instruction_data.merkle_context.leaf_index, 3);
    assert_eq!(instruction_data.address_merkle_tree_root_index, 0);
}

#[tokio::test]
async fn test_increment_missing_counter() {
    let config = ClientConfig::default();
    let rpc = MockRpc::new();
    let indexer = MockIndexer::new(&config);
    let payer = Keypair::new();

    let result = increment_counter(&rpc, &indexer, &payer, &config).await;
    assert!(matches!(result, Err(CounterClientError::CounterNotFound(_))));
    assert!(indexer.proof_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_counter() {
    let config = ClientConfig::default();
    let rpc = MockRpc::new();
    let indexer = MockIndexer::new(&config);
    let payer = Keypair::new();
    indexer.insert_counter(&payer.pubkey(), 7);

    delete_counter(&rpc, &indexer, &payer, &config)
        .await
        .unwrap();

    let sent = rpc.sent_transactions();
    let (_, accounts, data) = decompile(&sent[0]).remove(2);
    assert_eq!(data[..8], instruction_discriminator("delete"));
    assert_eq!(accounts.len(), 9 + 4);
}

#[tokio::test]
async fn test_fetch_counter_is_idempotent() {
    let config = ClientConfig::default();
    let indexer = MockIndexer::new(&config);
    let owner = Keypair::new().pubkey();

    assert_eq!(fetch_counter(&indexer, &owner, &config).await.unwrap(), None);

    indexer.insert_counter(&owner, 12);
    let first = fetch_counter(&indexer, &owner, &config).await.unwrap();
    let second = fetch_counter(&indexer, &owner, &config).await.unwrap();
    assert_eq!(
        first,
        Some(CounterCompressedAccount {
            owner,
            counter: 12
        })
    );
    assert_eq!(first, second);
    assert_eq!(indexer.lookups(), 3);
}

#[tokio::test]
async fn test_priority_fee_instructions_come_first() {
    let rpc = MockRpc::new();
    let payer = Keypair::new();
    let instruction = Instruction {
        program_id: system_program::ID,
        accounts: vec![AccountMeta::new(payer.pubkey(), true)],
        data: vec![9],
    };

    let signature = send_transaction_with_priority_fee(
        &rpc,
        instruction,
        &payer,
        &PriorityFeeConfig::default(),
        &ExplorerConfig::default(),
    )
    .await
    .unwrap();
    assert!(rpc.confirm_transaction(signature).await.unwrap());

    let sent = rpc.sent_transactions();
    assert_eq!(sent[0].message.account_keys[0], payer.pubkey());
    let instructions = decompile(&sent[0]);
    assert_eq!(instructions[0].0, compute_budget::id());
    assert_eq!(
        instructions[0].2,
        ComputeBudgetInstruction::set_compute_unit_limit(400_000).data
    );
    assert_eq!(instructions[1].0, compute_budget::id());
    assert_eq!(
        instructions[1].2,
        ComputeBudgetInstruction::set_compute_unit_price(500_000).data
    );
    assert_eq!(instructions[2].0, system_program::ID);
    assert_eq!(instructions[2].2, vec![9]);
}

#[tokio::test]
async fn test_stale_blockhash_is_propagated() {
    let config = ClientConfig::default();
    let rpc = MockRpc::with_expiring_blockhashes(1);
    let indexer = MockIndexer::new(&config);
    let payer = Keypair::new();

    let error = create_counter(&rpc, &indexer, &payer, &config)
        .await
        .unwrap_err();
    match &error {
        CounterClientError::Rpc(e) => assert!(e.is_blockhash_not_found()),
        e => panic!("unexpected error {:?}", e),
    }
    assert!(error.is_retryable());
    assert!(rpc.sent_transactions().is_empty());
    // No retry happened inside the library.
    assert_eq!(indexer.proof_requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_retry_rebuilds_transaction_after_stale_blockhash() {
    let config = ClientConfig::default();
    let rpc = MockRpc::with_expiring_blockhashes(1);
    let indexer = MockIndexer::new(&config);
    let payer = Keypair::new();
    let retry_config = RetryConfig {
        num_retries: 3,
        delay_ms: 1,
        max_delay_ms: 1,
    };

    let (rpc_ref, indexer_ref, payer_ref, config_ref) = (&rpc, &indexer, &payer, &config);
    with_retry(retry_config, CounterClientError::is_retryable, move || {
        create_counter(rpc_ref, indexer_ref, payer_ref, config_ref)
    })
    .await
    .unwrap();

    assert_eq!(rpc.sent_transactions().len(), 1);
    assert_eq!(indexer.proof_requests.lock().unwrap().len(), 2);
}
