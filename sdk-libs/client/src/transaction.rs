use solana_sdk::{
    compute_budget::ComputeBudgetInstruction,
    instruction::Instruction,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use tracing::{debug, info};

use crate::{
    constants::{DEFAULT_COMPUTE_UNIT_LIMIT, DEFAULT_COMPUTE_UNIT_PRICE_MICRO_LAMPORTS},
    rpc::{RpcConnection, RpcError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityFeeConfig {
    pub compute_unit_limit: u32,
    /// Price in micro-lamports per compute unit.
    pub compute_unit_price: u64,
}

impl Default for PriorityFeeConfig {
    fn default() -> Self {
        Self {
            compute_unit_limit: DEFAULT_COMPUTE_UNIT_LIMIT,
            compute_unit_price: DEFAULT_COMPUTE_UNIT_PRICE_MICRO_LAMPORTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerConfig {
    pub cluster: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            cluster: "custom".to_string(),
        }
    }
}

impl ExplorerConfig {
    pub fn transaction_url(&self, signature: &Signature) -> String {
        format!(
            "https://explorer.solana.com/tx/{}?cluster={}",
            signature, self.cluster
        )
    }
}

pub fn priority_fee_instructions(config: &PriorityFeeConfig) -> [Instruction; 2] {
    [
        ComputeBudgetInstruction::set_compute_unit_limit(config.compute_unit_limit),
        ComputeBudgetInstruction::set_compute_unit_price(config.compute_unit_price),
    ]
}

/// Builds the transaction `[compute unit limit, compute unit price,
/// instruction]`, signs it with `payer` and submits it once.
pub async fn send_transaction_with_priority_fee<R: RpcConnection>(
    rpc: &R,
    instruction: Instruction,
    payer: &Keypair,
    priority_fee: &PriorityFeeConfig,
    explorer: &ExplorerConfig,
) -> Result<Signature, RpcError> {
    let mut instructions = priority_fee_instructions(priority_fee).to_vec();
    instructions.push(instruction);

    let blockhash = rpc.get_latest_blockhash().await?;
    let mut transaction = Transaction::new_with_payer(&instructions, Some(&payer.pubkey()));
    rpc.sign_transaction(&mut transaction, &[payer], blockhash)?;
    debug!(
        "sending transaction with {} instructions, blockhash {}",
        instructions.len(),
        blockhash
    );

    let signature = rpc.send_transaction(&transaction).await?;
    info!(
        "Your transaction signature {}",
        explorer.transaction_url(&signature)
    );
    Ok(signature)
}
