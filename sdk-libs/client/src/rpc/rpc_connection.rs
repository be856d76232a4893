use std::fmt::Debug;

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::Transaction,
};

use crate::rpc::errors::RpcError;

#[async_trait]
pub trait RpcConnection: Send + Sync + Debug + 'static {
    fn get_payer(&self) -> &Keypair;
    fn get_url(&self) -> String;

    async fn health(&self) -> Result<(), RpcError>;

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError>;

    /// Signs `transaction` with `signers` against `blockhash`.
    fn sign_transaction(
        &self,
        transaction: &mut Transaction,
        signers: &[&Keypair],
        blockhash: Hash,
    ) -> Result<(), RpcError> {
        transaction.try_sign(signers, blockhash)?;
        Ok(())
    }

    /// Submits a signed transaction without waiting for confirmation.
    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RpcError>;

    async fn confirm_transaction(&self, signature: Signature) -> Result<bool, RpcError>;

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, RpcError>;

    async fn airdrop_lamports(&self, to: &Pubkey, lamports: u64) -> Result<Signature, RpcError>;
}
