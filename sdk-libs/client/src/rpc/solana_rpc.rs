use std::fmt::{Debug, Display, Formatter};

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::Transaction,
};
use tracing::debug;

use crate::rpc::{errors::RpcError, rpc_connection::RpcConnection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolanaRpcUrl {
    Testnet,
    Devnet,
    Localnet,
    Custom(String),
}

impl Display for SolanaRpcUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            SolanaRpcUrl::Testnet => "https://api.testnet.solana.com",
            SolanaRpcUrl::Devnet => "https://api.devnet.solana.com",
            SolanaRpcUrl::Localnet => "http://127.0.0.1:8899",
            SolanaRpcUrl::Custom(url) => url.as_str(),
        };
        write!(f, "{}", str)
    }
}

/// [`RpcConnection`] backed by a validator's JSON-RPC endpoint.
///
/// Requests are issued once. Callers that want retries wrap the call in
/// [`crate::retry::with_retry`].
pub struct SolanaRpcConnection {
    pub client: RpcClient,
    pub payer: Keypair,
}

impl Debug for SolanaRpcConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolanaRpcConnection {{ client: {:?} }}",
            self.client.url()
        )
    }
}

impl SolanaRpcConnection {
    pub fn new<U: ToString>(
        url: U,
        commitment_config: Option<CommitmentConfig>,
        payer: Keypair,
    ) -> Self {
        let commitment_config = commitment_config.unwrap_or(CommitmentConfig::confirmed());
        let client = RpcClient::new_with_commitment(url.to_string(), commitment_config);
        Self { client, payer }
    }
}

#[async_trait]
impl RpcConnection for SolanaRpcConnection {
    fn get_payer(&self) -> &Keypair {
        &self.payer
    }

    fn get_url(&self) -> String {
        self.client.url()
    }

    async fn health(&self) -> Result<(), RpcError> {
        self.client.get_health().await.map_err(RpcError::from)
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        let blockhash = self.client.get_latest_blockhash().await?;
        debug!("latest blockhash {}", blockhash);
        Ok(blockhash)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RpcError> {
        self.client
            .send_transaction(transaction)
            .await
            .map_err(RpcError::from)
    }

    async fn confirm_transaction(&self, signature: Signature) -> Result<bool, RpcError> {
        self.client
            .confirm_transaction(&signature)
            .await
            .map_err(RpcError::from)
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, RpcError> {
        self.client
            .get_balance(pubkey)
            .await
            .map_err(RpcError::from)
    }

    async fn airdrop_lamports(&self, to: &Pubkey, lamports: u64) -> Result<Signature, RpcError> {
        self.client
            .request_airdrop(to, lamports)
            .await
            .map_err(RpcError::from)
    }
}
