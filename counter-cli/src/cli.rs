use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};
use counter_client::{
    compressed_account::{AddressTreeAccounts, StateTreeAccounts},
    constants::{
        ADDRESS_MERKLE_TREE_V1, ADDRESS_QUEUE_V1, COUNTER_PROGRAM_ID, DEFAULT_INDEXER_URL,
        DEFAULT_RPC_URL, NULLIFIER_QUEUE_V1, STATE_MERKLE_TREE_V1,
    },
    retry::RetryConfig,
    transaction::{ExplorerConfig, PriorityFeeConfig},
    ClientConfig,
};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair},
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub args: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Create the counter of the payer.
    Create,
    /// Increment the counter of the payer by one.
    Increment,
    /// Close the counter of the payer.
    Delete,
    /// Print the current value of a counter.
    Verify(VerifyArgs),
}

#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct VerifyArgs {
    /// Owner of the counter, defaults to the payer.
    #[arg(long)]
    pub owner: Option<Pubkey>,
}

#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    #[arg(long, global = true, env = "COUNTER_RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    #[arg(long, global = true, env = "COUNTER_INDEXER_URL", default_value = DEFAULT_INDEXER_URL)]
    pub indexer_url: String,

    #[arg(long, global = true, env = "COUNTER_PHOTON_API_KEY")]
    pub photon_api_key: Option<String>,

    /// Path to the payer's JSON keypair file.
    #[arg(long, global = true, env = "COUNTER_PAYER")]
    pub payer: Option<String>,

    #[arg(long, global = true, env = "COUNTER_PROGRAM_ID", default_value_t = COUNTER_PROGRAM_ID)]
    pub program_id: Pubkey,

    #[arg(long, global = true, env = "COUNTER_STATE_TREE", default_value_t = STATE_MERKLE_TREE_V1)]
    pub state_tree: Pubkey,

    #[arg(
        long,
        global = true,
        env = "COUNTER_NULLIFIER_QUEUE",
        default_value_t = NULLIFIER_QUEUE_V1
    )]
    pub nullifier_queue: Pubkey,

    #[arg(
        long,
        global = true,
        env = "COUNTER_ADDRESS_TREE",
        default_value_t = ADDRESS_MERKLE_TREE_V1
    )]
    pub address_tree: Pubkey,

    #[arg(long, global = true, env = "COUNTER_ADDRESS_QUEUE", default_value_t = ADDRESS_QUEUE_V1)]
    pub address_queue: Pubkey,

    #[arg(long, global = true, env = "COUNTER_CU_LIMIT", default_value = "400000")]
    pub cu_limit: u32,

    /// Compute unit price in micro-lamports.
    #[arg(long, global = true, env = "COUNTER_CU_PRICE", default_value = "500000")]
    pub cu_price: u64,

    #[arg(long, global = true, env = "COUNTER_EXPLORER_CLUSTER", default_value = "custom")]
    pub explorer_cluster: String,

    #[arg(long, global = true, env = "COUNTER_MAX_RETRIES", default_value = "3")]
    pub max_retries: u32,

    #[arg(long, global = true, env = "COUNTER_RETRY_DELAY_MS", default_value = "400")]
    pub retry_delay_ms: u64,
}

impl GlobalArgs {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            rpc_url: self.rpc_url.clone(),
            indexer_url: self.indexer_url.clone(),
            indexer_api_key: self.photon_api_key.clone(),
            program_id: self.program_id,
            state_tree: StateTreeAccounts {
                merkle_tree: self.state_tree,
                nullifier_queue: self.nullifier_queue,
            },
            address_tree: AddressTreeAccounts {
                merkle_tree: self.address_tree,
                queue: self.address_queue,
            },
            priority_fee: PriorityFeeConfig {
                compute_unit_limit: self.cu_limit,
                compute_unit_price: self.cu_price,
            },
            explorer: ExplorerConfig {
                cluster: self.explorer_cluster.clone(),
            },
            ..Default::default()
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            num_retries: self.max_retries,
            delay_ms: self.retry_delay_ms,
            max_delay_ms: RetryConfig::default().max_delay_ms,
        }
    }

    pub fn payer(&self) -> anyhow::Result<Keypair> {
        let path = self
            .payer
            .as_deref()
            .ok_or_else(|| anyhow!("a payer keypair is required, set --payer or COUNTER_PAYER"))?;
        read_keypair_file(path).map_err(|e| anyhow!("failed to read keypair {}: {}", path, e))
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_defaults_match_localnet_config() {
        std::env::remove_var("COUNTER_RPC_URL");
        std::env::remove_var("COUNTER_CU_PRICE");
        let cli = Cli::try_parse_from(["counter", "create"]).unwrap();
        assert_eq!(cli.command, Commands::Create);

        let config = cli.args.client_config();
        let default = ClientConfig::default();
        assert_eq!(config.rpc_url, default.rpc_url);
        assert_eq!(config.indexer_url, default.indexer_url);
        assert_eq!(config.program_id, default.program_id);
        assert_eq!(config.state_tree, default.state_tree);
        assert_eq!(config.address_tree, default.address_tree);
        assert_eq!(config.priority_fee, default.priority_fee);
        assert_eq!(config.explorer, default.explorer);
    }

    #[test]
    #[serial]
    fn test_env_fallback() {
        std::env::set_var("COUNTER_RPC_URL", "http://rpc.example:8899");
        std::env::set_var("COUNTER_CU_PRICE", "1");
        let cli = Cli::try_parse_from(["counter", "increment"]).unwrap();
        std::env::remove_var("COUNTER_RPC_URL");
        std::env::remove_var("COUNTER_CU_PRICE");

        let config = cli.args.client_config();
        assert_eq!(config.rpc_url, "http://rpc.example:8899");
        assert_eq!(config.priority_fee.compute_unit_price, 1);
    }

    #[test]
    #[serial]
    fn test_verify_owner() {
        let owner = Pubkey::new_unique();
        let owner_arg = owner.to_string();
        let cli =
            Cli::try_parse_from(["counter", "verify", "--owner", owner_arg.as_str()]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Verify(VerifyArgs { owner: Some(owner) })
        );
    }

    #[test]
    #[serial]
    fn test_missing_payer() {
        std::env::remove_var("COUNTER_PAYER");
        let cli = Cli::try_parse_from(["counter", "create"]).unwrap();
        assert!(cli.args.payer().is_err());
    }
}
