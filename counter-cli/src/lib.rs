pub mod cli;
pub mod telemetry;

use cli::{Cli, Commands};
use counter_client::{
    counter::{create_counter, delete_counter, fetch_counter, increment_counter},
    indexer::PhotonIndexer,
    retry::with_retry,
    rpc::{RpcConnection, SolanaRpcConnection},
    CounterClientError,
};
use solana_sdk::signer::Signer;
use tracing::info;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.args.client_config();
    let retry_config = cli.args.retry_config();
    let indexer = PhotonIndexer::new_with_trees(
        config.indexer_url.clone(),
        config.indexer_api_key.clone(),
        config.tree_registry(),
    );
    let (indexer, config) = (&indexer, &config);

    let rpc = SolanaRpcConnection::new(&config.rpc_url, Some(config.commitment), cli.args.payer()?);
    let rpc = &rpc;
    let payer = rpc.get_payer();
    info!("payer {}, rpc {}", payer.pubkey(), rpc.get_url());

    let signature = match cli.command {
        Commands::Verify(args) => {
            let owner = args.owner.unwrap_or_else(|| payer.pubkey());
            let owner_ref = &owner;
            let counter = with_retry(retry_config, CounterClientError::is_retryable, move || {
                fetch_counter(indexer, owner_ref, config)
            })
            .await?;
            match counter {
                Some(counter) => info!(
                    "counter of {} is {} (owner {})",
                    owner, counter.counter, counter.owner
                ),
                None => info!("no counter found for {}", owner),
            }
            return Ok(());
        }
        Commands::Create => {
            with_retry(retry_config, CounterClientError::is_retryable, move || {
                create_counter(rpc, indexer, payer, config)
            })
            .await?
        }
        Commands::Increment => {
            with_retry(retry_config, CounterClientError::is_retryable, move || {
                increment_counter(rpc, indexer, payer, config)
            })
            .await?
        }
        Commands::Delete => {
            with_retry(retry_config, CounterClientError::is_retryable, move || {
                delete_counter(rpc, indexer, payer, config)
            })
            .await?
        }
    };
    info!("transaction {} submitted", signature);
    Ok(())
}
