use solana_sdk::{pubkey, pubkey::Pubkey};

/// Seed of the CPI authority.
pub const CPI_AUTHORITY_PDA_SEED: &[u8] = b"cpi_authority";

/// ID of the account-compression program.
pub const PROGRAM_ID_ACCOUNT_COMPRESSION: Pubkey =
    pubkey!("compr6CUsB5m2jS4Y3831ztGSTnDpnKJTKS95d64XVq");
pub const PROGRAM_ID_NOOP: Pubkey = pubkey!("noopb9bkMVfRPU8AsbpTUg8AQkHtKwMYZiFUjNRtMmV");
/// ID of the light-system program.
pub const PROGRAM_ID_LIGHT_SYSTEM: Pubkey = pubkey!("SySTEM1eSU2p4BGQfQpimFEWWSC1XDFeun3Nqzz3rT7");

/// PDA of the light-system program registered in the account-compression
/// program.
pub const REGISTERED_PROGRAM_PDA: Pubkey = pubkey!("35hkDgaAKwMCaxRz2ocSZ6NaUrtKkyNqU6c4RV3tYJRh");
/// CPI authority of the light-system program.
pub const ACCOUNT_COMPRESSION_AUTHORITY_PDA: Pubkey =
    pubkey!("HwXnGK3tPkkVY6P439H2p68AxpeuWXd5PcrAxFpbmfbA");

/// ID of the compressed counter program.
pub const COUNTER_PROGRAM_ID: Pubkey = pubkey!("BiPhBki2N2m9EtALKMPFjs2KPuwJ2vdU7wMUHkkc3CAd");

pub const STATE_MERKLE_TREE_V1: Pubkey = pubkey!("smt1NamzXdq4AMqS2fS2F1i5KTYPZRhoHgWx38d8WsT");
pub const NULLIFIER_QUEUE_V1: Pubkey = pubkey!("nfq1NvQDJ2GEgnS8zt9prAe8rjjpAW1zFkrvZoBR148");
pub const ADDRESS_MERKLE_TREE_V1: Pubkey = pubkey!("amt1Ayt45jfbdw5YSo7iz6WZxUmnZsQTYXy82hVwyC2");
pub const ADDRESS_QUEUE_V1: Pubkey = pubkey!("aq1S9z4reTSQAdgWHGD2zDaS39sjGrAxbR31vxJ2F4F");

pub const DEFAULT_COMPUTE_UNIT_LIMIT: u32 = 400_000;
pub const DEFAULT_COMPUTE_UNIT_PRICE_MICRO_LAMPORTS: u64 = 500_000;

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";
pub const DEFAULT_INDEXER_URL: &str = "http://127.0.0.1:8784";
