//! Client for a compressed counter program built on the light system
//! program.
//!
//! The crate derives compressed-account addresses, requests validity proofs
//! from a Photon indexer, packs Merkle contexts into remaining accounts and
//! submits priority-fee transactions.

pub mod address;
pub mod compressed_account;
pub mod config;
pub mod constants;
pub mod counter;
pub mod error;
pub mod indexer;
pub mod pack;
pub mod retry;
pub mod rpc;
pub mod system_accounts;
pub mod transaction;

pub use config::ClientConfig;
pub use error::CounterClientError;
