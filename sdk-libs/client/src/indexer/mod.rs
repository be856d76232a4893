pub mod photon_indexer;

mod api_model;
mod base58;
mod error;
mod indexer_trait;
mod response;
mod tree_info;
mod types;

pub use base58::{decode_base58_to_fixed_array, Base58Conversions};
pub use error::IndexerError;
pub use indexer_trait::Indexer;
pub use photon_indexer::PhotonIndexer;
pub use response::{Context, Response};
pub use tree_info::{TreeMeta, TreeRegistry, TreeType};
pub use types::{AddressWithTree, Hash, IndexedCompressedAccount, ValidityProofWithContext};
