//! Wire types of the Photon JSON-RPC API.
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a, P> {
    pub jsonrpc: &'static str,
    pub id: &'a str,
    pub method: &'a str,
    pub params: P,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<R> {
    pub result: Option<R>,
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    pub code: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ApiContext {
    pub slot: u64,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub context: ApiContext,
    pub value: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetValidityProofParams {
    pub hashes: Vec<String>,
    pub new_addresses_with_trees: Vec<ApiAddressWithTree>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiAddressWithTree {
    pub address: String,
    pub tree: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCompressedProof {
    pub a: Vec<u8>,
    pub b: Vec<u8>,
    pub c: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiValidityProof {
    pub compressed_proof: ApiCompressedProof,
    pub roots: Vec<String>,
    pub root_indices: Vec<u64>,
    pub leaf_indices: Vec<u64>,
    pub leaves: Vec<String>,
    pub merkle_trees: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GetCompressedAccountParams {
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct GetCompressedAccountsByOwnerParams {
    pub owner: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAccountData {
    pub data: String,
    pub data_hash: String,
    pub discriminator: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCompressedAccount {
    pub address: Option<String>,
    pub data: Option<ApiAccountData>,
    pub hash: String,
    pub lamports: u64,
    pub leaf_index: u32,
    pub owner: String,
    pub seq: Option<u64>,
    pub slot_created: u64,
    pub tree: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiAccountList {
    pub items: Vec<ApiCompressedAccount>,
}
