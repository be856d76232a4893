use std::fmt::Debug;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, trace};

use super::{
    api_model::{
        ApiAccountList, ApiAddressWithTree, ApiCompressedAccount, ApiResponse, ApiValidityProof,
        GetCompressedAccountParams, GetCompressedAccountsByOwnerParams, GetValidityProofParams,
        JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    },
    base58::Base58Conversions,
    response::{Context, Response},
    tree_info::TreeRegistry,
    AddressWithTree, Hash, IndexedCompressedAccount, Indexer, IndexerError,
    ValidityProofWithContext,
};
use crate::address::Address;

const REQUEST_ID: &str = "test-account";

/// JSON-RPC client of the Photon indexer.
///
/// Every method issues exactly one request. Retrying is left to the caller.
pub struct PhotonIndexer {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    trees: TreeRegistry,
}

impl PhotonIndexer {
    pub fn new(url: String, api_key: Option<String>) -> Self {
        Self::new_with_trees(url, api_key, TreeRegistry::default())
    }

    pub fn new_with_trees(url: String, api_key: Option<String>, trees: TreeRegistry) -> Self {
        PhotonIndexer {
            client: reqwest::Client::new(),
            url,
            api_key,
            trees,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn trees(&self) -> &TreeRegistry {
        &self.trees
    }

    async fn call<P, R>(&self, method: &str, params: P) -> Result<R, IndexerError>
    where
        P: Serialize + Send + Sync,
        R: DeserializeOwned,
    {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: REQUEST_ID,
            method,
            params,
        };
        trace!("photon request {}", method);

        let mut builder = self.client.post(self.url.as_str()).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.query(&[("api-key", api_key)]);
        }
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IndexerError::ApiError(format!(
                "{} returned HTTP {}",
                method, status
            )));
        }
        let body = response.bytes().await?;
        decode_response(method, &body)
    }
}

/// Decodes a JSON-RPC response body, surfacing the `error` member if present.
pub(crate) fn decode_response<R: DeserializeOwned>(
    context: &str,
    body: &[u8],
) -> Result<R, IndexerError> {
    let response: JsonRpcResponse<R> = serde_json::from_slice(body).map_err(|e| {
        debug!("failed to decode {} response: {}", context, e);
        IndexerError::InvalidResponseData
    })?;
    extract_result_with_error_check(context, response.error, response.result)
}

fn extract_result_with_error_check<T>(
    context: &str,
    error: Option<JsonRpcError>,
    result: Option<T>,
) -> Result<T, IndexerError> {
    if let Some(error) = error {
        let message = error
            .message
            .clone()
            .unwrap_or_else(|| format!("Unknown API error: {:?}", error));
        return Err(IndexerError::PhotonError {
            context: context.to_string(),
            message: match error.code {
                Some(code) => format!("(code: {}) {}", code, message),
                None => message,
            },
        });
    }
    result.ok_or_else(|| IndexerError::missing_result(context, "value not present"))
}

fn address_already_exists(error: IndexerError, addresses: &[AddressWithTree]) -> IndexerError {
    match error {
        IndexerError::PhotonError { message, .. } if message.contains("already exists") => {
            IndexerError::AddressAlreadyExists {
                address: addresses
                    .iter()
                    .map(|x| x.address.to_base58())
                    .collect::<Vec<_>>()
                    .join(", "),
            }
        }
        error => error,
    }
}

fn indexed_accounts(
    list: ApiAccountList,
    trees: &TreeRegistry,
) -> Result<Vec<IndexedCompressedAccount>, IndexerError> {
    list.items
        .into_iter()
        .map(|account| IndexedCompressedAccount::from_api_model(account, trees))
        .collect()
}

impl Debug for PhotonIndexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotonIndexer")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("trees", &self.trees.len())
            .finish()
    }
}

#[async_trait]
impl Indexer for PhotonIndexer {
    async fn get_validity_proof(
        &self,
        hashes: Vec<Hash>,
        new_addresses: Vec<AddressWithTree>,
    ) -> Result<Response<ValidityProofWithContext>, IndexerError> {
        if hashes.is_empty() && new_addresses.is_empty() {
            return Err(IndexerError::InvalidParameters(
                "Either hashes or new addresses must be provided".to_string(),
            ));
        }
        let params = GetValidityProofParams {
            hashes: hashes.iter().map(|x| x.to_base58()).collect(),
            new_addresses_with_trees: new_addresses
                .iter()
                .map(|x| ApiAddressWithTree {
                    address: x.address.to_base58(),
                    tree: x.tree.to_string(),
                })
                .collect(),
        };

        let api_response: ApiResponse<ApiValidityProof> = self
            .call("getValidityProof", params)
            .await
            .map_err(|e| address_already_exists(e, &new_addresses))?;
        let value = ValidityProofWithContext::from_api_model(api_response.value, &self.trees)?;
        if value.merkle_trees.len() != hashes.len() + new_addresses.len() {
            return Err(IndexerError::InvalidResponseData);
        }
        debug!(
            "validity proof for {} hashes and {} addresses at slot {}",
            hashes.len(),
            new_addresses.len(),
            api_response.context.slot
        );

        Ok(Response {
            context: Context {
                slot: api_response.context.slot,
            },
            value,
        })
    }

    async fn get_compressed_account(
        &self,
        address: Address,
    ) -> Result<Response<Option<IndexedCompressedAccount>>, IndexerError> {
        let params = GetCompressedAccountParams {
            address: address.to_base58(),
        };
        let api_response: ApiResponse<Option<ApiCompressedAccount>> =
            self.call("getCompressedAccount", params).await?;
        let value = api_response
            .value
            .map(|account| IndexedCompressedAccount::from_api_model(account, &self.trees))
            .transpose()?;

        Ok(Response {
            context: Context {
                slot: api_response.context.slot,
            },
            value,
        })
    }

    async fn get_compressed_accounts_by_owner(
        &self,
        owner: &Pubkey,
    ) -> Result<Response<Vec<IndexedCompressedAccount>>, IndexerError> {
        let params = GetCompressedAccountsByOwnerParams {
            owner: owner.to_string(),
        };
        let api_response: ApiResponse<ApiAccountList> =
            self.call("getCompressedAccountsByOwner", params).await?;
        let value = indexed_accounts(api_response.value, &self.trees)?;

        Ok(Response {
            context: Context {
                slot: api_response.context.slot,
            },
            value,
        })
    }

    async fn get_indexer_slot(&self) -> Result<u64, IndexerError> {
        self.call("getIndexerSlot", serde_json::json!({})).await
    }
}
