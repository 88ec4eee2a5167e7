use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::Url;

use crate::{
    configuration::Config,
    error::Error,
    types::{EmittedEvent, EventsChunk, RpcRequest, RpcResponse},
};

/// Starknet-keccak entry point selectors.
pub mod selectors {
    pub const BALANCE_OF: &str =
        "0x2e4263afad30923c891518314c3c95dbe830a16874e8abc5777a9a20b54c76e";
    pub const CURRENT_TICK: &str =
        "0x1b232db017348fc9162e85c5816de7d8777757d87fcd54e5908bfec4abe7131";
    pub const POSITION: &str =
        "0x334f8ce3b01e25d0b6fe82d0fdb6eb534f3183d7dc5a6bb44d8eb9f676f650c";
    pub const CALCULATE_COLLATERAL: &str =
        "0x2f039945dd11ae5519fb4e231d067661242f4d40ea6643d58bc758248b32b3e";
    pub const ASSET_CONFIG: &str =
        "0x40a1db21c93dd4b0a09e752c7b8cc7db2b84275621c8d2941edd851a22b56f";
    pub const CALCULATE_DEBT: &str =
        "0x55397f799ccd6e821525983b85f3d0968d3d255251da232af0309e34b2974b";
    pub const LTV_CONFIG: &str =
        "0x239af5fa5cb958318bb362bbfdeb62ba623b36dbb081b6daa1b65564abc7b43";
    pub const DECIMALS: &str =
        "0x4c4fb1ab068f6039d5780c68dd0fa2f8742cceb3426d19667778ca7f3518a9";
    pub const EXTENSION: &str =
        "0x182adf5688404b10669ecb16fc3ddc7c8544ecedf08c4b14df5421f6dd2bcf2";
    pub const PRICE: &str =
        "0x2bd803c09c6b34a4d86ee95434129ea89232e91fab09f9e5dc6fe984fa9a6f";
    pub const MODIFY_POSITION_EVENT: &str =
        "0x3dfe6670b0f4e60f951b8a326e7467613b2470d81881ba2deb540262824f1e";
}

const EVENTS_CHUNK_SIZE: u64 = 1000;

#[derive(Debug)]
pub struct Starknet {
    url: Url,
    client: Client,
    request_id: AtomicU64,
}

impl Starknet {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Starknet {
            url: Url::parse(&config.starknet_rpc_url)?,
            client,
            request_id: AtomicU64::new(1),
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, Error> {
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: self.request_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<RpcResponse<T>>()
            .await?;

        if let Some(error) = response.error {
            return Err(Error::Rpc(format!(
                "{} failed with code {}: {}",
                method, error.code, error.message
            )));
        }

        response
            .result
            .ok_or_else(|| Error::Rpc(format!("{} returned no result", method)))
    }

    /// Calls a view function on the latest block.
    pub async fn call(
        &self,
        contract_address: &str,
        selector: &str,
        calldata: &[String],
    ) -> Result<Vec<String>, Error> {
        let params = json!({
            "request": {
                "contract_address": contract_address,
                "entry_point_selector": selector,
                "calldata": calldata,
            },
            "block_id": "latest",
        });

        self.request("starknet_call", params).await
    }

    pub async fn block_number(&self) -> Result<i64, Error> {
        self.request("starknet_blockNumber", json!([])).await
    }

    pub async fn get_events(
        &self,
        address: &str,
        key: &str,
        from_block: i64,
        to_block: i64,
        continuation_token: Option<&str>,
    ) -> Result<EventsChunk, Error> {
        let mut filter = json!({
            "from_block": { "block_number": from_block },
            "to_block": { "block_number": to_block },
            "address": address,
            "keys": [[key]],
            "chunk_size": EVENTS_CHUNK_SIZE,
        });

        if let Some(token) = continuation_token {
            filter["continuation_token"] = json!(token);
        }

        self.request("starknet_getEvents", json!({ "filter": filter }))
            .await
    }

    /// Follows continuation tokens until the range is exhausted.
    pub async fn get_all_events(
        &self,
        address: &str,
        key: &str,
        from_block: i64,
        to_block: i64,
    ) -> Result<Vec<EmittedEvent>, Error> {
        let mut events = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let chunk = self
                .get_events(address, key, from_block, to_block, token.as_deref())
                .await?;
            events.extend(chunk.events);

            match chunk.continuation_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        Ok(events)
    }

    pub async fn balance_of(
        &self,
        token_address: &str,
        account: &str,
    ) -> Result<Vec<String>, Error> {
        self.call(token_address, selectors::BALANCE_OF, &[account.to_owned()])
            .await
    }
}
