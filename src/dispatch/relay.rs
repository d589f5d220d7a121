//! Fee sponsoring relay client
//!
//! Talks to the relay endpoints of the transaction service: one to read the
//! remaining sponsored transactions of a Safe, one to relay a call.

use super::{RelayQuota, Submitter};
use crate::{
    config::RelayConfig,
    error::{BatchError, BatchResult, check_status},
};
use async_trait::async_trait;
use ethers::types::{Address, Bytes, H256};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    to: Address,
    data: Bytes,
    version: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayResponse {
    task_id: H256,
}

#[derive(Debug, Deserialize)]
struct RemainingResponse {
    remaining: u32,
}

pub struct RelayClient {
    http: Client,
    base_url: String,
    chain_id: u64,
    safe_version: String,
}

impl RelayClient {
    /// Returns `None` when no relay url is configured
    pub fn from_config(
        config: &RelayConfig,
        chain_id: u64,
        safe_version: &str,
    ) -> anyhow::Result<Option<Self>> {
        let Some(url) = &config.url else {
            return Ok(None);
        };

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Some(Self {
            http,
            base_url: url.trim_end_matches('/').to_string(),
            chain_id,
            safe_version: safe_version.to_string(),
        }))
    }
}

#[async_trait]
impl Submitter for RelayClient {
    async fn submit(&self, to: Address, data: Bytes) -> BatchResult<H256> {
        let url = format!("{}/v1/chains/{}/relay", self.base_url, self.chain_id);
        let request = RelayRequest {
            to,
            data,
            version: &self.safe_version,
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BatchError::Submission(e.to_string()))?;
        let response = check_status(response)
            .await
            .map_err(BatchError::Submission)?;

        let body: RelayResponse = response
            .json()
            .await
            .map_err(|e| BatchError::Submission(format!("invalid relay response: {}", e)))?;

        debug!("Relay accepted task {:?}", body.task_id);
        Ok(body.task_id)
    }
}

#[async_trait]
impl RelayQuota for RelayClient {
    async fn remaining(&self, chain_id: u64, safe: Address) -> BatchResult<u32> {
        let url = format!("{}/v1/chains/{}/relay/{:?}", self.base_url, chain_id, safe);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| BatchError::RelayUnavailable(e.to_string()))?;
        let response = check_status(response)
            .await
            .map_err(BatchError::RelayUnavailable)?;

        let body: RemainingResponse = response
            .json()
            .await
            .map_err(|e| BatchError::RelayUnavailable(format!("invalid response: {}", e)))?;

        Ok(body.remaining)
    }
}
