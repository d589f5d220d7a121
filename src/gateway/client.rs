//! Gateway Client Module
//!
//! Fetches the details of every queued transaction of a batch. Requests are
//! issued concurrently but the result keeps the order of the queue, and a
//! single unresolved transaction fails the whole request.

use crate::{
    PendingTransaction, TransactionDetails,
    config::GatewayConfig,
    error::{BatchError, BatchResult, check_status},
};
use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Resolves pending transaction references into their details
#[async_trait]
pub trait DetailResolver: Send + Sync {
    /// Returns details in the same order as `txs`
    async fn resolve(
        &self,
        txs: &[PendingTransaction],
        chain_id: u64,
    ) -> BatchResult<Vec<TransactionDetails>>;
}

/// HTTP client for the transaction service gateway
pub struct GatewayClient {
    http: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(config: &GatewayConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, tx: &PendingTransaction, chain_id: u64) -> BatchResult<TransactionDetails> {
        let url = format!(
            "{}/v1/chains/{}/transactions/{}",
            self.base_url,
            chain_id,
            tx.id()
        );

        let failed = |reason: String| {
            warn!("Could not resolve transaction {}: {}", tx.id(), reason);
            BatchError::DetailResolution {
                tx_id: tx.id().to_string(),
                reason,
            }
        };

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;
        let response = check_status(response).await.map_err(failed)?;

        response
            .json::<TransactionDetails>()
            .await
            .map_err(|e| failed(format!("invalid response: {}", e)))
    }
}

#[async_trait]
impl DetailResolver for GatewayClient {
    async fn resolve(
        &self,
        txs: &[PendingTransaction],
        chain_id: u64,
    ) -> BatchResult<Vec<TransactionDetails>> {
        debug!("Resolving {} transactions on chain {}", txs.len(), chain_id);
        try_join_all(txs.iter().map(|tx| self.fetch(tx, chain_id))).await
    }
}
