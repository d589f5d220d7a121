//! Direct submission from the executor account

use super::Submitter;
use crate::error::{BatchError, BatchResult};
use async_trait::async_trait;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, Bytes, H256, TransactionRequest},
};
use std::sync::Arc;
use tracing::debug;

/// Signs and sends the batch with the executor key, paying its own gas
pub struct DirectSubmitter<M> {
    client: Arc<M>,
    from: Address,
}

impl<M: Middleware + 'static> DirectSubmitter<M> {
    pub fn new(client: Arc<M>, from: Address) -> Self {
        Self { client, from }
    }

    /// Executor account address
    pub fn address(&self) -> Address {
        self.from
    }
}

impl DirectSubmitter<SignerMiddleware<Provider<Http>, LocalWallet>> {
    /// Connect to `rpc_url` with a hex encoded private key
    pub fn connect(rpc_url: &str, private_key: &str, chain_id: u64) -> anyhow::Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)?;
        let wallet = private_key
            .trim()
            .trim_start_matches("0x")
            .parse::<LocalWallet>()?
            .with_chain_id(chain_id);
        let from = wallet.address();

        Ok(Self::new(Arc::new(SignerMiddleware::new(provider, wallet)), from))
    }
}

#[async_trait]
impl<M: Middleware + 'static> Submitter for DirectSubmitter<M> {
    async fn submit(&self, to: Address, data: Bytes) -> BatchResult<H256> {
        let tx = TransactionRequest::new().from(self.from).to(to).data(data);

        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| BatchError::Submission(e.to_string()))?;

        let tx_hash = pending.tx_hash();
        debug!("Node accepted transaction {:?}", tx_hash);
        Ok(tx_hash)
    }
}
