//! Dispatcher Module
//!
//! Submits a finalized batch through exactly one channel: directly from the
//! executor account, or through the fee sponsoring relay. Submission resolves
//! as soon as the channel accepts the transaction; confirmation tracking is
//! left to the caller. Errors are never retried here.

use crate::{
    BatchOutcome, CombinedPayload, ExecutionContext, ExecutionMode, TransactionDetails,
    encoding::multi_send_call_data,
    error::{BatchError, BatchResult},
};
use async_trait::async_trait;
use ethers::types::{Address, Bytes, H256};
use std::sync::Arc;
use tracing::{error, info, warn};

/// A channel able to put a transaction on chain
#[async_trait]
pub trait Submitter: Send + Sync {
    /// Submit a call to `to` with `data`, returning its hash once accepted
    async fn submit(&self, to: Address, data: Bytes) -> BatchResult<H256>;
}

/// Remaining sponsored transactions of an account
#[async_trait]
pub trait RelayQuota: Send + Sync {
    async fn remaining(&self, chain_id: u64, safe: Address) -> BatchResult<u32>;
}

/// Relay channel together with its quota lookup
pub struct RelayChannel {
    pub submitter: Arc<dyn Submitter>,
    pub quota: Arc<dyn RelayQuota>,
}

pub struct Dispatcher {
    multisend: Address,
    direct: Arc<dyn Submitter>,
    relay: Option<RelayChannel>,
}

impl Dispatcher {
    /// # Arguments
    /// * `multisend` - Multi-send contract receiving the combined call
    /// * `direct` - Executor account submitter
    /// * `relay` - Sponsored relay, if available on this chain
    pub fn new(multisend: Address, direct: Arc<dyn Submitter>, relay: Option<RelayChannel>) -> Self {
        Self {
            multisend,
            direct,
            relay,
        }
    }

    pub fn multisend(&self) -> Address {
        self.multisend
    }

    /// Remaining relay quota, `None` when relaying is not possible
    pub async fn remaining_relays(&self, context: &ExecutionContext) -> Option<u32> {
        let relay = self.relay.as_ref()?;
        match relay
            .quota
            .remaining(context.chain_id, context.safe_address)
            .await
        {
            Ok(remaining) => Some(remaining),
            Err(e) => {
                warn!("Relay quota lookup failed, executing directly: {}", e);
                None
            }
        }
    }

    /// Pick the channel for one batch run
    pub async fn select_mode(&self, context: &ExecutionContext) -> ExecutionMode {
        Self::mode_for(self.remaining_relays(context).await)
    }

    /// Relay while sponsored transactions remain, otherwise execute directly
    pub fn mode_for(remaining_relays: Option<u32>) -> ExecutionMode {
        match remaining_relays {
            Some(remaining) if remaining > 0 => ExecutionMode::Relay,
            _ => ExecutionMode::Direct,
        }
    }

    /// Submit through the channel selected by `mode`
    pub async fn dispatch(
        &self,
        mode: ExecutionMode,
        valid: &[TransactionDetails],
        payload: &CombinedPayload,
    ) -> BatchOutcome {
        match mode {
            ExecutionMode::Direct => self.dispatch_direct(valid, payload).await,
            ExecutionMode::Relay => self.dispatch_relay(valid, payload).await,
        }
    }

    /// Submit from the executor account, paying its own gas
    pub async fn dispatch_direct(
        &self,
        valid: &[TransactionDetails],
        payload: &CombinedPayload,
    ) -> BatchOutcome {
        self.submit(self.direct.as_ref(), ExecutionMode::Direct, valid, payload)
            .await
    }

    /// Submit through the relay; quota must have been checked by the caller
    pub async fn dispatch_relay(
        &self,
        valid: &[TransactionDetails],
        payload: &CombinedPayload,
    ) -> BatchOutcome {
        let Some(relay) = &self.relay else {
            return BatchOutcome::Failed {
                reason: "relaying is not available".to_string(),
            };
        };
        self.submit(relay.submitter.as_ref(), ExecutionMode::Relay, valid, payload)
            .await
    }

    async fn submit(
        &self,
        submitter: &dyn Submitter,
        mode: ExecutionMode,
        valid: &[TransactionDetails],
        payload: &CombinedPayload,
    ) -> BatchOutcome {
        let data = multi_send_call_data(payload);
        match submitter.submit(self.multisend, data).await {
            Ok(tx_hash) => {
                info!(
                    "Batch of {} transactions submitted via {:?}: {:?}",
                    valid.len(),
                    mode,
                    tx_hash
                );
                BatchOutcome::Submitted { tx_hash }
            }
            Err(e) => {
                error!("Batch submission via {:?} failed: {}", mode, e);
                let reason = match e {
                    BatchError::Submission(reason) => reason,
                    other => other.to_string(),
                };
                BatchOutcome::Failed { reason }
            }
        }
    }
}
