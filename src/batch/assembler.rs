//! Batch Assembler Module
//!
//! This module implements the pipeline that turns a queue of pending
//! transactions into a payload that is safe to submit.
//!
//! # Pipeline
//! 1. Resolve the details of every queued transaction (`DetailResolver`)
//! 2. Build one `execTransaction` call per transaction, in queue order
//! 3. Encode all calls into one combined payload
//! 4. Simulate the combined payload (`Simulator`)
//! 5. Keep the longest prefix without failing calls (`Validator`)
//! 6. Re-encode only the kept calls
//!
//! Each stage awaits the previous one. Nothing is submitted here, so
//! dropping the returned future at any point has no side effect.

use crate::{
    CombinedPayload, ExecutionContext, PendingTransaction, TransactionDetails, ValidationSplit,
    encoding,
    error::{BatchError, BatchResult},
    gateway::DetailResolver,
    simulation::Simulator,
    validation::Validator,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of assembling one batch run
#[derive(Debug, Clone)]
pub struct AssembledBatch {
    /// Calls split into the executable prefix and the excluded suffix
    pub split: ValidationSplit,
    /// Details of the transactions behind `split.valid`
    pub included: Vec<TransactionDetails>,
    /// Details of the transactions behind `split.invalid`
    pub excluded: Vec<TransactionDetails>,
    /// Encoding of `split.valid`; `None` when no call can be executed
    pub final_payload: Option<CombinedPayload>,
    /// Whether the split is backed by a simulation verdict
    pub simulated: bool,
}

impl AssembledBatch {
    pub fn has_exclusions(&self) -> bool {
        !self.split.invalid.is_empty()
    }
}

/// Batch assembler
///
/// Holds the external collaborators of the pipeline; it keeps no state of
/// its own between runs.
pub struct BatchAssembler {
    resolver: Arc<dyn DetailResolver>,
    simulator: Arc<dyn Simulator>,
    validator: Validator,
}

impl BatchAssembler {
    pub fn new(resolver: Arc<dyn DetailResolver>, simulator: Arc<dyn Simulator>) -> Self {
        Self {
            resolver,
            simulator,
            validator: Validator::new(),
        }
    }

    /// Assemble a batch from the queued transactions
    ///
    /// # Errors
    /// * `EmptyBatch` if `pending` is empty
    /// * `DetailResolution` if any transaction cannot be resolved or belongs
    ///   to another Safe
    /// * `Encoding` if any resolved transaction carries malformed data
    ///
    /// An unavailable simulation is not an error: the full queue is kept.
    pub async fn assemble(
        &self,
        pending: &[PendingTransaction],
        context: &ExecutionContext,
    ) -> BatchResult<AssembledBatch> {
        if pending.is_empty() {
            return Err(BatchError::EmptyBatch);
        }

        // Step 1: resolve details, order preserved
        let mut details = self.resolver.resolve(pending, context.chain_id).await?;
        if details.len() != pending.len() {
            let missing = pending.get(details.len()).or(pending.last());
            return Err(BatchError::DetailResolution {
                tx_id: missing.map(|tx| tx.id().to_string()).unwrap_or_default(),
                reason: format!(
                    "resolved {} of {} transactions",
                    details.len(),
                    pending.len()
                ),
            });
        }

        // Only transactions of this Safe may share its batch and relay quota
        if let Some(foreign) = details
            .iter()
            .find(|tx| tx.safe_address != context.safe_address)
        {
            warn!(
                "Transaction {} belongs to Safe {:?}, not {:?}",
                foreign.tx_id, foreign.safe_address, context.safe_address
            );
            return Err(BatchError::DetailResolution {
                tx_id: foreign.tx_id.clone(),
                reason: format!(
                    "belongs to Safe {:?}, not {:?}",
                    foreign.safe_address, context.safe_address
                ),
            });
        }

        // Step 2 + 3: build and encode the full batch
        let calls = encoding::build_calls(&details)?;
        let full_payload = encoding::encode(&calls)?;
        debug!(
            "Encoded {} calls into {} bytes",
            calls.len(),
            full_payload.as_bytes().len()
        );

        // Step 4 + 5: simulate and keep the executable prefix
        let (split, simulated) = match self.simulator.simulate(&full_payload, context).await {
            Ok(trace) => (self.validator.validate(calls, &trace), true),
            Err(e) => {
                warn!(
                    safe = ?context.safe_address,
                    calls = calls.len(),
                    error = %e,
                    "Simulation unavailable, batching full queue"
                );
                (ValidationSplit::at(calls, usize::MAX), false)
            }
        };

        // Step 6: re-encode what is left
        let final_payload = if split.valid.is_empty() {
            None
        } else {
            Some(encoding::encode(&split.valid)?)
        };

        let excluded = details.split_off(split.valid.len());
        let included = details;

        info!(
            "Assembled batch for {:?}: {} included, {} excluded",
            context.safe_address,
            included.len(),
            excluded.len()
        );

        Ok(AssembledBatch {
            split,
            included,
            excluded,
            final_payload,
            simulated,
        })
    }
}
