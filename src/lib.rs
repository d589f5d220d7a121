//! This crate batches the queued transactions of a multi-signature account
//! into one multi-send call. The batch is simulated first and only the
//! leading run of transactions that would not revert is submitted.

pub mod types; // Queue, call, payload, trace and outcome types.
pub mod error; // Error taxonomy of a batch run.
pub mod encoding; // Multi-send payload encoding and Safe call building.
pub mod gateway; // Resolution of queued transactions into full details.
pub mod simulation; // Client of the external simulation service.
pub mod validation; // Longest executable prefix of a simulated batch.
pub mod batch; // Assembly pipeline from queue to final payload.
pub mod dispatch; // Direct and relayed submission.
pub mod api; // JSON-RPC surface.
pub mod config; // Defines and loads service configuration.

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use batch::BatchAssembler;
