//! Dispatch Module
//!
//! This module submits finalized batches:
//! - Dispatcher: selects the channel once per run and submits through it
//! - DirectSubmitter: signs and sends from the executor account
//! - RelayClient: fee sponsored relay and its quota lookup

mod direct;
mod dispatcher;
mod relay;


pub use direct::DirectSubmitter;
pub use dispatcher::{Dispatcher, RelayChannel, RelayQuota, Submitter};
pub use relay::RelayClient;
