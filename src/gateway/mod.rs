//! Gateway Module
//!
//! Resolves queued transaction identifiers into full transaction details
//! through the transaction service gateway.

mod client;

#[cfg(test)]
mod tests;

pub use client::{DetailResolver, GatewayClient};
