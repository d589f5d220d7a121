//! Error taxonomy of a batch run
//!
//! Only `SimulationUnavailable` is recovered from (the assembler falls back to
//! the full queue); every other variant aborts the run and is surfaced to the
//! caller with its raw message.

use thiserror::Error;

/// Malformed call data or payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("cannot encode an empty call list")]
    Empty,

    #[error("call {index} has malformed data: {reason}")]
    MalformedCallData { index: usize, reason: String },

    #[error("transaction {tx_id} has invalid field {field}: {value}")]
    InvalidField {
        tx_id: String,
        field: &'static str,
        value: String,
    },

    #[error("malformed multi-send payload at offset {offset}: {reason}")]
    MalformedPayload { offset: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("failed to resolve transaction {tx_id}: {reason}")]
    DetailResolution { tx_id: String, reason: String },

    #[error("simulation unavailable: {0}")]
    SimulationUnavailable(String),

    #[error("relay unavailable: {0}")]
    RelayUnavailable(String),

    #[error("submission failed: {0}")]
    Submission(String),

    #[error("no transactions to batch")]
    EmptyBatch,
}

pub type BatchResult<T> = Result<T, BatchError>;

/// Passes successful responses through; otherwise reads the body so the
/// service's own reason survives as `"<status>: <body>"`
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(format!("{}: {}", status, body.trim()))
}
