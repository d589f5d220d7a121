use ethers::types::{Address, Bytes, H256, U256};
use serde::{Deserialize, Serialize};

/// Reference to one queued multi-sig transaction, as known by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingTransaction(pub String);

impl PendingTransaction {
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Address wrapper used by the gateway (`{ "value": "0x..." }`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressEx {
    pub value: Address,
}

/// Inner call the Safe will perform once the transaction is executed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxData {
    pub to: AddressEx,
    /// Decimal wei amount
    #[serde(default = "zero_string")]
    pub value: String,
    pub hex_data: Option<String>,
    pub operation: Operation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub signer: AddressEx,
    pub signature: Option<String>,
}

/// Multi-sig execution parameters of a queued transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultisigExecutionInfo {
    pub nonce: u64,
    #[serde(default = "zero_string")]
    pub safe_tx_gas: String,
    #[serde(default = "zero_string")]
    pub base_gas: String,
    #[serde(default = "zero_string")]
    pub gas_price: String,
    pub gas_token: Address,
    pub refund_receiver: AddressEx,
    #[serde(default)]
    pub confirmations: Vec<Confirmation>,
}

/// Fully resolved transaction detail returned by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    pub tx_id: String,
    pub safe_address: Address,
    pub tx_data: TxData,
    pub detailed_execution_info: Option<MultisigExecutionInfo>,
}

fn zero_string() -> String {
    "0".to_string()
}

/// Execution semantics of a call inside a combined call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Operation {
    Call,
    DelegateCall,
}

impl From<Operation> for u8 {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Call => 0,
            Operation::DelegateCall => 1,
        }
    }
}

impl TryFrom<u8> for Operation {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Operation::Call),
            1 => Ok(Operation::DelegateCall),
            other => Err(format!("unknown operation {}", other)),
        }
    }
}

/// A single on-chain invocation that becomes one entry of the combined call
///
/// `data` is kept as the hex string it was produced as; it is only decoded
/// when the combined payload is encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub operation: Operation,
    pub to: Address,
    pub value: U256,
    pub data: String,
}

impl Call {
    /// Decoded call data, `None` when the hex is malformed
    pub fn data_bytes(&self) -> Option<Vec<u8>> {
        let hex = self.data.strip_prefix("0x").unwrap_or(&self.data);
        ethers::utils::hex::decode(hex).ok()
    }
}

/// Packed multi-send transactions for an ordered list of calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombinedPayload(pub Bytes);

impl CombinedPayload {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

/// Context of the account executing (or simulating) a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    pub chain_id: u64,
    pub safe_address: Address,
    pub executing_account: Address,
    /// Model real execution instead of a mere gas estimation
    pub simulate_execution: bool,
}

/// Per inner call record of a simulation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallRecord {
    pub success: bool,
    pub failing_input: Option<Bytes>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimulationTrace {
    pub calls: Vec<CallRecord>,
}

impl SimulationTrace {
    pub fn failures(&self) -> impl Iterator<Item = &CallRecord> {
        self.calls.iter().filter(|record| !record.success)
    }
}

/// Contiguous split of a call list; `valid ++ invalid` is always the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationSplit {
    pub valid: Vec<Call>,
    pub invalid: Vec<Call>,
}

impl ValidationSplit {
    /// Split `calls` so that the first `valid_len` entries are valid
    pub fn at(mut calls: Vec<Call>, valid_len: usize) -> Self {
        let invalid = calls.split_off(valid_len.min(calls.len()));
        Self { valid: calls, invalid }
    }
}

/// Channel a batch is submitted through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Direct,
    Relay,
}

/// Terminal result of a dispatch attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchOutcome {
    Submitted {
        #[serde(rename = "txHash")]
        tx_hash: H256,
    },
    Failed {
        reason: String,
    },
}
