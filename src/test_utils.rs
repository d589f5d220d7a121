//! In-memory collaborators shared by the unit tests

use crate::{
    AddressEx, CallRecord, CombinedPayload, Confirmation, ExecutionContext, MultisigExecutionInfo,
    Operation, PendingTransaction, SimulationTrace, TransactionDetails, TxData,
    dispatch::{RelayQuota, Submitter},
    encoding::exec_transaction_call,
    error::{BatchError, BatchResult},
    gateway::DetailResolver,
    simulation::Simulator,
};
use async_trait::async_trait;
use ethers::types::{Address, Bytes, H256};
use std::collections::HashMap;
use std::sync::Mutex;

pub const SAFE: u64 = 0x5afe;

pub fn context() -> ExecutionContext {
    ExecutionContext {
        chain_id: 5,
        safe_address: Address::from_low_u64_be(SAFE),
        executing_account: Address::from_low_u64_be(0xe0a),
        simulate_execution: true,
    }
}

/// Queued transaction `n` of the test Safe
pub fn details(n: u64) -> TransactionDetails {
    TransactionDetails {
        tx_id: format!("multisig_{}", n),
        safe_address: Address::from_low_u64_be(SAFE),
        tx_data: TxData {
            to: AddressEx { value: Address::from_low_u64_be(0x1000 + n) },
            value: n.to_string(),
            hex_data: Some(format!("0x{:02x}", n)),
            operation: Operation::Call,
        },
        detailed_execution_info: Some(MultisigExecutionInfo {
            nonce: n,
            safe_tx_gas: "0".to_string(),
            base_gas: "0".to_string(),
            gas_price: "0".to_string(),
            gas_token: Address::zero(),
            refund_receiver: AddressEx { value: Address::zero() },
            confirmations: vec![Confirmation {
                signer: AddressEx { value: Address::from_low_u64_be(1) },
                signature: Some(format!("0x{}", "11".repeat(65))),
            }],
        }),
    }
}

pub fn pending(ids: &[u64]) -> Vec<PendingTransaction> {
    ids.iter()
        .map(|n| PendingTransaction(format!("multisig_{}", n)))
        .collect()
}

/// Raw call data the batch carries for transaction `n`
pub fn call_data(n: u64) -> Vec<u8> {
    exec_transaction_call(&details(n))
        .ok()
        .and_then(|call| call.data_bytes())
        .unwrap_or_default()
}

pub struct MockResolver {
    known: HashMap<String, TransactionDetails>,
}

impl MockResolver {
    pub fn with(ids: &[u64]) -> Self {
        Self::from_details(ids.iter().map(|n| details(*n)).collect())
    }

    pub fn from_details(txs: Vec<TransactionDetails>) -> Self {
        let known = txs.into_iter().map(|tx| (tx.tx_id.clone(), tx)).collect();
        Self { known }
    }
}

#[async_trait]
impl DetailResolver for MockResolver {
    async fn resolve(
        &self,
        txs: &[PendingTransaction],
        _chain_id: u64,
    ) -> BatchResult<Vec<TransactionDetails>> {
        txs.iter()
            .map(|tx| {
                self.known
                    .get(tx.id())
                    .cloned()
                    .ok_or_else(|| BatchError::DetailResolution {
                        tx_id: tx.id().to_string(),
                        reason: "404 Not Found".to_string(),
                    })
            })
            .collect()
    }
}

pub struct MockSimulator {
    failing: Option<Vec<Vec<u8>>>,
    pub payloads: Mutex<Vec<CombinedPayload>>,
}

impl MockSimulator {
    /// Simulation that reports a revert for every call carrying one of `inputs`
    pub fn failing(inputs: Vec<Vec<u8>>) -> Self {
        Self {
            failing: Some(inputs),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn passing() -> Self {
        Self::failing(Vec::new())
    }

    pub fn unavailable() -> Self {
        Self {
            failing: None,
            payloads: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Simulator for MockSimulator {
    async fn simulate(
        &self,
        payload: &CombinedPayload,
        _context: &ExecutionContext,
    ) -> BatchResult<SimulationTrace> {
        self.payloads.lock().unwrap().push(payload.clone());

        let Some(failing) = &self.failing else {
            return Err(BatchError::SimulationUnavailable("connection refused".to_string()));
        };

        let mut calls = vec![CallRecord {
            success: failing.is_empty(),
            failing_input: None,
            error: None,
        }];
        calls.extend(failing.iter().map(|input| CallRecord {
            success: false,
            failing_input: Some(Bytes::from(input.clone())),
            error: Some("GS013".to_string()),
        }));
        Ok(SimulationTrace { calls })
    }
}

pub struct MockSubmitter {
    reject: Option<String>,
    pub submitted: Mutex<Vec<(Address, Bytes)>>,
}

impl MockSubmitter {
    pub fn accepting() -> Self {
        Self {
            reject: None,
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(reason: &str) -> Self {
        Self {
            reject: Some(reason.to_string()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl Submitter for MockSubmitter {
    async fn submit(&self, to: Address, data: Bytes) -> BatchResult<H256> {
        if let Some(reason) = &self.reject {
            return Err(BatchError::Submission(reason.clone()));
        }
        self.submitted.lock().unwrap().push((to, data));
        Ok(H256::from_low_u64_be(0xabc))
    }
}

pub struct MockQuota(pub Option<u32>);

#[async_trait]
impl RelayQuota for MockQuota {
    async fn remaining(&self, _chain_id: u64, _safe: Address) -> BatchResult<u32> {
        self.0
            .ok_or_else(|| BatchError::RelayUnavailable("503 Service Unavailable".to_string()))
    }
}
