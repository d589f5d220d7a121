//! Simulation Client
//!
//! Sends the combined call to an external simulation service (Tenderly
//! compatible API) and converts its call trace into a [`SimulationTrace`].
//! Transport and decoding problems are reported as
//! [`BatchError::SimulationUnavailable`], never as failing calls.

use crate::{
    CallRecord, CombinedPayload, ExecutionContext, SimulationTrace,
    config::SimulationConfig,
    encoding::multi_send_call_data,
    error::{BatchError, BatchResult, check_status},
};
use async_trait::async_trait;
use ethers::types::{Address, Bytes};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Dry-runs a combined payload against current chain state
#[async_trait]
pub trait Simulator: Send + Sync {
    async fn simulate(
        &self,
        payload: &CombinedPayload,
        context: &ExecutionContext,
    ) -> BatchResult<SimulationTrace>;
}

#[derive(Debug, Serialize)]
struct SimulationRequest {
    network_id: String,
    from: Address,
    to: Address,
    input: Bytes,
    gas: u64,
    gas_price: String,
    value: String,
    save: bool,
    save_if_fails: bool,
    simulation_type: &'static str,
    estimate_gas: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SimulationResponse {
    transaction: SimulatedTransaction,
}

#[derive(Debug, Deserialize)]
struct SimulatedTransaction {
    #[serde(default)]
    call_trace: Vec<TraceEntry>,
}

#[derive(Debug, Deserialize)]
struct TraceEntry {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    input: Option<Bytes>,
}

impl From<SimulationResponse> for SimulationTrace {
    fn from(response: SimulationResponse) -> Self {
        let calls = response
            .transaction
            .call_trace
            .into_iter()
            .map(|entry| {
                // An empty error string is not a revert
                let error = entry.error.filter(|e| !e.is_empty());
                CallRecord {
                    success: error.is_none(),
                    failing_input: error.as_ref().and(entry.input),
                    error,
                }
            })
            .collect();
        SimulationTrace { calls }
    }
}

/// HTTP client for a Tenderly style simulation endpoint
pub struct TenderlyClient {
    http: Client,
    url: String,
    access_key: Option<String>,
    gas_limit: u64,
    multisend: Address,
}

impl TenderlyClient {
    /// # Arguments
    /// * `config` - Simulation endpoint settings
    /// * `multisend` - Multi-send contract the combined call is sent to
    pub fn new(config: &SimulationConfig, multisend: Address) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            url: config.url.clone(),
            access_key: config.access_key.clone(),
            gas_limit: config.gas_limit,
            multisend,
        })
    }
}

#[async_trait]
impl Simulator for TenderlyClient {
    async fn simulate(
        &self,
        payload: &CombinedPayload,
        context: &ExecutionContext,
    ) -> BatchResult<SimulationTrace> {
        let request = SimulationRequest {
            network_id: context.chain_id.to_string(),
            from: context.executing_account,
            to: self.multisend,
            input: multi_send_call_data(payload),
            gas: self.gas_limit,
            gas_price: "0".to_string(),
            value: "0".to_string(),
            save: true,
            save_if_fails: true,
            simulation_type: "full",
            estimate_gas: !context.simulate_execution,
        };

        let mut req = self.http.post(&self.url).json(&request);
        if let Some(key) = &self.access_key {
            req = req.header("X-Access-Key", key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| BatchError::SimulationUnavailable(e.to_string()))?;
        let response = check_status(response)
            .await
            .map_err(BatchError::SimulationUnavailable)?;

        let body: SimulationResponse = response
            .json()
            .await
            .map_err(|e| BatchError::SimulationUnavailable(format!("invalid response: {}", e)))?;

        let trace = SimulationTrace::from(body);
        debug!(
            "Simulation of {} byte payload returned {} trace entries ({} failing)",
            payload.as_bytes().len(),
            trace.calls.len(),
            trace.failures().count()
        );
        Ok(trace)
    }
}
