//! API Server Module
//!
//! This module implements a JSON-RPC server in front of the batch pipeline.
//! It exposes two methods:
//! - `batch_review`: assemble a batch and report included/excluded transactions
//! - `batch_execute`: assemble a batch and submit it through one channel

use super::flight::InFlight;
use crate::{
    BatchOutcome, ExecutionContext, ExecutionMode, PendingTransaction, TransactionDetails,
    batch::{AssembledBatch, BatchAssembler},
    config::ApiConfig,
    dispatch::Dispatcher,
    error::BatchError,
};
use axum::{Json, Router, extract::State, routing::post};
use ethers::types::{Address, Bytes};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state that is accessible across all request handlers
///
/// - `assembler`: builds and validates batches
/// - `dispatcher`: submits finalized batches
/// - `context`: Safe and executor the batches are built for
/// - `in_flight`: single-flight guard per Safe queue
#[derive(Clone)]
pub struct AppState {
    pub assembler: Arc<BatchAssembler>,
    pub dispatcher: Arc<Dispatcher>,
    pub context: ExecutionContext,
    pub in_flight: InFlight,
}

/// The main API server struct
pub struct Server {
    config: ApiConfig,
    state: AppState,
}

impl Server {
    pub fn new(config: ApiConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Starts the API server and begins listening for incoming requests
    ///
    /// # Returns
    /// `Ok(())` if the server starts successfully, or an error if binding fails
    pub async fn start(self) -> anyhow::Result<()> {
        let app = router(self.state);

        let addr = format!("{}:{}", self.config.host, self.config.port);
        info!("API server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Router with the single JSON-RPC endpoint at "/"
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handle_rpc))
        .with_state(state)
}

/// JSON-RPC 2.0 request structure
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Value,
    id: Value,
}

/// JSON-RPC 2.0 response structure
///
/// Either `result` or `error` will be populated, but not both.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
    id: Value,
}

/// JSON-RPC error object
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;
const SERVER_ERROR: i32 = -32000;

impl JsonRpcResponse {
    fn result<T: Serialize>(id: Value, result: &T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self {
                jsonrpc: "2.0".to_string(),
                result: Some(value),
                error: None,
                id,
            },
            Err(e) => Self::error(id, INTERNAL_ERROR, e.to_string()),
        }
    }

    fn error(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError { code, message }),
            id,
        }
    }
}

/// Parameters shared by both methods
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchParams {
    tx_ids: Vec<PendingTransaction>,
}

/// Outcome of `batch_review`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchReview {
    included: Vec<String>,
    excluded: Vec<String>,
    multi_send: Address,
    /// Packed multi-send transactions of the included calls
    data: Option<Bytes>,
    mode: ExecutionMode,
    remaining_relays: Option<u32>,
    simulated: bool,
    timestamp: i64,
}

/// Outcome of `batch_execute`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchExecution {
    #[serde(flatten)]
    outcome: BatchOutcome,
    mode: Option<ExecutionMode>,
    included: Vec<String>,
    excluded: Vec<String>,
    timestamp: i64,
}

fn tx_ids(batch: &AssembledBatch) -> (Vec<String>, Vec<String>) {
    let ids = |txs: &[TransactionDetails]| -> Vec<String> {
        txs.iter().map(|tx| tx.tx_id.clone()).collect()
    };
    (ids(&batch.included), ids(&batch.excluded))
}

/// Main RPC request handler
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    info!("Received RPC request: {}", request.method);

    // Route on the method name; both methods share the same params
    let params: BatchParams = match request.method.as_str() {
        "batch_review" | "batch_execute" => match serde_json::from_value(request.params.clone()) {
            Ok(params) => params,
            Err(e) => {
                return Json(JsonRpcResponse::error(
                    request.id,
                    INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                ));
            }
        },
        _ => {
            return Json(JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                "Method not found".to_string(),
            ));
        }
    };

    // Only one run per Safe queue at a time. The guard is held until the
    // response is built and released even if the request is dropped.
    let Some(_guard) = state.in_flight.try_acquire(state.context.safe_address) else {
        warn!("Rejected {}: batch already in flight", request.method);
        return Json(JsonRpcResponse::error(
            request.id,
            SERVER_ERROR,
            "batch already in flight".to_string(),
        ));
    };

    // Dispatch to the appropriate handler
    let response = if request.method == "batch_review" {
        handle_review(&state, &params)
            .await
            .map(|review| JsonRpcResponse::result(request.id.clone(), &review))
    } else {
        handle_execute(&state, &params)
            .await
            .map(|execution| JsonRpcResponse::result(request.id.clone(), &execution))
    };

    // Pipeline errors are reported with their raw message
    Json(response.unwrap_or_else(|e| {
        warn!("{} failed: {}", request.method, e);
        JsonRpcResponse::error(request.id, SERVER_ERROR, e.to_string())
    }))
}

/// Handles the "batch_review" RPC method
async fn handle_review(state: &AppState, params: &BatchParams) -> Result<BatchReview, BatchError> {
    let batch = state
        .assembler
        .assemble(&params.tx_ids, &state.context)
        .await?;
    // Report the channel an execution would use right now
    let remaining_relays = state.dispatcher.remaining_relays(&state.context).await;
    let mode = Dispatcher::mode_for(remaining_relays);

    let (included, excluded) = tx_ids(&batch);
    Ok(BatchReview {
        included,
        excluded,
        multi_send: state.dispatcher.multisend(),
        data: batch.final_payload.map(|payload| payload.0),
        mode,
        remaining_relays,
        simulated: batch.simulated,
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// Handles the "batch_execute" RPC method
///
/// The channel is selected once, before submission, and used exactly once.
async fn handle_execute(
    state: &AppState,
    params: &BatchParams,
) -> Result<BatchExecution, BatchError> {
    let batch = state
        .assembler
        .assemble(&params.tx_ids, &state.context)
        .await?;
    let (included, excluded) = tx_ids(&batch);

    // Nothing executable: report the exclusions without submitting
    let Some(payload) = &batch.final_payload else {
        return Ok(BatchExecution {
            outcome: BatchOutcome::Failed {
                reason: "no executable transactions".to_string(),
            },
            mode: None,
            included,
            excluded,
            timestamp: chrono::Utc::now().timestamp(),
        });
    };

    // Select the channel once and submit through it exactly once
    let mode = state.dispatcher.select_mode(&state.context).await;
    let outcome = state
        .dispatcher
        .dispatch(mode, &batch.included, payload)
        .await;

    Ok(BatchExecution {
        outcome,
        mode: Some(mode),
        included,
        excluded,
        timestamp: chrono::Utc::now().timestamp(),
    })
}
