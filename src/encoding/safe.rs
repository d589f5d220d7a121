//! Safe `execTransaction` call building
//!
//! Each queued multi-sig transaction becomes one call from the executor to
//! the Safe itself, carrying the owners' collected signatures.

use super::multisend::decode_hex;
use crate::{
    Call, MultisigExecutionInfo, Operation, TransactionDetails,
    error::{BatchError, BatchResult, EncodingError},
};
use ethers::abi::{Token, encode as abi_encode};
use ethers::types::U256;
use ethers::utils::{hex, id};
use tracing::debug;

const EXEC_TRANSACTION: &str =
    "execTransaction(address,uint256,bytes,uint8,uint256,uint256,uint256,address,address,bytes)";

/// Build the calls of a batch, one per transaction and in queue order
pub fn build_calls(details: &[TransactionDetails]) -> BatchResult<Vec<Call>> {
    details.iter().map(exec_transaction_call).collect()
}

/// Build the `execTransaction` call executing one queued transaction
pub fn exec_transaction_call(tx: &TransactionDetails) -> BatchResult<Call> {
    let info = tx
        .detailed_execution_info
        .as_ref()
        .ok_or_else(|| BatchError::DetailResolution {
            tx_id: tx.tx_id.clone(),
            reason: "missing multi-sig execution info".to_string(),
        })?;

    let inner_data = match &tx.tx_data.hex_data {
        Some(data) => decode_hex(data).map_err(|_| invalid(tx, "hexData", data))?,
        None => Vec::new(),
    };

    let args = [
        Token::Address(tx.tx_data.to.value),
        Token::Uint(parse_u256(tx, "value", &tx.tx_data.value)?),
        Token::Bytes(inner_data),
        Token::Uint(U256::from(u8::from(tx.tx_data.operation))),
        Token::Uint(parse_u256(tx, "safeTxGas", &info.safe_tx_gas)?),
        Token::Uint(parse_u256(tx, "baseGas", &info.base_gas)?),
        Token::Uint(parse_u256(tx, "gasPrice", &info.gas_price)?),
        Token::Address(info.gas_token),
        Token::Address(info.refund_receiver.value),
        Token::Bytes(signatures(tx, info)?),
    ];

    let mut data = id(EXEC_TRANSACTION).to_vec();
    data.extend(abi_encode(&args));

    debug!(
        "Built execTransaction for {} (nonce {}, {} confirmations)",
        tx.tx_id,
        info.nonce,
        info.confirmations.len()
    );

    Ok(Call {
        operation: Operation::Call,
        to: tx.safe_address,
        value: U256::zero(),
        data: format!("0x{}", hex::encode(data)),
    })
}

/// Owner signatures concatenated in ascending signer order
fn signatures(tx: &TransactionDetails, info: &MultisigExecutionInfo) -> BatchResult<Vec<u8>> {
    let mut confirmations: Vec<_> = info
        .confirmations
        .iter()
        .filter_map(|c| c.signature.as_ref().map(|sig| (c.signer.value, sig)))
        .collect();
    confirmations.sort_by_key(|(signer, _)| *signer);

    let mut out = Vec::new();
    for (_, sig) in confirmations {
        out.extend(decode_hex(sig).map_err(|_| invalid(tx, "signature", sig))?);
    }
    Ok(out)
}

fn parse_u256(tx: &TransactionDetails, field: &'static str, value: &str) -> BatchResult<U256> {
    U256::from_dec_str(value).map_err(|_| invalid(tx, field, value))
}

fn invalid(tx: &TransactionDetails, field: &'static str, value: &str) -> BatchError {
    EncodingError::InvalidField {
        tx_id: tx.tx_id.clone(),
        field,
        value: value.to_string(),
    }
    .into()
}
