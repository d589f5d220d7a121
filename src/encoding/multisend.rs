//! Multi-send packing
//!
//! Every call is packed as
//! `operation (1) ‖ to (20) ‖ value (32) ‖ data length (32) ‖ data`
//! and the packed calls are concatenated in order. The result is the single
//! `bytes` argument of `multiSend(bytes)`.

use crate::{Call, CombinedPayload, Operation, error::EncodingError};
use ethers::abi::{Token, encode as abi_encode};
use ethers::types::{Address, Bytes, U256};
use ethers::utils::hex;

/// Selector of `multiSend(bytes)`
pub const MULTI_SEND_SELECTOR: [u8; 4] = [0x8d, 0x80, 0xff, 0x0a];

const HEADER_LEN: usize = 1 + 20 + 32 + 32;

/// Pack an ordered call list into one combined payload
///
/// Deterministic: the same sequence always yields the same bytes. Fails when
/// the list is empty or when any call carries malformed hex data.
pub fn encode(calls: &[Call]) -> Result<CombinedPayload, EncodingError> {
    if calls.is_empty() {
        return Err(EncodingError::Empty);
    }

    let mut packed = Vec::new();
    for (index, call) in calls.iter().enumerate() {
        let data = decode_hex(&call.data)
            .map_err(|reason| EncodingError::MalformedCallData { index, reason })?;

        packed.push(u8::from(call.operation));
        packed.extend_from_slice(call.to.as_bytes());
        packed.extend_from_slice(&word(call.value));
        packed.extend_from_slice(&word(U256::from(data.len())));
        packed.extend_from_slice(&data);
    }

    Ok(CombinedPayload(Bytes::from(packed)))
}

/// Unpack a combined payload back into its calls
pub fn decode(payload: &CombinedPayload) -> Result<Vec<Call>, EncodingError> {
    let bytes = payload.as_bytes();
    let mut calls = Vec::new();
    let mut offset = 0;

    while offset < bytes.len() {
        let remaining = bytes.len() - offset;
        if remaining < HEADER_LEN {
            return Err(EncodingError::MalformedPayload {
                offset,
                reason: format!("truncated header ({} bytes left)", remaining),
            });
        }

        let operation = Operation::try_from(bytes[offset])
            .map_err(|reason| EncodingError::MalformedPayload { offset, reason })?;
        let to = Address::from_slice(&bytes[offset + 1..offset + 21]);
        let value = U256::from_big_endian(&bytes[offset + 21..offset + 53]);
        let data_len = U256::from_big_endian(&bytes[offset + 53..offset + HEADER_LEN]);

        let body = remaining - HEADER_LEN;
        if data_len > U256::from(body) {
            return Err(EncodingError::MalformedPayload {
                offset,
                reason: format!("data length {} exceeds remaining {} bytes", data_len, body),
            });
        }
        let data_len = data_len.as_usize();
        let start = offset + HEADER_LEN;
        let data = &bytes[start..start + data_len];

        calls.push(Call {
            operation,
            to,
            value,
            data: format!("0x{}", hex::encode(data)),
        });
        offset = start + data_len;
    }

    Ok(calls)
}

/// Calldata invoking `multiSend(payload)` on the multi-send contract
pub fn multi_send_call_data(payload: &CombinedPayload) -> Bytes {
    let mut data = MULTI_SEND_SELECTOR.to_vec();
    data.extend(abi_encode(&[Token::Bytes(payload.as_bytes().to_vec())]));
    Bytes::from(data)
}

pub(crate) fn decode_hex(data: &str) -> Result<Vec<u8>, String> {
    let stripped = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(stripped).map_err(|e| e.to_string())
}

fn word(value: U256) -> [u8; 32] {
    let mut out = [0u8; 32];
    value.to_big_endian(&mut out);
    out
}
