//! Payload Encoding Module
//!
//! - multisend: packs an ordered call list into one combined-call payload
//! - safe: turns resolved multi-sig transactions into `execTransaction` calls

mod multisend;
mod safe;


pub use multisend::{MULTI_SEND_SELECTOR, decode, encode, multi_send_call_data};
pub use safe::{build_calls, exec_transaction_call};
