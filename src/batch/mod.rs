//! Batch Assembly Module
//!
//! This module turns a queue of pending multi-sig transactions into a
//! validated combined-call payload:
//! - BatchAssembler: resolve, encode, simulate, validate, re-encode

mod assembler;


pub use assembler::{AssembledBatch, BatchAssembler};
