//! Batch Validation Module
//!
//! This module decides which part of a batch is safe to execute, based on a
//! simulation of the full batch. Only a leading run of calls is ever kept.

mod validator;

#[cfg(test)]
mod tests;

pub use validator::Validator;
