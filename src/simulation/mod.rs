//! Simulation Module
//!
//! Client side of the external simulation service. The service itself is a
//! black box; this module only builds the request and reads the call trace.

mod client;


pub use client::{Simulator, TenderlyClient};
