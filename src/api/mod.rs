//! API Module
//!
//! This module handles the JSON-RPC API used to review and execute batches
//! of queued multi-sig transactions.

mod flight;
mod server;


pub use flight::{FlightGuard, InFlight};
pub use server::{AppState, Server, router};
