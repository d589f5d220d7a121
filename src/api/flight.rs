//! Single-flight guard
//!
//! At most one batch run per Safe queue may be in progress. The slot is
//! released when the guard is dropped, including when the request future is
//! cancelled.

use ethers::types::Address;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct InFlight {
    queues: Arc<Mutex<HashSet<Address>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the queue of `safe`, `None` if a run is already in flight
    pub fn try_acquire(&self, safe: Address) -> Option<FlightGuard> {
        let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        if !queues.insert(safe) {
            return None;
        }
        Some(FlightGuard {
            queues: self.queues.clone(),
            safe,
        })
    }
}

pub struct FlightGuard {
    queues: Arc<Mutex<HashSet<Address>>>,
    safe: Address,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        queues.remove(&self.safe);
    }
}
