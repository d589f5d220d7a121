use crate::{Call, SimulationTrace, ValidationSplit};
use tracing::{debug, warn};

/// Prefix validator
///
/// Splits an ordered call list into the longest prefix that the simulation
/// did not see failing and the remaining suffix.
#[derive(Debug, Default, Clone, Copy)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Split `calls` according to the failures reported in `trace`
    ///
    /// Failures are attributed by exact call data, not by trace position. The
    /// first call whose data matches any failing input and every call after it
    /// are invalid. A failure that matches none of the calls leaves the whole
    /// list valid.
    pub fn validate(&self, calls: Vec<Call>, trace: &SimulationTrace) -> ValidationSplit {
        let valid_len = self.valid_prefix_len(&calls, trace);
        ValidationSplit::at(calls, valid_len)
    }

    /// Length of the safely executable prefix of `calls`
    pub fn valid_prefix_len(&self, calls: &[Call], trace: &SimulationTrace) -> usize {
        let failures = trace.failures().count();
        if failures == 0 {
            return calls.len();
        }

        let failed_inputs: Vec<&[u8]> = trace
            .failures()
            .filter_map(|record| record.failing_input.as_ref().map(|input| &input[..]))
            .collect();

        let first_failing = calls.iter().position(|call| {
            call.data_bytes()
                .is_some_and(|data| failed_inputs.iter().any(|input| *input == data.as_slice()))
        });

        match first_failing {
            Some(index) => {
                debug!(
                    "Simulation reverted at call {} of {}, excluding {} calls",
                    index,
                    calls.len(),
                    calls.len() - index
                );
                index
            }
            None => {
                // Failure happened somewhere we cannot tie to one of our calls
                warn!(
                    failures,
                    calls = calls.len(),
                    "Simulation reported failures not attributable to any batched call, keeping full batch"
                );
                calls.len()
            }
        }
    }
}
