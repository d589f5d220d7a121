//! Tests for prefix validation

#[cfg(test)]
mod tests {
    use crate::{Call, CallRecord, Operation, SimulationTrace, validation::Validator};
    use ethers::types::{Address, Bytes, U256};

    fn call(n: u8) -> Call {
        Call {
            operation: Operation::Call,
            to: Address::from_low_u64_be(n as u64),
            value: U256::zero(),
            data: format!("0x{:02x}{:02x}", n, n),
        }
    }

    fn success() -> CallRecord {
        CallRecord {
            success: true,
            failing_input: None,
            error: None,
        }
    }

    fn failure(input: Vec<u8>) -> CallRecord {
        CallRecord {
            success: false,
            failing_input: Some(Bytes::from(input)),
            error: Some("execution reverted".to_string()),
        }
    }

    fn calls() -> Vec<Call> {
        vec![call(0xa), call(0xb), call(0xc), call(0xd)]
    }

    #[test]
    fn test_no_failures_keeps_everything() {
        let trace = SimulationTrace {
            calls: vec![success(), success(), success(), success()],
        };
        let split = Validator::new().validate(calls(), &trace);

        assert_eq!(split.valid, calls());
        assert!(split.invalid.is_empty());
    }

    #[test]
    fn test_first_failure_cuts_off_rest_of_batch() {
        let trace = SimulationTrace {
            calls: vec![success(), failure(vec![0xb, 0xb]), success(), success()],
        };
        let split = Validator::new().validate(calls(), &trace);

        assert_eq!(split.valid, vec![call(0xa)]);
        // C and D never failed themselves but follow the reverted call
        assert_eq!(split.invalid, vec![call(0xb), call(0xc), call(0xd)]);
    }

    #[test]
    fn test_earliest_matching_call_wins_regardless_of_trace_order() {
        // Trace lists D's failure before B's
        let trace = SimulationTrace {
            calls: vec![failure(vec![0xd, 0xd]), success(), failure(vec![0xb, 0xb])],
        };
        let split = Validator::new().validate(calls(), &trace);

        assert_eq!(split.valid, vec![call(0xa)]);
        assert_eq!(split.invalid.len(), 3);
    }

    #[test]
    fn test_failing_first_call_leaves_empty_prefix() {
        let trace = SimulationTrace {
            calls: vec![failure(vec![0xa, 0xa])],
        };
        let split = Validator::new().validate(calls(), &trace);

        assert!(split.valid.is_empty());
        assert_eq!(split.invalid, calls());
    }

    #[test]
    fn test_unattributed_failure_keeps_full_batch() {
        let trace = SimulationTrace {
            calls: vec![success(), failure(vec![0xff, 0xee, 0xdd])],
        };
        let split = Validator::new().validate(calls(), &trace);

        assert_eq!(split.valid, calls());
        assert!(split.invalid.is_empty());
    }

    #[test]
    fn test_failure_without_input_keeps_full_batch() {
        let mut record = failure(vec![]);
        record.failing_input = None;
        let trace = SimulationTrace { calls: vec![record] };

        assert_eq!(Validator::new().valid_prefix_len(&calls(), &trace), 4);
    }

    #[test]
    fn test_split_always_reconstructs_input() {
        for failing in [0xa, 0xb, 0xc, 0xd, 0xe] {
            let trace = SimulationTrace {
                calls: vec![failure(vec![failing, failing])],
            };
            let split = Validator::new().validate(calls(), &trace);

            let mut rebuilt = split.valid.clone();
            rebuilt.extend(split.invalid.clone());
            assert_eq!(rebuilt, calls());
        }
    }
}
