//! Drives one round of the slot-reservation protocol: decode, one ecall,
//! interpret the status word, encode. The caller owns the state between
//! rounds; nothing is retained here.

use crate::{
    marshal::{decode_state, encode_broadcast, encode_state, SchedulingRequest, SchedulingResponse},
    util::GatewayError,
};

use common::enclave::{EnclaveApi, EnclaveError};
use interface::{SchedulingMessage, SCHEDULE_CONTINUE, SCHEDULE_DONE};

use log::{error, info};

pub fn run_scheduling_round<E: EnclaveApi>(
    enclave: &E,
    request: &SchedulingRequest,
) -> Result<SchedulingResponse, GatewayError> {
    // build state
    let cur_state = decode_state(&request.cur_state)?;

    info!("state={}", cur_state);

    // prev_msg is not set for the first round
    let prev_msg = if cur_state.round > 0 {
        Some(SchedulingMessage {
            footprints: cur_state.footprints.clone(),
        })
    } else {
        None
    };

    let output = enclave
        .scheduling_round(prev_msg.as_ref(), &cur_state)
        .map_err(scheduling_call_failure)?;

    match output.status {
        SCHEDULE_CONTINUE | SCHEDULE_DONE => {
            info!(
                "{}, next round: {}",
                if output.status == SCHEDULE_CONTINUE {
                    "continue"
                } else {
                    "done"
                },
                output.state.round
            );
            info!("new state: {}", output.state);
            info!("new message: {}", output.message);

            Ok(SchedulingResponse {
                new_state: encode_state(&output.state),
                message_to_broadcast: encode_broadcast(&output.message)?,
                is_final: output.status == SCHEDULE_DONE,
            })
        }
        code => {
            error!("sched failed {}", code);
            Err(GatewayError::SchedulingFailure(code))
        }
    }
}

/// The round is abandoned whole: a failed transport surfaces as
/// EngineUnavailable, a status the enclave raised itself keeps its code.
fn scheduling_call_failure(e: EnclaveError) -> GatewayError {
    match e {
        EnclaveError::EnclaveLogicError(code) => GatewayError::SchedulingFailure(code as u32),
        other => GatewayError::EngineUnavailable(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::marshal::SchedulingStateWire;
    use common::enclave::EnclaveResult;
    use interface::{
        AggregatedMessage, Footprint, SchedulingRoundOutput, SchedulingState, UserMessage,
        FOOTPRINT_N_SLOTS,
    };

    use sgx_types::sgx_status_t;
    use std::cell::{Cell, RefCell};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// A scheduler that reserves slot 0, stamps every slot's footprint, and
    /// reports the configured status. Records what crossed the boundary.
    struct FakeScheduler {
        status: u32,
        transport_broken: bool,
        calls: Cell<u32>,
        last_prev_msg: RefCell<Option<Option<SchedulingMessage>>>,
    }

    impl FakeScheduler {
        fn with_status(status: u32) -> Self {
            FakeScheduler {
                status,
                transport_broken: false,
                calls: Cell::new(0),
                last_prev_msg: RefCell::new(None),
            }
        }

        fn broken() -> Self {
            FakeScheduler {
                status: SCHEDULE_CONTINUE,
                transport_broken: true,
                calls: Cell::new(0),
                last_prev_msg: RefCell::new(None),
            }
        }
    }

    impl EnclaveApi for FakeScheduler {
        fn scheduling_round(
            &self,
            prev_msg: Option<&SchedulingMessage>,
            cur_state: &SchedulingState,
        ) -> EnclaveResult<SchedulingRoundOutput> {
            self.calls.set(self.calls.get() + 1);
            *self.last_prev_msg.borrow_mut() = Some(prev_msg.cloned());

            if self.transport_broken {
                return Err(EnclaveError::SgxError(sgx_status_t::SGX_ERROR_UNEXPECTED));
            }

            let mut state = cur_state.clone();
            state.round += 1;
            state.reservation[0] = true;
            for (i, fp) in state.footprints.iter_mut().enumerate() {
                fp.0 = vec![state.round as u8, i as u8];
            }

            Ok(SchedulingRoundOutput {
                status: self.status,
                message: SchedulingMessage {
                    footprints: state.footprints.clone(),
                },
                state,
            })
        }

        fn aggregate_message(
            &self,
            _user_msg: &UserMessage,
            _cur_agg: &AggregatedMessage,
        ) -> EnclaveResult<AggregatedMessage> {
            unreachable!("scheduling tests never aggregate")
        }
    }

    fn round_zero_request() -> SchedulingRequest {
        SchedulingRequest {
            cur_state: SchedulingStateWire {
                round: 0,
                reservation_map: vec![false; FOOTPRINT_N_SLOTS],
                footprints: vec![Vec::new(); FOOTPRINT_N_SLOTS],
            },
        }
    }

    fn later_round_request(round: u32) -> SchedulingRequest {
        SchedulingRequest {
            cur_state: SchedulingStateWire {
                round,
                reservation_map: vec![true; FOOTPRINT_N_SLOTS],
                footprints: (0..FOOTPRINT_N_SLOTS).map(|i| vec![i as u8]).collect(),
            },
        }
    }

    #[test]
    fn first_round_continues() {
        init_logger();

        let enclave = FakeScheduler::with_status(SCHEDULE_CONTINUE);
        let resp = run_scheduling_round(&enclave, &round_zero_request()).unwrap();

        assert!(!resp.is_final);
        assert_eq!(resp.new_state.round, 1);
        assert!(!resp.message_to_broadcast.is_empty());
    }

    #[test]
    fn round_zero_never_sends_a_previous_broadcast() {
        // Even with fully populated footprints, round 0 has no prior
        // broadcast to re-submit.
        let mut req = round_zero_request();
        req.cur_state.footprints = (0..FOOTPRINT_N_SLOTS).map(|i| vec![i as u8, 0xaa]).collect();

        let enclave = FakeScheduler::with_status(SCHEDULE_CONTINUE);
        run_scheduling_round(&enclave, &req).unwrap();

        assert_eq!(*enclave.last_prev_msg.borrow(), Some(None));
    }

    #[test]
    fn later_rounds_resubmit_the_footprints_as_broadcast() {
        let req = later_round_request(3);
        let enclave = FakeScheduler::with_status(SCHEDULE_CONTINUE);
        run_scheduling_round(&enclave, &req).unwrap();

        let expected = SchedulingMessage {
            footprints: (0..FOOTPRINT_N_SLOTS)
                .map(|i| Footprint(vec![i as u8]))
                .collect(),
        };
        assert_eq!(*enclave.last_prev_msg.borrow(), Some(Some(expected)));
    }

    #[test]
    fn terminal_round_is_final() {
        let enclave = FakeScheduler::with_status(SCHEDULE_DONE);
        let resp = run_scheduling_round(&enclave, &later_round_request(7)).unwrap();

        assert!(resp.is_final);
        assert_eq!(resp.new_state.round, 8);
    }

    #[test]
    fn unknown_status_fails_the_round() {
        let enclave = FakeScheduler::with_status(42);
        let res = run_scheduling_round(&enclave, &later_round_request(1));

        assert!(matches!(res, Err(GatewayError::SchedulingFailure(42))));
    }

    #[test]
    fn broken_transport_is_engine_unavailable() {
        let enclave = FakeScheduler::broken();
        let res = run_scheduling_round(&enclave, &round_zero_request());

        assert!(matches!(res, Err(GatewayError::EngineUnavailable(_))));
    }

    #[test]
    fn shape_mismatch_never_reaches_the_enclave() {
        let mut req = round_zero_request();
        req.cur_state.reservation_map.truncate(3);

        let enclave = FakeScheduler::with_status(SCHEDULE_CONTINUE);
        let res = run_scheduling_round(&enclave, &req);

        assert!(matches!(res, Err(GatewayError::ShapeMismatch(_))));
        assert_eq!(enclave.calls.get(), 0);
    }
}
