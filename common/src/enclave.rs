use sgx_types;
use sgx_urts;

use sgx_types::*;
use sgx_urts::SgxEnclave;
use std::path::PathBuf;

use interface::*;

// error type for enclave operations
use quick_error::quick_error;
use sgx_types::sgx_status_t;

use crate::ecall_wrapper::ecall_allowed;

quick_error! {
    #[derive(Debug)]
    pub enum EnclaveError {
        SgxError(err: sgx_status_t) {
            from(sgx_status_t)
            display("SGX error: {}", err.as_str())
        }
        EnclaveLogicError(err: sgx_status_t) {
            display("enclave logic error: {}", err.as_str())
        }
        MarshallError(e: serde_cbor::Error) {
            from(e: serde_cbor::Error) -> (e)
            display("boundary marshaling error: {}", e)
        }
    }
}

pub type EnclaveResult<T> = Result<T, EnclaveError>;

/// Where the signed scheduler enclave is installed by default.
pub const DEFAULT_ENCLAVE_PATH: &str = "/slotsched/lib/enclave.signed.so";

/// The boundary calls the gateway is allowed to make. A trait so that tests
/// can stand in a fake scheduler; the real implementation crosses into SGX.
pub trait EnclaveApi {
    /// Runs one scheduling round over the caller-owned state. `prev_msg` is
    /// None exactly when `cur_state.round == 0`.
    fn scheduling_round(
        &self,
        prev_msg: Option<&SchedulingMessage>,
        cur_state: &SchedulingState,
    ) -> EnclaveResult<SchedulingRoundOutput>;

    /// Folds one user contribution into the running aggregate and returns
    /// the new aggregate.
    fn aggregate_message(
        &self,
        user_msg: &UserMessage,
        cur_agg: &AggregatedMessage,
    ) -> EnclaveResult<AggregatedMessage>;
}

#[derive(Clone, Debug)]
pub struct SchedulerEnclave {
    enclave: sgx_urts::SgxEnclave,
}

impl SchedulerEnclave {
    pub fn init(enclave_file: &str) -> EnclaveResult<Self> {
        let enclave_path = PathBuf::from(enclave_file);

        let mut launch_token: sgx_launch_token_t = [0; 1024];
        let mut launch_token_updated: i32 = 0;
        // call sgx_create_enclave to initialize an enclave instance
        // Debug Support: set 2nd parameter to 1
        let debug = 1;
        let mut misc_attr = sgx_misc_attribute_t {
            secs_attr: sgx_attributes_t { flags: 0, xfrm: 0 },
            misc_select: 0,
        };

        let enclave = SgxEnclave::create(
            enclave_path,
            debug,
            &mut launch_token,
            &mut launch_token_updated,
            &mut misc_attr,
        )
        .map_err(EnclaveError::SgxError)?;

        debug!("enclave initiated. eid={}", enclave.geteid());
        Ok(Self { enclave })
    }

    pub fn destroy(self) {
        self.enclave.destroy();
        debug!("enclave destroyed.");
    }

    pub fn geteid(&self) -> sgx_enclave_id_t {
        self.enclave.geteid()
    }
}

impl EnclaveApi for SchedulerEnclave {
    fn scheduling_round(
        &self,
        prev_msg: Option<&SchedulingMessage>,
        cur_state: &SchedulingState,
    ) -> EnclaveResult<SchedulingRoundOutput> {
        ecall_allowed::scheduling(self.enclave.geteid(), (prev_msg, cur_state))
    }

    fn aggregate_message(
        &self,
        user_msg: &UserMessage,
        cur_agg: &AggregatedMessage,
    ) -> EnclaveResult<AggregatedMessage> {
        ecall_allowed::aggregate(self.enclave.geteid(), (user_msg, cur_agg))
    }
}
