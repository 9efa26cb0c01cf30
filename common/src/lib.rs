extern crate interface;
extern crate quick_error;
extern crate serde;
extern crate serde_cbor;
extern crate sgx_types;
extern crate sgx_urts;

pub mod cli_util;
pub mod enclave;

mod ecall_wrapper;

pub use enclave::{EnclaveApi, EnclaveError, EnclaveResult, SchedulerEnclave};

#[macro_use]
extern crate log;
