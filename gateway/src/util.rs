use common::{cli_util, enclave::EnclaveError};

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) type Result<T> = core::result::Result<T, GatewayError>;

/// Caller-visible failure taxonomy of the two gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The wire payload does not have FOOTPRINT_N_SLOTS entries where it
    /// must. Detected before any ecall; never retried.
    #[error("wire payload shape mismatch: {0}")]
    ShapeMismatch(String),
    /// The boundary call itself could not complete. Retry is the caller's
    /// choice.
    #[error("trusted scheduler unavailable: {0}")]
    EngineUnavailable(String),
    /// The enclave ran and rejected the round with this status code.
    #[error("scheduling failed with engine status {0}")]
    SchedulingFailure(u32),
    /// The enclave or the marshaling layer rejected the aggregation step.
    /// The caller's aggregate is untouched.
    #[error("aggregation failed: {0}")]
    AggregationFailure(String),
    #[error("error from enclave")]
    Enclave(#[from] EnclaveError),
    #[error("error from IO")]
    Io(#[from] io::Error),
    #[error("error in serialization/deserialization")]
    Ser(#[from] cli_util::SerializationError),
}

pub(crate) fn load_from_stdin<D: for<'a> Deserialize<'a>>() -> Result<D> {
    let stdin = std::io::stdin();
    Ok(cli_util::load(stdin)?)
}

pub(crate) fn save_to_stdout<S: Serialize>(val: &S) -> Result<()> {
    let stdout = std::io::stdout();
    cli_util::save(stdout, val)?;
    println!("");
    Ok(())
}
