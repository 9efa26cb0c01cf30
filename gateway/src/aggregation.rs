//! Folds one user contribution into a running aggregate. All-or-nothing per
//! call: on any failure the caller's aggregate is untouched and nothing is
//! returned.

use crate::{
    marshal::{
        decode_aggregate, decode_user_message, encode_aggregate, AggregateRequest,
        AggregateResponse,
    },
    util::GatewayError,
};

use common::enclave::EnclaveApi;

use log::{error, info};

pub fn aggregate<E: EnclaveApi>(
    enclave: &E,
    request: &AggregateRequest,
) -> Result<AggregateResponse, GatewayError> {
    // unmarshal
    let cur_agg = decode_aggregate(&request.current_agg)?;
    let user_msg = decode_user_message(&request.msg)?;

    let new_agg = enclave.aggregate_message(&user_msg, &cur_agg).map_err(|e| {
        error!("ecall_aggregate failed with {}", e);
        GatewayError::AggregationFailure(e.to_string())
    })?;

    info!("new agg: {}", new_agg);

    Ok(AggregateResponse {
        new_agg: encode_aggregate(&new_agg),
    })
}
