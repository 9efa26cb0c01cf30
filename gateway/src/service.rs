use crate::{
    aggregation,
    marshal::{AggregateRequest, SchedulingRequest},
    scheduling,
    util::GatewayError,
};

use common::{cli_util, enclave::SchedulerEnclave};

use std::sync::{Arc, Mutex};

use actix_web::{post, rt as actix_rt, web, App, HttpResponse, HttpServer, ResponseError};
use log::info;
use thiserror::Error;

#[derive(Debug, Error)]
enum ApiError {
    #[error("internal error")]
    Internal(#[from] GatewayError),
    #[error("base64 encoding error")]
    Encoding(#[from] base64::DecodeError),
    #[error("error in serialization/deserialization")]
    Ser(#[from] cli_util::SerializationError),
}
impl ResponseError for ApiError {}

pub(crate) struct ServiceState {
    pub(crate) enclave: SchedulerEnclave,
}

/// Runs one scheduling round over the submitted state
#[post("/schedule")]
async fn schedule(
    (payload, state): (String, web::Data<Arc<Mutex<ServiceState>>>),
) -> Result<HttpResponse, ApiError> {
    // Strip whitespace from the payload
    let payload = payload.split_whitespace().next().unwrap_or("");
    // Parse the round request
    let req: SchedulingRequest = cli_util::load(&mut payload.as_bytes())?;

    // The enclave handle is a serialization point: one ecall in flight at a
    // time
    let handle = state.get_ref().lock().unwrap();
    let resp = scheduling::run_scheduling_round(&handle.enclave, &req)?;

    let mut body = Vec::new();
    cli_util::save(&mut body, &resp)?;
    Ok(HttpResponse::Ok().body(body))
}

/// Folds the submitted contribution into the submitted aggregate
#[post("/aggregate")]
async fn aggregate(
    (payload, state): (String, web::Data<Arc<Mutex<ServiceState>>>),
) -> Result<HttpResponse, ApiError> {
    // Strip whitespace from the payload
    let payload = payload.split_whitespace().next().unwrap_or("");
    // Parse the aggregation request
    let req: AggregateRequest = cli_util::load(&mut payload.as_bytes())?;

    let handle = state.get_ref().lock().unwrap();
    let resp = aggregation::aggregate(&handle.enclave, &req)?;

    let mut body = Vec::new();
    cli_util::save(&mut body, &resp)?;
    Ok(HttpResponse::Ok().body(body))
}

#[actix_rt::main]
pub(crate) async fn start_service(bind_addr: String, state: ServiceState) -> std::io::Result<()> {
    let state = Arc::new(Mutex::new(state));

    info!("Starting gateway on {}", bind_addr);

    // Start the web server
    HttpServer::new(move || {
        App::new().data(state.clone()).configure(|cfg| {
            cfg.service(schedule);
            cfg.service(aggregate);
        })
    })
    .workers(1)
    .bind(bind_addr)
    .expect("could not bind")
    .run()
    .await
}
