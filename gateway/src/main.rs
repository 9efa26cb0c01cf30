extern crate common;
extern crate interface;

mod aggregation;
mod marshal;
mod scheduling;
mod service;
mod util;

pub use crate::util::GatewayError;
use crate::{
    marshal::{AggregateRequest, SchedulingRequest},
    service::{start_service, ServiceState},
    util::{load_from_stdin, save_to_stdout},
};

use common::enclave::{SchedulerEnclave, DEFAULT_ENCLAVE_PATH};

use clap::{App, AppSettings, Arg, SubCommand};
use log::info;

fn main() -> Result<(), GatewayError> {
    dotenv::dotenv().ok();
    env_logger::init();

    let matches = App::new("Slot Scheduling Gateway")
        .version("0.1.0")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("enclave-path")
                .short("e")
                .long("enclave-path")
                .value_name("FILE")
                .takes_value(true)
                .global(true)
                .help("The signed scheduler enclave to load"),
        )
        .subcommand(
            SubCommand::with_name("schedule")
                .about("Runs one scheduling round for the wire request given on STDIN"),
        )
        .subcommand(
            SubCommand::with_name("aggregate")
                .about("Folds the STDIN contribution into its accompanying aggregate"),
        )
        .subcommand(
            SubCommand::with_name("start-service")
                .about("Starts a web service at BIND_ADDR serving both operations")
                .arg(
                    Arg::with_name("bind")
                        .short("b")
                        .long("bind")
                        .value_name("BIND_ADDR")
                        .required(true)
                        .help("The local address to bind the service to. Example: localhost:9000"),
                ),
        )
        .get_matches();

    let enclave_path = matches
        .value_of("enclave-path")
        .unwrap_or(DEFAULT_ENCLAVE_PATH);
    let enclave = SchedulerEnclave::init(enclave_path)?;

    match matches.subcommand() {
        ("schedule", _) => {
            let req: SchedulingRequest = load_from_stdin()?;
            let resp = scheduling::run_scheduling_round(&enclave, &req)?;
            save_to_stdout(&resp)?;
            enclave.destroy();
        }
        ("aggregate", _) => {
            let req: AggregateRequest = load_from_stdin()?;
            let resp = aggregation::aggregate(&enclave, &req)?;
            save_to_stdout(&resp)?;
            enclave.destroy();
        }
        ("start-service", Some(sub_matches)) => {
            let bind_addr = sub_matches.value_of("bind").unwrap().to_string();
            info!("Serving on {}", bind_addr);
            start_service(bind_addr, ServiceState { enclave })?;
        }
        _ => unreachable!("clap rejects unknown subcommands"),
    }

    Ok(())
}
