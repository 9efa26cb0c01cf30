extern crate hex;
#[macro_use]
extern crate serde;

mod ecall_interface_types;
mod footprint_sched;
mod params;
mod user_message;

pub use ecall_interface_types::*;
pub use footprint_sched::*;
pub use params::*;
pub use user_message::*;
