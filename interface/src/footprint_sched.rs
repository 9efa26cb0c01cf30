use crate::params::*;

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};

/// Opaque evidence of a slot claim. The enclave fills these in; untrusted
/// code only moves them around.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint(pub Vec<u8>);

impl Footprint {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for Footprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&hex::encode(&self.0))
    }
}

/// Reservation state carried by the caller between scheduling rounds. Slot
/// identity is positional: reservation[i] and footprints[i] describe slot i,
/// and both sequences hold exactly FOOTPRINT_N_SLOTS entries whenever they
/// cross the enclave boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingState {
    pub round: u32,
    pub reservation: Vec<bool>,
    pub footprints: Vec<Footprint>,
}

impl SchedulingState {
    /// Round-0 state: nothing reserved, no footprints recorded.
    pub fn new() -> Self {
        SchedulingState {
            round: 0,
            reservation: vec![false; FOOTPRINT_N_SLOTS],
            footprints: vec![Footprint::default(); FOOTPRINT_N_SLOTS],
        }
    }
}

impl Default for SchedulingState {
    fn default() -> Self {
        SchedulingState::new()
    }
}

impl Display for SchedulingState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let reserved = self.reservation.iter().filter(|b| **b).count();
        let claimed = self.footprints.iter().filter(|fp| !fp.is_empty()).count();
        write!(
            f,
            "round={} reserved={}/{} footprints={}/{}",
            self.round,
            reserved,
            self.reservation.len(),
            claimed,
            self.footprints.len()
        )
    }
}

/// The broadcast the enclave emits for one round. There is no broadcast for
/// round 0 since no earlier round exists to have produced one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingMessage {
    pub footprints: Vec<Footprint>,
}

impl SchedulingMessage {
    pub fn is_empty(&self) -> bool {
        self.footprints.iter().all(Footprint::is_empty)
    }
}

impl Display for SchedulingMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let claimed = self.footprints.iter().filter(|fp| !fp.is_empty()).count();
        write!(f, "footprints={}/{}", claimed, self.footprints.len())
    }
}
