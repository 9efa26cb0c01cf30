//! Conversions between the wire payloads callers submit and the fixed-layout
//! records that cross the enclave boundary. This layer never looks inside a
//! footprint, a contribution, or an aggregate; it only checks shape.

use crate::util::GatewayError;

use interface::{
    AggregatedMessage, EntityId, Footprint, SchedulingMessage, SchedulingState, UserMessage,
    FOOTPRINT_N_SLOTS, USER_ID_LENGTH,
};

use serde::{Deserialize, Serialize};

/// Wire form of the scheduling state. Field names match the protocol schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingStateWire {
    pub round: u32,
    pub reservation_map: Vec<bool>,
    pub footprints: Vec<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingRequest {
    pub cur_state: SchedulingStateWire,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingResponse {
    pub new_state: SchedulingStateWire,
    pub message_to_broadcast: Vec<u8>,
    #[serde(rename = "final")]
    pub is_final: bool,
}

/// Wire form of a running aggregate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationWire {
    pub user_id_in_aggregation: Vec<Vec<u8>>,
    pub current_aggregated_value: Vec<u8>,
    pub sig: Vec<u8>,
}

/// Wire form of a single user contribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMessageWire {
    pub user_id: Vec<u8>,
    pub round: u32,
    pub user_message: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRequest {
    pub current_agg: AggregationWire,
    pub msg: UserMessageWire,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResponse {
    pub new_agg: AggregationWire,
}

/// Hard precondition: both sequences must have exactly FOOTPRINT_N_SLOTS
/// entries. There is no partial acceptance.
pub(crate) fn decode_state(wire: &SchedulingStateWire) -> Result<SchedulingState, GatewayError> {
    if wire.reservation_map.len() != FOOTPRINT_N_SLOTS {
        return Err(GatewayError::ShapeMismatch(format!(
            "reservation_map has {} entries, want {}",
            wire.reservation_map.len(),
            FOOTPRINT_N_SLOTS
        )));
    }
    if wire.footprints.len() != FOOTPRINT_N_SLOTS {
        return Err(GatewayError::ShapeMismatch(format!(
            "footprints has {} entries, want {}",
            wire.footprints.len(),
            FOOTPRINT_N_SLOTS
        )));
    }

    Ok(SchedulingState {
        round: wire.round,
        reservation: wire.reservation_map.clone(),
        footprints: decode_footprints(&wire.footprints),
    })
}

/// Slot i in = slot i out. Slot identity is positional, so order must
/// survive every round trip through this module.
pub(crate) fn encode_state(state: &SchedulingState) -> SchedulingStateWire {
    SchedulingStateWire {
        round: state.round,
        reservation_map: state.reservation.clone(),
        footprints: state.footprints.iter().map(|fp| fp.0.clone()).collect(),
    }
}

/// One-to-one, no reordering, no deduplication.
pub(crate) fn decode_footprints(raw: &[Vec<u8>]) -> Vec<Footprint> {
    raw.iter().cloned().map(Footprint).collect()
}

/// Serializes the round broadcast into the single opaque byte string carried
/// on the wire.
pub(crate) fn encode_broadcast(msg: &SchedulingMessage) -> Result<Vec<u8>, GatewayError> {
    serde_cbor::to_vec(msg).map_err(|e| GatewayError::EngineUnavailable(e.to_string()))
}

pub(crate) fn decode_aggregate(wire: &AggregationWire) -> Result<AggregatedMessage, GatewayError> {
    let mut user_ids = Vec::with_capacity(wire.user_id_in_aggregation.len());
    for raw in &wire.user_id_in_aggregation {
        user_ids.push(decode_entity_id(raw)?);
    }

    Ok(AggregatedMessage {
        user_ids,
        aggregated_value: wire.current_aggregated_value.clone(),
        sig: wire.sig.clone(),
    })
}

pub(crate) fn encode_aggregate(agg: &AggregatedMessage) -> AggregationWire {
    AggregationWire {
        user_id_in_aggregation: agg.user_ids.iter().map(|id| id.0.to_vec()).collect(),
        current_aggregated_value: agg.aggregated_value.clone(),
        sig: agg.sig.clone(),
    }
}

pub(crate) fn decode_user_message(wire: &UserMessageWire) -> Result<UserMessage, GatewayError> {
    Ok(UserMessage {
        user_id: decode_entity_id(&wire.user_id)?,
        round: wire.round,
        message: wire.user_message.clone(),
    })
}

fn decode_entity_id(raw: &[u8]) -> Result<EntityId, GatewayError> {
    if raw.len() != USER_ID_LENGTH {
        return Err(GatewayError::AggregationFailure(format!(
            "user id has {} bytes, want {}",
            raw.len(),
            USER_ID_LENGTH
        )));
    }

    let mut id = EntityId::default();
    id.0.copy_from_slice(raw);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state_wire() -> SchedulingStateWire {
        SchedulingStateWire {
            round: 2,
            reservation_map: (0..FOOTPRINT_N_SLOTS).map(|i| i % 3 == 0).collect(),
            footprints: (0..FOOTPRINT_N_SLOTS)
                .map(|i| vec![i as u8, (i >> 8) as u8])
                .collect(),
        }
    }

    #[test]
    fn state_wire_round_trip() {
        let wire = sample_state_wire();
        let state = decode_state(&wire).unwrap();
        assert_eq!(encode_state(&state), wire);
    }

    #[test]
    fn state_round_trip() {
        let mut state = SchedulingState::new();
        state.round = 5;
        state.reservation[0] = true;
        state.reservation[FOOTPRINT_N_SLOTS - 1] = true;
        state.footprints[0] = Footprint(vec![0x01]);
        state.footprints[FOOTPRINT_N_SLOTS - 1] = Footprint(vec![0xff, 0xee]);

        let decoded = decode_state(&encode_state(&state)).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn slot_order_is_positional() {
        let wire = sample_state_wire();
        let state = decode_state(&wire).unwrap();
        for i in 0..FOOTPRINT_N_SLOTS {
            assert_eq!(state.reservation[i], wire.reservation_map[i]);
            assert_eq!(state.footprints[i].0, wire.footprints[i]);
        }
    }

    #[test]
    fn short_reservation_map_is_rejected() {
        let mut wire = sample_state_wire();
        wire.reservation_map.pop();
        assert!(matches!(
            decode_state(&wire),
            Err(GatewayError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn oversized_footprints_are_rejected() {
        let mut wire = sample_state_wire();
        wire.footprints.push(vec![0xaa]);
        assert!(matches!(
            decode_state(&wire),
            Err(GatewayError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn aggregate_wire_round_trip() {
        let wire = AggregationWire {
            user_id_in_aggregation: vec![vec![0x11; USER_ID_LENGTH], vec![0x22; USER_ID_LENGTH]],
            current_aggregated_value: vec![1, 2, 3],
            sig: vec![9, 9],
        };

        let agg = decode_aggregate(&wire).unwrap();
        assert_eq!(encode_aggregate(&agg), wire);
    }

    #[test]
    fn bad_user_id_length_is_an_aggregation_failure() {
        let wire = AggregationWire {
            user_id_in_aggregation: vec![vec![0x11; 5]],
            current_aggregated_value: vec![],
            sig: vec![],
        };
        assert!(matches!(
            decode_aggregate(&wire),
            Err(GatewayError::AggregationFailure(_))
        ));
    }
}
