use crate::params::USER_ID_LENGTH;

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};

/// Describes anytrust entities. An entity id is a sha-256 hash of some public key.
#[derive(Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub [u8; USER_ID_LENGTH]);

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&hex::encode(self.0))
    }
}

impl Debug for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&hex::encode(self.0))
    }
}

impl AsRef<[u8]> for EntityId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; USER_ID_LENGTH]> for EntityId {
    fn from(raw: [u8; USER_ID_LENGTH]) -> Self {
        EntityId(raw)
    }
}

/// A single contribution to be folded into an aggregate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMessage {
    pub user_id: EntityId,
    pub round: u32,
    pub message: Vec<u8>,
}

/// The running combination of user contributions. `aggregated_value` and
/// `sig` are opaque outside the enclave.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedMessage {
    pub user_ids: Vec<EntityId>,
    pub aggregated_value: Vec<u8>,
    pub sig: Vec<u8>,
}

impl AggregatedMessage {
    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty() && self.aggregated_value.is_empty()
    }
}

impl Display for AggregatedMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let users = self
            .user_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        write!(
            f,
            "users=[{}] value={} sig={}",
            users,
            hex::encode(&self.aggregated_value),
            hex::encode(&self.sig)
        )
    }
}
