use crate::footprint_sched::{SchedulingMessage, SchedulingState};

macro_rules! impl_enum {
    (
        #[repr($repr:ident)]
        pub enum $name:ident {
            $($key:ident = $val:expr,)+
        }
    ) => (
        #[repr($repr)]
        #[derive(Debug,Copy,Clone)]
        pub enum $name {
            $($key = $val,)+
        }

        impl $name {
            pub fn from_repr(v: $repr) -> Option<Self> {
                match v {
                    $($val => Some($name::$key),)+
                    _ => None,
                }
            }
        }
    )
}

impl_enum! {
    #[repr(u8)]
    pub enum EcallId {
        EcallScheduling = 1,
        EcallAggregate = 2,
    }
}

impl EcallId {
    pub fn as_str(&self) -> &str {
        match *self {
            EcallId::EcallScheduling => "EcallScheduling",
            EcallId::EcallAggregate => "EcallAggregate",
        }
    }
}

/// Scheduling made progress and expects further rounds.
pub const SCHEDULE_CONTINUE: u32 = 1;
/// Scheduling reached its terminal state with this round.
pub const SCHEDULE_DONE: u32 = 2;

/// Everything EcallScheduling hands back across the boundary: the protocol
/// status word, the advanced state, and the broadcast for this round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingRoundOutput {
    pub status: u32,
    pub state: SchedulingState,
    pub message: SchedulingMessage,
}
