//! Wire records exchanged between participants.

use kart_core::BodyId;
use kart_motion::{KartState, Move};
use serde::{Deserialize, Serialize};

/// Controller → authority.  Fire-and-forget: there is no reply; the outcome
/// shows up in a later broadcast.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ClientMessage {
    SendMove { body: BodyId, mv: Move },
}

/// Authority → every participant replicating the body, including the one
/// controlling it.
///
/// `seq` counts broadcasts of one body and orders them on receipt.  The
/// state's watermark cannot: the authority applies moves in arrival order,
/// so `last_move` may step backwards while the state moves forward.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ServerMessage {
    State { body: BodyId, seq: u64, state: KartState },
}

impl ClientMessage {
    #[inline]
    pub fn body(&self) -> BodyId {
        match self {
            ClientMessage::SendMove { body, .. } => *body,
        }
    }
}

impl ServerMessage {
    #[inline]
    pub fn body(&self) -> BodyId {
        match self {
            ServerMessage::State { body, .. } => *body,
        }
    }
}
