use kart_core::BodyId;
use thiserror::Error;

use crate::MoveRejection;

#[derive(Debug, Error)]
pub enum ReplicateError {
    #[error("move at {timestamp} is not after the queue tail at {tail}")]
    OutOfOrderMove {
        timestamp: f64,
        tail:      f64,
    },

    #[error("message for {got} delivered to the replica of {expected}")]
    WrongBody {
        expected: BodyId,
        got:      BodyId,
    },

    #[error("move rejected: {0}")]
    Rejected(#[from] MoveRejection),

    #[error("encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

pub type ReplicateResult<T> = Result<T, ReplicateError>;
