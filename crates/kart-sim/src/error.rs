use kart_motion::MotionError;
use kart_replicate::ReplicateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("session configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match body count {expected}")]
    BodyCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("motion error: {0}")]
    Motion(#[from] MotionError),

    #[error("replication error: {0}")]
    Replicate(#[from] ReplicateError),
}

pub type SimResult<T> = Result<T, SimError>;
