use thiserror::Error;

#[derive(Debug, Error)]
pub enum MotionError {
    #[error("motion parameter `{name}` must be positive and finite, got {value}")]
    NotPositive {
        name:  &'static str,
        value: f32,
    },

    #[error("motion parameter `{name}` must be non-negative and finite, got {value}")]
    Negative {
        name:  &'static str,
        value: f32,
    },

    #[error("arena bounds are empty: min {min:?} is not below max {max:?}")]
    EmptyArena {
        min: [f32; 2],
        max: [f32; 2],
    },
}

pub type MotionResult<T> = Result<T, MotionError>;
