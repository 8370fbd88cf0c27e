//! `kart-motion`: the deterministic motion model and the records it consumes.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                        |
//! |----------------|-----------------------------------------------------------------|
//! | [`moves`]      | `Move`: one timestamped control sample plus its time slice      |
//! | [`state`]      | `KartState`: transform, velocity, last applied move             |
//! | [`params`]     | `MotionParams`: mass, forces, resistance tuning                 |
//! | [`collider`]   | `Collider` trait, `OpenGround`, `Arena`                         |
//! | [`model`]      | `MotionModel<C>`: pure `step(state, move) -> state`             |
//! | [`recorder`]   | `MoveRecorder`, `ControlInput`                                  |
//! | [`error`]      | `MotionError`, `MotionResult<T>`                                |
//!
//! # Why purity matters
//!
//! Reconciliation replays the same moves from the same base state on more
//! than one participant.  That only converges if `step` depends on nothing
//! but its arguments (and the immutable tuning/collider it was built with).
//! `MotionModel::step` takes `&self` and returns a fresh state; it never
//! reads a clock, an RNG, or any per-participant mutable data.

pub mod collider;
pub mod error;
pub mod model;
pub mod moves;
pub mod params;
pub mod recorder;
pub mod state;


pub use collider::{Arena, Collider, OpenGround, Sweep};
pub use error::{MotionError, MotionResult};
pub use model::MotionModel;
pub use moves::Move;
pub use params::MotionParams;
pub use recorder::{ControlInput, MoveRecorder};
pub use state::KartState;
