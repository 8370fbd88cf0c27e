//! `kart-core`: foundational types for the `kartnet` workspace.
//!
//! This crate is a dependency of every other `kart-*` crate.  It has no
//! `kart-*` dependencies and only a handful of external ones (`glam`, `rand`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `BodyId`, `ParticipantId`                             |
//! | [`transform`]   | `Transform` (position + yaw about the up axis)        |
//! | [`time`]        | `Tick`, `GameClock`, `TimeSource`                     |
//! | [`rng`]         | `SimRng` (seeded, reproducible)                       |
//! | [`role`]        | `NetRole` enum                                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by the wire codec in `kart-replicate`.            |

pub mod ids;
pub mod rng;
pub mod role;
pub mod time;
pub mod transform;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{BodyId, ParticipantId};
pub use rng::SimRng;
pub use role::NetRole;
pub use time::{GameClock, Tick, TimeSource};
pub use transform::Transform;
