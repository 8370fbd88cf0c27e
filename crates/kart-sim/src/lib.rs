//! `kart-sim`: runs a whole replicated session in one process.
//!
//! One authority and any number of clients share a single [`GameClock`]
//! (the authority's) and talk over [`SimulatedLink`]s that add latency,
//! jitter, and packet loss.  Everything is seeded, so a session replays
//! identically for the same [`SessionConfig`].
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Uplink   : deliver due client → authority packets; the authority
//!                 validates and applies each move in arrival order.
//!   ② Downlink : deliver due broadcasts; predictors reconcile, observers snap.
//!   ③ Tick     : every copy of every body runs its role's strategy;
//!                 predictors send their new move up the link.
//!   ④ Broadcast: every `broadcast_interval_ticks`, the authority sends each
//!                 changed body's state to every client.
//!   ⑤ Snapshot : every `snapshot_interval_ticks`, observers see all copies.
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`config`]   | `SessionConfig`, `LinkConfig`                              |
//! | [`network`]  | `SimulatedLink<M>`: lossy, jittery `Channel`               |
//! | [`input`]    | `InputScript` trait, `ConstantInput`, `SlalomInput`        |
//! | [`observer`] | `SessionObserver`, `NoopObserver`, `ParticipantView`       |
//! | [`builder`]  | `SessionBuilder`                                           |
//! | [`session`]  | `Session`, `SessionStats`                                  |
//! | [`error`]    | `SimError`, `SimResult<T>`                                 |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use kart_motion::OpenGround;
//! use kart_sim::{ConstantInput, NoopObserver, SessionBuilder, SessionConfig};
//!
//! let mut session = SessionBuilder::new(SessionConfig::default(), OpenGround, ConstantInput::full_throttle())
//!     .clients(2)
//!     .build()?;
//! session.run(&mut NoopObserver)?;
//! ```
//!
//! [`GameClock`]: kart_core::GameClock

pub mod builder;
pub mod config;
pub mod error;
pub mod input;
pub mod network;
pub mod observer;
pub mod session;

#[cfg(test)]
mod tests;

pub use builder::SessionBuilder;
pub use config::{LinkConfig, SessionConfig};
pub use error::{SimError, SimResult};
pub use input::{ConstantInput, InputScript, SlalomInput};
pub use network::{LinkStats, SimulatedLink};
pub use observer::{NoopObserver, ParticipantView, SessionObserver};
pub use session::{Session, SessionStats};
