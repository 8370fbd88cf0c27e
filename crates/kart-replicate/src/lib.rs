//! `kart-replicate`: the prediction / reconciliation protocol.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                       |
//! |-----------------|----------------------------------------------------------------|
//! | [`queue`]       | `PredictionQueue`, `QueuePolicy`: unacknowledged moves         |
//! | [`reconcile`]   | `Reconciler`: snap, prune, replay                              |
//! | [`validate`]    | `MoveLimits`, `validate_move`, `MoveRejection`                 |
//! | [`authority`]   | `AuthorityState`: canonical state + accept/reject counters     |
//! | [`router`]      | `Role`, `Strategy`: the per-tick dispatch table                |
//! | [`participant`] | `Participant<C>`, `Delivery`: one copy of one body             |
//! | [`message`]     | `ClientMessage`, `ServerMessage` wire records                  |
//! | [`codec`]       | MessagePack `encode` / `decode`                                |
//! | [`channel`]     | `Channel` trait, `LocalChannel` loopback                       |
//! | [`error`]       | `ReplicateError`, `ReplicateResult<T>`                         |
//!
//! # Protocol in one paragraph
//!
//! A predicting participant records a move each tick, applies it to its own
//! state at once, appends it to its `PredictionQueue`, and sends it to the
//! authority.  The authority validates and applies moves in arrival order
//! and periodically broadcasts its state, whose `last_move` is the watermark.
//! On receipt the predicting participant snaps to the broadcast, drops every
//! queued move at or below the watermark, and replays the rest.  Observers
//! just snap and keep re-applying the broadcast's last move.

pub mod authority;
pub mod channel;
pub mod codec;
pub mod error;
pub mod message;
pub mod participant;
pub mod queue;
pub mod reconcile;
pub mod router;
pub mod validate;


pub use authority::AuthorityState;
pub use channel::{Channel, LocalChannel};
pub use error::{ReplicateError, ReplicateResult};
pub use message::{ClientMessage, ServerMessage};
pub use participant::{Delivery, Participant};
pub use queue::{PredictionQueue, QueuePolicy};
pub use reconcile::{Reconciliation, Reconciler};
pub use router::{Role, Strategy};
pub use validate::{MoveLimits, MoveRejection, validate_move};
