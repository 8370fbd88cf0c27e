//! Session observer trait for progress reporting and data collection.

use kart_core::{BodyId, NetRole, ParticipantId, Tick};
use kart_motion::{Collider, KartState};
use kart_replicate::{Participant, Reconciliation, Role};

use crate::SessionStats;

/// Read-only view of one participant's copy of one body.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParticipantView {
    pub participant: ParticipantId,
    pub body:        BodyId,
    pub net_role:    NetRole,
    pub role:        Option<Role>,
    /// `None` while the copy has not been spawned.
    pub state:       Option<KartState>,
    pub queue_len:   usize,
}

impl ParticipantView {
    pub fn of<C: Collider>(p: &Participant<C>) -> Self {
        Self {
            participant: p.id(),
            body:        p.body(),
            net_role:    p.net_role(),
            role:        p.role(),
            state:       p.state().copied(),
            queue_len:   p.queue_len(),
        }
    }
}

/// Callbacks invoked by [`Session::run`][crate::Session::run] at key points
/// in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait SessionObserver {
    /// Called at the very start of each tick, before any packets move.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.  `moves_sent` counts the moves
    /// predictors put on the wire this tick.
    fn on_tick_end(&mut self, _tick: Tick, _moves_sent: usize) {}

    /// Called every `snapshot_interval_ticks` with every copy of every body,
    /// authority copies first.
    fn on_snapshot(&mut self, _tick: Tick, _views: &[ParticipantView]) {}

    /// Called whenever a predicting participant reconciles against a
    /// broadcast.
    fn on_correction(
        &mut self,
        _tick:        Tick,
        _participant: ParticipantId,
        _body:        BodyId,
        _outcome:     &Reconciliation,
    ) {}

    /// Called once after the final tick completes.
    fn on_session_end(&mut self, _final_tick: Tick, _stats: &SessionStats) {}
}

/// A [`SessionObserver`] that does nothing.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
