//! One participant's copy of one body.
//!
//! A `Participant` bundles everything a single copy needs (local state,
//! the role-specific authority state or prediction queue, and the move
//! recorder) and exposes the entry points the host drives:
//!
//! - [`tick`](Participant::tick) once per frame,
//! - [`on_client_message`](Participant::on_client_message) when a move
//!   arrives (authority only),
//! - [`on_server_message`](Participant::on_server_message) when a broadcast
//!   arrives.
//!
//! Role-specific pieces are created when a role is activated and dropped
//! when it is left, so a queue never outlives the predicting role.

use kart_core::{BodyId, NetRole, ParticipantId, TimeSource};
use kart_motion::{Collider, ControlInput, KartState, MotionModel, Move, MoveRecorder};
use tracing::{debug, trace, warn};

use crate::{
    AuthorityState, ClientMessage, MoveLimits, MoveRejection, PredictionQueue, QueuePolicy,
    Reconciler, Reconciliation, ReplicateError, ReplicateResult, Role, ServerMessage, Strategy,
};

/// What became of a move handed to [`Participant::on_client_message`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Validated and stepped into the canonical state.
    Applied,
    /// Not applied: this copy holds no authority or no canonical state yet.
    Ignored,
}

pub struct Participant<C: Collider> {
    id:                 ParticipantId,
    body:               BodyId,
    net_role:           NetRole,
    locally_controlled: bool,
    model:              MotionModel<C>,
    recorder:           MoveRecorder,
    limits:             MoveLimits,
    queue_policy:       QueuePolicy,

    /// Local copy of the body; `None` until spawned or first broadcast.
    state:              Option<KartState>,
    /// Present only while the role is an authority role.
    authority:          Option<AuthorityState>,
    /// Present only while the role is `PredictingController`.
    queue:              Option<PredictionQueue>,
    role:               Option<Role>,

    /// Sequence number of the newest broadcast applied.
    latest_seq:         Option<u64>,
    /// Broadcasts taken so far while holding authority.
    broadcast_seq:      u64,
    /// Authority state changed since the last broadcast was taken.
    dirty:              bool,
    last_reconciliation: Option<Reconciliation>,
}

impl<C: Collider> Participant<C> {
    /// Create a participant's copy of `body`.  Nothing is simulated until a
    /// state exists, via [`with_state`](Self::with_state) or a broadcast.
    pub fn new(
        id:                 ParticipantId,
        body:               BodyId,
        net_role:           NetRole,
        locally_controlled: bool,
        model:              MotionModel<C>,
    ) -> Self {
        Self {
            id,
            body,
            net_role,
            locally_controlled,
            model,
            recorder:            MoveRecorder::new(),
            limits:              MoveLimits::default(),
            queue_policy:        QueuePolicy::default(),
            state:               None,
            authority:           None,
            queue:               None,
            role:                None,
            latest_seq:          None,
            broadcast_seq:       0,
            dirty:               false,
            last_reconciliation: None,
        }
    }

    /// Spawn the body at `state`.
    pub fn with_state(mut self, state: KartState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_limits(mut self, limits: MoveLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_queue_policy(mut self, policy: QueuePolicy) -> Self {
        self.queue_policy = policy;
        self
    }

    // ── Host metadata ─────────────────────────────────────────────────────

    /// Update the host's view of this copy.  Takes effect on the next tick
    /// or message.
    pub fn set_net_role(&mut self, net_role: NetRole, locally_controlled: bool) {
        self.net_role = net_role;
        self.locally_controlled = locally_controlled;
    }

    /// Latest control values from the input bindings.
    pub fn set_input(&mut self, input: ControlInput) {
        self.recorder.set_input(input);
    }

    // ── Entry points ──────────────────────────────────────────────────────

    /// Run this tick's strategy for the current role.
    ///
    /// Returns the message to send to the authority, if the strategy
    /// produced one.  Without a local state the tick is a no-op.
    pub fn tick<T: TimeSource + ?Sized>(&mut self, clock: &T, delta_time: f32) -> Option<ClientMessage> {
        let role = self.refresh_role()?;
        let Some(state) = self.state else {
            trace!(participant = %self.id, body = %self.body, "no local state yet, skipping tick");
            return None;
        };

        match role.strategy() {
            Strategy::RecordAndApply => {
                let mv = self.recorder.create_move(clock, delta_time);
                if let Err(reason) = self.apply_authoritative(mv) {
                    debug!(participant = %self.id, %reason, "local move rejected");
                }
                None
            }

            Strategy::PredictAndQueue => {
                let mv = self.recorder.create_move(clock, delta_time);
                let policy = self.queue_policy;
                let queue = self.queue.get_or_insert_with(|| PredictionQueue::new(policy));
                if let Err(e) = queue.push(mv) {
                    warn!(participant = %self.id, error = %e, "discarding move");
                    return None;
                }
                self.state = Some(self.model.step(&state, &mv));
                Some(ClientMessage::SendMove { body: self.body, mv })
            }

            // No fresh input exists for a body we don't control; keep it
            // moving with the last input the authority reported.
            Strategy::ReplayLastMove => {
                self.state = Some(self.model.step(&state, &state.last_move));
                None
            }

            Strategy::DoNothing => None,
        }
    }

    /// Handle a move sent to this copy.  Only authority roles apply moves.
    ///
    /// # Errors
    ///
    /// `WrongBody` if the move targets another body, `Rejected` if
    /// validation dropped it.  Neither is reported to the sender.
    pub fn on_client_message(&mut self, msg: ClientMessage) -> ReplicateResult<Delivery> {
        let ClientMessage::SendMove { body, mv } = msg;
        self.check_body(body)?;

        match self.refresh_role() {
            Some(role) if role.is_authority() => Ok(self.apply_authoritative(mv)?),
            _ => {
                debug!(participant = %self.id, "ignoring move delivered to a non-authority copy");
                Ok(Delivery::Ignored)
            }
        }
    }

    /// Handle an authority broadcast.
    ///
    /// Predicting controllers reconcile and return the outcome; observers
    /// (and copies with no role yet) snap.  The authority ignores its own
    /// broadcast.  A broadcast whose `seq` is not above the newest applied
    /// is dropped.
    pub fn on_server_message(&mut self, msg: ServerMessage) -> ReplicateResult<Option<Reconciliation>> {
        let ServerMessage::State { body, seq, state: authoritative } = msg;
        self.check_body(body)?;

        let role = self.refresh_role();
        if role.is_some_and(Role::is_authority) {
            return Ok(None);
        }

        if self.latest_seq.is_some_and(|latest| seq <= latest) {
            debug!(participant = %self.id, seq, latest = ?self.latest_seq, "ignoring stale broadcast");
            return Ok(None);
        }
        self.latest_seq = Some(seq);

        if role == Some(Role::PredictingController) {
            let policy = self.queue_policy;
            let queue = self.queue.get_or_insert_with(|| PredictionQueue::new(policy));
            let outcome = Reconciler::reconcile(&self.model, queue, &authoritative, self.state.as_ref());
            self.state = Some(outcome.state);
            self.last_reconciliation = Some(outcome);
            return Ok(Some(outcome));
        }

        self.state = Some(authoritative);
        Ok(None)
    }

    /// Take the broadcast owed to observers, if the canonical state changed
    /// since the last one.  The host decides the cadence.
    pub fn take_broadcast(&mut self) -> Option<ServerMessage> {
        let authority = self.authority.as_ref()?;
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        self.broadcast_seq += 1;
        Some(ServerMessage::State { body: self.body, seq: self.broadcast_seq, state: *authority.state() })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> ParticipantId {
        self.id
    }

    #[inline]
    pub fn body(&self) -> BodyId {
        self.body
    }

    #[inline]
    pub fn net_role(&self) -> NetRole {
        self.net_role
    }

    /// Role as of the last tick or message.
    #[inline]
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    #[inline]
    pub fn state(&self) -> Option<&KartState> {
        self.state.as_ref()
    }

    #[inline]
    pub fn authority(&self) -> Option<&AuthorityState> {
        self.authority.as_ref()
    }

    #[inline]
    pub fn queue(&self) -> Option<&PredictionQueue> {
        self.queue.as_ref()
    }

    /// Unacknowledged moves held; zero for every role but the predictor.
    #[inline]
    pub fn queue_len(&self) -> usize {
        self.queue.as_ref().map_or(0, PredictionQueue::len)
    }

    #[inline]
    pub fn last_reconciliation(&self) -> Option<&Reconciliation> {
        self.last_reconciliation.as_ref()
    }

    #[inline]
    pub fn model(&self) -> &MotionModel<C> {
        &self.model
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn check_body(&self, got: BodyId) -> ReplicateResult<()> {
        if got != self.body {
            return Err(ReplicateError::WrongBody { expected: self.body, got });
        }
        Ok(())
    }

    /// Re-evaluate the role and activate / deactivate role-owned pieces.
    fn refresh_role(&mut self) -> Option<Role> {
        let role = Role::resolve(self.net_role, self.locally_controlled);
        if role != self.role {
            debug!(
                participant = %self.id,
                body        = %self.body,
                from        = ?self.role,
                to          = ?role,
                "role changed"
            );
            self.queue = None;
            if role.is_some_and(Role::predicts) {
                self.queue = Some(PredictionQueue::new(self.queue_policy));
            }
            if !role.is_some_and(Role::is_authority) {
                self.authority = None;
                self.dirty = false;
            }
            self.role = role;
        }

        if role.is_some_and(Role::is_authority) && self.authority.is_none() {
            if let Some(state) = self.state {
                self.authority = Some(AuthorityState::new(state, self.limits));
                self.dirty = true;
            }
        }
        role
    }

    /// Validate and apply `mv` to the canonical state, mirroring the result
    /// into the local copy.
    fn apply_authoritative(&mut self, mv: Move) -> Result<Delivery, MoveRejection> {
        let Some(authority) = self.authority.as_mut() else {
            trace!(participant = %self.id, "no canonical state yet, dropping move");
            return Ok(Delivery::Ignored);
        };
        let state = *authority.receive_move(&self.model, mv)?;
        self.state = Some(state);
        self.dirty = true;
        Ok(Delivery::Applied)
    }
}
