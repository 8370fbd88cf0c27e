//! The `Session` struct and its tick loop.

use kart_core::{BodyId, GameClock, ParticipantId, TimeSource, Tick};
use kart_motion::Collider;
use kart_replicate::codec::{decode, encode};
use kart_replicate::{Channel, ClientMessage, Delivery, Participant, ReplicateError, ServerMessage};
use tracing::{debug, info, warn};

use crate::{InputScript, LinkStats, ParticipantView, SessionConfig, SessionObserver, SimResult, SimulatedLink};

// ── Stats ─────────────────────────────────────────────────────────────────────

/// Session-wide counters, reported at the end of a run.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SessionStats {
    pub ticks:             u64,
    /// Moves predictors put on the wire.
    pub moves_sent:        u64,
    /// Moves the authority validated and applied.
    pub moves_applied:     u64,
    /// Moves delivered to a copy that could not apply them.
    pub moves_ignored:     u64,
    /// Moves the authority dropped on validation.
    pub moves_rejected:    u64,
    /// Moves for a body the sender does not control.
    pub foreign_moves:     u64,
    /// Packets that failed to decode.
    pub malformed_packets: u64,
    /// Body states the authority broadcast (one per body per broadcast round).
    pub broadcasts:        u64,
    /// Packets lost on any link.
    pub packets_dropped:   u64,
    pub corrections:       u64,
    /// Largest single reconciliation correction, in host units.
    pub max_correction:    f32,
}

// ── Client ────────────────────────────────────────────────────────────────────

/// A remote participant: its copies of every body plus its two links.
pub(crate) struct Client<C: Collider> {
    pub(crate) id:       ParticipantId,
    pub(crate) controls: BodyId,
    /// Indexed by `BodyId`.
    pub(crate) replicas: Vec<Participant<C>>,
    pub(crate) uplink:   SimulatedLink<Vec<u8>>,
    pub(crate) downlink: SimulatedLink<Vec<u8>>,
}

// ── Session ───────────────────────────────────────────────────────────────────

/// One authority, its clients, and the links between them.
///
/// Every participant stamps moves from the same [`GameClock`], so timestamps
/// compare meaningfully across participants.
///
/// Create via [`SessionBuilder`][crate::SessionBuilder].
pub struct Session<C: Collider, I: InputScript> {
    pub config: SessionConfig,

    /// The authority's clock, shared by every participant.
    pub clock: GameClock,

    /// The authority's copy of each body, indexed by `BodyId`.
    pub(crate) authority: Vec<Participant<C>>,

    pub(crate) clients: Vec<Client<C>>,

    /// The body the authority drives itself in listen-server mode.
    pub(crate) host_controls: Option<BodyId>,

    pub(crate) script: I,

    pub(crate) broadcast_interval: u64,

    pub(crate) stats: SessionStats,
}

impl<C: Collider, I: InputScript> Session<C, I> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: SessionObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            bodies        = self.authority.len(),
            clients       = self.clients.len(),
            ticks         = self.config.total_ticks,
            tick_rate_hz  = self.config.tick_rate_hz,
            listen_server = self.host_controls.is_some(),
            "session starting"
        );

        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() {
                break;
            }
            self.step(now, observer)?;
        }

        let stats = self.stats();
        info!(
            ticks          = stats.ticks,
            moves_sent     = stats.moves_sent,
            moves_applied  = stats.moves_applied,
            moves_rejected = stats.moves_rejected,
            moves_ignored  = stats.moves_ignored,
            dropped        = stats.packets_dropped,
            corrections    = stats.corrections,
            max_correction = stats.max_correction,
            "session finished"
        );
        observer.on_session_end(self.clock.current_tick, &stats);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SessionObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.clock.current_tick;
            self.step(now, observer)?;
        }
        Ok(())
    }

    /// Counters so far, including packets lost on every link.
    pub fn stats(&self) -> SessionStats {
        let mut stats = self.stats;
        stats.packets_dropped = self
            .clients
            .iter()
            .map(|c| c.uplink.stats().dropped + c.downlink.stats().dropped)
            .sum();
        stats
    }

    /// Every copy of every body, authority copies first.
    pub fn views(&self) -> Vec<ParticipantView> {
        self.authority
            .iter()
            .chain(self.clients.iter().flat_map(|c| c.replicas.iter()))
            .map(ParticipantView::of)
            .collect()
    }

    /// The authority's copy of `body`.
    pub fn authority_copy(&self, body: BodyId) -> Option<&Participant<C>> {
        self.authority.get(body.index())
    }

    /// `participant`'s copy of `body`.
    pub fn client_copy(&self, participant: ParticipantId, body: BodyId) -> Option<&Participant<C>> {
        self.client(participant)?.replicas.get(body.index())
    }

    /// Ids of the remote participants, in join order.
    pub fn client_ids(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.clients.iter().map(|c| c.id)
    }

    /// The body `participant` drives.
    pub fn controlled_body(&self, participant: ParticipantId) -> Option<BodyId> {
        if participant.is_authority() {
            return self.host_controls;
        }
        self.client(participant).map(|c| c.controls)
    }

    #[inline]
    pub fn body_count(&self) -> usize {
        self.authority.len()
    }

    /// `(uplink, downlink)` totals for `participant`.
    pub fn link_stats(&self, participant: ParticipantId) -> Option<(LinkStats, LinkStats)> {
        self.client(participant).map(|c| (c.uplink.stats(), c.downlink.stats()))
    }

    /// Change the loss rate on both of `participant`'s links.
    pub fn set_link_loss(&mut self, participant: ParticipantId, loss: f64) {
        if let Some(client) = self.clients.iter_mut().find(|c| c.id == participant) {
            client.uplink.set_loss(loss);
            client.downlink.set_loss(loss);
        }
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn client(&self, participant: ParticipantId) -> Option<&Client<C>> {
        self.clients.iter().find(|c| c.id == participant)
    }

    fn step<O: SessionObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<()> {
        observer.on_tick_start(now);
        let sent = self.process_tick(now, observer)?;
        observer.on_tick_end(now, sent);

        if self.config.snapshot_interval_ticks > 0
            && now.0.is_multiple_of(self.config.snapshot_interval_ticks)
        {
            observer.on_snapshot(now, &self.views());
        }

        self.clock.advance();
        self.stats.ticks += 1;
        Ok(())
    }

    fn process_tick<O: SessionObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<usize> {
        let t = self.clock.now();
        let dt = self.clock.tick_secs();

        // ── Phase 1: uplink, client → authority ───────────────────────────
        //
        // Moves are applied in the order the link delivers them, which with
        // jitter need not be timestamp order.
        for client in &mut self.clients {
            for packet in client.uplink.receive(t) {
                let msg: ClientMessage = match decode(&packet) {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!(participant = %client.id, error = %e, "dropping malformed move packet");
                        self.stats.malformed_packets += 1;
                        continue;
                    }
                };

                let body = msg.body();
                if body != client.controls {
                    warn!(participant = %client.id, %body, "dropping move for a body the sender does not control");
                    self.stats.foreign_moves += 1;
                    continue;
                }
                let Some(copy) = self.authority.get_mut(body.index()) else {
                    warn!(participant = %client.id, %body, "dropping move for an unknown body");
                    continue;
                };

                match copy.on_client_message(msg) {
                    Ok(Delivery::Applied) => self.stats.moves_applied += 1,
                    Ok(Delivery::Ignored) => self.stats.moves_ignored += 1,
                    Err(ReplicateError::Rejected(reason)) => {
                        debug!(participant = %client.id, %body, %reason, "authority rejected move");
                        self.stats.moves_rejected += 1;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        // ── Phase 2: downlink, authority → clients ────────────────────────
        for client in &mut self.clients {
            for packet in client.downlink.receive(t) {
                let msg: ServerMessage = match decode(&packet) {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!(participant = %client.id, error = %e, "dropping malformed state packet");
                        self.stats.malformed_packets += 1;
                        continue;
                    }
                };

                let body = msg.body();
                let Some(copy) = client.replicas.get_mut(body.index()) else {
                    warn!(participant = %client.id, %body, "dropping state for an unknown body");
                    continue;
                };

                if let Some(outcome) = copy.on_server_message(msg)? {
                    self.stats.corrections += 1;
                    self.stats.max_correction = self.stats.max_correction.max(outcome.correction);
                    observer.on_correction(now, client.id, body, &outcome);
                }
            }
        }

        // ── Phase 3: every copy runs its role's strategy ──────────────────
        for copy in &mut self.authority {
            if Some(copy.body()) == self.host_controls {
                copy.set_input(self.script.input(ParticipantId::AUTHORITY, copy.body(), now));
            }
            // Authority roles never produce a message to send.
            let _ = copy.tick(&self.clock, dt);
        }

        let mut sent = 0;
        for client in &mut self.clients {
            for copy in &mut client.replicas {
                if copy.body() == client.controls {
                    copy.set_input(self.script.input(client.id, copy.body(), now));
                }
                if let Some(msg) = copy.tick(&self.clock, dt) {
                    client.uplink.send(t, encode(&msg)?);
                    sent += 1;
                }
            }
        }
        self.stats.moves_sent += sent as u64;

        // ── Phase 4: broadcast changed bodies ─────────────────────────────
        if now.0.is_multiple_of(self.broadcast_interval) {
            for copy in &mut self.authority {
                let Some(msg) = copy.take_broadcast() else {
                    continue;
                };
                let packet = encode(&msg)?;
                for client in &mut self.clients {
                    client.downlink.send(t, packet.clone());
                }
                self.stats.broadcasts += 1;
            }
        }

        Ok(sent)
    }
}
