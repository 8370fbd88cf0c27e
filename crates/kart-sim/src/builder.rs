//! Fluent builder for constructing a [`Session`].

use glam::Vec3;
use kart_core::{BodyId, NetRole, ParticipantId, SimRng, Transform};
use kart_motion::{Collider, KartState, MotionModel};
use kart_replicate::Participant;

use crate::session::Client;
use crate::{InputScript, Session, SessionConfig, SessionStats, SimError, SimResult, SimulatedLink};

/// Distance between default spawn points, in host units.
const SPAWN_SPACING: f32 = 500.0;

/// Fluent builder for [`Session<C, I>`].
///
/// # Required inputs
///
/// - [`SessionConfig`]: tick rate, links, tuning, seed, …
/// - `C: Collider`: the track every participant simulates against
/// - `I: InputScript`: drives every controlled body
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                                   |
/// |----------------------|-------------------------------------------|
/// | `.clients(n)`        | 1                                         |
/// | `.spawn_points(v)`   | A column along Y, `SPAWN_SPACING` apart   |
///
/// Body `i` is driven by the host in listen-server mode when `i == 0`, and
/// otherwise by one client each, in join order.
pub struct SessionBuilder<C: Collider + Clone, I: InputScript> {
    config:   SessionConfig,
    collider: C,
    script:   I,
    clients:  usize,
    spawns:   Option<Vec<Transform>>,
}

impl<C: Collider + Clone, I: InputScript> SessionBuilder<C, I> {
    pub fn new(config: SessionConfig, collider: C, script: I) -> Self {
        Self {
            config,
            collider,
            script,
            clients: 1,
            spawns:  None,
        }
    }

    /// Number of remote participants.  Each controls one body.
    pub fn clients(mut self, n: usize) -> Self {
        self.clients = n;
        self
    }

    /// Starting transform of each body (must be length `body_count`).
    pub fn spawn_points(mut self, spawns: Vec<Transform>) -> Self {
        self.spawns = Some(spawns);
        self
    }

    /// Validate inputs, wire up participants and links, and return a
    /// ready-to-run [`Session`].
    pub fn build(self) -> SimResult<Session<C, I>> {
        self.config.validate()?;

        let listen = self.config.listen_server;
        if self.clients == 0 && !listen {
            return Err(SimError::Config(
                "a session needs at least one client or a listen server".into(),
            ));
        }
        let body_count = self.clients + usize::from(listen);

        // ── Resolve spawn points ──────────────────────────────────────────
        let spawns = match self.spawns {
            Some(s) => {
                if s.len() != body_count {
                    return Err(SimError::BodyCountMismatch {
                        expected: body_count,
                        got:      s.len(),
                        what:     "spawn points",
                    });
                }
                s
            }
            None => default_spawns(body_count),
        };

        let model = MotionModel::new(self.config.motion, self.collider);
        let host_controls = listen.then_some(BodyId(0));
        let first_client_body = u32::from(listen);

        let copy_of = |owner: ParticipantId, i: usize, net_role: NetRole, local: bool| {
            Participant::new(owner, BodyId(i as u32), net_role, local, model.clone())
                .with_state(KartState::at_rest(spawns[i]))
                .with_limits(self.config.limits)
                .with_queue_policy(self.config.queue)
        };

        // ── Authority copies ──────────────────────────────────────────────
        let authority = (0..body_count)
            .map(|i| {
                let local = host_controls == Some(BodyId(i as u32));
                copy_of(ParticipantId::AUTHORITY, i, NetRole::Authority, local)
            })
            .collect();

        // ── Clients and their links ───────────────────────────────────────
        //
        // One child RNG per link, derived in a fixed order, so a link's
        // draws depend only on the seed and its participant id.
        let mut rng = SimRng::new(self.config.seed);
        let clients = (0..self.clients)
            .map(|k| {
                let id = ParticipantId(k as u32 + 1);
                let controls = BodyId(k as u32 + first_client_body);
                let replicas = (0..body_count)
                    .map(|i| {
                        let own = BodyId(i as u32) == controls;
                        let net_role = if own { NetRole::AutonomousProxy } else { NetRole::SimulatedProxy };
                        copy_of(id, i, net_role, own)
                    })
                    .collect();
                Client {
                    id,
                    controls,
                    replicas,
                    uplink:   SimulatedLink::new(self.config.link, rng.child(2 * id.0 as u64)),
                    downlink: SimulatedLink::new(self.config.link, rng.child(2 * id.0 as u64 + 1)),
                }
            })
            .collect();

        Ok(Session {
            clock:              self.config.make_clock(),
            broadcast_interval: self.config.broadcast_interval_ticks(),
            config:             self.config,
            authority,
            clients,
            host_controls,
            script:             self.script,
            stats:              SessionStats::default(),
        })
    }
}

/// A column of bodies along Y centred on the origin, all facing +X.
fn default_spawns(n: usize) -> Vec<Transform> {
    let centre = (n.saturating_sub(1)) as f32 / 2.0;
    (0..n)
        .map(|i| Transform::new(Vec3::new(0.0, (i as f32 - centre) * SPAWN_SPACING, 0.0), 0.0))
        .collect()
}
