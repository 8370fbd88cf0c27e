//! Integration tests for kart-sim.

use kart_core::{BodyId, ParticipantId, SimRng, Tick};
use kart_motion::{ControlInput, OpenGround};
use kart_replicate::{Channel, Reconciliation, Role};

use crate::{
    ConstantInput, InputScript, LinkConfig, NoopObserver, ParticipantView, SessionBuilder,
    SessionConfig, SessionObserver, SessionStats, SimError, SimulatedLink, SlalomInput,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Zero-latency, lossless links and a broadcast every tick.
fn lan_config(total_ticks: u64) -> SessionConfig {
    SessionConfig {
        total_ticks,
        broadcast_rate_hz: 60.0,
        link: LinkConfig { latency_secs: 0.0, jitter_secs: 0.0, loss: 0.0 },
        ..SessionConfig::default()
    }
}

fn link(config: LinkConfig, seed: u64) -> SimulatedLink<u32> {
    SimulatedLink::new(config, SimRng::new(seed))
}

/// Records every callback it receives.
#[derive(Default)]
struct Recorder {
    starts:      u64,
    ends:        u64,
    snapshots:   Vec<(Tick, usize)>,
    corrections: Vec<(Tick, ParticipantId, BodyId, Reconciliation)>,
    final_stats: Option<SessionStats>,
}

impl SessionObserver for Recorder {
    fn on_tick_start(&mut self, _tick: Tick) {
        self.starts += 1;
    }

    fn on_tick_end(&mut self, _tick: Tick, _moves_sent: usize) {
        self.ends += 1;
    }

    fn on_snapshot(&mut self, tick: Tick, views: &[ParticipantView]) {
        self.snapshots.push((tick, views.len()));
    }

    fn on_correction(&mut self, tick: Tick, participant: ParticipantId, body: BodyId, outcome: &Reconciliation) {
        self.corrections.push((tick, participant, body, *outcome));
    }

    fn on_session_end(&mut self, _final_tick: Tick, stats: &SessionStats) {
        self.final_stats = Some(*stats);
    }
}

// ── SessionConfig ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use super::*;

    #[test]
    fn defaults_validate() {
        let c = SessionConfig::default();
        c.validate().unwrap();
        assert_eq!(c.tick_rate_hz, 60);
        assert_eq!(c.broadcast_interval_ticks(), 60);
    }

    #[test]
    fn fast_broadcast_is_at_least_one_tick() {
        let c = SessionConfig { broadcast_rate_hz: 1000.0, ..SessionConfig::default() };
        assert_eq!(c.broadcast_interval_ticks(), 1);
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            SessionConfig { tick_rate_hz: 0, ..SessionConfig::default() },
            SessionConfig { broadcast_rate_hz: 0.0, ..SessionConfig::default() },
            SessionConfig { link: LinkConfig { loss: 1.5, ..LinkConfig::default() }, ..SessionConfig::default() },
            SessionConfig { link: LinkConfig { jitter_secs: -0.1, ..LinkConfig::default() }, ..SessionConfig::default() },
            // 0.5 s ticks exceed the 0.25 s move limit.
            SessionConfig { tick_rate_hz: 2, ..SessionConfig::default() },
        ];
        for c in bad {
            assert!(matches!(c.validate(), Err(SimError::Config(_))), "{c:?}");
        }
    }

    #[test]
    fn bad_motion_params_surface_as_motion_error() {
        let mut c = SessionConfig::default();
        c.motion.mass = 0.0;
        assert!(matches!(c.validate(), Err(SimError::Motion(_))));
    }
}

// ── SimulatedLink ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod network {
    use super::*;

    #[test]
    fn delivers_after_latency_in_send_order() {
        let mut l = link(LinkConfig { latency_secs: 0.1, jitter_secs: 0.0, loss: 0.0 }, 1);
        l.send(0.0, 1);
        l.send(0.0, 2);
        l.send(0.05, 3);

        assert!(l.receive(0.05).is_empty());
        assert_eq!(l.receive(0.1), vec![1, 2]);
        assert_eq!(l.in_flight(), 1);
        assert_eq!(l.receive(0.2), vec![3]);
        assert_eq!(l.stats().delivered, 3);
    }

    #[test]
    fn total_loss_drops_everything() {
        let mut l = link(LinkConfig { latency_secs: 0.0, jitter_secs: 0.0, loss: 1.0 }, 1);
        for i in 0..10 {
            l.send(0.0, i);
        }
        assert!(l.receive(10.0).is_empty());
        assert_eq!(l.stats().dropped, 10);
        assert_eq!(l.stats().sent, 10);
    }

    #[test]
    fn same_seed_same_schedule() {
        let config = LinkConfig { latency_secs: 0.05, jitter_secs: 0.04, loss: 0.2 };
        let run = |seed| {
            let mut l = link(config, seed);
            let mut out = Vec::new();
            for i in 0..50u32 {
                let t = i as f64 / 60.0;
                l.send(t, i);
                out.push(l.receive(t));
            }
            out.push(l.receive(100.0));
            out
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn jitter_without_loss_delivers_everything() {
        let mut l = link(LinkConfig { latency_secs: 0.02, jitter_secs: 0.05, loss: 0.0 }, 3);
        for i in 0..100u32 {
            l.send(i as f64 * 0.01, i);
        }
        let mut got = l.receive(100.0);
        got.sort_unstable();
        assert_eq!(got, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn set_loss_clamps() {
        let mut l = link(LinkConfig::default(), 0);
        l.set_loss(3.0);
        assert_eq!(l.config().loss, 1.0);
    }
}

// ── InputScript ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod input {
    use super::*;

    #[test]
    fn constant_input_ignores_everything() {
        let mut s = ConstantInput::full_throttle();
        assert_eq!(s.input(ParticipantId(3), BodyId(9), Tick(77)), ControlInput::new(1.0, 0.0));
    }

    #[test]
    fn slalom_stays_in_range_and_differs_per_body() {
        let mut s = SlalomInput { throttle: 1.0, amplitude: 1.0, period_ticks: 40 };
        for t in 0..80 {
            let c = s.input(ParticipantId(1), BodyId(0), Tick(t));
            assert!(c.steering.abs() <= 1.0);
            assert_eq!(c.throttle, 1.0);
        }
        let a = s.input(ParticipantId(1), BodyId(0), Tick(0));
        let b = s.input(ParticipantId(1), BodyId(1), Tick(0));
        assert_ne!(a.steering, b.steering);
    }

    #[test]
    fn closures_are_scripts() {
        let mut s = |_: ParticipantId, body: BodyId, _: Tick| ControlInput::new(body.0 as f32 * 0.5, 0.0);
        assert_eq!(s.input(ParticipantId(1), BodyId(1), Tick(0)).throttle, 0.5);
    }
}

// ── SessionBuilder ────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use kart_core::{NetRole, Transform};

    use super::*;

    #[test]
    fn builds_one_copy_per_body_per_participant() {
        let session = SessionBuilder::new(lan_config(10), OpenGround, ConstantInput::default())
            .clients(3)
            .build()
            .unwrap();
        assert_eq!(session.body_count(), 3);
        assert_eq!(session.views().len(), 3 * 4);
        assert_eq!(session.controlled_body(ParticipantId(1)), Some(BodyId(0)));
        assert_eq!(session.controlled_body(ParticipantId(3)), Some(BodyId(2)));
        assert_eq!(session.controlled_body(ParticipantId::AUTHORITY), None);

        let own = session.client_copy(ParticipantId(2), BodyId(1)).unwrap();
        assert_eq!(own.net_role(), NetRole::AutonomousProxy);
        let other = session.client_copy(ParticipantId(2), BodyId(0)).unwrap();
        assert_eq!(other.net_role(), NetRole::SimulatedProxy);
    }

    #[test]
    fn default_spawns_do_not_overlap() {
        let session = SessionBuilder::new(lan_config(1), OpenGround, ConstantInput::default())
            .clients(4)
            .build()
            .unwrap();
        let a = session.authority_copy(BodyId(0)).unwrap().state().unwrap().transform;
        let b = session.authority_copy(BodyId(1)).unwrap().state().unwrap().transform;
        assert!(a.distance(&b) > 0.0);
    }

    #[test]
    fn no_participants_is_an_error() {
        let result = SessionBuilder::new(lan_config(10), OpenGround, ConstantInput::default())
            .clients(0)
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn spawn_count_mismatch_errors() {
        let result = SessionBuilder::new(lan_config(10), OpenGround, ConstantInput::default())
            .clients(2)
            .spawn_points(vec![Transform::default()])
            .build();
        assert!(matches!(result, Err(SimError::BodyCountMismatch { expected: 2, got: 1, .. })));
    }

    #[test]
    fn listen_server_owns_body_zero() {
        let config = SessionConfig { listen_server: true, ..lan_config(10) };
        let session = SessionBuilder::new(config, OpenGround, ConstantInput::default())
            .clients(1)
            .build()
            .unwrap();
        assert_eq!(session.body_count(), 2);
        assert_eq!(session.controlled_body(ParticipantId::AUTHORITY), Some(BodyId(0)));
        assert_eq!(session.controlled_body(ParticipantId(1)), Some(BodyId(1)));
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod session {
    use super::*;

    #[test]
    fn observer_hooks_fire() {
        let config = SessionConfig { snapshot_interval_ticks: 10, ..lan_config(30) };
        let mut session = SessionBuilder::new(config, OpenGround, ConstantInput::full_throttle())
            .clients(2)
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        session.run(&mut rec).unwrap();

        assert_eq!(rec.starts, 30);
        assert_eq!(rec.ends, 30);
        assert_eq!(rec.snapshots, vec![(Tick(0), 6), (Tick(10), 6), (Tick(20), 6)]);
        assert_eq!(rec.final_stats.map(|s| s.ticks), Some(30));
        assert_eq!(session.clock.current_tick, Tick(30));
    }

    #[test]
    fn perfect_link_never_corrects() {
        let mut session = SessionBuilder::new(lan_config(120), OpenGround, SlalomInput::default())
            .clients(2)
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        session.run(&mut rec).unwrap();

        let stats = session.stats();
        assert!(stats.corrections > 0);
        assert_eq!(stats.max_correction, 0.0);
        assert_eq!(stats.moves_rejected, 0);
        assert_eq!(stats.moves_ignored, 0);
        assert_eq!(stats.packets_dropped, 0);
        // Only moves that reached canonical state count as applied.
        let accepted: u64 = (0..session.body_count())
            .map(|i| session.authority_copy(BodyId(i as u32)).unwrap().authority().unwrap().accepted())
            .sum();
        assert_eq!(stats.moves_applied, accepted);
        // Each tick's move is acknowledged two ticks later.
        for id in [ParticipantId(1), ParticipantId(2)] {
            let body = session.controlled_body(id).unwrap();
            assert!(session.client_copy(id, body).unwrap().queue_len() <= 2);
        }
    }

    #[test]
    fn observer_extrapolation_tracks_constant_input() {
        let mut session = SessionBuilder::new(lan_config(90), OpenGround, ConstantInput::full_throttle())
            .clients(2)
            .build()
            .unwrap();
        session.run(&mut NoopObserver).unwrap();

        // Client 2 watches body 0, driven by client 1.
        let watched = session.client_copy(ParticipantId(2), BodyId(0)).unwrap();
        assert_eq!(watched.role(), Some(Role::Observer));
        let seen = watched.state().unwrap();
        let truth = session.authority_copy(BodyId(0)).unwrap().state().unwrap();
        assert_eq!(seen.transform, truth.transform);
        assert_eq!(seen.velocity, truth.velocity);
    }

    #[test]
    fn same_seed_same_session() {
        let config = SessionConfig {
            total_ticks: 240,
            broadcast_rate_hz: 10.0,
            link: LinkConfig { latency_secs: 0.08, jitter_secs: 0.03, loss: 0.1 },
            ..SessionConfig::default()
        };
        let run = || {
            let mut s = SessionBuilder::new(config.clone(), OpenGround, SlalomInput::default())
                .clients(3)
                .build()
                .unwrap();
            s.run(&mut NoopObserver).unwrap();
            (s.views(), s.stats())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn prediction_recovers_after_outage() {
        let mut session = SessionBuilder::new(lan_config(0), OpenGround, SlalomInput::default())
            .clients(1)
            .build()
            .unwrap();
        let client = ParticipantId(1);

        session.set_link_loss(client, 0.5);
        session.run_ticks(60, &mut NoopObserver).unwrap();
        assert!(session.stats().packets_dropped > 0);

        session.set_link_loss(client, 0.0);
        let mut rec = Recorder::default();
        session.run_ticks(10, &mut rec).unwrap();

        let settled: Vec<f32> = rec.corrections.iter().rev().take(5).map(|c| c.3.correction).collect();
        assert_eq!(settled.len(), 5);
        assert!(settled.iter().all(|&d| d == 0.0), "{settled:?}");
    }

    #[test]
    fn authority_refuses_out_of_range_input() {
        let cheat = |_: ParticipantId, _: BodyId, _: Tick| ControlInput::new(1.5, 0.0);
        let mut session = SessionBuilder::new(lan_config(60), OpenGround, cheat)
            .clients(1)
            .build()
            .unwrap();
        let spawn = *session.authority_copy(BodyId(0)).unwrap().state().unwrap();
        session.run(&mut NoopObserver).unwrap();

        let stats = session.stats();
        assert!(stats.moves_rejected > 0);
        assert_eq!(stats.moves_applied, 0);
        assert_eq!(*session.authority_copy(BodyId(0)).unwrap().state().unwrap(), spawn);

        // Nothing was ever acknowledged, so the predictor still holds every
        // move and has run off on its own.
        let predicted = session.client_copy(ParticipantId(1), BodyId(0)).unwrap();
        assert_eq!(predicted.queue_len(), 60);
        assert!(predicted.state().unwrap().transform.distance(&spawn.transform) > 0.0);
    }

    #[test]
    fn listen_server_drives_its_own_body() {
        let config = SessionConfig { listen_server: true, ..lan_config(60) };
        let mut session = SessionBuilder::new(config, OpenGround, ConstantInput::full_throttle())
            .clients(1)
            .build()
            .unwrap();
        session.run(&mut NoopObserver).unwrap();

        let host = session.authority_copy(BodyId(0)).unwrap();
        assert_eq!(host.role(), Some(Role::AuthorityController));
        assert!(host.state().unwrap().speed() > 0.0);

        let watched = session.client_copy(ParticipantId(1), BodyId(0)).unwrap();
        assert!(watched.state().unwrap().speed() > 0.0);

        // Only the remote client puts moves on the wire.
        let stats = session.stats();
        assert_eq!(stats.moves_sent, 60);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::{Channel, LinkConfig, link};

    proptest! {
        #[test]
        fn lossless_link_delivers_each_packet_once(
            latency in 0.0f64..0.5,
            jitter in 0.0f64..0.2,
            gaps in prop::collection::vec(0u32..30, 1..60),
            seed in any::<u64>(),
        ) {
            let mut l = link(LinkConfig { latency_secs: latency, jitter_secs: jitter, loss: 0.0 }, seed);
            let mut t = 0.0;
            let mut got = Vec::new();
            for (i, g) in gaps.iter().enumerate() {
                t += *g as f64 / 60.0;
                l.send(t, i as u32);
                got.extend(l.receive(t));
            }
            got.extend(l.receive(t + 1.0));
            got.sort_unstable();
            prop_assert_eq!(got, (0..gaps.len() as u32).collect::<Vec<_>>());
            prop_assert_eq!(l.in_flight(), 0);
        }
    }
}
