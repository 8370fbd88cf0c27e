//! Session configuration.

use kart_core::{GameClock, Tick};
use kart_motion::MotionParams;
use kart_replicate::{MoveLimits, QueuePolicy};

use crate::{SimError, SimResult};

// ── LinkConfig ────────────────────────────────────────────────────────────────

/// Delivery characteristics of every simulated link, in both directions.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkConfig {
    /// One-way base latency in seconds.  Default 0.1.
    pub latency_secs: f64,

    /// Half-width of the uniform jitter added to each packet's latency, in
    /// seconds.  Non-zero jitter can reorder packets.
    pub jitter_secs: f64,

    /// Probability in `[0, 1]` that a packet is dropped.
    pub loss: f64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            latency_secs: 0.1,
            jitter_secs:  0.0,
            loss:         0.0,
        }
    }
}

// ── SessionConfig ─────────────────────────────────────────────────────────────

/// Everything needed to run one reproducible session.
///
/// Typically loaded from a JSON file by the application and then patched
/// with command-line overrides.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Fixed simulation rate.  Each tick's moves carry `1 / tick_rate_hz` as
    /// their delta time.
    pub tick_rate_hz: u32,

    /// Ticks to run.
    pub total_ticks: u64,

    /// How often the authority broadcasts changed bodies.  Default 1 Hz,
    /// deliberately slow so prediction has to carry the client.
    pub broadcast_rate_hz: f64,

    /// Master seed for every link's RNG.
    pub seed: u64,

    /// Observer snapshot cadence in ticks.  0 disables snapshots.
    pub snapshot_interval_ticks: u64,

    /// The authority also controls body 0 as a local player.
    pub listen_server: bool,

    pub link:   LinkConfig,
    pub queue:  QueuePolicy,
    pub limits: MoveLimits,
    pub motion: MotionParams,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz:            60,
            total_ticks:             600,
            broadcast_rate_hz:       1.0,
            seed:                    42,
            snapshot_interval_ticks: 1,
            listen_server:           false,
            link:                    LinkConfig::default(),
            queue:                   QueuePolicy::default(),
            limits:                  MoveLimits::default(),
            motion:                  MotionParams::default(),
        }
    }
}

impl SessionConfig {
    /// The tick at which the session ends (exclusive).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// A clock at tick 0 running at `tick_rate_hz`.
    pub fn make_clock(&self) -> GameClock {
        GameClock::new(self.tick_rate_hz)
    }

    /// Ticks between broadcasts, never less than one.
    pub fn broadcast_interval_ticks(&self) -> u64 {
        self.make_clock().ticks_for_secs(1.0 / self.broadcast_rate_hz).max(1)
    }

    /// Reject settings the session cannot run with.
    pub fn validate(&self) -> SimResult<()> {
        if self.tick_rate_hz == 0 {
            return Err(SimError::Config("tick_rate_hz must be at least 1".into()));
        }
        if !(self.broadcast_rate_hz > 0.0 && self.broadcast_rate_hz.is_finite()) {
            return Err(SimError::Config(format!(
                "broadcast_rate_hz must be positive, got {}",
                self.broadcast_rate_hz
            )));
        }
        if !(self.link.latency_secs >= 0.0 && self.link.latency_secs.is_finite()) {
            return Err(SimError::Config(format!("link latency {} is invalid", self.link.latency_secs)));
        }
        if !(self.link.jitter_secs >= 0.0 && self.link.jitter_secs.is_finite()) {
            return Err(SimError::Config(format!("link jitter {} is invalid", self.link.jitter_secs)));
        }
        if !(0.0..=1.0).contains(&self.link.loss) {
            return Err(SimError::Config(format!("link loss {} is outside [0, 1]", self.link.loss)));
        }
        if self.queue.capacity == 0 {
            return Err(SimError::Config("queue capacity must be at least 1".into()));
        }
        let tick_secs = 1.0 / self.tick_rate_hz as f32;
        if tick_secs > self.limits.max_delta_time {
            return Err(SimError::Config(format!(
                "a {tick_secs} s tick exceeds the {} s move limit; every move would be rejected",
                self.limits.max_delta_time
            )));
        }
        self.motion.validate()?;
        Ok(())
    }
}
