//! Game time model.
//!
//! # Design
//!
//! Every participant advances in fixed ticks.  The authority's clock maps a
//! tick counter to elapsed game seconds:
//!
//!   game_time = tick * tick_duration_secs
//!
//! Move timestamps are read from this clock, so all participants of one
//! session must share the authority's clock (by convention, not by memory).
//! A participant reading its own independent clock would produce timestamps
//! that cannot be compared against the authority's watermark.
//!
//! The tick counter is an integer so it never drifts; only the conversion to
//! seconds is floating point.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TimeSource ────────────────────────────────────────────────────────────────

/// A readable game clock.
///
/// Injected into move recording so that timestamps come from one shared time
/// source per session instead of ambient world state.
pub trait TimeSource {
    /// Current game time in seconds.
    fn now(&self) -> f64;
}

// ── GameClock ─────────────────────────────────────────────────────────────────

/// Fixed-rate game clock owned by the authority.
///
/// `GameClock` is cheap to copy and holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameClock {
    /// Simulated ticks per second.  Default: 60.
    pub tick_rate_hz: u32,
    /// The current tick: advanced by `GameClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl GameClock {
    /// Create a clock at tick 0 running at `tick_rate_hz`.
    pub fn new(tick_rate_hz: u32) -> Self {
        Self {
            tick_rate_hz: tick_rate_hz.max(1),
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Duration of one tick in seconds, as used for a move's `delta_time`.
    #[inline]
    pub fn tick_secs(&self) -> f32 {
        1.0 / self.tick_rate_hz as f32
    }

    /// Elapsed game seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 / self.tick_rate_hz as f64
    }

    /// How many ticks span `secs` seconds? (rounds up)
    #[inline]
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        (secs.max(0.0) * self.tick_rate_hz as f64).ceil() as u64
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(60)
    }
}

impl TimeSource for GameClock {
    #[inline]
    fn now(&self) -> f64 {
        self.elapsed_secs()
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3} s)", self.current_tick, self.elapsed_secs())
    }
}
