//! Plain data row types written by trace backends.

use kart_core::NetRole;

/// One participant's copy of one body at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyStateRow {
    pub tick:        u64,
    pub participant: u32,
    pub body:        u32,
    pub role:        NetRole,
    /// Host units.
    pub x:           f32,
    pub y:           f32,
    pub z:           f32,
    /// Radians.
    pub yaw:         f32,
    /// Metres per second.
    pub speed:       f32,
    /// Unacknowledged moves; zero for non-predicting copies.
    pub queue_len:   u32,
}

/// One reconciliation by a predicting participant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionRow {
    pub tick:        u64,
    pub participant: u32,
    pub body:        u32,
    pub pruned:      u32,
    pub replayed:    u32,
    /// Host units the prediction moved.
    pub correction:  f32,
}
