//! Per-tick role dispatch.
//!
//! The host reports two facts about a participant's copy of a body: its
//! [`NetRole`] and whether this participant controls it.  [`Role::resolve`]
//! turns those into one of four roles, and [`Role::strategy`] is the single
//! table mapping each role to what happens on a tick.  Both are evaluated
//! once per tick; nothing else branches on network role.

use kart_core::NetRole;

/// What a participant's copy of a body is, this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Holds the canonical state and is also the controlling player.
    AuthorityController,
    /// Holds the canonical state; a remote client controls the body.
    RemoteAuthority,
    /// Remote client controlling the body; predicts ahead of the authority.
    PredictingController,
    /// Remote client watching a body it neither controls nor owns.
    Observer,
}

/// The work a role performs on one tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Record a move and run it through the authority's validated path.
    RecordAndApply,
    /// Record a move, apply it locally, queue it, send it to the authority.
    PredictAndQueue,
    /// Re-apply the last authority-delivered move.
    ReplayLastMove,
    /// Wait for moves to arrive.
    DoNothing,
}

impl Role {
    /// Map host metadata to a role.  `None` for an unreplicated copy.
    pub fn resolve(net_role: NetRole, locally_controlled: bool) -> Option<Role> {
        match (net_role, locally_controlled) {
            (NetRole::None, _)                => None,
            (NetRole::Authority, true)        => Some(Role::AuthorityController),
            (NetRole::Authority, false)       => Some(Role::RemoteAuthority),
            (NetRole::AutonomousProxy, _)     => Some(Role::PredictingController),
            (NetRole::SimulatedProxy, _)      => Some(Role::Observer),
        }
    }

    /// The dispatch table.
    pub fn strategy(self) -> Strategy {
        match self {
            Role::AuthorityController  => Strategy::RecordAndApply,
            Role::PredictingController => Strategy::PredictAndQueue,
            Role::Observer             => Strategy::ReplayLastMove,
            Role::RemoteAuthority      => Strategy::DoNothing,
        }
    }

    #[inline]
    pub fn is_authority(self) -> bool {
        matches!(self, Role::AuthorityController | Role::RemoteAuthority)
    }

    #[inline]
    pub fn predicts(self) -> bool {
        matches!(self, Role::PredictingController)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::AuthorityController  => "authority-controller",
            Role::RemoteAuthority      => "remote-authority",
            Role::PredictingController => "predicting-controller",
            Role::Observer             => "observer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
