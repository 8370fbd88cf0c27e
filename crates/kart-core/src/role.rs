//! Host-side network role of a participant's copy of a body.

/// The role a participant's local copy of a body plays, as reported by the
/// host's connection metadata.
///
/// This is the *label*; the per-tick strategy is chosen from it (plus the
/// "locally controlled" flag) by the role router in `kart-replicate`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NetRole {
    /// Not replicated / not yet assigned.
    #[default]
    None,
    /// This participant holds the canonical state.
    Authority,
    /// A remote client that controls the body and predicts it locally.
    AutonomousProxy,
    /// A remote client that only watches the body.
    SimulatedProxy,
}

impl NetRole {
    /// `true` for the copy that owns the canonical state.
    #[inline]
    pub fn is_authority(self) -> bool {
        matches!(self, NetRole::Authority)
    }

    /// Short label, used in logs and trace columns.
    pub fn as_str(self) -> &'static str {
        match self {
            NetRole::None            => "none",
            NetRole::Authority       => "authority",
            NetRole::AutonomousProxy => "autonomous",
            NetRole::SimulatedProxy  => "simulated",
        }
    }
}

impl std::fmt::Display for NetRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
