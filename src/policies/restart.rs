//! # Restart types for supervised children.
//!
//! [`RestartType`] decides what happens to a child after it terminates.
//!
//! - [`RestartType::Permanent`] the child is always respawned (default).
//! - [`RestartType::Temporary`] the child is retired after its first termination.
//!
//! ```text
//! child terminates ──► Permanent  → respawn (same id, next generation)
//!                  └─► Temporary  → retire  (id kept as a tombstone, never raced again)
//! ```
//!
//! Retirement is final: a retired child is never respawned, whatever its type.

/// Per-child policy applied when the child (or, under
/// [`RestartStrategy::OneForMany`](crate::RestartStrategy::OneForMany), a sibling) terminates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RestartType {
    /// Always respawn after termination.
    #[default]
    Permanent,
    /// Never respawn; retire after the first termination.
    Temporary,
}

impl RestartType {
    /// True if a child of this type is respawned after termination.
    #[inline]
    pub fn restarts(self) -> bool {
        matches!(self, RestartType::Permanent)
    }

    /// Returns a short stable label for logs.
    pub fn as_label(self) -> &'static str {
        match self {
            RestartType::Permanent => "permanent",
            RestartType::Temporary => "temporary",
        }
    }
}
