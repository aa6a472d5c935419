//! # Restart strategies.
//!
//! [`RestartStrategy`] decides which children are affected when one terminates.
//!
//! ```text
//! OneForOne:   [a] [b✗] [c]   →  [a] [b'] [c]      only b is respawned/retired
//! OneForMany:  [a] [b✗] [c]   →  cancel a, c       every sibling is torn down,
//!                                 [a'] [b'] [c']   then each is respawned/retired
//! ```

/// Policy selecting the set of children affected by one termination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RestartStrategy {
    /// Only the terminated child is affected (default).
    #[default]
    OneForOne,
    /// The whole sibling group is cancelled and restarted.
    OneForMany,
}

impl RestartStrategy {
    /// Returns a short stable label for logs.
    pub fn as_label(self) -> &'static str {
        match self {
            RestartStrategy::OneForOne => "one_for_one",
            RestartStrategy::OneForMany => "one_for_many",
        }
    }
}
