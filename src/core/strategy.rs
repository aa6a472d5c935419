//! # Strategy applier: which children to cancel, respawn or retire.
//!
//! Pure decision logic; the supervisor loop executes the returned actions in order.
//!
//! ```text
//! OneForOne,  terminated = t:
//!     [Respawn(t)]                      if t is permanent
//!     [Retire(t)]                       if t is temporary
//!
//! OneForMany, terminated = t:
//!     Cancel(i)   for every live i != t           (restart type does not matter)
//!     then, for every live i in registry order:
//!         Respawn(i) if permanent, Retire(i) if temporary
//! ```
//!
//! Entries already retired are skipped entirely.

use crate::policies::{RestartStrategy, RestartType};

/// What the strategy needs to know about one registry entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Standing {
    pub(crate) restart: RestartType,
    pub(crate) retired: bool,
}

/// One registry mutation, addressed by registry index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Cancel(usize),
    Respawn(usize),
    Retire(usize),
}

/// Plans the reaction to the termination of child `terminated`.
pub(crate) fn plan(strategy: RestartStrategy, children: &[Standing], terminated: usize) -> Vec<Action> {
    match strategy {
        RestartStrategy::OneForOne => match children.get(terminated) {
            Some(child) if !child.retired => vec![settle(terminated, child)],
            _ => Vec::new(),
        },
        RestartStrategy::OneForMany => {
            let live = || children.iter().enumerate().filter(|(_, c)| !c.retired);

            let cancels = live()
                .filter(|(i, _)| *i != terminated)
                .map(|(i, _)| Action::Cancel(i));
            let settles = live().map(|(i, c)| settle(i, c));
            cancels.chain(settles).collect()
        }
    }
}

fn settle(index: usize, child: &Standing) -> Action {
    if child.restart.restarts() {
        Action::Respawn(index)
    } else {
        Action::Retire(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERM: Standing = Standing {
        restart: RestartType::Permanent,
        retired: false,
    };
    const TEMP: Standing = Standing {
        restart: RestartType::Temporary,
        retired: false,
    };
    const GONE: Standing = Standing {
        restart: RestartType::Temporary,
        retired: true,
    };

    #[test]
    fn one_for_one_respawns_permanent_only() {
        let plan = plan(RestartStrategy::OneForOne, &[PERM, PERM, TEMP], 1);
        assert_eq!(plan, vec![Action::Respawn(1)]);
    }

    #[test]
    fn one_for_one_retires_temporary() {
        let plan = plan(RestartStrategy::OneForOne, &[PERM, TEMP], 1);
        assert_eq!(plan, vec![Action::Retire(1)]);
    }

    #[test]
    fn one_for_many_cancels_before_respawning() {
        let plan = plan(RestartStrategy::OneForMany, &[PERM, PERM], 0);
        assert_eq!(
            plan,
            vec![Action::Cancel(1), Action::Respawn(0), Action::Respawn(1)]
        );
    }

    #[test]
    fn one_for_many_retires_temporary_siblings() {
        let plan = plan(RestartStrategy::OneForMany, &[TEMP, PERM, TEMP], 1);
        assert_eq!(
            plan,
            vec![
                Action::Cancel(0),
                Action::Cancel(2),
                Action::Retire(0),
                Action::Respawn(1),
                Action::Retire(2),
            ]
        );
    }

    #[test]
    fn one_for_many_skips_tombstones() {
        let plan = plan(RestartStrategy::OneForMany, &[GONE, PERM, PERM], 2);
        assert_eq!(
            plan,
            vec![Action::Cancel(1), Action::Respawn(1), Action::Respawn(2)]
        );
    }

    #[test]
    fn retired_trigger_is_ignored() {
        assert!(plan(RestartStrategy::OneForOne, &[GONE], 0).is_empty());
    }
}
