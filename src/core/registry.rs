//! # Child registry: the supervisor's view of its children.
//!
//! The registry is owned by one running supervisor loop and never shared: no lock,
//! no other writer. Entries keep the input order of the child specifications.
//!
//! ## Entry lifecycle
//! ```text
//! spawn_all ──► Running(handle, gen=1)
//!                 ├─► respawn ──► Running(new handle, gen+1)
//!                 └─► retire  ──► Retired (tombstone: id kept, never raced or respawned)
//! ```
//!
//! ## Rules
//! - At most one handle per child; `respawn` replaces it.
//! - `retire` drops the handle without cancelling (the process already stopped).
//! - A retired entry is final.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::debug;

use crate::children::ChildSpec;
use crate::core::strategy::Standing;
use crate::runtime::Runtime;

/// Current state of one child.
enum Slot<H> {
    /// Process running (or terminated but not yet observed).
    Running(H),
    /// Removed from supervision for good.
    Retired,
}

/// One registry entry.
pub(crate) struct ChildRuntime<R: Runtime> {
    spec: ChildSpec,
    slot: Slot<R::Handle>,
    generation: u32,
}

impl<R: Runtime> ChildRuntime<R> {
    pub(crate) fn id(&self) -> &str {
        self.spec.id()
    }

    pub(crate) fn shared_id(&self) -> Arc<str> {
        self.spec.shared_id()
    }

    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }

    pub(crate) fn is_terminated(&self) -> bool {
        matches!(self.slot, Slot::Retired)
    }
}

/// Ordered set of supervised children.
pub(crate) struct Registry<R: Runtime> {
    children: Vec<ChildRuntime<R>>,
}

impl<R: Runtime> Registry<R> {
    /// Spawns every child in input order and builds the registry.
    pub(crate) fn spawn_all(rt: &R, specs: &[ChildSpec]) -> Self {
        let children = specs
            .iter()
            .map(|spec| {
                let handle = rt.spawn(spec);
                debug!(child = spec.id(), generation = 1, "child spawned");
                ChildRuntime {
                    spec: spec.clone(),
                    slot: Slot::Running(handle),
                    generation: 1,
                }
            })
            .collect();
        Self { children }
    }

    pub(crate) fn get(&self, index: usize) -> &ChildRuntime<R> {
        &self.children[index]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ChildRuntime<R>> {
        self.children.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.children.len()
    }

    /// Number of children still under supervision.
    pub(crate) fn active(&self) -> usize {
        self.children.iter().filter(|c| !c.is_terminated()).count()
    }

    /// Restart type and terminated flag of every entry, in registry order.
    pub(crate) fn standings(&self) -> Vec<Standing> {
        self.children
            .iter()
            .map(|c| Standing {
                restart: c.spec.restart(),
                retired: c.is_terminated(),
            })
            .collect()
    }

    /// Replaces the handle of `index` with a freshly spawned one; returns the new generation.
    ///
    /// A retired entry is left untouched.
    pub(crate) fn respawn(&mut self, rt: &R, index: usize) -> Option<u32> {
        let child = &mut self.children[index];
        if child.is_terminated() {
            return None;
        }
        child.slot = Slot::Running(rt.spawn(&child.spec));
        child.generation += 1;
        debug!(child = child.id(), generation = child.generation, "child respawned");
        Some(child.generation)
    }

    /// Marks `index` terminated for good, dropping its handle.
    pub(crate) fn retire(&mut self, index: usize) {
        let child = &mut self.children[index];
        child.slot = Slot::Retired;
        debug!(child = child.id(), generation = child.generation, "child retired");
    }

    /// Issues a cancel on the running handle of `index`; returns false for a retired entry.
    pub(crate) fn cancel(&self, rt: &R, index: usize) -> bool {
        match &self.children[index].slot {
            Slot::Running(handle) => {
                rt.cancel(handle);
                true
            }
            Slot::Retired => false,
        }
    }

    /// Join futures of all non-terminated children, keyed by registry index.
    pub(crate) fn joins<'a>(&'a mut self, rt: &'a R) -> Vec<(usize, BoxFuture<'a, ()>)> {
        self.children
            .iter_mut()
            .enumerate()
            .filter_map(|(index, child)| match &mut child.slot {
                Slot::Running(handle) => Some((index, rt.join(handle))),
                Slot::Retired => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::policies::RestartType;
    use crate::runtime::TokioRuntime;
    use crate::{ChildError, ChildFn};

    fn idle(id: &'static str, restart: RestartType) -> ChildSpec {
        ChildSpec::new(
            id,
            ChildFn::arc(|ctx: CancellationToken| async move {
                ctx.cancelled().await;
                Ok::<_, ChildError>(())
            }),
            restart,
        )
    }

    #[tokio::test]
    async fn spawn_all_keeps_input_order() {
        let rt = TokioRuntime::new();
        let specs = vec![
            idle("b", RestartType::Permanent),
            idle("a", RestartType::Temporary),
            idle("c", RestartType::Permanent),
        ];
        let reg = Registry::spawn_all(&rt, &specs);

        let ids: Vec<&str> = reg.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert!(reg.iter().all(|c| c.generation() == 1 && !c.is_terminated()));
        assert_eq!(reg.active(), 3);
    }

    #[tokio::test]
    async fn respawn_bumps_generation() {
        let rt = TokioRuntime::new();
        let mut reg = Registry::spawn_all(&rt, &[idle("a", RestartType::Permanent)]);
        assert_eq!(reg.respawn(&rt, 0), Some(2));
        assert_eq!(reg.respawn(&rt, 0), Some(3));
        assert_eq!(reg.get(0).generation(), 3);
    }

    #[tokio::test]
    async fn retired_entry_is_final() {
        let rt = TokioRuntime::new();
        let mut reg = Registry::spawn_all(
            &rt,
            &[idle("a", RestartType::Temporary), idle("b", RestartType::Permanent)],
        );
        reg.retire(0);

        assert!(reg.get(0).is_terminated());
        assert_eq!(reg.respawn(&rt, 0), None);
        assert!(!reg.cancel(&rt, 0));
        assert_eq!(reg.active(), 1);
        assert_eq!(reg.len(), 2);

        let joins = reg.joins(&rt);
        let indices: Vec<usize> = joins.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_makes_join_resolve() {
        let rt = TokioRuntime::new();
        let mut reg = Registry::spawn_all(&rt, &[idle("a", RestartType::Permanent)]);
        assert!(reg.cancel(&rt, 0));

        let mut joins = reg.joins(&rt);
        let (_, join) = joins.remove(0);
        tokio::time::timeout(Duration::from_secs(1), join)
            .await
            .expect("cancelled child should terminate");
    }
}
