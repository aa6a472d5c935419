//! # Supervisor: the restart state machine.
//!
//! A [`Supervisor`] spawns its children, waits for them to terminate, and restarts
//! them according to its [`RestartStrategy`](crate::RestartStrategy) and each child's
//! [`RestartType`](crate::RestartType), until a termination arrives sooner than the
//! restart-frequency ceiling allows.
//!
//! ## State machine
//! ```text
//!   SPAWNING ──► GUARD_WAIT ──(child first)──► FATAL  → Err(RestartFrequencyExceeded)
//!                  ▲   │
//!                  │   └──(timer first)──► TERMINATION_WAIT
//!                  │                              │ (one child terminated)
//!                  └──── APPLYING_STRATEGY ◄──────┘
//!
//!   any wait ──(ctx cancelled)──► cancel running children, wait up to `grace` → Ok(())
//! ```
//!
//! - `SPAWNING`: every child is spawned once, in input order.
//! - `GUARD_WAIT`: live children race a fresh `max_t / max_r` timer.
//! - `TERMINATION_WAIT`: live children race each other, no timer.
//! - `APPLYING_STRATEGY`: cancel / respawn / retire as planned by `core::strategy`.
//! - `FATAL`: no further spawn or cancel is issued; the registry is dropped, and with
//!   it every handle (the tokio runtime reaps dropped handles after its grace period).
//!
//! The registry lives on the stack of [`Supervisor::init`]; nothing else ever sees it.
//!
//! ## Nesting
//! [`Supervisor::start_link`] wraps a supervisor into a [`ChildSpec`], so it can be
//! supervised by another one. A nested supervisor's fatal error is its termination as
//! a child, which the outer supervisor then handles like any other.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use oversight::{ChildError, ChildSpec, RestartStrategy, Supervisor, SupervisorFlags};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let worker = ChildSpec::builder("worker").build(|ctx: CancellationToken| async move {
//!         ctx.cancelled().await;
//!         Ok::<_, ChildError>(())
//!     });
//!
//!     let sup = Supervisor::builder(SupervisorFlags::default().with_strategy(RestartStrategy::OneForOne))
//!         .with_name("root")
//!         .with_child(worker)
//!         .build()?;
//!
//!     let token = CancellationToken::new();
//!     let stop = token.clone();
//!     tokio::spawn(async move {
//!         tokio::time::sleep(Duration::from_millis(10)).await;
//!         stop.cancel();
//!     });
//!
//!     sup.init(token).await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use futures::future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::children::{BoxChildFuture, Child, ChildSpec};
use crate::core::builder::SupervisorBuilder;
use crate::core::config::SupervisorConfig;
use crate::core::guard::{FrequencyGuard, Verdict};
use crate::core::race::next_termination;
use crate::core::registry::Registry;
use crate::core::shutdown;
use crate::core::strategy::{self, Action};
use crate::error::{ChildError, SupervisorError};
use crate::events::{Bus, Event, EventKind};
use crate::policies::SupervisorFlags;
use crate::runtime::{Runtime, TokioRuntime};

/// Loop states after `SPAWNING`.
#[derive(Clone, Copy, Debug)]
enum State {
    GuardWait,
    TerminationWait,
    Applying(usize),
}

/// Supervises a fixed set of children with a restart strategy and a restart-frequency ceiling.
pub struct Supervisor<R: Runtime = TokioRuntime> {
    cfg: SupervisorConfig,
    flags: SupervisorFlags,
    children: Vec<ChildSpec>,
    runtime: R,
    bus: Bus,
}

impl Supervisor<TokioRuntime> {
    /// Starts building a supervisor backed by [`TokioRuntime`].
    pub fn builder(flags: SupervisorFlags) -> SupervisorBuilder<TokioRuntime> {
        SupervisorBuilder::new(flags)
    }
}

impl<R: Runtime> Supervisor<R> {
    pub(crate) fn new_internal(
        cfg: SupervisorConfig,
        flags: SupervisorFlags,
        children: Vec<ChildSpec>,
        runtime: R,
        bus: Bus,
    ) -> Self {
        Self {
            cfg,
            flags,
            children,
            runtime,
            bus,
        }
    }

    /// Supervisor name (from [`SupervisorConfig::name`]).
    pub fn name(&self) -> &str {
        &self.cfg.name
    }

    /// Restart strategy and frequency ceiling.
    pub fn flags(&self) -> &SupervisorFlags {
        &self.flags
    }

    /// Child specifications, in spawn order.
    pub fn children(&self) -> &[ChildSpec] {
        &self.children
    }

    /// Event bus this supervisor publishes to.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Spawns all children and supervises them.
    ///
    /// Runs until either:
    /// - a child terminates before the minimum restart interval elapsed
    ///   → `Err(`[`SupervisorError::RestartFrequencyExceeded`]`)`, or
    /// - `ctx` is cancelled → every running child is cancelled and given up to
    ///   [`SupervisorConfig::grace`] to exit, then `Ok(())`.
    ///
    /// Each call owns a fresh registry, so a supervisor can be (re)started any number
    /// of times, which is what happens when it is nested via [`start_link`](Self::start_link).
    pub async fn init(&self, ctx: CancellationToken) -> Result<(), SupervisorError> {
        let rt = &self.runtime;
        let guard = FrequencyGuard::new(&self.flags);

        let mut registry = Registry::spawn_all(rt, &self.children);
        for child in registry.iter() {
            self.publish_child(EventKind::ChildSpawned, child.shared_id(), child.generation());
        }
        debug!(
            supervisor = %self.cfg.name,
            children = registry.len(),
            strategy = self.flags.strategy.as_label(),
            interval = ?guard.interval(),
            "supervisor started"
        );
        self.publish(Event::new(EventKind::SupervisorStarted));

        let mut state = State::GuardWait;
        loop {
            state = match state {
                State::GuardWait => {
                    let verdict = tokio::select! {
                        _ = ctx.cancelled() => None,
                        verdict = guard.wait(rt, &mut registry) => Some(verdict),
                    };
                    match verdict {
                        None => break,
                        Some(Verdict::Safe) => State::TerminationWait,
                        Some(Verdict::Tripped(index)) => {
                            return Err(self.give_up(&registry, index, guard.interval()));
                        }
                    }
                }
                State::TerminationWait => {
                    let terminated = tokio::select! {
                        _ = ctx.cancelled() => None,
                        index = next_termination(registry.joins(rt)) => Some(index),
                    };
                    match terminated {
                        None => break,
                        Some(index) => State::Applying(index),
                    }
                }
                State::Applying(index) => {
                    self.apply(rt, &mut registry, index);
                    State::GuardWait
                }
            };
        }

        self.stop(rt, &mut registry).await;
        Ok(())
    }

    /// Runs [`init`](Self::init) until a termination signal (SIGINT/SIGTERM/SIGQUIT, Ctrl-C)
    /// arrives, then shuts down gracefully.
    ///
    /// If signal handlers cannot be installed, the supervisor keeps running until it fails.
    pub async fn run(&self) -> Result<(), SupervisorError> {
        self.run_until(shutdown::wait_for_shutdown_signal()).await
    }

    /// [`init`](Self::init) under a token that `signal` cancels once it resolves with `Ok`.
    async fn run_until<S>(&self, signal: S) -> Result<(), SupervisorError>
    where
        S: Future<Output = std::io::Result<&'static str>>,
    {
        let token = CancellationToken::new();
        let on_signal = async {
            match signal.await {
                Ok(signal) => {
                    info!(supervisor = %self.cfg.name, signal, "termination signal received");
                    token.cancel();
                }
                Err(e) => {
                    warn!(supervisor = %self.cfg.name, error = %e, "cannot listen for termination signals");
                }
            }
            future::pending::<()>().await
        };

        tokio::select! {
            res = self.init(token.clone()) => res,
            () = on_signal => Ok(()),
        }
    }

    /// Wraps this supervisor into a permanent child specification with the given id,
    /// so that another supervisor can start, watch and restart it.
    ///
    /// Use [`ChildSpec::with_restart`] on the result for a temporary link.
    pub fn start_link(self: &Arc<Self>, id: impl Into<Arc<str>>) -> ChildSpec {
        let id = id.into();
        debug!(supervisor = %self.cfg.name, child = %id, "linking supervisor as a child");
        ChildSpec::permanent(id, Arc::new(Link(Arc::clone(self))))
    }

    /// Publishes the termination of `index` and the fatal error; returns the error.
    fn give_up(&self, registry: &Registry<R>, index: usize, interval: Duration) -> SupervisorError {
        let child = registry.get(index);
        self.publish_child(EventKind::ChildTerminated, child.shared_id(), child.generation());

        let err = SupervisorError::RestartFrequencyExceeded {
            supervisor: Arc::clone(&self.cfg.name),
            child: child.shared_id(),
            interval,
        };
        error!(
            supervisor = %self.cfg.name,
            child = child.id(),
            generation = child.generation(),
            interval = ?interval,
            "restart frequency limit reached"
        );
        self.publish(
            Event::new(EventKind::RestartFrequencyExceeded)
                .with_child(child.shared_id())
                .with_reason(err.to_string()),
        );
        err
    }

    /// Reacts to the termination of `terminated` according to the strategy.
    fn apply(&self, rt: &R, registry: &mut Registry<R>, terminated: usize) {
        let child = registry.get(terminated);
        debug!(
            supervisor = %self.cfg.name,
            child = child.id(),
            generation = child.generation(),
            "child terminated"
        );
        self.publish_child(EventKind::ChildTerminated, child.shared_id(), child.generation());

        for action in strategy::plan(self.flags.strategy, &registry.standings(), terminated) {
            match action {
                Action::Cancel(index) => {
                    if registry.cancel(rt, index) {
                        let child = registry.get(index);
                        debug!(supervisor = %self.cfg.name, child = child.id(), "sibling cancelled");
                        self.publish_child(EventKind::ChildCancelled, child.shared_id(), child.generation());
                    }
                }
                Action::Respawn(index) => {
                    if let Some(generation) = registry.respawn(rt, index) {
                        self.publish_child(EventKind::ChildSpawned, registry.get(index).shared_id(), generation);
                    }
                }
                Action::Retire(index) => {
                    registry.retire(index);
                    let child = registry.get(index);
                    warn!(supervisor = %self.cfg.name, child = child.id(), "temporary child retired");
                    self.publish_child(EventKind::ChildRetired, child.shared_id(), child.generation());
                }
            }
        }
    }

    /// Cancels every running child after a shutdown request and waits up to `grace`
    /// for them to exit.
    async fn stop(&self, rt: &R, registry: &mut Registry<R>) {
        info!(supervisor = %self.cfg.name, "shutdown requested");
        self.publish(Event::new(EventKind::ShutdownRequested));

        for index in 0..registry.len() {
            if registry.cancel(rt, index) {
                let child = registry.get(index);
                self.publish_child(EventKind::ChildCancelled, child.shared_id(), child.generation());
            }
        }

        let grace = self.cfg.grace;
        let exited = future::join_all(registry.joins(rt).into_iter().map(|(_, join)| join));
        tokio::select! {
            biased;
            _ = exited => debug!(supervisor = %self.cfg.name, "children stopped within grace"),
            () = rt.delay(grace) => {
                warn!(supervisor = %self.cfg.name, grace = ?grace, "children still running after grace");
            }
        }

        self.publish(Event::new(EventKind::SupervisorStopped));
    }

    fn publish(&self, ev: Event) {
        self.bus.publish(ev.with_supervisor(Arc::clone(&self.cfg.name)));
    }

    fn publish_child(&self, kind: EventKind, id: Arc<str>, generation: u32) {
        self.publish(Event::new(kind).with_child(id).with_generation(generation));
    }
}

/// A supervisor acting as the start function of a child.
struct Link<R: Runtime>(Arc<Supervisor<R>>);

impl<R: Runtime> Child for Link<R> {
    fn start(&self, ctx: CancellationToken) -> BoxChildFuture {
        let sup = Arc::clone(&self.0);
        Box::pin(async move { sup.init(ctx).await.map_err(ChildError::from) })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use futures::future::BoxFuture;
    use tokio::sync::broadcast;

    use super::*;
    use crate::runtime::TokioHandle;
    use crate::{ChildFn, ChildRef, RestartStrategy, RestartType, Subscribe};

    /// Child whose n-th start lives `script[n]` ms (`None`, or past the end: until cancelled).
    fn scripted(starts: &Arc<AtomicUsize>, script: &'static [Option<u64>]) -> ChildRef {
        let starts = Arc::clone(starts);
        ChildFn::arc(move |ctx: CancellationToken| {
            let n = starts.fetch_add(1, Ordering::SeqCst);
            let life = script.get(n).copied().flatten();
            async move {
                match life {
                    Some(0) => Ok(()),
                    Some(ms) => {
                        tokio::time::sleep(Duration::from_millis(ms)).await;
                        Err(ChildError::fail("crashed"))
                    }
                    None => {
                        ctx.cancelled().await;
                        Err(ChildError::Canceled)
                    }
                }
            }
        })
    }

    fn flags(strategy: RestartStrategy, max_r: u32, max_t_ms: u64) -> SupervisorFlags {
        SupervisorFlags::default()
            .with_strategy(strategy)
            .with_max_r(max_r)
            .with_max_t(Duration::from_millis(max_t_ms))
    }

    /// Runs `init` for `period` of (paused) time, then cancels it.
    async fn run_for<R: Runtime>(sup: &Arc<Supervisor<R>>, period: Duration) -> Result<(), SupervisorError> {
        let token = CancellationToken::new();
        let task = tokio::spawn({
            let sup = Arc::clone(sup);
            let token = token.clone();
            async move { sup.init(token).await }
        });
        tokio::time::sleep(period).await;
        token.cancel();
        task.await.expect("supervisor task panicked")
    }

    /// Renders received events as `"<kind> <child>#<generation>"`.
    fn drain(rx: &mut broadcast::Receiver<Event>, supervisor: &str) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if ev.supervisor.as_deref() != Some(supervisor) {
                continue;
            }
            let mut line = ev.kind.as_label().to_string();
            if let Some(child) = &ev.child {
                line.push(' ');
                line.push_str(child);
            }
            if let Some(generation) = ev.generation {
                line.push_str(&format!("#{generation}"));
            }
            out.push(line);
        }
        out
    }

    /// Delegates to [`TokioRuntime`] and records every spawn and cancel.
    #[derive(Clone, Default)]
    struct Recording {
        inner: TokioRuntime,
        ops: Arc<Mutex<Vec<String>>>,
    }

    impl Recording {
        fn ops(&self) -> Vec<String> {
            self.ops.lock().unwrap().clone()
        }
    }

    impl Runtime for Recording {
        type Handle = (Arc<str>, TokioHandle);

        fn spawn(&self, child: &ChildSpec) -> Self::Handle {
            self.ops.lock().unwrap().push(format!("spawn {}", child.id()));
            (child.shared_id(), self.inner.spawn(child))
        }

        fn join<'a>(&'a self, handle: &'a mut Self::Handle) -> BoxFuture<'a, ()> {
            self.inner.join(&mut handle.1)
        }

        fn cancel(&self, handle: &Self::Handle) {
            self.ops.lock().unwrap().push(format!("cancel {}", handle.0));
            self.inner.cancel(&handle.1);
        }

        fn delay(&self, period: Duration) -> BoxFuture<'static, ()> {
            self.inner.delay(period)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn init_spawns_each_child_once_in_order() {
        let rec = Recording::default();
        let starts = Arc::new(AtomicUsize::new(0));
        let sup = Supervisor::builder(SupervisorFlags::default())
            .with_runtime(rec.clone())
            .with_child(ChildSpec::permanent("c", scripted(&starts, &[])))
            .with_child(ChildSpec::temporary("a", scripted(&starts, &[])))
            .with_child(ChildSpec::permanent("b", scripted(&starts, &[])))
            .build()
            .unwrap();

        run_for(&sup, Duration::from_secs(3)).await.unwrap();

        assert_eq!(
            rec.ops(),
            vec!["spawn c", "spawn a", "spawn b", "cancel c", "cancel a", "cancel b"]
        );
        assert_eq!(starts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_child_is_respawned_once() {
        let starts = Arc::new(AtomicUsize::new(0));
        let sup = Supervisor::builder(flags(RestartStrategy::OneForOne, 1, 1000))
            .with_name("sup")
            .with_child(ChildSpec::permanent("0", scripted(&starts, &[Some(1500)])))
            .build()
            .unwrap();
        let mut rx = sup.bus().subscribe();

        run_for(&sup, Duration::from_secs(5)).await.unwrap();

        assert_eq!(
            drain(&mut rx, "sup"),
            vec![
                "child_spawned 0#1",
                "supervisor_started",
                "child_terminated 0#1",
                "child_spawned 0#2",
                "shutdown_requested",
                "child_cancelled 0#2",
                "supervisor_stopped",
            ]
        );
        assert_eq!(starts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn temporary_child_is_retired_and_never_raced_again() {
        let rec = Recording::default();
        let starts = Arc::new(AtomicUsize::new(0));
        let sup = Supervisor::builder(SupervisorFlags::default())
            .with_name("sup")
            .with_runtime(rec.clone())
            .with_child(ChildSpec::temporary("0", scripted(&starts, &[Some(1500)])))
            .build()
            .unwrap();
        let mut rx = sup.bus().subscribe();

        run_for(&sup, Duration::from_secs(10)).await.unwrap();

        assert_eq!(
            drain(&mut rx, "sup"),
            vec![
                "child_spawned 0#1",
                "supervisor_started",
                "child_terminated 0#1",
                "child_retired 0#1",
                "shutdown_requested",
                "supervisor_stopped",
            ]
        );
        assert_eq!(rec.ops(), vec!["spawn 0"]);
        assert_eq!(starts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn early_second_termination_is_fatal() {
        let rec = Recording::default();
        let starts = Arc::new(AtomicUsize::new(0));
        let sup = Supervisor::builder(flags(RestartStrategy::OneForOne, 1, 1))
            .with_name("sup")
            .with_runtime(rec.clone())
            .with_child(ChildSpec::permanent("0", scripted(&starts, &[Some(5), Some(0)])))
            .build()
            .unwrap();
        let mut rx = sup.bus().subscribe();

        let err = run_for(&sup, Duration::from_secs(1)).await.unwrap_err();

        match err {
            SupervisorError::RestartFrequencyExceeded {
                supervisor,
                child,
                interval,
            } => {
                assert_eq!(&*supervisor, "sup");
                assert_eq!(&*child, "0");
                assert_eq!(interval, Duration::from_millis(1));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            drain(&mut rx, "sup"),
            vec![
                "child_spawned 0#1",
                "supervisor_started",
                "child_terminated 0#1",
                "child_spawned 0#2",
                "child_terminated 0#2",
                "restart_frequency_exceeded 0",
            ]
        );
        // no spawn or cancel after the trip
        assert_eq!(rec.ops(), vec!["spawn 0", "spawn 0"]);
        assert_eq!(starts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn one_for_one_leaves_siblings_alone() {
        let rec = Recording::default();
        let (a, b) = (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)));
        let sup = Supervisor::builder(flags(RestartStrategy::OneForOne, 1, 1000))
            .with_runtime(rec.clone())
            .with_child(ChildSpec::permanent("first", scripted(&a, &[Some(1500)])))
            .with_child(ChildSpec::permanent("second", scripted(&b, &[Some(3000)])))
            .build()
            .unwrap();

        run_for(&sup, Duration::from_secs(6)).await.unwrap();

        assert_eq!(
            rec.ops(),
            vec![
                "spawn first",
                "spawn second",
                "spawn first",
                "spawn second",
                "cancel first",
                "cancel second",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn any_sibling_can_trip_the_limit() {
        let (a, b) = (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)));
        let sup = Supervisor::builder(flags(RestartStrategy::OneForOne, 1, 1000))
            .with_child(ChildSpec::permanent("first", scripted(&a, &[Some(1500)])))
            .with_child(ChildSpec::permanent("second", scripted(&b, &[Some(1800)])))
            .build()
            .unwrap();

        let err = run_for(&sup, Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(
            err,
            SupervisorError::RestartFrequencyExceeded { ref child, .. } if &**child == "second"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn spacing_scales_with_max_r() {
        let starts = Arc::new(AtomicUsize::new(0));
        let sup = Supervisor::builder(flags(RestartStrategy::OneForOne, 4, 1000))
            .with_child(ChildSpec::permanent(
                "0",
                scripted(&starts, &[Some(300), Some(300), Some(300)]),
            ))
            .build()
            .unwrap();

        run_for(&sup, Duration::from_secs(3)).await.unwrap();
        assert_eq!(starts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn one_for_many_cancels_then_respawns_everyone() {
        let rec = Recording::default();
        let (a, b) = (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)));
        let sup = Supervisor::builder(flags(RestartStrategy::OneForMany, 1, 1000))
            .with_name("sup")
            .with_runtime(rec.clone())
            .with_child(ChildSpec::permanent("first", scripted(&a, &[Some(1500)])))
            .with_child(ChildSpec::permanent("second", scripted(&b, &[])))
            .build()
            .unwrap();
        let mut rx = sup.bus().subscribe();

        run_for(&sup, Duration::from_secs(5)).await.unwrap();

        assert_eq!(
            rec.ops(),
            vec![
                "spawn first",
                "spawn second",
                "cancel second",
                "spawn first",
                "spawn second",
                "cancel first",
                "cancel second",
            ]
        );
        let events = drain(&mut rx, "sup");
        assert_eq!(
            &events[3..7],
            [
                "child_terminated first#1",
                "child_cancelled second#1",
                "child_spawned first#2",
                "child_spawned second#2",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn one_for_many_retires_temporary_siblings() {
        let rec = Recording::default();
        let (a, b) = (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)));
        let sup = Supervisor::builder(flags(RestartStrategy::OneForMany, 1, 1000))
            .with_name("sup")
            .with_runtime(rec.clone())
            .with_child(ChildSpec::permanent("first", scripted(&a, &[Some(1500)])))
            .with_child(ChildSpec::temporary("second", scripted(&b, &[])))
            .build()
            .unwrap();
        let mut rx = sup.bus().subscribe();

        run_for(&sup, Duration::from_secs(5)).await.unwrap();

        assert_eq!(
            rec.ops(),
            vec!["spawn first", "spawn second", "cancel second", "spawn first", "cancel first"]
        );
        assert!(drain(&mut rx, "sup").contains(&"child_retired second#1".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn nested_supervisor_is_restarted_by_its_parent() {
        let bus = Bus::new(256);
        let starts = Arc::new(AtomicUsize::new(0));
        let inner = Supervisor::builder(flags(RestartStrategy::OneForOne, 1, 1000))
            .with_name("inner")
            .with_bus(bus.clone())
            .with_child(ChildSpec::permanent("leaf", scripted(&starts, &[Some(1500), Some(0)])))
            .build()
            .unwrap();
        let outer = Supervisor::builder(flags(RestartStrategy::OneForOne, 1, 1000))
            .with_name("outer")
            .with_bus(bus.clone())
            .with_child(inner.start_link("inner"))
            .build()
            .unwrap();
        let mut rx = bus.subscribe();

        run_for(&outer, Duration::from_secs(5)).await.unwrap();

        assert_eq!(
            drain(&mut rx, "outer"),
            vec![
                "child_spawned inner#1",
                "supervisor_started",
                "child_terminated inner#1",
                "child_spawned inner#2",
                "shutdown_requested",
                "child_cancelled inner#2",
                "supervisor_stopped",
            ]
        );
        // leaf: crash, immediate exit (inner gives up), then the restarted inner's leaf
        assert_eq!(starts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn nested_failure_escalates() -> anyhow::Result<()> {
        let starts = Arc::new(AtomicUsize::new(0));
        let inner = Supervisor::builder(flags(RestartStrategy::OneForOne, 1, 1))
            .with_name("inner")
            .with_child(ChildSpec::permanent("leaf", scripted(&starts, &[Some(5), Some(0)])))
            .build()?;
        let outer = Supervisor::builder(SupervisorFlags::default())
            .with_name("outer")
            .with_child(inner.start_link("inner"))
            .build()?;

        let err = run_for(&outer, Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(
            err,
            SupervisorError::RestartFrequencyExceeded { ref supervisor, ref child, .. }
                if &**supervisor == "outer" && &**child == "inner"
        ));
        assert!(err.is_fatal());
        Ok(())
    }

    /// Child that, once cancelled, takes `cleanup_ms` before raising `done`.
    fn slow_to_stop(done: &Arc<AtomicBool>, cleanup_ms: u64) -> ChildRef {
        let done = Arc::clone(done);
        ChildFn::arc(move |ctx: CancellationToken| {
            let done = Arc::clone(&done);
            async move {
                ctx.cancelled().await;
                tokio::time::sleep(Duration::from_millis(cleanup_ms)).await;
                done.store(true, Ordering::SeqCst);
                Err(ChildError::Canceled)
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn nested_supervisor_stops_gracefully_with_its_parent() {
        let bus = Bus::new(256);
        let observed = Arc::new(AtomicBool::new(false));
        let inner = Supervisor::builder(SupervisorFlags::default())
            .with_name("inner")
            .with_bus(bus.clone())
            .with_child(ChildSpec::permanent("leaf", slow_to_stop(&observed, 0)))
            .build()
            .unwrap();
        let outer = Supervisor::builder(SupervisorFlags::default())
            .with_name("outer")
            .with_bus(bus.clone())
            .with_child(inner.start_link("inner"))
            .build()
            .unwrap();
        let mut rx = bus.subscribe();

        run_for(&outer, Duration::from_secs(2)).await.unwrap();

        let events: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        let inner_events: Vec<String> = events
            .iter()
            .filter(|ev| ev.supervisor.as_deref() == Some("inner"))
            .map(|ev| ev.kind.as_label().to_string())
            .collect();
        assert_eq!(
            inner_events,
            vec![
                "child_spawned",
                "supervisor_started",
                "shutdown_requested",
                "child_cancelled",
                "supervisor_stopped",
            ]
        );
        assert!(observed.load(Ordering::SeqCst));

        // the inner supervisor finishes its own stop before the outer one reports stopped
        let position = |sup: &str, kind: EventKind| {
            events
                .iter()
                .position(|ev| ev.supervisor.as_deref() == Some(sup) && ev.kind == kind)
                .unwrap()
        };
        assert!(
            position("inner", EventKind::SupervisorStopped) < position("outer", EventKind::SupervisorStopped)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stop_waits_for_children_within_grace() {
        let done = Arc::new(AtomicBool::new(false));
        let sup = Supervisor::builder(SupervisorFlags::default())
            .with_grace(Duration::from_secs(1))
            .with_child(ChildSpec::permanent("0", slow_to_stop(&done, 300)))
            .build()
            .unwrap();

        let token = CancellationToken::new();
        let task = tokio::spawn({
            let sup = Arc::clone(&sup);
            let token = token.clone();
            async move { sup.init(token).await }
        });
        tokio::time::sleep(Duration::from_secs(2)).await;
        let cancelled_at = tokio::time::Instant::now();
        token.cancel();
        task.await.unwrap().unwrap();

        assert!(done.load(Ordering::SeqCst));
        let waited = cancelled_at.elapsed();
        assert!(waited >= Duration::from_millis(300) && waited < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_gives_up_waiting_after_grace() {
        let done = Arc::new(AtomicBool::new(false));
        let sup = Supervisor::builder(SupervisorFlags::default())
            .with_grace(Duration::from_millis(200))
            .with_child(ChildSpec::permanent("0", slow_to_stop(&done, 10_000)))
            .build()
            .unwrap();

        let token = CancellationToken::new();
        let task = tokio::spawn({
            let sup = Arc::clone(&sup);
            let token = token.clone();
            async move { sup.init(token).await }
        });
        tokio::time::sleep(Duration::from_secs(2)).await;
        let cancelled_at = tokio::time::Instant::now();
        token.cancel();
        task.await.unwrap().unwrap();

        let waited = cancelled_at.elapsed();
        assert!(waited >= Duration::from_millis(200) && waited < Duration::from_secs(1));
        assert!(!done.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn run_until_stops_on_signal() {
        let starts = Arc::new(AtomicUsize::new(0));
        let sup = Supervisor::builder(SupervisorFlags::default())
            .with_name("sup")
            .with_child(ChildSpec::permanent("0", scripted(&starts, &[])))
            .build()
            .unwrap();
        let mut rx = sup.bus().subscribe();

        let signal = async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Ok::<_, std::io::Error>("SIGTERM")
        };
        sup.run_until(signal).await.unwrap();

        let events = drain(&mut rx, "sup");
        assert_eq!(events.last().map(String::as_str), Some("supervisor_stopped"));
        assert!(events.contains(&"child_cancelled 0#1".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn run_until_keeps_supervising_without_signals() {
        let starts = Arc::new(AtomicUsize::new(0));
        let sup = Supervisor::builder(flags(RestartStrategy::OneForOne, 1, 1))
            .with_child(ChildSpec::permanent("0", scripted(&starts, &[Some(5), Some(0)])))
            .build()
            .unwrap();

        let signal = async { Err::<&'static str, _>(std::io::Error::other("no signal handlers")) };
        let err = sup.run_until(signal).await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[derive(Default)]
    struct Collect(tokio::sync::Mutex<Vec<EventKind>>);

    #[async_trait]
    impl Subscribe for Collect {
        async fn on_event(&self, ev: &Event) {
            self.0.lock().await.push(ev.kind);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_receive_lifecycle_events() {
        let collect = Arc::new(Collect::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![collect.clone()];
        let starts = Arc::new(AtomicUsize::new(0));
        let sup = Supervisor::builder(SupervisorFlags::default())
            .with_subscribers(subs)
            .with_child(ChildSpec::permanent("0", scripted(&starts, &[])))
            .build()
            .unwrap();

        run_for(&sup, Duration::from_secs(2)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let seen = collect.0.lock().await.clone();
        assert_eq!(
            seen,
            vec![
                EventKind::ChildSpawned,
                EventKind::SupervisorStarted,
                EventKind::ShutdownRequested,
                EventKind::ChildCancelled,
                EventKind::SupervisorStopped,
            ]
        );
    }

    #[test]
    fn build_rejects_duplicate_ids() {
        let starts = Arc::new(AtomicUsize::new(0));
        let res = Supervisor::builder(SupervisorFlags::default())
            .with_child(ChildSpec::permanent("0", scripted(&starts, &[])))
            .with_child(ChildSpec::new("0", scripted(&starts, &[]), RestartType::Temporary))
            .build();
        assert!(matches!(res, Err(SupervisorError::DuplicateChild { ref id }) if &**id == "0"));
    }

    #[test]
    fn build_rejects_zero_max_r() {
        let res = Supervisor::builder(SupervisorFlags::default().with_max_r(0)).build();
        assert!(matches!(res, Err(SupervisorError::InvalidFlags { .. })));
    }
}
