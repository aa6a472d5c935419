use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    children::ChildSpec,
    error::SupervisorError,
    events::Bus,
    policies::SupervisorFlags,
    runtime::{Runtime, TokioRuntime},
    subscribers::{Subscribe, SubscriberSet},
};

use super::{config::SupervisorConfig, supervisor::Supervisor};

/// Builder for constructing a [`Supervisor`].
pub struct SupervisorBuilder<R: Runtime = TokioRuntime> {
    flags: SupervisorFlags,
    cfg: SupervisorConfig,
    children: Vec<ChildSpec>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    bus: Option<Bus>,
    runtime: R,
}

impl SupervisorBuilder<TokioRuntime> {
    /// Creates a new builder with the given restart policy and default configuration.
    pub fn new(flags: SupervisorFlags) -> Self {
        Self {
            flags,
            cfg: SupervisorConfig::default(),
            children: Vec::new(),
            subscribers: Vec::new(),
            bus: None,
            runtime: TokioRuntime::new(),
        }
    }
}

impl<R: Runtime> SupervisorBuilder<R> {
    /// Replaces the runtime configuration.
    pub fn with_config(mut self, cfg: SupervisorConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the supervisor name used in events and logs.
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.cfg.name = name.into();
        self
    }

    /// Sets how long a graceful stop waits for cancelled children.
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.cfg.grace = grace;
        self
    }

    /// Appends one child; children are spawned in the order they are added.
    pub fn with_child(mut self, child: ChildSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Appends several children, keeping their order.
    pub fn with_children(mut self, children: impl IntoIterator<Item = ChildSpec>) -> Self {
        self.children.extend(children);
        self
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive the events of this supervisor (not those of nested supervisors
    /// sharing its bus) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Publishes to an existing bus instead of creating one.
    ///
    /// Sharing a bus lets nested supervisors report through a single stream.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Swaps the runtime that spawns, joins and cancels children.
    pub fn with_runtime<R2: Runtime>(self, runtime: R2) -> SupervisorBuilder<R2> {
        SupervisorBuilder {
            flags: self.flags,
            cfg: self.cfg,
            children: self.children,
            subscribers: self.subscribers,
            bus: self.bus,
            runtime,
        }
    }

    /// Validates the configuration and builds the supervisor.
    ///
    /// # Errors
    /// - [`SupervisorError::InvalidFlags`] if `max_r` is zero;
    /// - [`SupervisorError::DuplicateChild`] if two children share an id.
    ///
    /// When subscribers are configured, a listener task is spawned, so this must then
    /// be called from within a tokio runtime.
    pub fn build(self) -> Result<Arc<Supervisor<R>>, SupervisorError> {
        self.flags.validate()?;

        let mut seen = HashSet::with_capacity(self.children.len());
        for child in &self.children {
            if !seen.insert(child.id()) {
                return Err(SupervisorError::DuplicateChild {
                    id: child.shared_id(),
                });
            }
        }

        let bus = self
            .bus
            .unwrap_or_else(|| Bus::new(self.cfg.bus_capacity_clamped()));
        if !self.subscribers.is_empty() {
            // detached: ends once every clone of the bus is dropped
            let _ = SubscriberSet::new(self.subscribers).listen(bus.subscribe(), Arc::clone(&self.cfg.name));
        }

        Ok(Arc::new(Supervisor::new_internal(
            self.cfg,
            self.flags,
            self.children,
            self.runtime,
            bus,
        )))
    }
}
