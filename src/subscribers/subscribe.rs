//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers into a
//! supervisor. Each subscriber is driven by a dedicated worker loop fed by a bounded
//! queue that is owned by the supervisor's subscriber set.
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching, retries); they do **not** block
//!   the supervisor nor other subscribers.
//! - Each subscriber **declares** its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. If a queue overflows, events for that
//!   subscriber are **dropped** (warn).

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
///
/// # Example
/// ```rust
/// use async_trait::async_trait;
/// use oversight::{Event, EventKind, Subscribe};
///
/// struct RestartCounter;
///
/// #[async_trait]
/// impl Subscribe for RestartCounter {
///     async fn on_event(&self, ev: &Event) {
///         if ev.kind == EventKind::ChildSpawned && ev.generation > Some(1) {
///             // bump a metric...
///         }
///     }
///     fn name(&self) -> &'static str { "restart-counter" }
/// }
/// ```
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
