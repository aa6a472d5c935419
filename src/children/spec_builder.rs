use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{ChildError, ChildFn, ChildRef, ChildSpec, RestartType};

/// Builder for ChildSpec with fluent API
#[derive(Clone, Debug)]
pub struct ChildSpecBuilder {
    id: Arc<str>,
    restart: RestartType,
}

impl ChildSpecBuilder {
    /// Creates a new builder with the given child id
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            restart: RestartType::default(),
        }
    }

    pub fn with_restart(mut self, restart: RestartType) -> Self {
        self.restart = restart;
        self
    }

    /// Build ChildSpec from a closure
    pub fn build<F, Fut>(self, f: F) -> ChildSpec
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ChildError>> + Send + 'static,
    {
        ChildSpec::new(self.id, ChildFn::arc(f), self.restart)
    }

    /// Build ChildSpec from an existing ChildRef
    pub fn build_from_child(self, child: ChildRef) -> ChildSpec {
        ChildSpec::new(self.id, child, self.restart)
    }
}

impl ChildSpec {
    /// Creates a builder for constructing ChildSpec with fluent API
    pub fn builder(id: impl Into<Arc<str>>) -> ChildSpecBuilder {
        ChildSpecBuilder::new(id)
    }
}
