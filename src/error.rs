//! Error types used by the supervisor runtime and its children.
//!
//! This module defines two main error enums:
//!
//! - [`SupervisorError`]: errors raised by a supervisor itself.
//! - [`ChildError`]: errors a child body may return.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//!
//! A child's error is informational only: the supervisor treats every termination
//! the same way, whatever the child returned.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// # Errors produced by a supervisor.
///
/// [`SupervisorError::RestartFrequencyExceeded`] is the only runtime failure; the other
/// variants reject an invalid configuration before anything is spawned.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum SupervisorError {
    /// A child terminated before the minimum restart interval elapsed.
    ///
    /// Fatal: the supervisor stops and the error propagates to whatever supervises it.
    #[error("restart frequency limit reached in {supervisor:?}: child {child:?} terminated within {interval:?}")]
    RestartFrequencyExceeded {
        /// Name of the supervisor that gave up.
        supervisor: Arc<str>,
        /// Id of the child whose termination tripped the limit.
        child: Arc<str>,
        /// Minimum spacing between restart cycles (`max_t / max_r`).
        interval: Duration,
    },

    /// Two child specifications share the same id.
    #[error("duplicate child id {id:?}")]
    DuplicateChild {
        /// The repeated id.
        id: Arc<str>,
    },

    /// Supervisor flags are out of range.
    #[error("invalid supervisor flags: {reason}")]
    InvalidFlags {
        /// What is wrong with the flags.
        reason: &'static str,
    },
}

impl SupervisorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use oversight::SupervisorError;
    ///
    /// let err = SupervisorError::InvalidFlags { reason: "max_r must be at least 1" };
    /// assert_eq!(err.as_label(), "supervisor_invalid_flags");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SupervisorError::RestartFrequencyExceeded { .. } => "supervisor_restart_frequency_exceeded",
            SupervisorError::DuplicateChild { .. } => "supervisor_duplicate_child",
            SupervisorError::InvalidFlags { .. } => "supervisor_invalid_flags",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SupervisorError::RestartFrequencyExceeded {
                supervisor,
                child,
                interval,
            } => format!("supervisor={supervisor} child={child} terminated within {interval:?}"),
            SupervisorError::DuplicateChild { id } => format!("child id {id} used more than once"),
            SupervisorError::InvalidFlags { reason } => format!("invalid flags: {reason}"),
        }
    }

    /// True for errors that end a running supervisor (as opposed to rejected configuration).
    pub fn is_fatal(&self) -> bool {
        matches!(self, SupervisorError::RestartFrequencyExceeded { .. })
    }
}

/// # Errors returned by a child body.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ChildError {
    /// The child failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The child observed its cancellation token and stopped.
    #[error("context cancelled")]
    Canceled,
}

impl ChildError {
    /// Convenience constructor for [`ChildError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        ChildError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use oversight::ChildError;
    ///
    /// assert_eq!(ChildError::Canceled.as_label(), "child_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ChildError::Fail { .. } => "child_failed",
            ChildError::Canceled => "child_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ChildError::Fail { error } => format!("error: {error}"),
            ChildError::Canceled => "context cancelled".to_string(),
        }
    }
}

impl From<SupervisorError> for ChildError {
    /// A nested supervisor's failure is its termination as a child.
    fn from(err: SupervisorError) -> Self {
        ChildError::Fail {
            error: err.to_string(),
        }
    }
}
