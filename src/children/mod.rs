//! # Child abstractions and specifications.
//!
//! This module provides the child-related types:
//! - [`Child`] - trait for the body of a supervised process
//! - [`ChildFn`] - closure-backed child
//! - [`ChildRef`] - shared reference to a child (`Arc<dyn Child>`)
//! - [`ChildSpec`] - id + start + restart type, as handed to a supervisor

mod child;
mod child_fn;
mod spec;
mod spec_builder;

pub use child::{BoxChildFuture, Child, ChildRef};
pub use child_fn::ChildFn;
pub use spec::ChildSpec;
pub use spec_builder::ChildSpecBuilder;
