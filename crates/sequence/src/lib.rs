#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Packwright Sequence
//!
//! Ordering resolution for declared custom actions — the contract handed to
//! the package renderer.
//!
//! Declared [`ActionDescriptor`](packwright_action::ActionDescriptor)s are
//! validated as a set, partitioned into independent ordering domains,
//! topologically sorted (one `petgraph` DAG per domain, install phases
//! pre-wired), bound to their assemblies through an [`AssemblyResolver`],
//! and emitted as [`SequenceRow`]s. Every diagnosis happens here at build
//! time; a plan that resolves cleanly cannot fail ordering at install time.
//!
//! - [`SequencePlan`] / [`SequenceRow`] — the resolved output
//! - [`OrderingGraph`] — per-domain DAG with cycle reporting
//! - [`validate_actions`] — comprehensive multi-error validation
//! - [`AssemblyResolver`] / [`FsResolver`] — the packaging seam
//! - [`SequenceError`] — the build-time error taxonomy

pub mod error;
pub mod graph;
pub mod plan;
pub mod resolve;
pub mod validate;

pub use error::SequenceError;
pub use graph::{OrderingGraph, SequenceNode};
pub use plan::{SequencePlan, SequenceRow};
pub use resolve::{AssemblyResolver, FsResolver};
pub use validate::validate_actions;
