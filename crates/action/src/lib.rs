#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Packwright Action
//!
//! Custom-action descriptors for installer package authoring.
//!
//! A script front end declares install-time actions through
//! [`ActionBuilder`], which defaults every field the caller leaves unset
//! and stamps identity via [`packwright_core::IdAllocator`]. The result is
//! an [`ActionDescriptor`] — a read-only value the sequence resolver turns
//! into ordered rows for the package renderer. This crate provides:
//!
//! - [`ActionDescriptor`] and the [`ActionKind`] variant (native vs managed)
//! - The scheduling vocabulary: [`ReturnHandling`], [`When`], [`Step`],
//!   [`Condition`], [`Sequence`], [`Execution`]
//! - [`AssemblySource`] / [`RefAssemblies`] for managed-code binding
//! - [`ActionBuilder`] for fluent, default-filling construction

pub mod assembly;
pub mod builder;
pub mod descriptor;
pub mod schedule;

pub use assembly::{AssemblySource, BUILD_OUTPUT_SENTINEL, RefAssemblies};
pub use builder::ActionBuilder;
pub use descriptor::{ActionDescriptor, ActionKind};
pub use schedule::{Condition, Execution, ReturnHandling, Sequence, Step, When};
