#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Packwright Core
//!
//! Identity allocation and key types for the Packwright authoring model.
//! This crate provides the fundamental building blocks used by the other
//! Packwright crates:
//!
//! - [`ActionId`] — a string key identifying one declared custom action
//! - [`IdAllocator`] — atomic counter minting `"Action{n}_{name}"` ids
//!
//! ## Usage
//!
//! ```rust
//! use packwright_core::IdAllocator;
//!
//! let alloc = IdAllocator::new();
//! let id = alloc.allocate("Validate");
//! assert_eq!(id.as_str(), "Action1_Validate");
//! ```

pub mod id;

pub use id::{ActionId, IdAllocator};
