//! Sequencing-specific error types.
//!
//! Construction of action descriptors never fails; every diagnosis in this
//! taxonomy is raised at build time by the resolver, where the full action
//! set and the packaging inputs are visible.

use std::path::PathBuf;

use packwright_action::Sequence;
use packwright_core::ActionId;
use thiserror::Error;

/// Errors raised while resolving declared actions into sequence rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// Two actions carry the same identifier. Cannot happen for
    /// allocator-generated ids; explicit ids can collide.
    #[error("duplicate action id: {0}")]
    DuplicateId(ActionId),

    /// A step anchor references an action that was never declared.
    #[error("action {action} is ordered relative to unknown action {step}")]
    UnknownStep {
        /// The action carrying the bad anchor.
        action: ActionId,
        /// The referenced action that does not exist.
        step: ActionId,
    },

    /// A step anchor references the action itself.
    #[error("action {0} is ordered relative to itself")]
    SelfReferentialStep(ActionId),

    /// A step anchor crosses sequence domains. Ordering edges are
    /// meaningless across domains.
    #[error(
        "action {action} in {expected} is ordered relative to {step}, which belongs to {found}"
    )]
    CrossDomainStep {
        /// The action carrying the bad anchor.
        action: ActionId,
        /// The referenced action in the other domain.
        step: ActionId,
        /// The domain of the referencing action.
        expected: Sequence,
        /// The domain the referenced action actually belongs to.
        found: Sequence,
    },

    /// Relative-ordering edges form a cycle within one domain.
    #[error("ordering cycle in {sequence}: {}", .chain.join(" -> "))]
    CycleDetected {
        /// The domain containing the cycle.
        sequence: Sequence,
        /// The members of the cyclic chain, in graph order.
        chain: Vec<String>,
    },

    /// An in-transaction (elevated) action is configured to impersonate
    /// the invoking user. Elevation and impersonation are mutually
    /// exclusive.
    #[error("action {0} is deferred/elevated but configured to impersonate")]
    ElevationConflict(ActionId),

    /// The packaging collaborator could not locate the bound assembly.
    #[error("action {action}: assembly `{assembly}` could not be resolved")]
    UnresolvedAssembly {
        /// The managed action whose binding failed.
        action: ActionId,
        /// The assembly source as written by the author.
        assembly: String,
    },

    /// The bound assembly does not contain the entry-point method.
    #[error("action {action}: method `{method}` not found in `{}`", .assembly.display())]
    MissingMethod {
        /// The managed action whose binding failed.
        action: ActionId,
        /// The missing entry-point method name.
        method: String,
        /// The assembly that was searched.
        assembly: PathBuf,
    },
}
