//! The finalized action value handed to the renderer.

use packwright_core::ActionId;
use serde::{Deserialize, Serialize};

use crate::assembly::{AssemblySource, RefAssemblies};
use crate::schedule::{Condition, Execution, ReturnHandling, Sequence, Step, When};

/// A fully populated custom-action descriptor.
///
/// Built once by [`ActionBuilder`](crate::ActionBuilder), then read-only
/// from the renderer's perspective. Construction performs no validation —
/// empty method names, nonexistent assembly paths, and contradictory
/// scheduling are all accepted here and diagnosed by the sequence resolver,
/// where the whole action set is visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Unique identifier, explicit or allocator-generated.
    pub id: ActionId,
    /// The caller's logical name, kept for display and diagnostics.
    pub name: String,
    /// How the action's outcome affects the install.
    pub return_handling: ReturnHandling,
    /// Side of the anchor the action is placed on.
    pub when: When,
    /// The anchor the ordering is relative to.
    pub step: Step,
    /// Launch condition, evaluated by the installer at run time.
    pub condition: Condition,
    /// Ordering domain the action belongs to.
    pub sequence: Sequence,
    /// Scheduling mode within the installer session.
    pub execution: Execution,
    /// Whether the action runs with the invoking user's privileges.
    ///
    /// Must stay `false` for in-transaction (elevated) execution; the
    /// resolver rejects the combination.
    pub impersonate: bool,
    /// What code the action runs.
    pub kind: ActionKind,
}

impl ActionDescriptor {
    /// Returns `true` if this descriptor binds managed code.
    #[must_use]
    pub fn is_managed(&self) -> bool {
        matches!(self.kind, ActionKind::Managed { .. })
    }

    /// Returns `true` if the elevated-execution and impersonation settings
    /// contradict each other.
    #[must_use]
    pub fn has_elevation_conflict(&self) -> bool {
        self.execution.is_in_transaction() && self.impersonate
    }
}

/// Discriminant for what code an action runs.
///
/// A tagged variant instead of a type hierarchy so the renderer can match
/// exhaustively on kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    /// Native script or binary supplied outside this model.
    Native,
    /// A managed-code entry point.
    Managed {
        /// Entry-point method name; must exist in the bound assembly with
        /// the action signature. Checked by the resolver, not here.
        method_name: String,
        /// Where the implementing assembly comes from.
        assembly: AssemblySource,
        /// Extra assemblies copied alongside the action binary.
        ref_assemblies: RefAssemblies,
    },
}

impl ActionKind {
    /// The managed entry-point method name, if any.
    #[must_use]
    pub fn method_name(&self) -> Option<&str> {
        match self {
            Self::Native => None,
            Self::Managed { method_name, .. } => Some(method_name),
        }
    }

    /// The bound assembly source, if this is a managed action.
    #[must_use]
    pub fn assembly(&self) -> Option<&AssemblySource> {
        match self {
            Self::Native => None,
            Self::Managed { assembly, .. } => Some(assembly),
        }
    }
}
