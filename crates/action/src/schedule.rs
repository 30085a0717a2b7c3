//! Scheduling vocabulary: when, relative to what, under which condition,
//! and in which sequence an action runs.

use std::fmt;

use packwright_core::ActionId;
use serde::{Deserialize, Serialize};

/// How the action's outcome affects the install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnHandling {
    /// Synchronous; a failing exit aborts the install. The safe default.
    #[default]
    Check,
    /// Synchronous; the exit code is discarded.
    Ignore,
    /// Asynchronous; the installer waits for completion at the end of the
    /// sequence and checks the exit code.
    AsyncWait,
    /// Asynchronous; the installer never waits and never checks.
    AsyncNoWait,
}

impl ReturnHandling {
    /// Returns `true` if the installer inspects the action's exit code.
    #[must_use]
    pub fn is_checked(self) -> bool {
        matches!(self, Self::Check | Self::AsyncWait)
    }
}

/// Side of the anchor the action is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum When {
    /// Execute before the anchor.
    Before,
    /// Execute after the anchor.
    #[default]
    After,
}

/// Anchor for relative ordering: a standard install phase or another
/// declared action.
///
/// Phases are listed in their canonical execution order; the sequence
/// resolver pre-wires that order into every ordering domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Costing begins.
    CostInitialize,
    /// Costing is complete.
    CostFinalize,
    /// The install script is validated.
    InstallValidate,
    /// The execute phase opens. Default anchor for custom actions.
    InstallInitialize,
    /// Files are copied to the target machine.
    InstallFiles,
    /// The execute phase closes.
    InstallFinalize,
    /// Relative to another declared custom action.
    Action {
        /// Identifier of the anchor action.
        id: ActionId,
    },
}

impl Step {
    /// The standard phases in canonical execution order.
    pub const PHASES: [Step; 6] = [
        Step::CostInitialize,
        Step::CostFinalize,
        Step::InstallValidate,
        Step::InstallInitialize,
        Step::InstallFiles,
        Step::InstallFinalize,
    ];

    /// Anchor on another action.
    #[must_use]
    pub fn action(id: ActionId) -> Self {
        Self::Action { id }
    }

    /// The anchored action id, if this step targets one.
    #[must_use]
    pub fn action_id(&self) -> Option<&ActionId> {
        match self {
            Self::Action { id } => Some(id),
            _ => None,
        }
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::InstallInitialize
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CostInitialize => f.write_str("CostInitialize"),
            Self::CostFinalize => f.write_str("CostFinalize"),
            Self::InstallValidate => f.write_str("InstallValidate"),
            Self::InstallInitialize => f.write_str("InstallInitialize"),
            Self::InstallFiles => f.write_str("InstallFiles"),
            Self::InstallFinalize => f.write_str("InstallFinalize"),
            Self::Action { id } => write!(f, "{id}"),
        }
    }
}

/// Launch condition gating an action at install time.
///
/// Evaluated by the installer, never at build time; the resolver carries
/// the expression verbatim into the emitted row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Always run.
    #[default]
    Always,
    /// Run only when the expression evaluates true on the target machine.
    Expr {
        /// The condition expression, carried verbatim.
        expr: String,
    },
}

impl Condition {
    /// Condition from an expression string.
    pub fn expr(expr: impl Into<String>) -> Self {
        Self::Expr { expr: expr.into() }
    }

    /// The verbatim expression for the emitted row; `None` for `Always`.
    #[must_use]
    pub fn as_expr(&self) -> Option<&str> {
        match self {
            Self::Always => None,
            Self::Expr { expr } => Some(expr),
        }
    }
}

/// The ordering domain (installer table) an action belongs to.
///
/// Relative-ordering edges are meaningful only within one domain; a `Step`
/// reference crossing domains is a build-time error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sequence {
    /// The execute phase of a normal install.
    #[default]
    InstallExecute,
    /// The interactive UI phase.
    InstallUi,
    /// The execute phase of an administrative install.
    AdminExecute,
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstallExecute => f.write_str("InstallExecuteSequence"),
            Self::InstallUi => f.write_str("InstallUISequence"),
            Self::AdminExecute => f.write_str("AdminExecuteSequence"),
        }
    }
}

/// Execution scheduling mode within the installer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    /// Runs immediately as the sequence is processed, impersonating the
    /// invoking user.
    Immediate,
    /// Queued into the install script and run during the transaction,
    /// elevated by default. The default for managed actions, which
    /// typically need to touch protected locations.
    Deferred,
    /// Runs only when the transaction rolls back.
    Rollback,
    /// Runs after the transaction commits.
    Commit,
}

impl Execution {
    /// Returns `true` for modes that run inside the elevated install
    /// transaction (deferred, rollback, commit).
    #[must_use]
    pub fn is_in_transaction(self) -> bool {
        !matches!(self, Self::Immediate)
    }
}

impl Default for Execution {
    fn default() -> Self {
        Self::Deferred
    }
}
