//! Resolution of a declared action set into ordered sequence rows.

use std::collections::HashMap;

use indexmap::IndexMap;
use packwright_action::{
    ActionDescriptor, ActionKind, Condition, Execution, ReturnHandling, Sequence,
};
use packwright_core::ActionId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SequenceError;
use crate::graph::OrderingGraph;
use crate::resolve::AssemblyResolver;
use crate::validate::{partition_by_sequence, validate_actions};

/// One emitted row: everything the renderer needs to write an action into
/// its native table format.
///
/// The source column carries the resolved assembly for managed actions and
/// the target column the entry-point method; native actions leave both
/// empty for the renderer's own binding. The condition expression is
/// carried verbatim from the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRow {
    /// The action's unique identifier.
    pub id: ActionId,
    /// The author's logical name, for display and diagnostics.
    pub name: String,
    /// Resolved assembly path, display form. `None` for native actions.
    pub source: Option<String>,
    /// Entry-point method name. `None` for native actions.
    pub target: Option<String>,
    /// How the action's outcome affects the install.
    pub return_handling: ReturnHandling,
    /// Scheduling mode within the installer session.
    pub execution: Execution,
    /// Whether the action impersonates the invoking user.
    pub impersonate: bool,
    /// Verbatim launch-condition expression; `None` means always run.
    pub condition: Option<String>,
    /// 1-based position within the owning sequence domain.
    pub position: u32,
}

/// The fully resolved plan: per-domain ordered rows, ready for the
/// renderer to translate into installer tables.
#[derive(Debug, Clone, Default)]
pub struct SequencePlan {
    domains: IndexMap<Sequence, Vec<SequenceRow>>,
}

impl SequencePlan {
    /// Resolve declared actions into ordered rows.
    ///
    /// Validates the set structurally (duplicates, anchors, elevation,
    /// cycles), topologically sorts each ordering domain, resolves every
    /// managed binding through `resolver`, and emits rows in final order.
    /// All failures found are returned together; nothing is reported at
    /// install time if this step passes.
    pub fn resolve(
        actions: &[ActionDescriptor],
        resolver: &dyn AssemblyResolver,
    ) -> Result<Self, Vec<SequenceError>> {
        let mut errors = validate_actions(actions);

        let by_id: HashMap<&ActionId, &ActionDescriptor> =
            actions.iter().map(|a| (&a.id, a)).collect();

        let mut domains = IndexMap::new();
        for (sequence, members) in partition_by_sequence(actions) {
            let graph = OrderingGraph::build(sequence, &members);
            let order = match graph.sorted_actions() {
                Ok(order) => order,
                // Cycle already collected by validate_actions.
                Err(_) => continue,
            };

            let mut rows = Vec::with_capacity(order.len());
            for (position, id) in (1u32..).zip(order) {
                let action = by_id[&id];
                match row_for(action, resolver, position) {
                    Ok(row) => rows.push(row),
                    Err(err) => errors.push(err),
                }
            }
            debug!(
                sequence = %sequence,
                rows = rows.len(),
                "resolved ordering domain"
            );
            domains.insert(sequence, rows);
        }

        if errors.is_empty() {
            Ok(Self { domains })
        } else {
            Err(errors)
        }
    }

    /// Rows for one ordering domain, in emission order.
    #[must_use]
    pub fn rows(&self, sequence: Sequence) -> &[SequenceRow] {
        self.domains
            .get(&sequence)
            .map_or(&[], Vec::as_slice)
    }

    /// Iterate domains in the order they first appeared in the declaration.
    pub fn iter(&self) -> impl Iterator<Item = (Sequence, &[SequenceRow])> {
        self.domains
            .iter()
            .map(|(seq, rows)| (*seq, rows.as_slice()))
    }

    /// Total number of emitted rows across all domains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.domains.values().map(Vec::len).sum()
    }

    /// Returns `true` if no rows were emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Emit one row, resolving the managed binding if there is one.
fn row_for(
    action: &ActionDescriptor,
    resolver: &dyn AssemblyResolver,
    position: u32,
) -> Result<SequenceRow, SequenceError> {
    let (source, target) = match &action.kind {
        ActionKind::Native => (None, None),
        ActionKind::Managed {
            method_name,
            assembly,
            ..
        } => {
            let Some(path) = resolver.resolve(assembly) else {
                return Err(SequenceError::UnresolvedAssembly {
                    action: action.id.clone(),
                    assembly: assembly.to_string(),
                });
            };
            if !resolver.has_method(&path, method_name) {
                return Err(SequenceError::MissingMethod {
                    action: action.id.clone(),
                    method: method_name.clone(),
                    assembly: path,
                });
            }
            (
                Some(path.display().to_string()),
                Some(method_name.clone()),
            )
        }
    };

    Ok(SequenceRow {
        id: action.id.clone(),
        name: action.name.clone(),
        source,
        target,
        return_handling: action.return_handling,
        execution: action.execution,
        impersonate: action.impersonate,
        condition: match &action.condition {
            Condition::Always => None,
            Condition::Expr { expr } => Some(expr.clone()),
        },
        position,
    })
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use packwright_action::{ActionBuilder, AssemblySource, Step, When};
    use packwright_core::IdAllocator;
    use pretty_assertions::assert_eq;

    use super::*;

    /// In-memory resolver: every source resolves, method lookup consults a
    /// fixed allow-list.
    struct StubResolver {
        methods: Vec<&'static str>,
    }

    impl StubResolver {
        fn allowing(methods: &[&'static str]) -> Self {
            Self {
                methods: methods.to_vec(),
            }
        }
    }

    impl AssemblyResolver for StubResolver {
        fn resolve(&self, source: &AssemblySource) -> Option<PathBuf> {
            Some(match source {
                AssemblySource::BuildOutput => PathBuf::from("out/setup.dll"),
                AssemblySource::Path { path } => path.clone(),
            })
        }

        fn has_method(&self, _assembly: &Path, method: &str) -> bool {
            self.methods.contains(&method)
        }
    }

    /// Resolver that fails every explicit path.
    struct SentinelOnlyResolver;

    impl AssemblyResolver for SentinelOnlyResolver {
        fn resolve(&self, source: &AssemblySource) -> Option<PathBuf> {
            source
                .is_build_output()
                .then(|| PathBuf::from("out/setup.dll"))
        }

        fn has_method(&self, _assembly: &Path, _method: &str) -> bool {
            true
        }
    }

    #[test]
    fn resolves_default_managed_actions_in_declaration_friendly_order() {
        let alloc = IdAllocator::new();
        let actions = vec![
            ActionBuilder::managed("First", "Execute").build(&alloc),
            ActionBuilder::managed("Second", "Execute").build(&alloc),
        ];
        let plan =
            SequencePlan::resolve(&actions, &StubResolver::allowing(&["Execute"])).unwrap();

        let rows = plan.rows(Sequence::InstallExecute);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[1].position, 2);
        for row in rows {
            assert_eq!(row.source.as_deref(), Some("out/setup.dll"));
            assert_eq!(row.target.as_deref(), Some("Execute"));
            assert_eq!(row.return_handling, ReturnHandling::Check);
            assert_eq!(row.execution, Execution::Deferred);
            assert!(!row.impersonate);
            assert_eq!(row.condition, None);
        }
    }

    #[test]
    fn relative_order_is_honored_in_rows() {
        let alloc = IdAllocator::new();
        let x = ActionBuilder::managed("X", "Execute").build(&alloc);
        let a = ActionBuilder::managed("A", "Execute")
            .with_when(When::Before)
            .with_step(Step::action(x.id.clone()))
            .build(&alloc);
        let b = ActionBuilder::managed("B", "Execute")
            .with_when(When::After)
            .with_step(Step::action(x.id.clone()))
            .build(&alloc);

        let x_id = x.id.clone();
        let a_id = a.id.clone();
        let b_id = b.id.clone();
        let plan = SequencePlan::resolve(&[b, x, a], &StubResolver::allowing(&["Execute"]))
            .unwrap();

        let rows = plan.rows(Sequence::InstallExecute);
        let pos = |id: &ActionId| rows.iter().find(|r| &r.id == id).unwrap().position;
        assert!(pos(&a_id) < pos(&x_id));
        assert!(pos(&x_id) < pos(&b_id));
    }

    #[test]
    fn domains_are_independent() {
        let alloc = IdAllocator::new();
        let exec = ActionBuilder::managed("Exec", "Run").build(&alloc);
        let ui = ActionBuilder::managed("Ui", "Show")
            .with_sequence(Sequence::InstallUi)
            .with_execution(Execution::Immediate)
            .build(&alloc);

        let plan = SequencePlan::resolve(&[exec, ui], &StubResolver::allowing(&["Run", "Show"]))
            .unwrap();

        assert_eq!(plan.rows(Sequence::InstallExecute).len(), 1);
        assert_eq!(plan.rows(Sequence::InstallUi).len(), 1);
        assert_eq!(plan.rows(Sequence::AdminExecute).len(), 0);
        // Positions restart per domain.
        assert_eq!(plan.rows(Sequence::InstallUi)[0].position, 1);
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn condition_expression_is_carried_verbatim() {
        let alloc = IdAllocator::new();
        let action = ActionBuilder::managed("Gated", "Run")
            .with_condition(Condition::expr("NOT Installed AND (UILevel > 3)"))
            .build(&alloc);
        let plan =
            SequencePlan::resolve(&[action], &StubResolver::allowing(&["Run"])).unwrap();
        assert_eq!(
            plan.rows(Sequence::InstallExecute)[0].condition.as_deref(),
            Some("NOT Installed AND (UILevel > 3)")
        );
    }

    #[test]
    fn unresolved_assembly_is_reported_with_the_offending_action() {
        let alloc = IdAllocator::new();
        let action = ActionBuilder::managed("Broken", "Run")
            .with_assembly(AssemblySource::path("missing/dep.dll"))
            .build(&alloc);
        let id = action.id.clone();

        let errors = SequencePlan::resolve(&[action], &SentinelOnlyResolver).unwrap_err();
        assert_eq!(
            errors,
            vec![SequenceError::UnresolvedAssembly {
                action: id,
                assembly: "missing/dep.dll".into(),
            }]
        );
    }

    #[test]
    fn missing_method_is_reported() {
        let alloc = IdAllocator::new();
        let action = ActionBuilder::managed("Broken", "NoSuchMethod").build(&alloc);
        let errors =
            SequencePlan::resolve(&[action], &StubResolver::allowing(&["Execute"])).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, SequenceError::MissingMethod { .. }))
        );
    }

    #[test]
    fn structural_errors_preempt_row_emission() {
        let alloc = IdAllocator::new();
        let a_id = alloc.allocate("A");
        let b_id = alloc.allocate("B");
        let a = ActionBuilder::managed("A", "Run")
            .with_id(a_id.clone())
            .with_when(When::Before)
            .with_step(Step::action(b_id.clone()))
            .build(&alloc);
        let b = ActionBuilder::managed("B", "Run")
            .with_id(b_id)
            .with_when(When::Before)
            .with_step(Step::action(a_id))
            .build(&alloc);

        let errors =
            SequencePlan::resolve(&[a, b], &StubResolver::allowing(&["Run"])).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, SequenceError::CycleDetected { .. }))
        );
    }

    #[test]
    fn native_actions_emit_empty_binding_columns() {
        let alloc = IdAllocator::new();
        let action = ActionBuilder::native("Script").build(&alloc);
        let plan =
            SequencePlan::resolve(&[action], &StubResolver::allowing(&[])).unwrap();
        let row = &plan.rows(Sequence::InstallExecute)[0];
        assert_eq!(row.source, None);
        assert_eq!(row.target, None);
    }

    #[test]
    fn row_serde_roundtrip() {
        let alloc = IdAllocator::new();
        let action = ActionBuilder::managed("Ser", "Run").build(&alloc);
        let plan =
            SequencePlan::resolve(&[action], &StubResolver::allowing(&["Run"])).unwrap();
        let row = &plan.rows(Sequence::InstallExecute)[0];
        let json = serde_json::to_string(row).unwrap();
        let back: SequenceRow = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, row);
    }
}
