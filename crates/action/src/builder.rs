//! Fluent builder producing fully-populated action descriptors.

use std::path::PathBuf;

use packwright_core::{ActionId, IdAllocator};

use crate::assembly::{AssemblySource, RefAssemblies};
use crate::descriptor::{ActionDescriptor, ActionKind};
use crate::schedule::{Condition, Execution, ReturnHandling, Sequence, Step, When};

/// A builder that accumulates the subset of configuration the caller cares
/// about and defaults the rest, so every [`ActionDescriptor`] comes out
/// fully and consistently populated.
///
/// Defaults: `return_handling = Check`, `when = After`,
/// `step = InstallInitialize`, `condition = Always`,
/// `sequence = InstallExecute`, `execution = Deferred`,
/// `impersonate = false`, and for managed actions
/// `assembly = BuildOutput` with no reference assemblies. Deferred and
/// non-impersonated is deliberate: a managed action left impersonated when
/// it needs elevation fails at install time on a locked-down target, and
/// that failure must not be reproducible from default construction.
#[derive(Debug, Clone)]
pub struct ActionBuilder {
    id: Option<ActionId>,
    name: String,
    return_handling: ReturnHandling,
    when: When,
    step: Step,
    condition: Condition,
    sequence: Sequence,
    execution: Execution,
    impersonate: bool,
    kind: ActionKind,
}

impl ActionBuilder {
    fn with_kind(name: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            id: None,
            name: name.into(),
            return_handling: ReturnHandling::default(),
            when: When::default(),
            step: Step::default(),
            condition: Condition::default(),
            sequence: Sequence::default(),
            execution: Execution::default(),
            impersonate: false,
            kind,
        }
    }

    /// Start a managed action bound to `method` in the build's own output.
    #[must_use]
    pub fn managed(name: impl Into<String>, method: impl Into<String>) -> Self {
        Self::with_kind(
            name,
            ActionKind::Managed {
                method_name: method.into(),
                assembly: AssemblySource::BuildOutput,
                ref_assemblies: RefAssemblies::new(),
            },
        )
    }

    /// Start a native action.
    #[must_use]
    pub fn native(name: impl Into<String>) -> Self {
        Self::with_kind(name, ActionKind::Native)
    }

    /// Supply an explicit identifier instead of an allocator-generated one.
    #[must_use]
    pub fn with_id(mut self, id: ActionId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set how the action's outcome affects the install.
    #[must_use]
    pub fn with_return(mut self, ret: ReturnHandling) -> Self {
        self.return_handling = ret;
        self
    }

    /// Place the action before or after its anchor.
    #[must_use]
    pub fn with_when(mut self, when: When) -> Self {
        self.when = when;
        self
    }

    /// Set the ordering anchor.
    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.step = step;
        self
    }

    /// Set the launch condition.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Set the ordering domain.
    #[must_use]
    pub fn with_sequence(mut self, sequence: Sequence) -> Self {
        self.sequence = sequence;
        self
    }

    /// Set the scheduling tuple in one call.
    #[must_use]
    pub fn scheduled(self, ret: ReturnHandling, when: When, step: Step, condition: Condition) -> Self {
        self.with_return(ret)
            .with_when(when)
            .with_step(step)
            .with_condition(condition)
    }

    /// Override the execution mode.
    #[must_use]
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Run with the invoking user's privileges instead of the elevated
    /// install context. Rejected by the resolver for in-transaction modes.
    #[must_use]
    pub fn impersonated(mut self) -> Self {
        self.impersonate = true;
        self
    }

    /// Bind the managed action to an explicit assembly path instead of the
    /// build's own output. No effect on native actions.
    #[must_use]
    pub fn with_assembly(mut self, source: AssemblySource) -> Self {
        if let ActionKind::Managed { assembly, .. } = &mut self.kind {
            *assembly = source;
        }
        self
    }

    /// Add one reference assembly. No effect on native actions.
    #[must_use]
    pub fn with_ref_assembly(mut self, path: impl Into<PathBuf>) -> Self {
        if let ActionKind::Managed { ref_assemblies, .. } = &mut self.kind {
            ref_assemblies.insert(path);
        }
        self
    }

    /// Add several reference assemblies in order. No effect on native
    /// actions.
    #[must_use]
    pub fn with_ref_assemblies<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        if let ActionKind::Managed { ref_assemblies, .. } = &mut self.kind {
            for path in paths {
                ref_assemblies.insert(path);
            }
        }
        self
    }

    /// Consume the builder and stamp identity.
    ///
    /// The allocator is consulted only when no explicit id was supplied.
    /// No field is validated here — configuration may be assembled
    /// incrementally across a script before any assembly exists, so all
    /// checking is deferred to the sequence resolver.
    #[must_use]
    pub fn build(self, allocator: &IdAllocator) -> ActionDescriptor {
        let id = match self.id {
            Some(id) => id,
            None => allocator.allocate(&self.name),
        };
        ActionDescriptor {
            id,
            name: self.name,
            return_handling: self.return_handling,
            when: self.when,
            step: self.step,
            condition: self.condition,
            sequence: self.sequence,
            execution: self.execution,
            impersonate: self.impersonate,
            kind: self.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn default_managed_construction() {
        let alloc = IdAllocator::new();
        let action = ActionBuilder::managed("Validate", "Execute").build(&alloc);

        assert_eq!(action.id, "Action1_Validate");
        assert_eq!(action.name, "Validate");
        assert_eq!(action.return_handling, ReturnHandling::Check);
        assert_eq!(action.when, When::After);
        assert_eq!(action.step, Step::InstallInitialize);
        assert_eq!(action.condition, Condition::Always);
        assert_eq!(action.sequence, Sequence::InstallExecute);
        assert_eq!(action.execution, Execution::Deferred);
        assert!(!action.impersonate);
        match &action.kind {
            ActionKind::Managed {
                method_name,
                assembly,
                ref_assemblies,
            } => {
                assert_eq!(method_name, "Execute");
                assert!(assembly.is_build_output());
                assert!(ref_assemblies.is_empty());
            }
            ActionKind::Native => panic!("expected managed"),
        }
    }

    #[test]
    fn generated_names_differ_only_by_counter() {
        let alloc = IdAllocator::new();
        let first = ActionBuilder::managed("Validate", "Execute").build(&alloc);
        let second = ActionBuilder::managed("Validate", "Execute").build(&alloc);
        assert_eq!(first.id, "Action1_Validate");
        assert_eq!(second.id, "Action2_Validate");
    }

    #[test]
    fn counter_is_shared_across_kinds() {
        let alloc = IdAllocator::new();
        let managed = ActionBuilder::managed("A", "Run").build(&alloc);
        let native = ActionBuilder::native("B").build(&alloc);
        assert_eq!(managed.id, "Action1_A");
        assert_eq!(native.id, "Action2_B");
    }

    #[test]
    fn explicit_id_bypasses_allocator() {
        let alloc = IdAllocator::new();
        let action = ActionBuilder::managed("Setup", "Run")
            .with_id(ActionId::explicit("SetupAction"))
            .build(&alloc);
        assert_eq!(action.id, "SetupAction");
        // Allocator untouched.
        assert_eq!(alloc.peek(), 1);
    }

    #[test]
    fn explicit_configuration_reads_back_unmodified() {
        let alloc = IdAllocator::new();
        let action = ActionBuilder::managed("Configure", "Apply")
            .with_id(ActionId::explicit("Cfg"))
            .scheduled(
                ReturnHandling::Ignore,
                When::Before,
                Step::InstallFinalize,
                Condition::expr("NOT Installed"),
            )
            .with_sequence(Sequence::InstallUi)
            .with_assembly(AssemblySource::path("deps/Cfg.dll"))
            .with_ref_assemblies(["a.dll", "b.dll"])
            .build(&alloc);

        assert_eq!(action.id, "Cfg");
        assert_eq!(action.name, "Configure");
        assert_eq!(action.return_handling, ReturnHandling::Ignore);
        assert_eq!(action.when, When::Before);
        assert_eq!(action.step, Step::InstallFinalize);
        assert_eq!(action.condition, Condition::expr("NOT Installed"));
        assert_eq!(action.sequence, Sequence::InstallUi);
        match &action.kind {
            ActionKind::Managed {
                assembly,
                ref_assemblies,
                ..
            } => {
                assert_eq!(assembly, &AssemblySource::path("deps/Cfg.dll"));
                assert_eq!(ref_assemblies.len(), 2);
            }
            ActionKind::Native => panic!("expected managed"),
        }
    }

    #[rstest]
    #[case(Sequence::InstallExecute)]
    #[case(Sequence::InstallUi)]
    #[case(Sequence::AdminExecute)]
    fn equivalent_configuration_is_deterministic(#[case] sequence: Sequence) {
        let build = || {
            ActionBuilder::managed("Same", "Run")
                .with_sequence(sequence)
                .with_condition(Condition::expr("Installed"))
                .build(&IdAllocator::new())
        };
        let a = build();
        let b = build();
        // Field-for-field identical, id included, because both allocators
        // were seeded identically.
        assert_eq!(a, b);
    }

    #[test]
    fn assembly_setters_ignore_native_actions() {
        let alloc = IdAllocator::new();
        let action = ActionBuilder::native("Script")
            .with_assembly(AssemblySource::path("x.dll"))
            .with_ref_assembly("y.dll")
            .build(&alloc);
        assert_eq!(action.kind, ActionKind::Native);
    }

    #[test]
    fn no_validation_at_construction() {
        // Empty method name and a nonexistent path are accepted; the
        // resolver owns diagnosis.
        let alloc = IdAllocator::new();
        let action = ActionBuilder::managed("Broken", "")
            .with_assembly(AssemblySource::path("does/not/exist.dll"))
            .build(&alloc);
        assert_eq!(action.kind.method_name(), Some(""));
    }
}
