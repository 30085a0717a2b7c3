//! Comprehensive structural validation that collects all errors.

use std::collections::HashMap;

use packwright_action::{ActionDescriptor, Sequence};
use packwright_core::ActionId;

use crate::error::SequenceError;
use crate::graph::OrderingGraph;

/// Validate a declared action set comprehensively.
///
/// Unlike [`SequencePlan::resolve`](crate::SequencePlan::resolve), which
/// fails on the collected set, this function's only job is to find every
/// structural issue it can — duplicate ids, unknown or self-referential or
/// cross-domain anchors, elevation conflicts, ordering cycles — so they can
/// all be reported at once.
#[must_use]
pub fn validate_actions(actions: &[ActionDescriptor]) -> Vec<SequenceError> {
    let mut errors = Vec::new();

    // 1. Duplicate ids. Generated ids cannot collide; explicit ids can.
    let mut domains: HashMap<&ActionId, Sequence> = HashMap::new();
    for action in actions {
        if domains.insert(&action.id, action.sequence).is_some() {
            errors.push(SequenceError::DuplicateId(action.id.clone()));
        }
    }

    // 2. Anchor references: must exist, must not self-reference, must stay
    //    within the action's own ordering domain.
    for action in actions {
        let Some(step_id) = action.step.action_id() else {
            continue;
        };
        if step_id == &action.id {
            errors.push(SequenceError::SelfReferentialStep(action.id.clone()));
            continue;
        }
        match domains.get(step_id) {
            None => errors.push(SequenceError::UnknownStep {
                action: action.id.clone(),
                step: step_id.clone(),
            }),
            Some(&found) if found != action.sequence => {
                errors.push(SequenceError::CrossDomainStep {
                    action: action.id.clone(),
                    step: step_id.clone(),
                    expected: action.sequence,
                    found,
                });
            }
            Some(_) => {}
        }
    }

    // 3. Elevation vs impersonation.
    for action in actions {
        if action.has_elevation_conflict() {
            errors.push(SequenceError::ElevationConflict(action.id.clone()));
        }
    }

    // 4. Cycles, per domain.
    for (sequence, members) in partition_by_sequence(actions) {
        let graph = OrderingGraph::build(sequence, &members);
        if graph.has_cycle() {
            errors.push(SequenceError::CycleDetected {
                sequence,
                chain: graph.cycle_chain().unwrap_or_default(),
            });
        }
    }

    errors
}

/// Group actions by ordering domain, preserving declaration order within
/// each domain and the order in which domains first appear.
pub(crate) fn partition_by_sequence(
    actions: &[ActionDescriptor],
) -> Vec<(Sequence, Vec<&ActionDescriptor>)> {
    let mut partitions: Vec<(Sequence, Vec<&ActionDescriptor>)> = Vec::new();
    for action in actions {
        match partitions.iter_mut().find(|(seq, _)| *seq == action.sequence) {
            Some((_, members)) => members.push(action),
            None => partitions.push((action.sequence, vec![action])),
        }
    }
    partitions
}
