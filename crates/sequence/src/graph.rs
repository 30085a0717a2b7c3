//! Per-domain ordering graph built on `petgraph`.
//!
//! Each sequence domain gets one directed graph whose nodes are the fixed
//! install phases (pre-wired in canonical order) plus every action declared
//! in that domain. Each action contributes exactly one edge from its
//! `(when, step)` pair; a topological sort of the result is the total order
//! the renderer emits.

use std::collections::HashMap;
use std::fmt;

use packwright_action::{ActionDescriptor, Sequence, Step, When};
use packwright_core::ActionId;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::SequenceError;

/// A node in the ordering graph: a fixed install phase or a declared action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SequenceNode {
    /// One of the standard install phases.
    Phase(Step),
    /// A declared custom action.
    Action(ActionId),
}

impl fmt::Display for SequenceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phase(step) => write!(f, "{step}"),
            Self::Action(id) => write!(f, "{id}"),
        }
    }
}

/// The ordering graph for one sequence domain.
#[derive(Debug)]
pub struct OrderingGraph {
    sequence: Sequence,
    graph: DiGraph<SequenceNode, ()>,
    index_map: HashMap<SequenceNode, NodeIndex>,
}

impl OrderingGraph {
    /// Build the graph for `sequence` from the actions belonging to it.
    ///
    /// The standard phases are added first and chained in canonical order,
    /// then one node per action, then one edge per action from its
    /// `(when, step)` pair. Anchors referencing actions outside this domain
    /// are skipped — callers are expected to have diagnosed unknown and
    /// cross-domain anchors already.
    #[must_use]
    pub fn build(sequence: Sequence, actions: &[&ActionDescriptor]) -> Self {
        let mut graph = DiGraph::new();
        let mut index_map = HashMap::new();

        let mut previous: Option<NodeIndex> = None;
        for phase in Step::PHASES {
            let node = SequenceNode::Phase(phase);
            let idx = graph.add_node(node.clone());
            index_map.insert(node, idx);
            if let Some(prev) = previous {
                graph.add_edge(prev, idx, ());
            }
            previous = Some(idx);
        }

        for action in actions {
            let node = SequenceNode::Action(action.id.clone());
            let idx = graph.add_node(node.clone());
            index_map.insert(node, idx);
        }

        for action in actions {
            let action_idx = index_map[&SequenceNode::Action(action.id.clone())];
            let anchor = match &action.step {
                Step::Action { id } => SequenceNode::Action(id.clone()),
                phase => SequenceNode::Phase(phase.clone()),
            };
            let Some(&anchor_idx) = index_map.get(&anchor) else {
                continue;
            };
            match action.when {
                When::Before => graph.add_edge(action_idx, anchor_idx, ()),
                When::After => graph.add_edge(anchor_idx, action_idx, ()),
            };
        }

        Self {
            sequence,
            graph,
            index_map,
        }
    }

    /// The domain this graph orders.
    #[must_use]
    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    /// Returns `true` if the ordering edges form at least one cycle.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        algo::is_cyclic_directed(&self.graph)
    }

    /// The members of one cyclic chain, in graph order, closed back on the
    /// first member. `None` when the graph is acyclic.
    #[must_use]
    pub fn cycle_chain(&self) -> Option<Vec<String>> {
        // Self-loops first: Tarjan reports them as single-node components
        // indistinguishable from acyclic nodes.
        for idx in self.graph.node_indices() {
            if self.graph.find_edge(idx, idx).is_some() {
                let name = self.graph[idx].to_string();
                return Some(vec![name.clone(), name]);
            }
        }

        for scc in algo::tarjan_scc(&self.graph) {
            if scc.len() > 1 {
                let mut chain: Vec<String> =
                    scc.iter().map(|&idx| self.graph[idx].to_string()).collect();
                chain.push(chain[0].clone());
                return Some(chain);
            }
        }
        None
    }

    /// Topologically sorted action ids, phases filtered out.
    ///
    /// Returns [`SequenceError::CycleDetected`] with the cyclic chain when
    /// no total order exists.
    pub fn sorted_actions(&self) -> Result<Vec<ActionId>, SequenceError> {
        let sorted = algo::toposort(&self.graph, None).map_err(|_| {
            SequenceError::CycleDetected {
                sequence: self.sequence,
                chain: self.cycle_chain().unwrap_or_default(),
            }
        })?;
        Ok(sorted
            .into_iter()
            .filter_map(|idx| match &self.graph[idx] {
                SequenceNode::Phase(_) => None,
                SequenceNode::Action(id) => Some(id.clone()),
            })
            .collect())
    }

    /// Number of nodes, phases included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of ordering edges, the phase chain included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Index lookup for tests and diagnostics.
    #[must_use]
    pub fn contains(&self, node: &SequenceNode) -> bool {
        self.index_map.contains_key(node)
    }
}
