use std::collections::{HashMap, HashSet};

use crate::layout;
use crate::models::{Connection, ConnectionState, Node, Step, StepStatus, Viewport};

/// Failures of graph mutations.  Both are recovered by the caller as no-ops.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("unknown step id: {0}")]
    UnknownStep(String),

    #[error("duplicate step id in workflow: {0}")]
    DuplicateStep(String),
}

/// Holds the active workflow: step order, id → node, and the edges between
/// consecutive steps.
///
/// Only one workflow generation lives here at a time; `initialize` validates
/// the new steps, clears everything and then installs the replacement.
#[derive(Debug, Default)]
pub struct GraphStore {
    order: Vec<String>,
    nodes: HashMap<String, Node>,
    connections: Vec<Connection>,
    viewport: Viewport,
    generation: u64,
    active: bool,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current workflow with `steps`.
    ///
    /// Rejects the whole batch when two steps share an id; the previous
    /// workflow is left untouched in that case.
    pub fn initialize(&mut self, steps: Vec<Step>, viewport: Viewport) -> Result<(), GraphError> {
        let mut seen = HashSet::with_capacity(steps.len());
        for step in &steps {
            if !seen.insert(step.id.as_str()) {
                return Err(GraphError::DuplicateStep(step.id.clone()));
            }
        }

        self.clear();

        self.viewport = viewport;
        let count = steps.len();
        for (index, step) in steps.into_iter().enumerate() {
            let position = layout::node_position(index, count, viewport);
            self.order.push(step.id.clone());
            self.nodes.insert(step.id.clone(), Node { step, index, position });
        }
        self.rebuild_connections();

        self.generation += 1;
        self.active = true;
        Ok(())
    }

    /// Drop every node and connection.
    pub fn clear(&mut self) {
        self.order.clear();
        self.nodes.clear();
        self.connections.clear();
        self.active = false;
    }

    /// Set a step's status (and attach `data` when given), then re-derive
    /// every connection state.
    pub fn set_status(
        &mut self,
        step_id: &str,
        status: StepStatus,
        data: Option<serde_json::Value>,
    ) -> Result<&Node, GraphError> {
        let node = self
            .nodes
            .get_mut(step_id)
            .ok_or_else(|| GraphError::UnknownStep(step_id.to_string()))?;

        node.step.status = status;
        if let Some(data) = data {
            node.step.data = Some(data);
        }

        self.recompute_connections();
        self.nodes
            .get(step_id)
            .ok_or_else(|| GraphError::UnknownStep(step_id.to_string()))
    }

    /// Recompute node positions for a new viewport and rebuild the edges.
    pub fn relayout(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let count = self.order.len();
        for (index, id) in self.order.iter().enumerate() {
            if let Some(node) = self.nodes.get_mut(id) {
                node.position = layout::node_position(index, count, viewport);
            }
        }
        self.rebuild_connections();
    }

    /// Re-derive the state of every connection from its endpoints.
    ///
    /// Source completed wins over destination in-progress, so the result does
    /// not depend on the order in which statuses changed.
    pub fn recompute_connections(&mut self) {
        for connection in &mut self.connections {
            let from = self.nodes.get(&connection.from).map(|n| &n.step.status);
            let to = self.nodes.get(&connection.to).map(|n| &n.step.status);
            connection.state = derive_state(from, to);
        }
    }

    fn rebuild_connections(&mut self) {
        self.connections = self
            .order
            .windows(2)
            .filter(|pair| self.nodes.contains_key(&pair[0]) && self.nodes.contains_key(&pair[1]))
            .map(|pair| Connection {
                from: pair[0].clone(),
                to: pair[1].clone(),
                state: ConnectionState::Pending,
            })
            .collect();
        self.recompute_connections();
    }

    pub fn nodes_in_order(&self) -> impl Iterator<Item = &Node> + '_ {
        self.order.iter().filter_map(move |id| self.nodes.get(id))
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn node(&self, step_id: &str) -> Option<&Node> {
        self.nodes.get(step_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether a workflow has been installed (it may still have zero steps).
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn completed_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|node| node.step.status == StepStatus::Completed)
            .count()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Incremented on every successful `initialize`.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

fn derive_state(from: Option<&StepStatus>, to: Option<&StepStatus>) -> ConnectionState {
    match (from, to) {
        (Some(StepStatus::Completed), _) => ConnectionState::Completed,
        (_, Some(StepStatus::InProgress)) => ConnectionState::Active,
        _ => ConnectionState::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(ids: &[&str]) -> Vec<Step> {
        ids.iter().map(|id| Step::new(id, &format!("Step {}", id), "")).collect()
    }

    fn viewport() -> Viewport {
        Viewport::new(1200.0, 800.0)
    }

    #[test]
    fn initialize_builds_nodes_and_chain() {
        let mut store = GraphStore::new();
        store.initialize(steps(&["a", "b", "c", "d"]), viewport()).unwrap();

        assert_eq!(store.len(), 4);
        let ids: Vec<&str> = store.nodes_in_order().map(|n| n.step.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);

        let edges: Vec<(&str, &str)> = store
            .connections()
            .iter()
            .map(|c| (c.from.as_str(), c.to.as_str()))
            .collect();
        assert_eq!(edges, vec![("a", "b"), ("b", "c"), ("c", "d")]);
        assert!(store.connections().iter().all(|c| c.state == ConnectionState::Pending));
        assert_eq!(store.generation(), 1);
    }

    #[test]
    fn empty_and_single_step_workflows() {
        let mut store = GraphStore::new();
        store.initialize(Vec::new(), viewport()).unwrap();
        assert!(store.is_empty());
        assert!(store.is_active());
        assert!(store.connections().is_empty());

        store.initialize(steps(&["solo"]), viewport()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.connections().is_empty());
    }

    #[test]
    fn reinitialize_leaves_nothing_from_previous_workflow() {
        let mut store = GraphStore::new();
        store.initialize(steps(&["a", "b", "c"]), viewport()).unwrap();
        store.clear();
        store.initialize(steps(&["x", "y"]), viewport()).unwrap();

        for old in ["a", "b", "c"] {
            assert!(store.node(old).is_none());
            assert!(store
                .connections()
                .iter()
                .all(|c| c.from != old && c.to != old));
        }
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn duplicate_ids_are_rejected_without_touching_state() {
        let mut store = GraphStore::new();
        store.initialize(steps(&["a", "b"]), viewport()).unwrap();

        let err = store.initialize(steps(&["x", "y", "x"]), viewport()).unwrap_err();
        assert_eq!(err, GraphError::DuplicateStep("x".to_string()));
        assert!(store.node("a").is_some());
        assert_eq!(store.generation(), 1);
    }

    #[test]
    fn unknown_step_is_an_error() {
        let mut store = GraphStore::new();
        store.initialize(steps(&["a"]), viewport()).unwrap();
        let err = store.set_status("zzz", StepStatus::Completed, None).unwrap_err();
        assert_eq!(err, GraphError::UnknownStep("zzz".to_string()));
        assert_eq!(store.node("a").unwrap().step.status, StepStatus::Pending);
    }

    #[test]
    fn source_completion_beats_destination_progress() {
        let mut store = GraphStore::new();
        store.initialize(steps(&["s1", "s2", "s3", "s4"]), viewport()).unwrap();

        store.set_status("s2", StepStatus::InProgress, None).unwrap();
        assert_eq!(store.connections()[0].state, ConnectionState::Active);

        store.set_status("s1", StepStatus::Completed, None).unwrap();
        assert_eq!(store.connections()[0].state, ConnectionState::Completed);
        assert_eq!(store.connections()[1].state, ConnectionState::Pending);
    }

    #[test]
    fn completion_without_start_is_accepted() {
        let mut store = GraphStore::new();
        store.initialize(steps(&["a", "b"]), viewport()).unwrap();
        let node = store
            .set_status("b", StepStatus::Completed, Some(serde_json::json!({"rows": 3})))
            .unwrap();
        assert_eq!(node.step.data, Some(serde_json::json!({"rows": 3})));
        assert_eq!(store.connections()[0].state, ConnectionState::Pending);
        assert_eq!(store.completed_count(), 1);
    }

    #[test]
    fn preset_statuses_are_honoured_on_initialize() {
        let mut input = steps(&["a", "b", "c"]);
        input[0].status = StepStatus::Completed;
        input[2].status = StepStatus::InProgress;

        let mut store = GraphStore::new();
        store.initialize(input, viewport()).unwrap();
        let states: Vec<ConnectionState> = store.connections().iter().map(|c| c.state).collect();
        assert_eq!(states, vec![ConnectionState::Completed, ConnectionState::Active]);
    }

    #[test]
    fn relayout_moves_nodes_and_keeps_states() {
        let mut store = GraphStore::new();
        store.initialize(steps(&["a", "b", "c"]), viewport()).unwrap();
        store.set_status("a", StepStatus::Completed, None).unwrap();
        let before = store.node("c").unwrap().position;

        store.relayout(Viewport::new(600.0, 400.0));
        assert_ne!(store.node("c").unwrap().position, before);
        assert_eq!(store.connections().len(), 2);
        assert_eq!(store.connections()[0].state, ConnectionState::Completed);
        assert_eq!(store.viewport(), Viewport::new(600.0, 400.0));
    }
}
