//! In-memory scene used off the browser: keeps the current element tree and
//! a few counters so callers can inspect what would be on screen.

use std::collections::{BTreeMap, HashSet};

use super::scene::{SceneError, SceneGraph};
use super::shapes::CurvePath;
use crate::models::{ConnectionState, Node, Position, StepStatus, Viewport};
use crate::network::SocketStatus;
use crate::progress::ProgressReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadlessHandle(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessNode {
    pub step_id: String,
    pub title: String,
    pub status: StepStatus,
    pub position: Position,
    pub enter_delay_ms: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessConnection {
    pub path: CurvePath,
    pub state: ConnectionState,
}

#[derive(Debug, Default)]
pub struct HeadlessScene {
    viewport: Viewport,
    next_handle: u64,
    nodes: BTreeMap<HeadlessHandle, HeadlessNode>,
    connections: BTreeMap<HeadlessHandle, HeadlessConnection>,
    connection_updates: usize,
    removed_connections: usize,
    progress: Option<ProgressReport>,
    socket_status: Option<SocketStatus>,
    status_history: Vec<SocketStatus>,
    summary_reveals: usize,
    failing_steps: HashSet<String>,
}

impl HeadlessScene {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Make `add_node` fail for this step id.
    pub fn fail_node(&mut self, step_id: &str) {
        self.failing_steps.insert(step_id.to_string());
    }

    pub fn node(&self, step_id: &str) -> Option<&HeadlessNode> {
        self.nodes.values().find(|n| n.step_id == step_id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Connections in creation order.
    pub fn connections(&self) -> Vec<&HeadlessConnection> {
        self.connections.values().collect()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn connection_updates(&self) -> usize {
        self.connection_updates
    }

    pub fn removed_connections(&self) -> usize {
        self.removed_connections
    }

    pub fn progress(&self) -> Option<&ProgressReport> {
        self.progress.as_ref()
    }

    pub fn socket_status(&self) -> Option<SocketStatus> {
        self.socket_status
    }

    /// Every status shown, oldest first.
    pub fn status_history(&self) -> &[SocketStatus] {
        &self.status_history
    }

    pub fn summary_reveals(&self) -> usize {
        self.summary_reveals
    }

    fn allocate(&mut self) -> HeadlessHandle {
        self.next_handle += 1;
        HeadlessHandle(self.next_handle)
    }
}

impl SceneGraph for HeadlessScene {
    type NodeHandle = HeadlessHandle;
    type ConnectionHandle = HeadlessHandle;

    fn add_node(&mut self, node: &Node, enter_delay_ms: u32) -> Result<HeadlessHandle, SceneError> {
        if self.failing_steps.contains(&node.step.id) {
            return Err(SceneError::new(format!("cannot create node {}", node.step.id)));
        }
        let handle = self.allocate();
        self.nodes.insert(
            handle,
            HeadlessNode {
                step_id: node.step.id.clone(),
                title: node.step.name.clone(),
                status: node.step.status.clone(),
                position: node.position,
                enter_delay_ms,
            },
        );
        Ok(handle)
    }

    fn remove_node(&mut self, handle: HeadlessHandle) {
        self.nodes.remove(&handle);
    }

    fn move_node(&mut self, handle: &HeadlessHandle, position: Position) -> Result<(), SceneError> {
        let node = self
            .nodes
            .get_mut(handle)
            .ok_or_else(|| SceneError::new("node handle no longer on scene"))?;
        node.position = position;
        Ok(())
    }

    fn update_node_status(&mut self, handle: &HeadlessHandle, status: &StepStatus) -> Result<(), SceneError> {
        let node = self
            .nodes
            .get_mut(handle)
            .ok_or_else(|| SceneError::new("node handle no longer on scene"))?;
        node.status = status.clone();
        Ok(())
    }

    fn add_connection(
        &mut self,
        path: &CurvePath,
        state: ConnectionState,
    ) -> Result<HeadlessHandle, SceneError> {
        let handle = self.allocate();
        self.connections.insert(handle, HeadlessConnection { path: *path, state });
        Ok(handle)
    }

    fn remove_connection(&mut self, handle: HeadlessHandle) {
        if self.connections.remove(&handle).is_some() {
            self.removed_connections += 1;
        }
    }

    fn update_connection_state(
        &mut self,
        handle: &HeadlessHandle,
        state: ConnectionState,
    ) -> Result<(), SceneError> {
        let connection = self
            .connections
            .get_mut(handle)
            .ok_or_else(|| SceneError::new("connection handle no longer on scene"))?;
        connection.state = state;
        self.connection_updates += 1;
        Ok(())
    }

    fn viewport_size(&self) -> Viewport {
        self.viewport
    }

    fn show_progress(&mut self, report: &ProgressReport) {
        self.progress = Some(report.clone());
    }

    fn show_socket_status(&mut self, status: SocketStatus) {
        self.socket_status = Some(status);
        self.status_history.push(status);
    }

    fn reveal_summary(&mut self) {
        self.summary_reveals += 1;
    }
}
