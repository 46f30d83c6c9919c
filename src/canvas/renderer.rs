use std::collections::HashMap;

use super::scene::{SceneError, SceneGraph};
use super::shapes::CurvePath;
use crate::models::{ConnectionState, Node, Viewport};
use crate::network::SocketStatus;
use crate::progress::ProgressReport;
use crate::state::GraphStore;

struct RenderedConnection<H> {
    handle: H,
    // Position in `GraphStore::connections`; edges whose endpoints failed to
    // draw are skipped, so this is not the position in our own list.
    index: usize,
    state: ConnectionState,
}

/// Keeps a scene in step with the graph store.
///
/// Owns every scene handle it creates; nothing is left on the scene after
/// `clear`.
pub struct Renderer<S: SceneGraph> {
    scene: S,
    stagger_ms: u32,
    nodes: HashMap<String, S::NodeHandle>,
    connections: Vec<RenderedConnection<S::ConnectionHandle>>,
}

impl<S: SceneGraph> Renderer<S> {
    pub fn new(scene: S, stagger_ms: u32) -> Self {
        Self {
            scene,
            stagger_ms,
            nodes: HashMap::new(),
            connections: Vec::new(),
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn viewport(&self) -> Viewport {
        self.scene.viewport_size()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Replace whatever is on the scene with the store's workflow.  Node *k*
    /// enters `k * stagger` milliseconds after the batch is created.
    pub fn mount(&mut self, store: &GraphStore) {
        self.clear();

        for node in store.nodes_in_order() {
            let delay = self.stagger_ms.saturating_mul(node.index as u32);
            match self.scene.add_node(node, delay) {
                Ok(handle) => {
                    self.nodes.insert(node.step.id.clone(), handle);
                }
                Err(e) => crate::console_error!("Failed to draw node {}: {}", node.step.id, e),
            }
        }

        self.draw_connections(store);
    }

    /// Remove every connection and node from the scene.
    pub fn clear(&mut self) {
        self.remove_connections();
        for (_, handle) in self.nodes.drain() {
            self.scene.remove_node(handle);
        }
    }

    /// Refresh one node's badge after its status changed.
    pub fn update_node(&mut self, node: &Node) {
        if let Some(handle) = self.nodes.get(&node.step.id) {
            report(self.scene.update_node_status(handle, &node.step.status));
        }
    }

    /// Push connection states that differ from what is currently drawn.
    pub fn sync_connections(&mut self, store: &GraphStore) {
        for rendered in self.connections.iter_mut() {
            let Some(connection) = store.connections().get(rendered.index) else {
                continue;
            };
            if rendered.state != connection.state {
                match self.scene.update_connection_state(&rendered.handle, connection.state) {
                    Ok(()) => rendered.state = connection.state,
                    Err(e) => crate::console_error!("{}", e),
                }
            }
        }
    }

    /// Move nodes to their new positions and redraw every connection.
    pub fn relayout(&mut self, store: &GraphStore) {
        for node in store.nodes_in_order() {
            if let Some(handle) = self.nodes.get(&node.step.id) {
                report(self.scene.move_node(handle, node.position));
            }
        }
        self.remove_connections();
        self.draw_connections(store);
    }

    pub fn show_progress(&mut self, progress: &ProgressReport) {
        self.scene.show_progress(progress);
    }

    pub fn show_socket_status(&mut self, status: SocketStatus) {
        self.scene.show_socket_status(status);
    }

    pub fn reveal_summary(&mut self) {
        self.scene.reveal_summary();
    }

    fn draw_connections(&mut self, store: &GraphStore) {
        for (index, connection) in store.connections().iter().enumerate() {
            let (Some(from), Some(to)) = (store.node(&connection.from), store.node(&connection.to)) else {
                continue;
            };
            // Endpoints must be on the scene before the edge between them.
            if !self.nodes.contains_key(&connection.from) || !self.nodes.contains_key(&connection.to) {
                continue;
            }
            let path = CurvePath::between(from.position, to.position);
            match self.scene.add_connection(&path, connection.state) {
                Ok(handle) => self.connections.push(RenderedConnection {
                    handle,
                    index,
                    state: connection.state,
                }),
                Err(e) => crate::console_error!(
                    "Failed to draw connection {} -> {}: {}",
                    connection.from,
                    connection.to,
                    e
                ),
            }
        }
    }

    fn remove_connections(&mut self) {
        for rendered in self.connections.drain(..) {
            self.scene.remove_connection(rendered.handle);
        }
    }
}

fn report(result: Result<(), SceneError>) {
    if let Err(e) = result {
        crate::console_error!("{}", e);
    }
}
