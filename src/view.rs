use crate::canvas::{Renderer, SceneGraph};
use crate::models::{Step, StepStatus, Viewport};
use crate::network::SocketStatus;
use crate::progress::{ProgressReport, ProgressTracker};
use crate::state::{GraphError, GraphStore};

/// The visualization state: graph store, the renderer drawing it, and the
/// latest progress report.  Every mutation goes through here so the three
/// never disagree.
pub struct WorkflowView<S: SceneGraph> {
    store: GraphStore,
    renderer: Renderer<S>,
    progress: ProgressReport,
}

impl<S: SceneGraph> WorkflowView<S> {
    pub fn new(scene: S, stagger_ms: u32) -> Self {
        Self {
            store: GraphStore::new(),
            renderer: Renderer::new(scene, stagger_ms),
            progress: ProgressReport::default(),
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn scene(&self) -> &S {
        self.renderer.scene()
    }

    pub fn scene_mut(&mut self) -> &mut S {
        self.renderer.scene_mut()
    }

    pub fn progress(&self) -> &ProgressReport {
        &self.progress
    }

    /// Install a new workflow in place of the current one.
    pub fn initialize(&mut self, steps: Vec<Step>) -> Result<(), GraphError> {
        crate::console_log!("🚀 Initializing workflow with {} steps", steps.len());
        let viewport = self.renderer.viewport();
        // A rejected batch leaves both the store and the scene as they were.
        self.store.initialize(steps, viewport)?;
        self.renderer.mount(&self.store);
        self.refresh_progress();
        self.renderer.reveal_summary();
        Ok(())
    }

    /// Apply a status change reported by the server.
    pub fn set_step_status(
        &mut self,
        step_id: &str,
        status: StepStatus,
        data: Option<serde_json::Value>,
    ) -> Result<(), GraphError> {
        let node = self.store.set_status(step_id, status, data)?;
        crate::console_log!("🔄 Step {}: {} → {}", step_id, node.step.name, node.step.status);
        self.renderer.update_node(node);
        self.renderer.sync_connections(&self.store);
        self.refresh_progress();
        Ok(())
    }

    /// Recompute the layout for the current viewport.  Returns `false` when
    /// there is nothing to lay out.
    pub fn relayout(&mut self) -> bool {
        if !self.store.is_active() || self.store.is_empty() {
            return false;
        }
        let viewport: Viewport = self.renderer.viewport();
        self.store.relayout(viewport);
        self.renderer.relayout(&self.store);
        true
    }

    /// Drop the workflow and everything drawn for it.
    pub fn clear(&mut self) {
        self.store.clear();
        self.renderer.clear();
        self.refresh_progress();
    }

    pub fn show_socket_status(&mut self, status: SocketStatus) {
        self.renderer.show_socket_status(status);
    }

    fn refresh_progress(&mut self) {
        self.progress = ProgressTracker::report(&self.store);
        self.renderer.show_progress(&self.progress);
    }
}
