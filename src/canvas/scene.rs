use crate::canvas::shapes::CurvePath;
use crate::models::{ConnectionState, Node, Position, StepStatus, Viewport};
use crate::network::SocketStatus;
use crate::progress::ProgressReport;

/// A rendering backend failed to create or update an element.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("scene operation failed: {0}")]
pub struct SceneError(pub String);

impl SceneError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// The surface nodes and connections are drawn on.
///
/// Handles are owned by the caller and given back on removal so the backend
/// can release whatever it allocated for them.
pub trait SceneGraph {
    type NodeHandle;
    type ConnectionHandle;

    /// Create the visual card for `node`; its entrance transition starts
    /// `enter_delay_ms` after creation.
    fn add_node(&mut self, node: &Node, enter_delay_ms: u32) -> Result<Self::NodeHandle, SceneError>;
    fn remove_node(&mut self, handle: Self::NodeHandle);
    fn move_node(&mut self, handle: &Self::NodeHandle, position: Position) -> Result<(), SceneError>;
    fn update_node_status(&mut self, handle: &Self::NodeHandle, status: &StepStatus) -> Result<(), SceneError>;

    fn add_connection(
        &mut self,
        path: &CurvePath,
        state: ConnectionState,
    ) -> Result<Self::ConnectionHandle, SceneError>;
    fn remove_connection(&mut self, handle: Self::ConnectionHandle);
    fn update_connection_state(
        &mut self,
        handle: &Self::ConnectionHandle,
        state: ConnectionState,
    ) -> Result<(), SceneError>;

    fn viewport_size(&self) -> Viewport;

    // Surrounding HUD: progress bar, connection indicator, info panel.
    fn show_progress(&mut self, report: &ProgressReport);
    fn show_socket_status(&mut self, status: SocketStatus);
    fn reveal_summary(&mut self);
}
