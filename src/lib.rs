//! Live visualizer for multi-step workflows.
//!
//! A workflow server streams `WORKFLOW_INIT`, `STEP_START` and
//! `STEP_COMPLETE` events over a WebSocket; the visualizer lays the steps out
//! on an S-curve, draws the connections between consecutive steps and keeps
//! node badges, connection states and overall progress in sync with the
//! events.
//!
//! Everything except the browser glue (`browser`, `ui`, `canvas::dom`,
//! `network::ws_client`) is plain Rust and runs natively.

#[macro_use]
pub mod macros;

pub mod app;
pub mod canvas;
pub mod config;
pub mod constants;
pub mod demo;
pub mod layout;
pub mod models;
pub mod network;
pub mod progress;
pub mod state;
pub mod timers;
pub mod update;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(target_arch = "wasm32")]
pub mod ui;

#[cfg(target_arch = "wasm32")]
pub use browser::{mount, VisualizerHandle};

pub use app::{App, Effect, Input};
pub use config::VisualizerConfig;
pub use network::{SocketEvent, SocketStatus, WorkflowEvent};
