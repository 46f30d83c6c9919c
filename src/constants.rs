// Default values for the visualizer - these are the single source of truth for defaults

// Streaming endpoint
pub const DEFAULT_WS_URL: &str = "ws://localhost:8081";

// Connection timing (milliseconds)
pub const RECONNECT_DELAY_MS: u32 = 3000;
pub const MANUAL_RECONNECT_DELAY_MS: u32 = 500;

// Resize handling: one relayout after this long without further resize signals
pub const RESIZE_DEBOUNCE_MS: u32 = 250;

// Cosmetic animation timing
pub const ENTRANCE_STAGGER_MS: u32 = 100;
pub const SUMMARY_REVEAL_DELAY_MS: u32 = 500;

// Node visual defaults
pub const NODE_WIDTH: f64 = 280.0;
pub const NODE_HEIGHT: f64 = 100.0;
pub const NODE_DESCRIPTION_MAX_GRAPHEMES: usize = 140;

// Layout
pub const LAYOUT_MARGIN: f64 = 50.0;
pub const LAYOUT_SWEEP: f64 = 0.8 * std::f64::consts::PI;
pub const LAYOUT_RADIUS_WIDTH_FACTOR: f64 = 0.3;
pub const LAYOUT_RADIUS_HEIGHT_FACTOR: f64 = 0.25;
pub const LAYOUT_VERTICAL_SQUASH: f64 = 0.6;
pub const LAYOUT_VERTICAL_DRIFT: f64 = 0.2;

// Connection curves
pub const CONNECTION_CONTROL_OFFSET: f64 = 50.0;

// DOM hooks shared with the stylesheet
pub const SCENE_CONTAINER_CLASS: &str = "canvas-container";
pub const SVG_CANVAS_ID: &str = "workflow-canvas";
pub const STATUS_DOT_ID: &str = "connection-status";
pub const STATUS_TEXT_ID: &str = "connection-text";
pub const WORKFLOW_INFO_ID: &str = "workflow-info";
pub const PROGRESS_TEXT_ID: &str = "progress-text";
pub const PROGRESS_FILL_ID: &str = "progress-fill";
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
