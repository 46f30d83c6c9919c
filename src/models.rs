use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Lifecycle tag of a step as reported by the workflow server.
///
/// Only `pending`, `in-progress` and `completed` are known today; anything
/// else is carried through verbatim so new states still render.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StepStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Other(String),
}

impl StepStatus {
    pub fn as_str(&self) -> &str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in-progress",
            StepStatus::Completed => "completed",
            StepStatus::Other(tag) => tag,
        }
    }

    /// CSS-safe class name for the status badge.
    pub fn css_class(&self) -> String {
        self.as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c.to_ascii_lowercase() } else { '-' })
            .collect()
    }
}

impl From<String> for StepStatus {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "pending" => StepStatus::Pending,
            "in-progress" => StepStatus::InProgress,
            "completed" => StepStatus::Completed,
            _ => StepStatus::Other(tag),
        }
    }
}

impl From<&str> for StepStatus {
    fn from(tag: &str) -> Self {
        StepStatus::from(tag.to_string())
    }
}

impl From<StepStatus> for String {
    fn from(status: StepStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One unit of work in the workflow, as carried by `WORKFLOW_INIT`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

// A field sent as `null` reads the same as a missing one.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Step {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            status: StepStatus::Pending,
            data: None,
        }
    }
}

/// Top-left corner of a node in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the scene container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Visual/state record of one step.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub step: Step,
    pub index: usize,
    pub position: Position,
}

/// Derived state of the edge between two consecutive steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Pending,
    Active,
    Completed,
}

impl ConnectionState {
    /// Class list applied to the connection group.
    pub fn css_class(&self) -> &'static str {
        match self {
            ConnectionState::Pending => "connection",
            ConnectionState::Active => "connection active",
            ConnectionState::Completed => "connection completed",
        }
    }
}

/// Directed edge `from -> to` between sequentially adjacent steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub from: String,
    pub to: String,
    pub state: ConnectionState,
}
