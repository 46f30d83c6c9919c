use serde::Deserialize;
use serde_json::Value;

use crate::models::Step;

pub const WORKFLOW_INIT: &str = "WORKFLOW_INIT";
pub const STEP_START: &str = "STEP_START";
pub const STEP_COMPLETE: &str = "STEP_COMPLETE";

/// A decoded message from the workflow server.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    WorkflowInit { steps: Vec<Step> },
    StepStart { step_id: String },
    StepComplete { step_id: String, data: Option<Value> },
    /// Any `type` this client does not know.  Legal traffic, never an error.
    Unknown { kind: String },
}

impl WorkflowEvent {
    /// Wire name of the event type.
    pub fn kind(&self) -> &str {
        match self {
            WorkflowEvent::WorkflowInit { .. } => WORKFLOW_INIT,
            WorkflowEvent::StepStart { .. } => STEP_START,
            WorkflowEvent::StepComplete { .. } => STEP_COMPLETE,
            WorkflowEvent::Unknown { kind } => kind,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("message is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("message has no string `type` field")]
    MissingType,

    #[error("malformed {kind} payload: {source}")]
    InvalidPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct WorkflowInitPayload {
    steps: Vec<Step>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepStartPayload {
    step_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepCompletePayload {
    step_id: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Decode one text frame.
pub fn decode(text: &str) -> Result<WorkflowEvent, DecodeError> {
    let value: Value = serde_json::from_str(text).map_err(DecodeError::InvalidJson)?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingType)?
        .to_string();

    let invalid = |source| DecodeError::InvalidPayload {
        kind: kind.clone(),
        source,
    };

    let event = match kind.as_str() {
        WORKFLOW_INIT => {
            let payload: WorkflowInitPayload = serde_json::from_value(value).map_err(invalid)?;
            WorkflowEvent::WorkflowInit { steps: payload.steps }
        }
        STEP_START => {
            let payload: StepStartPayload = serde_json::from_value(value).map_err(invalid)?;
            WorkflowEvent::StepStart { step_id: payload.step_id }
        }
        STEP_COMPLETE => {
            let payload: StepCompletePayload = serde_json::from_value(value).map_err(invalid)?;
            WorkflowEvent::StepComplete {
                step_id: payload.step_id,
                // `"data": null` means no payload.
                data: payload.data.filter(|d| !d.is_null()),
            }
        }
        _ => WorkflowEvent::Unknown { kind },
    };
    Ok(event)
}
