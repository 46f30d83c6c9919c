//! A canned workflow run for trying the visualizer without a server.
//!
//! The script produces the same events the server would send; the browser
//! runtime replays them through the normal dispatcher with the listed delays.

use serde_json::json;

use crate::models::Step;
use crate::network::WorkflowEvent;

/// Pause before a stage starts.
pub const STAGE_PAUSE_MS: u32 = 600;
/// Time spent on each executed action.
pub const ACTION_MS: u32 = 800;

pub struct Stage {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Every action the stage offers.
    pub actions: &'static [&'static str],
    /// The subset this run executes.
    pub executed: &'static [&'static str],
}

pub const STAGES: [Stage; 5] = [
    Stage {
        id: "start",
        name: "Initialize",
        description: "Load configuration, authenticate and connect to storage",
        actions: &["start-config", "start-auth", "start-db"],
        executed: &["start-config", "start-auth"],
    },
    Stage {
        id: "process",
        name: "Data Processing",
        description: "Fetch the input data, clean it and apply filters",
        actions: &["process-fetch", "process-clean", "process-filter"],
        executed: &["process-fetch", "process-clean"],
    },
    Stage {
        id: "validation",
        name: "Validation",
        description: "Schema check and business rules",
        actions: &["validate-schema", "validate-business"],
        executed: &["validate-schema"],
    },
    Stage {
        id: "transform",
        name: "Transform",
        description: "Format the output and enrich it",
        actions: &["transform-format", "transform-enrich"],
        executed: &["transform-format", "transform-enrich"],
    },
    Stage {
        id: "output",
        name: "Output",
        description: "Save results and send notifications",
        actions: &["output-save", "output-notify"],
        executed: &["output-save", "output-notify"],
    },
];

/// One event of the script.  `delay_ms` counts from the previous event.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedEvent {
    pub delay_ms: u32,
    pub event: WorkflowEvent,
}

pub fn scripted_run() -> Vec<ScriptedEvent> {
    let steps = STAGES
        .iter()
        .map(|stage| Step::new(stage.id, stage.name, stage.description))
        .collect();

    let mut script = vec![ScriptedEvent {
        delay_ms: 0,
        event: WorkflowEvent::WorkflowInit { steps },
    }];

    for stage in &STAGES {
        script.push(ScriptedEvent {
            delay_ms: STAGE_PAUSE_MS,
            event: WorkflowEvent::StepStart {
                step_id: stage.id.to_string(),
            },
        });
        script.push(ScriptedEvent {
            delay_ms: ACTION_MS * stage.executed.len() as u32,
            event: WorkflowEvent::StepComplete {
                step_id: stage.id.to_string(),
                data: Some(json!({ "executedActions": stage.executed })),
            },
        });
    }
    script
}

/// Total running time of the script in milliseconds.
pub fn total_duration_ms(script: &[ScriptedEvent]) -> u32 {
    script.iter().map(|scripted| scripted.delay_ms).sum()
}
