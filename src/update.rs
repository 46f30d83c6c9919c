//! Routes decoded workflow events into the view.

use crate::canvas::SceneGraph;
use crate::models::StepStatus;
use crate::network::WorkflowEvent;
use crate::state::GraphError;
use crate::view::WorkflowView;

/// What became of one dispatched event.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied,
    /// A step event named an id the current workflow does not have.
    UnknownStep(String),
    /// An event type this client does not handle.
    Ignored(String),
    /// The workflow init was refused; the previous workflow stays.
    Rejected(GraphError),
}

pub fn dispatch<S: SceneGraph>(view: &mut WorkflowView<S>, event: WorkflowEvent) -> Outcome {
    crate::console_log!("📨 Workflow event received: {}", event.kind());

    match event {
        WorkflowEvent::WorkflowInit { steps } => match view.initialize(steps) {
            Ok(()) => Outcome::Applied,
            Err(e) => {
                crate::console_error!("Rejected workflow: {}", e);
                Outcome::Rejected(e)
            }
        },
        WorkflowEvent::StepStart { step_id } => {
            apply_status(view, &step_id, StepStatus::InProgress, None)
        }
        WorkflowEvent::StepComplete { step_id, data } => {
            if let Some(data) = &data {
                crate::macros::write_payload("📊 Step data:", data);
            }
            apply_status(view, &step_id, StepStatus::Completed, data)
        }
        WorkflowEvent::Unknown { kind } => {
            crate::console_warn!("❓ Unknown event type: {}", kind);
            Outcome::Ignored(kind)
        }
    }
}

fn apply_status<S: SceneGraph>(
    view: &mut WorkflowView<S>,
    step_id: &str,
    status: StepStatus,
    data: Option<serde_json::Value>,
) -> Outcome {
    match view.set_step_status(step_id, status, data) {
        Ok(()) => Outcome::Applied,
        Err(GraphError::UnknownStep(id)) => {
            crate::console_warn!("Step {} is not part of the current workflow", id);
            Outcome::UnknownStep(id)
        }
        Err(e) => Outcome::Rejected(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::HeadlessScene;
    use crate::models::{ConnectionState, Step, Viewport};
    use crate::network::decode;

    fn view() -> WorkflowView<HeadlessScene> {
        WorkflowView::new(HeadlessScene::new(Viewport::new(1200.0, 800.0)), 100)
    }

    fn init(view: &mut WorkflowView<HeadlessScene>, ids: &[&str]) {
        let steps = ids.iter().map(|id| Step::new(id, id, "")).collect();
        assert_eq!(dispatch(view, WorkflowEvent::WorkflowInit { steps }), Outcome::Applied);
    }

    fn states(view: &WorkflowView<HeadlessScene>) -> Vec<ConnectionState> {
        view.store().connections().iter().map(|c| c.state).collect()
    }

    #[test]
    fn step_events_drive_status() {
        let mut view = view();
        init(&mut view, &["fetch", "clean"]);

        let start = decode(r#"{"type":"STEP_START","stepId":"fetch"}"#).unwrap();
        assert_eq!(dispatch(&mut view, start), Outcome::Applied);
        assert_eq!(view.store().node("fetch").unwrap().step.status, StepStatus::InProgress);

        let done = decode(r#"{"type":"STEP_COMPLETE","stepId":"fetch","data":{"rows":12}}"#).unwrap();
        assert_eq!(dispatch(&mut view, done), Outcome::Applied);
        let step = &view.store().node("fetch").unwrap().step;
        assert_eq!(step.status, StepStatus::Completed);
        assert_eq!(step.data, Some(serde_json::json!({"rows": 12})));
        assert_eq!(view.progress().text, "1 of 2 steps completed");
    }

    #[test]
    fn unknown_step_changes_nothing() {
        let mut view = view();
        init(&mut view, &["a", "b"]);
        let before = view.progress().clone();

        let outcome = dispatch(&mut view, WorkflowEvent::StepStart { step_id: "zzz".to_string() });
        assert_eq!(outcome, Outcome::UnknownStep("zzz".to_string()));
        assert_eq!(view.progress(), &before);
        assert_eq!(view.store().node("a").unwrap().step.status, StepStatus::Pending);
    }

    #[test]
    fn unknown_type_is_ignored() {
        let mut view = view();
        let event = decode(r#"{"type":"HEARTBEAT"}"#).unwrap();
        assert_eq!(dispatch(&mut view, event), Outcome::Ignored("HEARTBEAT".to_string()));
        assert!(view.store().is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut view = view();
        init(&mut view, &["a", "b"]);
        let steps = vec![Step::new("x", "x", ""), Step::new("x", "x", "")];
        assert_eq!(
            dispatch(&mut view, WorkflowEvent::WorkflowInit { steps }),
            Outcome::Rejected(GraphError::DuplicateStep("x".to_string()))
        );
        assert_eq!(view.store().len(), 2);
    }

    #[test]
    fn connection_state_follows_source_then_destination() {
        let mut view = view();
        init(&mut view, &["s1", "s2", "s3", "s4"]);
        assert_eq!(states(&view), vec![ConnectionState::Pending; 3]);

        dispatch(&mut view, WorkflowEvent::StepStart { step_id: "s2".to_string() });
        assert_eq!(
            states(&view),
            vec![ConnectionState::Active, ConnectionState::Pending, ConnectionState::Pending]
        );

        dispatch(&mut view, WorkflowEvent::StepComplete { step_id: "s1".to_string(), data: None });
        assert_eq!(
            states(&view),
            vec![ConnectionState::Completed, ConnectionState::Pending, ConnectionState::Pending]
        );

        dispatch(&mut view, WorkflowEvent::StepStart { step_id: "s3".to_string() });
        assert_eq!(
            states(&view),
            vec![ConnectionState::Completed, ConnectionState::Active, ConnectionState::Pending]
        );
    }
}
