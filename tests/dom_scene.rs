#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use workflow_visualizer::canvas::dom::DomScene;
use workflow_visualizer::constants::*;
use workflow_visualizer::models::{Step, StepStatus};
use workflow_visualizer::ui::setup::ensure_chrome;
use workflow_visualizer::view::WorkflowView;
use workflow_visualizer::SocketStatus;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

// Every test starts from an empty body.
fn fresh_view() -> (Document, WorkflowView<DomScene>) {
    let document = document();
    document.body().unwrap().set_inner_html("");
    ensure_chrome(&document).unwrap();
    let scene = DomScene::attach(&document, 0).unwrap();
    (document, WorkflowView::new(scene, 100))
}

fn container(document: &Document) -> Element {
    document
        .query_selector(&format!(".{}", SCENE_CONTAINER_CLASS))
        .unwrap()
        .unwrap()
}

fn svg(document: &Document) -> Element {
    document.get_element_by_id(SVG_CANVAS_ID).unwrap()
}

fn card(document: &Document, id: &str) -> Element {
    document
        .query_selector(&format!("[data-step-id=\"{}\"]", id))
        .unwrap()
        .unwrap()
}

fn steps() -> Vec<Step> {
    vec![
        Step::new("a", "Fetch", "Pull the input"),
        Step::new("b", "Clean", "Drop bad rows"),
        Step::new("c", "Report", "Write the summary"),
    ]
}

#[wasm_bindgen_test]
fn chrome_is_created_once() {
    let document = document();
    document.body().unwrap().set_inner_html("");
    ensure_chrome(&document).unwrap();
    ensure_chrome(&document).unwrap();

    assert_eq!(container(&document).child_element_count(), 1);
    // Only the <defs> block so far.
    assert_eq!(svg(&document).child_element_count(), 1);
    assert!(document.get_element_by_id(PROGRESS_FILL_ID).is_some());
    assert_eq!(
        document.get_element_by_id(STATUS_TEXT_ID).unwrap().text_content().unwrap(),
        "Connecting..."
    );
}

#[wasm_bindgen_test]
fn initialize_draws_cards_and_paths() {
    let (document, mut view) = fresh_view();
    view.initialize(steps()).unwrap();

    assert_eq!(container(&document).child_element_count(), 1 + 3);
    assert_eq!(svg(&document).child_element_count(), 1 + 2);
    assert_eq!(card(&document, "b").class_name(), "node pending");
    assert_eq!(
        document.get_element_by_id(PROGRESS_TEXT_ID).unwrap().text_content().unwrap(),
        "0 of 3 steps completed"
    );
}

#[wasm_bindgen_test]
fn status_change_restyles_card_and_edge() {
    let (document, mut view) = fresh_view();
    view.initialize(steps()).unwrap();
    view.set_step_status("a", StepStatus::Completed, None).unwrap();
    view.set_step_status("b", StepStatus::InProgress, None).unwrap();

    assert_eq!(card(&document, "a").class_name(), "node completed");
    assert_eq!(card(&document, "b").class_name(), "node in-progress");

    let groups = svg(&document);
    let first = groups.children().item(1).unwrap();
    let second = groups.children().item(2).unwrap();
    assert_eq!(first.get_attribute("class").unwrap(), "connection completed");
    assert_eq!(second.get_attribute("class").unwrap(), "connection");
}

#[wasm_bindgen_test]
fn clear_removes_everything_drawn() {
    let (document, mut view) = fresh_view();
    view.initialize(steps()).unwrap();
    view.clear();

    assert_eq!(container(&document).child_element_count(), 1);
    assert_eq!(svg(&document).child_element_count(), 1);
}

#[wasm_bindgen_test]
fn socket_status_updates_indicator() {
    let (document, mut view) = fresh_view();
    view.show_socket_status(SocketStatus::Connected);

    let dot = document.get_element_by_id(STATUS_DOT_ID).unwrap();
    assert_eq!(dot.class_name(), "status-dot connected");
    view.show_socket_status(SocketStatus::Error);
    assert_eq!(dot.class_name(), "status-dot");
    assert_eq!(
        document.get_element_by_id(STATUS_TEXT_ID).unwrap().text_content().unwrap(),
        "Connection Error"
    );
}

#[wasm_bindgen_test]
fn initialize_shows_workflow_summary() {
    let (document, mut view) = fresh_view();
    let panel = document
        .get_element_by_id(WORKFLOW_INFO_ID)
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    view.initialize(steps()).unwrap();

    let style = panel.style();
    assert_eq!(style.get_property_value("display").unwrap(), "block");
    // Faded in later by the reveal timer.
    assert_eq!(style.get_property_value("opacity").unwrap(), "0");
}
