use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::constants::*;

/// Create the status bar, workflow info panel and scene container unless the
/// hosting page already provides them.
pub fn ensure_chrome(document: &Document) -> Result<(), JsValue> {
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    if document.get_element_by_id(STATUS_DOT_ID).is_none() {
        let bar = document.create_element("div")?;
        bar.set_class_name("connection-bar");

        let dot = document.create_element("span")?;
        dot.set_id(STATUS_DOT_ID);
        dot.set_class_name("status-dot");
        bar.append_child(&dot)?;

        let text = document.create_element("span")?;
        text.set_id(STATUS_TEXT_ID);
        text.set_text_content(Some("Connecting..."));
        bar.append_child(&text)?;

        body.append_child(&bar)?;
    }

    if document.get_element_by_id(WORKFLOW_INFO_ID).is_none() {
        let info = document.create_element("div")?;
        info.set_id(WORKFLOW_INFO_ID);
        info.set_class_name("workflow-info");
        info.set_attribute("style", "display: none;")?;

        let text = document.create_element("div")?;
        text.set_id(PROGRESS_TEXT_ID);
        info.append_child(&text)?;

        let bar = document.create_element("div")?;
        bar.set_class_name("progress-bar");
        let fill = document.create_element("div")?;
        fill.set_id(PROGRESS_FILL_ID);
        fill.set_class_name("progress-fill");
        bar.append_child(&fill)?;
        info.append_child(&bar)?;

        body.append_child(&info)?;
    }

    let container = match document.query_selector(&format!(".{}", SCENE_CONTAINER_CLASS))? {
        Some(existing) => existing,
        None => {
            let container = document.create_element("div")?;
            container.set_class_name(SCENE_CONTAINER_CLASS);
            body.append_child(&container)?;
            container
        }
    };

    if document.get_element_by_id(SVG_CANVAS_ID).is_none() {
        let canvas = create_canvas(document)?;
        container.append_child(&canvas)?;
    }

    Ok(())
}

// The drawing surface keeps a <defs> block first so connection paths can
// reference the arrow marker.
fn create_canvas(document: &Document) -> Result<Element, JsValue> {
    let svg = document.create_element_ns(Some(SVG_NS), "svg")?;
    svg.set_id(SVG_CANVAS_ID);
    svg.set_attribute("class", "workflow-canvas")?;

    let defs = document.create_element_ns(Some(SVG_NS), "defs")?;
    let marker = document.create_element_ns(Some(SVG_NS), "marker")?;
    marker.set_id("arrowhead");
    marker.set_attribute("markerWidth", "10")?;
    marker.set_attribute("markerHeight", "7")?;
    marker.set_attribute("refX", "9")?;
    marker.set_attribute("refY", "3.5")?;
    marker.set_attribute("orient", "auto")?;

    let head = document.create_element_ns(Some(SVG_NS), "polygon")?;
    head.set_attribute("points", "0 0, 10 3.5, 0 7")?;
    marker.append_child(&head)?;
    defs.append_child(&marker)?;
    svg.append_child(&defs)?;

    Ok(svg)
}
