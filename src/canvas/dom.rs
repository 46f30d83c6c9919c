//! Browser scene: nodes are absolutely positioned `<div>` cards inside the
//! scene container, connections are `<g><path/></g>` groups on the SVG
//! drawing surface.

use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use super::scene::{SceneError, SceneGraph};
use super::shapes::{truncate_graphemes, CurvePath};
use crate::constants::*;
use crate::models::{ConnectionState, Node, Position, StepStatus, Viewport};
use crate::network::SocketStatus;
use crate::progress::ProgressReport;

impl From<JsValue> for SceneError {
    fn from(value: JsValue) -> Self {
        SceneError(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

/// A node card on the page.  Dropping it cancels a pending entrance.
pub struct DomNode {
    element: HtmlElement,
    status_label: Element,
    _entrance: Option<Timeout>,
}

pub struct DomScene {
    document: Document,
    container: HtmlElement,
    svg: Element,
    status_dot: Option<Element>,
    status_text: Option<Element>,
    info_panel: Option<HtmlElement>,
    progress_text: Option<Element>,
    progress_fill: Option<HtmlElement>,
    summary_reveal_delay_ms: u32,
    reveal: Option<Timeout>,
}

impl DomScene {
    /// Bind to the page chrome created by `ui::setup::ensure_chrome`.
    pub fn attach(document: &Document, summary_reveal_delay_ms: u32) -> Result<Self, JsValue> {
        let container = document
            .query_selector(&format!(".{}", SCENE_CONTAINER_CLASS))?
            .ok_or_else(|| JsValue::from_str("scene container not found"))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| JsValue::from_str("scene container is not an HTML element"))?;
        let svg = document
            .get_element_by_id(SVG_CANVAS_ID)
            .ok_or_else(|| JsValue::from_str("workflow canvas not found"))?;

        let html_by_id = |id: &str| {
            document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        };

        Ok(Self {
            document: document.clone(),
            container,
            svg,
            status_dot: document.get_element_by_id(STATUS_DOT_ID),
            status_text: document.get_element_by_id(STATUS_TEXT_ID),
            info_panel: html_by_id(WORKFLOW_INFO_ID),
            progress_text: document.get_element_by_id(PROGRESS_TEXT_ID),
            progress_fill: html_by_id(PROGRESS_FILL_ID),
            summary_reveal_delay_ms,
            reveal: None,
        })
    }

    fn div(&self, class: &str) -> Result<HtmlElement, SceneError> {
        let el = self
            .document
            .create_element("div")?
            .dyn_into::<HtmlElement>()
            .map_err(|_| SceneError::new("created element is not an HTML element"))?;
        el.set_class_name(class);
        Ok(el)
    }

    fn svg_element(&self, tag: &str) -> Result<Element, SceneError> {
        Ok(self.document.create_element_ns(Some(SVG_NS), tag)?)
    }
}

fn place(element: &HtmlElement, position: Position) -> Result<(), SceneError> {
    let style = element.style();
    style.set_property("left", &format!("{}px", position.x))?;
    style.set_property("top", &format!("{}px", position.y))?;
    Ok(())
}

// Used from timer callbacks, where there is no caller to hand an error to.
fn set_styles(element: &HtmlElement, properties: &[(&str, &str)]) {
    let style = element.style();
    for (name, value) in properties {
        if let Err(e) = style.set_property(name, value) {
            crate::console_warn!("Failed to set style {}: {:?}", name, e);
        }
    }
}

fn node_class(status: &StepStatus) -> String {
    format!("node {}", status.css_class())
}

impl SceneGraph for DomScene {
    type NodeHandle = DomNode;
    type ConnectionHandle = Element;

    fn add_node(&mut self, node: &Node, enter_delay_ms: u32) -> Result<DomNode, SceneError> {
        let card = self.div(&node_class(&node.step.status))?;
        card.set_attribute("data-step-id", &node.step.id)?;
        place(&card, node.position)?;

        let title = self.div("node-title")?;
        title.set_text_content(Some(&node.step.name));
        card.append_child(&title)?;

        let description = self.div("node-description")?;
        description.set_text_content(Some(&truncate_graphemes(
            &node.step.description,
            NODE_DESCRIPTION_MAX_GRAPHEMES,
        )));
        card.append_child(&description)?;

        let badge = self.div("node-status")?;
        let indicator = self.div("status-indicator")?;
        badge.append_child(&indicator)?;
        let status_label = self.document.create_element("span")?;
        status_label.set_class_name("status-label");
        status_label.set_text_content(Some(node.step.status.as_str()));
        badge.append_child(&status_label)?;
        card.append_child(&badge)?;

        let style = card.style();
        style.set_property("opacity", "0")?;
        style.set_property("transform", "translateY(20px)")?;
        self.container.append_child(&card)?;

        let target = card.clone();
        let entrance = Timeout::new(enter_delay_ms, move || {
            set_styles(
                &target,
                &[
                    ("transition", "all 0.6s cubic-bezier(0.4, 0, 0.2, 1)"),
                    ("opacity", "1"),
                    ("transform", "translateY(0)"),
                ],
            );
        });

        Ok(DomNode {
            element: card,
            status_label,
            _entrance: Some(entrance),
        })
    }

    fn remove_node(&mut self, handle: DomNode) {
        handle.element.remove();
    }

    fn move_node(&mut self, handle: &DomNode, position: Position) -> Result<(), SceneError> {
        place(&handle.element, position)
    }

    fn update_node_status(&mut self, handle: &DomNode, status: &StepStatus) -> Result<(), SceneError> {
        handle.element.set_class_name(&node_class(status));
        handle.status_label.set_text_content(Some(status.as_str()));
        Ok(())
    }

    fn add_connection(&mut self, path: &CurvePath, state: ConnectionState) -> Result<Element, SceneError> {
        let group = self.svg_element("g")?;
        group.set_attribute("class", state.css_class())?;

        let curve = self.svg_element("path")?;
        curve.set_attribute("d", &path.to_svg())?;
        curve.set_attribute("class", "connection-path")?;
        group.append_child(&curve)?;

        self.svg.append_child(&group)?;
        Ok(group)
    }

    fn remove_connection(&mut self, handle: Element) {
        handle.remove();
    }

    fn update_connection_state(&mut self, handle: &Element, state: ConnectionState) -> Result<(), SceneError> {
        handle.set_attribute("class", state.css_class())?;
        Ok(())
    }

    fn viewport_size(&self) -> Viewport {
        let rect = self.container.get_bounding_client_rect();
        Viewport::new(rect.width(), rect.height())
    }

    fn show_progress(&mut self, report: &ProgressReport) {
        if let Some(text) = &self.progress_text {
            text.set_text_content(Some(&report.text));
        }
        if let Some(fill) = &self.progress_fill {
            if let Err(e) = fill.style().set_property("width", &format!("{}%", report.percentage)) {
                crate::console_warn!("Failed to update progress bar: {:?}", e);
            }
        }
    }

    fn show_socket_status(&mut self, status: SocketStatus) {
        if let Some(dot) = &self.status_dot {
            dot.set_class_name(status.dot_class());
        }
        if let Some(text) = &self.status_text {
            text.set_text_content(Some(status.label()));
        }
    }

    fn reveal_summary(&mut self) {
        let Some(panel) = &self.info_panel else {
            return;
        };
        set_styles(panel, &[("display", "block"), ("opacity", "0")]);

        let target = panel.clone();
        self.reveal = Some(Timeout::new(self.summary_reveal_delay_ms, move || {
            set_styles(&target, &[("transition", "opacity 0.4s ease"), ("opacity", "1")]);
        }));
    }
}
