use unicode_segmentation::UnicodeSegmentation;

use crate::constants::*;
use crate::models::Position;

/// Point on a node where connections attach: the middle of its right edge.
pub fn connection_anchor(position: Position) -> Position {
    Position::new(position.x + NODE_WIDTH, position.y + NODE_HEIGHT / 2.0)
}

/// Cubic Bézier between two anchors with horizontal tangents at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePath {
    pub start: Position,
    pub control1: Position,
    pub control2: Position,
    pub end: Position,
}

impl CurvePath {
    /// Curve from the anchor of the node at `from` to the anchor of the node
    /// at `to` (both are node top-left positions).
    pub fn between(from: Position, to: Position) -> Self {
        let start = connection_anchor(from);
        let end = connection_anchor(to);
        Self {
            start,
            control1: Position::new(start.x + CONNECTION_CONTROL_OFFSET, start.y),
            control2: Position::new(end.x - CONNECTION_CONTROL_OFFSET, end.y),
            end,
        }
    }

    /// SVG `d` attribute.
    pub fn to_svg(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        )
    }
}

/// Shorten `text` to at most `max` grapheme clusters, ending in an ellipsis
/// when anything was cut.
pub fn truncate_graphemes(text: &str, max: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(1);
    let mut out: String = graphemes[..keep].concat();
    out.push('…');
    out
}
