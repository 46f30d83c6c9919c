//! Placement of workflow nodes along a gentle S-curve.
//!
//! The curve sweeps from the upper-left towards the lower-right of the
//! container, drifting downwards with progress, and every node is clamped so
//! its whole card stays inside the viewport.

use crate::constants::*;
use crate::models::{Position, Viewport};

/// Position of the node at `index` out of `count` inside `viewport`.
///
/// Pure and deterministic: relayout on resize simply calls it again.
pub fn node_position(index: usize, count: usize, viewport: Viewport) -> Position {
    let center_x = viewport.width / 2.0;
    let center_y = viewport.height / 2.0;

    if count <= 1 {
        return Position::new(center_x - NODE_WIDTH / 2.0, center_y - NODE_HEIGHT / 2.0);
    }

    let progress = index as f64 / (count - 1) as f64;
    let angle = (progress - 0.5) * LAYOUT_SWEEP;

    let radius = (viewport.width * LAYOUT_RADIUS_WIDTH_FACTOR)
        .min(viewport.height * LAYOUT_RADIUS_HEIGHT_FACTOR);
    let x = center_x + angle.sin() * radius - NODE_WIDTH / 2.0;
    let y = center_y + angle.cos() * radius * LAYOUT_VERTICAL_SQUASH - NODE_HEIGHT / 2.0
        + progress * viewport.height * LAYOUT_VERTICAL_DRIFT;

    Position::new(
        clamp_axis(x, viewport.width - NODE_WIDTH - LAYOUT_MARGIN),
        clamp_axis(y, viewport.height - NODE_HEIGHT - LAYOUT_MARGIN),
    )
}

/// Positions for a whole workflow of `count` steps.
pub fn layout_all(count: usize, viewport: Viewport) -> Vec<Position> {
    (0..count).map(|index| node_position(index, count, viewport)).collect()
}

// Upper bound first, then the margin: a viewport too small for the card
// still keeps the node at the top-left margin instead of going negative.
fn clamp_axis(value: f64, upper: f64) -> f64 {
    value.min(upper).max(LAYOUT_MARGIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_node_is_centered() {
        let p = node_position(0, 1, Viewport::new(1200.0, 800.0));
        assert_eq!(p, Position::new(460.0, 350.0));
    }

    #[test]
    fn single_node_is_not_clamped() {
        let p = node_position(0, 1, Viewport::new(100.0, 60.0));
        assert_eq!(p, Position::new(-90.0, -20.0));
    }

    #[test]
    fn endpoints_of_the_curve() {
        let viewport = Viewport::new(1200.0, 800.0);
        // radius = min(360, 200) = 200, angle = -0.4π at the start.
        let first = node_position(0, 3, viewport);
        let expected_x = 600.0 + (-0.4 * std::f64::consts::PI).sin() * 200.0 - 140.0;
        let expected_y = 400.0 + (-0.4 * std::f64::consts::PI).cos() * 200.0 * 0.6 - 50.0;
        assert!(approx(first.x, expected_x));
        assert!(approx(first.y, expected_y));

        // The middle node sits on the vertical axis, pushed down by drift.
        let middle = node_position(1, 3, viewport);
        assert!(approx(middle.x, 460.0));
        assert!(approx(middle.y, 400.0 + 120.0 - 50.0 + 80.0));
    }

    #[test]
    fn tiny_viewport_pins_to_margin() {
        let viewport = Viewport::new(0.0, 0.0);
        for p in layout_all(4, viewport) {
            assert_eq!(p, Position::new(50.0, 50.0));
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let viewport = Viewport::new(1024.0, 768.0);
        assert_eq!(layout_all(7, viewport), layout_all(7, viewport));
    }

    #[test]
    fn empty_workflow_has_no_positions() {
        assert!(layout_all(0, Viewport::new(800.0, 600.0)).is_empty());
    }

    proptest! {
        #[test]
        fn positions_stay_inside_viewport(
            count in 2usize..40,
            width in 400.0f64..4000.0,
            height in 220.0f64..3000.0,
            pick in 0.0f64..1.0,
        ) {
            let index = ((count - 1) as f64 * pick).round() as usize;
            let p = node_position(index, count, Viewport::new(width, height));
            prop_assert!(p.x >= 50.0 && p.x <= width - 330.0);
            prop_assert!(p.y >= 50.0 && p.y <= height - 150.0);
        }

        #[test]
        fn x_never_moves_left_along_the_curve(
            count in 2usize..30,
            width in 400.0f64..4000.0,
            height in 220.0f64..3000.0,
        ) {
            let positions = layout_all(count, Viewport::new(width, height));
            for pair in positions.windows(2) {
                prop_assert!(pair[1].x >= pair[0].x - 1e-9);
            }
        }
    }
}
