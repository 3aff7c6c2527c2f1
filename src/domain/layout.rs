//! Layout engine: node coordinates and connector geometry.
//!
//! Pure geometry in abstract layout units, independent of any rendering surface.

use serde::{Deserialize, Serialize};

/// A point in layout units, origin at the top-left of a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A straight segment drawn from `origin` with `length`, rotated by `angle_deg`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub origin: Point,
    pub length: f64,
    pub angle_deg: f64,
}

/// Tunable layout constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Vertical offset of the root from the top of its canvas
    pub root_y: f64,
    /// Vertical distance between a parent and its children
    pub level_gap: f64,
    /// Numerator of the horizontal spread `spread_base / (depth + depth_bias)`
    pub spread_base: f64,
    pub depth_bias: f64,
    /// Horizontal offset of a choice popup from its node
    pub popup_offset_x: f64,
    pub node_radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 600.0,
            canvas_height: 500.0,
            root_y: 50.0,
            level_gap: 100.0,
            spread_base: 130.0,
            depth_bias: 1.5,
            popup_offset_x: 35.0,
            node_radius: 25.0,
        }
    }
}

/// Places new nodes relative to their parent.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Horizontally centered, `root_y` below the top.
    pub fn root_position(&self, canvas_width: f64) -> Point {
        Point::new(canvas_width / 2.0, self.config.root_y)
    }

    /// Horizontal spread for children of a node at `depth`; shrinks as depth grows.
    pub fn spread(&self, depth: usize) -> f64 {
        self.config.spread_base / (depth as f64 + self.config.depth_bias)
    }

    /// Symmetric left/right child positions one level below the parent.
    pub fn child_positions(&self, parent: Point, depth: usize) -> (Point, Point) {
        let spread = self.spread(depth);
        let y = parent.y + self.config.level_gap;
        (
            Point::new(parent.x - spread, y),
            Point::new(parent.x + spread, y),
        )
    }

    /// Anchor of a choice popup for a node at `node`.
    pub fn popup_anchor(&self, node: Point) -> Point {
        Point::new(node.x + self.config.popup_offset_x, node.y)
    }
}

/// Segment from `from` to `to`: Euclidean length and `atan2` angle in degrees.
pub fn connector(from: Point, to: Point) -> Connector {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    Connector {
        origin: from,
        length: dx.hypot(dy),
        angle_deg: dy.atan2(dx).to_degrees(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_root_is_centered_at_fixed_offset() {
        let engine = LayoutEngine::default();
        assert_eq!(engine.root_position(600.0), Point::new(300.0, 50.0));
    }

    #[test]
    fn test_child_positions_at_root_depth() {
        let engine = LayoutEngine::default();
        let (left, right) = engine.child_positions(Point::new(300.0, 50.0), 0);
        let spread = 130.0 / 1.5;
        assert!((left.x - (300.0 - spread)).abs() < EPS);
        assert!((right.x - (300.0 + spread)).abs() < EPS);
        assert_eq!(left.y, 150.0);
        assert_eq!(right.y, 150.0);
    }

    #[test]
    fn test_spread_shrinks_with_depth() {
        let engine = LayoutEngine::default();
        assert!(engine.spread(0) > engine.spread(1));
        assert!(engine.spread(1) > engine.spread(5));
    }

    #[test]
    fn test_connector_geometry() {
        let c = connector(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((c.length - 5.0).abs() < EPS);
        assert!((c.angle_deg - 53.13010235415598).abs() < 1e-6);

        let down = connector(Point::new(10.0, 10.0), Point::new(10.0, 110.0));
        assert!((down.angle_deg - 90.0).abs() < EPS);
    }

    #[test]
    fn test_popup_anchor_offsets_right() {
        let engine = LayoutEngine::default();
        assert_eq!(
            engine.popup_anchor(Point::new(100.0, 150.0)),
            Point::new(135.0, 150.0)
        );
    }
}
