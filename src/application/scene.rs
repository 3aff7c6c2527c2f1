//! Renderable description of a tree canvas.
//!
//! A pure function of session state; renderers in the infrastructure layer
//! turn a [`Scene`] into text or graphics.

use crate::application::session::{TreeCanvas, TreeId};
use crate::domain::{Connector, LayoutConfig, Point, PrimePower};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStyle {
    /// Composite, still clickable
    Composite,
    Decomposed,
    Prime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeShape {
    pub ordinal: usize,
    pub value: u64,
    pub position: Point,
    pub style: NodeStyle,
    /// Ordinals of the left and right child
    pub children: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupShape {
    pub node_ordinal: usize,
    pub anchor: Point,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultPanel {
    pub expanded: String,
    pub compact: String,
    pub powers: Vec<PrimePower>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub tree: TreeId,
    pub width: f64,
    pub height: f64,
    pub node_radius: f64,
    /// Indexed by ordinal, root first
    pub nodes: Vec<NodeShape>,
    pub connectors: Vec<Connector>,
    pub popup: Option<PopupShape>,
    pub result: Option<ResultPanel>,
}

impl Scene {
    pub fn root(&self) -> Option<&NodeShape> {
        self.nodes.first()
    }
}

/// Describes one canvas.
pub fn describe(tree: TreeId, canvas: &TreeCanvas, config: &LayoutConfig) -> Scene {
    let nodes: Vec<NodeShape> = canvas
        .tree
        .nodes()
        .map(|(_, node)| {
            let data = &node.data;
            let style = match (data.is_prime(), data.decomposed) {
                (true, _) => NodeStyle::Prime,
                (false, true) => NodeStyle::Decomposed,
                (false, false) => NodeStyle::Composite,
            };
            NodeShape {
                ordinal: data.ordinal,
                value: data.value,
                position: data.position,
                style,
                children: node
                    .children
                    .iter()
                    .filter_map(|&c| canvas.tree.get_node(c))
                    .map(|c| c.data.ordinal)
                    .collect(),
            }
        })
        .collect();

    let popup = canvas.popup.as_ref().and_then(|p| {
        canvas.tree.get_node(p.node).map(|n| PopupShape {
            node_ordinal: n.data.ordinal,
            anchor: p.anchor,
            labels: p.choices.iter().map(|c| c.to_string()).collect(),
        })
    });

    let result = canvas.result.as_ref().map(|f| ResultPanel {
        expanded: f.expanded(),
        compact: f.compact(),
        powers: f.powers(),
    });

    // one level gap of room below the deepest row
    let needed = config.root_y + canvas.tree.depth() as f64 * config.level_gap;

    Scene {
        tree,
        width: config.canvas_width,
        height: config.canvas_height.max(needed),
        node_radius: config.node_radius,
        nodes,
        connectors: canvas.connectors.clone(),
        popup,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::session::Session;
    use crate::domain::FactorPair;

    #[test]
    fn test_describe_partial_tree_with_popup() {
        let mut s = Session::default();
        s.start("12").unwrap();
        let root = s.resolve(0, 0).unwrap();
        s.choose_node(root).unwrap();
        s.apply_choice(root, FactorPair(2, 6)).unwrap();
        let six = s.resolve(0, 2).unwrap();
        s.choose_node(six).unwrap();

        let scene = describe(0, s.canvas(0).unwrap(), s.layout().config());
        let styles: Vec<NodeStyle> = scene.nodes.iter().map(|n| n.style).collect();
        assert_eq!(
            styles,
            vec![NodeStyle::Decomposed, NodeStyle::Prime, NodeStyle::Composite]
        );
        assert_eq!(scene.nodes[0].children, vec![1, 2]);
        assert_eq!(scene.connectors.len(), 2);
        let popup = scene.popup.unwrap();
        assert_eq!(popup.node_ordinal, 2);
        assert_eq!(popup.labels, vec!["2 × 3".to_string()]);
        assert!(scene.result.is_none());
        assert_eq!(scene.height, 500.0);
    }

    #[test]
    fn test_describe_completed_tree() {
        let mut s = Session::default();
        s.start("12").unwrap();
        s.auto_complete(0, Default::default()).unwrap();
        let scene = describe(0, s.canvas(0).unwrap(), s.layout().config());
        let result = scene.result.unwrap();
        assert_eq!(result.expanded, "12 = 2 × 2 × 3");
        assert_eq!(result.compact, "2^2 × 3");
        assert!(scene.popup.is_none());
    }

    #[test]
    fn test_deep_tree_grows_canvas_height() {
        let mut s = Session::default();
        s.start("1024").unwrap();
        s.auto_complete(0, Default::default()).unwrap();
        let canvas = s.canvas(0).unwrap();
        // 1024 = 2 × 512 = 2 × 2 × 256 ... ten splits deep
        assert_eq!(canvas.tree.depth(), 11);
        let scene = describe(0, canvas, s.layout().config());
        assert_eq!(scene.height, 50.0 + 11.0 * 100.0);
        let lowest = scene.nodes.iter().map(|n| n.position.y).fold(0.0, f64::max);
        assert!(scene.height >= lowest + 100.0);
    }
}
