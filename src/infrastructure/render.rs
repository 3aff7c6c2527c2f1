//! Rendering adapters: turn a [`Scene`] into terminal text or an SVG document.

use std::fmt::Write as _;

use colored::Colorize;
use itertools::Itertools;
use termtree::Tree;

use crate::application::{NodeShape, NodeStyle, Scene};

/// Swappable rendering adapter.
pub trait Renderer {
    fn render(&self, scene: &Scene) -> String;
}

/// Colored `termtree` rendering for the terminal.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    pub color: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { color: true }
    }
}

impl TextRenderer {
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn label(&self, node: &NodeShape) -> String {
        let value = node.value.to_string();
        let value = match (self.color, node.style) {
            (false, NodeStyle::Prime) => format!("({value})"),
            (false, NodeStyle::Composite) => format!("[{value}]"),
            (false, NodeStyle::Decomposed) => value,
            (true, NodeStyle::Prime) => value.green().bold().to_string(),
            (true, NodeStyle::Composite) => value.blue().bold().to_string(),
            (true, NodeStyle::Decomposed) => value.dimmed().to_string(),
        };
        format!("{value} #{}", node.ordinal)
    }

    fn build(&self, scene: &Scene, ordinal: usize) -> Tree<String> {
        let Some(node) = scene.nodes.get(ordinal) else {
            return Tree::new(format!("#{ordinal}?"));
        };
        let leaves = node
            .children
            .iter()
            .map(|&child| self.build(scene, child))
            .collect::<Vec<_>>();
        Tree::new(self.label(node)).with_leaves(leaves)
    }
}

impl Renderer for TextRenderer {
    fn render(&self, scene: &Scene) -> String {
        let mut out = String::new();
        let header = format!("Tree {}", scene.tree);
        if self.color {
            let _ = writeln!(out, "{}", header.cyan().bold());
        } else {
            let _ = writeln!(out, "{header}");
        }
        if scene.root().is_some() {
            let _ = write!(out, "{}", self.build(scene, 0));
        }
        if let Some(popup) = &scene.popup {
            let _ = writeln!(out, "choices for #{}:", popup.node_ordinal);
            for (i, label) in popup.labels.iter().enumerate() {
                let _ = writeln!(out, "  [{i}] {label}");
            }
        }
        if let Some(result) = &scene.result {
            let _ = writeln!(out, "{}", result.expanded);
            let _ = writeln!(out, "{}", result.compact);
        }
        out
    }
}

/// Standalone SVG document, one per canvas.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer;

const SVG_STYLE: &str = "\
.node { stroke: #1f2d3d; stroke-width: 2; }
.composite { fill: #4a90d9; cursor: pointer; }
.decomposed { fill: #9bb8d9; }
.prime { fill: #4caf50; }
.line { stroke: #555; stroke-width: 2; }
.label { font: bold 16px sans-serif; fill: #fff; }
.popup rect { fill: #fff; stroke: #888; }
.popup text { font: 14px sans-serif; fill: #222; }
.tree-result { font: bold 18px sans-serif; fill: #222; }";

impl SvgRenderer {
    fn class(style: NodeStyle) -> &'static str {
        match style {
            NodeStyle::Composite => "composite",
            NodeStyle::Decomposed => "decomposed",
            NodeStyle::Prime => "prime",
        }
    }
}

impl Renderer for SvgRenderer {
    fn render(&self, scene: &Scene) -> String {
        let mut svg = String::new();
        let (w, h) = (scene.width, scene.height);
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        let _ = writeln!(svg, "<style>\n{SVG_STYLE}\n</style>");

        // connectors first so bubbles paint over them
        for c in &scene.connectors {
            let (x, y) = (c.origin.x, c.origin.y);
            let _ = writeln!(
                svg,
                r#"<line class="line" x1="{x:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" transform="rotate({:.4} {x:.2} {y:.2})"/>"#,
                x + c.length,
                c.angle_deg
            );
        }

        for node in &scene.nodes {
            let (x, y) = (node.position.x, node.position.y);
            let _ = writeln!(
                svg,
                r#"<g id="node-{}"><circle class="node {}" cx="{x:.2}" cy="{y:.2}" r="{}"/><text class="label" x="{x:.2}" y="{y:.2}" text-anchor="middle" dominant-baseline="central">{}</text></g>"#,
                node.ordinal,
                Self::class(node.style),
                scene.node_radius,
                node.value
            );
        }

        if let Some(popup) = &scene.popup {
            let (x, y) = (popup.anchor.x, popup.anchor.y);
            let height = 24.0 * popup.labels.len() as f64 + 8.0;
            let _ = writeln!(svg, r#"<g class="popup">"#);
            let _ = writeln!(
                svg,
                r#"<rect x="{x:.2}" y="{y:.2}" width="90" height="{height:.2}" rx="6"/>"#
            );
            for (i, label) in popup.labels.iter().enumerate() {
                let _ = writeln!(
                    svg,
                    r#"<text x="{:.2}" y="{:.2}">{label}</text>"#,
                    x + 10.0,
                    y + 24.0 * (i as f64 + 1.0)
                );
            }
            let _ = writeln!(svg, "</g>");
        }

        if let Some(result) = &scene.result {
            let x = scene.width / 2.0;
            let y = scene.height - 50.0;
            let compact = result
                .powers
                .iter()
                .map(|p| {
                    if p.exponent == 1 {
                        p.base.to_string()
                    } else {
                        format!(
                            r#"{}<tspan baseline-shift="super" font-size="70%">{}</tspan>"#,
                            p.base, p.exponent
                        )
                    }
                })
                .join(" × ");
            let _ = writeln!(
                svg,
                r#"<text class="tree-result" x="{x:.2}" y="{y:.2}" text-anchor="middle">{}</text>"#,
                result.expanded
            );
            let _ = writeln!(
                svg,
                r#"<text class="tree-result" x="{x:.2}" y="{:.2}" text-anchor="middle">{compact}</text>"#,
                y + 26.0
            );
        }

        svg.push_str("</svg>\n");
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{describe, Session};
    use crate::domain::FactorPair;

    fn scene_for_twelve(complete: bool) -> Scene {
        let mut s = Session::default();
        s.start("12").unwrap();
        let root = s.resolve(0, 0).unwrap();
        s.choose_node(root).unwrap();
        s.apply_choice(root, FactorPair(2, 6)).unwrap();
        let six = s.resolve(0, 2).unwrap();
        s.choose_node(six).unwrap();
        if complete {
            s.apply_choice(six, FactorPair(2, 3)).unwrap();
        }
        describe(0, s.canvas(0).unwrap(), s.layout().config())
    }

    #[test]
    fn test_plain_text_tree() {
        let out = TextRenderer::plain().render(&scene_for_twelve(false));
        assert!(out.starts_with("Tree 0\n12 #0\n"));
        assert!(out.contains("(2) #1"));
        assert!(out.contains("[6] #2"));
        assert!(out.contains("choices for #2:"));
        assert!(out.contains("[0] 2 × 3"));
    }

    #[test]
    fn test_plain_text_result() {
        let out = TextRenderer::plain().render(&scene_for_twelve(true));
        assert!(out.contains("12 = 2 × 2 × 3\n2^2 × 3\n"));
        assert!(!out.contains("choices"));
    }

    #[test]
    fn test_svg_document() {
        let svg = SvgRenderer.render(&scene_for_twelve(true));
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 5);
        assert_eq!(svg.matches("<line").count(), 4);
        assert_eq!(svg.matches(r#"class="node prime""#).count(), 3);
        assert!(svg.contains(r#"2<tspan baseline-shift="super" font-size="70%">2</tspan> × 3"#));
        assert!(svg.contains("12 = 2 × 2 × 3"));
    }
}
