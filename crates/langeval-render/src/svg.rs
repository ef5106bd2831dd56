//! SVG markup for a laid-out trace graph.

use std::fmt::Write;

use langeval_layout::{GraphEdge, GraphNode, TraceGraph};

use crate::style::style_for;
use crate::viewport::Viewport;

pub const CARD_WIDTH: f64 = 200.0;
pub const CARD_HEIGHT: f64 = 72.0;
const HEADER_HEIGHT: f64 = 26.0;
const LABEL_MAX_CHARS: usize = 28;

pub const EDGE_STROKE: &str = "#cbd5e1";
pub const EDGE_WIDTH: f64 = 2.0;
const SELECTED_STROKE: &str = "#6366f1";
const CARD_STROKE: &str = "#e2e8f0";
const ARROW_ID: &str = "arrow-closed";

const STYLE: &str = ".type{font:700 10px ui-sans-serif,system-ui,sans-serif;letter-spacing:.05em;fill:#475569}\
.label{font:600 12px ui-sans-serif,system-ui,sans-serif;fill:#1e293b}\
.badge{font:10px ui-monospace,SFMono-Regular,Menlo,monospace}";

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn duration_badge(seconds: f64) -> String {
    format!("{seconds:.2}s")
}

/// `None` when there is nothing to charge.
pub fn cost_badge(cost: f64) -> Option<String> {
    (cost > 0.0).then(|| format!("${cost:.5}"))
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= LABEL_MAX_CHARS {
        label.to_string()
    } else {
        let head: String = label.chars().take(LABEL_MAX_CHARS - 1).collect();
        format!("{head}\u{2026}")
    }
}

/// Renders `graph` through `viewport`, highlighting the node whose id is
/// `selected`.
pub fn render_svg(graph: &TraceGraph, viewport: &Viewport, selected: Option<&str>) -> String {
    let mut svg = String::with_capacity(512 + graph.nodes.len() * 1024);
    let (w, h) = (viewport.width, viewport.height);

    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" class=\"trace-flow-graph\">"
    );
    let _ = write!(svg, "<style>{STYLE}</style>");
    let _ = write!(
        svg,
        "<defs><marker id=\"{ARROW_ID}\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"20\" markerHeight=\"20\" markerUnits=\"userSpaceOnUse\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{EDGE_STROKE}\"/></marker></defs>"
    );
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"#f8fafc\"/>");
    let _ = write!(
        svg,
        "<g class=\"viewport\" transform=\"translate({} {}) scale({})\">",
        viewport.pan_x, viewport.pan_y, viewport.zoom
    );

    for edge in &graph.edges {
        let (Some(source), Some(target)) = (graph.node(&edge.source), graph.node(&edge.target)) else {
            continue;
        };
        push_edge(&mut svg, edge, source, target);
    }

    for node in &graph.nodes {
        push_node(&mut svg, node, selected == Some(node.id.as_str()));
    }

    svg.push_str("</g></svg>");
    svg
}

/// Bezier from the parent's bottom centre to the child's top centre.
fn push_edge(svg: &mut String, edge: &GraphEdge, source: &GraphNode, target: &GraphNode) {
    let x1 = source.position.x + CARD_WIDTH / 2.0;
    let y1 = source.position.y + CARD_HEIGHT;
    let x2 = target.position.x + CARD_WIDTH / 2.0;
    let y2 = target.position.y;
    let my = (y1 + y2) / 2.0;

    let _ = write!(
        svg,
        "<path class=\"edge\" data-id=\"{}\" d=\"M {x1} {y1} C {x1} {my} {x2} {my} {x2} {y2}\" fill=\"none\" stroke=\"{EDGE_STROKE}\" stroke-width=\"{EDGE_WIDTH}\" marker-end=\"url(#{ARROW_ID})\"/>",
        escape_xml(&edge.id)
    );
}

fn push_node(svg: &mut String, node: &GraphNode, selected: bool) {
    let style = style_for(node.data.observation_type());
    let (x, y) = (node.position.x, node.position.y);
    let class = if selected { "node selected" } else { "node" };
    let (stroke, stroke_width) = if selected {
        (SELECTED_STROKE, 2)
    } else {
        (CARD_STROKE, 1)
    };

    let _ = write!(
        svg,
        "<g class=\"{class}\" data-id=\"{}\" transform=\"translate({x} {y})\">",
        escape_xml(&node.id)
    );
    let _ = write!(
        svg,
        "<rect width=\"{CARD_WIDTH}\" height=\"{CARD_HEIGHT}\" rx=\"12\" fill=\"#ffffff\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>"
    );

    // Header strip
    let _ = write!(
        svg,
        "<path d=\"M 0 12 A 12 12 0 0 1 12 0 H {} A 12 12 0 0 1 {CARD_WIDTH} 12 V {HEADER_HEIGHT} H 0 Z\" fill=\"{}\"/>",
        CARD_WIDTH - 12.0,
        style.header_fill
    );
    let _ = write!(
        svg,
        "<line x1=\"0\" y1=\"{HEADER_HEIGHT}\" x2=\"{CARD_WIDTH}\" y2=\"{HEADER_HEIGHT}\" stroke=\"{}\"/>",
        style.header_border
    );
    let _ = write!(
        svg,
        "<g class=\"icon icon-{}\" transform=\"translate(10 6)\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.3\" stroke-linecap=\"round\" stroke-linejoin=\"round\"><path d=\"{}\"/></g>",
        style.icon.name(),
        style.accent,
        style.icon.path()
    );
    let _ = write!(
        svg,
        "<text class=\"type\" x=\"30\" y=\"17\">{}</text>",
        escape_xml(&node.data.kind.to_uppercase())
    );

    // Body
    let _ = write!(
        svg,
        "<text class=\"label\" x=\"12\" y=\"44\"><title>{}</title>{}</text>",
        escape_xml(&node.data.label),
        escape_xml(&truncate_label(&node.data.label))
    );
    let duration = duration_badge(node.data.duration);
    let _ = write!(
        svg,
        "<g class=\"badge duration\"><rect x=\"12\" y=\"52\" width=\"{}\" height=\"14\" rx=\"7\" fill=\"#f1f5f9\"/><text class=\"badge\" x=\"18\" y=\"62\" fill=\"#64748b\">{duration}</text></g>",
        badge_width(&duration)
    );
    if let Some(cost) = cost_badge(node.data.cost) {
        let width = badge_width(&cost);
        let bx = CARD_WIDTH - 12.0 - width;
        let _ = write!(
            svg,
            "<g class=\"badge cost\"><rect x=\"{bx}\" y=\"52\" width=\"{width}\" height=\"14\" rx=\"7\" fill=\"#ecfdf5\"/><text class=\"badge\" x=\"{}\" y=\"62\" fill=\"#047857\">{cost}</text></g>",
            bx + 6.0
        );
    }

    svg.push_str("</g>");
}

fn badge_width(text: &str) -> f64 {
    text.chars().count() as f64 * 6.0 + 12.0
}
