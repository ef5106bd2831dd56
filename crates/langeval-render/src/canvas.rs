//! Interactive trace graph: layout, viewport, hit testing and selection.

use langeval_config::LayoutConfig;
use langeval_core::Observation;
use langeval_layout::{build_graph, GraphNode, TraceGraph};

use crate::svg::{render_svg, CARD_HEIGHT, CARD_WIDTH};
use crate::viewport::{Bounds, Viewport, FIT_PADDING};

/// Renders a trace's observations as a node graph.
///
/// Selection is owned by the caller: [`TraceFlowGraph::render`] takes the
/// selected span id, and clicks on a card hand its original observation to
/// the `on_select` callback.
pub struct TraceFlowGraph<F>
where
    F: FnMut(&Observation),
{
    graph: TraceGraph,
    config: LayoutConfig,
    viewport: Viewport,
    on_select: F,
}

impl<F> TraceFlowGraph<F>
where
    F: FnMut(&Observation),
{
    pub fn new(observations: &[Observation], on_select: F) -> Self {
        Self::with_config(observations, LayoutConfig::default(), on_select)
    }

    pub fn with_config(observations: &[Observation], config: LayoutConfig, on_select: F) -> Self {
        let mut canvas = Self {
            graph: build_graph(observations, &config),
            config,
            viewport: Viewport::default(),
            on_select,
        };
        canvas.fit_view();
        canvas
    }

    /// Replaces the observations and recomputes the layout from scratch.
    pub fn set_observations(&mut self, observations: &[Observation]) {
        self.graph = build_graph(observations, &self.config);
        self.fit_view();
    }

    pub fn graph(&self) -> &TraceGraph {
        &self.graph
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.viewport.pan_by(dx, dy);
    }

    pub fn zoom_at(&mut self, factor: f64, sx: f64, sy: f64) {
        self.viewport.zoom_at(factor, sx, sy);
    }

    /// Bounding box of all cards, `None` for an empty graph.
    pub fn bounds(&self) -> Option<Bounds> {
        self.graph
            .nodes
            .iter()
            .map(card_bounds)
            .reduce(Bounds::union)
    }

    pub fn fit_view(&mut self) {
        if let Some(bounds) = self.bounds() {
            self.viewport.fit_view(bounds, FIT_PADDING);
        }
    }

    /// Card under the screen point; later cards win on overlap.
    pub fn node_at(&self, sx: f64, sy: f64) -> Option<&GraphNode> {
        let (gx, gy) = self.viewport.to_graph(sx, sy);
        self.graph.nodes.iter().rev().find(|n| {
            let b = card_bounds(n);
            gx >= b.min_x && gx <= b.max_x && gy >= b.min_y && gy <= b.max_y
        })
    }

    /// Dispatches a click at a screen point. Returns whether a card was hit.
    pub fn click(&mut self, sx: f64, sy: f64) -> bool {
        let Some(node) = self.node_at(sx, sy) else {
            return false;
        };
        tracing::debug!(id = %node.id, "Span selected");
        let original = node.data.original.clone();
        (self.on_select)(&original);
        true
    }

    pub fn render(&self, selected_span_id: Option<&str>) -> String {
        render_svg(&self.graph, &self.viewport, selected_span_id)
    }
}

fn card_bounds(node: &GraphNode) -> Bounds {
    Bounds {
        min_x: node.position.x,
        min_y: node.position.y,
        max_x: node.position.x + CARD_WIDTH,
        max_y: node.position.y + CARD_HEIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn trace() -> Vec<Observation> {
        vec![
            Observation::new("root").with_kind("CHAIN").with_name("pipeline"),
            Observation::new("tool").with_parent("root").with_kind("TOOL"),
            Observation::new("gen").with_parent("root").with_kind("GENERATION").with_cost(0.0021),
        ]
    }

    #[test]
    fn test_click_selects_original_observation() {
        let picked = RefCell::new(Vec::new());
        let list = trace();
        let mut canvas = TraceFlowGraph::new(&list, |obs: &Observation| {
            picked.borrow_mut().push(obs.clone())
        });
        canvas.viewport_mut().pan_x = 0.0;
        canvas.viewport_mut().pan_y = 0.0;
        canvas.viewport_mut().zoom = 1.0;

        // `tool` is the first leaf at (0, 180).
        assert!(canvas.click(50.0, 200.0));
        // Gap between rows.
        assert!(!canvas.click(50.0, 120.0));
        drop(canvas);

        let picked = picked.into_inner();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0], list[1]);
    }

    #[test]
    fn test_hit_testing_respects_viewport() {
        let list = trace();
        let mut canvas = TraceFlowGraph::new(&list, |_: &Observation| {});
        canvas.viewport_mut().pan_x = 100.0;
        canvas.viewport_mut().pan_y = 0.0;
        canvas.viewport_mut().zoom = 0.5;

        // root sits at graph (120, 0) -> screen (160, 0).
        assert_eq!(canvas.node_at(170.0, 10.0).map(|n| n.id.as_str()), Some("root"));
        assert!(canvas.node_at(50.0, 10.0).is_none());
    }

    #[test]
    fn test_render_marks_selection_and_styles() {
        let list = trace();
        let canvas = TraceFlowGraph::new(&list, |_: &Observation| {});
        let svg = canvas.render(Some("gen"));

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("class=\"node selected\"").count(), 1);
        assert!(svg.contains("class=\"node selected\" data-id=\"gen\""));
        assert!(svg.contains("icon-message-square"));
        assert!(svg.contains("icon-database"));
        assert!(svg.contains("icon-brain"));
        assert!(svg.contains(">GENERATION<"));
        assert!(svg.contains("$0.00210"));
        assert_eq!(svg.matches("class=\"edge\"").count(), 2);
    }

    #[test]
    fn test_unknown_selection_highlights_nothing() {
        let list = trace();
        let canvas = TraceFlowGraph::new(&list, |_: &Observation| {});
        assert!(!canvas.render(Some("nope")).contains("node selected"));
    }

    #[test]
    fn test_empty_graph_renders_empty_canvas() {
        let mut canvas = TraceFlowGraph::new(&[], |_: &Observation| {});
        let svg = canvas.render(None);

        assert!(canvas.bounds().is_none());
        assert!(svg.starts_with("<svg") && svg.ends_with("</svg>"));
        assert!(!svg.contains("class=\"node"));
        assert!(!canvas.click(10.0, 10.0));
    }

    #[test]
    fn test_fit_view_shows_every_card() {
        let list = trace();
        let canvas = TraceFlowGraph::new(&list, |_: &Observation| {});
        let vp = canvas.viewport();
        for node in &canvas.graph().nodes {
            let (sx, sy) = vp.to_screen(node.position.x, node.position.y);
            assert!(sx >= 0.0 && sx <= vp.width);
            assert!(sy >= 0.0 && sy <= vp.height);
        }
    }

    #[test]
    fn test_set_observations_relayouts() {
        let mut canvas = TraceFlowGraph::new(&trace(), |_: &Observation| {});
        canvas.set_observations(&[Observation::new("solo")]);
        assert_eq!(canvas.graph().nodes.len(), 1);
        assert_eq!(canvas.graph().nodes[0].position.x, 0.0);
    }
}
