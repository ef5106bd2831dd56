//! LangEval trace viewer core.
//!
//! Re-exports the workspace crates behind one dependency:
//!
//! - [`core`]: observation and trace wire types
//! - [`config`]: layout, upstream and server settings
//! - [`layout`]: forest reconstruction, midpoint layout, waterfall rows
//! - [`render`]: SVG graph canvas and detail panel
//! - [`monitor`]: trace summary and score projection
//!
//! # Example
//!
//! ```rust
//! use langeval::prelude::*;
//!
//! let observations = vec![
//!     Observation::new("root").with_kind("CHAIN"),
//!     Observation::new("llm").with_parent("root").with_kind("GENERATION"),
//! ];
//!
//! let mut selected = None;
//! let mut graph = TraceFlowGraph::new(&observations, |obs: &Observation| {
//!     selected = Some(obs.id.clone());
//! });
//! let svg = graph.render(None);
//! assert!(svg.contains("data-id=\"llm\""));
//!
//! let node = graph.graph().node("llm").unwrap().position;
//! let (sx, sy) = graph.viewport().to_screen(node.x + 10.0, node.y + 10.0);
//! assert!(graph.click(sx, sy));
//! drop(graph);
//! assert_eq!(selected.as_deref(), Some("llm"));
//! ```

pub use langeval_config as config;
pub use langeval_core as core;
pub use langeval_layout as layout;
pub use langeval_monitor as monitor;
pub use langeval_render as render;

pub mod prelude {
    pub use langeval_config::{LayoutConfig, ViewerConfig};
    pub use langeval_core::{
        DataSource, Observation, ObservationType, Score, ScoreDataType, TraceDetail,
        TraceEnvelope, TraceError, Usage,
    };
    pub use langeval_layout::{
        build_graph, build_waterfall, GraphEdge, GraphNode, TraceGraph, Waterfall, WaterfallRow,
    };
    pub use langeval_monitor::{Grade, ScoreReport, TraceSummary};
    pub use langeval_render::{DetailPanel, TraceFlowGraph, Viewport};
}
