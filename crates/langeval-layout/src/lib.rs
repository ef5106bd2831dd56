//! Layout engine for LangEval traces.
//!
//! Turns a flat list of observations into a forest and assigns each node a
//! deterministic position with the recursive midpoint algorithm.
//!
//! ```
//! use langeval_config::LayoutConfig;
//! use langeval_core::Observation;
//! use langeval_layout::build_graph;
//!
//! let observations = vec![
//!     Observation::new("root"),
//!     Observation::new("child").with_parent("root"),
//! ];
//! let graph = build_graph(&observations, &LayoutConfig::default());
//! assert_eq!(graph.nodes.len(), 2);
//! assert_eq!(graph.edges[0].id, "e-root-child");
//! ```

pub mod derive;
mod graph;
mod layout;
mod tree;
pub mod waterfall;

pub use graph::{build_graph, GraphEdge, GraphNode, NodeData, TraceGraph};
pub use layout::{assign_positions, LayoutCursor, Position};
pub use tree::{TraceForest, TreeNode};
pub use waterfall::{build_waterfall, BarColor, Waterfall, WaterfallRow};
