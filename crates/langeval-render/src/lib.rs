//! Trace graph rendering for LangEval.
//!
//! [`TraceFlowGraph`] lays out a trace, draws it as SVG cards joined by
//! arrowed edges, and maps clicks back to the observation under the cursor.
//! [`DetailPanel`] is the side view of the selected observation.

mod canvas;
pub mod detail;
pub mod style;
pub mod svg;
pub mod viewport;

pub use canvas::TraceFlowGraph;
pub use detail::{DetailPanel, MetadataRow};
pub use style::{style_for, Icon, NodeStyle};
pub use svg::render_svg;
pub use viewport::{Bounds, Viewport};
