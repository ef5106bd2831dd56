//! Per-type card styling.

use langeval_core::ObservationType;
use serde::Serialize;

/// Glyph drawn in a card header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    MessageSquare,
    Database,
    Brain,
    Terminal,
}

impl Icon {
    pub fn name(&self) -> &'static str {
        match self {
            Icon::MessageSquare => "message-square",
            Icon::Database => "database",
            Icon::Brain => "brain",
            Icon::Terminal => "terminal",
        }
    }

    /// Stroke-only outline on a 14x14 grid.
    pub fn path(&self) -> &'static str {
        match self {
            Icon::MessageSquare => "M12.5 9a1.2 1.2 0 0 1-1.2 1.2H4L1.5 12.7V2.7A1.2 1.2 0 0 1 2.7 1.5h8.6a1.2 1.2 0 0 1 1.2 1.2z",
            Icon::Database => "M1.5 3a5.5 1.8 0 1 0 11 0a5.5 1.8 0 1 0-11 0M1.5 3v8c0 1 2.5 1.8 5.5 1.8s5.5-.8 5.5-1.8V3M1.5 7c0 1 2.5 1.8 5.5 1.8s5.5-.8 5.5-1.8",
            Icon::Brain => "M7 2.5A2 2 0 0 0 3.2 3.4 2 2 0 0 0 2 6.8a2.2 2.2 0 0 0 1.4 3.6A2 2 0 0 0 7 11.5zM7 2.5a2 2 0 0 1 3.8.9A2 2 0 0 1 12 6.8a2.2 2.2 0 0 1-1.4 3.6A2 2 0 0 1 7 11.5",
            Icon::Terminal => "M2 10.5 5.5 7 2 3.5M7 11.5h5",
        }
    }
}

/// Colours and icon of a node card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    pub icon: Icon,
    /// Icon stroke colour.
    pub accent: &'static str,
    pub header_fill: &'static str,
    pub header_border: &'static str,
}

pub fn style_for(kind: ObservationType) -> NodeStyle {
    match kind {
        ObservationType::Chain => NodeStyle {
            icon: Icon::MessageSquare,
            accent: "#6366f1",
            header_fill: "#eef2ff",
            header_border: "#c7d2fe",
        },
        ObservationType::Tool => NodeStyle {
            icon: Icon::Database,
            accent: "#f59e0b",
            header_fill: "#fffbeb",
            header_border: "#fde68a",
        },
        ObservationType::Model => NodeStyle {
            icon: Icon::Brain,
            accent: "#a855f7",
            header_fill: "#faf5ff",
            header_border: "#e9d5ff",
        },
        ObservationType::Generation => NodeStyle {
            icon: Icon::Brain,
            accent: "#0ea5e9",
            header_fill: "#f0f9ff",
            header_border: "#bae6fd",
        },
        ObservationType::Other => NodeStyle {
            icon: Icon::Terminal,
            accent: "#94a3b8",
            header_fill: "#f8fafc",
            header_border: "#e2e8f0",
        },
    }
}
