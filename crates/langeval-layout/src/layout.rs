//! Recursive midpoint coordinate assignment.

use langeval_config::LayoutConfig;
use serde::{Deserialize, Serialize};

use crate::tree::TraceForest;

/// Top-left corner of a node in layout units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Next free leaf slot, threaded through the recursion.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutCursor {
    pub next_leaf_x: f64,
}

impl LayoutCursor {
    pub fn new() -> Self {
        Self::default()
    }

    fn take_slot(&mut self, width: f64) -> f64 {
        let x = self.next_leaf_x;
        self.next_leaf_x += width;
        x
    }
}

/// Assigns a position to every forest node, indexed like [`TraceForest::nodes`].
///
/// Leaves take consecutive slots left to right; a parent sits midway between
/// its first and last child; `y` is depth times the row height. Each root
/// subtree is followed by an empty gap.
pub fn assign_positions(forest: &TraceForest<'_>, config: &LayoutConfig) -> Vec<Position> {
    let mut positions = vec![Position::default(); forest.len()];
    let mut cursor = LayoutCursor::new();

    for &root in forest.roots() {
        assign_subtree(forest, root, &mut cursor, config, &mut positions);
        cursor.next_leaf_x += config.root_gap;
    }

    positions
}

/// Post-order walk over one root subtree on an explicit stack. An inner node
/// is popped twice: first to queue its children, then to centre over them.
fn assign_subtree(
    forest: &TraceForest<'_>,
    root: usize,
    cursor: &mut LayoutCursor,
    config: &LayoutConfig,
    positions: &mut [Position],
) {
    let mut stack: Vec<(usize, usize, bool)> = vec![(root, 0, false)];

    while let Some((index, depth, children_done)) = stack.pop() {
        let node = forest.node(index);

        let x = if node.is_leaf() {
            cursor.take_slot(config.node_width)
        } else if children_done {
            let first = node.children[0];
            let last = node.children[node.children.len() - 1];
            (positions[first].x + positions[last].x) / 2.0
        } else {
            stack.push((index, depth, true));
            for &child in node.children.iter().rev() {
                stack.push((child, depth + 1, false));
            }
            continue;
        };

        positions[index] = Position {
            x,
            y: depth as f64 * config.row_height,
        };
    }
}
