//! Forest reconstruction from a flat observation list.

use std::collections::HashMap;

use langeval_core::Observation;

/// One observation placed in the forest.
#[derive(Debug, Clone)]
pub struct TreeNode<'a> {
    pub observation: &'a Observation,
    /// Index of the parent node, `None` for roots.
    pub parent: Option<usize>,
    /// Child indices in start-time order.
    pub children: Vec<usize>,
}

impl TreeNode<'_> {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Observations arranged as a forest.
///
/// Nodes are stored in start-time order (missing start times last, ties in
/// input order), so node indices double as a stable ordering key.
#[derive(Debug, Clone, Default)]
pub struct TraceForest<'a> {
    nodes: Vec<TreeNode<'a>>,
    roots: Vec<usize>,
}

impl<'a> TraceForest<'a> {
    pub fn build(observations: &'a [Observation]) -> Self {
        let mut sorted: Vec<&Observation> = observations.iter().collect();
        sorted.sort_by_key(|o| (o.start_time.is_none(), o.start_time));

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(sorted.len());
        let mut nodes: Vec<TreeNode<'a>> = Vec::with_capacity(sorted.len());
        for obs in sorted {
            if index.contains_key(obs.id.as_str()) {
                tracing::warn!(id = %obs.id, "Dropping observation with duplicate id");
                continue;
            }
            index.insert(obs.id.as_str(), nodes.len());
            nodes.push(TreeNode {
                observation: obs,
                parent: None,
                children: Vec::new(),
            });
        }

        let mut roots = Vec::new();
        for i in 0..nodes.len() {
            let obs = nodes[i].observation;
            let parent = obs
                .parent_observation_id
                .as_deref()
                .and_then(|pid| index.get(pid).copied());

            match parent {
                Some(p) if p != i => {
                    nodes[i].parent = Some(p);
                    nodes[p].children.push(i);
                }
                Some(_) => {
                    tracing::warn!(id = %obs.id, "Observation is its own parent, treating as root");
                    roots.push(i);
                }
                None => {
                    if let Some(pid) = obs.parent_observation_id.as_deref() {
                        tracing::debug!(id = %obs.id, parent = pid, "Parent not in trace, treating as root");
                    }
                    roots.push(i);
                }
            }
        }

        let mut forest = Self { nodes, roots };
        forest.break_cycles();
        forest
    }

    /// Nodes unreachable from any root sit on (or under) a parent cycle.
    /// The earliest such node becomes a root until everything is reachable.
    fn break_cycles(&mut self) {
        let mut visited = vec![false; self.nodes.len()];
        for &root in &self.roots {
            self.mark_subtree(root, &mut visited);
        }

        let mut promoted = false;
        while let Some(i) = visited.iter().position(|v| !v) {
            if let Some(p) = self.nodes[i].parent.take() {
                self.nodes[p].children.retain(|&c| c != i);
            }
            tracing::warn!(
                id = %self.nodes[i].observation.id,
                "Parent cycle detected, promoting observation to root"
            );
            self.roots.push(i);
            self.mark_subtree(i, &mut visited);
            promoted = true;
        }

        if promoted {
            self.roots.sort_unstable();
        }
    }

    fn mark_subtree(&self, start: usize, visited: &mut [bool]) {
        let mut stack = vec![start];
        while let Some(i) = stack.pop() {
            if visited[i] {
                continue;
            }
            visited[i] = true;
            stack.extend(self.nodes[i].children.iter().copied());
        }
    }

    pub fn nodes(&self) -> &[TreeNode<'a>] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> &TreeNode<'a> {
        &self.nodes[index]
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first pre-order walk as `(index, depth)` pairs, roots in order.
    pub fn preorder(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|&r| (r, 0)).collect();
        while let Some((i, depth)) = stack.pop() {
            out.push((i, depth));
            for &child in self.nodes[i].children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn obs(id: &str, parent: Option<&str>, start_ms: Option<i64>) -> Observation {
        let start = start_ms.and_then(|ms| Utc.timestamp_millis_opt(ms).single());
        let o = Observation::new(id).with_times(start, None);
        match parent {
            Some(p) => o.with_parent(p),
            None => o,
        }
    }

    fn ids<'a>(forest: &TraceForest<'a>, indices: &[usize]) -> Vec<&'a str> {
        indices
            .iter()
            .map(|&i| forest.node(i).observation.id.as_str())
            .collect()
    }

    #[test]
    fn test_sort_and_attach() {
        let list = vec![
            obs("d", Some("a"), Some(40)),
            obs("a", None, Some(10)),
            obs("c", Some("a"), Some(30)),
            obs("root", None, Some(0)),
        ];
        let forest = TraceForest::build(&list);

        assert_eq!(ids(&forest, forest.roots()), vec!["root", "a"]);
        let a = forest.nodes().iter().position(|n| n.observation.id == "a").unwrap();
        assert_eq!(ids(&forest, &forest.node(a).children), vec!["c", "d"]);
    }

    #[test]
    fn test_missing_start_sorts_last_in_input_order() {
        let list = vec![
            obs("x", None, None),
            obs("b", None, Some(5)),
            obs("y", None, None),
            obs("a", None, Some(1)),
        ];
        let forest = TraceForest::build(&list);
        assert_eq!(ids(&forest, forest.roots()), vec!["a", "b", "x", "y"]);
    }

    #[test]
    fn test_equal_start_keeps_input_order() {
        let list = vec![obs("second", None, Some(0)), obs("first", None, Some(0))];
        let forest = TraceForest::build(&list);
        assert_eq!(ids(&forest, forest.roots()), vec!["second", "first"]);
    }

    #[test]
    fn test_dangling_parent_is_root() {
        let list = vec![obs("a", None, Some(0)), obs("orphan", Some("gone"), Some(1))];
        let forest = TraceForest::build(&list);
        assert_eq!(ids(&forest, forest.roots()), vec!["a", "orphan"]);
        assert!(forest.node(1).parent.is_none());
    }

    #[test]
    fn test_duplicate_id_keeps_first() {
        let list = vec![obs("a", None, Some(5)), obs("a", None, Some(1))];
        let forest = TraceForest::build(&list);
        assert_eq!(forest.len(), 1);
        assert_eq!(
            forest.node(0).observation.start_time,
            Utc.timestamp_millis_opt(1).single()
        );
    }

    #[test]
    fn test_cycle_promotes_earliest_member() {
        let list = vec![
            obs("root", None, Some(0)),
            obs("p", Some("q"), Some(10)),
            obs("q", Some("p"), Some(20)),
            obs("r", Some("q"), Some(30)),
        ];
        let forest = TraceForest::build(&list);

        assert_eq!(ids(&forest, forest.roots()), vec!["root", "p"]);
        let p = 1;
        assert!(forest.node(p).parent.is_none());
        assert_eq!(ids(&forest, &forest.node(p).children), vec!["q"]);
        assert_eq!(forest.preorder().len(), 4);
    }

    #[test]
    fn test_self_parent_is_root() {
        let list = vec![obs("loop", Some("loop"), Some(0))];
        let forest = TraceForest::build(&list);
        assert_eq!(forest.roots(), &[0]);
        assert!(forest.node(0).children.is_empty());
    }

    #[test]
    fn test_preorder() {
        let list = vec![
            obs("root", None, Some(0)),
            obs("a", None, Some(10)),
            obs("c", Some("a"), Some(30)),
            obs("b", None, Some(20)),
            obs("d", Some("a"), Some(40)),
        ];
        let forest = TraceForest::build(&list);
        let walk: Vec<(&str, usize)> = forest
            .preorder()
            .into_iter()
            .map(|(i, d)| (forest.node(i).observation.id.as_str(), d))
            .collect();
        assert_eq!(
            walk,
            vec![("root", 0), ("a", 0), ("c", 1), ("d", 1), ("b", 0)]
        );
    }

    #[test]
    fn test_empty() {
        let forest = TraceForest::build(&[]);
        assert!(forest.is_empty());
        assert!(forest.roots().is_empty());
    }
}
