/// Outline compiler — indentation-structured text to a rooted choice tree.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Index of a node in the outline's arena.
pub(crate) type NodeId = usize;

/// One outline line: its trimmed text plus its children in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Node {
    key: String,
    children: Vec<NodeId>,
}

/// A path of node keys from a top-level table down to a leaf. Branches are
/// the unit of random selection and are recomputed on every roll.
pub type Branch = Vec<String>;

/// A compiled outline: an arena of nodes (node 0 is the synthetic root)
/// plus the catalog mapping top-level names to their subtrees. Immutable
/// after `compile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outline {
    nodes: Vec<Node>,
    catalog: FxHashMap<String, NodeId>,
}

impl Outline {
    /// Compile canonical outline text.
    ///
    /// Input contract: one key per line, nesting by two-space indentation
    /// units, lines ordered as a pre-order traversal. Blank lines are
    /// dropped. Compilation is total — malformed indentation degrades per
    /// the rules below rather than failing:
    /// - an indentation jump of more than one unit nests exactly one level
    ///   under the previous line (depth is tracked by comparison to the
    ///   previous line, not by arithmetic distance);
    /// - a repeated key among siblings overwrites: the last occurrence
    ///   wins and any subtree built under the earlier one is discarded.
    pub fn compile(text: &str) -> Outline {
        let mut nodes = vec![Node {
            key: String::new(),
            children: Vec::new(),
        }];
        let mut catalog = FxHashMap::default();

        // Container stack of direct node references; the top is the node
        // the current line is inserted into. Never empty: slot 0 is root.
        let mut stack: Vec<NodeId> = vec![0];
        let mut prev: Option<NodeId> = None;
        let mut prev_depth: isize = -1;

        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let depth = indent_units(line) as isize;

            if depth > prev_depth {
                if let Some(parent) = prev {
                    stack.push(parent);
                }
            } else if depth < prev_depth {
                for _ in 0..(prev_depth - depth) {
                    if stack.len() > 1 {
                        stack.pop();
                    }
                }
            }

            let container = stack.last().copied().unwrap_or(0);
            let id = insert_child(&mut nodes, container, line.trim());
            if container == 0 {
                catalog.insert(nodes[id].key.clone(), id);
            }

            prev = Some(id);
            prev_depth = depth;
        }

        Outline { nodes, catalog }
    }

    /// Top-level table names, in source order.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.nodes[0]
            .children
            .iter()
            .map(|&id| self.nodes[id].key.as_str())
    }

    /// Whether a top-level table of this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.catalog.contains_key(name)
    }

    /// Number of top-level tables.
    pub fn len(&self) -> usize {
        self.nodes[0].children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// All branches of the named table, in deterministic left-to-right
    /// source order. `None` if no such table; an empty vec if the table is
    /// itself a leaf (no children to branch into).
    pub fn branches(&self, name: &str) -> Option<Vec<Branch>> {
        let id = self.catalog.get(name).copied()?;
        Some(self.branches_of(id))
    }

    fn branches_of(&self, node: NodeId) -> Vec<Branch> {
        let mut branches = Vec::new();
        for &child in &self.nodes[node].children {
            if self.nodes[child].children.is_empty() {
                branches.push(vec![self.nodes[child].key.clone()]);
            } else {
                for mut tail in self.branches_of(child) {
                    let mut branch = Vec::with_capacity(tail.len() + 1);
                    branch.push(self.nodes[child].key.clone());
                    branch.append(&mut tail);
                    branches.push(branch);
                }
            }
        }
        branches
    }
}

/// Insert `key` as a child of `container`, or reclaim the existing child of
/// the same key. Reclaiming clears its subtree: last write wins.
fn insert_child(nodes: &mut Vec<Node>, container: NodeId, key: &str) -> NodeId {
    let existing = nodes[container]
        .children
        .iter()
        .copied()
        .find(|&c| nodes[c].key == key);
    match existing {
        Some(id) => {
            nodes[id].children.clear();
            id
        }
        None => {
            let id = nodes.len();
            nodes.push(Node {
                key: key.to_string(),
                children: Vec::new(),
            });
            nodes[container].children.push(id);
            id
        }
    }
}

/// Logical depth of a line: the number of two-space units in its leading
/// whitespace run. An odd trailing space or a stray tab contributes nothing.
fn indent_units(line: &str) -> usize {
    let ws_len = line.len() - line.trim_start().len();
    line[..ws_len].matches("  ").count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_flat_leaves() {
        let o = Outline::compile("root\n  alpha\n  beta\n");
        assert_eq!(o.len(), 1);
        assert!(o.contains("root"));
        let branches = o.branches("root").unwrap();
        assert_eq!(branches, vec![vec!["alpha"], vec!["beta"]]);
    }

    #[test]
    fn compile_nested_categories() {
        let o = Outline::compile("root\n  cat1\n    leafA\n  cat2\n    leafB\n");
        let branches = o.branches("root").unwrap();
        assert_eq!(
            branches,
            vec![vec!["cat1", "leafA"], vec!["cat2", "leafB"]]
        );
    }

    #[test]
    fn compile_multiple_tables() {
        let o = Outline::compile("weather\n  rain\n  sun\ncolor\n  red\n  blue\n");
        assert_eq!(o.len(), 2);
        let names: Vec<&str> = o.tables().collect();
        assert_eq!(names, vec!["weather", "color"]);
        assert_eq!(o.branches("color").unwrap().len(), 2);
    }

    #[test]
    fn blank_lines_ignored() {
        let o = Outline::compile("root\n\n  alpha\n   \t\n  beta\n\n");
        assert_eq!(o.branches("root").unwrap().len(), 2);
    }

    #[test]
    fn branch_order_is_source_order() {
        let o = Outline::compile("t\n  c\n  a\n  b\n");
        let branches = o.branches("t").unwrap();
        assert_eq!(branches, vec![vec!["c"], vec!["a"], vec!["b"]]);
    }

    #[test]
    fn every_branch_ends_at_a_leaf() {
        let text = "root\n  cat1\n    deep\n      leafA\n      leafB\n  cat2\n    leafC\n  leafD\n";
        let o = Outline::compile(text);
        let branches = o.branches("root").unwrap();
        let leaves: Vec<&str> = branches
            .iter()
            .map(|b| b.last().map(String::as_str).unwrap_or(""))
            .collect();
        assert_eq!(leaves, vec!["leafA", "leafB", "leafC", "leafD"]);
    }

    #[test]
    fn multi_level_jump_collapses_to_one() {
        // "leaf" jumps two units deeper than "cat" but still nests
        // directly under it.
        let o = Outline::compile("root\n  cat\n      leaf\n");
        assert_eq!(o.branches("root").unwrap(), vec![vec!["cat", "leaf"]]);
    }

    #[test]
    fn deep_decrease_returns_to_root() {
        let o = Outline::compile("a\n  b\n    c\n      d\ne\n  f\n");
        assert_eq!(o.branches("a").unwrap(), vec![vec!["b", "c", "d"]]);
        assert_eq!(o.branches("e").unwrap(), vec![vec!["f"]]);
    }

    #[test]
    fn decrease_by_one_level_becomes_sibling_of_parent() {
        let o = Outline::compile("root\n  cat\n    leafA\n  leafB\n");
        assert_eq!(
            o.branches("root").unwrap(),
            vec![vec!["cat", "leafA"], vec!["leafB"]]
        );
    }

    #[test]
    fn duplicate_sibling_key_overwrites() {
        // Second "cat" discards the subtree built under the first.
        let o = Outline::compile("root\n  cat\n    old\n  cat\n    new\n");
        assert_eq!(o.branches("root").unwrap(), vec![vec!["cat", "new"]]);
    }

    #[test]
    fn duplicate_leaf_key_collapses() {
        let o = Outline::compile("root\n  same\n  same\n");
        assert_eq!(o.branches("root").unwrap(), vec![vec!["same"]]);
    }

    #[test]
    fn odd_indentation_rounds_down() {
        // Three spaces is one unit, same as two.
        let o = Outline::compile("root\n   alpha\n");
        assert_eq!(o.branches("root").unwrap(), vec![vec!["alpha"]]);
    }

    #[test]
    fn top_level_leaf_has_no_branches() {
        let o = Outline::compile("lonely\n");
        assert!(o.contains("lonely"));
        assert!(o.branches("lonely").unwrap().is_empty());
    }

    #[test]
    fn unknown_table_is_none() {
        let o = Outline::compile("root\n  alpha\n");
        assert!(o.branches("nope").is_none());
    }

    #[test]
    fn empty_text_compiles_to_empty_outline() {
        let o = Outline::compile("");
        assert!(o.is_empty());
        assert_eq!(o.tables().count(), 0);
    }

    #[test]
    fn keys_are_trimmed() {
        let o = Outline::compile("root\n  spaced out   \n");
        assert_eq!(o.branches("root").unwrap(), vec![vec!["spaced out"]]);
    }

    #[test]
    fn ron_round_trip() {
        let o = Outline::compile("root\n  cat\n    leaf\n");
        let serialized = ron::to_string(&o).unwrap();
        let back: Outline = ron::from_str(&serialized).unwrap();
        assert_eq!(back.branches("root"), o.branches("root"));
    }
}
