//! Tree construction over flat, parent-linked records.
//!
//! Presentation (list, dropdown) lives elsewhere and only walks the tree.

use crate::records::Record;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordNode {
    #[serde(flatten)]
    pub record: Record,
    pub children: Vec<RecordNode>,
}

impl RecordNode {
    fn leaf(record: &Record) -> Self {
        Self {
            record: record.clone(),
            children: Vec::new(),
        }
    }
}

/// Build the tree rooted at `root`.
///
/// With `flatten`, hierarchy is ignored and every record becomes a sibling
/// at the top level, in input order. Otherwise records not reachable from
/// `root` are left out, and a record is never placed twice, so parent
/// cycles terminate.
pub fn build_tree(records: &[Record], root: u64, flatten: bool) -> Vec<RecordNode> {
    if flatten {
        return records.iter().map(RecordNode::leaf).collect();
    }

    let mut children_of: HashMap<u64, Vec<&Record>> = HashMap::new();
    for record in records {
        children_of.entry(record.parent).or_default().push(record);
    }

    let mut visited = HashSet::new();
    let tree = build_level(&children_of, root, &mut visited);
    if visited.len() < records.len() {
        debug!(
            placed = visited.len(),
            total = records.len(),
            "Some records are not reachable from the root"
        );
    }
    tree
}

fn build_level(
    children_of: &HashMap<u64, Vec<&Record>>,
    parent: u64,
    visited: &mut HashSet<u64>,
) -> Vec<RecordNode> {
    let Some(children) = children_of.get(&parent) else {
        return Vec::new();
    };

    let mut level = Vec::with_capacity(children.len());
    for record in children {
        if !visited.insert(record.id) {
            continue;
        }
        let mut node = RecordNode::leaf(record);
        node.children = build_level(children_of, record.id, visited);
        level.push(node);
    }
    level
}

/// Pre-order walk yielding each node with its depth (top level is 0)
pub fn walk<'a>(nodes: &'a [RecordNode], visit: &mut impl FnMut(&'a RecordNode, usize)) {
    fn go<'a>(nodes: &'a [RecordNode], depth: usize, visit: &mut impl FnMut(&'a RecordNode, usize)) {
        for node in nodes {
            visit(node, depth);
            go(&node.children, depth + 1, visit);
        }
    }
    go(nodes, 0, visit);
}
