//! Shared DFS over the requirement adjacency map.
//!
//! Both the cycle validator and the layout engine walk the same graph; one
//! traversal module keeps their cycle-handling semantics consistent: a node
//! revisited while still on the recursion stack means a back edge. The
//! validator reports it as a cycle; the depth computation treats the
//! revisited node's contribution as zero instead of recursing forever
//! (the graph may be malformed transiently).

use std::collections::{HashMap, HashSet};

use crate::core::Skill;

/// Skill ID → its requirement IDs.
pub type AdjacencyMap = HashMap<String, Vec<String>>;

/// Build the adjacency map for a set of skills.
#[must_use]
pub fn adjacency_of(skills: &[Skill]) -> AdjacencyMap {
    skills
        .iter()
        .map(|s| (s.id.clone(), s.requirements.clone()))
        .collect()
}

/// True iff a cycle is reachable from `start`.
#[must_use]
pub fn cycle_reachable_from(adj: &AdjacencyMap, start: &str) -> bool {
    let mut visited = HashSet::new();
    let mut on_stack = HashSet::new();
    walk(adj, start, &mut visited, &mut on_stack)
}

fn walk<'a>(
    adj: &'a AdjacencyMap,
    node: &'a str,
    visited: &mut HashSet<&'a str>,
    on_stack: &mut HashSet<&'a str>,
) -> bool {
    if !visited.insert(node) {
        return false;
    }
    on_stack.insert(node);

    if let Some(neighbors) = adj.get(node) {
        for neighbor in neighbors {
            if on_stack.contains(neighbor.as_str()) {
                return true;
            }
            if !visited.contains(neighbor.as_str()) && walk(adj, neighbor, visited, on_stack) {
                return true;
            }
        }
    }

    on_stack.remove(node);
    false
}

/// Dependency depth of every node: 0 for roots, otherwise one more than the
/// deepest requirement. Memoized; a revisit within the same branch
/// contributes 0.
#[must_use]
pub fn dependency_depths(adj: &AdjacencyMap) -> HashMap<String, usize> {
    let mut depths = HashMap::new();
    for id in adj.keys() {
        let mut in_branch = HashSet::new();
        depth_of(adj, id, &mut depths, &mut in_branch);
    }
    depths
}

fn depth_of<'a>(
    adj: &'a AdjacencyMap,
    node: &'a str,
    depths: &mut HashMap<String, usize>,
    in_branch: &mut HashSet<&'a str>,
) -> usize {
    if let Some(&d) = depths.get(node) {
        return d;
    }
    if !in_branch.insert(node) {
        return 0;
    }

    let depth = match adj.get(node) {
        None => 0,
        Some(reqs) if reqs.is_empty() => 0,
        Some(reqs) => {
            1 + reqs
                .iter()
                .map(|req| depth_of(adj, req, depths, in_branch))
                .max()
                .unwrap_or(0)
        }
    };

    in_branch.remove(node);
    depths.insert(node.to_string(), depth);
    depth
}
