//! Path finder (spec §4.6): enumerate simple drug->disease walks of length
//! <= `2*max_hops+1` over a result's reduced graph, treating each edge as
//! undirected for traversal purposes.
//!
//! Re-implemented as an explicit iterative DFS over a reusable frame stack
//! per the Design Notes, rather than the reference implementation's
//! hand-rolled `[[drug]]` frontier.

use crate::canonical::CanonicalIndex;
use crate::model::trapi::KnowledgeGraph;
use crate::rgraph::Rgraph;
use std::collections::{HashMap, HashSet};

/// One element of a path as discovered by the DFS, before normalization:
/// either a node CURIE, or the traversal of an edge (carrying whether it
/// was walked against its kedge's `(subject, object)` direction).
#[derive(Clone, Debug, PartialEq)]
pub enum RawPathElement {
    Node(String),
    Edge { id: String, inverted: bool },
}

pub type RawPath = Vec<RawPathElement>;

struct Frame {
    path: RawPath,
    current: String,
    visited: HashSet<String>,
}

fn build_adjacency<'a>(
    rgraph: &'a Rgraph,
    kgraph: &'a KnowledgeGraph,
) -> HashMap<String, Vec<(String, bool, String)>> {
    let mut adjacency: HashMap<String, Vec<(String, bool, String)>> = HashMap::new();
    for eid in &rgraph.edges {
        let Some(kedge) = kgraph.edges.get(eid) else {
            continue;
        };
        adjacency
            .entry(kedge.subject.clone())
            .or_default()
            .push((eid.clone(), false, kedge.object.clone()));
        adjacency
            .entry(kedge.object.clone())
            .or_default()
            .push((eid.clone(), true, kedge.subject.clone()));
    }
    adjacency
}

/// Enumerate every simple path from `drug` to `disease` within `rgraph`,
/// no longer than `2*max_hops+1` elements, where every node along the way
/// (including the endpoints) resolves through `canonical`. Returns no
/// paths if the rgraph is empty or either endpoint is absent from it, or if
/// either endpoint itself can't be canonicalized.
pub fn find_paths(
    rgraph: &Rgraph,
    kgraph: &KnowledgeGraph,
    drug: &str,
    disease: &str,
    max_hops: usize,
    canonical: &mut CanonicalIndex,
) -> Vec<RawPath> {
    if !rgraph.nodes.iter().any(|n| n == drug) || !rgraph.nodes.iter().any(|n| n == disease) {
        return Vec::new();
    }
    if canonical.resolve(drug).is_none() || canonical.resolve(disease).is_none() {
        return Vec::new();
    }

    let max_len = 2 * max_hops + 1;
    let adjacency = build_adjacency(rgraph, kgraph);

    let mut results = Vec::new();
    let mut stack = vec![Frame {
        path: vec![RawPathElement::Node(drug.to_string())],
        current: drug.to_string(),
        visited: HashSet::from([drug.to_string()]),
    }];

    while let Some(frame) = stack.pop() {
        if frame.current == disease {
            results.push(frame.path.clone());
        }
        if frame.path.len() + 2 > max_len {
            continue;
        }
        let Some(neighbors) = adjacency.get(&frame.current) else {
            continue;
        };
        for (edge_id, inverted, neighbor) in neighbors {
            if frame.visited.contains(neighbor) {
                continue;
            }
            if canonical.resolve(neighbor).is_none() {
                continue;
            }
            let mut next_path = frame.path.clone();
            next_path.push(RawPathElement::Edge { id: edge_id.clone(), inverted: *inverted });
            next_path.push(RawPathElement::Node(neighbor.clone()));
            let mut next_visited = frame.visited.clone();
            next_visited.insert(neighbor.clone());
            stack.push(Frame { path: next_path, current: neighbor.clone(), visited: next_visited });
        }
    }

    results
}
